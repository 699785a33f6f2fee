use std::sync::{Arc, RwLock, Weak};

use crate::metadata::{
    collections::{OwnedCollection, OwnedItem},
    image::{deferred, with_image, MetadataImage},
    lazy::LazyValue,
    member::TypeDefOrRef,
    tables::{
        CodedIndexType, CustomAttribute, GenericParam, GenericParamConstraintRaw,
        GenericParamConstraintRc, GenericParamRc, TableId,
    },
    token::Token,
};

/// A constraint on a generic parameter.
///
/// Like events, a constraint takes its image from its owner once attached.
pub struct GenericParamConstraint {
    /// Token of the backing row, rid 0 for constraints that were never written
    pub token: Token,
    image: RwLock<Weak<MetadataImage>>,
    owner: LazyValue<Option<Weak<GenericParam>>>,
    constraint: LazyValue<Option<TypeDefOrRef>>,
    custom_attributes: OwnedCollection<GenericParamConstraint, CustomAttribute>,
}

impl GenericParamConstraint {
    /// Creates an unattached constraint to `constraint`
    #[must_use]
    pub fn new(constraint: TypeDefOrRef) -> GenericParamConstraintRc {
        Arc::new_cyclic(|this| GenericParamConstraint {
            token: Token::from_parts(TableId::GenericParamConstraint, 0),
            image: RwLock::new(Weak::new()),
            owner: LazyValue::from_value(None),
            constraint: LazyValue::from_value(Some(constraint)),
            custom_attributes: OwnedCollection::new(this.clone()),
        })
    }

    pub(crate) fn from_raw(
        image: Weak<MetadataImage>,
        raw: GenericParamConstraintRaw,
    ) -> GenericParamConstraintRc {
        let token = raw.token;

        Arc::new_cyclic(|this| GenericParamConstraint {
            token,
            owner: deferred(&image, move |image| {
                image
                    .resolve_index::<GenericParam>(token, raw.owner)
                    .map(|owner| Arc::downgrade(&owner))
            }),
            constraint: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::TypeDefOrRef, raw.constraint)
                    .and_then(TypeDefOrRef::from_member)
            }),
            custom_attributes: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.keyed_members::<CustomAttribute>(
                            token,
                            0,
                            CodedIndexType::HasCustomAttribute,
                        )
                    })
                }
            }),
            image: RwLock::new(image),
        })
    }

    /// The image of the owning parameter, or the image this constraint was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        // Does not resolve the owner
        if !self.owner.is_initialized() {
            return read_lock!(self.image).upgrade();
        }

        self.owner()
            .and_then(|owner| owner.image())
            .or_else(|| read_lock!(self.image).upgrade())
    }

    /// The constrained parameter
    #[must_use]
    pub fn owner(&self) -> Option<GenericParamRc> {
        self.owner.get().and_then(|owner| owner.upgrade())
    }

    /// The type the parameter is constrained to
    #[must_use]
    pub fn constraint(&self) -> Option<TypeDefOrRef> {
        self.constraint.get()
    }

    /// Replaces the constraint type
    pub fn set_constraint(&self, constraint: TypeDefOrRef) {
        self.constraint.set(Some(constraint));
    }

    /// Custom attributes applied to this constraint
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<GenericParamConstraint, CustomAttribute> {
        &self.custom_attributes
    }
}

impl OwnedItem<GenericParam> for GenericParamConstraint {
    fn has_owner(&self) -> bool {
        self.owner().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<GenericParam>>) {
        self.owner.set(owner);
        *write_lock!(self.image) = Weak::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{GenericParamAttributes, TypeRef};

    #[test]
    fn attach_to_param() {
        let disposable = TypeRef::new(None, "System", "IDisposable").unwrap();
        let constraint = GenericParamConstraint::new(disposable.clone().into());
        assert!(constraint.owner().is_none());

        let t = GenericParam::new(0, "T", GenericParamAttributes::empty()).unwrap();
        t.constraints().push(constraint.clone()).unwrap();

        assert!(Arc::ptr_eq(&constraint.owner().unwrap(), &t));
        assert_eq!(
            constraint.constraint().unwrap(),
            TypeDefOrRef::TypeRef(disposable)
        );
        assert!(constraint.image().is_none());
    }
}
