use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        collections::{OwnedCollection, OwnedItem},
        image::{deferred, with_image, MetadataImage},
        lazy::LazyValue,
        member::{Member, MemberKind, WeakMember},
        tables::{
            CodedIndexType, CustomAttribute, GenericParamAttributes, GenericParamConstraint,
            GenericParamRaw, GenericParamRc, TableId,
        },
        token::Token,
    },
    Error, Result,
};

/// A generic parameter of a type or method.
pub struct GenericParam {
    /// Token of the backing row, rid 0 for parameters that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    number: LazyValue<u32>,
    flags: LazyValue<GenericParamAttributes>,
    owner: LazyValue<Option<WeakMember>>,
    name: LazyValue<String>,
    constraints: OwnedCollection<GenericParam, GenericParamConstraint>,
    custom_attributes: OwnedCollection<GenericParam, CustomAttribute>,
}

impl GenericParam {
    /// Creates a new, unattached generic parameter at position `number`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty or `number` does not fit 2 bytes
    pub fn new(number: u32, name: &str, flags: GenericParamAttributes) -> Result<GenericParamRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "A generic parameter requires a name".to_string(),
            ));
        }
        if number > u32::from(u16::MAX) {
            return Err(Error::InvalidArgument(format!(
                "Generic parameter '{name}' has number {number}, which does not fit 2 bytes"
            )));
        }

        Ok(Arc::new_cyclic(|this| GenericParam {
            token: Token::from_parts(TableId::GenericParam, 0),
            image: Weak::new(),
            number: LazyValue::from_value(number),
            flags: LazyValue::from_value(flags),
            owner: LazyValue::from_value(None),
            name: LazyValue::from_value(name.to_string()),
            constraints: OwnedCollection::new(this.clone()),
            custom_attributes: OwnedCollection::new(this.clone()),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: GenericParamRaw) -> GenericParamRc {
        let token = raw.token;

        Arc::new_cyclic(|this| GenericParam {
            token,
            number: LazyValue::from_value(raw.number),
            flags: LazyValue::from_value(GenericParamAttributes::from_bits_retain(raw.flags)),
            owner: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::TypeOrMethodDef, raw.owner)
                    .map(|owner| owner.downgrade())
            }),
            name: deferred(&image, move |image| image.string(token, raw.name)),
            constraints: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.indexed_members::<GenericParamConstraint>(token, 0)
                    })
                }
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
            image,
        })
    }

    /// The image this parameter was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// Position of the parameter, numbered left-to-right from zero
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number.get()
    }

    /// Parameter attributes
    #[must_use]
    pub fn flags(&self) -> GenericParamAttributes {
        self.flags.get()
    }

    /// Replaces the parameter attributes
    pub fn set_flags(&self, flags: GenericParamAttributes) {
        self.flags.set(flags);
    }

    /// Name of the parameter
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the parameter
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// The type or method declaring this parameter
    #[must_use]
    pub fn owner(&self) -> Option<Member> {
        self.owner.get().and_then(|owner| owner.upgrade())
    }

    /// Constraints on this parameter
    #[must_use]
    pub fn constraints(&self) -> &OwnedCollection<GenericParam, GenericParamConstraint> {
        &self.constraints
    }

    /// Custom attributes applied to this parameter
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<GenericParam, CustomAttribute> {
        &self.custom_attributes
    }
}

impl<O: MemberKind> OwnedItem<O> for GenericParam {
    fn has_owner(&self) -> bool {
        self.owner().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<O>>) {
        self.owner.set(owner.map(O::into_weak_member));
    }
}
