use std::sync::{Arc, Weak};

use crate::metadata::{
    collections::OwnedItem,
    image::{deferred, MetadataImage},
    lazy::LazyValue,
    member::{Member, MemberKind, WeakMember},
    tables::{
        CodedIndexType, MethodDef, MethodDefRc, MethodSemanticsAttributes, MethodSemanticsRaw,
        MethodSemanticsRc, TableId,
    },
    token::Token,
};

/// Binds a method to an event or property.
///
/// The association is a back-reference to the owning event or property; the method is a
/// forward reference.
pub struct MethodSemantics {
    /// Token of the backing row, rid 0 for rows that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    attributes: LazyValue<MethodSemanticsAttributes>,
    method: LazyValue<Option<MethodDefRc>>,
    association: LazyValue<Option<WeakMember>>,
}

impl MethodSemantics {
    /// Creates an unattached binding of `method` in the role `attributes`
    #[must_use]
    pub fn new(attributes: MethodSemanticsAttributes, method: MethodDefRc) -> MethodSemanticsRc {
        Arc::new(MethodSemantics {
            token: Token::from_parts(TableId::MethodSemantics, 0),
            image: Weak::new(),
            attributes: LazyValue::from_value(attributes),
            method: LazyValue::from_value(Some(method)),
            association: LazyValue::from_value(None),
        })
    }

    pub(crate) fn from_raw(
        image: Weak<MetadataImage>,
        raw: MethodSemanticsRaw,
    ) -> MethodSemanticsRc {
        let token = raw.token;

        Arc::new(MethodSemantics {
            token,
            attributes: LazyValue::from_value(MethodSemanticsAttributes::from_bits_retain(
                raw.semantics,
            )),
            method: deferred(&image, move |image| {
                image.resolve_index::<MethodDef>(token, raw.method)
            }),
            association: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::HasSemantics, raw.association)
                    .map(|association| association.downgrade())
            }),
            image,
        })
    }

    /// The image this row was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// The role of the method
    #[must_use]
    pub fn attributes(&self) -> MethodSemanticsAttributes {
        self.attributes.get()
    }

    /// Changes the role of the method
    pub fn set_attributes(&self, attributes: MethodSemanticsAttributes) {
        self.attributes.set(attributes);
    }

    /// The accessor method
    #[must_use]
    pub fn method(&self) -> Option<MethodDefRc> {
        self.method.get()
    }

    /// Replaces the accessor method
    pub fn set_method(&self, method: MethodDefRc) {
        self.method.set(Some(method));
    }

    /// The event or property this method belongs to
    #[must_use]
    pub fn association(&self) -> Option<Member> {
        self.association.get().and_then(|association| association.upgrade())
    }
}

impl<O: MemberKind> OwnedItem<O> for MethodSemantics {
    fn has_owner(&self) -> bool {
        self.association().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<O>>) {
        self.association.set(owner.map(O::into_weak_member));
    }
}
