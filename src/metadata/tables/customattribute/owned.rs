use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        collections::OwnedItem,
        image::{deferred, MetadataImage},
        lazy::LazyValue,
        member::{Member, MemberKind, WeakMember},
        tables::{CodedIndexType, CustomAttributeRaw, CustomAttributeRc, TableId},
        token::Token,
    },
    Error, Result,
};

/// One attribute instance applied to a member.
///
/// The parent is a back-reference. The constructor is a forward reference to the `MethodDef`
/// or `MemberRef` that instantiates the attribute.
pub struct CustomAttribute {
    /// Token of the backing row, rid 0 for attributes that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    parent: LazyValue<Option<WeakMember>>,
    constructor: LazyValue<Option<Member>>,
    value: LazyValue<Vec<u8>>,
}

impl CustomAttribute {
    /// Creates a new, unattached attribute.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `constructor` is neither a `MethodDef` nor a
    /// `MemberRef`
    pub fn new(constructor: Member, value: Vec<u8>) -> Result<CustomAttributeRc> {
        if !CodedIndexType::CustomAttributeType.contains(constructor.table_id()) {
            return Err(Error::InvalidArgument(format!(
                "{:?} can not be an attribute constructor",
                constructor.table_id()
            )));
        }

        Ok(Arc::new(CustomAttribute {
            token: Token::from_parts(TableId::CustomAttribute, 0),
            image: Weak::new(),
            parent: LazyValue::from_value(None),
            constructor: LazyValue::from_value(Some(constructor)),
            value: LazyValue::from_value(value),
        }))
    }

    pub(crate) fn from_raw(
        image: Weak<MetadataImage>,
        raw: CustomAttributeRaw,
    ) -> CustomAttributeRc {
        let token = raw.token;

        Arc::new(CustomAttribute {
            token,
            parent: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::HasCustomAttribute, raw.parent)
                    .map(|parent| parent.downgrade())
            }),
            constructor: deferred(&image, move |image| {
                image.resolve_coded(token, CodedIndexType::CustomAttributeType, raw.constructor)
            }),
            value: deferred(&image, move |image| image.blob(token, raw.value)),
            image,
        })
    }

    /// The image this attribute was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// The member this attribute is applied to
    #[must_use]
    pub fn parent(&self) -> Option<Member> {
        self.parent.get().and_then(|parent| parent.upgrade())
    }

    /// The constructor instantiating this attribute
    #[must_use]
    pub fn constructor(&self) -> Option<Member> {
        self.constructor.get()
    }

    /// The encoded attribute arguments
    #[must_use]
    pub fn value(&self) -> Vec<u8> {
        self.value.get()
    }

    /// Replaces the encoded attribute arguments
    pub fn set_value(&self, value: Vec<u8>) {
        self.value.set(value);
    }
}

impl<O: MemberKind> OwnedItem<O> for CustomAttribute {
    fn has_owner(&self) -> bool {
        self.parent().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<O>>) {
        self.parent.set(owner.map(O::into_weak_member));
    }
}
