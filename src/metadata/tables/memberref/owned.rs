use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        image::{deferred, MetadataImage},
        lazy::LazyValue,
        member::Member,
        tables::{CodedIndexType, MemberRefRaw, MemberRefRc, TableId},
        token::Token,
    },
    Error, Result,
};

/// A reference to a field or method through its parent.
pub struct MemberRef {
    /// Token of the backing row, rid 0 for references that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    class: LazyValue<Option<Member>>,
    name: LazyValue<String>,
    signature: LazyValue<Vec<u8>>,
}

impl MemberRef {
    /// Creates a new member reference.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty or `class` can not be a
    /// `MemberRefParent`
    pub fn new(class: Member, name: &str, signature: Vec<u8>) -> Result<MemberRefRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "A member reference requires a name".to_string(),
            ));
        }
        if !CodedIndexType::MemberRefParent.contains(class.table_id()) {
            return Err(Error::InvalidArgument(format!(
                "{:?} can not be the parent of member reference '{name}'",
                class.table_id()
            )));
        }

        Ok(Arc::new(MemberRef {
            token: Token::from_parts(TableId::MemberRef, 0),
            image: Weak::new(),
            class: LazyValue::from_value(Some(class)),
            name: LazyValue::from_value(name.to_string()),
            signature: LazyValue::from_value(signature),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: MemberRefRaw) -> MemberRefRc {
        let token = raw.token;

        Arc::new(MemberRef {
            token,
            class: deferred(&image, move |image| {
                image.resolve_coded(token, CodedIndexType::MemberRefParent, raw.class)
            }),
            name: deferred(&image, move |image| image.string(token, raw.name)),
            signature: deferred(&image, move |image| image.blob(token, raw.signature)),
            image,
        })
    }

    /// The image this reference was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// The parent of the referenced member, usually a type
    #[must_use]
    pub fn class(&self) -> Option<Member> {
        self.class.get()
    }

    /// Name of the referenced member
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the reference
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// The raw field or method signature blob
    #[must_use]
    pub fn signature(&self) -> Vec<u8> {
        self.signature.get()
    }

    /// `Parent::Name`, or just the name if the parent has no name
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.class().and_then(|class| class.full_name()) {
            Some(parent) if !parent.is_empty() => format!("{}::{}", parent, self.name()),
            _ => self.name(),
        }
    }
}
