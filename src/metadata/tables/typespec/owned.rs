use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        image::{deferred, MetadataImage},
        lazy::LazyValue,
        tables::{TableId, TypeSpecRaw, TypeSpecRc},
        token::Token,
    },
    Error, Result,
};

/// A constructed type, described by its signature blob
pub struct TypeSpec {
    /// Token of the backing row, rid 0 for specifications that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    signature: LazyValue<Vec<u8>>,
}

impl TypeSpec {
    /// Creates a new type specification
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `signature` is empty
    pub fn new(signature: Vec<u8>) -> Result<TypeSpecRc> {
        if signature.is_empty() {
            return Err(Error::InvalidArgument(
                "A type specification requires a signature".to_string(),
            ));
        }

        Ok(Arc::new(TypeSpec {
            token: Token::from_parts(TableId::TypeSpec, 0),
            image: Weak::new(),
            signature: LazyValue::from_value(signature),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: TypeSpecRaw) -> TypeSpecRc {
        let token = raw.token;

        Arc::new(TypeSpec {
            token,
            signature: deferred(&image, move |image| image.blob(token, raw.signature)),
            image,
        })
    }

    /// The image this specification was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// The raw `TypeSpec` signature
    #[must_use]
    pub fn signature(&self) -> Vec<u8> {
        self.signature.get()
    }

    /// Replaces the signature
    pub fn set_signature(&self, signature: Vec<u8>) {
        self.signature.set(signature);
    }
}
