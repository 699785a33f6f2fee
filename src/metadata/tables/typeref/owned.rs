use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        image::{deferred, MetadataImage},
        lazy::LazyValue,
        tables::{CodedIndexType, TableId, TypeDefRc, TypeRefRaw, TypeRefRc},
        token::Token,
    },
    Error, Result,
};

/// A reference to a type by name
pub struct TypeRef {
    /// Token of the backing row, rid 0 for references that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    resolution_scope: LazyValue<Option<Token>>,
    name: LazyValue<String>,
    namespace: LazyValue<String>,
}

impl TypeRef {
    /// Creates a new type reference
    ///
    /// ## Arguments
    /// * 'scope'       - Token of the `ResolutionScope` the type is found in, if any
    /// * 'namespace'   - Namespace of the referenced type
    /// * 'name'        - Name of the referenced type
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty or `scope` is not a valid
    /// resolution scope
    pub fn new(scope: Option<Token>, namespace: &str, name: &str) -> Result<TypeRefRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "A type reference requires a name".to_string(),
            ));
        }

        if let Some(scope) = scope {
            if !scope
                .table_id()
                .is_some_and(|table| CodedIndexType::ResolutionScope.contains(table))
            {
                return Err(Error::InvalidArgument(format!(
                    "{scope} is not a resolution scope"
                )));
            }
        }

        Ok(Arc::new(TypeRef {
            token: Token::from_parts(TableId::TypeRef, 0),
            image: Weak::new(),
            resolution_scope: LazyValue::from_value(scope),
            name: LazyValue::from_value(name.to_string()),
            namespace: LazyValue::from_value(namespace.to_string()),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: TypeRefRaw) -> TypeRefRc {
        let token = raw.token;

        Arc::new(TypeRef {
            token,
            resolution_scope: LazyValue::from_thunk(move || {
                match CodedIndexType::ResolutionScope.decode(raw.resolution_scope) {
                    Ok(scope) => scope,
                    Err(error) => {
                        tracing::warn!(owner = %token, %error, "malformed resolution scope");
                        None
                    }
                }
            }),
            name: deferred(&image, move |image| image.string(token, raw.type_name)),
            namespace: deferred(&image, move |image| image.string(token, raw.type_namespace)),
            image,
        })
    }

    /// The image this reference was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// Token of the scope the type is found in. Scopes are not resolved into members.
    #[must_use]
    pub fn resolution_scope(&self) -> Option<Token> {
        self.resolution_scope.get()
    }

    /// Replaces the resolution scope
    pub fn set_resolution_scope(&self, scope: Option<Token>) {
        self.resolution_scope.set(scope);
    }

    /// Name of the referenced type
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the reference
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// Namespace of the referenced type
    #[must_use]
    pub fn namespace(&self) -> String {
        self.namespace.get()
    }

    /// Replaces the namespace
    pub fn set_namespace(&self, namespace: &str) {
        self.namespace.set(namespace.to_string());
    }

    /// `Namespace.Name`, or just the name for global types
    #[must_use]
    pub fn full_name(&self) -> String {
        let namespace = self.namespace();
        if namespace.is_empty() {
            self.name()
        } else {
            format!("{}.{}", namespace, self.name())
        }
    }

    /// The definition with the same namespace and name in this reference's image
    #[must_use]
    pub fn definition(&self) -> Option<TypeDefRc> {
        self.image()?
            .type_by_name(&self.namespace(), &self.name())
    }
}
