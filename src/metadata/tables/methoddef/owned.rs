use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        collections::{OwnedCollection, OwnedItem},
        image::{deferred, with_image, MetadataImage},
        lazy::LazyValue,
        tables::{
            CodedIndexType, CustomAttribute, GenericParam, MethodAttributes, MethodDefRaw,
            MethodDefRc, TableId, TypeDef, TypeDefRc,
        },
        token::Token,
    },
    Error, Result,
};

/// A method defined in this module.
///
/// The declaring type is a back-reference; a method never keeps its type alive.
pub struct MethodDef {
    /// Token of the backing row, rid 0 for methods that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    rva: LazyValue<u32>,
    impl_flags: LazyValue<u32>,
    flags: LazyValue<MethodAttributes>,
    name: LazyValue<String>,
    signature: LazyValue<Vec<u8>>,
    declaring_type: LazyValue<Option<Weak<TypeDef>>>,
    generic_params: OwnedCollection<MethodDef, GenericParam>,
    custom_attributes: OwnedCollection<MethodDef, CustomAttribute>,
}

impl MethodDef {
    /// Creates a new method without a body.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` or `signature` is empty
    pub fn new(name: &str, flags: MethodAttributes, signature: Vec<u8>) -> Result<MethodDefRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("A method requires a name".to_string()));
        }
        if signature.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Method '{name}' requires a signature"
            )));
        }

        Ok(Arc::new_cyclic(|this| MethodDef {
            token: Token::from_parts(TableId::MethodDef, 0),
            image: Weak::new(),
            rva: LazyValue::from_value(0),
            impl_flags: LazyValue::from_value(0),
            flags: LazyValue::from_value(flags),
            name: LazyValue::from_value(name.to_string()),
            signature: LazyValue::from_value(signature),
            declaring_type: LazyValue::from_value(None),
            generic_params: OwnedCollection::new(this.clone()),
            custom_attributes: OwnedCollection::new(this.clone()),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: MethodDefRaw) -> MethodDefRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| MethodDef {
            token,
            rva: LazyValue::from_value(raw.rva),
            impl_flags: LazyValue::from_value(raw.impl_flags),
            flags: LazyValue::from_value(MethodAttributes::from_bits_retain(raw.flags)),
            name: deferred(&image, move |image| image.string(token, raw.name)),
            signature: deferred(&image, move |image| image.blob(token, raw.signature)),
            declaring_type: deferred(&image, move |image| {
                image
                    .range_owner::<TypeDef>(5, rid)
                    .map(|ty| Arc::downgrade(&ty))
            }),
            generic_params: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.keyed_members::<GenericParam>(
                            token,
                            2,
                            CodedIndexType::TypeOrMethodDef,
                        )
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

    /// The image this method was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// RVA of the method body, 0 if there is none
    #[must_use]
    pub fn rva(&self) -> u32 {
        self.rva.get()
    }

    /// Raw `MethodImplAttributes`
    #[must_use]
    pub fn impl_flags(&self) -> u32 {
        self.impl_flags.get()
    }

    /// Method attributes
    #[must_use]
    pub fn flags(&self) -> MethodAttributes {
        self.flags.get()
    }

    /// Replaces the method attributes
    pub fn set_flags(&self, flags: MethodAttributes) {
        self.flags.set(flags);
    }

    /// Simple name of the method
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the method
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// The raw `MethodDefSig` blob
    #[must_use]
    pub fn signature(&self) -> Vec<u8> {
        self.signature.get()
    }

    /// Replaces the signature blob
    pub fn set_signature(&self, signature: Vec<u8>) {
        self.signature.set(signature);
    }

    /// The type declaring this method, `None` for detached methods
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDefRc> {
        self.declaring_type.get().and_then(|ty| ty.upgrade())
    }

    /// `Type::Name`, or just the name if the method has no declaring type
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.declaring_type() {
            Some(ty) => format!("{}::{}", ty.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// Generic parameters of this method
    #[must_use]
    pub fn generic_params(&self) -> &OwnedCollection<MethodDef, GenericParam> {
        &self.generic_params
    }

    /// Custom attributes applied to this method
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<MethodDef, CustomAttribute> {
        &self.custom_attributes
    }
}

impl OwnedItem<TypeDef> for MethodDef {
    fn has_owner(&self) -> bool {
        self.declaring_type().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<TypeDef>>) {
        self.declaring_type.set(owner);
    }
}
