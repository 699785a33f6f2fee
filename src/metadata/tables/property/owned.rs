use std::sync::{Arc, RwLock, Weak};

use crate::{
    metadata::{
        collections::{OwnedCollection, OwnedItem},
        image::{deferred, with_image, MetadataImage},
        lazy::LazyValue,
        tables::{
            CodedIndexType, CustomAttribute, MethodDefRc, MethodSemantics,
            MethodSemanticsAttributes, PropertyAttributes, PropertyMap, PropertyMapRc,
            PropertyRaw, PropertyRc, TableId, TypeDefRc,
        },
        token::Token,
    },
    Error, Result,
};

/// A property declared by a type.
///
/// Mirrors [`crate::metadata::tables::Event`]: the owning map is a back-reference and provides
/// the image of attached properties.
pub struct Property {
    /// Token of the backing row, rid 0 for properties that were never written
    pub token: Token,
    image: RwLock<Weak<MetadataImage>>,
    flags: LazyValue<PropertyAttributes>,
    name: LazyValue<String>,
    signature: LazyValue<Vec<u8>>,
    property_map: LazyValue<Option<Weak<PropertyMap>>>,
    semantics: OwnedCollection<Property, MethodSemantics>,
    custom_attributes: OwnedCollection<Property, CustomAttribute>,
}

impl Property {
    /// Creates a new, unattached property.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` or `signature` is empty
    pub fn new(name: &str, signature: Vec<u8>, flags: PropertyAttributes) -> Result<PropertyRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("A property requires a name".to_string()));
        }
        if signature.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Property '{name}' requires a signature"
            )));
        }

        Ok(Arc::new_cyclic(|this| Property {
            token: Token::from_parts(TableId::Property, 0),
            image: RwLock::new(Weak::new()),
            flags: LazyValue::from_value(flags),
            name: LazyValue::from_value(name.to_string()),
            signature: LazyValue::from_value(signature),
            property_map: LazyValue::from_value(None),
            semantics: OwnedCollection::new(this.clone()),
            custom_attributes: OwnedCollection::new(this.clone()),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: PropertyRaw) -> PropertyRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| Property {
            token,
            flags: LazyValue::from_value(PropertyAttributes::from_bits_retain(raw.flags)),
            name: deferred(&image, move |image| image.string(token, raw.name)),
            signature: deferred(&image, move |image| image.blob(token, raw.signature)),
            property_map: deferred(&image, move |image| {
                image
                    .range_owner::<PropertyMap>(1, rid)
                    .map(|map| Arc::downgrade(&map))
            }),
            semantics: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.keyed_members::<MethodSemantics>(
                            token,
                            2,
                            CodedIndexType::HasSemantics,
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
            image: RwLock::new(image),
        })
    }

    /// The image of the owning map, or the image this property was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        // Does not resolve the owner
        if !self.property_map.is_initialized() {
            return read_lock!(self.image).upgrade();
        }

        self.property_map()
            .and_then(|map| map.image())
            .or_else(|| read_lock!(self.image).upgrade())
    }

    /// Property attributes
    #[must_use]
    pub fn flags(&self) -> PropertyAttributes {
        self.flags.get()
    }

    /// Replaces the property attributes
    pub fn set_flags(&self, flags: PropertyAttributes) {
        self.flags.set(flags);
    }

    /// Simple name of the property
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the property
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// The raw `PropertySig` blob
    #[must_use]
    pub fn signature(&self) -> Vec<u8> {
        self.signature.get()
    }

    /// Replaces the signature blob
    pub fn set_signature(&self, signature: Vec<u8>) {
        self.signature.set(signature);
    }

    /// The map owning this property
    #[must_use]
    pub fn property_map(&self) -> Option<PropertyMapRc> {
        self.property_map.get().and_then(|map| map.upgrade())
    }

    /// The type declaring this property, through its map
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDefRc> {
        self.property_map().and_then(|map| map.parent())
    }

    /// `Type::Name`, or just the name for detached properties
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.declaring_type() {
            Some(ty) => format!("{}::{}", ty.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// Accessor methods attached to this property
    #[must_use]
    pub fn semantics(&self) -> &OwnedCollection<Property, MethodSemantics> {
        &self.semantics
    }

    /// Custom attributes applied to this property
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<Property, CustomAttribute> {
        &self.custom_attributes
    }

    /// The `get` accessor
    #[must_use]
    pub fn get_method(&self) -> Option<MethodDefRc> {
        self.accessor(MethodSemanticsAttributes::GETTER)
    }

    /// The `set` accessor
    #[must_use]
    pub fn set_method(&self) -> Option<MethodDefRc> {
        self.accessor(MethodSemanticsAttributes::SETTER)
    }

    fn accessor(&self, kind: MethodSemanticsAttributes) -> Option<MethodDefRc> {
        self.semantics
            .items()
            .iter()
            .find(|semantic| semantic.attributes().contains(kind))
            .and_then(|semantic| semantic.method())
    }
}

impl OwnedItem<PropertyMap> for Property {
    fn has_owner(&self) -> bool {
        self.property_map().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<PropertyMap>>) {
        self.property_map.set(owner);
        *write_lock!(self.image) = Weak::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{MethodAttributes, MethodDef, TypeAttributes, TypeDef};

    // PROPERTY HASTHIS int32
    const SIGNATURE: [u8; 3] = [0x28, 0x00, 0x08];

    #[test]
    fn attach_and_accessors() {
        let flags = PropertyAttributes::empty();
        let count = Property::new("Count", SIGNATURE.to_vec(), flags).unwrap();
        assert_eq!(count.full_name(), "Count");

        let list = TypeDef::new("Demo", "List", TypeAttributes::PUBLIC).unwrap();
        let map = PropertyMap::new(&list);
        map.properties().push(count.clone()).unwrap();
        assert_eq!(count.full_name(), "Demo.List::Count");

        let getter = MethodDef::new(
            "get_Count",
            MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME,
            vec![0x20, 0x00, 0x08],
        )
        .unwrap();
        count
            .semantics()
            .push(MethodSemantics::new(MethodSemanticsAttributes::GETTER, getter.clone()))
            .unwrap();

        assert!(Arc::ptr_eq(&count.get_method().unwrap(), &getter));
        assert!(count.set_method().is_none());
    }

    #[test]
    fn invalid_arguments() {
        assert!(matches!(
            Property::new("", SIGNATURE.to_vec(), PropertyAttributes::empty()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Property::new("Count", Vec::new(), PropertyAttributes::empty()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
