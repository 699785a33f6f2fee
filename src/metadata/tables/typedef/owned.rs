use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        collections::OwnedCollection,
        image::{deferred, with_image, MetadataImage},
        lazy::LazyValue,
        member::TypeDefOrRef,
        tables::{
            CodedIndexType, CustomAttribute, EventMap, EventMapRc, GenericParam, MethodDef,
            PropertyMap, PropertyMapRc, TableId, TypeAttributes, TypeDefRaw, TypeDefRc,
        },
        token::Token,
    },
    Error, Result,
};

/// A type defined in this module.
///
/// Owns its methods, generic parameters, custom attributes and its event and property maps.
/// The base type is a forward reference and keeps the base alive.
pub struct TypeDef {
    /// Token of the backing row, rid 0 for types that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    flags: LazyValue<TypeAttributes>,
    name: LazyValue<String>,
    namespace: LazyValue<String>,
    base_type: LazyValue<Option<TypeDefOrRef>>,
    methods: OwnedCollection<TypeDef, MethodDef>,
    generic_params: OwnedCollection<TypeDef, GenericParam>,
    custom_attributes: OwnedCollection<TypeDef, CustomAttribute>,
    event_map: LazyValue<Option<EventMapRc>>,
    property_map: LazyValue<Option<PropertyMapRc>>,
}

impl TypeDef {
    /// Creates a new type without a base type
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty
    pub fn new(namespace: &str, name: &str, flags: TypeAttributes) -> Result<TypeDefRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("A type requires a name".to_string()));
        }

        Ok(Arc::new_cyclic(|this| TypeDef {
            token: Token::from_parts(TableId::TypeDef, 0),
            image: Weak::new(),
            flags: LazyValue::from_value(flags),
            name: LazyValue::from_value(name.to_string()),
            namespace: LazyValue::from_value(namespace.to_string()),
            base_type: LazyValue::from_value(None),
            methods: OwnedCollection::new(this.clone()),
            generic_params: OwnedCollection::new(this.clone()),
            custom_attributes: OwnedCollection::new(this.clone()),
            event_map: LazyValue::from_value(None),
            property_map: LazyValue::from_value(None),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: TypeDefRaw) -> TypeDefRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| TypeDef {
            token,
            flags: LazyValue::from_value(TypeAttributes::from_bits_retain(raw.flags)),
            name: deferred(&image, move |image| image.string(token, raw.type_name)),
            namespace: deferred(&image, move |image| image.string(token, raw.type_namespace)),
            base_type: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::TypeDefOrRef, raw.extends)
                    .and_then(TypeDefOrRef::from_member)
            }),
            methods: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.range_members::<MethodDef>(TableId::TypeDef, rid, 5)
                    })
                }
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
            // EventMap.Parent is not sorted
            event_map: deferred(&image, move |image| image.scan_member::<EventMap>(token, 0)),
            property_map: deferred(&image, move |image| {
                image.scan_member::<PropertyMap>(token, 0)
            }),
            image,
        })
    }

    /// The image this type was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// Type attributes
    #[must_use]
    pub fn flags(&self) -> TypeAttributes {
        self.flags.get()
    }

    /// Replaces the type attributes
    pub fn set_flags(&self, flags: TypeAttributes) {
        self.flags.set(flags);
    }

    /// Simple name of the type
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the type
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// Namespace of the type, empty for global types
    #[must_use]
    pub fn namespace(&self) -> String {
        self.namespace.get()
    }

    /// Moves the type into another namespace
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

    /// The type this type extends, `None` for interfaces and `System.Object`
    #[must_use]
    pub fn base_type(&self) -> Option<TypeDefOrRef> {
        self.base_type.get()
    }

    /// Replaces the base type
    pub fn set_base_type(&self, base_type: Option<TypeDefOrRef>) {
        self.base_type.set(base_type);
    }

    /// Methods declared by this type
    #[must_use]
    pub fn methods(&self) -> &OwnedCollection<TypeDef, MethodDef> {
        &self.methods
    }

    /// Generic parameters of this type
    #[must_use]
    pub fn generic_params(&self) -> &OwnedCollection<TypeDef, GenericParam> {
        &self.generic_params
    }

    /// Custom attributes applied to this type
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<TypeDef, CustomAttribute> {
        &self.custom_attributes
    }

    /// The map holding the events of this type
    #[must_use]
    pub fn event_map(&self) -> Option<EventMapRc> {
        self.event_map.get()
    }

    /// Replaces the event map of this type.
    ///
    /// The new map is detached from its previous type, the old map is left without a parent.
    pub fn set_event_map(self: &Arc<Self>, map: Option<EventMapRc>) {
        let previous = self.event_map.get();
        if let Some(previous) = previous.filter(|old| !is_same(old, map.as_ref())) {
            previous.attach(None);
        }

        if let Some(map) = &map {
            if let Some(owner) = map.parent().filter(|owner| !Arc::ptr_eq(owner, self)) {
                if owner.event_map().is_some_and(|old| Arc::ptr_eq(&old, map)) {
                    owner.event_map.set(None);
                }
            }
            map.attach(Some(Arc::downgrade(self)));
        }

        self.event_map.set(map);
    }

    /// The map holding the properties of this type
    #[must_use]
    pub fn property_map(&self) -> Option<PropertyMapRc> {
        self.property_map.get()
    }

    /// Replaces the property map of this type.
    ///
    /// The new map is detached from its previous type, the old map is left without a parent.
    pub fn set_property_map(self: &Arc<Self>, map: Option<PropertyMapRc>) {
        let previous = self.property_map.get();
        if let Some(previous) = previous.filter(|old| !is_same(old, map.as_ref())) {
            previous.attach(None);
        }

        if let Some(map) = &map {
            if let Some(owner) = map.parent().filter(|owner| !Arc::ptr_eq(owner, self)) {
                if owner.property_map().is_some_and(|old| Arc::ptr_eq(&old, map)) {
                    owner.property_map.set(None);
                }
            }
            map.attach(Some(Arc::downgrade(self)));
        }

        self.property_map.set(map);
    }
}

fn is_same<T>(current: &Arc<T>, other: Option<&Arc<T>>) -> bool {
    other.is_some_and(|other| Arc::ptr_eq(current, other))
}
