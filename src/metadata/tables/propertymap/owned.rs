use std::sync::{Arc, Weak};

use crate::metadata::{
    collections::OwnedCollection,
    image::{deferred, with_image, MetadataImage},
    lazy::LazyValue,
    tables::{Property, PropertyMapRaw, PropertyMapRc, TableId, TypeDef, TypeDefRc},
    token::Token,
};

/// Links a type to the properties it declares
pub struct PropertyMap {
    /// Token of the backing row, rid 0 for maps that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    parent: LazyValue<Option<Weak<TypeDef>>>,
    properties: OwnedCollection<PropertyMap, Property>,
}

impl PropertyMap {
    /// Creates an empty map and installs it on `parent`, replacing any previous one
    #[must_use]
    pub fn new(parent: &TypeDefRc) -> PropertyMapRc {
        let map = Arc::new_cyclic(|this| PropertyMap {
            token: Token::from_parts(TableId::PropertyMap, 0),
            image: Weak::new(),
            parent: LazyValue::from_value(None),
            properties: OwnedCollection::new(this.clone()),
        });
        parent.set_property_map(Some(map.clone()));

        map
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: PropertyMapRaw) -> PropertyMapRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| PropertyMap {
            token,
            parent: deferred(&image, move |image| {
                image
                    .resolve_index::<TypeDef>(token, raw.parent)
                    .map(|parent| Arc::downgrade(&parent))
            }),
            properties: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.range_members::<Property>(TableId::PropertyMap, rid, 1)
                    })
                }
            }),
            image,
        })
    }

    /// The image this map was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        self.image.upgrade()
    }

    /// The type owning the properties
    #[must_use]
    pub fn parent(&self) -> Option<TypeDefRc> {
        self.parent.get().and_then(|parent| parent.upgrade())
    }

    /// Moves the whole map to another type
    pub fn set_parent(self: &Arc<Self>, parent: &TypeDefRc) {
        parent.set_property_map(Some(self.clone()));
    }

    pub(crate) fn attach(&self, parent: Option<Weak<TypeDef>>) {
        self.parent.set(parent);
    }

    /// The properties of the parent type
    #[must_use]
    pub fn properties(&self) -> &OwnedCollection<PropertyMap, Property> {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{PropertyAttributes, TypeAttributes};

    #[test]
    fn type_keeps_its_map() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let count = Property::new("Count", vec![0x28, 0x00, 0x08], PropertyAttributes::empty())
            .unwrap();

        PropertyMap::new(&foo).properties().push(count.clone()).unwrap();
        assert_eq!(count.full_name(), "Foo::Count");

        let bar = TypeDef::new("", "Bar", TypeAttributes::PUBLIC).unwrap();
        foo.property_map().unwrap().set_parent(&bar);
        assert!(foo.property_map().is_none());
        assert_eq!(count.full_name(), "Bar::Count");
    }
}
