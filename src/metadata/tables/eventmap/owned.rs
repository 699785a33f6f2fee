use std::sync::{Arc, Weak};

use crate::metadata::{
    collections::OwnedCollection,
    image::{deferred, with_image, MetadataImage},
    lazy::LazyValue,
    tables::{Event, EventMapRaw, EventMapRc, TableId, TypeDef, TypeDefRc},
    token::Token,
};

/// Links a type to the events it declares.
///
/// The parent type owns the map, the map owns the events. An event reaches its declaring type
/// through its map.
pub struct EventMap {
    /// Token of the backing row, rid 0 for maps that were never written
    pub token: Token,
    image: Weak<MetadataImage>,
    parent: LazyValue<Option<Weak<TypeDef>>>,
    events: OwnedCollection<EventMap, Event>,
}

impl EventMap {
    /// Creates an empty map and installs it on `parent`, replacing any previous one
    #[must_use]
    pub fn new(parent: &TypeDefRc) -> EventMapRc {
        let map = Arc::new_cyclic(|this| EventMap {
            token: Token::from_parts(TableId::EventMap, 0),
            image: Weak::new(),
            parent: LazyValue::from_value(None),
            events: OwnedCollection::new(this.clone()),
        });
        parent.set_event_map(Some(map.clone()));

        map
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: EventMapRaw) -> EventMapRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| EventMap {
            token,
            parent: deferred(&image, move |image| {
                image
                    .resolve_index::<TypeDef>(token, raw.parent)
                    .map(|parent| Arc::downgrade(&parent))
            }),
            events: OwnedCollection::from_thunk(this.clone(), {
                let image = image.clone();
                move || {
                    with_image(&image, |image| {
                        image.range_members::<Event>(TableId::EventMap, rid, 1)
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

    /// The type owning the events
    #[must_use]
    pub fn parent(&self) -> Option<TypeDefRc> {
        self.parent.get().and_then(|parent| parent.upgrade())
    }

    /// Moves the whole map to another type
    pub fn set_parent(self: &Arc<Self>, parent: &TypeDefRc) {
        parent.set_event_map(Some(self.clone()));
    }

    pub(crate) fn attach(&self, parent: Option<Weak<TypeDef>>) {
        self.parent.set(parent);
    }

    /// The events of the parent type
    #[must_use]
    pub fn events(&self) -> &OwnedCollection<EventMap, Event> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{EventAttributes, TypeAttributes, TypeRef};

    #[test]
    fn events_follow_parent() {
        let foo = TypeDef::new("Demo", "Foo", TypeAttributes::PUBLIC).unwrap();
        let bar = TypeDef::new("Demo", "Bar", TypeAttributes::PUBLIC).unwrap();
        let map = EventMap::new(&foo);
        assert!(Arc::ptr_eq(&foo.event_map().unwrap(), &map));

        let changed = Event::new("Changed", bar.clone().into(), EventAttributes::empty()).unwrap();
        map.events().push(changed.clone()).unwrap();
        assert_eq!(changed.full_name(), "Demo.Foo::Changed");

        map.set_parent(&bar);
        assert_eq!(changed.full_name(), "Demo.Bar::Changed");
        assert!(Arc::ptr_eq(&changed.declaring_type().unwrap(), &bar));
        assert!(foo.event_map().is_none());
        assert!(Arc::ptr_eq(&bar.event_map().unwrap(), &map));
    }

    #[test]
    fn type_keeps_its_map() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let handler = TypeRef::new(None, "System", "EventHandler").unwrap();
        let changed = Event::new("Changed", handler.into(), EventAttributes::empty()).unwrap();

        let map = EventMap::new(&foo);
        map.events().push(changed.clone()).unwrap();
        drop(map);

        assert_eq!(changed.full_name(), "Foo::Changed");
        assert!(Arc::ptr_eq(&changed.declaring_type().unwrap(), &foo));
        assert_eq!(foo.event_map().unwrap().events().len(), 1);
    }

    #[test]
    fn replacing_a_map_detaches_the_old_one() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let first = EventMap::new(&foo);
        let second = EventMap::new(&foo);

        assert!(first.parent().is_none());
        assert!(Arc::ptr_eq(&second.parent().unwrap(), &foo));

        foo.set_event_map(None);
        assert!(second.parent().is_none());
        assert!(foo.event_map().is_none());
    }
}
