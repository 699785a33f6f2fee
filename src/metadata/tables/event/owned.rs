use std::sync::{Arc, RwLock, Weak};

use crate::{
    metadata::{
        collections::{OwnedCollection, OwnedItem},
        image::{deferred, with_image, MetadataImage},
        lazy::LazyValue,
        member::TypeDefOrRef,
        tables::{
            CodedIndexType, CustomAttribute, EventAttributes, EventMap, EventMapRc, EventRaw,
            EventRc, MethodDefRc, MethodSemantics, MethodSemanticsAttributes, TableId, TypeDefRc,
        },
        token::Token,
    },
    Error, Result,
};

/// An event declared by a type.
///
/// The owning map is a back-reference. The image of an attached event is the image of its map,
/// so an event moved into another map reports that map's image.
pub struct Event {
    /// Token of the backing row, rid 0 for events that were never written
    pub token: Token,
    image: RwLock<Weak<MetadataImage>>,
    flags: LazyValue<EventAttributes>,
    name: LazyValue<String>,
    event_type: LazyValue<Option<TypeDefOrRef>>,
    event_map: LazyValue<Option<Weak<EventMap>>>,
    semantics: OwnedCollection<Event, MethodSemantics>,
    custom_attributes: OwnedCollection<Event, CustomAttribute>,
}

impl Event {
    /// Creates a new, unattached event whose handlers are of `event_type`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `name` is empty
    pub fn new(name: &str, event_type: TypeDefOrRef, flags: EventAttributes) -> Result<EventRc> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("An event requires a name".to_string()));
        }

        Ok(Arc::new_cyclic(|this| Event {
            token: Token::from_parts(TableId::Event, 0),
            image: RwLock::new(Weak::new()),
            flags: LazyValue::from_value(flags),
            name: LazyValue::from_value(name.to_string()),
            event_type: LazyValue::from_value(Some(event_type)),
            event_map: LazyValue::from_value(None),
            semantics: OwnedCollection::new(this.clone()),
            custom_attributes: OwnedCollection::new(this.clone()),
        }))
    }

    pub(crate) fn from_raw(image: Weak<MetadataImage>, raw: EventRaw) -> EventRc {
        let token = raw.token;
        let rid = raw.rid;

        Arc::new_cyclic(|this| Event {
            token,
            flags: LazyValue::from_value(EventAttributes::from_bits_retain(raw.flags)),
            name: deferred(&image, move |image| image.string(token, raw.name)),
            event_type: deferred(&image, move |image| {
                image
                    .resolve_coded(token, CodedIndexType::TypeDefOrRef, raw.event_type)
                    .and_then(TypeDefOrRef::from_member)
            }),
            event_map: deferred(&image, move |image| {
                image
                    .range_owner::<EventMap>(1, rid)
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

    /// The image of the owning map, or the image this event was loaded from
    #[must_use]
    pub fn image(&self) -> Option<Arc<MetadataImage>> {
        // Does not resolve the owner
        if !self.event_map.is_initialized() {
            return read_lock!(self.image).upgrade();
        }

        self.event_map()
            .and_then(|map| map.image())
            .or_else(|| read_lock!(self.image).upgrade())
    }

    /// Event attributes
    #[must_use]
    pub fn flags(&self) -> EventAttributes {
        self.flags.get()
    }

    /// Replaces the event attributes
    pub fn set_flags(&self, flags: EventAttributes) {
        self.flags.set(flags);
    }

    /// Simple name of the event
    #[must_use]
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Renames the event
    pub fn set_name(&self, name: &str) {
        self.name.set(name.to_string());
    }

    /// The delegate type of the event's handlers. `None` if the row references a type that
    /// does not resolve.
    #[must_use]
    pub fn event_type(&self) -> Option<TypeDefOrRef> {
        self.event_type.get()
    }

    /// Replaces the delegate type
    pub fn set_event_type(&self, event_type: TypeDefOrRef) {
        self.event_type.set(Some(event_type));
    }

    /// The map owning this event
    #[must_use]
    pub fn event_map(&self) -> Option<EventMapRc> {
        self.event_map.get().and_then(|map| map.upgrade())
    }

    /// The type declaring this event, through its map
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDefRc> {
        self.event_map().and_then(|map| map.parent())
    }

    /// `Type::Name`, or just the name for detached events
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.declaring_type() {
            Some(ty) => format!("{}::{}", ty.full_name(), self.name()),
            None => self.name(),
        }
    }

    /// Accessor methods attached to this event
    #[must_use]
    pub fn semantics(&self) -> &OwnedCollection<Event, MethodSemantics> {
        &self.semantics
    }

    /// Custom attributes applied to this event
    #[must_use]
    pub fn custom_attributes(&self) -> &OwnedCollection<Event, CustomAttribute> {
        &self.custom_attributes
    }

    /// The `add` accessor
    #[must_use]
    pub fn add_method(&self) -> Option<MethodDefRc> {
        self.accessor(MethodSemanticsAttributes::ADD_ON)
    }

    /// The `remove` accessor
    #[must_use]
    pub fn remove_method(&self) -> Option<MethodDefRc> {
        self.accessor(MethodSemanticsAttributes::REMOVE_ON)
    }

    /// The `raise` accessor
    #[must_use]
    pub fn raise_method(&self) -> Option<MethodDefRc> {
        self.accessor(MethodSemanticsAttributes::FIRE)
    }

    /// Accessors that are neither add, remove nor raise
    #[must_use]
    pub fn other_methods(&self) -> Vec<MethodDefRc> {
        self.semantics
            .items()
            .iter()
            .filter(|semantic| semantic.attributes().contains(MethodSemanticsAttributes::OTHER))
            .filter_map(|semantic| semantic.method())
            .collect()
    }

    fn accessor(&self, kind: MethodSemanticsAttributes) -> Option<MethodDefRc> {
        self.semantics
            .items()
            .iter()
            .find(|semantic| semantic.attributes().contains(kind))
            .and_then(|semantic| semantic.method())
    }
}

impl OwnedItem<EventMap> for Event {
    fn has_owner(&self) -> bool {
        self.event_map().is_some()
    }

    fn set_owner(&self, owner: Option<Weak<EventMap>>) {
        self.event_map.set(owner);
        // The image now comes from the new map
        *write_lock!(self.image) = Weak::new();
    }
}
