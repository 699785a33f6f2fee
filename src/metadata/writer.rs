//! Write-back of member objects into tables and heaps.
//!
//! [`MetadataWriter`] takes member objects (synthetic, row-backed or mixed), assigns every one
//! of them a token and encodes them into rows with the same coded index schema that the
//! resolution path decodes with. The result is a fresh [`MetadataImage`], whose tables stream
//! can be serialized with [`MetadataImage::to_bytes`].
//!
//! # Token assignment
//!
//! Tokens are assigned in insertion order. Adding a type also adds its methods, generic
//! parameters, constraints, custom attributes and its event and property maps, so each type's
//! methods form one contiguous range, as the `TypeDef.MethodList` column requires. Event and
//! property maps work the same way for their events and properties.
//!
//! Tables that are sorted by an owner column are ordered in [`MetadataWriter::finish`]:
//! generic parameters and constraints get their rids after sorting (they can be referenced),
//! custom attributes and method semantics are sorted after encoding (they can not).
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilgraph::prelude::*;
//!
//! let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC)?;
//! let mut writer = MetadataWriter::new();
//! writer.add_type_def(&foo);
//! let image = writer.finish()?;
//! ```

use std::{collections::HashMap, sync::Arc};

use crate::{
    metadata::{
        image::MetadataImage,
        member::{Member, MemberKind},
        streams::{BlobHeapBuilder, StringHeapBuilder, TableStream},
        tables::{
            CodedIndexType, CustomAttributeRc, EventMapRc, EventRc, GenericParamConstraintRc,
            GenericParamRc, MemberRefRc, MetadataTable, MethodDefRc, MethodSemanticsRc,
            PropertyMapRc, PropertyRc, TableId, TypeDefRc, TypeRefRc, TypeSpecRc,
        },
        token::Token,
    },
    Error, Result,
};

/// Collects member objects and encodes them into a new [`MetadataImage`]
#[derive(Default)]
pub struct MetadataWriter {
    tokens: HashMap<(TableId, usize), Token>,
    type_refs: Vec<TypeRefRc>,
    type_defs: Vec<(TypeDefRc, u32)>,
    methods: Vec<MethodDefRc>,
    member_refs: Vec<MemberRefRc>,
    type_specs: Vec<TypeSpecRc>,
    event_maps: Vec<(EventMapRc, u32)>,
    events: Vec<EventRc>,
    property_maps: Vec<(PropertyMapRc, u32)>,
    properties: Vec<PropertyRc>,
    semantics: Vec<(Member, MethodSemanticsRc)>,
    custom_attributes: Vec<(Member, CustomAttributeRc)>,
    generic_params: Vec<(Member, GenericParamRc)>,
    constraints: Vec<GenericParamConstraintRc>,
}

impl MetadataWriter {
    /// Creates an empty writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The token assigned to `member`.
    ///
    /// Generic parameters and constraints only have tokens once [`MetadataWriter::finish`]
    /// has sorted them.
    ///
    /// # Errors
    /// Returns [`Error::UnassignedToken`] if `member` was never added
    pub fn token(&self, member: &Member) -> Result<Token> {
        self.tokens
            .get(&(member.table_id(), member.address()))
            .copied()
            .ok_or(Error::UnassignedToken(member.token()))
    }

    /// Adds a type reference
    pub fn add_type_ref(&mut self, ty: &TypeRefRc) -> Token {
        if let Some(token) = self.assigned(ty) {
            return token;
        }

        self.type_refs.push(ty.clone());
        self.assign(ty, self.type_refs.len())
    }

    /// Adds a type specification
    pub fn add_type_spec(&mut self, ty: &TypeSpecRc) -> Token {
        if let Some(token) = self.assigned(ty) {
            return token;
        }

        self.type_specs.push(ty.clone());
        self.assign(ty, self.type_specs.len())
    }

    /// Adds a member reference
    pub fn add_member_ref(&mut self, member: &MemberRefRc) -> Token {
        if let Some(token) = self.assigned(member) {
            return token;
        }

        self.member_refs.push(member.clone());
        self.assign(member, self.member_refs.len())
    }

    /// Adds a type with its methods, generic parameters, custom attributes and maps
    pub fn add_type_def(&mut self, ty: &TypeDefRc) -> Token {
        if let Some(token) = self.assigned(ty) {
            return token;
        }

        let method_list = next_rid(self.methods.len());
        self.type_defs.push((ty.clone(), method_list));
        let token = self.assign(ty, self.type_defs.len());

        let owner = Member::TypeDef(ty.clone());
        self.add_generic_params(&owner, ty.generic_params().items());
        self.add_custom_attributes(&owner, ty.custom_attributes().items());

        for method in ty.methods().items() {
            if self.assigned(&method).is_some() {
                continue;
            }

            self.methods.push(method.clone());
            self.assign(&method, self.methods.len());

            let owner = Member::MethodDef(method.clone());
            self.add_generic_params(&owner, method.generic_params().items());
            self.add_custom_attributes(&owner, method.custom_attributes().items());
        }

        if let Some(map) = ty.event_map() {
            self.add_event_map(&map);
        }
        if let Some(map) = ty.property_map() {
            self.add_property_map(&map);
        }

        token
    }

    /// Adds an event map with its events, their accessors and custom attributes.
    ///
    /// The parent type and the accessor methods have to be added as well before
    /// [`MetadataWriter::finish`].
    pub fn add_event_map(&mut self, map: &EventMapRc) -> Token {
        if let Some(token) = self.assigned(map) {
            return token;
        }

        let event_list = next_rid(self.events.len());
        self.event_maps.push((map.clone(), event_list));
        let token = self.assign(map, self.event_maps.len());

        for event in map.events().items() {
            if self.assigned(&event).is_some() {
                continue;
            }

            self.events.push(event.clone());
            self.assign(&event, self.events.len());

            let owner = Member::Event(event.clone());
            for semantic in event.semantics().items() {
                self.semantics.push((owner.clone(), semantic));
            }
            self.add_custom_attributes(&owner, event.custom_attributes().items());
        }

        token
    }

    /// Adds a property map with its properties, their accessors and custom attributes
    pub fn add_property_map(&mut self, map: &PropertyMapRc) -> Token {
        if let Some(token) = self.assigned(map) {
            return token;
        }

        let property_list = next_rid(self.properties.len());
        self.property_maps.push((map.clone(), property_list));
        let token = self.assign(map, self.property_maps.len());

        for property in map.properties().items() {
            if self.assigned(&property).is_some() {
                continue;
            }

            self.properties.push(property.clone());
            self.assign(&property, self.properties.len());

            let owner = Member::Property(property.clone());
            for semantic in property.semantics().items() {
                self.semantics.push((owner.clone(), semantic));
            }
            self.add_custom_attributes(&owner, property.custom_attributes().items());
        }

        token
    }

    /// Encodes everything added so far into a new image.
    ///
    /// # Errors
    /// Returns [`Error::UnassignedToken`] if a member references a member that was never added,
    /// [`Error::InvalidArgument`] if a reference can not be encoded in its column, or an error
    /// from building the heaps and tables
    pub fn finish(mut self) -> Result<Arc<MetadataImage>> {
        let mut strings = StringHeapBuilder::new();
        let mut blobs = BlobHeapBuilder::new();

        // Generic parameters are sorted by owner and number, constraints by parameter. Both can
        // be referenced, so their rids are fixed before anything is encoded.
        let mut generic_params = Vec::with_capacity(self.generic_params.len());
        for (owner, param) in std::mem::take(&mut self.generic_params) {
            let owner = self.encode(CodedIndexType::TypeOrMethodDef, &owner)?;
            generic_params.push((owner, param));
        }
        generic_params.sort_by_key(|(owner, param)| (*owner, param.number()));
        for (index, (_, param)) in generic_params.iter().enumerate() {
            self.assign(param, index + 1);
        }

        let mut constraints = Vec::with_capacity(self.constraints.len());
        for constraint in std::mem::take(&mut self.constraints) {
            let owner = match constraint.owner() {
                Some(owner) => self.rid(&Member::GenericParam(owner))?,
                None => 0,
            };
            constraints.push((owner, constraint));
        }
        constraints.sort_by_key(|(owner, _)| *owner);
        for (index, (_, constraint)) in constraints.iter().enumerate() {
            self.assign(constraint, index + 1);
        }

        let mut tables = Vec::new();

        let mut rows = Vec::with_capacity(self.type_refs.len());
        for ty in &self.type_refs {
            let scope = match ty.resolution_scope() {
                Some(scope) => CodedIndexType::ResolutionScope.encode(scope)?,
                None => 0,
            };
            rows.push(vec![
                scope,
                strings.add(&ty.name())?,
                strings.add(&ty.namespace())?,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::TypeRef, rows)?);

        let mut rows = Vec::with_capacity(self.type_defs.len());
        for (ty, method_list) in &self.type_defs {
            let extends = match ty.base_type() {
                Some(base) => self.encode(CodedIndexType::TypeDefOrRef, &base.to_member())?,
                None => 0,
            };
            rows.push(vec![
                ty.flags().bits(),
                strings.add(&ty.name())?,
                strings.add(&ty.namespace())?,
                extends,
                1,
                *method_list,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::TypeDef, rows)?);

        let mut rows = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            rows.push(vec![
                method.rva(),
                method.impl_flags(),
                method.flags().bits(),
                strings.add(&method.name())?,
                blobs.add(&method.signature())?,
                1,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::MethodDef, rows)?);

        let mut rows = Vec::with_capacity(self.member_refs.len());
        for member in &self.member_refs {
            let class = match member.class() {
                Some(class) => self.encode(CodedIndexType::MemberRefParent, &class)?,
                None => 0,
            };
            rows.push(vec![
                class,
                strings.add(&member.name())?,
                blobs.add(&member.signature())?,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::MemberRef, rows)?);

        let mut rows = Vec::with_capacity(self.type_specs.len());
        for ty in &self.type_specs {
            rows.push(vec![blobs.add(&ty.signature())?]);
        }
        tables.push(MetadataTable::with_rows(TableId::TypeSpec, rows)?);

        let mut rows = Vec::with_capacity(self.event_maps.len());
        for (map, event_list) in &self.event_maps {
            rows.push(vec![self.parent_rid(map.parent(), map.token)?, *event_list]);
        }
        tables.push(MetadataTable::with_rows(TableId::EventMap, rows)?);

        let mut rows = Vec::with_capacity(self.events.len());
        for event in &self.events {
            let event_type = match event.event_type() {
                Some(ty) => self.encode(CodedIndexType::TypeDefOrRef, &ty.to_member())?,
                None => 0,
            };
            rows.push(vec![
                event.flags().bits(),
                strings.add(&event.name())?,
                event_type,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::Event, rows)?);

        let mut rows = Vec::with_capacity(self.property_maps.len());
        for (map, property_list) in &self.property_maps {
            rows.push(vec![
                self.parent_rid(map.parent(), map.token)?,
                *property_list,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::PropertyMap, rows)?);

        let mut rows = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            rows.push(vec![
                property.flags().bits(),
                strings.add(&property.name())?,
                blobs.add(&property.signature())?,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::Property, rows)?);

        let mut rows = Vec::with_capacity(self.semantics.len());
        for (association, semantic) in &self.semantics {
            let method = match semantic.method() {
                Some(method) => self.rid(&Member::MethodDef(method))?,
                None => 0,
            };
            rows.push(vec![
                semantic.attributes().bits(),
                method,
                self.encode(CodedIndexType::HasSemantics, association)?,
            ]);
        }
        let mut table = MetadataTable::with_rows(TableId::MethodSemantics, rows)?;
        table.sort_by_column(2);
        tables.push(table);

        let mut rows = Vec::with_capacity(self.custom_attributes.len());
        for (parent, attribute) in &self.custom_attributes {
            let Some(constructor) = attribute.constructor() else {
                return Err(Error::InvalidArgument(format!(
                    "Custom attribute {} has no constructor",
                    attribute.token
                )));
            };
            rows.push(vec![
                self.encode(CodedIndexType::HasCustomAttribute, parent)?,
                self.encode(CodedIndexType::CustomAttributeType, &constructor)?,
                blobs.add(&attribute.value())?,
            ]);
        }
        let mut table = MetadataTable::with_rows(TableId::CustomAttribute, rows)?;
        table.sort_by_column(0);
        tables.push(table);

        let mut rows = Vec::with_capacity(generic_params.len());
        for (owner, param) in &generic_params {
            rows.push(vec![
                param.number(),
                param.flags().bits(),
                *owner,
                strings.add(&param.name())?,
            ]);
        }
        tables.push(MetadataTable::with_rows(TableId::GenericParam, rows)?);

        let mut rows = Vec::with_capacity(constraints.len());
        for (owner, constraint) in &constraints {
            let ty = match constraint.constraint() {
                Some(ty) => self.encode(CodedIndexType::TypeDefOrRef, &ty.to_member())?,
                None => 0,
            };
            rows.push(vec![*owner, ty]);
        }
        tables.push(MetadataTable::with_rows(
            TableId::GenericParamConstraint,
            rows,
        )?);

        tracing::debug!(
            types = self.type_defs.len(),
            methods = self.methods.len(),
            events = self.events.len(),
            properties = self.properties.len(),
            "encoded metadata"
        );

        MetadataImage::new(
            TableStream::from_tables(tables.into_iter().filter(|table| !table.is_empty())),
            strings.finish(),
            blobs.finish(),
        )
    }

    fn add_generic_params(&mut self, owner: &Member, params: Vec<GenericParamRc>) {
        for param in params {
            let member = Member::GenericParam(param.clone());
            self.add_custom_attributes(&member, param.custom_attributes().items());
            for constraint in param.constraints().items() {
                self.add_custom_attributes(
                    &Member::GenericParamConstraint(constraint.clone()),
                    constraint.custom_attributes().items(),
                );
                self.constraints.push(constraint);
            }

            self.generic_params.push((owner.clone(), param));
        }
    }

    fn add_custom_attributes(&mut self, parent: &Member, attributes: Vec<CustomAttributeRc>) {
        for attribute in attributes {
            self.custom_attributes.push((parent.clone(), attribute));
        }
    }

    fn assigned<T: MemberKind>(&self, member: &Arc<T>) -> Option<Token> {
        self.tokens
            .get(&(T::TABLE, Arc::as_ptr(member) as usize))
            .copied()
    }

    fn assign<T: MemberKind>(&mut self, member: &Arc<T>, index: usize) -> Token {
        let token = Token::from_parts(T::TABLE, next_rid(index - 1));
        self.tokens
            .insert((T::TABLE, Arc::as_ptr(member) as usize), token);
        token
    }

    fn rid(&self, member: &Member) -> Result<u32> {
        self.token(member).map(|token| token.row())
    }

    fn encode(&self, index_type: CodedIndexType, member: &Member) -> Result<u32> {
        index_type.encode(self.token(member)?)
    }

    fn parent_rid(&self, parent: Option<TypeDefRc>, map: Token) -> Result<u32> {
        match parent {
            Some(parent) => self.rid(&Member::TypeDef(parent)),
            None => Err(Error::InvalidArgument(format!("Map {map} has no parent type"))),
        }
    }
}

/// The rid following `count` rows
fn next_rid(count: usize) -> u32 {
    u32::try_from(count + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{
        CustomAttribute, Event, EventAttributes, EventMap, GenericParam, GenericParamAttributes,
        GenericParamConstraint, MemberRef, MethodAttributes, MethodDef, MethodSemantics,
        MethodSemanticsAttributes, TypeAttributes, TypeDef, TypeRef,
    };

    #[test]
    fn tokens_follow_insertion_order() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let bar = TypeDef::new("", "Bar", TypeAttributes::PUBLIC).unwrap();
        let run = MethodDef::new("Run", MethodAttributes::PUBLIC, vec![0x00, 0x00, 0x01]).unwrap();
        bar.methods().push(run.clone()).unwrap();

        let mut writer = MetadataWriter::new();
        assert_eq!(writer.add_type_def(&foo), Token::new(0x0200_0001));
        assert_eq!(writer.add_type_def(&bar), Token::new(0x0200_0002));
        assert_eq!(writer.add_type_def(&foo), Token::new(0x0200_0001));
        assert_eq!(
            writer.token(&Member::MethodDef(run)).unwrap(),
            Token::new(0x0600_0001)
        );
    }

    #[test]
    fn unassigned_reference() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let handler = TypeRef::new(None, "System", "EventHandler").unwrap();
        let map = EventMap::new(&foo);
        let changed = Event::new("Changed", handler.into(), EventAttributes::empty()).unwrap();
        map.events().push(changed).unwrap();

        let mut writer = MetadataWriter::new();
        writer.add_type_def(&foo);
        writer.add_event_map(&map);

        // The event type was never added
        assert!(matches!(writer.finish(), Err(Error::UnassignedToken(_))));
    }

    #[test]
    fn method_ranges() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let empty = TypeDef::new("", "Empty", TypeAttributes::PUBLIC).unwrap();
        let bar = TypeDef::new("", "Bar", TypeAttributes::PUBLIC).unwrap();
        for (ty, name) in [(&foo, "A"), (&foo, "B"), (&bar, "C")] {
            let method =
                MethodDef::new(name, MethodAttributes::PUBLIC, vec![0x00, 0x00, 0x01]).unwrap();
            ty.methods().push(method).unwrap();
        }

        let mut writer = MetadataWriter::new();
        writer.add_type_def(&foo);
        writer.add_type_def(&empty);
        writer.add_type_def(&bar);
        let image = writer.finish().unwrap();

        let types = image.members_of::<TypeDef>();
        let names: Vec<Vec<String>> = types
            .iter()
            .map(|ty| ty.methods().items().iter().map(|m| m.name()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["A".to_string(), "B".to_string()],
                Vec::new(),
                vec!["C".to_string()]
            ]
        );

        let c = image
            .try_resolve_member(Token::new(0x0600_0003))
            .unwrap()
            .downcast::<MethodDef>()
            .unwrap();
        assert_eq!(c.full_name(), "Bar::C");
    }

    #[test]
    fn sorted_tables() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let bar = TypeDef::new("", "Bar", TypeAttributes::PUBLIC).unwrap();
        let run = MethodDef::new("Run", MethodAttributes::PUBLIC, vec![0x00, 0x00, 0x01]).unwrap();
        let map_method =
            MethodDef::new("Map", MethodAttributes::PUBLIC, vec![0x30, 0x01, 0x00, 0x01]).unwrap();
        bar.methods().push(run).unwrap();
        bar.methods().push(map_method.clone()).unwrap();

        // U (MethodDef 2) is added before T (TypeDef 2) but sorts after it
        let u = GenericParam::new(0, "U", GenericParamAttributes::empty()).unwrap();
        map_method.generic_params().push(u).unwrap();
        let t = GenericParam::new(0, "T", GenericParamAttributes::empty()).unwrap();
        foo.generic_params().push(t.clone()).unwrap();
        let disposable = TypeRef::new(None, "System", "IDisposable").unwrap();
        t.constraints()
            .push(GenericParamConstraint::new(disposable.clone().into()))
            .unwrap();

        let obsolete = TypeRef::new(None, "System", "ObsoleteAttribute").unwrap();
        let ctor =
            MemberRef::new(obsolete.clone().into(), ".ctor", vec![0x20, 0x00, 0x01]).unwrap();
        bar.custom_attributes()
            .push(CustomAttribute::new(ctor.clone().into(), vec![0x01, 0x00]).unwrap())
            .unwrap();
        foo.custom_attributes()
            .push(CustomAttribute::new(ctor.clone().into(), vec![0x01, 0x00]).unwrap())
            .unwrap();

        let mut writer = MetadataWriter::new();
        writer.add_type_ref(&disposable);
        writer.add_type_ref(&obsolete);
        writer.add_member_ref(&ctor);
        writer.add_type_def(&bar);
        writer.add_type_def(&foo);
        let image = writer.finish().unwrap();

        let params = image.members_of::<GenericParam>();
        let names: Vec<String> = params.iter().map(|param| param.name()).collect();
        assert_eq!(names, vec!["T", "U"]);
        assert_eq!(params[0].constraints().len(), 1);
        assert_eq!(
            params[0].constraints().items()[0]
                .constraint()
                .unwrap()
                .full_name(),
            "System.IDisposable"
        );

        let reloaded_foo = image.type_by_name("", "Foo").unwrap();
        let attributes = reloaded_foo.custom_attributes().items();
        assert_eq!(attributes.len(), 1);
        assert_eq!(
            attributes[0].constructor().unwrap().full_name().unwrap(),
            "System.ObsoleteAttribute::.ctor"
        );
    }

    #[test]
    fn event_accessors() {
        let foo = TypeDef::new("", "Foo", TypeAttributes::PUBLIC).unwrap();
        let add = MethodDef::new(
            "add_Changed",
            MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME,
            vec![0x20, 0x01, 0x01, 0x12, 0x05],
        )
        .unwrap();
        foo.methods().push(add.clone()).unwrap();

        let handler = TypeRef::new(None, "System", "EventHandler").unwrap();
        let changed =
            Event::new("Changed", handler.clone().into(), EventAttributes::empty()).unwrap();
        changed
            .semantics()
            .push(MethodSemantics::new(MethodSemanticsAttributes::ADD_ON, add))
            .unwrap();
        EventMap::new(&foo).events().push(changed).unwrap();

        // The map is only reachable through its type
        let mut writer = MetadataWriter::new();
        writer.add_type_ref(&handler);
        writer.add_type_def(&foo);
        let image = writer.finish().unwrap();

        let event = image
            .try_resolve_member(Token::new(0x1400_0001))
            .unwrap()
            .downcast::<Event>()
            .unwrap();
        assert_eq!(event.full_name(), "Foo::Changed");
        assert_eq!(event.add_method().unwrap().full_name(), "Foo::add_Changed");
        assert!(event.remove_method().is_none());
    }
}
