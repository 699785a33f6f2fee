//! The metadata image: tables, heaps and the identity cache of one module.
//!
//! [`MetadataImage`] is the single entry point into resolution. Every token is resolved at most
//! once per image; later resolutions hand out the same shared object. Construction of a member
//! never forces its attributes, so a member is always cached before anything it references is
//! resolved, and references that lead back to it find the cached object.
//!
//! # Architecture
//!
//! ```text
//! bytes ──> TableStream ──> MetadataImage ──try_resolve_member──> Member (cached)
//!                               │                                  │
//!                               └── StringHeap / BlobHeap <── lazy attribute thunks
//! ```
//!
//! Attribute thunks hold a weak reference back to the image. Data-integrity problems found
//! while evaluating them (malformed coded indices, dangling tokens, unreadable heap entries)
//! degrade only the affected attribute to absence and are reported through `tracing`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilgraph::prelude::*;
//!
//! let image = MetadataImage::from_bytes(&tables, &strings, &blobs)?;
//! let event = image.try_resolve_member(Token::new(0x1400_0001));
//! ```

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    metadata::{
        lazy::LazyValue,
        member::{Member, MemberKind},
        streams::{BlobHeap, StringHeap, TableStream},
        tables::{
            CodedIndexType, CustomAttribute, CustomAttributeRaw, Event, EventMap, EventMapRaw,
            EventRaw, GenericParam, GenericParamConstraint, GenericParamConstraintRaw,
            GenericParamRaw, MemberRef, MemberRefRaw, MetadataRow, MethodDef, MethodDefRaw,
            MethodSemantics, MethodSemanticsRaw, Property, PropertyMap, PropertyMapRaw,
            PropertyRaw, RowDefinition, TableId, TypeDef, TypeDefRaw, TypeDefRc, TypeRef,
            TypeRefRaw, TypeSpec, TypeSpecRaw,
        },
        token::Token,
    },
    Error, Result,
};

type Constructor = fn(Weak<MetadataImage>, &MetadataRow) -> Member;

/// Owner of all tables, heaps and resolved members of one module
pub struct MetadataImage {
    tables: TableStream,
    strings: StringHeap,
    blobs: BlobHeap,
    cache: DashMap<Token, Member>,
    self_ref: Weak<MetadataImage>,
}

impl MetadataImage {
    /// Creates an image over already parsed tables and heaps.
    ///
    /// # Errors
    /// Returns [`Error::UnsortedTable`] if a table that is searched by key is not sorted
    pub fn new(tables: TableStream, strings: StringHeap, blobs: BlobHeap) -> Result<Arc<Self>> {
        tables.validate_sorted()?;

        let image = Arc::new_cyclic(|self_ref| MetadataImage {
            tables,
            strings,
            blobs,
            cache: DashMap::new(),
            self_ref: self_ref.clone(),
        });

        tracing::debug!(
            tables = image.tables.present_tables().count(),
            strings = image.strings.len(),
            blobs = image.blobs.len(),
            "created metadata image"
        );

        Ok(image)
    }

    /// Parses the tables stream and heaps and creates an image over them.
    ///
    /// # Errors
    /// Returns an error if any stream is malformed or a sorted table is out of order
    pub fn from_bytes(tables: &[u8], strings: &[u8], blobs: &[u8]) -> Result<Arc<Self>> {
        MetadataImage::new(
            TableStream::parse(tables)?,
            StringHeap::from(strings)?,
            BlobHeap::from(blobs)?,
        )
    }

    /// Serializes the tables stream, with heap index widths matching this image's heaps.
    ///
    /// # Errors
    /// Returns an error if a value does not fit its column
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let large_str = self.strings.len() > usize::from(u16::MAX);
        let large_blob = self.blobs.len() > usize::from(u16::MAX);
        self.tables.to_bytes(large_str, large_blob)
    }

    /// The tables of this image
    #[must_use]
    pub fn tables(&self) -> &TableStream {
        &self.tables
    }

    /// The `#Strings` heap of this image
    #[must_use]
    pub fn strings(&self) -> &StringHeap {
        &self.strings
    }

    /// The `#Blob` heap of this image
    #[must_use]
    pub fn blobs(&self) -> &BlobHeap {
        &self.blobs
    }

    /// Number of members resolved so far
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolves `token` to its member object.
    ///
    /// Returns `None` for null tokens (rid 0), tokens of tables that have no member objects, and
    /// tokens without a backing row. Resolving the same token twice returns the same object.
    pub fn try_resolve_member(&self, token: Token) -> Option<Member> {
        if token.is_null() {
            return None;
        }

        if let Some(member) = self.cache.get(&token) {
            return Some(member.value().clone());
        }

        let kind = token.table_id()?;
        let constructor = Self::constructor(kind)?;
        let row = self.tables.get_row_by_rid(kind, token.row())?;

        let member = self
            .cache
            .entry(token)
            .or_insert_with(|| {
                tracing::trace!(%token, "caching member");
                constructor(self.self_ref.clone(), row)
            })
            .value()
            .clone();

        Some(member)
    }

    /// Resolves `token` to its member object, failing on anything that does not resolve.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedReference`] where [`MetadataImage::try_resolve_member`]
    /// returns `None`
    pub fn resolve_member(&self, token: Token) -> Result<Member> {
        self.try_resolve_member(token)
            .ok_or(Error::UnresolvedReference(token))
    }

    /// Resolves every row of `kind`, in rid order. Rows are resolved in parallel.
    #[must_use]
    pub fn members(&self, kind: TableId) -> Vec<Member> {
        let count = self.tables.row_count(kind);
        (1..=count)
            .into_par_iter()
            .filter_map(|rid| self.try_resolve_member(Token::from_parts(kind, rid)))
            .collect()
    }

    /// Resolves every row of the table backing `T`, in rid order
    #[must_use]
    pub fn members_of<T: MemberKind>(&self) -> Vec<Arc<T>> {
        self.members(T::TABLE)
            .into_iter()
            .filter_map(T::from_member)
            .collect()
    }

    /// Finds the type definition with the given namespace and name
    #[must_use]
    pub fn type_by_name(&self, namespace: &str, name: &str) -> Option<TypeDefRc> {
        self.members_of::<TypeDef>()
            .into_iter()
            .find(|ty| ty.name() == name && ty.namespace() == namespace)
    }

    fn constructor(kind: TableId) -> Option<Constructor> {
        let constructor: Constructor = match kind {
            TableId::TypeRef => |image, row| {
                Member::TypeRef(TypeRef::from_raw(image, TypeRefRaw::from_row(row)))
            },
            TableId::TypeDef => |image, row| {
                Member::TypeDef(TypeDef::from_raw(image, TypeDefRaw::from_row(row)))
            },
            TableId::MethodDef => |image, row| {
                Member::MethodDef(MethodDef::from_raw(image, MethodDefRaw::from_row(row)))
            },
            TableId::MemberRef => |image, row| {
                Member::MemberRef(MemberRef::from_raw(image, MemberRefRaw::from_row(row)))
            },
            TableId::CustomAttribute => |image, row| {
                Member::CustomAttribute(CustomAttribute::from_raw(
                    image,
                    CustomAttributeRaw::from_row(row),
                ))
            },
            TableId::EventMap => |image, row| {
                Member::EventMap(EventMap::from_raw(image, EventMapRaw::from_row(row)))
            },
            TableId::Event => {
                |image, row| Member::Event(Event::from_raw(image, EventRaw::from_row(row)))
            }
            TableId::PropertyMap => |image, row| {
                Member::PropertyMap(PropertyMap::from_raw(image, PropertyMapRaw::from_row(row)))
            },
            TableId::Property => |image, row| {
                Member::Property(Property::from_raw(image, PropertyRaw::from_row(row)))
            },
            TableId::MethodSemantics => |image, row| {
                Member::MethodSemantics(MethodSemantics::from_raw(
                    image,
                    MethodSemanticsRaw::from_row(row),
                ))
            },
            TableId::TypeSpec => |image, row| {
                Member::TypeSpec(TypeSpec::from_raw(image, TypeSpecRaw::from_row(row)))
            },
            TableId::GenericParam => |image, row| {
                Member::GenericParam(GenericParam::from_raw(image, GenericParamRaw::from_row(row)))
            },
            TableId::GenericParamConstraint => |image, row| {
                Member::GenericParamConstraint(GenericParamConstraint::from_raw(
                    image,
                    GenericParamConstraintRaw::from_row(row),
                ))
            },
            _ => return None,
        };

        Some(constructor)
    }

    /// Reads a string for an attribute of `owner`, degrading to `""`
    pub(crate) fn string(&self, owner: Token, offset: u32) -> String {
        match self.strings.get(offset) {
            Ok(value) => value.to_string(),
            Err(error) => {
                tracing::warn!(%owner, offset, %error, "unreadable string, using empty name");
                String::new()
            }
        }
    }

    /// Reads a blob for an attribute of `owner`, degrading to an empty blob
    pub(crate) fn blob(&self, owner: Token, offset: u32) -> Vec<u8> {
        match self.blobs.get(offset) {
            Ok(value) => value.to_vec(),
            Err(error) => {
                tracing::warn!(%owner, offset, %error, "unreadable blob, using empty value");
                Vec::new()
            }
        }
    }

    /// Decodes and resolves a coded index column of `owner`, degrading to `None`
    pub(crate) fn resolve_coded(
        &self,
        owner: Token,
        index_type: CodedIndexType,
        value: u32,
    ) -> Option<Member> {
        match index_type.decode(value) {
            Ok(None) => None,
            Ok(Some(token)) => {
                let member = self.try_resolve_member(token);
                if member.is_none() {
                    tracing::warn!(%owner, %token, "unresolved reference");
                }
                member
            }
            Err(error) => {
                tracing::warn!(%owner, value, %error, "malformed coded index");
                None
            }
        }
    }

    /// Resolves a simple table index column of `owner`, degrading to `None`
    pub(crate) fn resolve_index<T: MemberKind>(&self, owner: Token, rid: u32) -> Option<Arc<T>> {
        if rid == 0 {
            return None;
        }

        let token = Token::from_parts(T::TABLE, rid);
        let member = self.try_resolve_member(token).and_then(T::from_member);
        if member.is_none() {
            tracing::warn!(%owner, %token, "unresolved reference");
        }

        member
    }

    /// Finds the owner of row `rid` through the range map `T`, whose `column` holds the first
    /// rid of each owner's range
    pub(crate) fn range_owner<T: MemberKind>(&self, column: usize, rid: u32) -> Option<Arc<T>> {
        let row = self.tables.get_row_closest_to_key(T::TABLE, column, rid)?;
        self.try_resolve_member(row.token).and_then(T::from_member)
    }

    /// Resolves the range of `T` rows owned by row `owner_rid` of `owner_table`, whose `column`
    /// holds the first rid of the range
    pub(crate) fn range_members<T: MemberKind>(
        &self,
        owner_table: TableId,
        owner_rid: u32,
        column: usize,
    ) -> Vec<Arc<T>> {
        let Some(owner) = self.tables.get_row_by_rid(owner_table, owner_rid) else {
            return Vec::new();
        };

        let limit = self.tables.row_count(T::TABLE) + 1;
        let start = owner.column(column);
        let end = self
            .tables
            .get_row_by_rid(owner_table, owner_rid + 1)
            .map_or(limit, |next| next.column(column))
            .min(limit);

        (start..end)
            .filter_map(|rid| self.resolve_index::<T>(owner.token, rid))
            .collect()
    }

    /// Resolves the `T` rows whose sorted `column` holds `owner` encoded as `index_type`
    pub(crate) fn keyed_members<T: MemberKind>(
        &self,
        owner: Token,
        column: usize,
        index_type: CodedIndexType,
    ) -> Vec<Arc<T>> {
        let key = match index_type.encode(owner) {
            Ok(key) => key,
            Err(error) => {
                tracing::warn!(%owner, %error, "owner can not be used as a key");
                return Vec::new();
            }
        };

        self.tables
            .rows_with_key(T::TABLE, column, key)
            .iter()
            .filter_map(|row| self.try_resolve_member(row.token))
            .filter_map(T::from_member)
            .collect()
    }

    /// Resolves the `T` rows whose sorted `column` holds the rid of `owner`
    pub(crate) fn indexed_members<T: MemberKind>(
        &self,
        owner: Token,
        column: usize,
    ) -> Vec<Arc<T>> {
        self.tables
            .rows_with_key(T::TABLE, column, owner.row())
            .iter()
            .filter_map(|row| self.try_resolve_member(row.token))
            .filter_map(T::from_member)
            .collect()
    }

    /// Resolves the first `T` row whose `column` holds the rid of `owner`.
    ///
    /// The column does not have to be sorted, the table is scanned.
    pub(crate) fn scan_member<T: MemberKind>(&self, owner: Token, column: usize) -> Option<Arc<T>> {
        let token = self
            .tables
            .get_table(T::TABLE)
            .iter()
            .find(|row| row.column(column) == owner.row())
            .map(|row| row.token)?;

        self.try_resolve_member(token).and_then(T::from_member)
    }
}

/// Creates a lazy attribute that is computed against the image behind `image`
pub(crate) fn deferred<T, F>(image: &Weak<MetadataImage>, f: F) -> LazyValue<T>
where
    T: Clone + Default + 'static,
    F: FnOnce(&MetadataImage) -> T + Send + 'static,
{
    let image = image.clone();
    LazyValue::from_thunk(move || with_image(&image, f))
}

/// Runs `f` against the image behind `image`, or returns the default if it is gone
pub(crate) fn with_image<R, F>(image: &Weak<MetadataImage>, f: F) -> R
where
    R: Default,
    F: FnOnce(&MetadataImage) -> R,
{
    match image.upgrade() {
        Some(image) => f(&image),
        None => R::default(),
    }
}
