//! # cilgraph Prelude
//!
//! Import this module to get quick access to the types used for loading, inspecting and
//! building metadata.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilgraph operations
pub use crate::Error;

/// The result type used throughout cilgraph
pub use crate::Result;

// ================================================================================================
// Resolution
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// The image owning tables, heaps and resolved members
pub use crate::metadata::image::MetadataImage;

/// Member handles and the resolution contract
pub use crate::metadata::member::{Member, MemberKind, Resolvable, TypeDefOrRef, WeakMember};

/// Lazy attribute storage and owned collections
pub use crate::metadata::{
    collections::{OwnedCollection, OwnedItem},
    lazy::LazyValue,
};

/// Encoding members back into an image
pub use crate::metadata::writer::MetadataWriter;

// ================================================================================================
// Streams and Tables
// ================================================================================================

/// Heaps and the tables stream
pub use crate::metadata::streams::{
    BlobHeap, BlobHeapBuilder, StringHeap, StringHeapBuilder, TableStream,
};

/// Table infrastructure
pub use crate::metadata::tables::{
    CodedIndexType, MetadataRow, MetadataTable, RowDefinition, TableId, TableInfo,
};

// ================================================================================================
// Member Objects
// ================================================================================================

/// Types
pub use crate::metadata::tables::{
    TypeAttributes, TypeDef, TypeDefRc, TypeRef, TypeRefRc, TypeSpec, TypeSpecRc,
};

/// Methods and member references
pub use crate::metadata::tables::{
    MemberRef, MemberRefRc, MethodAttributes, MethodDef, MethodDefRc,
};

/// Events and properties
pub use crate::metadata::tables::{
    Event, EventAttributes, EventMap, EventMapRc, EventRc, MethodSemantics,
    MethodSemanticsAttributes, MethodSemanticsRc, Property, PropertyAttributes, PropertyMap,
    PropertyMapRc, PropertyRc,
};

/// Custom attributes and generic parameters
pub use crate::metadata::tables::{
    CustomAttribute, CustomAttributeRc, GenericParam, GenericParamAttributes,
    GenericParamConstraint, GenericParamConstraintRc, GenericParamRc,
};
