//! Metadata resolution for .NET modules.
//!
//! # Key Components
//!
//! - [`token`] - Metadata table row references used throughout .NET
//! - [`streams`] - The tables stream and the `#Strings` / `#Blob` heaps
//! - [`tables`] - Rows, tables, the coded index schema and the member objects
//! - [`image`] - [`image::MetadataImage`], the identity cache and entry point of resolution
//! - [`member`] - Polymorphic handles over member objects
//! - [`lazy`] - Initialize-once attribute storage
//! - [`collections`] - Owned one-to-many collections with back-references
//! - [`writer`] - Encoding member objects back into tables and heaps

/// Owned collections of member objects
pub mod collections;
/// The metadata image and its identity cache
pub mod image;
/// Lazily computed, overridable values
pub mod lazy;
/// Polymorphic member handles and the resolution contract
pub mod member;
/// Implementation of the metadata streams (tables, strings, blobs)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Write-back of member objects
pub mod writer;
