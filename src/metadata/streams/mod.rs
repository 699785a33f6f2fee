//! Metadata streams: the `#~` tables stream and the heaps it points into.
//!
//! # Stream Types
//!
//! - **`#~`** - [`TableStream`], the fixed-width metadata tables
//! - **`#Strings`** - [`StringHeap`], null-terminated UTF-8 identifiers. The first entry is
//!   always the empty string.
//! - **`#Blob`** - [`BlobHeap`], length-prefixed binary values such as signatures and custom
//!   attribute arguments
//!
//! Both heaps come with a builder that the [`crate::metadata::writer::MetadataWriter`] uses to
//! lay out fresh heaps, storing each distinct value once.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2 - Streams

mod blob;
mod strings;
mod tablestream;

pub use blob::{BlobHeap, BlobHeapBuilder};
pub use strings::{StringHeap, StringHeapBuilder};
pub use tablestream::TableStream;
