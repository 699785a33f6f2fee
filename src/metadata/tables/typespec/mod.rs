//! `TypeSpec` table support (ID 0x1B).
//!
//! The `TypeSpec` table defines type specifications through signatures. These are used for
//! constructed types that cannot be represented in the simpler `TypeDef` or `TypeRef` tables,
//! such as generic instantiations, arrays and pointers.
//!
//! ## ECMA-335 Specification
//! From ECMA-335, Partition II, Section 22.39:
//! > The TypeSpec table has the following column:
//! > - Signature (an index into the Blob heap, where the blob is formatted according to the TypeSpec signature format)
//!
//! Signatures are kept as raw blobs; they are not parsed.
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `TypeSpec`
pub type TypeSpecRc = Arc<TypeSpec>;
