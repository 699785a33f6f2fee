//! `CustomAttribute` table support (ID 0x0C).
//!
//! Each row attaches one attribute instance to a parent member. The table is sorted by its
//! parent column, so the attributes of one member are a contiguous run found by key search.
//!
//! ## Table Structure
//!
//! - **Parent** (`HasCustomAttribute` coded index): The member the attribute is applied to
//! - **Type** (`CustomAttributeType` coded index): The attribute constructor, a `MethodDef` or `MemberRef`
//! - **Value** (blob heap index): The encoded constructor arguments and named arguments
//!
//! The value blob is kept raw; decoding it requires the constructor's signature.
//!
//! ## ECMA-335 Reference
//!
//! See ECMA-335, Partition II, Section 22.10.
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `CustomAttribute`
pub type CustomAttributeRc = Arc<CustomAttribute>;
