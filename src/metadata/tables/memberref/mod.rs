//! `MemberRef` table support (ID 0x0A).
//!
//! A member reference names a field or method through its parent (`MemberRefParent` coded
//! index), a name and a signature blob. Custom attribute constructors defined in other modules
//! are member references.
//!
//! ## ECMA-335 Reference
//!
//! See ECMA-335, Partition II, Section 22.25.
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `MemberRef`
pub type MemberRefRc = Arc<MemberRef>;
