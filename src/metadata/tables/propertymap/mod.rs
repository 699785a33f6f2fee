//! `PropertyMap` table support (ID 0x15).
//!
//! Same layout and lookup rules as the `EventMap` table: each row names a parent type and the
//! first row of its contiguous run of properties. The owning map of a property is the row with
//! the greatest `PropertyList` that is not greater than the property's rid.
//!
//! # Reference
//! - [ECMA-335 II.22.35](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `PropertyMap` table specification
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// Reference-counted pointer to a `PropertyMap`
pub type PropertyMapRc = Arc<PropertyMap>;
