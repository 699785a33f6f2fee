//! `GenericParamConstraint` table support (ID 0x2C).
//!
//! Each row constrains one generic parameter to derive from or implement a type. The table is
//! sorted by its owner column, a plain `GenericParam` index.
//!
//! # Reference
//! - [ECMA-335 II.22.21](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `GenericParamConstraint` table specification
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `GenericParamConstraint`
pub type GenericParamConstraintRc = Arc<GenericParamConstraint>;
