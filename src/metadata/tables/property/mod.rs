//! `Property` table support (ID 0x17).
//!
//! Like events, properties reach their declaring type through a map table (`PropertyMap`) and
//! their accessors through `MethodSemantics` rows.
//!
//! # Reference
//! - [ECMA-335 II.22.34](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `Property` table specification
use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// All possible flags for `PropertyAttributes`
    pub struct PropertyAttributes: u32 {
        /// Property is special
        const SPECIAL_NAME = 0x0200;
        /// Runtime(metadata internal APIs) should check name encoding
        const RT_SPECIAL_NAME = 0x0400;
        /// Property has default
        const HAS_DEFAULT = 0x1000;
    }
}
