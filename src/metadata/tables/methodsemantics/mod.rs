//! `MethodSemantics` table support (ID 0x18).
//!
//! Each row binds one method to an event or property in a given role (getter, setter, add,
//! remove, raise, other). The table is sorted by its association column, so the accessors of
//! one event or property are found by key search.
//!
//! # Reference
//! - [ECMA-335 II.22.28](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `MethodSemantics` table specification
use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `MethodSemantics`
pub type MethodSemanticsRc = Arc<MethodSemantics>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// All possible flags for `MethodSemanticsAttributes`
    pub struct MethodSemanticsAttributes: u32 {
        /// Setter for property
        const SETTER = 0x0001;
        /// Getter for property
        const GETTER = 0x0002;
        /// Other method for property or event
        const OTHER = 0x0004;
        /// `AddOn` method for event
        const ADD_ON = 0x0008;
        /// `RemoveOn` method for event
        const REMOVE_ON = 0x0010;
        /// Fire method for event
        const FIRE = 0x0020;
    }
}
