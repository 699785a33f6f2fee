//! `Event` table support (ID 0x14).
//!
//! Events do not store the type that declares them. The declaring type is found through the
//! `EventMap` table: the map whose event list starts at or before the event's rid owns it.
//! Accessor methods (add, remove, raise, other) are attached through `MethodSemantics` rows
//! whose association is the event.
//!
//! # Reference
//! - [ECMA-335 II.22.13](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `Event` table specification
use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to an `Event`
pub type EventRc = Arc<Event>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// All possible flags for `EventAttributes`
    pub struct EventAttributes: u32 {
        /// Event is special
        const SPECIAL_NAME = 0x0200;
        /// CLI provides 'special' behavior, depending upon the name of the event
        const RTSPECIAL_NAME = 0x0400;
    }
}
