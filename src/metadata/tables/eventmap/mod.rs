//! `EventMap` table support (ID 0x12).
//!
//! The `EventMap` table links types to the events they declare. Each row names a parent type
//! and the first row of its contiguous run of events.
//!
//! # Table Structure
//!
//! - **Parent** (`TypeDef` index): The type that owns the events
//! - **EventList** (Event index): First event owned by this type
//!
//! Events from `EventList[i]` to `EventList[i+1]-1` belong to `Parent[i]`. The last run ends at
//! the end of the Event table. Since the event list column is ascending, the map of an event
//! is the row with the greatest `EventList` that is not greater than the event's rid.
//!
//! # Reference
//! - [ECMA-335 II.22.12](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `EventMap` table specification
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// Reference-counted pointer to an `EventMap`
pub type EventMapRc = Arc<EventMap>;
