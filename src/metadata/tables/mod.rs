//! Metadata tables and the member objects built from their rows.
//!
//! Every modeled table has its own module with three parts:
//!
//! - a `*Raw` struct: the decoded columns of one row, implementing [`RowDefinition`]
//! - the member object: lazily resolved attributes over a raw row, or eagerly supplied values
//!   for members built in memory
//! - an `*Rc` alias and, where the table has a flags column, its attribute bitflags
//!
//! The shared infrastructure (rows, tables, coded index schema, column widths) lives in
//! a private `types` module and is re-exported here.
//!
//! # Reference
//! - [ECMA-335 II.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata logical format: tables

mod customattribute;
mod event;
mod eventmap;
mod genericparam;
mod genericparamconstraint;
mod memberref;
mod methoddef;
mod methodsemantics;
mod property;
mod propertymap;
mod typedef;
mod typeref;
mod typespec;
mod types;

pub use customattribute::*;
pub use event::*;
pub use eventmap::*;
pub use genericparam::*;
pub use genericparamconstraint::*;
pub use memberref::*;
pub use methoddef::*;
pub use methodsemantics::*;
pub use property::*;
pub use propertymap::*;
pub use typedef::*;
pub use typeref::*;
pub use typespec::*;
pub use types::*;
