//! `GenericParam` table support (ID 0x2A).
//!
//! Generic parameters belong to a type or a method (`TypeOrMethodDef` coded index). The table
//! is sorted by owner, then by number, so the parameters of one owner are a contiguous run.
//!
//! # Reference
//! - [ECMA-335 II.22.20](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `GenericParam` table specification
use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `GenericParam`
pub type GenericParamRc = Arc<GenericParam>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// All possible flags for `GenericParamAttributes`
    pub struct GenericParamAttributes: u32 {
        /// These 2 bits contain one of the following values:
        const VARIANCE_MASK = 0x0003;
        /// The generic parameter is covariant
        const COVARIANT = 0x0001;
        /// The generic parameter is contravariant
        const CONTRAVARIANT = 0x0002;
        /// These 3 bits contain one of the following values:
        const SPECIAL_CONSTRAINT_MASK = 0x001C;
        /// The generic parameter has the class special constraint
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The generic parameter has the valuetype special constraint
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The generic parameter has the .ctor special constraint
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}
