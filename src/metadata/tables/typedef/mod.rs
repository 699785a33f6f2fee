//! TypeDef table support (ID 0x02).
//!
//! The TypeDef table defines every type of the module: classes, interfaces, value types, enums
//! and delegates.
//!
//! ## Table Structure
//!
//! - **Flags** (4-byte bitmask): [`TypeAttributes`]
//! - **TypeName** (string heap index): Simple name of the type
//! - **TypeNamespace** (string heap index): Namespace of the type, empty for global types
//! - **Extends** (coded index): Base type (`TypeDefOrRef`)
//! - **FieldList** (Field table index): First field belonging to this type
//! - **MethodList** (MethodDef table index): First method belonging to this type
//!
//! ## Member Organization
//!
//! Types own contiguous ranges of methods. The range for each type is determined by comparing
//! its method_list value with the next type's value:
//! ```text
//! // Type A owns methods [A.method_list .. B.method_list)
//! ```
//! A method finds its declaring type the other way around, by searching for the last type whose
//! method_list is not greater than the method's rid.
//!
//! ## ECMA-335 Reference
//!
//! See ECMA-335, Partition II, Section 22.37.

use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `TypeDef`
pub type TypeDefRc = Arc<TypeDef>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Type attribute flags of TypeDef entries
    pub struct TypeAttributes: u32 {
        /// Use this mask to retrieve visibility information
        const VISIBILITY_MASK = 0x0000_0007;
        /// Class has public scope
        const PUBLIC = 0x0000_0001;
        /// Class is nested with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Class is nested with private visibility
        const NESTED_PRIVATE = 0x0000_0003;
        /// Class is nested with family visibility
        const NESTED_FAMILY = 0x0000_0004;
        /// Class is nested with assembly visibility
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Class is nested with family and assembly visibility
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Class is nested with family or assembly visibility
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;
        /// Class fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Layout is supplied explicitly
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Class is abstract
        const ABSTRACT = 0x0000_0080;
        /// Class cannot be extended
        const SEALED = 0x0000_0100;
        /// Class name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Class/Interface is imported
        const IMPORT = 0x0000_1000;
        /// Reserved (Class is serializable)
        const SERIALIZABLE = 0x0000_2000;
        /// Strings are interpreted as UTF-16
        const UNICODE_CLASS = 0x0001_0000;
        /// Strings are interpreted automatically
        const AUTO_CLASS = 0x0002_0000;
        /// Initialize the class before first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// CLI provides 'special' behavior, depending upon the name of the type
        const RTSPECIAL_NAME = 0x0000_0800;
        /// Type has security associated with it
        const HAS_SECURITY = 0x0004_0000;
    }
}
