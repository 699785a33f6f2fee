//! `MethodDef` table support (ID 0x06).
//!
//! ## Table Structure
//!
//! - **RVA** (4 bytes): Relative virtual address of the method body, 0 for abstract methods
//! - **ImplFlags** (2 bytes): `MethodImplAttributes`
//! - **Flags** (2 bytes): [`MethodAttributes`]
//! - **Name** (string heap index)
//! - **Signature** (blob heap index)
//! - **ParamList** (Param table index): First parameter of this method
//!
//! Methods do not store their declaring type. It is recovered by searching the TypeDef table
//! for the last type whose method list starts at or before the method's rid.
//!
//! ## ECMA-335 Reference
//!
//! See ECMA-335, Partition II, Section 22.26.
use bitflags::bitflags;
use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `MethodDef`
pub type MethodDefRc = Arc<MethodDef>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method attribute flags of `MethodDef` entries
    pub struct MethodAttributes: u32 {
        /// Use this mask to retrieve accessibility information
        const MEMBER_ACCESS_MASK = 0x0007;
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}
