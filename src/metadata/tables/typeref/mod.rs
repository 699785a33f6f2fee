//! TypeRef table support (ID 0x01).
//!
//! A TypeRef names a type by namespace and name, together with the scope it is found in
//! (another module, an assembly reference, or an enclosing TypeRef for nested types).
//!
//! ## Table Structure
//!
//! - **ResolutionScope** (coded index): `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef`
//! - **TypeName** (string heap index)
//! - **TypeNamespace** (string heap index)
//!
//! Resolving a [`TypeRef`] through [`crate::metadata::member::Resolvable`] yields the
//! [`crate::metadata::tables::TypeDef`] of the same image with the same namespace and name, if
//! there is one.
//!
//! ## ECMA-335 Reference
//!
//! See ECMA-335, Partition II, Section 22.38.

use std::sync::Arc;

mod owned;
mod raw;

pub use owned::*;
pub use raw::*;

/// A reference to a `TypeRef`
pub type TypeRefRc = Arc<TypeRef>;
