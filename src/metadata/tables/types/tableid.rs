use strum::{EnumCount, EnumIter};

/// Identifiers for the different metadata tables defined in the ECMA-335 specification.
///
/// Each variant's discriminant is the table number used both in the high byte of a
/// [`crate::metadata::token::Token`] and as the bit position inside the tables stream's
/// `valid` bit vector. The set of table kinds is fixed by the file format, which is why the
/// resolution engine dispatches over it with a closed `match`.
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - Partition II, Section 22
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, EnumIter, EnumCount)]
pub enum TableId {
    /// `Module` table (0x00) - the single module described by this metadata
    Module = 0x00,
    /// `TypeRef` table (0x01) - references to types defined in other modules
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - types defined in this module
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - indirection table, unoptimized metadata only
    FieldPtr = 0x03,
    /// `Field` table (0x04) - field definitions
    Field = 0x04,
    /// `MethodPtr` table (0x05) - indirection table, unoptimized metadata only
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06) - method definitions
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - indirection table, unoptimized metadata only
    ParamPtr = 0x07,
    /// `Param` table (0x08) - method parameters
    Param = 0x08,
    /// `InterfaceImpl` table (0x09) - interfaces implemented by types
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - references to fields and methods of other types
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - compile-time constant values
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C) - custom attributes, sorted by parent
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D) - interop marshalling information
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E) - declarative security
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F) - explicit class layouts
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10) - explicit field offsets
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11) - standalone signatures
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12) - range map from types to their events
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - indirection table, unoptimized metadata only
    EventPtr = 0x13,
    /// `Event` table (0x14) - event definitions
    Event = 0x14,
    /// `PropertyMap` table (0x15) - range map from types to their properties
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - indirection table, unoptimized metadata only
    PropertyPtr = 0x16,
    /// `Property` table (0x17) - property definitions
    Property = 0x17,
    /// `MethodSemantics` table (0x18) - accessor methods of events and properties
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19) - explicit method overrides
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - references to other modules
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B) - type specifications (signature blobs)
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C) - P/Invoke information
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D) - initial data of fields
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E) - edit-and-continue log
    EncLog = 0x1E,
    /// `EncMap` table (0x1F) - edit-and-continue mapping
    EncMap = 0x1F,
    /// `Assembly` table (0x20) - the assembly manifest
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21) - unused
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22) - unused
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - referenced assemblies
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24) - unused
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25) - unused
    AssemblyRefOS = 0x25,
    /// `File` table (0x26) - files of a multi-module assembly
    File = 0x26,
    /// `ExportedType` table (0x27) - types exported from other modules
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - resources
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29) - nesting relationships
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A) - generic parameters, sorted by owner
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B) - generic method instantiations
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C) - constraints, sorted by owner
    GenericParamConstraint = 0x2C,
    /// `Document` table (0x30) - portable PDB documents
    Document = 0x30,
    /// `MethodDebugInformation` table (0x31) - portable PDB sequence points
    MethodDebugInformation = 0x31,
    /// `LocalScope` table (0x32) - portable PDB scopes
    LocalScope = 0x32,
    /// `LocalVariable` table (0x33) - portable PDB locals
    LocalVariable = 0x33,
    /// `LocalConstant` table (0x34) - portable PDB constants
    LocalConstant = 0x34,
    /// `ImportScope` table (0x35) - portable PDB import scopes
    ImportScope = 0x35,
    /// `StateMachineMethod` table (0x36) - portable PDB async/iterator mapping
    StateMachineMethod = 0x36,
    /// `CustomDebugInformation` table (0x37) - portable PDB custom information
    CustomDebugInformation = 0x37,
}

impl TableId {
    /// Highest table number plus one; sizes the per-table lookup arrays.
    pub const SLOTS: usize = 64;

    /// Maps a raw table number (as found in a token's high byte) to its `TableId`.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<TableId> {
        let id = match value {
            0x00 => TableId::Module,
            0x01 => TableId::TypeRef,
            0x02 => TableId::TypeDef,
            0x03 => TableId::FieldPtr,
            0x04 => TableId::Field,
            0x05 => TableId::MethodPtr,
            0x06 => TableId::MethodDef,
            0x07 => TableId::ParamPtr,
            0x08 => TableId::Param,
            0x09 => TableId::InterfaceImpl,
            0x0A => TableId::MemberRef,
            0x0B => TableId::Constant,
            0x0C => TableId::CustomAttribute,
            0x0D => TableId::FieldMarshal,
            0x0E => TableId::DeclSecurity,
            0x0F => TableId::ClassLayout,
            0x10 => TableId::FieldLayout,
            0x11 => TableId::StandAloneSig,
            0x12 => TableId::EventMap,
            0x13 => TableId::EventPtr,
            0x14 => TableId::Event,
            0x15 => TableId::PropertyMap,
            0x16 => TableId::PropertyPtr,
            0x17 => TableId::Property,
            0x18 => TableId::MethodSemantics,
            0x19 => TableId::MethodImpl,
            0x1A => TableId::ModuleRef,
            0x1B => TableId::TypeSpec,
            0x1C => TableId::ImplMap,
            0x1D => TableId::FieldRVA,
            0x1E => TableId::EncLog,
            0x1F => TableId::EncMap,
            0x20 => TableId::Assembly,
            0x21 => TableId::AssemblyProcessor,
            0x22 => TableId::AssemblyOS,
            0x23 => TableId::AssemblyRef,
            0x24 => TableId::AssemblyRefProcessor,
            0x25 => TableId::AssemblyRefOS,
            0x26 => TableId::File,
            0x27 => TableId::ExportedType,
            0x28 => TableId::ManifestResource,
            0x29 => TableId::NestedClass,
            0x2A => TableId::GenericParam,
            0x2B => TableId::MethodSpec,
            0x2C => TableId::GenericParamConstraint,
            0x30 => TableId::Document,
            0x31 => TableId::MethodDebugInformation,
            0x32 => TableId::LocalScope,
            0x33 => TableId::LocalVariable,
            0x34 => TableId::LocalConstant,
            0x35 => TableId::ImportScope,
            0x36 => TableId::StateMachineMethod,
            0x37 => TableId::CustomDebugInformation,
            _ => return None,
        };

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn from_u8_matches_discriminant() {
        for id in TableId::iter() {
            assert_eq!(TableId::from_u8(id as u8), Some(id));
        }
    }

    #[test]
    fn gaps_are_rejected() {
        assert_eq!(TableId::from_u8(0x2D), None);
        assert_eq!(TableId::from_u8(0x2F), None);
        assert_eq!(TableId::from_u8(0x38), None);
        assert_eq!(TableId::from_u8(0xFF), None);
    }

    #[test]
    fn fits_into_slots() {
        assert!(TableId::iter().all(|id| (id as usize) < TableId::SLOTS));
    }
}
