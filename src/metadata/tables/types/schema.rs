//! Column layouts of the metadata tables.
//!
//! A row carries no type tags: the meaning and the on-disk width of every column is decided
//! entirely by its table's schema. Widths of heap, table and coded-index columns are
//! resolved against a [`crate::metadata::tables::TableInfo`] at read and write time.

use crate::metadata::tables::types::{CodedIndexType, TableId};

/// The storage class of a single table column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// A 2-byte constant (flags, numbers)
    Fixed2,
    /// A 4-byte constant (flags, RVAs)
    Fixed4,
    /// An offset into the `#Strings` heap
    String,
    /// An index into the `#GUID` heap
    Guid,
    /// An offset into the `#Blob` heap
    Blob,
    /// A simple 1-based index into another table
    Table(TableId),
    /// A coded index into one of several tables
    Coded(CodedIndexType),
}

/// The columns of a table, in on-disk order.
///
/// Every table kind has a layout, including the ones no member object is built for; their
/// rows are carried as raw columns so a stream can be parsed and written back unchanged.
#[must_use]
pub fn columns(table: TableId) -> &'static [ColumnKind] {
    use ColumnKind::{Blob, Coded, Fixed2, Fixed4, Guid, String, Table};

    match table {
        TableId::Module => &[Fixed2, String, Guid, Guid, Guid],
        TableId::TypeRef => &[Coded(CodedIndexType::ResolutionScope), String, String],
        TableId::TypeDef => &[
            Fixed4,
            String,
            String,
            Coded(CodedIndexType::TypeDefOrRef),
            Table(TableId::Field),
            Table(TableId::MethodDef),
        ],
        TableId::FieldPtr => &[Table(TableId::Field)],
        TableId::Field => &[Fixed2, String, Blob],
        TableId::MethodPtr => &[Table(TableId::MethodDef)],
        TableId::MethodDef => &[Fixed4, Fixed2, Fixed2, String, Blob, Table(TableId::Param)],
        TableId::ParamPtr => &[Table(TableId::Param)],
        TableId::Param => &[Fixed2, Fixed2, String],
        TableId::InterfaceImpl => &[Table(TableId::TypeDef), Coded(CodedIndexType::TypeDefOrRef)],
        TableId::MemberRef => &[Coded(CodedIndexType::MemberRefParent), String, Blob],
        // Type is a single byte followed by a padding byte
        TableId::Constant => &[Fixed2, Coded(CodedIndexType::HasConstant), Blob],
        TableId::CustomAttribute => &[
            Coded(CodedIndexType::HasCustomAttribute),
            Coded(CodedIndexType::CustomAttributeType),
            Blob,
        ],
        TableId::FieldMarshal => &[Coded(CodedIndexType::HasFieldMarshal), Blob],
        TableId::DeclSecurity => &[Fixed2, Coded(CodedIndexType::HasDeclSecurity), Blob],
        TableId::ClassLayout => &[Fixed2, Fixed4, Table(TableId::TypeDef)],
        TableId::FieldLayout => &[Fixed4, Table(TableId::Field)],
        TableId::StandAloneSig => &[Blob],
        TableId::EventMap => &[Table(TableId::TypeDef), Table(TableId::Event)],
        TableId::EventPtr => &[Table(TableId::Event)],
        TableId::Event => &[Fixed2, String, Coded(CodedIndexType::TypeDefOrRef)],
        TableId::PropertyMap => &[Table(TableId::TypeDef), Table(TableId::Property)],
        TableId::PropertyPtr => &[Table(TableId::Property)],
        TableId::Property => &[Fixed2, String, Blob],
        TableId::MethodSemantics => &[
            Fixed2,
            Table(TableId::MethodDef),
            Coded(CodedIndexType::HasSemantics),
        ],
        TableId::MethodImpl => &[
            Table(TableId::TypeDef),
            Coded(CodedIndexType::MethodDefOrRef),
            Coded(CodedIndexType::MethodDefOrRef),
        ],
        TableId::ModuleRef => &[String],
        TableId::TypeSpec => &[Blob],
        TableId::ImplMap => &[
            Fixed2,
            Coded(CodedIndexType::MemberForwarded),
            String,
            Table(TableId::ModuleRef),
        ],
        TableId::FieldRVA => &[Fixed4, Table(TableId::Field)],
        TableId::EncLog => &[Fixed4, Fixed4],
        TableId::EncMap => &[Fixed4],
        TableId::Assembly => &[
            Fixed4, Fixed2, Fixed2, Fixed2, Fixed2, Fixed4, Blob, String, String,
        ],
        TableId::AssemblyProcessor => &[Fixed4],
        TableId::AssemblyOS => &[Fixed4, Fixed4, Fixed4],
        TableId::AssemblyRef => &[
            Fixed2, Fixed2, Fixed2, Fixed2, Fixed4, Blob, String, String, Blob,
        ],
        TableId::AssemblyRefProcessor => &[Fixed4, Table(TableId::AssemblyRef)],
        TableId::AssemblyRefOS => &[Fixed4, Fixed4, Fixed4, Table(TableId::AssemblyRef)],
        TableId::File => &[Fixed4, String, Blob],
        TableId::ExportedType => &[
            Fixed4,
            Fixed4,
            String,
            String,
            Coded(CodedIndexType::Implementation),
        ],
        TableId::ManifestResource => &[
            Fixed4,
            Fixed4,
            String,
            Coded(CodedIndexType::Implementation),
        ],
        TableId::NestedClass => &[Table(TableId::TypeDef), Table(TableId::TypeDef)],
        TableId::GenericParam => &[
            Fixed2,
            Fixed2,
            Coded(CodedIndexType::TypeOrMethodDef),
            String,
        ],
        TableId::MethodSpec => &[Coded(CodedIndexType::MethodDefOrRef), Blob],
        TableId::GenericParamConstraint => &[
            Table(TableId::GenericParam),
            Coded(CodedIndexType::TypeDefOrRef),
        ],
        TableId::Document => &[Blob, Guid, Blob, Guid],
        TableId::MethodDebugInformation => &[Table(TableId::Document), Blob],
        TableId::LocalScope => &[
            Table(TableId::MethodDef),
            Table(TableId::ImportScope),
            Table(TableId::LocalVariable),
            Table(TableId::LocalConstant),
            Fixed4,
            Fixed4,
        ],
        TableId::LocalVariable => &[Fixed2, Fixed2, String],
        TableId::LocalConstant => &[String, Blob],
        TableId::ImportScope => &[Table(TableId::ImportScope), Blob],
        TableId::StateMachineMethod => &[Table(TableId::MethodDef), Table(TableId::MethodDef)],
        TableId::CustomDebugInformation => &[
            Coded(CodedIndexType::HasCustomDebugInformation),
            Guid,
            Blob,
        ],
    }
}

/// Columns that the file format keeps in ascending (non-decreasing) order.
///
/// Range lists (`TypeDef.MethodList`, `EventMap.EventList`, ...) and the parent columns of
/// the sorted association tables are binary searched, so they are validated once on load.
#[must_use]
pub fn sorted_columns(table: TableId) -> &'static [usize] {
    match table {
        TableId::TypeDef => &[4, 5],
        TableId::MethodDef => &[5],
        TableId::CustomAttribute => &[0],
        TableId::EventMap | TableId::PropertyMap => &[1],
        TableId::MethodSemantics | TableId::GenericParam => &[2],
        TableId::GenericParamConstraint => &[0],
        _ => &[],
    }
}
