use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `MethodSemantics` table associates methods with events or properties. `TableId` = 0x18
pub struct MethodSemanticsRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `MethodSemanticsAttributes`, §II.23.1.12
    pub semantics: u32,
    /// an index into the `MethodDef` table
    pub method: u32,
    /// an index into the Event or Property table; more precisely, a `HasSemantics` (§II.24.2.6) coded index
    pub association: u32,
}

impl RowDefinition for MethodSemanticsRaw {
    const TABLE: TableId = TableId::MethodSemantics;

    fn from_row(row: &MetadataRow) -> Self {
        MethodSemanticsRaw {
            rid: row.rid,
            token: row.token,
            semantics: row.column(0),
            method: row.column(1),
            association: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.semantics, self.method, self.association]
    }
}
