use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `TypeSpec` table describes constructed types by signature. `TableId` = 0x1B
pub struct TypeSpecRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the Blob heap
    pub signature: u32,
}

impl RowDefinition for TypeSpecRaw {
    const TABLE: TableId = TableId::TypeSpec;

    fn from_row(row: &MetadataRow) -> Self {
        TypeSpecRaw {
            rid: row.rid,
            token: row.token,
            signature: row.column(0),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.signature]
    }
}
