use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `CustomAttribute` table associates attributes with elements in various metadata tables, `TableId` = 0x0C
pub struct CustomAttributeRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into a metadata table that has an associated `HasCustomAttribute` (§II.24.2.6) coded index
    pub parent: u32,
    /// an index into the `MethodDef` or `MemberRef` table; more precisely, a `CustomAttributeType` (§II.24.2.6) coded index
    pub constructor: u32,
    /// an index into the Blob heap
    pub value: u32,
}

impl RowDefinition for CustomAttributeRaw {
    const TABLE: TableId = TableId::CustomAttribute;

    fn from_row(row: &MetadataRow) -> Self {
        CustomAttributeRaw {
            rid: row.rid,
            token: row.token,
            parent: row.column(0),
            constructor: row.column(1),
            value: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.parent, self.constructor, self.value]
    }
}
