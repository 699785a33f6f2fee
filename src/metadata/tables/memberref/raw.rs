use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `MemberRef` table references members (fields or methods) of types, usually defined in other modules. `TableId` = 0x0A
pub struct MemberRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `MethodDef`, `ModuleRef`, `TypeDef`, `TypeRef`, or `TypeSpec` tables; more precisely, a `MemberRefParent` (§II.24.2.6) coded index
    pub class: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
}

impl RowDefinition for MemberRefRaw {
    const TABLE: TableId = TableId::MemberRef;

    fn from_row(row: &MetadataRow) -> Self {
        MemberRefRaw {
            rid: row.rid,
            token: row.token,
            class: row.column(0),
            name: row.column(1),
            signature: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.class, self.name, self.signature]
    }
}
