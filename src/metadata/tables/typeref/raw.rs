use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `TypeRef` table contains references to types defined in other modules. `TableId` = 0x01
pub struct TypeRefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into a `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef` table, or null; more precisely, a `ResolutionScope` (§II.24.2.6) coded index
    pub resolution_scope: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
}

impl RowDefinition for TypeRefRaw {
    const TABLE: TableId = TableId::TypeRef;

    fn from_row(row: &MetadataRow) -> Self {
        TypeRefRaw {
            rid: row.rid,
            token: row.token,
            resolution_scope: row.column(0),
            type_name: row.column(1),
            type_namespace: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.resolution_scope, self.type_name, self.type_namespace]
    }
}
