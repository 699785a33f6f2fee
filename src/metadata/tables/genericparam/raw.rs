use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `GenericParam` table defines generic parameters for generic types and methods. `TableId` = 0x2A
pub struct GenericParamRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte index of the generic parameter, numbered left-to-right, from zero
    pub number: u32,
    /// a 2-byte bitmask of type `GenericParamAttributes`, §II.23.1.7
    pub flags: u32,
    /// an index into the `TypeDef` or `MethodDef` table; more precisely, a `TypeOrMethodDef` (§II.24.2.6) coded index
    pub owner: u32,
    /// an index into the String heap
    pub name: u32,
}

impl RowDefinition for GenericParamRaw {
    const TABLE: TableId = TableId::GenericParam;

    fn from_row(row: &MetadataRow) -> Self {
        GenericParamRaw {
            rid: row.rid,
            token: row.token,
            number: row.column(0),
            flags: row.column(1),
            owner: row.column(2),
            name: row.column(3),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.number, self.flags, self.owner, self.name]
    }
}
