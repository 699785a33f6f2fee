use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `MethodDef` table defines the methods of all types in this module. `TableId` = 0x06
pub struct MethodDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 4-byte constant
    pub rva: u32,
    /// a 2-byte bitmask of type `MethodImplAttributes`, §II.23.1.10
    pub impl_flags: u32,
    /// a 2-byte bitmask of type `MethodAttributes`, §II.23.1.10
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
    /// an index into the Param table
    pub param_list: u32,
}

impl RowDefinition for MethodDefRaw {
    const TABLE: TableId = TableId::MethodDef;

    fn from_row(row: &MetadataRow) -> Self {
        MethodDefRaw {
            rid: row.rid,
            token: row.token,
            rva: row.column(0),
            impl_flags: row.column(1),
            flags: row.column(2),
            name: row.column(3),
            signature: row.column(4),
            param_list: row.column(5),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![
            self.rva,
            self.impl_flags,
            self.flags,
            self.name,
            self.signature,
            self.param_list,
        ]
    }
}
