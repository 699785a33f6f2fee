use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `PropertyMap` table maps types to the run of properties they own. `TableId` = 0x15
pub struct PropertyMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `TypeDef` table
    pub parent: u32,
    /// an index into the `Property` table, first property owned by `parent`
    pub property_list: u32,
}

impl RowDefinition for PropertyMapRaw {
    const TABLE: TableId = TableId::PropertyMap;

    fn from_row(row: &MetadataRow) -> Self {
        PropertyMapRaw {
            rid: row.rid,
            token: row.token,
            parent: row.column(0),
            property_list: row.column(1),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.parent, self.property_list]
    }
}
