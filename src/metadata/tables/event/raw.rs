use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `Event` table defines the events of types. `TableId` = 0x14
pub struct EventRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `EventAttributes`, §II.23.1.4
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into a `TypeDef`, a `TypeRef`, or `TypeSpec` table; more precisely, a `TypeDefOrRef` (§II.24.2.6) coded index
    pub event_type: u32,
}

impl RowDefinition for EventRaw {
    const TABLE: TableId = TableId::Event;

    fn from_row(row: &MetadataRow) -> Self {
        EventRaw {
            rid: row.rid,
            token: row.token,
            flags: row.column(0),
            name: row.column(1),
            event_type: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.flags, self.name, self.event_type]
    }
}
