use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `EventMap` table maps types to the run of events they own. `TableId` = 0x12
pub struct EventMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `TypeDef` table
    pub parent: u32,
    /// an index into the `Event` table, first event owned by `parent`
    pub event_list: u32,
}

impl RowDefinition for EventMapRaw {
    const TABLE: TableId = TableId::EventMap;

    fn from_row(row: &MetadataRow) -> Self {
        EventMapRaw {
            rid: row.rid,
            token: row.token,
            parent: row.column(0),
            event_list: row.column(1),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.parent, self.event_list]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_long() {
        #[rustfmt::skip]
        let data = vec![
            0x01, 0x01, 0x01, 0x01, // parent
            0x02, 0x02, 0x02, 0x02, // event_list
        ];

        let info = TableInfo::from_rows(
            &[
                (TableId::TypeDef, u32::from(u16::MAX) + 3),
                (TableId::Event, u32::from(u16::MAX) + 3),
                (TableId::EventMap, 1),
            ],
            false,
            false,
            false,
        );
        let mut offset = 0;
        let table = MetadataTable::read(&data, &mut offset, TableId::EventMap, 1, &info).unwrap();
        let row = EventMapRaw::from_row(table.get(1).unwrap());

        assert_eq!(row.parent, 0x0101_0101);
        assert_eq!(row.event_list, 0x0202_0202);
    }
}
