use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `Property` table defines the properties of types. `TableId` = 0x17
pub struct PropertyRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 2-byte bitmask of type `PropertyAttributes`, §II.23.1.14
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap, the `PropertySig`
    pub signature: u32,
}

impl RowDefinition for PropertyRaw {
    const TABLE: TableId = TableId::Property;

    fn from_row(row: &MetadataRow) -> Self {
        PropertyRaw {
            rid: row.rid,
            token: row.token,
            flags: row.column(0),
            name: row.column(1),
            signature: row.column(2),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.flags, self.name, self.signature]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_large_heaps() {
        #[rustfmt::skip]
        let data = vec![
            0x00, 0x10,             // flags
            0x01, 0x00, 0x01, 0x00, // name
            0x02, 0x00, 0x02, 0x00, // signature
        ];

        let info = TableInfo::from_rows(&[(TableId::Property, 1)], true, true, false);
        let mut offset = 0;
        let table = MetadataTable::read(&data, &mut offset, TableId::Property, 1, &info).unwrap();
        let row = PropertyRaw::from_row(table.get(1).unwrap());

        assert_eq!(row.flags, 0x1000);
        assert_eq!(row.name, 0x0001_0001);
        assert_eq!(row.signature, 0x0002_0002);
    }
}
