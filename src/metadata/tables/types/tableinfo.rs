use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::{
        tables::types::{CodedIndexType, ColumnKind, TableId},
        token::Token,
    },
    Error::OutOfBounds,
    Result,
};

/// Holds information about the size that reference index fields have
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// The count of rows in this table
    pub rows: u32,
    /// Number of bits required to represent any valid row index
    pub bits: u8,
    /// If the count is > `u16::max`, the indexes of other tables into this table will be 4 bytes instead of 2
    pub is_large: bool,
}

impl TableRowInfo {
    /// Creates a new `TableRowInfo` instance with the given row count.
    ///
    /// Automatically calculates the number of bits required to represent
    /// indices into a table with the specified number of rows.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            // 32 - zeros is always <= 32, fits in u8
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// `TableInfo` holds information regarding the row count and reference index field sizes
/// of all tables in this binary
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

impl TableInfo {
    /// Build a new `TableInfo` struct from a tables stream header
    ///
    /// ## Arguments
    /// * 'data' - The tables stream, starting at its header
    /// * '`valid_bitvec`' - The valid bitvector from the header, showing which tables are present
    ///
    /// # Errors
    /// Returns an error if the header is truncated, or a row count exceeds what a token can
    /// address
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut table_info = vec![TableRowInfo::default(); TableId::SLOTS];
        let mut next_row_offset = 24;

        for table_id in TableId::iter() {
            if data.len() < next_row_offset {
                return Err(OutOfBounds);
            }

            if (valid_bitvec & (1 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if row_count > Token::MAX_ROW {
                return Err(malformed_error!(
                    "Table {:?} claims {} rows, more than a token can address",
                    table_id,
                    row_count
                ));
            }
            table_info[table_id as usize] = TableRowInfo::new(row_count);
        }

        let heap_size_flags = read_le::<u8>(data.get(6..).ok_or(OutOfBounds)?)?;
        let mut table_info = TableInfo {
            rows: table_info,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Build a `TableInfo` from known row counts, as done by the writer before serializing
    ///
    /// ## Arguments
    /// * 'tables'      - A slice of tuples, which provides (table_id, row_count) of the present tables
    /// * 'large_str'   - Specify if the #Strings heap indexes are 4 or 2 bytes
    /// * 'large_blob'  - Specify if the #Blob heap indexes are 4 or 2 bytes
    /// * 'large_guid'  - Specify if the #GUID heap indexes are 4 or 2 bytes
    #[must_use]
    pub fn from_rows(
        tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::SLOTS],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table_id, rows) in tables {
            table_info.rows[*table_id as usize] = TableRowInfo::new(*rows);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// The heap-size flag byte of the tables stream header
    #[must_use]
    pub fn heap_size_flags(&self) -> u8 {
        u8::from(self.is_large_index_str)
            | (u8::from(self.is_large_index_guid) << 1)
            | (u8::from(self.is_large_index_blob) << 2)
    }

    /// Returns true, if a requested table is larger than 2^16 rows and hence requires 4 bytes instead of 2 bytes
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// Indicates the size of indexes referring into the '#Strings' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Indicates the size of indexes referring into the '#GUID' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Indicates the size of indexes referring into the '#Blob' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Returns the metadata for a specific table.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Returns the number of bits required to represent an index into a specific table.
    #[must_use]
    pub fn table_index_bits(&self, table_id: TableId) -> u8 {
        self.rows[table_id as usize].bits
    }

    /// Returns the cached bit size for a specific coded index type.
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Returns true if a column of the given kind is stored with 4 bytes
    #[must_use]
    pub fn is_large_column(&self, kind: ColumnKind) -> bool {
        match kind {
            ColumnKind::Fixed2 => false,
            ColumnKind::Fixed4 => true,
            ColumnKind::String => self.is_large_index_str,
            ColumnKind::Guid => self.is_large_index_guid,
            ColumnKind::Blob => self.is_large_index_blob,
            ColumnKind::Table(table) => self.is_large(table),
            ColumnKind::Coded(coded) => self.coded_index_bits(coded) > 16,
        }
    }

    /// Returns the width in bytes of a column of the given kind
    #[must_use]
    pub fn column_bytes(&self, kind: ColumnKind) -> u8 {
        if self.is_large_column(kind) {
            4
        } else {
            2
        }
    }

    /// Returns the size in bytes of one row made of `columns`
    #[must_use]
    pub fn row_size(&self, columns: &[ColumnKind]) -> u32 {
        columns
            .iter()
            .map(|column| u32::from(self.column_bytes(*column)))
            .sum()
    }

    /// Calculates the number of bits required for a specific coded index type.
    fn calculate_coded_index_size(&self, coded_index_type: CodedIndexType) -> u8 {
        let max_bits = coded_index_type
            .tables()
            .iter()
            .flatten()
            .map(|table| self.table_index_bits(*table))
            .max()
            .unwrap_or(1);

        max_bits + coded_index_type.tag_bits()
    }

    /// Calculates and caches the bit sizes required for all coded index types.
    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let size = self.calculate_coded_index_size(coded_index);
            self.coded_indexes[coded_index as usize] = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_info_bits() {
        assert_eq!(TableRowInfo::new(0).bits, 1);
        assert_eq!(TableRowInfo::new(1).bits, 1);
        assert_eq!(TableRowInfo::new(0xFFFF).bits, 16);
        assert!(!TableRowInfo::new(0xFFFF).is_large);
        assert!(TableRowInfo::new(0x1_0000).is_large);
    }

    #[test]
    fn small_coded_index() {
        let info = TableInfo::from_rows(
            &[(TableId::TypeDef, 10), (TableId::TypeRef, 3)],
            false,
            false,
            false,
        );

        assert_eq!(info.coded_index_bits(CodedIndexType::TypeDefOrRef), 4 + 2);
        assert_eq!(
            info.column_bytes(ColumnKind::Coded(CodedIndexType::TypeDefOrRef)),
            2
        );
        assert_eq!(info.column_bytes(ColumnKind::String), 2);
        assert_eq!(info.column_bytes(ColumnKind::Fixed4), 4);
    }

    #[test]
    fn large_coded_index() {
        // 2^14 rows need 15 bits, + 2 tag bits no longer fit into 16
        let info = TableInfo::from_rows(&[(TableId::TypeSpec, 0x4000)], true, false, true);

        assert_eq!(
            info.column_bytes(ColumnKind::Coded(CodedIndexType::TypeDefOrRef)),
            4
        );
        assert_eq!(info.column_bytes(ColumnKind::Table(TableId::TypeSpec)), 2);
        assert_eq!(info.column_bytes(ColumnKind::String), 4);
        assert_eq!(info.column_bytes(ColumnKind::Blob), 2);
        assert_eq!(info.column_bytes(ColumnKind::Guid), 4);
        assert_eq!(info.heap_size_flags(), 0b011);
    }

    #[test]
    fn header_parsing() {
        let valid = (1u64 << TableId::TypeDef as u64) | (1u64 << TableId::Event as u64);
        let mut data = vec![0u8; 24];
        data[6] = 0b100;
        data.extend_from_slice(&7u32.to_le_bytes());
        data.extend_from_slice(&0x1_0000u32.to_le_bytes());

        let info = TableInfo::new(&data, valid).unwrap();
        assert_eq!(info.get(TableId::TypeDef).rows, 7);
        assert_eq!(info.get(TableId::Event).rows, 0x1_0000);
        assert!(info.is_large(TableId::Event));
        assert!(info.is_large_blob());
        assert!(!info.is_large_str());
    }

    #[test]
    fn header_truncated() {
        let valid = 1u64 << TableId::TypeDef as u64;
        let data = vec![0u8; 26];
        assert!(TableInfo::new(&data, valid).is_err());
    }
}
