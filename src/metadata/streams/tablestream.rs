//! The `#~` tables stream: every metadata table of a module plus its header.
//!
//! [`TableStream`] is the row store underneath a [`crate::metadata::image::MetadataImage`].
//! It answers three kinds of questions, all by position:
//!
//! - rid lookup ([`TableStream::get_row_by_rid`])
//! - "which owner does this row belong to" over a range map
//!   ([`TableStream::get_row_closest_to_key`])
//! - "which rows carry this key" over a sorted association table
//!   ([`TableStream::rows_with_key`])
//!
//! The stream can be parsed from and serialized to the ECMA-335 II.24.2.6 layout:
//!
//! ```text
//! u32 reserved | u8 major | u8 minor | u8 heap sizes | u8 reserved
//! u64 valid | u64 sorted | u32 rows[valid.count_ones()] | tables...
//! ```

use std::borrow::Cow;

use strum::IntoEnumIterator;

use crate::{
    file::io::{read_le, write_le_at},
    metadata::tables::{sorted_columns, MetadataRow, MetadataTable, TableId, TableInfo},
    Error::OutOfBounds,
    Result,
};

const HEADER_SIZE: usize = 24;

/// Ordered collection of metadata tables
#[derive(Clone, Debug)]
pub struct TableStream {
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// `#GUID` heap indices take 4 bytes
    pub large_guid: bool,
    /// Sorted bits read from the header, kept for tables without a known key column
    sorted: u64,
    tables: Vec<Option<MetadataTable>>,
}

impl TableStream {
    /// Creates a stream without any tables
    #[must_use]
    pub fn new() -> Self {
        let mut tables = Vec::with_capacity(TableId::SLOTS);
        tables.resize_with(TableId::SLOTS, || None);

        TableStream {
            major_version: 2,
            minor_version: 0,
            large_guid: false,
            sorted: 0,
            tables,
        }
    }

    /// Creates a stream holding `tables`; a later table of the same kind replaces an earlier one
    #[must_use]
    pub fn from_tables<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = MetadataTable>,
    {
        let mut stream = TableStream::new();
        for table in tables {
            stream.set_table(table);
        }

        stream
    }

    /// Inserts or replaces the table of `table.id()`
    pub fn set_table(&mut self, table: MetadataTable) {
        let slot = table.id() as usize;
        self.tables[slot] = Some(table);
    }

    /// Returns the table of `kind`, or an empty table if this stream has none
    #[must_use]
    pub fn get_table(&self, kind: TableId) -> Cow<'_, MetadataTable> {
        match self.table(kind) {
            Some(table) => Cow::Borrowed(table),
            None => Cow::Owned(MetadataTable::new(kind)),
        }
    }

    /// Returns true if the stream has at least one row of `kind`
    #[must_use]
    pub fn has_table(&self, kind: TableId) -> bool {
        self.table(kind).is_some_and(|table| !table.is_empty())
    }

    /// Iterates the non-empty tables in table id order
    pub fn present_tables(&self) -> impl Iterator<Item = &MetadataTable> + '_ {
        self.tables
            .iter()
            .flatten()
            .filter(|table| !table.is_empty())
    }

    /// Number of rows of `kind`, 0 if absent
    #[must_use]
    pub fn row_count(&self, kind: TableId) -> u32 {
        self.table(kind).map_or(0, MetadataTable::row_count)
    }

    /// Returns the row `rid` (1-based) of `kind`
    #[must_use]
    pub fn get_row_by_rid(&self, kind: TableId, rid: u32) -> Option<&MetadataRow> {
        self.table(kind)?.get(rid)
    }

    /// Returns the row of `kind` with the greatest `column` value that is `<= key`.
    ///
    /// See [`MetadataTable::get_row_closest_to_key`].
    #[must_use]
    pub fn get_row_closest_to_key(
        &self,
        kind: TableId,
        column: usize,
        key: u32,
    ) -> Option<&MetadataRow> {
        self.table(kind)?.get_row_closest_to_key(column, key)
    }

    /// Returns the rows of `kind` whose `column` equals `key`.
    ///
    /// See [`MetadataTable::rows_with_key`].
    #[must_use]
    pub fn rows_with_key(&self, kind: TableId, column: usize, key: u32) -> &[MetadataRow] {
        match self.table(kind) {
            Some(table) => table.rows_with_key(column, key),
            None => &[],
        }
    }

    /// Validates the key columns of every present table.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsortedTable`] for the first offending row
    pub fn validate_sorted(&self) -> Result<()> {
        for table in self.present_tables() {
            table.validate_sorted()?;
        }

        Ok(())
    }

    /// Column widths of this stream, given the `#Strings` and `#Blob` index widths
    #[must_use]
    pub fn table_info(&self, large_str: bool, large_blob: bool) -> TableInfo {
        let rows: Vec<(TableId, u32)> = self
            .present_tables()
            .map(|table| (table.id(), table.row_count()))
            .collect();

        TableInfo::from_rows(&rows, large_str, large_blob, self.large_guid)
    }

    /// Parse a tables stream
    ///
    /// # Arguments
    /// * 'data' - The stream, starting at its header
    ///
    /// # Errors
    /// Returns an error if the data is truncated, marks unknown tables as present, or claims
    /// more rows than a token can address
    pub fn parse(data: &[u8]) -> Result<TableStream> {
        if data.len() < HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let valid = read_le::<u64>(&data[8..])?;
        let known = TableId::iter().fold(0u64, |mask, id| mask | (1u64 << id as u64));
        if valid & !known != 0 {
            return Err(malformed_error!(
                "Tables stream marks unknown tables as present - 0x{:016x}",
                valid & !known
            ));
        }

        let info = TableInfo::new(data, valid)?;
        let mut stream = TableStream::new();
        stream.major_version = read_le::<u8>(&data[4..])?;
        stream.minor_version = read_le::<u8>(&data[5..])?;
        stream.large_guid = info.is_large_guid();
        stream.sorted = read_le::<u64>(&data[16..])? & valid;

        let mut offset = HEADER_SIZE + valid.count_ones() as usize * 4;
        for id in TableId::iter() {
            if valid & (1u64 << id as u64) == 0 {
                continue;
            }

            let rows = info.get(id).rows;
            stream.set_table(MetadataTable::read(data, &mut offset, id, rows, &info)?);
        }

        tracing::debug!(
            tables = valid.count_ones(),
            size = offset,
            "parsed tables stream"
        );

        Ok(stream)
    }

    /// Serialize this stream
    ///
    /// ## Arguments
    /// * 'large_str'   - `#Strings` heap offsets take 4 bytes
    /// * 'large_blob'  - `#Blob` heap offsets take 4 bytes
    ///
    /// # Errors
    /// Returns an error if a value does not fit its column
    pub fn to_bytes(&self, large_str: bool, large_blob: bool) -> Result<Vec<u8>> {
        let info = self.table_info(large_str, large_blob);

        let mut valid = 0u64;
        let mut sorted = 0u64;
        let mut size = HEADER_SIZE as u64;
        for table in self.present_tables() {
            let bit = 1u64 << table.id() as u64;
            valid |= bit;
            if !sorted_columns(table.id()).is_empty() || self.sorted & bit != 0 {
                sorted |= bit;
            }
            size += 4 + table.size(&info);
        }

        let size = usize::try_from(size).map_err(|_| malformed_error!("Tables stream too large"))?;
        let mut data = vec![0u8; size];
        let mut offset = 0;
        write_le_at::<u32>(&mut data, &mut offset, 0)?;
        write_le_at::<u8>(&mut data, &mut offset, self.major_version)?;
        write_le_at::<u8>(&mut data, &mut offset, self.minor_version)?;
        write_le_at::<u8>(&mut data, &mut offset, info.heap_size_flags())?;
        write_le_at::<u8>(&mut data, &mut offset, 1)?;
        write_le_at::<u64>(&mut data, &mut offset, valid)?;
        write_le_at::<u64>(&mut data, &mut offset, sorted)?;

        for table in self.present_tables() {
            write_le_at::<u32>(&mut data, &mut offset, table.row_count())?;
        }

        for table in self.present_tables() {
            table.write(&mut data, &mut offset, &info)?;
        }

        Ok(data)
    }

    fn table(&self, kind: TableId) -> Option<&MetadataTable> {
        self.tables.get(kind as usize).and_then(Option::as_ref)
    }
}

impl Default for TableStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::token::Token, Error};

    fn stream() -> TableStream {
        TableStream::from_tables([
            MetadataTable::with_rows(
                TableId::TypeDef,
                vec![
                    vec![0, 1, 0, 0, 1, 1],
                    vec![0x0010_0001, 5, 9, 0, 1, 1],
                ],
            )
            .unwrap(),
            MetadataTable::with_rows(TableId::EventMap, vec![vec![2, 1]]).unwrap(),
            MetadataTable::with_rows(
                TableId::Event,
                vec![vec![0, 13, 0x04], vec![0x0200, 13, 0x0D]],
            )
            .unwrap(),
        ])
    }

    #[test]
    fn absent_tables_are_empty() {
        let stream = stream();
        let table = stream.get_table(TableId::Property);
        assert_eq!(table.id(), TableId::Property);
        assert!(table.is_empty());
        assert!(!stream.has_table(TableId::Property));
        assert!(stream.get_row_by_rid(TableId::Property, 1).is_none());
        assert!(stream
            .get_row_closest_to_key(TableId::PropertyMap, 1, 1)
            .is_none());
        assert!(stream.rows_with_key(TableId::MethodSemantics, 2, 1).is_empty());
    }

    #[test]
    fn rid_lookup() {
        let stream = stream();
        assert!(stream.get_row_by_rid(TableId::Event, 0).is_none());
        assert!(stream.get_row_by_rid(TableId::Event, 3).is_none());
        assert_eq!(
            stream.get_row_by_rid(TableId::Event, 2).unwrap().token,
            Token::new(0x1400_0002)
        );
        assert_eq!(stream.row_count(TableId::TypeDef), 2);
    }

    #[test]
    fn roundtrip() {
        let stream = stream();
        let bytes = stream.to_bytes(false, false).unwrap();

        // header + 3 row counts + TypeDef(2 * 14) + EventMap(1 * 4) + Event(2 * 6)
        assert_eq!(bytes.len(), 24 + 12 + 28 + 4 + 12);

        let parsed = TableStream::parse(&bytes).unwrap();
        assert_eq!(parsed.major_version, 2);
        for kind in [TableId::TypeDef, TableId::EventMap, TableId::Event] {
            let original: Vec<MetadataRow> = stream.get_table(kind).iter().cloned().collect();
            let reparsed: Vec<MetadataRow> = parsed.get_table(kind).iter().cloned().collect();
            assert_eq!(original, reparsed);
        }
        assert_eq!(
            parsed.get_row_by_rid(TableId::TypeDef, 2),
            stream.get_row_by_rid(TableId::TypeDef, 2)
        );
        assert_eq!(
            parsed.get_row_by_rid(TableId::Event, 2),
            stream.get_row_by_rid(TableId::Event, 2)
        );
    }

    #[test]
    fn large_heaps_widen_columns() {
        let stream = stream();
        let bytes = stream.to_bytes(true, true).unwrap();

        // TypeDef gains 2 * 2 bytes per row, Event 2 bytes per row
        assert_eq!(bytes.len(), 24 + 12 + 36 + 4 + 16);
        assert_eq!(bytes[6], 0b101);

        let parsed = TableStream::parse(&bytes).unwrap();
        assert_eq!(
            parsed.get_row_by_rid(TableId::Event, 1),
            stream.get_row_by_rid(TableId::Event, 1)
        );
    }

    #[test]
    fn parse_rejects_unknown_tables() {
        let mut data = vec![0u8; 24];
        data[8..16].copy_from_slice(&(1u64 << 0x2E).to_le_bytes());
        assert!(matches!(
            TableStream::parse(&data),
            Err(Error::Malformed { .. })
        ));
    }

    /// A stream header with a single present table of `rows` rows and no row data
    fn header(table: TableId, rows: u32) -> Vec<u8> {
        let mut data = vec![0u8; 24];
        data[8..16].copy_from_slice(&(1u64 << table as u64).to_le_bytes());
        data.extend_from_slice(&rows.to_le_bytes());
        data
    }

    #[test]
    fn parse_rejects_impossible_row_counts() {
        assert!(matches!(
            TableStream::parse(&header(TableId::Event, 0xFFFF_FFF0)),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            TableStream::parse(&header(TableId::Event, 0x00FF_FFFF)),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn parse_keeps_unmodeled_tables() {
        let mut data = vec![0u8; 24];
        data[4] = 2;
        data[7] = 1;
        let valid = (1u64 << TableId::Module as u64) | (1u64 << TableId::Assembly as u64);
        data[8..16].copy_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());

        #[rustfmt::skip]
        data.extend_from_slice(&[
            0x00, 0x00,             // Module: generation
            0x01, 0x00,             // name
            0x01, 0x00,             // mvid
            0x00, 0x00, 0x00, 0x00, // enc id, enc base id
        ]);
        #[rustfmt::skip]
        data.extend_from_slice(&[
            0x04, 0x80, 0x00, 0x00, // Assembly: hash algorithm (SHA1)
            0x01, 0x00, 0x02, 0x00, // major, minor
            0x03, 0x00, 0x04, 0x00, // build, revision
            0x00, 0x00, 0x00, 0x00, // flags
            0x00, 0x00,             // public key
            0x08, 0x00,             // name
            0x00, 0x00,             // culture
        ]);

        let stream = TableStream::parse(&data).unwrap();
        assert_eq!(stream.row_count(TableId::Module), 1);
        let assembly = stream.get_row_by_rid(TableId::Assembly, 1).unwrap();
        assert_eq!(assembly.token, Token::new(0x2000_0001));
        assert_eq!(assembly.column(0), 0x8004);
        assert_eq!(assembly.column(2), 2);
        assert_eq!(assembly.column(7), 8);

        assert_eq!(stream.to_bytes(false, false).unwrap(), data);
    }

    #[test]
    fn large_guid_flag_survives() {
        let mut data = vec![0u8; 24];
        data[6] = 0b010;
        data[7] = 1;
        data[8..16].copy_from_slice(&(1u64 << TableId::Module as u64).to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        #[rustfmt::skip]
        data.extend_from_slice(&[
            0x00, 0x00,             // generation
            0x01, 0x00,             // name
            0x01, 0x00, 0x00, 0x00, // mvid
            0x00, 0x00, 0x00, 0x00, // enc id
            0x00, 0x00, 0x00, 0x00, // enc base id
        ]);

        let stream = TableStream::parse(&data).unwrap();
        assert!(stream.large_guid);
        assert_eq!(stream.get_row_by_rid(TableId::Module, 1).unwrap().column(2), 1);

        let bytes = stream.to_bytes(false, false).unwrap();
        assert_eq!(bytes[6], 0b010);
        assert_eq!(bytes, data);
    }

    #[test]
    fn parse_truncated() {
        let bytes = stream().to_bytes(false, false).unwrap();
        assert!(TableStream::parse(&bytes[..bytes.len() - 1]).is_err());
        assert!(TableStream::parse(&bytes[..20]).is_err());
    }

    #[test]
    fn validate() {
        assert!(stream().validate_sorted().is_ok());

        let unsorted = TableStream::from_tables([MetadataTable::with_rows(
            TableId::EventMap,
            vec![vec![1, 4], vec![2, 2]],
        )
        .unwrap()]);
        assert!(matches!(
            unsorted.validate_sorted(),
            Err(Error::UnsortedTable { .. })
        ));
    }
}
