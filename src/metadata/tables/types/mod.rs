//! # Metadata Table Types Module
//!
//! Core infrastructure for working with metadata tables: rows, tables, the coded index
//! schema and the table/heap size information that decides column widths.
//!
//! ## Key Components
//!
//! - [`MetadataRow`]: an immutable, fixed-arity tuple of `u32` columns addressed by a 1-based rid
//! - [`MetadataTable`]: ordered rows of one [`TableId`], with rid lookup and sorted range searches
//! - [`CodedIndexType`]: the shared coded index schema used for both decoding and encoding
//! - [`TableInfo`]: row counts and heap flags, deciding whether a column takes 2 or 4 bytes
//! - [`ColumnKind`] / [`columns`]: the per-table column layouts
//!
//! ## References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Partition II, Section 22

mod codedindex;
mod schema;
mod tableid;
mod tableinfo;

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::token::Token,
    Error, Result,
};

pub use codedindex::{CodedIndexType, CodedIndexTypeIter};
pub use schema::{columns, sorted_columns, ColumnKind};
pub use tableid::{TableId, TableIdIter};
pub use tableinfo::{TableInfo, TableRowInfo};

/// A single table row: the raw column values plus its position.
///
/// Rows are never mutated after they have been read; the objects built on top of them are.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRow {
    /// 1-based row id within its table
    pub rid: u32,
    /// Token of this row (table kind + rid)
    pub token: Token,
    /// Column values in schema order
    pub columns: Box<[u32]>,
}

impl MetadataRow {
    /// Value of the column at `index`, 0 if the row has fewer columns
    #[must_use]
    pub fn column(&self, index: usize) -> u32 {
        self.columns.get(index).copied().unwrap_or(0)
    }
}

/// A typed view of the rows of one table kind.
///
/// Implementations name the columns of a [`MetadataRow`]; they carry raw column values only
/// (heap offsets, encoded coded indices) and never resolve anything.
pub trait RowDefinition: Sized {
    /// The table this row type belongs to
    const TABLE: TableId;

    /// Reads the named columns of `row`
    fn from_row(row: &MetadataRow) -> Self;

    /// The column values in schema order
    fn columns(&self) -> Vec<u32>;
}

/// Ordered sequence of rows of one table kind, addressable by 1-based row id.
#[derive(Clone, Debug)]
pub struct MetadataTable {
    id: TableId,
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    /// Creates an empty table of the given kind
    #[must_use]
    pub fn new(id: TableId) -> Self {
        MetadataTable {
            id,
            rows: Vec::new(),
        }
    }

    /// Creates a table from raw column tuples; rids are assigned in order, starting at 1
    ///
    /// # Errors
    /// Returns an error if a row has the wrong arity
    pub fn with_rows<I>(id: TableId, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<u32>>,
    {
        let mut table = MetadataTable::new(id);
        for row in rows {
            table.push(row)?;
        }

        Ok(table)
    }

    /// Appends a row and returns its token
    ///
    /// # Errors
    /// Returns an error if the row has the wrong arity
    pub fn push(&mut self, columns: Vec<u32>) -> Result<Token> {
        let schema = schema::columns(self.id);
        if schema.len() != columns.len() {
            return Err(malformed_error!(
                "{:?} rows have {} columns, got {}",
                self.id,
                schema.len(),
                columns.len()
            ));
        }

        let rid = u32::try_from(self.rows.len() + 1)
            .map_err(|_| malformed_error!("Too many rows in {:?}", self.id))?;
        let token = Token::from_parts(self.id, rid);
        self.rows.push(MetadataRow {
            rid,
            token,
            columns: columns.into_boxed_slice(),
        });

        Ok(token)
    }

    /// The kind of this table
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the total number of rows in this table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        // Tokens limit tables to 2^24 rows
        #[allow(clippy::cast_possible_truncation)]
        let count = self.rows.len() as u32;
        count
    }

    /// Returns true if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over all rows in rid order
    pub fn iter(&self) -> std::slice::Iter<'_, MetadataRow> {
        self.rows.iter()
    }

    /// Retrieves a specific row by its 1-based index.
    ///
    /// Returns `None` if `rid` is 0 or exceeds the row count.
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<&MetadataRow> {
        if rid == 0 {
            return None;
        }

        self.rows.get(rid as usize - 1)
    }

    /// Returns the row with the greatest value in `column` that is less than or equal to `key`.
    ///
    /// The table must be sorted ascending on `column`. Among equal keys the last row wins,
    /// which is what makes empty ranges of a range map resolve to the following owner.
    /// Returns `None` if every row's key is greater than `key`.
    #[must_use]
    pub fn get_row_closest_to_key(&self, column: usize, key: u32) -> Option<&MetadataRow> {
        let end = self.rows.partition_point(|row| row.column(column) <= key);
        if end == 0 {
            return None;
        }

        self.rows.get(end - 1)
    }

    /// Returns the contiguous rows whose `column` equals `key`.
    ///
    /// The table must be sorted ascending on `column`.
    #[must_use]
    pub fn rows_with_key(&self, column: usize, key: u32) -> &[MetadataRow] {
        let start = self.rows.partition_point(|row| row.column(column) < key);
        let end = self.rows.partition_point(|row| row.column(column) <= key);

        &self.rows[start..end]
    }

    /// Verifies that every column the format keeps sorted is non-decreasing.
    ///
    /// # Errors
    /// Returns [`Error::UnsortedTable`] for the first row breaking the order.
    pub fn validate_sorted(&self) -> Result<()> {
        for column in schema::sorted_columns(self.id) {
            if let Some(pair) = self
                .rows
                .windows(2)
                .find(|pair| pair[0].column(*column) > pair[1].column(*column))
            {
                return Err(Error::UnsortedTable {
                    table: self.id,
                    column: *column,
                    rid: pair[1].rid,
                });
            }
        }

        Ok(())
    }

    /// Stable-sorts the rows on `column` and renumbers rids and tokens.
    ///
    /// Only valid for tables whose rows are not referenced by rid from elsewhere.
    pub fn sort_by_column(&mut self, column: usize) {
        self.rows.sort_by_key(|row| row.column(column));
        for (index, row) in self.rows.iter_mut().enumerate() {
            // Bounded by the row count, which fits a token
            #[allow(clippy::cast_possible_truncation)]
            let rid = index as u32 + 1;
            row.rid = rid;
            row.token = Token::from_parts(self.id, rid);
        }
    }

    /// Returns the size of this table in bytes, given the column widths in `info`.
    #[must_use]
    pub fn size(&self, info: &TableInfo) -> u64 {
        u64::from(self.row_count()) * u64::from(info.row_size(schema::columns(self.id)))
    }

    /// Reads `row_count` rows of kind `id` starting at `offset`, advancing it.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if `data` is too short to hold `row_count` rows
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        id: TableId,
        row_count: u32,
        info: &TableInfo,
    ) -> Result<Self> {
        let schema = schema::columns(id);

        let needed = (row_count as usize)
            .checked_mul(info.row_size(schema) as usize)
            .ok_or(Error::OutOfBounds)?;
        if data.len().saturating_sub(*offset) < needed {
            return Err(Error::OutOfBounds);
        }

        let mut table = MetadataTable::new(id);
        table.rows.reserve(row_count as usize);
        for rid in 1..=row_count {
            let columns = schema
                .iter()
                .map(|kind| read_le_at_dyn(data, offset, info.is_large_column(*kind)))
                .collect::<Result<Vec<u32>>>()?;

            table.rows.push(MetadataRow {
                rid,
                token: Token::from_parts(id, rid),
                columns: columns.into_boxed_slice(),
            });
        }

        Ok(table)
    }

    /// Writes all rows at `offset`, advancing it.
    ///
    /// # Errors
    /// Returns an error if the buffer is too small or a value does not fit into its column
    /// width
    pub fn write(&self, data: &mut [u8], offset: &mut usize, info: &TableInfo) -> Result<()> {
        let schema = schema::columns(self.id);

        for row in &self.rows {
            for (index, kind) in schema.iter().enumerate() {
                write_le_at_dyn(data, offset, row.column(index), info.is_large_column(*kind))?;
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a MetadataTable {
    type Item = &'a MetadataRow;
    type IntoIter = std::slice::Iter<'a, MetadataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
