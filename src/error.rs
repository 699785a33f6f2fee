use thiserror::Error;

use crate::metadata::{
    tables::{CodedIndexType, TableId},
    token::Token,
};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Input errors (surfaced immediately)
/// - [`Error::InvalidArgument`] - A required constructor field is absent, or a member is attached twice
/// - [`Error::UnassignedToken`] - The writer was asked for a member it never received
///
/// ## Data-integrity errors
/// - [`Error::MalformedIndex`] - A coded index carries a tag outside its candidate list
/// - [`Error::UnresolvedReference`] - A non-zero token has no backing row
/// - [`Error::UnsortedTable`] - A table that must be sorted on a key column is not
/// - [`Error::Malformed`] - Corrupted tables stream or heap
/// - [`Error::OutOfBounds`] - Attempted to read or write beyond a buffer
///
/// Member attributes never return the data-integrity errors: the affected attribute degrades
/// to absence and the rest of the graph stays explorable.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was absent or empty when constructing a member, or a member that
    /// already has an owner was added to another collection.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// A coded index value whose tag is not part of the candidate list of its schema.
    #[error("Malformed coded index 0x{value:08x} for {index_type:?}")]
    MalformedIndex {
        /// The raw column value
        value: u32,
        /// The coded index schema used to decode `value`
        index_type: CodedIndexType,
    },

    /// A non-zero token does not point at an existing row.
    #[error("Unresolved reference - {0}")]
    UnresolvedReference(Token),

    /// A table which is required to be sorted on a key column is out of order.
    #[error("Table {table:?} is not sorted on column {column} (row {rid})")]
    UnsortedTable {
        /// The offending table
        table: TableId,
        /// The key column that must be ascending
        column: usize,
        /// The first row that breaks the ordering
        rid: u32,
    },

    /// The data is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading or writing a buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The writer was asked to reference a member that was never added to it.
    #[error("Member {0} has not been assigned a token by this writer")]
    UnassignedToken(Token),
}
