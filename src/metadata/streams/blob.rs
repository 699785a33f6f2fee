//! The `#Blob` heap: length-prefixed binary values addressed by byte offset.
//!
//! Every entry starts with an ECMA-335 compressed length followed by that many bytes.
//! Offset 0 holds the empty blob. Signatures and custom attribute values live here.

use std::collections::HashMap;

use crate::{
    file::io::{read_compressed_uint_at, write_compressed_uint},
    Error::OutOfBounds,
    Result,
};

/// An owned `#Blob` heap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobHeap {
    data: Vec<u8>,
}

impl BlobHeap {
    /// Create a `BlobHeap` from a sequence of bytes
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty blob
    pub fn from(data: &[u8]) -> Result<BlobHeap> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(BlobHeap {
            data: data.to_vec(),
        })
    }

    /// Get a view into the blob contained at the provided location
    ///
    /// ## Arguments
    /// * 'offset' - The offset within the heap to be accessed (comes from metadata tables)
    ///
    /// # Errors
    /// Returns an error if the offset or the encoded length reaches past the heap
    pub fn get(&self, offset: u32) -> Result<&[u8]> {
        let index = offset as usize;
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut data_start = index;
        let len = read_compressed_uint_at(&self.data, &mut data_start)? as usize;

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }

    /// Size of the heap in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap only holds the empty blob
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() <= 1
    }

    /// Raw heap bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for BlobHeap {
    fn default() -> Self {
        BlobHeap { data: vec![0] }
    }
}

/// Builds a `#Blob` heap, storing every distinct value once.
#[derive(Debug)]
pub struct BlobHeapBuilder {
    data: Vec<u8>,
    offsets: HashMap<Vec<u8>, u32>,
}

impl BlobHeapBuilder {
    /// Creates a builder holding only the empty blob at offset 0
    #[must_use]
    pub fn new() -> Self {
        BlobHeapBuilder {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Adds `value` and returns its offset. The empty blob is always offset 0.
    ///
    /// # Errors
    /// Returns an error if `value` is too long for a compressed length or the heap outgrows `u32`
    pub fn add(&mut self, value: &[u8]) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }

        let offset = u32::try_from(self.data.len())
            .map_err(|_| malformed_error!("#Blob heap exceeds 4 GiB"))?;
        let len = u32::try_from(value.len())
            .map_err(|_| malformed_error!("Blob of {} bytes is too large", value.len()))?;
        write_compressed_uint(&mut self.data, len)?;
        self.data.extend_from_slice(value);
        self.offsets.insert(value.to_vec(), offset);

        Ok(offset)
    }

    /// Finishes the heap
    #[must_use]
    pub fn finish(self) -> BlobHeap {
        BlobHeap { data: self.data }
    }
}

impl Default for BlobHeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
