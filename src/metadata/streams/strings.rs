//! The `#Strings` heap: null-terminated UTF-8 strings addressed by byte offset.
//!
//! Offset 0 always holds the empty string. Names of types, members and generic parameters
//! are stored here, and the tables only carry the offset.

use std::{collections::HashMap, ffi::CStr, str};

use crate::{Error::OutOfBounds, Result};

/// An owned `#Strings` heap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringHeap {
    data: Vec<u8>,
}

impl StringHeap {
    /// Create a `StringHeap` from a sequence of bytes
    ///
    /// # Arguments
    /// * 'data'    - The heap contents, which must start with the empty string
    ///
    /// # Errors
    /// Returns an error if the string heap data is empty or malformed
    pub fn from(data: &[u8]) -> Result<StringHeap> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(StringHeap {
            data: data.to_vec(),
        })
    }

    /// Get a view into the string contained at the provided location
    ///
    /// ## Arguments
    /// * 'offset' - The offset within the heap to be accessed (comes from metadata tables)
    ///
    /// # Errors
    /// Returns an error if the offset is out of bounds or the string data is invalid UTF-8
    pub fn get(&self, offset: u32) -> Result<&str> {
        let index = offset as usize;
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }

    /// Size of the heap in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap only holds the empty string
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

impl Default for StringHeap {
    fn default() -> Self {
        StringHeap { data: vec![0] }
    }
}

/// Builds a `#Strings` heap, storing every distinct string once.
#[derive(Debug)]
pub struct StringHeapBuilder {
    data: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl StringHeapBuilder {
    /// Creates a builder holding only the empty string at offset 0
    #[must_use]
    pub fn new() -> Self {
        StringHeapBuilder {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Adds `value` and returns its offset. The empty string is always offset 0.
    ///
    /// # Errors
    /// Returns an error if `value` contains an interior null byte or the heap outgrows `u32`
    pub fn add(&mut self, value: &str) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }

        if value.as_bytes().contains(&0) {
            return Err(malformed_error!(
                "String '{}' contains a null byte",
                value.escape_debug()
            ));
        }

        let offset = u32::try_from(self.data.len())
            .map_err(|_| malformed_error!("#Strings heap exceeds 4 GiB"))?;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.offsets.insert(value.to_string(), offset);

        Ok(offset)
    }

    /// Finishes the heap
    #[must_use]
    pub fn finish(self) -> StringHeap {
        StringHeap { data: self.data }
    }
}

impl Default for StringHeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        let data: [u8; 18] = [
            0x00, 0x46, 0x6F, 0x6F, 0x00, 0x43, 0x68, 0x61, 0x6E, 0x67, 0x65, 0x64, 0x00, 0x42,
            0x61, 0x72, 0x00, 0x00,
        ];

        let heap = StringHeap::from(&data).unwrap();
        assert_eq!(heap.get(0).unwrap(), "");
        assert_eq!(heap.get(1).unwrap(), "Foo");
        assert_eq!(heap.get(5).unwrap(), "Changed");
        assert_eq!(heap.get(8).unwrap(), "nged");
        assert_eq!(heap.get(13).unwrap(), "Bar");
        assert!(heap.get(18).is_err());
    }

    #[test]
    fn invalid() {
        assert!(StringHeap::from(&[]).is_err());
        assert!(StringHeap::from(&[0x41, 0x00]).is_err());

        let unterminated = StringHeap::from(&[0x00, 0x41, 0x42]).unwrap();
        assert!(unterminated.get(1).is_err());

        let invalid_utf8 = StringHeap::from(&[0x00, 0xFF, 0xFE, 0x00]).unwrap();
        assert!(invalid_utf8.get(1).is_err());
    }

    #[test]
    fn builder_deduplicates() {
        let mut builder = StringHeapBuilder::new();
        assert_eq!(builder.add("").unwrap(), 0);

        let foo = builder.add("Foo").unwrap();
        let changed = builder.add("Changed").unwrap();
        assert_eq!(builder.add("Foo").unwrap(), foo);
        assert!(builder.add("A\0B").is_err());

        let heap = builder.finish();
        assert_eq!(heap.get(foo).unwrap(), "Foo");
        assert_eq!(heap.get(changed).unwrap(), "Changed");
        assert_eq!(heap.len(), 1 + 4 + 8);
    }
}
