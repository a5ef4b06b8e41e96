// This file is part of Zev.
//
// Zev is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Zev is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Zev.  If not, see <http://www.gnu.org/licenses/>.
use crate::error::DecodeError;
use byteorder::{BigEndian, ByteOrder};
use std::{fmt, sync::Arc};

/// The raw bytes of one loaded scene file. Immutable once built; clones share
/// the same allocation, which is also what identifies a buffer.
#[derive(Clone)]
pub struct ByteStore {
    data: Arc<[u8]>,
}

impl ByteStore {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if both handles refer to the same loaded file.
    pub fn same_buffer(&self, other: &ByteStore) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn read_bytes(&self, offset: usize, width: usize) -> Result<&[u8], DecodeError> {
        let end = offset.checked_add(width).ok_or(DecodeError::OutOfRange {
            offset,
            width,
            length: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(DecodeError::OutOfRange {
                offset,
                width,
                length: self.data.len(),
            });
        }
        Ok(&self.data[offset..end])
    }

    pub fn read_byte(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    pub fn read_word(&self, offset: usize) -> Result<u32, DecodeError> {
        Ok(BigEndian::read_u32(self.read_bytes(offset, 4)?))
    }
}

impl fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteStore({} bytes @ {:p})", self.data.len(), self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn it_reads_big_endian() -> Result<()> {
        let store = ByteStore::new(vec![0x03, 0x00, 0x12, 0x34, 0xFF]);
        assert_eq!(store.read_byte(0)?, 0x03);
        assert_eq!(store.read_word(0)?, 0x0300_1234);
        assert_eq!(store.read_word(1)?, 0x0012_34FF);
        Ok(())
    }

    #[test]
    fn it_rejects_reads_past_the_end() {
        let store = ByteStore::new(vec![0u8; 6]);
        assert_eq!(
            store.read_word(3),
            Err(DecodeError::OutOfRange {
                offset: 3,
                width: 4,
                length: 6
            })
        );
        assert!(store.read_byte(6).is_err());
        assert!(store.read_bytes(usize::MAX, 2).is_err());
        assert!(store.read_bytes(6, 0).is_ok());
    }

    #[test]
    fn it_tracks_buffer_identity() {
        let a = ByteStore::new(vec![1, 2, 3]);
        let b = ByteStore::new(vec![1, 2, 3]);
        assert!(a.same_buffer(&a.clone()));
        assert!(!a.same_buffer(&b));
    }
}
