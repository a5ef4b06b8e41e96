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
use std::fmt;

/// Addresses embedded in a scene are 32 bit words: the top byte selects a
/// bank and the low 24 bits are an offset into it. Bank 3 is the scene file
/// itself; it is the only bank we can resolve.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct SegmentAddress(u32);

impl SegmentAddress {
    pub const SELF_BANK: u8 = 0x03;
    pub const OFFSET_MASK: u32 = 0x00FF_FFFF;

    pub fn from_word(word: u32) -> Self {
        Self(word)
    }

    pub fn word(self) -> u32 {
        self.0
    }

    pub fn bank(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn offset(self) -> usize {
        (self.0 & Self::OFFSET_MASK) as usize
    }

    pub fn is_self_referential(self) -> bool {
        self.bank() == Self::SELF_BANK
    }

    /// The file offset this address points at, if we can follow it.
    pub fn resolve(self) -> Result<usize, DecodeError> {
        if !self.is_self_referential() {
            return Err(DecodeError::UnsupportedBank { address: self.0 });
        }
        Ok(self.offset())
    }
}

impl fmt::Debug for SegmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02X}:{:06X}", self.bank(), self.offset())
    }
}

impl fmt::Display for SegmentAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn it_splits_bank_and_offset() -> Result<()> {
        let addr = SegmentAddress::from_word(0x0301_2340);
        assert_eq!(addr.bank(), 0x03);
        assert_eq!(addr.offset(), 0x01_2340);
        assert_eq!(addr.resolve()?, 0x01_2340);
        assert_eq!(format!("{:?}", addr), "03:012340");
        Ok(())
    }

    #[test]
    fn it_refuses_foreign_banks() {
        let addr = SegmentAddress::from_word(0x0200_0010);
        assert!(!addr.is_self_referential());
        assert_eq!(
            addr.resolve(),
            Err(DecodeError::UnsupportedBank {
                address: 0x0200_0010
            })
        );
    }
}
