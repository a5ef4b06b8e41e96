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
use thiserror::Error;

/// How much of the decode an error takes down with it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorScope {
    /// The file cannot be used at all.
    File,
    /// Only the display list being interpreted is lost.
    DisplayList,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error("read of {width} bytes at 0x{offset:06X} runs past the end of a {length} byte buffer")]
    OutOfRange {
        offset: usize,
        width: usize,
        length: usize,
    },

    #[error("address {address:08X} is in unsupported bank {:02X}", .address >> 24)]
    UnsupportedBank { address: u32 },

    #[error("mesh address {address:08X} is in unsupported bank {:02X}", .address >> 24)]
    UnsupportedMeshBank { address: u32 },

    #[error("unsupported mesh type {kind:02X} in mesh header at 0x{offset:06X}")]
    UnsupportedMeshType { kind: u8, offset: usize },

    #[error("header ended at 0x{offset:06X} without a mesh record")]
    MissingMeshPointer { offset: usize },

    #[error("header record at 0x{offset:06X} runs past the end of a {length} byte buffer")]
    TruncatedHeader { offset: usize, length: usize },

    #[error("vertex slot {index} out of range ({slots} slots loaded) at pc 0x{pc:06X}")]
    IndexOutOfRange {
        index: usize,
        slots: usize,
        pc: usize,
    },

    #[error("call depth exceeded {limit} at pc 0x{pc:06X}")]
    StackOverflow { limit: usize, pc: usize },

    #[error("instruction budget of {limit} exhausted at pc 0x{pc:06X}")]
    InstructionLimit { limit: usize, pc: usize },
}

impl DecodeError {
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::OutOfRange { .. }
            | Self::UnsupportedMeshBank { .. }
            | Self::UnsupportedMeshType { .. }
            | Self::MissingMeshPointer { .. }
            | Self::TruncatedHeader { .. } => ErrorScope::File,
            Self::UnsupportedBank { .. }
            | Self::IndexOutOfRange { .. }
            | Self::StackOverflow { .. }
            | Self::InstructionLimit { .. } => ErrorScope::DisplayList,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_scopes_errors() {
        let oob = DecodeError::OutOfRange {
            offset: 8,
            width: 4,
            length: 10,
        };
        assert_eq!(oob.scope(), ErrorScope::File);
        let overflow = DecodeError::StackOverflow { limit: 64, pc: 0 };
        assert_eq!(overflow.scope(), ErrorScope::DisplayList);
        let bank = DecodeError::UnsupportedBank {
            address: 0x0600_1000,
        };
        assert_eq!(bank.scope(), ErrorScope::DisplayList);
        let mesh_bank = DecodeError::UnsupportedMeshBank {
            address: 0x0200_0020,
        };
        assert_eq!(mesh_bank.scope(), ErrorScope::File);
    }

    #[test]
    fn it_names_the_bank() {
        let bank = DecodeError::UnsupportedBank {
            address: 0x0600_1000,
        };
        assert_eq!(
            bank.to_string(),
            "address 06001000 is in unsupported bank 06"
        );
    }
}
