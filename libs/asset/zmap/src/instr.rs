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
use crate::{error::DecodeError, segment::SegmentAddress, store::ByteStore};
use bitflags::bitflags;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

bitflags! {
    pub struct GeometryMode : u32 {
        const FILTER   = 0x0020_0000;
        const LIGHTING = 0x0002_0000;
    }
}

/// One decoded display list instruction. Every instruction is 8 bytes wide.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instr {
    // Vertex slot indices are stored doubled in the bytecode; these are halved.
    LoadVertices {
        count: usize,
        end_slot: usize,
        source: SegmentAddress,
    },
    Triangle {
        slots: [usize; 3],
    },
    TrianglePair {
        slots: [[usize; 3]; 2],
    },
    Quad,
    SetMode {
        retain: GeometryMode,
        enable: GeometryMode,
    },
    Call {
        target: SegmentAddress,
    },
    Return,
    Unknown {
        opcode: u8,
    },
}

impl Instr {
    pub const SIZE: usize = 8;

    pub const LOAD_VERTICES: u8 = 0x01;
    pub const TRIANGLE: u8 = 0x05;
    pub const TRIANGLE_PAIR: u8 = 0x06;
    pub const QUAD: u8 = 0x07;
    pub const SET_MODE: u8 = 0xD9;
    pub const CALL: u8 = 0xDE;
    pub const RETURN: u8 = 0xDF;

    pub fn from_bytes(data: &[u8; Self::SIZE]) -> Self {
        let w0 = BigEndian::read_u32(&data[0..4]);
        let w1 = BigEndian::read_u32(&data[4..8]);
        let slot = |b: u8| (b / 2) as usize;
        match data[0] {
            Self::LOAD_VERTICES => Self::LoadVertices {
                count: ((w0 & 0x00FF_F000) >> 12) as usize,
                end_slot: ((w0 & 0x0000_0FFF) / 2) as usize,
                source: SegmentAddress::from_word(w1),
            },
            Self::TRIANGLE => Self::Triangle {
                slots: [slot(data[1]), slot(data[2]), slot(data[3])],
            },
            Self::TRIANGLE_PAIR => Self::TrianglePair {
                slots: [
                    [slot(data[1]), slot(data[2]), slot(data[3])],
                    [slot(data[5]), slot(data[6]), slot(data[7])],
                ],
            },
            Self::QUAD => Self::Quad,
            Self::SET_MODE => Self::SetMode {
                retain: GeometryMode::from_bits_truncate(w0),
                enable: GeometryMode::from_bits_truncate(w1),
            },
            Self::CALL => Self::Call {
                target: SegmentAddress::from_word(w1),
            },
            Self::RETURN => Self::Return,
            opcode => Self::Unknown { opcode },
        }
    }

    pub fn opcode(&self) -> u8 {
        match self {
            Self::LoadVertices { .. } => Self::LOAD_VERTICES,
            Self::Triangle { .. } => Self::TRIANGLE,
            Self::TrianglePair { .. } => Self::TRIANGLE_PAIR,
            Self::Quad => Self::QUAD,
            Self::SetMode { .. } => Self::SET_MODE,
            Self::Call { .. } => Self::CALL,
            Self::Return => Self::RETURN,
            Self::Unknown { opcode } => *opcode,
        }
    }

    pub fn magic(&self) -> &'static str {
        match self {
            Self::LoadVertices { .. } => "Vtx",
            Self::Triangle { .. } => "Tri1",
            Self::TrianglePair { .. } => "Tri2",
            Self::Quad => "Quad",
            Self::SetMode { .. } => "GeoMode",
            Self::Call { .. } => "Call",
            Self::Return => "Return",
            Self::Unknown { .. } => "Unknown",
        }
    }

    pub fn show(&self) -> String {
        match self {
            Self::LoadVertices {
                count,
                end_slot,
                source,
            } => format!(
                "{}: {} verts ending at slot {} from {}",
                self.magic(),
                count,
                end_slot,
                source
            ),
            Self::Triangle { slots } => format!("{}: {:?}", self.magic(), slots),
            Self::TrianglePair { slots } => {
                format!("{}: {:?} {:?}", self.magic(), slots[0], slots[1])
            }
            Self::SetMode { retain, enable } => {
                format!("{}: retain {:?}, enable {:?}", self.magic(), retain, enable)
            }
            Self::Call { target } => format!("{}: {}", self.magic(), target),
            Self::Unknown { opcode } => format!("{}: {:02X}", self.magic(), opcode),
            Self::Quad | Self::Return => self.magic().to_owned(),
        }
    }
}

/// An instruction together with where it came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodedInstr {
    pub offset: usize,
    pub raw: [u8; Instr::SIZE],
    pub instr: Instr,
}

impl DecodedInstr {
    pub fn decode(store: &ByteStore, offset: usize) -> Result<Self, DecodeError> {
        let mut raw = [0u8; Instr::SIZE];
        raw.copy_from_slice(store.read_bytes(offset, Instr::SIZE)?);
        Ok(Self {
            offset,
            raw,
            instr: Instr::from_bytes(&raw),
        })
    }

    pub fn show(&self) -> String {
        format!("@{:06X} {}| {}", self.offset, bs2s(&self.raw), self.instr.show())
    }
}

impl fmt::Display for DecodedInstr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

pub fn bs2s(bs: &[u8]) -> String {
    let mut s = String::with_capacity(bs.len() * 3);
    for b in bs {
        s += &format!("{:02X} ", b);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{call, quad, ret, seg, set_mode, tri1, tri2, vtx, Blob};
    use anyhow::Result;

    #[test]
    fn it_decodes_vertex_loads() {
        let instr = Instr::from_bytes(&vtx(4, 10, seg(0x400)));
        assert_eq!(
            instr,
            Instr::LoadVertices {
                count: 4,
                end_slot: 10,
                source: SegmentAddress::from_word(0x0300_0400),
            }
        );
        assert_eq!(instr.opcode(), Instr::LOAD_VERTICES);
    }

    #[test]
    fn it_halves_triangle_indices() {
        assert_eq!(
            Instr::from_bytes(&tri1(0, 1, 31)),
            Instr::Triangle { slots: [0, 1, 31] }
        );
        assert_eq!(
            Instr::from_bytes(&tri2([1, 2, 3], [4, 5, 6])),
            Instr::TrianglePair {
                slots: [[1, 2, 3], [4, 5, 6]]
            }
        );
        assert_eq!(
            Instr::from_bytes(&[0x05, 0x03, 0x05, 0xFF, 0, 0, 0, 0]),
            Instr::Triangle {
                slots: [1, 2, 127]
            }
        );
    }

    #[test]
    fn it_decodes_control_and_mode() {
        assert_eq!(Instr::from_bytes(&ret()), Instr::Return);
        assert_eq!(Instr::from_bytes(&quad()), Instr::Quad);
        assert_eq!(
            Instr::from_bytes(&call(seg(0x80))),
            Instr::Call {
                target: SegmentAddress::from_word(0x0300_0080)
            }
        );
        assert_eq!(
            Instr::from_bytes(&set_mode(0x00FF_FFFF, 0x0002_0000)),
            Instr::SetMode {
                retain: GeometryMode::FILTER | GeometryMode::LIGHTING,
                enable: GeometryMode::LIGHTING,
            }
        );
        assert_eq!(
            Instr::from_bytes(&[0xE7, 0, 0, 0, 0, 0, 0, 0]),
            Instr::Unknown { opcode: 0xE7 }
        );
    }

    #[test]
    fn it_shows_instructions() -> Result<()> {
        let store = Blob::new().program(0x08, &[tri1(1, 2, 3)]).store();
        let decoded = DecodedInstr::decode(&store, 0x08)?;
        assert_eq!(
            decoded.show(),
            "@000008 05 02 04 06 00 00 00 00 | Tri1: [1, 2, 3]"
        );
        assert!(DecodedInstr::decode(&store, 0x09).is_err());
        assert_eq!(
            Instr::from_bytes(&vtx(4, 10, seg(0x400))).show(),
            "Vtx: 4 verts ending at slot 10 from 03000400"
        );
        // More verts than the end slot; shown as written.
        assert_eq!(
            Instr::from_bytes(&vtx(6, 2, seg(0x400))).show(),
            "Vtx: 6 verts ending at slot 2 from 03000400"
        );
        Ok(())
    }
}
