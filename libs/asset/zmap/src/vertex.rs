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
use crate::{error::DecodeError, store::ByteStore};
use byteorder::{BigEndian, ByteOrder};

/// One entry in the vertex table of a display list.
///
/// The last four bytes are either a signed normal (plus a spare byte) or an
/// RGBA color, depending on the shading mode latched when the vertex is drawn.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Vertex {
    pub position: [i16; 3],
    pub tex_coord: [i16; 2],
    pub extra: [u8; 4],
}

impl Vertex {
    pub const SIZE: usize = 16;

    // Layout:
    //   0..6   x, y, z
    //   6..8   unused
    //   8..12  u, v
    //   12..16 i, j, k, l
    pub fn from_bytes(data: &[u8; Self::SIZE]) -> Self {
        Self {
            position: [
                BigEndian::read_i16(&data[0..2]),
                BigEndian::read_i16(&data[2..4]),
                BigEndian::read_i16(&data[4..6]),
            ],
            tex_coord: [
                BigEndian::read_i16(&data[8..10]),
                BigEndian::read_i16(&data[10..12]),
            ],
            extra: [data[12], data[13], data[14], data[15]],
        }
    }

    pub fn from_store(store: &ByteStore, offset: usize) -> Result<Self, DecodeError> {
        let mut raw = [0u8; Self::SIZE];
        raw.copy_from_slice(store.read_bytes(offset, Self::SIZE)?);
        Ok(Self::from_bytes(&raw))
    }

    pub fn position_f32(&self) -> [f32; 3] {
        [
            f32::from(self.position[0]),
            f32::from(self.position[1]),
            f32::from(self.position[2]),
        ]
    }

    pub fn tex_coord_f32(&self) -> [f32; 2] {
        [f32::from(self.tex_coord[0]), f32::from(self.tex_coord[1])]
    }

    pub fn normal(&self) -> [i8; 3] {
        [
            self.extra[0] as i8,
            self.extra[1] as i8,
            self.extra[2] as i8,
        ]
    }

    // Not normalized; the backend is expected to renormalize.
    pub fn normal_f32(&self) -> [f32; 3] {
        let n = self.normal();
        [f32::from(n[0]), f32::from(n[1]), f32::from(n[2])]
    }

    pub fn color(&self) -> [f32; 4] {
        [
            f32::from(self.extra[0]) / 256f32,
            f32::from(self.extra[1]) / 256f32,
            f32::from(self.extra[2]) / 256f32,
            f32::from(self.extra[3]) / 256f32,
        ]
    }
}
