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

// Assemble synthetic scene files for tests.
use crate::store::ByteStore;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A self-bank pointer to `offset`.
pub(crate) fn seg(offset: usize) -> u32 {
    0x0300_0000 | offset as u32
}

#[derive(Default)]
pub(crate) struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn reserve(&mut self, end: usize) {
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
    }

    pub(crate) fn bytes(&mut self, offset: usize, bytes: &[u8]) -> &mut Self {
        self.reserve(offset + bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub(crate) fn byte(&mut self, offset: usize, value: u8) -> &mut Self {
        self.bytes(offset, &[value])
    }

    pub(crate) fn word(&mut self, offset: usize, value: u32) -> &mut Self {
        self.bytes(offset, &value.to_be_bytes())
    }

    /// One 8 byte header record with the given tag and second word.
    pub(crate) fn record(&mut self, offset: usize, tag: u8, payload: u32) -> &mut Self {
        self.byte(offset, tag).word(offset + 4, payload)
    }

    /// A run of instructions starting at `offset`.
    pub(crate) fn program(&mut self, offset: usize, instrs: &[[u8; 8]]) -> &mut Self {
        for (i, instr) in instrs.iter().enumerate() {
            self.bytes(offset + i * 8, instr);
        }
        self
    }

    pub(crate) fn vertices(&mut self, offset: usize, verts: &[[u8; 16]]) -> &mut Self {
        for (i, v) in verts.iter().enumerate() {
            self.bytes(offset + i * 16, v);
        }
        self
    }

    pub(crate) fn pad_to(&mut self, len: usize) -> &mut Self {
        self.reserve(len);
        self
    }

    pub(crate) fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub(crate) fn store(&self) -> ByteStore {
        ByteStore::new(self.to_vec())
    }
}

fn instr(w0: u32, w1: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&w0.to_be_bytes());
    out[4..].copy_from_slice(&w1.to_be_bytes());
    out
}

pub(crate) fn vtx(count: u32, end_slot: u32, source: u32) -> [u8; 8] {
    instr(0x0100_0000 | (count << 12) | (end_slot * 2), source)
}

pub(crate) fn tri1(a: u8, b: u8, c: u8) -> [u8; 8] {
    [0x05, a * 2, b * 2, c * 2, 0, 0, 0, 0]
}

pub(crate) fn tri2(first: [u8; 3], second: [u8; 3]) -> [u8; 8] {
    [
        0x06,
        first[0] * 2,
        first[1] * 2,
        first[2] * 2,
        0,
        second[0] * 2,
        second[1] * 2,
        second[2] * 2,
    ]
}

pub(crate) fn quad() -> [u8; 8] {
    [0x07, 0, 2, 4, 0, 4, 6, 0]
}

pub(crate) fn set_mode(retain: u32, enable: u32) -> [u8; 8] {
    instr(0xD900_0000 | (retain & 0x00FF_FFFF), enable)
}

pub(crate) fn call(target: u32) -> [u8; 8] {
    instr(0xDE00_0000, target)
}

pub(crate) fn ret() -> [u8; 8] {
    instr(0xDF00_0000, 0)
}

pub(crate) fn noop(opcode: u8) -> [u8; 8] {
    [opcode, 0, 0, 0, 0, 0, 0, 0]
}

/// Raw 16 byte vertex record.
pub(crate) fn vertex(position: [i16; 3], tex_coord: [i16; 2], extra: [u8; 4]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&position[0].to_be_bytes());
    out[2..4].copy_from_slice(&position[1].to_be_bytes());
    out[4..6].copy_from_slice(&position[2].to_be_bytes());
    out[8..10].copy_from_slice(&tex_coord[0].to_be_bytes());
    out[10..12].copy_from_slice(&tex_coord[1].to_be_bytes());
    out[12..16].copy_from_slice(&extra);
    out
}
