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
use log::{debug, trace};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MeshLayout {
    // 8 byte entries: opaque, translucent.
    Simple,
    // 16 byte entries: 8 unused bytes, then opaque, translucent. The table
    // holds one more entry than the count says.
    Extended,
}

impl MeshLayout {
    pub fn from_u8(kind: u8, offset: usize) -> Result<Self, DecodeError> {
        Ok(match kind {
            0x00 => Self::Simple,
            0x02 => Self::Extended,
            _ => return Err(DecodeError::UnsupportedMeshType { kind, offset }),
        })
    }

    pub fn stride(self) -> usize {
        match self {
            Self::Simple => 8,
            Self::Extended => 16,
        }
    }

    // Offsets of the opaque and translucent pointers within an entry.
    fn reference_offsets(self) -> (usize, usize) {
        match self {
            Self::Simple => (0, 4),
            Self::Extended => (8, 12),
        }
    }

    pub fn entries_for_count(self, entry_count: u8) -> usize {
        match self {
            Self::Simple => entry_count as usize,
            Self::Extended => entry_count as usize + 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MeshDescriptor {
    pub offset: usize,
    pub layout: MeshLayout,
    pub entry_count: u8,
    pub entry_table: SegmentAddress,
}

impl MeshDescriptor {
    pub fn from_store(store: &ByteStore, pointer: SegmentAddress) -> Result<Self, DecodeError> {
        let offset = Self::resolve_in_file(pointer)?;
        let layout = MeshLayout::from_u8(store.read_byte(offset)?, offset)?;
        let entry_count = store.read_byte(offset + 1)?;
        let entry_table = SegmentAddress::from_word(store.read_word(offset + 4)?);
        Self::resolve_in_file(entry_table)?;
        debug!(
            "mesh header @{:06X}: {:?} with {} entries at {}",
            offset, layout, entry_count, entry_table
        );
        Ok(Self {
            offset,
            layout,
            entry_count,
            entry_table,
        })
    }

    // Without the mesh header or its entry table the file has nothing to draw.
    fn resolve_in_file(address: SegmentAddress) -> Result<usize, DecodeError> {
        address
            .resolve()
            .map_err(|_| DecodeError::UnsupportedMeshBank {
                address: address.word(),
            })
    }

    pub fn entry_table_offset(&self) -> usize {
        self.entry_table.offset()
    }

    pub fn num_entries(&self) -> usize {
        self.layout.entries_for_count(self.entry_count)
    }
}

/// A display list inside a specific loaded file.
#[derive(Clone)]
pub struct DisplayListRef {
    store: ByteStore,
    offset: usize,
}

impl DisplayListRef {
    pub fn new(store: ByteStore, offset: usize) -> Self {
        Self { store, offset }
    }

    pub fn store(&self) -> &ByteStore {
        &self.store
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl PartialEq for DisplayListRef {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.store.same_buffer(&other.store)
    }
}

impl Eq for DisplayListRef {}

impl fmt::Debug for DisplayListRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DisplayList@{:06X}", self.offset)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bucket {
    Opaque,
    Translucent,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayLists {
    pub opaque: Vec<DisplayListRef>,
    pub translucent: Vec<DisplayListRef>,
}

impl DisplayLists {
    pub fn bucket(&self, bucket: Bucket) -> &[DisplayListRef] {
        match bucket {
            Bucket::Opaque => &self.opaque,
            Bucket::Translucent => &self.translucent,
        }
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.translucent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extend(&mut self, other: &DisplayLists) {
        self.opaque.extend(other.opaque.iter().cloned());
        self.translucent.extend(other.translucent.iter().cloned());
    }
}

pub struct MeshResolver<'a> {
    store: &'a ByteStore,
}

impl<'a> MeshResolver<'a> {
    pub fn new(store: &'a ByteStore) -> Self {
        Self { store }
    }

    pub fn resolve(
        &self,
        pointer: SegmentAddress,
    ) -> Result<(MeshDescriptor, DisplayLists), DecodeError> {
        let descriptor = MeshDescriptor::from_store(self.store, pointer)?;
        let lists = self.enumerate(&descriptor)?;
        Ok((descriptor, lists))
    }

    pub fn enumerate(&self, descriptor: &MeshDescriptor) -> Result<DisplayLists, DecodeError> {
        let (opaque_at, translucent_at) = descriptor.layout.reference_offsets();
        let mut lists = DisplayLists::default();
        let mut entry = descriptor.entry_table_offset();
        for _ in 0..descriptor.num_entries() {
            self.maybe_push(entry + opaque_at, &mut lists.opaque)?;
            self.maybe_push(entry + translucent_at, &mut lists.translucent)?;
            entry += descriptor.layout.stride();
        }
        Ok(lists)
    }

    // References outside the file are absent geometry, not an error.
    fn maybe_push(&self, at: usize, bucket: &mut Vec<DisplayListRef>) -> Result<(), DecodeError> {
        let reference = SegmentAddress::from_word(self.store.read_word(at)?);
        if reference.is_self_referential() {
            bucket.push(DisplayListRef::new(self.store.clone(), reference.offset()));
        } else {
            trace!("skipping display list reference {} at {:06X}", reference, at);
        }
        Ok(())
    }
}
