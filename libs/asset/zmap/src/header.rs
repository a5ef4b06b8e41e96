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
use byteorder::{BigEndian, ByteOrder};
use log::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderTag {
    StartPositions,
    ActorList,
    Cameras,
    Collision,
    MapList,
    WindInfo,
    EntranceList,
    SpecialObjects,
    RoomBehavior,
    Unused09,
    Mesh,
    ObjectList,
    UnusedEnvSettings,
    Paths,
    TransitionActorList,
    EnvSettings,
    TimeSettings,
    SkyboxSettings,
    SkyboxModifier,
    ExitList,
    EndOfHeader,
    SceneSoundSettings,
    RoomSoundSettings,
    Cutscenes,
    ExtraHeaders,
    WorldMapCamera,
    Unknown(u8),
}

impl HeaderTag {
    pub fn from_u8(tag: u8) -> Self {
        match tag {
            0x00 => Self::StartPositions,
            0x01 => Self::ActorList,
            0x02 => Self::Cameras,
            0x03 => Self::Collision,
            0x04 => Self::MapList,
            0x05 => Self::WindInfo,
            0x06 => Self::EntranceList,
            0x07 => Self::SpecialObjects,
            0x08 => Self::RoomBehavior,
            0x09 => Self::Unused09,
            0x0A => Self::Mesh,
            0x0B => Self::ObjectList,
            0x0C => Self::UnusedEnvSettings,
            0x0D => Self::Paths,
            0x0E => Self::TransitionActorList,
            0x0F => Self::EnvSettings,
            0x10 => Self::TimeSettings,
            0x11 => Self::SkyboxSettings,
            0x12 => Self::SkyboxModifier,
            0x13 => Self::ExitList,
            0x14 => Self::EndOfHeader,
            0x15 => Self::SceneSoundSettings,
            0x16 => Self::RoomSoundSettings,
            0x17 => Self::Cutscenes,
            0x18 => Self::ExtraHeaders,
            0x19 => Self::WorldMapCamera,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StartPositions => "Start positions",
            Self::ActorList => "Actor list",
            Self::Cameras => "Cameras",
            Self::Collision => "Collision",
            Self::MapList => "Map list",
            Self::WindInfo => "Wind info",
            Self::EntranceList => "Entrance list",
            Self::SpecialObjects => "Special objects",
            Self::RoomBehavior => "Room behavior",
            Self::Unused09 => "Unused?",
            Self::Mesh => "Mesh",
            Self::ObjectList => "Object list",
            Self::UnusedEnvSettings => "Unused env settings",
            Self::Paths => "Paths",
            Self::TransitionActorList => "Transition actor list",
            Self::EnvSettings => "Env settings",
            Self::TimeSettings => "Time settings",
            Self::SkyboxSettings => "Skybox settings",
            Self::SkyboxModifier => "Skybox modifier",
            Self::ExitList => "Exit list",
            Self::EndOfHeader => "End of header",
            Self::SceneSoundSettings => "Sound settings (scene)",
            Self::RoomSoundSettings => "Sound settings (room)",
            Self::Cutscenes => "Cutscenes",
            Self::ExtraHeaders => "Extra headers",
            Self::WorldMapCamera => "Camera, world map",
            Self::Unknown(_) => "Unknown",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeaderRecord {
    pub offset: usize,
    pub tag: HeaderTag,
    pub raw: [u8; HeaderRecord::SIZE],
}

impl HeaderRecord {
    pub const SIZE: usize = 8;

    pub fn raw_tag(&self) -> u8 {
        self.raw[0]
    }

    /// The second word of the record; for the mesh record this is the pointer.
    pub fn payload_word(&self) -> u32 {
        BigEndian::read_u32(&self.raw[4..8])
    }
}

/// Everything the scan saw, in file order, up to and including the terminator.
#[derive(Clone, Debug)]
pub struct SceneHeader {
    pub records: Vec<HeaderRecord>,
    pub mesh_pointer: SegmentAddress,
}

pub struct HeaderScanner<'a> {
    store: &'a ByteStore,
}

impl<'a> HeaderScanner<'a> {
    pub fn new(store: &'a ByteStore) -> Self {
        Self { store }
    }

    // Records are walked strictly in order from offset 0, 8 bytes at a time,
    // until the first end-of-header tag.
    pub fn scan(&self) -> Result<SceneHeader, DecodeError> {
        let mut records = Vec::new();
        let mut mesh_pointer = None;
        let mut offset = 0;
        loop {
            let bytes = self
                .store
                .read_bytes(offset, HeaderRecord::SIZE)
                .map_err(|_| DecodeError::TruncatedHeader {
                    offset,
                    length: self.store.len(),
                })?;
            let mut raw = [0u8; HeaderRecord::SIZE];
            raw.copy_from_slice(bytes);
            let record = HeaderRecord {
                offset,
                tag: HeaderTag::from_u8(raw[0]),
                raw,
            };
            debug!(
                "@{:06X} header {:02X}: {}",
                offset,
                record.raw_tag(),
                record.tag.name()
            );

            let tag = record.tag;
            if tag == HeaderTag::Mesh {
                let pointer = SegmentAddress::from_word(record.payload_word());
                debug!("mesh address {}", pointer);
                mesh_pointer = Some(pointer);
            }
            records.push(record);
            if tag == HeaderTag::EndOfHeader {
                break;
            }
            offset += HeaderRecord::SIZE;
        }

        let mesh_pointer = mesh_pointer.ok_or(DecodeError::MissingMeshPointer { offset })?;
        Ok(SceneHeader {
            records,
            mesh_pointer,
        })
    }
}
