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
use crate::{
    error::{DecodeError, ErrorScope},
    header::{HeaderScanner, SceneHeader},
    interp::{Interpreter, InterpreterLimits},
    mesh::{Bucket, DisplayListRef, DisplayLists, MeshDescriptor, MeshResolver},
    sink::{NullSink, PrimitiveSink, Triangle},
    store::ByteStore,
};
use log::{info, warn};
use std::str::FromStr;

/// One decoded scene file: its header, mesh and display lists.
#[derive(Clone, Debug)]
pub struct ZMap {
    store: ByteStore,
    header: SceneHeader,
    mesh: MeshDescriptor,
    display_lists: DisplayLists,
    broken_lists: Vec<(DisplayListRef, DecodeError)>,
}

impl ZMap {
    /// Load a file and check every display list once. Running off the end of
    /// the buffer anywhere rejects the file; any other failure only marks
    /// that list as broken.
    pub fn from_bytes(data: Vec<u8>, limits: InterpreterLimits) -> Result<Self, DecodeError> {
        let store = ByteStore::new(data);
        let header = HeaderScanner::new(&store).scan()?;
        let (mesh, display_lists) = MeshResolver::new(&store).resolve(header.mesh_pointer)?;

        let mut broken_lists = Vec::new();
        for bucket in [Bucket::Opaque, Bucket::Translucent] {
            for dlist in display_lists.bucket(bucket) {
                let result = Interpreter::new(dlist, limits).run(&mut NullSink::default());
                if let Err(e) = result {
                    if e.scope() == ErrorScope::File {
                        return Err(e);
                    }
                    warn!("{:?} display list {:?} will not draw: {}", bucket, dlist, e);
                    broken_lists.push((dlist.clone(), e));
                }
            }
        }

        info!(
            "loaded {} byte map: {} opaque and {} translucent display lists",
            store.len(),
            display_lists.opaque.len(),
            display_lists.translucent.len()
        );
        Ok(Self {
            store,
            header,
            mesh,
            display_lists,
            broken_lists,
        })
    }

    pub fn store(&self) -> &ByteStore {
        &self.store
    }

    pub fn header(&self) -> &SceneHeader {
        &self.header
    }

    pub fn mesh(&self) -> &MeshDescriptor {
        &self.mesh
    }

    pub fn display_lists(&self) -> &DisplayLists {
        &self.display_lists
    }

    pub fn broken_lists(&self) -> &[(DisplayListRef, DecodeError)] {
        &self.broken_lists
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawSelection {
    Opaque,
    Translucent,
    All,
}

impl DrawSelection {
    pub fn buckets(self) -> &'static [Bucket] {
        match self {
            Self::Opaque => &[Bucket::Opaque],
            Self::Translucent => &[Bucket::Translucent],
            Self::All => &[Bucket::Opaque, Bucket::Translucent],
        }
    }
}

impl Default for DrawSelection {
    fn default() -> Self {
        Self::All
    }
}

impl FromStr for DrawSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "opaque" => Self::Opaque,
            "translucent" => Self::Translucent,
            "all" => Self::All,
            _ => {
                return Err(format!(
                    "unknown selection '{}': expected opaque, translucent or all",
                    s
                ))
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub lists_drawn: usize,
    pub lists_failed: usize,
    pub triangles: usize,
}

/// Display lists from any number of maps, drawn in load order.
#[derive(Debug, Default)]
pub struct Scene {
    limits: InterpreterLimits,
    maps: Vec<ZMap>,
    display_lists: DisplayLists,
}

impl Scene {
    pub fn new(limits: InterpreterLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn add_map(&mut self, map: ZMap) {
        self.display_lists.extend(map.display_lists());
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[ZMap] {
        &self.maps
    }

    pub fn display_lists(&self) -> &DisplayLists {
        &self.display_lists
    }

    pub fn limits(&self) -> &InterpreterLimits {
        &self.limits
    }

    pub fn is_empty(&self) -> bool {
        self.display_lists.is_empty()
    }

    /// Decode every selected list from scratch, opaque before translucent.
    /// A list reaches the sink only if it runs to completion.
    pub fn draw_frame<S: PrimitiveSink + ?Sized>(
        &self,
        selection: DrawSelection,
        sink: &mut S,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let mut pending: Vec<Triangle> = Vec::new();
        for &bucket in selection.buckets() {
            for dlist in self.display_lists.bucket(bucket) {
                pending.clear();
                match Interpreter::new(dlist, self.limits).run(&mut pending) {
                    Ok(_) => {
                        sink.begin_display_list(bucket, dlist);
                        stats.lists_drawn += 1;
                        stats.triangles += pending.len();
                        for triangle in pending.drain(..) {
                            sink.push_triangle(triangle);
                        }
                    }
                    Err(e) => {
                        warn!("dropping {:?} display list {:?}: {}", bucket, dlist, e);
                        stats.lists_failed += 1;
                    }
                }
            }
        }
        stats
    }
}
