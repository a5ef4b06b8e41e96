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

// Decoder for zmap scene files: a big-endian header of 8 byte records points
// at a mesh descriptor, whose entry table points at display lists. Display
// lists are interpreted into shaded triangles and handed to a PrimitiveSink.
mod csv;
mod error;
mod header;
mod instr;
mod interp;
mod mesh;
mod scene;
mod segment;
mod sink;
mod store;
mod vertex;

#[cfg(test)]
mod test_util;

pub use crate::{
    csv::Record,
    error::{DecodeError, ErrorScope},
    header::{HeaderRecord, HeaderScanner, HeaderTag, SceneHeader},
    instr::{bs2s, DecodedInstr, GeometryMode, Instr},
    interp::{Interpreter, InterpreterLimits, InterpreterSession, InterpreterState, ModeState},
    mesh::{Bucket, DisplayListRef, DisplayLists, MeshDescriptor, MeshLayout, MeshResolver},
    scene::{DrawSelection, FrameStats, Scene, ZMap},
    segment::SegmentAddress,
    sink::{NullSink, PrimitiveSink, ShadeMode, ShadedVertex, Triangle},
    store::ByteStore,
    vertex::Vertex,
};
