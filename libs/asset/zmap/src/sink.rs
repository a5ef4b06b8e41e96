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
    mesh::{Bucket, DisplayListRef},
    vertex::Vertex,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShadeMode {
    Lit,
    VertexColor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadedVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    // Only present when lit.
    pub normal: Option<[f32; 3]>,
    pub color: [f32; 4],
}

impl ShadedVertex {
    pub const BASE_COLOR: [f32; 4] = [1f32, 1f32, 1f32, 1f32];

    pub fn shade(vertex: &Vertex, mode: ShadeMode) -> Self {
        let (normal, color) = match mode {
            ShadeMode::Lit => (Some(vertex.normal_f32()), Self::BASE_COLOR),
            ShadeMode::VertexColor => (None, vertex.color()),
        };
        Self {
            position: vertex.position_f32(),
            tex_coord: vertex.tex_coord_f32(),
            normal,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub mode: ShadeMode,
    pub vertices: [ShadedVertex; 3],
}

impl Triangle {
    pub fn shade(verts: [&Vertex; 3], mode: ShadeMode) -> Self {
        Self {
            mode,
            vertices: [
                ShadedVertex::shade(verts[0], mode),
                ShadedVertex::shade(verts[1], mode),
                ShadedVertex::shade(verts[2], mode),
            ],
        }
    }
}

/// Receives decoded geometry. Implemented by whatever actually draws.
pub trait PrimitiveSink {
    /// Called before the triangles of each display list that made it into a frame.
    fn begin_display_list(&mut self, _bucket: Bucket, _dlist: &DisplayListRef) {}

    fn push_triangle(&mut self, triangle: Triangle);
}

impl PrimitiveSink for Vec<Triangle> {
    fn push_triangle(&mut self, triangle: Triangle) {
        self.push(triangle);
    }
}

#[derive(Debug, Default)]
pub struct NullSink {
    pub triangle_count: usize,
}

impl PrimitiveSink for NullSink {
    fn push_triangle(&mut self, _triangle: Triangle) {
        self.triangle_count += 1;
    }
}
