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
    mesh::Bucket,
    sink::{ShadeMode, Triangle},
};
use serde::{Deserialize, Serialize};

/// A record suitable for use in CSV processing; one row per triangle corner.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    // Frame - Which decode pass produced the triangle.
    pub frame: usize,

    // Bucket - Opaque or Translucent.
    pub bucket: String,

    // List Offset - File offset of the display list that emitted the triangle.
    pub list_offset: usize,

    // Triangle Number - Counts triangles within the frame.
    pub triangle_number: usize,

    // Corner - 0, 1 or 2.
    pub corner: usize,

    // Shade - Lit or VertexColor.
    pub shade: String,

    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,

    // Normal - Empty unless lit.
    pub nx: Option<f32>,
    pub ny: Option<f32>,
    pub nz: Option<f32>,

    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Record {
    pub fn from_triangle(
        frame: usize,
        bucket: Bucket,
        list_offset: usize,
        triangle_number: usize,
        triangle: &Triangle,
    ) -> Vec<Record> {
        let shade = match triangle.mode {
            ShadeMode::Lit => "Lit",
            ShadeMode::VertexColor => "VertexColor",
        };
        triangle
            .vertices
            .iter()
            .enumerate()
            .map(|(corner, v)| Record {
                frame,
                bucket: format!("{:?}", bucket),
                list_offset,
                triangle_number,
                corner,
                shade: shade.to_owned(),
                x: v.position[0],
                y: v.position[1],
                z: v.position[2],
                u: v.tex_coord[0],
                v: v.tex_coord[1],
                nx: v.normal.map(|n| n[0]),
                ny: v.normal.map(|n| n[1]),
                nz: v.normal.map(|n| n[2]),
                r: v.color[0],
                g: v.color[1],
                b: v.color[2],
                a: v.color[3],
            })
            .collect()
    }
}
