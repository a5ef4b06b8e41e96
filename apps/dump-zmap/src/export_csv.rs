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
use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::{fs::File, path::Path};
use zmap::{Bucket, DisplayListRef, PrimitiveSink, Record, Triangle};

/// Writes every triangle corner that reaches it as one CSV row.
pub struct CsvSink {
    writer: Writer<File>,
    frame: usize,
    bucket: Bucket,
    list_offset: usize,
    triangle_number: usize,
    // push_triangle cannot fail, so keep the first write error for finish.
    error: Option<csv::Error>,
}

impl CsvSink {
    pub fn create(path: &Path) -> Result<Self> {
        let writer = WriterBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            writer,
            frame: 0,
            bucket: Bucket::Opaque,
            list_offset: 0,
            triangle_number: 0,
            error: None,
        })
    }

    pub fn start_frame(&mut self, frame: usize) {
        self.frame = frame;
        self.triangle_number = 0;
    }

    pub fn finish(mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e).context("failed to write csv record");
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl PrimitiveSink for CsvSink {
    fn begin_display_list(&mut self, bucket: Bucket, dlist: &DisplayListRef) {
        self.bucket = bucket;
        self.list_offset = dlist.offset();
    }

    fn push_triangle(&mut self, triangle: Triangle) {
        if self.error.is_some() {
            return;
        }
        let records = Record::from_triangle(
            self.frame,
            self.bucket,
            self.list_offset,
            self.triangle_number,
            &triangle,
        );
        for record in records {
            if let Err(e) = self.writer.serialize(record) {
                self.error = Some(e);
                return;
            }
        }
        self.triangle_number += 1;
    }
}
