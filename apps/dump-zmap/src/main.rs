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
mod export_csv;

use crate::export_csv::CsvSink;
use anyhow::{ensure, Context, Result};
use log::LevelFilter;
use std::{fs, path::Path, path::PathBuf};
use structopt::StructOpt;
use zmap::{
    bs2s, DrawSelection, FrameStats, Interpreter, InterpreterLimits, InterpreterState, NullSink,
    Scene, ZMap,
};

/// Decode zmap scene files and report the geometry they draw
#[derive(Debug, StructOpt)]
struct Opt {
    /// The scene files to load
    #[structopt(parse(from_os_str), required = true)]
    inputs: Vec<PathBuf>,

    /// List every header record
    #[structopt(long)]
    header: bool,

    /// Show the resolved display lists
    #[structopt(short, long)]
    lists: bool,

    /// Print every instruction as it executes
    #[structopt(short, long)]
    disassemble: bool,

    /// Number of frames to decode
    #[structopt(short, long, default_value = "1")]
    frames: usize,

    /// Which display lists to draw: opaque, translucent or all
    #[structopt(short, long, default_value = "all")]
    selection: DrawSelection,

    /// Write every emitted triangle vertex to this CSV file
    #[structopt(long, parse(from_os_str))]
    csv: Option<PathBuf>,

    /// Deepest allowed display list call nesting
    #[structopt(long, default_value = "64")]
    max_call_depth: usize,

    /// Instructions a single display list may execute per frame
    #[structopt(long, default_value = "1048576")]
    max_instructions: usize,

    /// Trace execution
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    if opt.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Trace)
            .init();
    } else {
        env_logger::init();
    }

    let limits = InterpreterLimits {
        max_call_depth: opt.max_call_depth,
        max_instructions: opt.max_instructions,
    };
    let mut scene = Scene::new(limits);
    for path in &opt.inputs {
        let map = match load_map(path, limits) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("{}: {:#}", path.display(), e);
                continue;
            }
        };
        if opt.header {
            show_header(path, &map);
        }
        if opt.lists {
            show_lists(path, &map);
        }
        scene.add_map(map);
    }

    if scene.is_empty() {
        println!("no display lists to draw");
        return Ok(());
    }

    if opt.disassemble {
        disassemble(&scene, opt.selection);
    }

    let mut csv = opt.csv.as_deref().map(CsvSink::create).transpose()?;
    let mut first: Option<FrameStats> = None;
    for frame in 0..opt.frames {
        let stats = match csv.as_mut() {
            Some(sink) => {
                sink.start_frame(frame);
                scene.draw_frame(opt.selection, sink)
            }
            None => scene.draw_frame(opt.selection, &mut NullSink::default()),
        };
        println!(
            "frame {}: {} lists drawn, {} lists failed, {} triangles",
            frame, stats.lists_drawn, stats.lists_failed, stats.triangles
        );
        match first {
            Some(expect) => ensure!(
                stats == expect,
                "frame {} decoded differently from frame 0: {:?} vs {:?}",
                frame,
                stats,
                expect
            ),
            None => first = Some(stats),
        }
    }
    if let Some(sink) = csv {
        sink.finish()?;
    }

    Ok(())
}

fn load_map(path: &Path, limits: InterpreterLimits) -> Result<ZMap> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(ZMap::from_bytes(data, limits)?)
}

fn show_header(path: &Path, map: &ZMap) {
    println!("{}: header", path.display());
    for record in &map.header().records {
        println!(
            "  @{:06X} {}| {:02X} {}",
            record.offset,
            bs2s(&record.raw),
            record.raw_tag(),
            record.tag.name()
        );
    }
    println!("  mesh at {}", map.header().mesh_pointer);
}

fn show_lists(path: &Path, map: &ZMap) {
    let mesh = map.mesh();
    println!(
        "{}: {:?} mesh @{:06X}, {} entries at {}",
        path.display(),
        mesh.layout,
        mesh.offset,
        mesh.num_entries(),
        mesh.entry_table
    );
    let lists = map.display_lists();
    for (name, bucket) in [("opaque", &lists.opaque), ("translucent", &lists.translucent)] {
        let offsets = bucket
            .iter()
            .map(|dlist| format!("{:06X}", dlist.offset()))
            .collect::<Vec<_>>();
        println!("  {:<11}: {}", name, offsets.join(" "));
    }
    for (dlist, e) in map.broken_lists() {
        println!("  broken     : {:06X}: {}", dlist.offset(), e);
    }
}

fn disassemble(scene: &Scene, selection: DrawSelection) {
    for &bucket in selection.buckets() {
        for dlist in scene.display_lists().bucket(bucket) {
            println!("{:?} display list @{:06X}", bucket, dlist.offset());
            let mut interp = Interpreter::new(dlist, *scene.limits());
            let mut sink = NullSink::default();
            while let Some(decoded) = interp.step(&mut sink) {
                println!("  {}", decoded);
            }
            match interp.state() {
                InterpreterState::Fatal(e) => println!("  !! @{:06X}: {}", interp.pc(), e),
                _ => println!("  => {} triangles", sink.triangle_count),
            }
        }
    }
}
