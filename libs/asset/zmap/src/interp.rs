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
    error::DecodeError,
    instr::{DecodedInstr, GeometryMode, Instr},
    mesh::DisplayListRef,
    segment::SegmentAddress,
    sink::{PrimitiveSink, ShadeMode, Triangle},
    store::ByteStore,
    vertex::Vertex,
};
use log::{debug, trace};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InterpreterLimits {
    pub max_call_depth: usize,
    pub max_instructions: usize,
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        Self {
            max_call_depth: 64,
            max_instructions: 1 << 20,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModeState {
    pub normal_latch: bool,
    pub filter_latch: bool,
    pub shade_as_lit: bool,
    pub vertex_load_unsupported: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            normal_latch: true,
            filter_latch: true,
            shade_as_lit: true,
            vertex_load_unsupported: false,
        }
    }
}

impl ModeState {
    // A latch survives only if its retain bit is set; an enable bit forces it
    // on regardless. Lighting wins when both latches end up on, and when
    // neither is on the shading mode is left as it was.
    pub fn apply(&mut self, retain: GeometryMode, enable: GeometryMode) {
        self.filter_latch = enable.contains(GeometryMode::FILTER)
            || (self.filter_latch && retain.contains(GeometryMode::FILTER));
        self.normal_latch = enable.contains(GeometryMode::LIGHTING)
            || (self.normal_latch && retain.contains(GeometryMode::LIGHTING));
        if self.normal_latch {
            self.shade_as_lit = true;
        } else if self.filter_latch {
            self.shade_as_lit = false;
        }
    }

    pub fn shade_mode(&self) -> ShadeMode {
        if self.shade_as_lit {
            ShadeMode::Lit
        } else {
            ShadeMode::VertexColor
        }
    }
}

/// Everything one pass over a display list may mutate. Built fresh for every
/// pass and never shared between lists or frames.
#[derive(Clone, Debug, Default)]
pub struct InterpreterSession {
    vertices: Vec<Vertex>,
    call_stack: SmallVec<[usize; 64]>,
    mode: ModeState,
}

impl InterpreterSession {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn call_stack(&self) -> &[usize] {
        &self.call_stack
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    fn store_vertex(&mut self, slot: usize, vertex: Vertex) {
        if slot >= self.vertices.len() {
            self.vertices.resize(slot + 1, Vertex::default());
        }
        self.vertices[slot] = vertex;
    }

    fn vertex(&self, slot: usize, pc: usize) -> Result<&Vertex, DecodeError> {
        self.vertices
            .get(slot)
            .ok_or(DecodeError::IndexOutOfRange {
                index: slot,
                slots: self.vertices.len(),
                pc,
            })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InterpreterState {
    Running,
    Finished,
    Fatal(DecodeError),
}

enum Flow {
    Next,
    Jump(usize),
    Finish,
}

/// Walks one display list, emitting triangles into a sink.
pub struct Interpreter<'a> {
    store: &'a ByteStore,
    limits: InterpreterLimits,
    pc: usize,
    executed: usize,
    session: InterpreterSession,
    state: InterpreterState,
}

impl<'a> Interpreter<'a> {
    pub fn new(dlist: &'a DisplayListRef, limits: InterpreterLimits) -> Self {
        Self::at_offset(dlist.store(), dlist.offset(), limits)
    }

    pub fn at_offset(store: &'a ByteStore, offset: usize, limits: InterpreterLimits) -> Self {
        Self {
            store,
            limits,
            pc: offset,
            executed: 0,
            session: InterpreterSession::default(),
            state: InterpreterState::Running,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn session(&self) -> &InterpreterSession {
        &self.session
    }

    pub fn instructions_executed(&self) -> usize {
        self.executed
    }

    /// Execute one instruction and return it. Returns None once the
    /// interpreter has stopped, when the instruction budget is exhausted, or
    /// if the instruction could not be read.
    pub fn step<S: PrimitiveSink + ?Sized>(&mut self, sink: &mut S) -> Option<DecodedInstr> {
        if self.state != InterpreterState::Running {
            return None;
        }
        if self.executed >= self.limits.max_instructions {
            self.state = InterpreterState::Fatal(DecodeError::InstructionLimit {
                limit: self.limits.max_instructions,
                pc: self.pc,
            });
            return None;
        }
        self.executed += 1;

        let decoded = match DecodedInstr::decode(self.store, self.pc) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.state = InterpreterState::Fatal(e);
                return None;
            }
        };
        trace!("{}", decoded.show());

        match self.execute(&decoded.instr, sink) {
            Ok(Flow::Next) => self.pc += Instr::SIZE,
            Ok(Flow::Jump(target)) => self.pc = target,
            Ok(Flow::Finish) => self.state = InterpreterState::Finished,
            Err(e) => {
                debug!("display list stopped at {:06X}: {}", self.pc, e);
                self.state = InterpreterState::Fatal(e);
            }
        }
        Some(decoded)
    }

    /// Run to completion, handing back the final session.
    pub fn run<S: PrimitiveSink + ?Sized>(
        mut self,
        sink: &mut S,
    ) -> Result<InterpreterSession, DecodeError> {
        loop {
            match &self.state {
                InterpreterState::Running => {
                    self.step(sink);
                }
                InterpreterState::Finished => return Ok(self.session),
                InterpreterState::Fatal(e) => return Err(e.clone()),
            }
        }
    }

    fn execute<S: PrimitiveSink + ?Sized>(
        &mut self,
        instr: &Instr,
        sink: &mut S,
    ) -> Result<Flow, DecodeError> {
        match *instr {
            Instr::LoadVertices {
                count,
                end_slot,
                source,
            } => self.load_vertices(count, end_slot, source)?,
            Instr::Triangle { slots } => self.draw(&[slots], sink)?,
            Instr::TrianglePair { slots } => self.draw(&slots, sink)?,
            Instr::Quad => trace!("quad at {:06X} is not implemented", self.pc),
            Instr::SetMode { retain, enable } => self.session.mode.apply(retain, enable),
            Instr::Call { target } => {
                let target = target.resolve()?;
                if self.session.call_stack.len() >= self.limits.max_call_depth {
                    return Err(DecodeError::StackOverflow {
                        limit: self.limits.max_call_depth,
                        pc: self.pc,
                    });
                }
                self.session.call_stack.push(self.pc + Instr::SIZE);
                return Ok(Flow::Jump(target));
            }
            Instr::Return => {
                return Ok(match self.session.call_stack.pop() {
                    Some(return_offset) => Flow::Jump(return_offset),
                    None => Flow::Finish,
                });
            }
            Instr::Unknown { .. } => {}
        }
        Ok(Flow::Next)
    }

    fn load_vertices(
        &mut self,
        count: usize,
        end_slot: usize,
        source: SegmentAddress,
    ) -> Result<(), DecodeError> {
        // Vertices in other banks cannot be loaded; draws are skipped until
        // the next load that we can follow.
        if !source.is_self_referential() {
            debug!("skipping vertex load from {} at {:06X}", source, self.pc);
            self.session.mode.vertex_load_unsupported = true;
            return Ok(());
        }
        self.session.mode.vertex_load_unsupported = false;

        let start_slot = end_slot
            .checked_sub(count)
            .ok_or(DecodeError::IndexOutOfRange {
                index: end_slot,
                slots: self.session.vertices.len(),
                pc: self.pc,
            })?;
        trace!(
            "loading {} verts into [{}, {}) from {}",
            count,
            start_slot,
            end_slot,
            source
        );
        let base = source.offset();
        for i in 0..count {
            let vertex = Vertex::from_store(self.store, base + i * Vertex::SIZE)?;
            self.session.store_vertex(start_slot + i, vertex);
        }
        Ok(())
    }

    fn draw<S: PrimitiveSink + ?Sized>(
        &self,
        triangles: &[[usize; 3]],
        sink: &mut S,
    ) -> Result<(), DecodeError> {
        if self.session.mode.vertex_load_unsupported {
            return Ok(());
        }
        let mode = self.session.mode.shade_mode();
        let mut shaded = SmallVec::<[Triangle; 2]>::new();
        for slots in triangles {
            shaded.push(Triangle::shade(
                [
                    self.session.vertex(slots[0], self.pc)?,
                    self.session.vertex(slots[1], self.pc)?,
                    self.session.vertex(slots[2], self.pc)?,
                ],
                mode,
            ));
        }
        for triangle in shaded {
            sink.push_triangle(triangle);
        }
        Ok(())
    }
}
