use std::collections::HashMap;

use crate::op::{Op, OpIdx};
use crate::opcode::Opcode;
use crate::temp::{Temp, TempIdx};
use crate::types::{Type, TYPE_COUNT};

/// Maximum number of guest instructions per block.
pub const MAX_INSNS: usize = 512;

/// Per-thread translation context.
///
/// Maps to QEMU's `TCGContext`. Holds all state needed during
/// translation of a single block: temporaries and IR ops. One context
/// is owned by one block builder; independent blocks use independent
/// contexts.
pub struct Context {
    temps: Vec<Temp>,
    ops: Vec<Op>,

    /// Number of global temps (always at the front of `temps`).
    nb_globals: u32,

    // -- Constant deduplication --
    /// Per-type hash map from constant value to TempIdx,
    /// avoiding duplicate const temps.
    const_table: [HashMap<u64, TempIdx>; TYPE_COUNT],
}

impl Context {
    pub fn new() -> Self {
        Self {
            temps: Vec::with_capacity(256),
            ops: Vec::with_capacity(MAX_INSNS),
            nb_globals: 0,
            const_table: Default::default(),
        }
    }

    // -- Temp allocation --

    pub fn nb_globals(&self) -> u32 {
        self.nb_globals
    }

    pub fn nb_temps(&self) -> u32 {
        self.temps.len() as u32
    }

    /// Number of guest instructions translated into this block.
    pub fn nb_insns(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.opc == Opcode::InsnStart)
            .count()
    }

    pub(crate) fn alloc_temp(&mut self, ty: Type) -> TempIdx {
        let idx = TempIdx(self.temps.len() as u32);
        self.temps.push(Temp::new_ebb(idx, ty));
        idx
    }

    /// Get or create a constant temp (deduplicated per type).
    pub(crate) fn alloc_const(&mut self, ty: Type, val: u64) -> TempIdx {
        let type_idx = ty as usize;
        if let Some(&existing) = self.const_table[type_idx].get(&val) {
            return existing;
        }
        let idx = TempIdx(self.temps.len() as u32);
        self.temps.push(Temp::new_const(idx, ty, val));
        self.const_table[type_idx].insert(val, idx);
        idx
    }

    /// Register a global temp (must be called before any
    /// non-global allocation).
    /// The `base` is the TempIdx of the env pointer (a fixed temp).
    pub(crate) fn alloc_global(
        &mut self,
        ty: Type,
        base: TempIdx,
        offset: i64,
        name: &'static str,
    ) -> TempIdx {
        assert_eq!(
            self.temps.len() as u32,
            self.nb_globals,
            "globals must be registered before locals"
        );
        let idx = TempIdx(self.temps.len() as u32);
        self.temps
            .push(Temp::new_global(idx, ty, base, offset, name));
        self.nb_globals += 1;
        idx
    }

    /// Register a fixed-register temp (must be called
    /// before any non-global allocation).
    pub(crate) fn alloc_fixed(
        &mut self,
        ty: Type,
        reg: u8,
        name: &'static str,
    ) -> TempIdx {
        assert_eq!(
            self.temps.len() as u32,
            self.nb_globals,
            "fixed temps must be registered before locals"
        );
        let idx = TempIdx(self.temps.len() as u32);
        self.temps.push(Temp::new_fixed(idx, ty, reg, name));
        self.nb_globals += 1;
        idx
    }

    pub fn temp(&self, idx: TempIdx) -> &Temp {
        &self.temps[idx.0 as usize]
    }

    pub fn temps(&self) -> &[Temp] {
        &self.temps
    }

    /// Iterate over global temps only.
    pub fn globals(&self) -> &[Temp] {
        &self.temps[..self.nb_globals as usize]
    }

    // -- Op emission --

    pub fn emit_op(&mut self, op: Op) -> OpIdx {
        let idx = op.idx;
        self.ops.push(op);
        idx
    }

    pub fn next_op_idx(&self) -> OpIdx {
        OpIdx(self.ops.len() as u32)
    }

    pub fn op(&self, idx: OpIdx) -> &Op {
        &self.ops[idx.0 as usize]
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
