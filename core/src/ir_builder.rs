use crate::context::Context;
use crate::op::Op;
use crate::opcode::Opcode;
use crate::temp::TempIdx;
use crate::types::{Cond, FpCond, Type, VecElem};

// Constant args are encoded as TempIdx(raw_value as u32).
fn carg(val: u32) -> TempIdx {
    TempIdx(val)
}

/// Number of integer arguments a `call` op carries (env included).
pub const CALL_IARGS: usize = 6;

/// The IR emission interface translators are written against.
///
/// Implementors only provide temp allocation and raw op emission; the
/// typed `gen_*` builders are derived from those. `Context` is the
/// production implementor. Emitting never computes a value: every
/// returned `TempIdx` names a deferred result.
pub trait IrBuilder {
    /// Allocate a fresh block-local temp.
    fn new_temp(&mut self, ty: Type) -> TempIdx;

    /// Get or create a constant temp.
    fn new_const(&mut self, ty: Type, val: u64) -> TempIdx;

    /// Bind a global temp to `offset` bytes past the env pointer.
    fn new_global(
        &mut self,
        ty: Type,
        base: TempIdx,
        offset: i64,
        name: &'static str,
    ) -> TempIdx;

    /// Bind a temp to a reserved host register.
    fn new_fixed(&mut self, ty: Type, reg: u8, name: &'static str) -> TempIdx;

    /// Append one op. `args` are laid out as outputs, inputs, constants.
    fn push_op(
        &mut self,
        opc: Opcode,
        ty: Type,
        vece: Option<VecElem>,
        args: &[TempIdx],
    );

    // -- Scalar integer --

    fn gen_mov(&mut self, ty: Type, d: TempIdx, s: TempIdx) -> TempIdx {
        self.push_op(Opcode::Mov, ty, None, &[d, s]);
        d
    }

    fn gen_add(
        &mut self,
        ty: Type,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::Add, ty, None, &[d, a, b]);
        d
    }

    fn gen_sub(
        &mut self,
        ty: Type,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::Sub, ty, None, &[d, a, b]);
        d
    }

    // -- Vector data movement --

    fn gen_zero_vec(&mut self, d: TempIdx) -> TempIdx {
        self.push_op(Opcode::ZeroVec, Type::V128, None, &[d]);
        d
    }

    /// Keep lane 0 of `s` (lane size `vece`) and clear every bit above it.
    fn gen_zero_upper_vec(
        &mut self,
        vece: VecElem,
        d: TempIdx,
        s: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::ZeroUpperVec, Type::V128, Some(vece), &[d, s]);
        d
    }

    /// Zero-extend lane `lane` of `s` into the scalar `d` of type `ty`.
    fn gen_extract_vec(
        &mut self,
        ty: Type,
        vece: VecElem,
        d: TempIdx,
        s: TempIdx,
        lane: u32,
    ) -> TempIdx {
        self.push_op(Opcode::ExtractVec, ty, Some(vece), &[d, s, carg(lane)]);
        d
    }

    // -- Vector logic --

    fn gen_and_vec(&mut self, d: TempIdx, a: TempIdx, b: TempIdx) -> TempIdx {
        self.push_op(Opcode::AndVec, Type::V128, None, &[d, a, b]);
        d
    }

    fn gen_not_vec(&mut self, d: TempIdx, s: TempIdx) -> TempIdx {
        self.push_op(Opcode::NotVec, Type::V128, None, &[d, s]);
        d
    }

    // -- Vector compare / shift --

    /// Per-lane compare: all-ones where `a cond b` holds, zero elsewhere.
    fn gen_cmp_vec(
        &mut self,
        vece: VecElem,
        cond: Cond,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(
            Opcode::CmpVec,
            Type::V128,
            Some(vece),
            &[d, a, b, carg(cond as u32)],
        );
        d
    }

    /// Per-lane shift of `a` by the signed low byte of the matching lane
    /// of `b`; negative amounts shift right arithmetically.
    fn gen_sshl_vec(
        &mut self,
        vece: VecElem,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::SshlVec, Type::V128, Some(vece), &[d, a, b]);
        d
    }

    /// Like `gen_sshl_vec`, but right shifts are logical.
    fn gen_ushl_vec(
        &mut self,
        vece: VecElem,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::UshlVec, Type::V128, Some(vece), &[d, a, b]);
        d
    }

    // -- Vector floating point --

    fn gen_fcmp_vec(
        &mut self,
        vece: VecElem,
        cond: FpCond,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(
            Opcode::FCmpVec,
            Type::V128,
            Some(vece),
            &[d, a, b, carg(cond as u32)],
        );
        d
    }

    fn gen_fabs_vec(&mut self, vece: VecElem, d: TempIdx, s: TempIdx) -> TempIdx {
        self.push_op(Opcode::FAbsVec, Type::V128, Some(vece), &[d, s]);
        d
    }

    fn gen_fabd_vec(
        &mut self,
        vece: VecElem,
        d: TempIdx,
        a: TempIdx,
        b: TempIdx,
    ) -> TempIdx {
        self.push_op(Opcode::FAbdVec, Type::V128, Some(vece), &[d, a, b]);
        d
    }

    // -- Control --

    /// ExitTb: 0 oargs, 0 iargs, 1 carg (val)
    fn gen_exit_tb(&mut self, val: u64) {
        self.push_op(Opcode::ExitTb, Type::I64, None, &[carg(val as u32)]);
    }

    /// InsnStart: 0 oargs, 0 iargs, 2 cargs (pc_lo, pc_hi)
    fn gen_insn_start(&mut self, pc: u64) {
        self.push_op(
            Opcode::InsnStart,
            Type::I64,
            None,
            &[carg(pc as u32), carg((pc >> 32) as u32)],
        );
    }

    /// Call helper: dst = helper(args[0..6])
    /// Call: 1 oarg, 6 iargs, 2 cargs (func_lo, func_hi)
    fn gen_call(
        &mut self,
        dst: TempIdx,
        helper: u64,
        args: &[TempIdx],
    ) -> TempIdx {
        let mut full_args = Vec::with_capacity(1 + CALL_IARGS + 2);
        full_args.push(dst);
        let zero = self.new_const(Type::I64, 0);
        for i in 0..CALL_IARGS {
            let arg = args.get(i).copied().unwrap_or(zero);
            full_args.push(arg);
        }
        full_args.push(carg(helper as u32));
        full_args.push(carg((helper >> 32) as u32));
        self.push_op(Opcode::Call, Type::I64, None, &full_args);
        dst
    }
}

impl IrBuilder for Context {
    fn new_temp(&mut self, ty: Type) -> TempIdx {
        self.alloc_temp(ty)
    }

    fn new_const(&mut self, ty: Type, val: u64) -> TempIdx {
        self.alloc_const(ty, val)
    }

    fn new_global(
        &mut self,
        ty: Type,
        base: TempIdx,
        offset: i64,
        name: &'static str,
    ) -> TempIdx {
        self.alloc_global(ty, base, offset, name)
    }

    fn new_fixed(&mut self, ty: Type, reg: u8, name: &'static str) -> TempIdx {
        self.alloc_fixed(ty, reg, name)
    }

    fn push_op(
        &mut self,
        opc: Opcode,
        ty: Type,
        vece: Option<VecElem>,
        args: &[TempIdx],
    ) {
        let idx = self.next_op_idx();
        let op = match vece {
            Some(vece) => Op::with_vece(idx, opc, ty, vece, args),
            None => Op::with_args(idx, opc, ty, args),
        };
        self.emit_op(op);
    }
}
