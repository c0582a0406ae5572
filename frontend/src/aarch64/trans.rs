//! A64 instruction translation: IR generation.
//!
//! Follows QEMU's gen_xxx helper pattern: each instruction family is
//! one generic `gen_*` routine parameterised by a closed kind enum,
//! and the `trans_*` methods only pick the kind. Every routine checks
//! its fields and features first and returns `false` before emitting
//! anything when the form is reserved.

use super::helper::{fma_helper, FmaKind};
use super::insn_decode::*;
use super::A64DisasContext;
use a64tcg_core::{Cond, FpCond, IrBuilder, TempIdx, Type, VecElem};

/// Register read discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Whole 128-bit register, for lane-wise vector ops.
    Vector,
    /// Element 0 only, as a scalar temp.
    Scalar,
}

/// Scalar integer compare kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpKind {
    Eq,
    Ge,
    Gt,
    Hi,
    Hs,
    Le,
    Lt,
}

impl CmpKind {
    pub const fn cond(self) -> Cond {
        match self {
            CmpKind::Eq => Cond::Eq,
            CmpKind::Ge => Cond::Ge,
            CmpKind::Gt => Cond::Gt,
            CmpKind::Hi => Cond::Gtu,
            CmpKind::Hs => Cond::Geu,
            CmpKind::Le => Cond::Le,
            CmpKind::Lt => Cond::Lt,
        }
    }
}

/// Scalar FP compare kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpCmpKind {
    Eq,
    Ge,
    Gt,
    AbsGe,
    AbsGt,
}

impl FpCmpKind {
    pub const fn cond(self) -> FpCond {
        match self {
            FpCmpKind::Eq => FpCond::Eq,
            FpCmpKind::Ge | FpCmpKind::AbsGe => FpCond::Ge,
            FpCmpKind::Gt | FpCmpKind::AbsGt => FpCond::Gt,
        }
    }

    /// Compare magnitudes instead of values.
    pub const fn is_abs(self) -> bool {
        matches!(self, FpCmpKind::AbsGe | FpCmpKind::AbsGt)
    }
}

/// Vector binary IR operation: `fn(ir, vece, dst, lhs, rhs) -> dst`.
type VecBinOp<Ir> = fn(&mut Ir, VecElem, TempIdx, TempIdx, TempIdx) -> TempIdx;

/// `size` field value of the 64-bit-only scalar integer forms.
const SIZE_64: i64 = 0b11;

/// Element size selected by a one-bit FP precision field.
fn fp_esize(sz: i64) -> VecElem {
    if sz != 0 {
        VecElem::B64
    } else {
        VecElem::B32
    }
}

// ── Helpers ────────────────────────────────────────────────────

impl A64DisasContext {
    // -- V register access ---------------------------------

    /// Read V`reg`.
    ///
    /// The vector discipline yields the whole register; the scalar
    /// discipline yields element 0 of size `esize`, zero-extended into
    /// the smallest integer type that holds it.
    pub(super) fn read_vreg<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        reg: i64,
        esize: VecElem,
        disc: Discipline,
    ) -> TempIdx {
        let v = self.vreg[reg as usize];
        match disc {
            Discipline::Vector => v,
            Discipline::Scalar => {
                let ty = Type::scalar_for(esize.bits());
                let t = ir.new_temp(ty);
                ir.gen_extract_vec(ty, esize, t, v, 0)
            }
        }
    }

    /// Write `val` into V`reg` as an `esize` scalar: keep the low
    /// `esize` bits of `val` (scalar or vector) and clear bits
    /// [127:esize].
    pub(super) fn write_vreg<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        reg: i64,
        esize: VecElem,
        val: TempIdx,
    ) {
        ir.gen_zero_upper_vec(esize, self.vreg[reg as usize], val);
    }

    /// Element 0 of V`reg` zero-extended to 64 bits, the width every
    /// helper argument is passed at.
    fn read_helper_arg<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        reg: i64,
        esize: VecElem,
    ) -> TempIdx {
        let t = ir.new_temp(Type::I64);
        ir.gen_extract_vec(Type::I64, esize, t, self.vreg[reg as usize], 0)
    }

    // -- Integer compare -----------------------------------

    /// CMEQ/CMGE/CMGT/CMHI/CMHS (register) and
    /// CMEQ/CMGE/CMGT/CMLE/CMLT (zero): `Dd = (Dn kind Dm|#0) ? -1 : 0`.
    fn gen_scalar_compare<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        size: i64,
        rd: i64,
        rn: i64,
        rm: Option<i64>,
        kind: CmpKind,
    ) -> bool {
        if !self.cfg.has_simd_int() || size != SIZE_64 {
            return false;
        }
        let esize = VecElem::B64;

        let op1 = self.read_vreg(ir, rn, esize, Discipline::Vector);
        let op2 = match rm {
            Some(rm) => self.read_vreg(ir, rm, esize, Discipline::Vector),
            None => {
                let z = ir.new_temp(Type::V128);
                ir.gen_zero_vec(z)
            }
        };

        let res = ir.new_temp(Type::V128);
        ir.gen_cmp_vec(esize, kind.cond(), res, op1, op2);
        let lane = ir.new_temp(Type::I64);
        ir.gen_extract_vec(Type::I64, esize, lane, res, 0);
        self.write_vreg(ir, rd, esize, lane);
        true
    }

    // -- FP compare ----------------------------------------

    /// FCMEQ/FCMGE/FCMGT/FACGE/FACGT (register), single or double.
    fn gen_scalar_fp_compare<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        a: &ArgsRrrSz,
        kind: FpCmpKind,
    ) -> bool {
        if !self.cfg.has_simd_fp() {
            return false;
        }
        let esize = fp_esize(a.sz);

        let mut op1 = self.read_vreg(ir, a.rn, esize, Discipline::Vector);
        let mut op2 = self.read_vreg(ir, a.rm, esize, Discipline::Vector);
        if kind.is_abs() {
            let t1 = ir.new_temp(Type::V128);
            op1 = ir.gen_fabs_vec(esize, t1, op1);
            let t2 = ir.new_temp(Type::V128);
            op2 = ir.gen_fabs_vec(esize, t2, op2);
        }

        let res = ir.new_temp(Type::V128);
        ir.gen_fcmp_vec(esize, kind.cond(), res, op1, op2);
        let ty = Type::scalar_for(esize.bits());
        let lane = ir.new_temp(ty);
        ir.gen_extract_vec(ty, esize, lane, res, 0);
        self.write_vreg(ir, a.rd, esize, lane);
        true
    }

    // -- Integer arithmetic --------------------------------

    /// ADD/SUB (scalar): `Dd = op(Dn, Dm)`.
    fn gen_scalar_arith<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        a: &ArgsRrrE,
        op: fn(&mut Ir, Type, TempIdx, TempIdx, TempIdx) -> TempIdx,
    ) -> bool {
        if !self.cfg.has_simd_int() || a.size != SIZE_64 {
            return false;
        }
        let esize = VecElem::B64;

        let s1 = self.read_vreg(ir, a.rn, esize, Discipline::Scalar);
        let s2 = self.read_vreg(ir, a.rm, esize, Discipline::Scalar);
        let d = ir.new_temp(Type::I64);
        op(ir, Type::I64, d, s1, s2);
        self.write_vreg(ir, a.rd, esize, d);
        true
    }

    /// SSHL/USHL (scalar): lane-wise op on the whole register, only
    /// lane 0 is kept.
    fn gen_vector_binop<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        a: &ArgsRrrE,
        op: VecBinOp<Ir>,
    ) -> bool {
        if !self.cfg.has_simd_int() || a.size != SIZE_64 {
            return false;
        }
        let esize = VecElem::B64;

        let s1 = self.read_vreg(ir, a.rn, esize, Discipline::Vector);
        let s2 = self.read_vreg(ir, a.rm, esize, Discipline::Vector);
        let d = ir.new_temp(Type::V128);
        op(ir, esize, d, s1, s2);
        self.write_vreg(ir, a.rd, esize, d);
        true
    }

    // -- FP multiply-add -----------------------------------

    /// FMADD/FMSUB/FNMADD/FNMSUB: helper call, scalar write.
    fn gen_fp_fma<Ir: IrBuilder>(
        &self,
        ir: &mut Ir,
        a: &ArgsRrrrFtype,
        kind: FmaKind,
    ) -> bool {
        let double = match a.ftype {
            0b00 => false,
            0b01 => true,
            _ => return false,
        };
        if !self.cfg.has_fp() {
            return false;
        }
        let esize = if double { VecElem::B64 } else { VecElem::B32 };

        let addend = self.read_helper_arg(ir, a.ra, esize);
        let op1 = self.read_helper_arg(ir, a.rn, esize);
        let op2 = self.read_helper_arg(ir, a.rm, esize);

        let helper = fma_helper(kind, double);
        let d = ir.new_temp(Type::I64);
        ir.gen_call(d, helper as usize as u64, &[self.env, addend, op1, op2]);
        self.write_vreg(ir, a.rd, esize, d);
        true
    }
}

// ── Decode trait implementation ────────────────────────────────

impl<Ir: IrBuilder> Decode<Ir> for A64DisasContext {
    // ── Integer compare (register) ─────────────────────

    fn trans_cmeq_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, Some(a.rm), CmpKind::Eq)
    }
    fn trans_cmge_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, Some(a.rm), CmpKind::Ge)
    }
    fn trans_cmgt_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, Some(a.rm), CmpKind::Gt)
    }
    fn trans_cmhi(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, Some(a.rm), CmpKind::Hi)
    }
    fn trans_cmhs(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, Some(a.rm), CmpKind::Hs)
    }

    // ── Integer compare (zero) ─────────────────────────

    fn trans_cmeq_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, None, CmpKind::Eq)
    }
    fn trans_cmge_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, None, CmpKind::Ge)
    }
    fn trans_cmgt_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, None, CmpKind::Gt)
    }
    fn trans_cmle_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, None, CmpKind::Le)
    }
    fn trans_cmlt_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool {
        self.gen_scalar_compare(ir, a.size, a.rd, a.rn, None, CmpKind::Lt)
    }

    // ── FP compare ─────────────────────────────────────

    fn trans_fcmeq_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        self.gen_scalar_fp_compare(ir, a, FpCmpKind::Eq)
    }
    fn trans_fcmge_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        self.gen_scalar_fp_compare(ir, a, FpCmpKind::Ge)
    }
    fn trans_fcmgt_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        self.gen_scalar_fp_compare(ir, a, FpCmpKind::Gt)
    }
    fn trans_facge(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        self.gen_scalar_fp_compare(ir, a, FpCmpKind::AbsGe)
    }
    fn trans_facgt(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        self.gen_scalar_fp_compare(ir, a, FpCmpKind::AbsGt)
    }

    // ── Arithmetic / logical / shift ───────────────────

    fn trans_add(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_arith(ir, a, Ir::gen_add)
    }
    fn trans_sub(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_scalar_arith(ir, a, Ir::gen_sub)
    }

    /// CMTST: `NOT(EQ(AND(Dn, Dm), 0))`.
    fn trans_cmtst(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        if !self.cfg.has_simd_int() || a.size != SIZE_64 {
            return false;
        }
        let esize = VecElem::B64;

        let s1 = self.read_vreg(ir, a.rn, esize, Discipline::Vector);
        let s2 = self.read_vreg(ir, a.rm, esize, Discipline::Vector);
        let anded = ir.new_temp(Type::V128);
        ir.gen_and_vec(anded, s1, s2);
        let zero = ir.new_temp(Type::V128);
        ir.gen_zero_vec(zero);
        let eq = ir.new_temp(Type::V128);
        ir.gen_cmp_vec(esize, Cond::Eq, eq, anded, zero);
        let d = ir.new_temp(Type::V128);
        ir.gen_not_vec(d, eq);
        self.write_vreg(ir, a.rd, esize, d);
        true
    }

    fn trans_sshl(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_vector_binop(ir, a, Ir::gen_sshl_vec)
    }
    fn trans_ushl(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool {
        self.gen_vector_binop(ir, a, Ir::gen_ushl_vec)
    }

    /// FABD (scalar): `|Vn - Vm|`, element 0, upper bits cleared.
    fn trans_fabd(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool {
        if !self.cfg.has_simd_fp() {
            return false;
        }
        let esize = fp_esize(a.sz);

        let s1 = self.read_vreg(ir, a.rn, esize, Discipline::Vector);
        let s2 = self.read_vreg(ir, a.rm, esize, Discipline::Vector);
        let d = ir.new_temp(Type::V128);
        ir.gen_fabd_vec(esize, d, s1, s2);
        self.write_vreg(ir, a.rd, esize, d);
        true
    }

    // ── FP data-processing (3 source) ──────────────────

    fn trans_fmadd(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool {
        self.gen_fp_fma(ir, a, FmaKind::Madd)
    }
    fn trans_fmsub(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool {
        self.gen_fp_fma(ir, a, FmaKind::Msub)
    }
    fn trans_fnmadd(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool {
        self.gen_fp_fma(ir, a, FmaKind::Nmadd)
    }
    fn trans_fnmsub(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool {
        self.gen_fp_fma(ir, a, FmaKind::Nmsub)
    }
}
