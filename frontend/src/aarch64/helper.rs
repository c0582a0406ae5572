//! Runtime helpers called from translated code.
//!
//! Each helper takes the env pointer first, reads FPCR from the CPU
//! state and ORs the raised exceptions into FPSR. Operands and the
//! result travel as raw bits in the low lane of a u64.

use super::cpu::A64Cpu;
use super::fp::{fp_mul_add, FpCr, FpExc, FpFormat};

/// Signature shared by the fused multiply-add helpers:
/// `(env, addend, op1, op2) -> result`.
pub type FmaHelper = extern "C" fn(*mut A64Cpu, u64, u64, u64) -> u64;

/// Operand negations applied before `FPMulAdd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmaKind {
    /// `a + n * m`
    Madd,
    /// `a + (-n) * m`
    Msub,
    /// `(-a) + (-n) * m`
    Nmadd,
    /// `(-a) + n * m`
    Nmsub,
}

impl FmaKind {
    /// `(negate addend, negate op1)`.
    const fn negations(self) -> (bool, bool) {
        match self {
            FmaKind::Madd => (false, false),
            FmaKind::Msub => (false, true),
            FmaKind::Nmadd => (true, true),
            FmaKind::Nmsub => (true, false),
        }
    }
}

fn do_fma(
    env: *mut A64Cpu,
    fmt: FpFormat,
    kind: FmaKind,
    a: u64,
    n: u64,
    m: u64,
) -> u64 {
    let env = unsafe { &mut *env };
    let mask = u64::MAX >> (64 - fmt.total_bits());
    let (neg_a, neg_n) = kind.negations();
    let a = if neg_a { fmt.neg(a & mask) } else { a & mask };
    let n = if neg_n { fmt.neg(n & mask) } else { n & mask };

    let mut exc = FpExc::empty();
    let res = fp_mul_add(fmt, a, n, m & mask, FpCr(env.fpcr), &mut exc);
    env.fpsr |= exc.bits();
    res
}

#[no_mangle]
pub extern "C" fn helper_fmadd_s(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::SINGLE, FmaKind::Madd, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fmsub_s(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::SINGLE, FmaKind::Msub, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fnmadd_s(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::SINGLE, FmaKind::Nmadd, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fnmsub_s(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::SINGLE, FmaKind::Nmsub, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fmadd_d(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::DOUBLE, FmaKind::Madd, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fmsub_d(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::DOUBLE, FmaKind::Msub, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fnmadd_d(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::DOUBLE, FmaKind::Nmadd, a, n, m)
}

#[no_mangle]
pub extern "C" fn helper_fnmsub_d(env: *mut A64Cpu, a: u64, n: u64, m: u64) -> u64 {
    do_fma(env, FpFormat::DOUBLE, FmaKind::Nmsub, a, n, m)
}

/// Helper for `kind` at single (`double == false`) or double precision.
pub fn fma_helper(kind: FmaKind, double: bool) -> FmaHelper {
    match (kind, double) {
        (FmaKind::Madd, false) => helper_fmadd_s,
        (FmaKind::Msub, false) => helper_fmsub_s,
        (FmaKind::Nmadd, false) => helper_fnmadd_s,
        (FmaKind::Nmsub, false) => helper_fnmsub_s,
        (FmaKind::Madd, true) => helper_fmadd_d,
        (FmaKind::Msub, true) => helper_fmsub_d,
        (FmaKind::Nmadd, true) => helper_fnmadd_d,
        (FmaKind::Nmsub, true) => helper_fnmsub_d,
    }
}

/// Every helper this frontend can emit a call to.
pub static HELPERS: [(&str, FmaHelper); 8] = [
    ("fmadd_s", helper_fmadd_s),
    ("fmsub_s", helper_fmsub_s),
    ("fnmadd_s", helper_fnmadd_s),
    ("fnmsub_s", helper_fnmsub_s),
    ("fmadd_d", helper_fmadd_d),
    ("fmsub_d", helper_fmsub_d),
    ("fnmadd_d", helper_fnmadd_d),
    ("fnmsub_d", helper_fnmsub_d),
];

/// Resolve the address carried by a `call` op back to its helper.
pub fn lookup_helper(addr: u64) -> Option<(&'static str, FmaHelper)> {
    HELPERS
        .iter()
        .find(|(_, f)| *f as usize as u64 == addr)
        .copied()
}
