use super::*;
use a64tcg_frontend::aarch64::fp::{FpCr, FpExc, RoundingMode};

const SINGLE: u32 = 0b00;
const DOUBLE: u32 = 0b01;

/// Run `insn` with Vn = V1, Vm = V2, Va = V3; returns V0 and FPSR.
fn run_fma_d(insn: u32, n: f64, m: f64, a: f64, fpcr: u64) -> (u128, u64) {
    let mut cpu = A64Cpu::new();
    cpu.fpcr = fpcr;
    cpu.vregs[1] = n.to_bits() as u128;
    cpu.vregs[2] = m.to_bits() as u128;
    cpu.vregs[3] = GARBAGE_HI | a.to_bits() as u128;
    cpu.vregs[0] = GARBAGE_HI;
    run_a64(&mut cpu, insn);
    (cpu.vregs[0], cpu.fpsr)
}

fn run_fma_s(insn: u32, n: f32, m: f32, a: f32) -> (u128, u64) {
    let mut cpu = A64Cpu::new();
    cpu.vregs[1] = GARBAGE_HI | n.to_bits() as u128;
    cpu.vregs[2] = (0xffff_ffffu128 << 32) | m.to_bits() as u128;
    cpu.vregs[3] = a.to_bits() as u128;
    cpu.vregs[0] = GARBAGE_HI;
    run_a64(&mut cpu, insn);
    (cpu.vregs[0], cpu.fpsr)
}

fn d(v: f64) -> u128 {
    v.to_bits() as u128
}

fn s(v: f32) -> u128 {
    v.to_bits() as u128
}

#[test]
fn fmadd_family_double() {
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), 2.0, 3.0, 10.0, 0);
    assert_eq!(r, d(16.0));
    let (r, _) = run_fma_d(fmsub(DOUBLE, 0, 1, 2, 3), 2.0, 3.0, 10.0, 0);
    assert_eq!(r, d(4.0));
    let (r, _) = run_fma_d(fnmadd(DOUBLE, 0, 1, 2, 3), 2.0, 3.0, 10.0, 0);
    assert_eq!(r, d(-16.0));
    let (r, _) = run_fma_d(fnmsub(DOUBLE, 0, 1, 2, 3), 2.0, 3.0, 10.0, 0);
    assert_eq!(r, d(-4.0));
}

#[test]
fn fmadd_family_single() {
    let (r, fpsr) = run_fma_s(fmadd(SINGLE, 0, 1, 2, 3), 1.5, 2.0, 0.25);
    assert_eq!(r, s(3.25));
    assert_eq!(fpsr, 0);
    let (r, _) = run_fma_s(fmsub(SINGLE, 0, 1, 2, 3), 1.5, 2.0, 0.25);
    assert_eq!(r, s(-2.75));
    let (r, _) = run_fma_s(fnmadd(SINGLE, 0, 1, 2, 3), 1.5, 2.0, 0.25);
    assert_eq!(r, s(-3.25));
    let (r, _) = run_fma_s(fnmsub(SINGLE, 0, 1, 2, 3), 1.5, 2.0, 0.25);
    assert_eq!(r, s(2.75));
}

#[test]
fn fmadd_rounds_once() {
    // x*x = 1 + 2^-51 + 2^-104; two roundings would lose the last term.
    let x = f64::from_bits(0x3ff0_0000_0000_0001);
    let a = -f64::from_bits(0x3ff0_0000_0000_0002);
    let (r, fpsr) = run_fma_d(fmadd(DOUBLE, 0, 1, 1, 3), x, x, a, 0);
    assert_eq!(r as u64, 0x3970_0000_0000_0000);
    assert_eq!(r as u64, x.mul_add(x, a).to_bits());
    assert_ne!(x * x + a, f64::from_bits(r as u64));
    assert_eq!(fpsr, 0);
}

#[test]
fn fmadd_sets_fpsr_flags() {
    let (_, fpsr) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), 0.1, 0.1, 0.0, 0);
    assert_eq!(fpsr, FpExc::IXC.bits());

    let (r, fpsr) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), f64::INFINITY, 0.0, 1.0, 0);
    assert!(f64::from_bits(r as u64).is_nan());
    assert_eq!(fpsr, FpExc::IOC.bits());

    let (r, fpsr) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), f64::MAX, 2.0, 0.0, 0);
    assert_eq!(r, d(f64::INFINITY));
    assert_eq!(fpsr, (FpExc::OFC | FpExc::IXC).bits());
}

#[test]
fn fmadd_honours_fpcr_rounding() {
    let fpcr = FpCr(0).with_rounding_mode(RoundingMode::TowardZero).0;
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), f64::MAX, 2.0, 0.0, fpcr);
    assert_eq!(r, d(f64::MAX));

    // Exact cancellation is -0 only when rounding toward minus infinity.
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), 1.0, 1.0, -1.0, 0);
    assert_eq!(r, d(0.0));
    let fpcr = FpCr(0).with_rounding_mode(RoundingMode::MinusInfinity).0;
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), 1.0, 1.0, -1.0, fpcr);
    assert_eq!(r, d(-0.0));
}

#[test]
fn fmadd_default_nan_mode() {
    let qnan = f64::from_bits(0x7ff8_0000_0000_1234);
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), qnan, 1.0, 1.0, 0);
    assert_eq!(r as u64, 0x7ff8_0000_0000_1234);
    let (r, _) = run_fma_d(fmadd(DOUBLE, 0, 1, 2, 3), qnan, 1.0, 1.0, FpCr::DN);
    assert_eq!(r as u64, 0x7ff8_0000_0000_0000);
}

#[test]
fn fma_reserved_ftype() {
    for ftype in [0b10, 0b11] {
        let insn = fmadd(ftype, 0, 1, 2, 3);
        let (err, calls) = translate_rejected(insn, A64Cfg::ARMV8A);
        assert_eq!(err, reserved(insn, "FMADD"));
        assert_eq!(calls, 0);
    }
}

#[test]
fn fma_needs_fp() {
    let insn = fnmsub(DOUBLE, 0, 1, 2, 3);
    let (err, calls) = translate_rejected(insn, A64Cfg::INTEGER_ONLY);
    assert_eq!(err, reserved(insn, "FNMSUB"));
    assert_eq!(calls, 0);

    // Scalar FP does not depend on AdvSIMD.
    let cfg = A64Cfg {
        ext_advsimd: false,
        ..A64Cfg::ARMV8A
    };
    let mut cpu = A64Cpu::new();
    cpu.vregs[1] = d(2.0);
    cpu.vregs[2] = d(4.0);
    let (dc, _) = run_a64_cfg(&mut cpu, &[fmadd(DOUBLE, 0, 1, 2, 3)], cfg);
    assert_eq!(dc.error, None);
    assert_eq!(cpu.vregs[0], d(8.0));
}
