use super::*;
use a64tcg_core::dump::dump_ops;
use a64tcg_core::Opcode;
use a64tcg_frontend::aarch64::insn_decode::{mnemonic, PATTERNS};
use a64tcg_frontend::aarch64::{EXIT_NEXT, EXIT_UNDEF};
use a64tcg_frontend::DisasJumpType;

#[test]
fn block_falls_through() {
    let mut cpu = A64Cpu::new();
    cpu.pc = 0x4000;
    cpu.vregs[1] = 7;
    cpu.vregs[2] = 5;
    let (dc, exit) = run_a64_cfg(
        &mut cpu,
        &[add(3, 1, 2), sub(4, 1, 2), cmgt(5, 1, 2)],
        A64Cfg::ARMV8A,
    );
    assert_eq!(exit.code, EXIT_NEXT);
    assert_eq!(dc.error, None);
    assert_eq!(dc.base.num_insns, 3);
    assert_eq!(dc.base.is_jmp, DisasJumpType::TooMany);
    assert_eq!(cpu.pc, 0x400c);
    assert_eq!(cpu.vregs[3], 12);
    assert_eq!(cpu.vregs[4], 2);
    assert_eq!(cpu.vregs[5], u64::MAX as u128);
}

#[test]
fn unallocated_word_closes_block() {
    let mut cpu = A64Cpu::new();
    cpu.pc = 0x8000;
    cpu.vregs[1] = 1;
    cpu.vregs[2] = 2;
    let (dc, exit) = run_a64_cfg(
        &mut cpu,
        &[add(3, 1, 2), 0x0000_0000, add(4, 1, 2)],
        A64Cfg::ARMV8A,
    );
    assert_eq!(exit.code, EXIT_UNDEF);
    assert_eq!(cpu.pc, 0x8004);
    assert_eq!(
        dc.error,
        Some(TranslateError::Unallocated {
            pc: 0x8004,
            insn: 0
        })
    );
    assert_eq!(dc.base.is_jmp, DisasJumpType::NoReturn);
    // The word before the fault ran; the one after was never reached.
    assert_eq!(cpu.vregs[3], 3);
    assert_eq!(cpu.vregs[4], 0);
}

#[test]
fn reserved_word_closes_block() {
    let mut cpu = A64Cpu::new();
    cpu.vregs[0] = 0x77;
    let insn = a64_3same(1, 0b00, 17, 0, 1, 2);
    let (dc, exit) = run_a64_cfg(&mut cpu, &[insn], A64Cfg::ARMV8A);
    assert_eq!(exit.code, EXIT_UNDEF);
    assert_eq!(cpu.pc, 0);
    assert_eq!(
        dc.error,
        Some(TranslateError::Reserved {
            pc: 0,
            insn,
            mnemonic: "CMEQ_reg"
        })
    );
    assert_eq!(cpu.vregs[0], 0x77);
}

#[test]
fn empty_window_is_out_of_window() {
    let mut ctx = Context::new();
    let res = translate_block(&mut ctx, 0x2000, &[], A64Cfg::ARMV8A);
    assert_eq!(
        res.err(),
        Some(TranslateError::OutOfWindow { pc: 0x2000 })
    );
    assert_eq!(ctx.num_ops(), 0);
}

#[test]
fn max_insns_limits_block() {
    let mut cpu = A64Cpu::new();
    cpu.pc = 0x100;
    cpu.vregs[1] = 1;
    let cfg = A64Cfg::ARMV8A.with_max_insns(1);
    let (dc, exit) = run_a64_cfg(&mut cpu, &[add(2, 1, 1), add(3, 1, 1)], cfg);
    assert_eq!(exit.code, EXIT_NEXT);
    assert_eq!(dc.base.num_insns, 1);
    assert_eq!(cpu.pc, 0x104);
    assert_eq!(cpu.vregs[2], 2);
    assert_eq!(cpu.vregs[3], 0);
}

#[test]
fn one_insn_start_per_word() {
    let mut ctx = Context::new();
    let insns = [cmeq(0, 1, 2), cmtst(1, 2, 3), fabd(1, 4, 5, 6)];
    translate_block(&mut ctx, 0, &insns, A64Cfg::ARMV8A).unwrap();
    assert_eq!(ctx.nb_insns(), 3);
    let exits = ctx.ops().iter().filter(|op| op.opc == Opcode::ExitTb).count();
    assert_eq!(exits, 1);
    assert_eq!(ctx.ops().last().map(|op| op.opc), Some(Opcode::ExitTb));
}

#[test]
fn translation_is_deterministic() {
    let insns = [
        cmhi(0, 1, 2),
        cmlt0(3, 4),
        ushl(5, 6, 7),
        facgt(0, 8, 9, 10),
        fnmadd(1, 11, 12, 13, 14),
    ];
    let mut a = Context::new();
    let mut b = Context::new();
    translate_block(&mut a, 0x1000, &insns, A64Cfg::ARMV8A).unwrap();
    translate_block(&mut b, 0x1000, &insns, A64Cfg::ARMV8A).unwrap();
    assert_eq!(a.ops(), b.ops());

    let (mut da, mut db) = (Vec::new(), Vec::new());
    dump_ops(&a, &mut da).unwrap();
    dump_ops(&b, &mut db).unwrap();
    assert_eq!(da, db);
}

#[test]
fn dump_of_scalar_compare() {
    let mut ctx = Context::new();
    translate_block(&mut ctx, 0, &[cmeq(0, 1, 2)], A64Cfg::ARMV8A).unwrap();
    let mut out = Vec::new();
    dump_ops(&ctx, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("cmp_vec_e64 tmp0, v1, v2, eq"), "{text}");
    assert!(text.contains("extract_vec_e64 tmp1, tmp0, $0x0"), "{text}");
    assert!(text.contains("zero_upper_vec_e64 v0, tmp1"), "{text}");
}

#[test]
fn patterns_decode_to_their_own_name() {
    for &(name, mask, bits) in &PATTERNS {
        assert_eq!(bits & !mask, 0, "{name} fixed bits outside mask");
        assert_eq!(mnemonic(bits), Some(name), "{name} shadowed");
    }
    assert_eq!(mnemonic(0), None);
    assert_eq!(mnemonic(cmeq(0, 1, 2)), Some("CMEQ_reg"));
    assert_eq!(mnemonic(fmadd(1, 0, 1, 2, 3)), Some("FMADD"));
}

#[test]
fn recording_sees_whole_block() {
    let mut ir = RecordingIr::new();
    let dc = translate_block(&mut ir, 0, &[add(0, 1, 2)], A64Cfg::ARMV8A).unwrap();
    assert_eq!(dc.error, None);
    // env + 32 V registers + pc
    assert_eq!(ir.globals, 34);
    assert_eq!(ir.ops.first(), Some(&Opcode::InsnStart));
    assert_eq!(ir.ops.last(), Some(&Opcode::ExitTb));
    assert!(ir.ops.contains(&Opcode::Add));
}
