//! Reference IR evaluator.
//!
//! Executes the op stream of a translated block directly against an
//! `A64Cpu`, one op at a time, so translations can be checked against
//! concrete register values. Every value is held as a `u128`; integer
//! results are truncated to their op type.

use a64tcg_core::{Cond, Context, FpCond, Opcode, TempKind, Type, VecElem};
use a64tcg_frontend::aarch64::cpu::{A64Cpu, NUM_VREGS, PC_OFFSET};
use a64tcg_frontend::aarch64::helper::lookup_helper;
use log::trace;

/// Result of running one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// Value passed to `exit_tb`.
    pub code: u64,
}

fn ty_mask(ty: Type) -> u128 {
    match ty {
        Type::I32 => u32::MAX as u128,
        Type::I64 => u64::MAX as u128,
        Type::V128 => u128::MAX,
    }
}

fn lane(v: u128, vece: VecElem, i: u32) -> u128 {
    (v >> (i * vece.bits())) & vece.mask()
}

/// Apply `f` lane by lane to `a` and `b`.
fn map2(vece: VecElem, a: u128, b: u128, f: impl Fn(u128, u128) -> u128) -> u128 {
    let mut out = 0u128;
    for i in 0..vece.lanes(Type::V128) {
        let r = f(lane(a, vece, i), lane(b, vece, i)) & vece.mask();
        out |= r << (i * vece.bits());
    }
    out
}

fn sext(v: u128, vece: VecElem) -> i128 {
    let shift = 128 - vece.bits();
    ((v << shift) as i128) >> shift
}

fn all_ones_if(c: bool) -> u128 {
    if c {
        u128::MAX
    } else {
        0
    }
}

fn int_cmp(vece: VecElem, cond: Cond, a: u128, b: u128) -> bool {
    let (sa, sb) = (sext(a, vece), sext(b, vece));
    match cond {
        Cond::Eq => a == b,
        Cond::Ne => a != b,
        Cond::Lt => sa < sb,
        Cond::Ge => sa >= sb,
        Cond::Le => sa <= sb,
        Cond::Gt => sa > sb,
        Cond::Ltu => a < b,
        Cond::Geu => a >= b,
        Cond::Leu => a <= b,
        Cond::Gtu => a > b,
    }
}

/// Shift one lane by the signed low byte of `amount`.
fn shl_lane(vece: VecElem, signed: bool, a: u128, amount: u128) -> u128 {
    let bits = vece.bits() as i32;
    let sh = amount as u8 as i8 as i32;
    if sh >= 0 {
        if sh >= bits {
            0
        } else {
            a << sh
        }
    } else if signed {
        let v = sext(a, vece);
        (v >> (-sh).min(bits - 1)) as u128
    } else if -sh >= bits {
        0
    } else {
        a >> -sh
    }
}

fn fp_binop(
    vece: VecElem,
    a: u128,
    b: u128,
    f32op: impl Fn(f32, f32) -> u128,
    f64op: impl Fn(f64, f64) -> u128,
) -> u128 {
    match vece {
        VecElem::B32 => map2(vece, a, b, |x, y| {
            f32op(f32::from_bits(x as u32), f32::from_bits(y as u32))
        }),
        VecElem::B64 => map2(vece, a, b, |x, y| {
            f64op(f64::from_bits(x as u64), f64::from_bits(y as u64))
        }),
        _ => panic!("no FP lanes of {} bits", vece.bits()),
    }
}

fn fp_cmp(vece: VecElem, cond: FpCond, a: u128, b: u128) -> u128 {
    fp_binop(
        vece,
        a,
        b,
        |x, y| {
            all_ones_if(match cond {
                FpCond::Eq => x == y,
                FpCond::Ge => x >= y,
                FpCond::Gt => x > y,
            })
        },
        |x, y| {
            all_ones_if(match cond {
                FpCond::Eq => x == y,
                FpCond::Ge => x >= y,
                FpCond::Gt => x > y,
            })
        },
    )
}

/// Run every op of `ctx` against `cpu` until `exit_tb`.
pub fn run(ctx: &Context, cpu: &mut A64Cpu) -> Exit {
    let mut vals = vec![0u128; ctx.nb_temps() as usize];
    let env = cpu as *mut A64Cpu;

    let load_globals = |vals: &mut Vec<u128>, cpu: &A64Cpu| {
        for t in ctx.globals() {
            let i = t.idx.0 as usize;
            match t.kind {
                TempKind::Global if t.mem_offset == PC_OFFSET => {
                    vals[i] = cpu.pc as u128
                }
                TempKind::Global => {
                    let r = (t.mem_offset / 16) as usize;
                    assert!(r < NUM_VREGS, "unknown global offset {}", t.mem_offset);
                    vals[i] = cpu.vregs[r];
                }
                TempKind::Fixed => vals[i] = env as u64 as u128,
                _ => {}
            }
        }
    };
    let store_globals = |vals: &Vec<u128>, cpu: &mut A64Cpu| {
        for t in ctx.globals() {
            if t.kind != TempKind::Global {
                continue;
            }
            let v = vals[t.idx.0 as usize];
            if t.mem_offset == PC_OFFSET {
                cpu.pc = v as u64;
            } else {
                cpu.vregs[(t.mem_offset / 16) as usize] = v;
            }
        }
    };

    for t in ctx.temps() {
        if t.is_const() {
            vals[t.idx.0 as usize] = t.val as u128;
        }
    }
    load_globals(&mut vals, cpu);

    for op in ctx.ops() {
        let o = op.oargs();
        let i = op.iargs();
        let c = op.cargs();
        let get = |vals: &Vec<u128>, k: usize| vals[i[k].0 as usize];
        let vece = op.vece;

        let result = match op.opc {
            Opcode::InsnStart => continue,
            Opcode::ExitTb => {
                store_globals(&vals, cpu);
                return Exit { code: c[0].0 as u64 };
            }
            Opcode::Mov => get(&vals, 0) & ty_mask(op.op_type),
            Opcode::Add => {
                get(&vals, 0).wrapping_add(get(&vals, 1)) & ty_mask(op.op_type)
            }
            Opcode::Sub => {
                get(&vals, 0).wrapping_sub(get(&vals, 1)) & ty_mask(op.op_type)
            }
            Opcode::Call => {
                let addr = (c[0].0 as u64) | ((c[1].0 as u64) << 32);
                let (name, f) = lookup_helper(addr).expect("call to unknown helper");
                trace!("eval: call {name}");
                store_globals(&vals, cpu);
                let r = f(
                    get(&vals, 0) as u64 as *mut A64Cpu,
                    get(&vals, 1) as u64,
                    get(&vals, 2) as u64,
                    get(&vals, 3) as u64,
                );
                load_globals(&mut vals, cpu);
                r as u128
            }
            Opcode::ZeroVec => 0,
            Opcode::ZeroUpperVec => get(&vals, 0) & vece.unwrap().mask(),
            Opcode::ExtractVec => {
                lane(get(&vals, 0), vece.unwrap(), c[0].0) & ty_mask(op.op_type)
            }
            Opcode::AndVec => get(&vals, 0) & get(&vals, 1),
            Opcode::NotVec => !get(&vals, 0),
            Opcode::CmpVec => {
                let vece = vece.unwrap();
                let cond = Cond::from_raw(c[0].0).unwrap();
                map2(vece, get(&vals, 0), get(&vals, 1), |a, b| {
                    all_ones_if(int_cmp(vece, cond, a, b))
                })
            }
            Opcode::SshlVec | Opcode::UshlVec => {
                let vece = vece.unwrap();
                let signed = op.opc == Opcode::SshlVec;
                map2(vece, get(&vals, 0), get(&vals, 1), |a, b| {
                    shl_lane(vece, signed, a, b)
                })
            }
            Opcode::FCmpVec => {
                let cond = FpCond::from_raw(c[0].0).unwrap();
                fp_cmp(vece.unwrap(), cond, get(&vals, 0), get(&vals, 1))
            }
            Opcode::FAbsVec => {
                let vece = vece.unwrap();
                let sign = 1u128 << (vece.bits() - 1);
                map2(vece, get(&vals, 0), 0, |a, _| a & !sign)
            }
            Opcode::FAbdVec => fp_binop(
                vece.unwrap(),
                get(&vals, 0),
                get(&vals, 1),
                |x, y| (x - y).abs().to_bits() as u128,
                |x, y| (x - y).abs().to_bits() as u128,
            ),
            Opcode::Count => unreachable!(),
        };
        vals[o[0].0 as usize] = result;
    }

    store_globals(&vals, cpu);
    panic!("block fell off the end without exit_tb");
}
