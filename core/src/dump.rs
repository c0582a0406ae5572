//! IR dump: human-readable text output for translated blocks.
//!
//! Mirrors QEMU's `tcg_dump_ops()` in `tcg/tcg.c`.

use std::fmt::Write as FmtWrite;
use std::io::Write;

use crate::context::Context;
use crate::op::Op;
use crate::opcode::Opcode;
use crate::temp::{TempIdx, TempKind};
use crate::types::{Cond, FpCond, Type};

/// Format a temp reference for display.
fn fmt_temp(ctx: &Context, idx: TempIdx, buf: &mut String) -> std::fmt::Result {
    let i = idx.0 as usize;
    if i >= ctx.nb_temps() as usize {
        let v = idx.0;
        return write!(buf, "$0x{v:x}");
    }
    let t = ctx.temp(idx);
    match t.kind {
        TempKind::Const => {
            let v = t.val;
            write!(buf, "$0x{v:x}")
        }
        TempKind::Global | TempKind::Fixed => match t.name {
            Some(name) => write!(buf, "{name}"),
            None => write!(buf, "g{i}"),
        },
        TempKind::Ebb => {
            let local = i as u32 - ctx.nb_globals();
            write!(buf, "tmp{local}")
        }
    }
}

/// Build the opcode name with its type or lane-size suffix.
fn op_name(op: &Op) -> String {
    let base = op.opc.def().name;
    if let Some(vece) = op.vece {
        let bits = vece.bits();
        return format!("{base}_e{bits}");
    }
    if op.opc.is_int_polymorphic() {
        let suffix = match op.op_type {
            Type::I32 => "_i32",
            Type::I64 => "_i64",
            Type::V128 => "",
        };
        format!("{base}{suffix}")
    } else {
        base.to_string()
    }
}

/// Dump all IR ops in `ctx` to the given writer.
///
/// Output format mirrors QEMU's `tcg_dump_ops()`.
pub fn dump_ops(ctx: &Context, w: &mut impl Write) -> std::io::Result<()> {
    dump_ops_with(ctx, w, |_, _| Ok(()))
}

/// Dump IR ops with an annotation callback for `InsnStart`.
///
/// `insn_anno` is called at each guest instruction boundary with
/// `(pc, writer)`; use it to print the instruction word or its
/// mnemonic on the `---- 0x...` header line.
pub fn dump_ops_with(
    ctx: &Context,
    w: &mut impl Write,
    insn_anno: impl Fn(u64, &mut dyn Write) -> std::io::Result<()>,
) -> std::io::Result<()> {
    let mut buf = String::with_capacity(128);

    for op in ctx.ops() {
        if op.opc == Opcode::InsnStart {
            let cargs = op.cargs();
            let lo = cargs[0].0 as u64;
            let hi = cargs[1].0 as u64;
            let pc = (hi << 32) | lo;
            write!(w, " ---- 0x{pc:016x}")?;
            insn_anno(pc, w)?;
            writeln!(w)?;
            writeln!(w, " insn_start $0x{pc:x}")?;
            continue;
        }

        buf.clear();
        buf.push(' ');
        buf.push_str(&op_name(op));

        let oargs = op.oargs();
        let iargs = op.iargs();
        for (i, &a) in oargs.iter().chain(iargs).enumerate() {
            buf.push_str(if i > 0 { ", " } else { " " });
            fmt_temp(ctx, a, &mut buf).map_err(std::io::Error::other)?;
        }

        // Constant args, special handling per opcode
        let cargs = op.cargs();
        let sep = if oargs.is_empty() && iargs.is_empty() {
            " "
        } else {
            ", "
        };
        match op.opc {
            Opcode::CmpVec => {
                let cond = Cond::from_raw(cargs[0].0).map_or("???", Cond::name);
                buf.push_str(sep);
                buf.push_str(cond);
            }
            Opcode::FCmpVec => {
                let cond =
                    FpCond::from_raw(cargs[0].0).map_or("???", FpCond::name);
                buf.push_str(sep);
                buf.push_str(cond);
            }
            Opcode::Call => {
                let lo = cargs[0].0 as u64;
                let hi = cargs[1].0 as u64;
                let addr = (hi << 32) | lo;
                write!(buf, "{sep}$0x{addr:x}")
                    .map_err(std::io::Error::other)?;
            }
            _ => {
                for (i, &c) in cargs.iter().enumerate() {
                    let v = c.0;
                    let s = if i > 0 { ", " } else { sep };
                    write!(buf, "{s}$0x{v:x}").map_err(std::io::Error::other)?;
                }
            }
        }

        writeln!(w, "{buf}")?;
    }
    Ok(())
}
