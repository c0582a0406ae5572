//! AArch64 frontend: A64 SIMD&FP scalar instruction translation.

pub mod cpu;
pub mod ext;
pub mod fp;
pub mod helper;
pub mod insn_decode;
mod trans;

pub use trans::{CmpKind, Discipline, FpCmpKind};

use crate::{DisasContextBase, DisasJumpType, TranslateError, TranslatorOps};
use a64tcg_core::{IrBuilder, TempIdx, Type};
use cpu::{vreg_offset, NUM_VREGS, PC_OFFSET, VREG_NAMES};
use ext::A64Cfg;
use log::{debug, trace};

/// `exit_tb` value for a block that falls through to the next PC.
pub const EXIT_NEXT: u64 = 0;
/// `exit_tb` value for a block closed by an untranslatable word; the
/// guest PC points at that word.
pub const EXIT_UNDEF: u64 = 3;

// ---------------------------------------------------------------
// Disassembly context
// ---------------------------------------------------------------

/// A64 disassembly context (extends `DisasContextBase`).
pub struct A64DisasContext {
    /// Generic base fields (pc, is_jmp, counters).
    pub base: DisasContextBase,
    /// IR temp for the env pointer (fixed to host RBP).
    pub env: TempIdx,
    /// IR temps for guest V0-V31 (globals).
    pub vreg: [TempIdx; NUM_VREGS],
    /// IR temp for the guest PC (global).
    pub pc: TempIdx,
    /// CPU features translators gate on.
    pub cfg: A64Cfg,
    /// Raw instruction word being decoded.
    pub opcode: u32,
    /// Why the block was closed early, if it was.
    pub error: Option<TranslateError>,
    /// Instruction words starting at `base.pc_first`.
    window: Vec<u32>,
}

impl A64DisasContext {
    /// Create a new context for translating a block starting at `pc`.
    /// `window` holds the instruction words fetched from `pc` onward;
    /// the block never extends past it.
    pub fn new(pc: u64, window: &[u32], cfg: A64Cfg) -> Self {
        let max_insns = cfg.max_insns.min(window.len() as u32).max(1);
        Self {
            base: DisasContextBase::new(pc, max_insns),
            env: TempIdx(0),
            vreg: [TempIdx(0); NUM_VREGS],
            pc: TempIdx(0),
            cfg,
            opcode: 0,
            error: None,
            window: window.to_vec(),
        }
    }

    /// Fetch the word at the current PC from the window.
    fn fetch_insn(&self) -> Result<u32, TranslateError> {
        let pc = self.base.pc_next;
        let idx = pc.wrapping_sub(self.base.pc_first) / 4;
        self.window
            .get(idx as usize)
            .copied()
            .ok_or(TranslateError::OutOfWindow { pc })
    }

    /// Translate one word at the current PC.
    ///
    /// On error nothing has been emitted for the word.
    pub fn translate_one<Ir: IrBuilder>(
        &mut self,
        ir: &mut Ir,
        insn: u32,
    ) -> Result<(), TranslateError> {
        self.opcode = insn;
        if insn_decode::decode(self, ir, insn) {
            return Ok(());
        }
        let pc = self.base.pc_next;
        Err(match insn_decode::mnemonic(insn) {
            Some(mnemonic) => TranslateError::Reserved { pc, insn, mnemonic },
            None => TranslateError::Unallocated { pc, insn },
        })
    }

    /// Set the guest PC to `pc` and leave the block with `code`.
    fn gen_exit<Ir: IrBuilder>(&self, ir: &mut Ir, pc: u64, code: u64) {
        let pc_const = ir.new_const(Type::I64, pc);
        ir.gen_mov(Type::I64, self.pc, pc_const);
        ir.gen_exit_tb(code);
    }
}

/// Translate one block of `window` starting at `pc` into `ir`.
///
/// An empty window has nothing to translate and is reported as
/// `OutOfWindow`. Otherwise the finished context is returned; its
/// `error` records the word that closed the block with `EXIT_UNDEF`.
pub fn translate_block<Ir: IrBuilder>(
    ir: &mut Ir,
    pc: u64,
    window: &[u32],
    cfg: A64Cfg,
) -> Result<A64DisasContext, TranslateError> {
    if window.is_empty() {
        return Err(TranslateError::OutOfWindow { pc });
    }
    let mut ctx = A64DisasContext::new(pc, window, cfg);
    crate::translator_loop::<A64Translator, Ir>(&mut ctx, ir);
    Ok(ctx)
}

// ---------------------------------------------------------------
// TranslatorOps implementation
// ---------------------------------------------------------------

/// Marker type for the A64 translator.
pub struct A64Translator;

impl TranslatorOps for A64Translator {
    type DisasContext = A64DisasContext;

    fn init_disas_context<Ir: IrBuilder>(
        ctx: &mut A64DisasContext,
        ir: &mut Ir,
    ) {
        // Register the env pointer (fixed to host RBP = reg 5).
        ctx.env = ir.new_fixed(Type::I64, 5, "env");

        // Register guest V registers as globals at known offsets.
        for i in 0..NUM_VREGS {
            ctx.vreg[i] =
                ir.new_global(Type::V128, ctx.env, vreg_offset(i), VREG_NAMES[i]);
        }

        ctx.pc = ir.new_global(Type::I64, ctx.env, PC_OFFSET, "pc");
    }

    fn tb_start<Ir: IrBuilder>(_ctx: &mut A64DisasContext, _ir: &mut Ir) {}

    fn insn_start<Ir: IrBuilder>(ctx: &mut A64DisasContext, ir: &mut Ir) {
        ir.gen_insn_start(ctx.base.pc_next);
        ctx.base.num_insns += 1;
    }

    fn translate_insn<Ir: IrBuilder>(ctx: &mut A64DisasContext, ir: &mut Ir) {
        let pc = ctx.base.pc_next;
        let result = ctx.fetch_insn().and_then(|insn| {
            trace!(
                "pc 0x{pc:016x}: {insn:08x} {}",
                insn_decode::mnemonic(insn).unwrap_or("?")
            );
            ctx.translate_one(ir, insn)
        });

        match result {
            Ok(()) => ctx.base.pc_next += 4,
            Err(err) => {
                debug!("closing block: {err}");
                ctx.gen_exit(ir, pc, EXIT_UNDEF);
                ctx.base.is_jmp = DisasJumpType::NoReturn;
                ctx.error = Some(err);
            }
        }
    }

    fn tb_stop<Ir: IrBuilder>(ctx: &mut A64DisasContext, ir: &mut Ir) {
        match ctx.base.is_jmp {
            DisasJumpType::NoReturn => {
                // Block already terminated by the instruction.
            }
            DisasJumpType::Next | DisasJumpType::TooMany => {
                // Fall through: update PC and exit.
                ctx.gen_exit(ir, ctx.base.pc_next, EXIT_NEXT);
            }
        }
    }

    fn base(ctx: &A64DisasContext) -> &DisasContextBase {
        &ctx.base
    }

    fn base_mut(ctx: &mut A64DisasContext) -> &mut DisasContextBase {
        &mut ctx.base
    }
}
