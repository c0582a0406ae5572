//! A64 TCG Frontend: guest instruction decoding and IR generation.
//!
//! Provides the generic translation framework (`TranslatorOps` trait
//! and `translator_loop`) plus the AArch64 decoder and translators.

pub mod aarch64;

use a64tcg_core::IrBuilder;
use thiserror::Error;

// ---------------------------------------------------------------
// Generic translation framework
// ---------------------------------------------------------------

/// Block termination reason set by `translate_insn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisasJumpType {
    /// Continue to the next sequential instruction.
    Next,
    /// Reached the maximum number of instructions per block.
    TooMany,
    /// Unconditional exit, no fall-through.
    NoReturn,
}

/// Base context shared by all guest architectures.
///
/// Mirrors QEMU's `DisasContextBase`.
#[derive(Debug, Clone)]
pub struct DisasContextBase {
    /// PC of the first instruction in this block.
    pub pc_first: u64,
    /// PC of the *next* instruction to decode.
    pub pc_next: u64,
    /// How the current instruction terminates.
    pub is_jmp: DisasJumpType,
    /// Number of guest instructions translated so far.
    pub num_insns: u32,
    /// Maximum instructions allowed in one block.
    pub max_insns: u32,
}

impl DisasContextBase {
    pub fn new(pc: u64, max_insns: u32) -> Self {
        Self {
            pc_first: pc,
            pc_next: pc,
            is_jmp: DisasJumpType::Next,
            num_insns: 0,
            max_insns,
        }
    }
}

/// Why a single instruction word could not be translated.
///
/// Both variants guarantee that the translator emitted no IR for the
/// word; what happens next is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// No decode pattern matches the word.
    #[error("unallocated encoding 0x{insn:08x} at pc 0x{pc:016x}")]
    Unallocated { pc: u64, insn: u32 },
    /// A pattern matched but its fields select a reserved form, or the
    /// configured CPU lacks the feature the instruction needs.
    #[error("reserved form of {mnemonic} (0x{insn:08x}) at pc 0x{pc:016x}")]
    Reserved {
        pc: u64,
        insn: u32,
        mnemonic: &'static str,
    },
    /// The block ran past the end of the fetched instruction window.
    #[error("pc 0x{pc:016x} is outside the fetched instruction window")]
    OutOfWindow { pc: u64 },
}

/// Per-architecture translation operations.
///
/// Mirrors QEMU's `TranslatorOps` vtable. Every hook is generic over
/// the IR builder so a block can be translated into a `Context` or
/// into a recording stand-in.
pub trait TranslatorOps {
    /// Architecture-specific disassembly context.
    type DisasContext;

    /// One-time setup before the translation loop.
    fn init_disas_context<Ir: IrBuilder>(
        ctx: &mut Self::DisasContext,
        ir: &mut Ir,
    );

    /// Called once at the start of the block (after init).
    fn tb_start<Ir: IrBuilder>(ctx: &mut Self::DisasContext, ir: &mut Ir);

    /// Emit `insn_start` marker for the current guest PC.
    fn insn_start<Ir: IrBuilder>(ctx: &mut Self::DisasContext, ir: &mut Ir);

    /// Decode and translate one guest instruction.
    ///
    /// Must advance `base().pc_next` and set `base().is_jmp`
    /// when the instruction terminates the block.
    fn translate_insn<Ir: IrBuilder>(
        ctx: &mut Self::DisasContext,
        ir: &mut Ir,
    );

    /// Emit block epilogue (exit for fall-through).
    fn tb_stop<Ir: IrBuilder>(ctx: &mut Self::DisasContext, ir: &mut Ir);

    /// Access the base context embedded in the arch context.
    fn base(ctx: &Self::DisasContext) -> &DisasContextBase;

    /// Mutable access to the base context.
    fn base_mut(ctx: &mut Self::DisasContext) -> &mut DisasContextBase;
}

/// Generic translation loop. Drives the decode → translate
/// cycle.
///
/// Mirrors QEMU's `translator_loop()` in
/// `accel/tcg/translator.c`.
pub fn translator_loop<T: TranslatorOps, Ir: IrBuilder>(
    ctx: &mut T::DisasContext,
    ir: &mut Ir,
) {
    T::init_disas_context(ctx, ir);
    T::tb_start(ctx, ir);

    loop {
        T::insn_start(ctx, ir);
        T::translate_insn(ctx, ir);

        let base = T::base(ctx);
        if base.is_jmp != DisasJumpType::Next {
            break;
        }
        if base.num_insns >= base.max_insns {
            T::base_mut(ctx).is_jmp = DisasJumpType::TooMany;
            break;
        }
    }

    T::tb_stop(ctx, ir);
}
