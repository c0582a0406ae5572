
/// IR opcodes.
///
/// Maps to QEMU's `TCGOpcode`. Integer ops (marked with `OPF_INT`) work
/// on both I32 and I64; the actual type is carried in `Op::op_type`.
/// Vector ops carry their lane size in `Op::vece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // -- Data movement --
    Mov = 0,

    // -- Arithmetic --
    Add,
    Sub,

    // -- Control --
    ExitTb, // return from block to execution loop
    Call,
    InsnStart, // marks guest instruction boundary

    // -- Vector data movement --
    ZeroVec,      // all-zero vector
    ZeroUpperVec, // keep the low lane, clear everything above it
    ExtractVec,   // lane -> scalar

    // -- Vector logic --
    AndVec,
    NotVec,

    // -- Vector compare --
    CmpVec,

    // -- Vector shift by vector (signed per-lane amount) --
    SshlVec,
    UshlVec,

    // -- Vector floating point --
    FCmpVec,
    FAbsVec,
    FAbdVec, // absolute difference

    // Sentinel, must be last
    Count,
}

/// Flags describing properties of an opcode.
///
/// Maps to QEMU's `TCG_OPF_*` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpFlags(u16);

impl OpFlags {
    pub const NONE: OpFlags = OpFlags(0);
    /// Exits the translation block.
    pub const BB_EXIT: OpFlags = OpFlags(0x01);
    /// Ends a basic block (next op starts a new BB).
    pub const BB_END: OpFlags = OpFlags(0x02);
    /// Clobbers caller-saved registers (like a function call).
    pub const CALL_CLOBBER: OpFlags = OpFlags(0x04);
    /// Operands may be I32 or I64 (type-polymorphic).
    pub const INT: OpFlags = OpFlags(0x10);
    /// Not directly emitted to host code (lowered earlier).
    pub const NOT_PRESENT: OpFlags = OpFlags(0x20);
    /// Vector operation.
    pub const VECTOR: OpFlags = OpFlags(0x40);
    /// Floating-point operation.
    pub const FLOAT: OpFlags = OpFlags(0x80);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: OpFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: OpFlags) -> Self {
        Self(self.0 | other.0)
    }
}

/// Static definition of an opcode: argument counts and flags.
///
/// Maps to QEMU's `TCGOpDef`.
#[derive(Debug, Clone, Copy)]
pub struct OpDef {
    pub name: &'static str,
    pub nb_oargs: u8,
    pub nb_iargs: u8,
    pub nb_cargs: u8,
    pub flags: OpFlags,
}

impl OpDef {
    pub const fn nb_args(&self) -> u8 {
        self.nb_oargs + self.nb_iargs + self.nb_cargs
    }
}

// Helper to combine flags in const context.
const fn f(a: OpFlags, b: OpFlags) -> OpFlags {
    OpFlags(a.0 | b.0)
}

const INT: OpFlags = OpFlags::INT;
const NP: OpFlags = OpFlags::NOT_PRESENT;
const CC: OpFlags = OpFlags::CALL_CLOBBER;
const BE: OpFlags = OpFlags::BB_END;
const BX: OpFlags = OpFlags::BB_EXIT;
const VC: OpFlags = OpFlags::VECTOR;
const FP: OpFlags = OpFlags::FLOAT;

/// Static opcode definition table, indexed by `Opcode as usize`.
pub static OPCODE_DEFS: [OpDef; Opcode::Count as usize] = [
    // Mov
    OpDef {
        name: "mov",
        nb_oargs: 1,
        nb_iargs: 1,
        nb_cargs: 0,
        flags: f(INT, NP),
    },
    // Add
    OpDef {
        name: "add",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: INT,
    },
    // Sub
    OpDef {
        name: "sub",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: INT,
    },
    // ExitTb
    OpDef {
        name: "exit_tb",
        nb_oargs: 0,
        nb_iargs: 0,
        nb_cargs: 1,
        flags: OpFlags(BX.0 | BE.0 | NP.0),
    },
    // Call: env + up to five helper arguments; helper address split
    // into lo/hi constants.
    OpDef {
        name: "call",
        nb_oargs: 1,
        nb_iargs: 6,
        nb_cargs: 2,
        flags: f(CC, NP),
    },
    // InsnStart
    OpDef {
        name: "insn_start",
        nb_oargs: 0,
        nb_iargs: 0,
        nb_cargs: 2,
        flags: NP,
    },
    // ZeroVec
    OpDef {
        name: "zero_vec",
        nb_oargs: 1,
        nb_iargs: 0,
        nb_cargs: 0,
        flags: VC,
    },
    // ZeroUpperVec
    OpDef {
        name: "zero_upper_vec",
        nb_oargs: 1,
        nb_iargs: 1,
        nb_cargs: 0,
        flags: VC,
    },
    // ExtractVec
    OpDef {
        name: "extract_vec",
        nb_oargs: 1,
        nb_iargs: 1,
        nb_cargs: 1,
        flags: VC,
    },
    // AndVec
    OpDef {
        name: "and_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: VC,
    },
    // NotVec
    OpDef {
        name: "not_vec",
        nb_oargs: 1,
        nb_iargs: 1,
        nb_cargs: 0,
        flags: VC,
    },
    // CmpVec
    OpDef {
        name: "cmp_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 1,
        flags: VC,
    },
    // SshlVec
    OpDef {
        name: "sshl_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: VC,
    },
    // UshlVec
    OpDef {
        name: "ushl_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: VC,
    },
    // FCmpVec
    OpDef {
        name: "fcmp_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 1,
        flags: f(VC, FP),
    },
    // FAbsVec
    OpDef {
        name: "fabs_vec",
        nb_oargs: 1,
        nb_iargs: 1,
        nb_cargs: 0,
        flags: f(VC, FP),
    },
    // FAbdVec
    OpDef {
        name: "fabd_vec",
        nb_oargs: 1,
        nb_iargs: 2,
        nb_cargs: 0,
        flags: f(VC, FP),
    },
];

impl Opcode {
    /// Look up the static definition for this opcode.
    pub fn def(self) -> &'static OpDef {
        &OPCODE_DEFS[self as usize]
    }

    /// Whether this opcode is type-polymorphic (works on I32 or I64).
    pub fn is_int_polymorphic(self) -> bool {
        self.def().flags.contains(OpFlags::INT)
    }
}
