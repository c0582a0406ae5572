//! AArch64 CPU state visible to the translated instructions.

/// Number of SIMD&FP registers (V0-V31).
pub const NUM_VREGS: usize = 32;

/// AArch64 architectural state touched by this frontend.
///
/// Layout must be `#[repr(C)]` so that IR global temps can
/// reference fields at fixed offsets from the env pointer.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A64Cpu {
    /// SIMD&FP registers V0-V31. Scalar views (Dn, Sn) are the low
    /// bits of the matching register.
    pub vregs: [u128; NUM_VREGS],
    /// Program counter.
    pub pc: u64,
    /// Floating-point control register (rounding mode, FZ, DN).
    pub fpcr: u64,
    /// Floating-point status register (cumulative exception flags).
    pub fpsr: u64,
}

// Field offsets (bytes) from the start of A64Cpu.
// Used by `IrBuilder::new_global()` to bind IR temps.

/// Byte offset of `vregs[i]`: `i * 16`.
pub const fn vreg_offset(i: usize) -> i64 {
    (i * 16) as i64
}

/// Byte offset of the `pc` field.
pub const PC_OFFSET: i64 = (NUM_VREGS * 16) as i64; // 512

/// Debug names of the V register globals.
pub const VREG_NAMES: [&str; NUM_VREGS] = [
    "v0", "v1", "v2", "v3", "v4", "v5", "v6", "v7", "v8", "v9", "v10",
    "v11", "v12", "v13", "v14", "v15", "v16", "v17", "v18", "v19", "v20",
    "v21", "v22", "v23", "v24", "v25", "v26", "v27", "v28", "v29", "v30",
    "v31",
];

impl A64Cpu {
    pub fn new() -> Self {
        Self {
            vregs: [0u128; NUM_VREGS],
            pc: 0,
            fpcr: 0,
            fpsr: 0,
        }
    }

    /// Low 64 bits of V`i` (the D register view).
    pub fn d(&self, i: usize) -> u64 {
        self.vregs[i] as u64
    }

    /// Low 32 bits of V`i` (the S register view).
    pub fn s(&self, i: usize) -> u32 {
        self.vregs[i] as u32
    }
}

impl Default for A64Cpu {
    fn default() -> Self {
        Self::new()
    }
}
