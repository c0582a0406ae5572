//! AArch64 feature configuration.
//!
//! Provides a per-CPU configuration struct (`A64Cfg`) in the spirit of
//! QEMU's `ARMISARegisters` feature tests, reduced to the features
//! this frontend gates on. All profiles are `const`.

// ── Feature configuration ────────────────────────────────────────

/// Per-CPU AArch64 feature configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct A64Cfg {
    /// Scalar floating point (FEAT_FP).
    pub ext_fp: bool,
    /// Advanced SIMD (FEAT_AdvSIMD).
    pub ext_advsimd: bool,
    /// Maximum guest instructions per block.
    pub max_insns: u32,
}

// ── Predefined profiles ──────────────────────────────────────────

impl A64Cfg {
    /// Plain Armv8.0-A application profile: FP and AdvSIMD present.
    pub const ARMV8A: Self = Self {
        ext_fp: true,
        ext_advsimd: true,
        max_insns: 512,
    };

    /// A core built without FP/SIMD; every translator here is
    /// rejected.
    pub const INTEGER_ONLY: Self = Self {
        ext_fp: false,
        ext_advsimd: false,
        max_insns: 512,
    };

    /// SIMD integer forms need AdvSIMD.
    #[inline]
    pub const fn has_simd_int(&self) -> bool {
        self.ext_advsimd
    }

    /// SIMD floating-point forms need both FP and AdvSIMD.
    #[inline]
    pub const fn has_simd_fp(&self) -> bool {
        self.ext_fp && self.ext_advsimd
    }

    /// Scalar FP data processing needs FP.
    #[inline]
    pub const fn has_fp(&self) -> bool {
        self.ext_fp
    }

    pub const fn with_max_insns(self, max_insns: u32) -> Self {
        Self { max_insns, ..self }
    }
}

impl Default for A64Cfg {
    fn default() -> Self {
        Self::ARMV8A
    }
}
