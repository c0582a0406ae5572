//! Soft-float support for the AArch64 FP helpers.
//!
//! Values are decomposed into an unpacked form, combined exactly, and
//! rounded once to the destination format under the control of the
//! guest FPCR. Nothing here touches host floating-point state.

mod fused;
mod unpacked;

use bitflags::bitflags;

pub use fused::{fp_mul_add, fused_mul_add};
pub use unpacked::{round, unpack, FpClass, FpUnpacked, MANTISSA_MSB};

/// Binary interchange format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpFormat {
    pub exp_bits: u32,
    pub frac_bits: u32,
}

impl FpFormat {
    pub const SINGLE: Self = Self {
        exp_bits: 8,
        frac_bits: 23,
    };

    pub const DOUBLE: Self = Self {
        exp_bits: 11,
        frac_bits: 52,
    };

    pub const fn total_bits(self) -> u32 {
        1 + self.exp_bits + self.frac_bits
    }

    pub const fn bias(self) -> i32 {
        (1 << (self.exp_bits - 1)) - 1
    }

    /// Smallest unbiased exponent of a normal number.
    pub const fn min_exp(self) -> i32 {
        1 - self.bias()
    }

    /// All-ones biased exponent (infinities and NaNs).
    pub const fn exp_max(self) -> u64 {
        (1 << self.exp_bits) - 1
    }

    pub const fn frac_mask(self) -> u64 {
        (1 << self.frac_bits) - 1
    }

    pub const fn sign_bit(self) -> u64 {
        1 << (self.exp_bits + self.frac_bits)
    }

    /// Most significant fraction bit; set for quiet NaNs.
    pub const fn quiet_bit(self) -> u64 {
        1 << (self.frac_bits - 1)
    }

    pub const fn zero(self, sign: bool) -> u64 {
        if sign {
            self.sign_bit()
        } else {
            0
        }
    }

    pub const fn infinity(self, sign: bool) -> u64 {
        self.zero(sign) | (self.exp_max() << self.frac_bits)
    }

    pub const fn max_normal(self, sign: bool) -> u64 {
        self.zero(sign) | ((self.exp_max() - 1) << self.frac_bits) | self.frac_mask()
    }

    /// FPDefaultNaN: positive, quiet, zero payload.
    pub const fn default_nan(self) -> u64 {
        (self.exp_max() << self.frac_bits) | self.quiet_bit()
    }

    pub const fn neg(self, bits: u64) -> u64 {
        bits ^ self.sign_bit()
    }
}

/// FPCR.RMode rounding modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    TieEven,
    PlusInfinity,
    MinusInfinity,
    TowardZero,
}

/// Guest floating-point control register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FpCr(pub u64);

impl FpCr {
    pub const RMODE_SHIFT: u32 = 22;
    pub const FZ: u64 = 1 << 24;
    pub const DN: u64 = 1 << 25;

    pub const fn rounding_mode(self) -> RoundingMode {
        match (self.0 >> Self::RMODE_SHIFT) & 0x3 {
            0 => RoundingMode::TieEven,
            1 => RoundingMode::PlusInfinity,
            2 => RoundingMode::MinusInfinity,
            _ => RoundingMode::TowardZero,
        }
    }

    /// Flush-to-zero for subnormal inputs and tiny results.
    pub const fn fz(self) -> bool {
        self.0 & Self::FZ != 0
    }

    /// Default-NaN mode: every NaN result is the default NaN.
    pub const fn dn(self) -> bool {
        self.0 & Self::DN != 0
    }

    pub const fn with_rounding_mode(self, mode: RoundingMode) -> Self {
        let rmode = match mode {
            RoundingMode::TieEven => 0,
            RoundingMode::PlusInfinity => 1,
            RoundingMode::MinusInfinity => 2,
            RoundingMode::TowardZero => 3,
        };
        Self((self.0 & !(0x3 << Self::RMODE_SHIFT)) | (rmode << Self::RMODE_SHIFT))
    }
}

bitflags! {
    /// Cumulative exception flags, laid out as in FPSR.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FpExc: u64 {
        /// Invalid operation.
        const IOC = 1 << 0;
        /// Division by zero.
        const DZC = 1 << 1;
        const OFC = 1 << 2;
        const UFC = 1 << 3;
        /// Inexact.
        const IXC = 1 << 4;
        /// Input denormal flushed to zero.
        const IDC = 1 << 7;
    }
}
