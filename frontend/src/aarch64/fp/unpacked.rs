use super::{FpCr, FpExc, FpFormat, RoundingMode};

/// Bit position of the leading one in a normalised unpacked mantissa.
pub const MANTISSA_MSB: u32 = 62;

/// FPType of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpClass {
    Zero,
    Subnormal,
    Normal,
    Infinite,
    QNaN,
    SNaN,
}

impl FpClass {
    pub const fn is_nan(self) -> bool {
        matches!(self, FpClass::QNaN | FpClass::SNaN)
    }

    /// Zero, subnormal or normal.
    pub const fn is_finite(self) -> bool {
        matches!(self, FpClass::Zero | FpClass::Subnormal | FpClass::Normal)
    }
}

/// A decomposed floating-point value.
///
/// For finite non-zero values the magnitude is
/// `mantissa * 2^(exponent - 62)` with the leading one of `mantissa`
/// at bit 62, so `exponent` is the unbiased exponent of the value.
/// Bits below the target precision carry guard/sticky information.
/// Zeros, infinities and NaNs only use `sign` and `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpUnpacked {
    pub sign: bool,
    pub class: FpClass,
    pub exponent: i32,
    pub mantissa: u64,
}

impl FpUnpacked {
    pub const fn zero(sign: bool) -> Self {
        Self {
            sign,
            class: FpClass::Zero,
            exponent: 0,
            mantissa: 0,
        }
    }

    /// A finite value `mantissa * 2^(exponent - 62)`; the mantissa is
    /// renormalised so its leading one sits at bit 62.
    pub fn finite(sign: bool, exponent: i32, mantissa: u64) -> Self {
        if mantissa == 0 {
            return Self::zero(sign);
        }
        let lz = mantissa.leading_zeros() as i32;
        let shift = lz - (63 - MANTISSA_MSB as i32);
        let (exponent, mantissa) = if shift >= 0 {
            (exponent - shift, mantissa << shift)
        } else {
            // Only bit 63 can be above the target position.
            (exponent + 1, (mantissa >> 1) | (mantissa & 1))
        };
        Self {
            sign,
            class: FpClass::Normal,
            exponent,
            mantissa,
        }
    }
}

/// FPUnpack: decompose `bits` of format `fmt`.
///
/// With FPCR.FZ set, subnormal inputs are treated as zero and raise
/// IDC.
pub fn unpack(fmt: FpFormat, bits: u64, fpcr: FpCr, exc: &mut FpExc) -> FpUnpacked {
    let sign = bits & fmt.sign_bit() != 0;
    let exp = (bits >> fmt.frac_bits) & fmt.exp_max();
    let frac = bits & fmt.frac_mask();

    let special = |class| FpUnpacked {
        sign,
        class,
        exponent: 0,
        mantissa: frac,
    };

    if exp == 0 {
        if frac == 0 {
            return FpUnpacked::zero(sign);
        }
        if fpcr.fz() {
            exc.insert(FpExc::IDC);
            return FpUnpacked::zero(sign);
        }
        let lz = frac.leading_zeros() as i32;
        let exponent = 64 - lz - fmt.bias() - fmt.frac_bits as i32;
        return FpUnpacked {
            sign,
            class: FpClass::Subnormal,
            exponent,
            mantissa: frac << (lz - 1),
        };
    }

    if exp == fmt.exp_max() {
        return if frac == 0 {
            special(FpClass::Infinite)
        } else if frac & fmt.quiet_bit() != 0 {
            special(FpClass::QNaN)
        } else {
            special(FpClass::SNaN)
        };
    }

    FpUnpacked {
        sign,
        class: FpClass::Normal,
        exponent: exp as i32 - fmt.bias(),
        mantissa: ((1 << fmt.frac_bits) | frac) << (MANTISSA_MSB - fmt.frac_bits),
    }
}

/// FPRound: round a finite non-zero value once to `fmt`.
///
/// Tininess is detected before rounding. Underflow is only signalled
/// for inexact tiny results; with FPCR.FZ a tiny result becomes a
/// signed zero and raises UFC alone. Overflow produces infinity or the
/// largest normal depending on the rounding mode and raises OFC and
/// IXC.
pub fn round(fmt: FpFormat, value: FpUnpacked, fpcr: FpCr, exc: &mut FpExc) -> u64 {
    debug_assert!(value.mantissa >> MANTISSA_MSB == 1);

    let sign = value.sign;
    let min_exp = fmt.min_exp();
    let frac_bits = fmt.frac_bits as i32;

    if value.exponent < min_exp && fpcr.fz() {
        exc.insert(FpExc::UFC);
        return fmt.zero(sign);
    }

    // Right shift that leaves `int_mant` in units of the target's
    // last place.
    let (mut biased_exp, shift) = if value.exponent < min_exp {
        (0u64, MANTISSA_MSB as i32 - frac_bits + (min_exp - value.exponent))
    } else {
        (
            (value.exponent - min_exp + 1) as u64,
            MANTISSA_MSB as i32 - frac_bits,
        )
    };

    let m = value.mantissa;
    let (mut int_mant, round_bit, sticky) = if shift >= 64 {
        (0u64, false, m != 0)
    } else {
        let half = 1u64 << (shift - 1);
        (m >> shift, m & half != 0, m & (half - 1) != 0)
    };
    let inexact = round_bit || sticky;

    if biased_exp == 0 && inexact {
        exc.insert(FpExc::UFC);
    }

    let round_up = match fpcr.rounding_mode() {
        RoundingMode::TieEven => round_bit && (sticky || int_mant & 1 != 0),
        RoundingMode::PlusInfinity => inexact && !sign,
        RoundingMode::MinusInfinity => inexact && sign,
        RoundingMode::TowardZero => false,
    };

    if round_up {
        int_mant += 1;
        if int_mant == 1 << fmt.frac_bits {
            // Subnormal rounded up into the smallest normal.
            biased_exp = 1;
        }
        if int_mant == 1 << (fmt.frac_bits + 1) {
            biased_exp += 1;
            int_mant >>= 1;
        }
    }

    if biased_exp >= fmt.exp_max() {
        let to_inf = match fpcr.rounding_mode() {
            RoundingMode::TieEven => true,
            RoundingMode::PlusInfinity => !sign,
            RoundingMode::MinusInfinity => sign,
            RoundingMode::TowardZero => false,
        };
        exc.insert(FpExc::OFC | FpExc::IXC);
        return if to_inf {
            fmt.infinity(sign)
        } else {
            fmt.max_normal(sign)
        };
    }

    if inexact {
        exc.insert(FpExc::IXC);
    }

    fmt.zero(sign) | (biased_exp << fmt.frac_bits) | (int_mant & fmt.frac_mask())
}
