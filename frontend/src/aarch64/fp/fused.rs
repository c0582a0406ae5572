use super::unpacked::{round, unpack, FpClass, FpUnpacked, MANTISSA_MSB};
use super::{FpCr, FpExc, FpFormat, RoundingMode};

/// Leading-one position of both aligned operands inside the 128-bit
/// accumulator. Leaves two bits of headroom for the carry of an add.
const ACC_MSB: u32 = 125;

/// Logical right shift that ORs every shifted-out bit into bit 0.
fn shift_right_jam(x: u128, n: u32) -> u128 {
    match n {
        0 => x,
        1..=127 => (x >> n) | (x & ((1u128 << n) - 1) != 0) as u128,
        _ => (x != 0) as u128,
    }
}

/// `addend + op1 * op2` for finite operands, exact up to a sticky bit.
///
/// The product is formed exactly in 128 bits, both terms are aligned
/// with the smaller one jammed, and the sum is normalised once. No
/// rounding to a target format happens here. An exact zero sum is
/// returned as a zero with a positive sign; the caller picks the sign
/// from the rounding mode.
pub fn fused_mul_add(addend: FpUnpacked, op1: FpUnpacked, op2: FpUnpacked) -> FpUnpacked {
    debug_assert!(addend.class.is_finite() && op1.class.is_finite() && op2.class.is_finite());

    let product_zero = op1.class == FpClass::Zero || op2.class == FpClass::Zero;
    let addend_zero = addend.class == FpClass::Zero;

    let sign_p = op1.sign ^ op2.sign;

    // (sign, leading exponent, accumulator) with the leading one at ACC_MSB.
    let product = if product_zero {
        None
    } else {
        let mut p = op1.mantissa as u128 * op2.mantissa as u128;
        // Leading one of two [2^62, 2^63) mantissas lands on bit 124 or 125.
        let mut exp = op1.exponent + op2.exponent + 1;
        if p >> ACC_MSB == 0 {
            p <<= 1;
            exp -= 1;
        }
        Some((sign_p, exp, p))
    };
    let addend_term = if addend_zero {
        None
    } else {
        let a = (addend.mantissa as u128) << (ACC_MSB - MANTISSA_MSB);
        Some((addend.sign, addend.exponent, a))
    };

    let (sign, exp, acc) = match (product, addend_term) {
        (None, None) => return FpUnpacked::zero(false),
        (Some(t), None) | (None, Some(t)) => t,
        (Some(p), Some(a)) => {
            let (big, small) = if p.1 >= a.1 { (p, a) } else { (a, p) };
            let small_acc = shift_right_jam(small.2, (big.1 - small.1) as u32);
            if big.0 == small.0 {
                (big.0, big.1, big.2 + small_acc)
            } else if big.2 > small_acc {
                (big.0, big.1, big.2 - small_acc)
            } else if big.2 < small_acc {
                (small.0, big.1, small_acc - big.2)
            } else {
                return FpUnpacked::zero(false);
            }
        }
    };

    // Collapse to a u64 with the leading one at MANTISSA_MSB.
    let msb = 127 - acc.leading_zeros() as i32;
    let shift = msb - MANTISSA_MSB as i32;
    let mantissa = if shift >= 0 {
        shift_right_jam(acc, shift as u32) as u64
    } else {
        (acc << (-shift) as u32) as u64
    };
    let exponent = exp - (ACC_MSB - MANTISSA_MSB) as i32 + shift;

    FpUnpacked {
        sign,
        class: FpClass::Normal,
        exponent,
        mantissa,
    }
}

/// FPProcessNaN: quieten a signalling NaN, honour FPCR.DN.
fn process_nan(fmt: FpFormat, class: FpClass, bits: u64, fpcr: FpCr, exc: &mut FpExc) -> u64 {
    let result = if class == FpClass::SNaN {
        exc.insert(FpExc::IOC);
        bits | fmt.quiet_bit()
    } else {
        bits
    };
    if fpcr.dn() {
        fmt.default_nan()
    } else {
        result
    }
}

/// FPMulAdd: `addend + op1 * op2` with a single rounding.
///
/// NaN operands are selected signalling-first, each tier in the order
/// addend, op1, op2. A quiet-NaN addend still yields the default NaN
/// when the product is infinity times zero.
pub fn fp_mul_add(
    fmt: FpFormat,
    addend: u64,
    op1: u64,
    op2: u64,
    fpcr: FpCr,
    exc: &mut FpExc,
) -> u64 {
    let ua = unpack(fmt, addend, fpcr, exc);
    let u1 = unpack(fmt, op1, fpcr, exc);
    let u2 = unpack(fmt, op2, fpcr, exc);

    let inf1 = u1.class == FpClass::Infinite;
    let inf2 = u2.class == FpClass::Infinite;
    let zero1 = u1.class == FpClass::Zero;
    let zero2 = u2.class == FpClass::Zero;
    let inf_times_zero = (inf1 && zero2) || (zero1 && inf2);

    let operands = [(ua.class, addend), (u1.class, op1), (u2.class, op2)];
    let nan = operands
        .iter()
        .find(|(class, _)| *class == FpClass::SNaN)
        .or_else(|| operands.iter().find(|(class, _)| *class == FpClass::QNaN));
    if let Some(&(class, bits)) = nan {
        let result = process_nan(fmt, class, bits, fpcr, exc);
        if ua.class == FpClass::QNaN && inf_times_zero {
            exc.insert(FpExc::IOC);
            return fmt.default_nan();
        }
        return result;
    }

    let inf_a = ua.class == FpClass::Infinite;
    let zero_a = ua.class == FpClass::Zero;
    let sign_p = u1.sign ^ u2.sign;
    let inf_p = inf1 || inf2;
    let zero_p = zero1 || zero2;

    if inf_times_zero || (inf_a && inf_p && ua.sign != sign_p) {
        exc.insert(FpExc::IOC);
        return fmt.default_nan();
    }
    if inf_a {
        return fmt.infinity(ua.sign);
    }
    if inf_p {
        return fmt.infinity(sign_p);
    }
    if zero_a && zero_p && ua.sign == sign_p {
        return fmt.zero(ua.sign);
    }

    let sum = fused_mul_add(ua, u1, u2);
    if sum.class == FpClass::Zero {
        return fmt.zero(fpcr.rounding_mode() == RoundingMode::MinusInfinity);
    }
    round(fmt, sum, fpcr, exc)
}
