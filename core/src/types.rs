/// IR value types.
///
/// Represents the width of IR operands. Integer types (I32/I64) carry
/// scalar values; V128 carries a full SIMD register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
    I32 = 0,
    I64 = 1,
    V128 = 2,
}

pub const TYPE_COUNT: usize = 3;

impl Type {
    pub const fn size_bits(self) -> u32 {
        match self {
            Type::I32 => 32,
            Type::I64 => 64,
            Type::V128 => 128,
        }
    }

    /// Smallest scalar type able to hold `bits` bits.
    pub const fn scalar_for(bits: u32) -> Type {
        if bits <= 32 {
            Type::I32
        } else {
            Type::I64
        }
    }
}

/// Vector lane size, encoded like QEMU's `vece` (`8 << vece` bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VecElem {
    B8 = 0,
    B16 = 1,
    B32 = 2,
    B64 = 3,
}

impl VecElem {
    pub const fn bits(self) -> u32 {
        8 << self as u32
    }

    /// All-ones mask covering one lane.
    pub const fn mask(self) -> u128 {
        (1u128 << self.bits()) - 1
    }

    pub const fn lanes(self, ty: Type) -> u32 {
        ty.size_bits() / self.bits()
    }
}

/// Integer comparison conditions for `cmp_vec`.
///
/// Encoding matches QEMU's `TCGCond`. Signed and unsigned relations
/// are distinct conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cond {
    Eq = 8,
    Ne = 9,
    // Signed
    Lt = 10,
    Ge = 11,
    Le = 12,
    Gt = 13,
    // Unsigned
    Ltu = 14,
    Geu = 15,
    Leu = 16,
    Gtu = 17,
}

impl Cond {
    pub const fn from_raw(raw: u32) -> Option<Cond> {
        match raw {
            8 => Some(Cond::Eq),
            9 => Some(Cond::Ne),
            10 => Some(Cond::Lt),
            11 => Some(Cond::Ge),
            12 => Some(Cond::Le),
            13 => Some(Cond::Gt),
            14 => Some(Cond::Ltu),
            15 => Some(Cond::Geu),
            16 => Some(Cond::Leu),
            17 => Some(Cond::Gtu),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Cond::Eq => "eq",
            Cond::Ne => "ne",
            Cond::Lt => "lt",
            Cond::Ge => "ge",
            Cond::Le => "le",
            Cond::Gt => "gt",
            Cond::Ltu => "ltu",
            Cond::Geu => "geu",
            Cond::Leu => "leu",
            Cond::Gtu => "gtu",
        }
    }
}

/// Floating-point comparison conditions for `fcmp_vec`.
///
/// Ordered comparisons: any NaN operand yields false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FpCond {
    Eq = 0,
    Ge = 1,
    Gt = 2,
}

impl FpCond {
    pub const fn from_raw(raw: u32) -> Option<FpCond> {
        match raw {
            0 => Some(FpCond::Eq),
            1 => Some(FpCond::Ge),
            2 => Some(FpCond::Gt),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FpCond::Eq => "feq",
            FpCond::Ge => "fge",
            FpCond::Gt => "fgt",
        }
    }
}
