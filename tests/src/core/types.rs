use a64tcg_core::types::*;

#[test]
fn type_sizes() {
    assert_eq!(Type::I32.size_bits(), 32);
    assert_eq!(Type::I64.size_bits(), 64);
    assert_eq!(Type::V128.size_bits(), 128);
}

#[test]
fn scalar_for_width() {
    assert_eq!(Type::scalar_for(8), Type::I32);
    assert_eq!(Type::scalar_for(32), Type::I32);
    assert_eq!(Type::scalar_for(64), Type::I64);
}

#[test]
fn vece_sizes() {
    assert_eq!(VecElem::B8.bits(), 8);
    assert_eq!(VecElem::B16.bits(), 16);
    assert_eq!(VecElem::B32.bits(), 32);
    assert_eq!(VecElem::B64.bits(), 64);

    assert_eq!(VecElem::B64.lanes(Type::V128), 2);
    assert_eq!(VecElem::B8.lanes(Type::V128), 16);
    assert_eq!(VecElem::B32.mask(), 0xffff_ffff);
    assert_eq!(VecElem::B64.mask(), u64::MAX as u128);
}

const ALL_CONDS: [Cond; 10] = [
    Cond::Eq,
    Cond::Ne,
    Cond::Lt,
    Cond::Ge,
    Cond::Le,
    Cond::Gt,
    Cond::Ltu,
    Cond::Geu,
    Cond::Leu,
    Cond::Gtu,
];

#[test]
fn cond_raw_roundtrip() {
    for c in ALL_CONDS {
        assert_eq!(Cond::from_raw(c as u32), Some(c));
    }
    assert_eq!(Cond::from_raw(0), None);
    assert_eq!(Cond::from_raw(18), None);
}

#[test]
fn cond_names_distinguish_signedness() {
    assert_eq!(Cond::Gt.name(), "gt");
    assert_eq!(Cond::Gtu.name(), "gtu");
    assert_eq!(Cond::Ge.name(), "ge");
    assert_eq!(Cond::Geu.name(), "geu");
}

#[test]
fn fp_cond_names() {
    assert_eq!(FpCond::Eq.name(), "feq");
    assert_eq!(FpCond::Ge.name(), "fge");
    assert_eq!(FpCond::Gt.name(), "fgt");
    assert_eq!(FpCond::from_raw(2), Some(FpCond::Gt));
    assert_eq!(FpCond::from_raw(3), None);
}
