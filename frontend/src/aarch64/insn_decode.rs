//! A64 decoder in decodetree-generated form.
//!
//! Covers AdvSIMD scalar three-same, AdvSIMD scalar two-reg-misc
//! compare-against-zero, and FP data-processing (3 source). Patterns
//! are tried in table order; the first match calls its `trans_*`
//! method and its return value is the decode result.

// Field layout:
//   Rd    [4:0]     Rn    [9:5]     Rm    [20:16]
//   Ra    [14:10]   size  [23:22]   sz    [22]     ftype [23:22]

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgsRrrE {
    pub rd: i64,
    pub rn: i64,
    pub rm: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgsRrE {
    pub rd: i64,
    pub rn: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgsRrrSz {
    pub rd: i64,
    pub rn: i64,
    pub rm: i64,
    pub sz: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgsRrrrFtype {
    pub rd: i64,
    pub rn: i64,
    pub rm: i64,
    pub ra: i64,
    pub ftype: i64,
}

fn extract_rd(insn: u32) -> i64 {
    let val = insn & 0x1f;
    val as i64
}

fn extract_rn(insn: u32) -> i64 {
    let val = (insn >> 5) & 0x1f;
    val as i64
}

fn extract_rm(insn: u32) -> i64 {
    let val = (insn >> 16) & 0x1f;
    val as i64
}

fn extract_ra(insn: u32) -> i64 {
    let val = (insn >> 10) & 0x1f;
    val as i64
}

fn extract_size(insn: u32) -> i64 {
    let val = (insn >> 22) & 0x3;
    val as i64
}

fn extract_sz(insn: u32) -> i64 {
    let val = (insn >> 22) & 0x1;
    val as i64
}

fn args_rrr_e(insn: u32) -> ArgsRrrE {
    ArgsRrrE {
        rd: extract_rd(insn),
        rn: extract_rn(insn),
        rm: extract_rm(insn),
        size: extract_size(insn),
    }
}

fn args_rr_e(insn: u32) -> ArgsRrE {
    ArgsRrE {
        rd: extract_rd(insn),
        rn: extract_rn(insn),
        size: extract_size(insn),
    }
}

fn args_rrr_sz(insn: u32) -> ArgsRrrSz {
    ArgsRrrSz {
        rd: extract_rd(insn),
        rn: extract_rn(insn),
        rm: extract_rm(insn),
        sz: extract_sz(insn),
    }
}

fn args_rrrr_ftype(insn: u32) -> ArgsRrrrFtype {
    ArgsRrrrFtype {
        rd: extract_rd(insn),
        rn: extract_rn(insn),
        rm: extract_rm(insn),
        ra: extract_ra(insn),
        ftype: extract_size(insn),
    }
}

pub trait Decode<Ir> {
    fn trans_cmgt_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_cmhi(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_cmge_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_cmhs(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_sshl(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_ushl(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_add(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_sub(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_cmtst(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_cmeq_reg(&mut self, ir: &mut Ir, a: &ArgsRrrE) -> bool;
    fn trans_fabd(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_fcmeq_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_fcmge_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_fcmgt_reg(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_facge(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_facgt(&mut self, ir: &mut Ir, a: &ArgsRrrSz) -> bool;
    fn trans_cmgt_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool;
    fn trans_cmge_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool;
    fn trans_cmeq_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool;
    fn trans_cmle_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool;
    fn trans_cmlt_zero(&mut self, ir: &mut Ir, a: &ArgsRrE) -> bool;
    fn trans_fmadd(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool;
    fn trans_fmsub(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool;
    fn trans_fnmadd(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool;
    fn trans_fnmsub(&mut self, ir: &mut Ir, a: &ArgsRrrrFtype) -> bool;
}

/// One row of the pattern table: `(name, fixedmask, fixedbits)`.
pub type Pattern = (&'static str, u32, u32);

/// Pattern table in decode order.
pub static PATTERNS: [Pattern; 25] = [
    ("CMGT_reg", 0xff20fc00, 0x5e203400),
    ("CMHI", 0xff20fc00, 0x7e203400),
    ("CMGE_reg", 0xff20fc00, 0x5e203c00),
    ("CMHS", 0xff20fc00, 0x7e203c00),
    ("SSHL", 0xff20fc00, 0x5e204400),
    ("USHL", 0xff20fc00, 0x7e204400),
    ("ADD", 0xff20fc00, 0x5e208400),
    ("SUB", 0xff20fc00, 0x7e208400),
    ("CMTST", 0xff20fc00, 0x5e208c00),
    ("CMEQ_reg", 0xff20fc00, 0x7e208c00),
    ("FABD", 0xffa0fc00, 0x7ea0d400),
    ("FCMEQ_reg", 0xffa0fc00, 0x5e20e400),
    ("FCMGE_reg", 0xffa0fc00, 0x7e20e400),
    ("FCMGT_reg", 0xffa0fc00, 0x7ea0e400),
    ("FACGE", 0xffa0fc00, 0x7e20ec00),
    ("FACGT", 0xffa0fc00, 0x7ea0ec00),
    ("CMGT_zero", 0xff3ffc00, 0x5e208800),
    ("CMGE_zero", 0xff3ffc00, 0x7e208800),
    ("CMEQ_zero", 0xff3ffc00, 0x5e209800),
    ("CMLE_zero", 0xff3ffc00, 0x7e209800),
    ("CMLT_zero", 0xff3ffc00, 0x5e20a800),
    ("FMADD", 0xff208000, 0x1f000000),
    ("FMSUB", 0xff208000, 0x1f008000),
    ("FNMADD", 0xff208000, 0x1f200000),
    ("FNMSUB", 0xff208000, 0x1f208000),
];

/// Name of the first pattern matching `insn`, if any.
pub fn mnemonic(insn: u32) -> Option<&'static str> {
    PATTERNS
        .iter()
        .find(|&&(_, mask, bits)| insn & mask == bits)
        .map(|&(name, _, _)| name)
}

pub fn decode<Ir, T: Decode<Ir>>(ctx: &mut T, ir: &mut Ir, insn: u32) -> bool {
    if insn & 0xff20fc00 == 0x5e203400 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmgt_reg(ir, &a);
    }
    if insn & 0xff20fc00 == 0x7e203400 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmhi(ir, &a);
    }
    if insn & 0xff20fc00 == 0x5e203c00 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmge_reg(ir, &a);
    }
    if insn & 0xff20fc00 == 0x7e203c00 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmhs(ir, &a);
    }
    if insn & 0xff20fc00 == 0x5e204400 {
        let a = args_rrr_e(insn);
        return ctx.trans_sshl(ir, &a);
    }
    if insn & 0xff20fc00 == 0x7e204400 {
        let a = args_rrr_e(insn);
        return ctx.trans_ushl(ir, &a);
    }
    if insn & 0xff20fc00 == 0x5e208400 {
        let a = args_rrr_e(insn);
        return ctx.trans_add(ir, &a);
    }
    if insn & 0xff20fc00 == 0x7e208400 {
        let a = args_rrr_e(insn);
        return ctx.trans_sub(ir, &a);
    }
    if insn & 0xff20fc00 == 0x5e208c00 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmtst(ir, &a);
    }
    if insn & 0xff20fc00 == 0x7e208c00 {
        let a = args_rrr_e(insn);
        return ctx.trans_cmeq_reg(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x7ea0d400 {
        let a = args_rrr_sz(insn);
        return ctx.trans_fabd(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x5e20e400 {
        let a = args_rrr_sz(insn);
        return ctx.trans_fcmeq_reg(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x7e20e400 {
        let a = args_rrr_sz(insn);
        return ctx.trans_fcmge_reg(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x7ea0e400 {
        let a = args_rrr_sz(insn);
        return ctx.trans_fcmgt_reg(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x7e20ec00 {
        let a = args_rrr_sz(insn);
        return ctx.trans_facge(ir, &a);
    }
    if insn & 0xffa0fc00 == 0x7ea0ec00 {
        let a = args_rrr_sz(insn);
        return ctx.trans_facgt(ir, &a);
    }
    if insn & 0xff3ffc00 == 0x5e208800 {
        let a = args_rr_e(insn);
        return ctx.trans_cmgt_zero(ir, &a);
    }
    if insn & 0xff3ffc00 == 0x7e208800 {
        let a = args_rr_e(insn);
        return ctx.trans_cmge_zero(ir, &a);
    }
    if insn & 0xff3ffc00 == 0x5e209800 {
        let a = args_rr_e(insn);
        return ctx.trans_cmeq_zero(ir, &a);
    }
    if insn & 0xff3ffc00 == 0x7e209800 {
        let a = args_rr_e(insn);
        return ctx.trans_cmle_zero(ir, &a);
    }
    if insn & 0xff3ffc00 == 0x5e20a800 {
        let a = args_rr_e(insn);
        return ctx.trans_cmlt_zero(ir, &a);
    }
    if insn & 0xff208000 == 0x1f000000 {
        let a = args_rrrr_ftype(insn);
        return ctx.trans_fmadd(ir, &a);
    }
    if insn & 0xff208000 == 0x1f008000 {
        let a = args_rrrr_ftype(insn);
        return ctx.trans_fmsub(ir, &a);
    }
    if insn & 0xff208000 == 0x1f200000 {
        let a = args_rrrr_ftype(insn);
        return ctx.trans_fnmadd(ir, &a);
    }
    if insn & 0xff208000 == 0x1f208000 {
        let a = args_rrrr_ftype(insn);
        return ctx.trans_fnmsub(ir, &a);
    }
    false
}
