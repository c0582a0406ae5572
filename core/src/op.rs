use crate::opcode::Opcode;
use crate::temp::TempIdx;
use crate::types::{Type, VecElem};

/// Maximum number of arguments per IR operation.
pub const MAX_OP_ARGS: usize = 10;

/// Index into the Context's op list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpIdx(pub u32);

/// A single IR operation.
///
/// Maps to QEMU's `TCGOp`. Each op has an opcode, a type (for
/// polymorphic ops), the lane size for vector ops, and up to
/// `MAX_OP_ARGS` arguments laid out as outputs, inputs, constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub idx: OpIdx,
    pub opc: Opcode,
    /// Operand type for type-polymorphic ops.
    pub op_type: Type,
    /// Lane size (`vece`) for vector ops; unused otherwise.
    pub vece: Option<VecElem>,
    /// Arguments: temp indices or encoded immediates.
    pub args: [TempIdx; MAX_OP_ARGS],
    pub nargs: u8,
}

impl Op {
    pub fn new(idx: OpIdx, opc: Opcode, op_type: Type) -> Self {
        Self {
            idx,
            opc,
            op_type,
            vece: None,
            args: [TempIdx(0); MAX_OP_ARGS],
            nargs: 0,
        }
    }

    pub fn with_args(idx: OpIdx, opc: Opcode, op_type: Type, args: &[TempIdx]) -> Self {
        let mut op = Self::new(idx, opc, op_type);
        let n = args.len().min(MAX_OP_ARGS);
        op.args[..n].copy_from_slice(&args[..n]);
        op.nargs = n as u8;
        op
    }

    /// Vector variant of `with_args` carrying the lane size.
    pub fn with_vece(
        idx: OpIdx,
        opc: Opcode,
        op_type: Type,
        vece: VecElem,
        args: &[TempIdx],
    ) -> Self {
        let mut op = Self::with_args(idx, opc, op_type, args);
        op.vece = Some(vece);
        op
    }

    /// Get the output arguments slice (based on opcode definition).
    pub fn oargs(&self) -> &[TempIdx] {
        let n = self.opc.def().nb_oargs as usize;
        &self.args[..n]
    }

    /// Get the input arguments slice.
    pub fn iargs(&self) -> &[TempIdx] {
        let def = self.opc.def();
        let start = def.nb_oargs as usize;
        let end = start + def.nb_iargs as usize;
        &self.args[start..end]
    }

    /// Get the constant arguments slice.
    pub fn cargs(&self) -> &[TempIdx] {
        let def = self.opc.def();
        let start = (def.nb_oargs + def.nb_iargs) as usize;
        let end = start + def.nb_cargs as usize;
        &self.args[start..end]
    }
}
