//! Built-in instruction set.
//!
//! These are the instructions the compiler emits for expressions, control
//! flow and variable access. They live in the core region of each segment;
//! extensions never see these ranges.

mod flow;
mod globals;
mod locals;
mod math;
mod message;
mod stack;

use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::compiler::instruction_table::InstructionTable;
use crate::error::ConfigError;
use crate::vm::dispatch::DispatchBuilder;
use crate::vm::handler::Handler;
use crate::vm::opcode::Opcode;
use crate::vm::segment::Segment;

use self::locals::LocalKind;
use self::math::{ArithOp, Comparison};

const GROUP: &str = "core";

/// Every built-in instruction. Segment 5 codes follow declaration order, so
/// new entries go at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum CoreOp {
    // segment 0
    PushInt,
    JumpForward,
    JumpBackward,
    // segment 3
    MessageBox,
    // segment 5
    StoreLocalShort,
    StoreLocalLong,
    StoreLocalFloat,
    FetchLocalShort,
    FetchLocalLong,
    FetchLocalFloat,
    AddInt,
    SubInt,
    MulInt,
    DivInt,
    AddFloat,
    SubFloat,
    MulFloat,
    DivFloat,
    IntToFloat,
    FloatToInt,
    NegateInt,
    NegateFloat,
    Return,
    SkipOnZero,
    SkipOnNonZero,
    EqualInt,
    NonEqualInt,
    LessInt,
    LessOrEqualInt,
    GreaterInt,
    GreaterOrEqualInt,
    EqualFloat,
    NonEqualFloat,
    LessFloat,
    LessOrEqualFloat,
    GreaterFloat,
    GreaterOrEqualFloat,
    FetchIntLiteral,
    FetchFloatLiteral,
    StoreGlobal,
    FetchGlobal,
    Pop,
}

impl CoreOp {
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    pub fn opcode(self) -> Opcode {
        match self {
            CoreOp::PushInt => Opcode::new(Segment::Zero, 0),
            CoreOp::JumpForward => Opcode::new(Segment::Zero, 1),
            CoreOp::JumpBackward => Opcode::new(Segment::Zero, 2),
            CoreOp::MessageBox => Opcode::new(Segment::Three, 0),
            op => Opcode::new(Segment::Five, op as u32 - CoreOp::StoreLocalShort as u32),
        }
    }

    /// What the compiler parses after the keyword. Most core instructions are
    /// emitted by the compiler itself and take nothing from the source.
    pub fn signature(self) -> &'static str {
        match self {
            CoreOp::MessageBox => "S/SSSSSSSSS",
            _ => "",
        }
    }

    fn handler(self) -> Handler {
        use CoreOp::*;

        match self {
            PushInt => Handler::unary(flow::PushInt),
            JumpForward => Handler::unary(flow::Jump { forward: true }),
            JumpBackward => Handler::unary(flow::Jump { forward: false }),
            MessageBox => Handler::unary(message::MessageBox),

            StoreLocalShort => Handler::nullary(locals::StoreLocal(LocalKind::Short)),
            StoreLocalLong => Handler::nullary(locals::StoreLocal(LocalKind::Long)),
            StoreLocalFloat => Handler::nullary(locals::StoreLocal(LocalKind::Float)),
            FetchLocalShort => Handler::nullary(locals::FetchLocal(LocalKind::Short)),
            FetchLocalLong => Handler::nullary(locals::FetchLocal(LocalKind::Long)),
            FetchLocalFloat => Handler::nullary(locals::FetchLocal(LocalKind::Float)),

            AddInt => Handler::nullary(math::IntArith(ArithOp::Add)),
            SubInt => Handler::nullary(math::IntArith(ArithOp::Sub)),
            MulInt => Handler::nullary(math::IntArith(ArithOp::Mul)),
            DivInt => Handler::nullary(math::IntArith(ArithOp::Div)),
            AddFloat => Handler::nullary(math::FloatArith(ArithOp::Add)),
            SubFloat => Handler::nullary(math::FloatArith(ArithOp::Sub)),
            MulFloat => Handler::nullary(math::FloatArith(ArithOp::Mul)),
            DivFloat => Handler::nullary(math::FloatArith(ArithOp::Div)),

            IntToFloat => Handler::nullary(stack::IntToFloat),
            FloatToInt => Handler::nullary(stack::FloatToInt),
            NegateInt => Handler::nullary(stack::Negate { float: false }),
            NegateFloat => Handler::nullary(stack::Negate { float: true }),

            Return => Handler::nullary(flow::Return),
            SkipOnZero => Handler::nullary(flow::Skip { on_zero: true }),
            SkipOnNonZero => Handler::nullary(flow::Skip { on_zero: false }),

            EqualInt => Handler::nullary(math::IntCompare(Comparison::Equal)),
            NonEqualInt => Handler::nullary(math::IntCompare(Comparison::NonEqual)),
            LessInt => Handler::nullary(math::IntCompare(Comparison::Less)),
            LessOrEqualInt => Handler::nullary(math::IntCompare(Comparison::LessOrEqual)),
            GreaterInt => Handler::nullary(math::IntCompare(Comparison::Greater)),
            GreaterOrEqualInt => Handler::nullary(math::IntCompare(Comparison::GreaterOrEqual)),
            EqualFloat => Handler::nullary(math::FloatCompare(Comparison::Equal)),
            NonEqualFloat => Handler::nullary(math::FloatCompare(Comparison::NonEqual)),
            LessFloat => Handler::nullary(math::FloatCompare(Comparison::Less)),
            LessOrEqualFloat => Handler::nullary(math::FloatCompare(Comparison::LessOrEqual)),
            GreaterFloat => Handler::nullary(math::FloatCompare(Comparison::Greater)),
            GreaterOrEqualFloat => Handler::nullary(math::FloatCompare(Comparison::GreaterOrEqual)),

            FetchIntLiteral => Handler::nullary(stack::FetchLiteral { float: false }),
            FetchFloatLiteral => Handler::nullary(stack::FetchLiteral { float: true }),
            StoreGlobal => Handler::nullary(globals::StoreGlobal),
            FetchGlobal => Handler::nullary(globals::FetchGlobal),
            Pop => Handler::nullary(stack::Pop),
        }
    }
}

/// Reserve the core ranges and register every built-in mnemonic.
pub fn register_instructions(table: &mut InstructionTable) -> Result<(), ConfigError> {
    for segment in [Segment::Zero, Segment::Three, Segment::Five] {
        let count = CoreOp::iter().filter(|op| op.opcode().segment == segment).count();
        table.reserve_core(GROUP, segment, 0, count as u32)?;
    }

    for op in CoreOp::iter() {
        table.register_instruction(op.mnemonic(), op.signature(), op.opcode())?;
    }
    Ok(())
}

pub fn install_opcodes(builder: &mut DispatchBuilder) -> Result<(), ConfigError> {
    for op in CoreOp::iter() {
        builder.install(op.opcode(), op.handler())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mnemonics_are_lowercase_names() {
        assert_eq!(CoreOp::SkipOnNonZero.mnemonic(), "skiponnonzero");
        assert_eq!(CoreOp::FetchIntLiteral.mnemonic(), "fetchintliteral");
    }

    #[test]
    fn segment_five_codes_are_dense() {
        let codes: Vec<u32> = CoreOp::iter()
            .map(CoreOp::opcode)
            .filter(|op| op.segment == Segment::Five)
            .map(|op| op.code)
            .collect();
        assert_eq!(codes, (0..CoreOp::COUNT as u32 - 4).collect::<Vec<_>>());
    }

    #[test]
    fn registered_and_installed_sets_agree() {
        let mut table = InstructionTable::new();
        register_instructions(&mut table).unwrap();
        let mut builder = DispatchBuilder::new();
        install_opcodes(&mut builder).unwrap();

        let mut installed: Vec<Opcode> = builder.opcodes().collect();
        installed.sort();
        let registered: Vec<Opcode> = table.opcodes().collect();
        assert_eq!(installed, registered);
        assert_eq!(registered.len(), CoreOp::COUNT);
    }

    #[test]
    fn core_ranges_block_nothing_in_the_extension_region() {
        let mut table = InstructionTable::new();
        register_instructions(&mut table).unwrap();
        table.reserve("ext", Segment::Five, 0x200_0000, 0x10).unwrap();
        table.reserve("ext3", Segment::Three, 0x20000, 0x10).unwrap();
    }
}
