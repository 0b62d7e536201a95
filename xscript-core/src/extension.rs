use crate::compiler::instruction_table::InstructionTable;
use crate::error::ConfigError;
use crate::vm::dispatch::DispatchBuilder;
use crate::vm::ops;

/// A group of instructions contributed to the engine.
///
/// Registration and installation are separate passes: the compiler side may
/// exist without an interpreter, but an [`crate::engine::Engine`] refuses to
/// start unless both passes agree on the opcode set.
pub trait Extension {
    fn name(&self) -> &str;

    /// Reserve opcode ranges and register mnemonics.
    fn register_instructions(&self, table: &mut InstructionTable) -> Result<(), ConfigError>;

    /// Install one handler per registered opcode.
    fn install_opcodes(&self, builder: &mut DispatchBuilder) -> Result<(), ConfigError>;
}

/// The built-in instruction set. Always loaded first.
pub struct CoreExtension;

impl Extension for CoreExtension {
    fn name(&self) -> &str {
        "core"
    }

    fn register_instructions(&self, table: &mut InstructionTable) -> Result<(), ConfigError> {
        ops::register_instructions(table)
    }

    fn install_opcodes(&self, builder: &mut DispatchBuilder) -> Result<(), ConfigError> {
        ops::install_opcodes(builder)
    }
}
