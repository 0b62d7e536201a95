//! xscript-core
//!
//! Opcode space, instruction registry and interpreter of the xscript engine.
//!
//! The compiler asks an [`InstructionTable`] which opcode a keyword maps to;
//! the interpreter asks a [`DispatchTable`] which handler runs for an opcode.
//! Extensions fill both, and [`EngineBuilder`] refuses to produce an
//! [`Engine`] unless the two agree.

pub mod asm;
pub mod compiler;
pub mod config;
pub mod disasm;
pub mod engine;
pub mod error;
pub mod extension;
pub mod script;
pub mod vm;

#[cfg(test)]
mod test_support;

pub use compiler::instruction_table::{InstructionDescriptor, InstructionKind, InstructionTable};
pub use compiler::signature::ArgSignature;
pub use config::VmConfig;
pub use engine::{Engine, EngineBuilder, RunOutcome};
pub use error::{AsmError, ConfigError, ExecError, LookupError, ScriptError};
pub use extension::Extension;
pub use script::{Literals, Script};
pub use vm::context::{Data, Locals, ScriptContext, DEFAULT_LOCALS};
pub use vm::dispatch::{DispatchBuilder, DispatchTable};
pub use vm::handler::{BinaryHandler, Handler, NullaryHandler, UnaryHandler};
pub use vm::opcode::{Instruction, Opcode};
pub use vm::runtime::Runtime;
pub use vm::segment::{Region, Segment};
pub use vm::segmenter::{OpcodeSegmenter, Reservation};
