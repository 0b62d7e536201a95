use tracing::{info, instrument, warn};

use crate::compiler::instruction_table::InstructionTable;
use crate::config::VmConfig;
use crate::error::{ConfigError, ExecError};
use crate::extension::{CoreExtension, Extension};
use crate::script::Script;
use crate::vm::context::ScriptContext;
use crate::vm::dispatch::{DispatchBuilder, DispatchTable};
use crate::vm::opcode::Opcode;
use crate::vm::runtime::Runtime;

/// Collects extensions and assembles them into an [`Engine`].
///
/// The built-in instruction set always comes first; extensions follow in the
/// order they were added, so opcode assignment is reproducible.
pub struct EngineBuilder {
    extensions: Vec<Box<dyn Extension>>,
    config: VmConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            extensions: vec![Box::new(CoreExtension)],
            config: VmConfig::default(),
        }
    }

    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Engine, ConfigError> {
        let mut instructions = InstructionTable::new();
        for extension in &self.extensions {
            extension.register_instructions(&mut instructions)?;
        }

        let mut builder = DispatchBuilder::new();
        for extension in &self.extensions {
            extension.install_opcodes(&mut builder)?;
        }

        check_consistency(&instructions, &builder)?;

        let names: Vec<&str> = self.extensions.iter().map(|e| e.name()).collect();
        info!(
            extensions = ?names,
            instructions = instructions.len(),
            "engine ready"
        );

        Ok(Engine {
            instructions,
            dispatch: builder.seal(),
            config: self.config,
        })
    }
}

/// Both tables must describe the same opcode set.
fn check_consistency(instructions: &InstructionTable, builder: &DispatchBuilder) -> Result<(), ConfigError> {
    if let Some(desc) = instructions.iter().find(|d| !builder.contains(d.opcode)) {
        return Err(ConfigError::MissingHandler {
            mnemonic: desc.mnemonic.clone(),
            opcode: desc.opcode,
        });
    }

    let mut orphans: Vec<Opcode> = builder
        .opcodes()
        .filter(|&op| instructions.by_opcode(op).is_none())
        .collect();
    orphans.sort();
    if let Some(&opcode) = orphans.first() {
        return Err(ConfigError::MissingDescriptor { opcode });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Instructions executed.
    pub steps: usize,
    /// `true` if the script returned explicitly rather than running off the
    /// end of its code.
    pub halted: bool,
}

/// A sealed instruction table and dispatch table pair. Immutable; share it
/// between threads freely.
pub struct Engine {
    instructions: InstructionTable,
    dispatch: DispatchTable,
    config: VmConfig,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Execute `script` against `context`.
    ///
    /// An error aborts this invocation only. Whatever the script did to the
    /// context before the failing instruction stays done.
    #[instrument(skip_all, fields(words = script.code.len()))]
    pub fn run(&self, script: &Script, context: &mut dyn ScriptContext) -> Result<RunOutcome, ExecError> {
        let limit = self.config.step_limit;
        let mut runtime = Runtime::new(&script.literals, context);
        let mut steps = 0;

        while !runtime.is_halted() {
            let pc = runtime.pc();
            let Some(&word) = script.code.get(pc) else {
                break;
            };

            if limit != 0 && steps >= limit {
                warn!(pc, limit, "step limit exceeded");
                return Err(abort(pc, ExecError::StepLimit { limit }));
            }

            runtime.set_pc(pc + 1);
            steps += 1;
            if let Err(err) = self.dispatch.execute(word, &mut runtime) {
                warn!(pc, word, %err, "script aborted");
                return Err(abort(pc, err));
            }
        }

        Ok(RunOutcome {
            steps,
            halted: runtime.is_halted(),
        })
    }
}

fn abort(pc: usize, source: ExecError) -> ExecError {
    ExecError::Aborted {
        pc,
        source: Box::new(source),
    }
}
