use xscript_core::{ConfigError, DispatchBuilder, Extension, InstructionTable, NullaryHandler, Opcode, Runtime, Segment};

const BASE: u32 = 0x200_000b;

pub struct OpMenuMode;

impl NullaryHandler for OpMenuMode {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let menu_mode = runtime.context_ref().menu_mode();
        runtime.push_int(menu_mode as i32);
    }
}

/// Always 0: there is no console build.
pub struct OpXBox;

impl NullaryHandler for OpXBox {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        runtime.push_int(0);
    }
}

/// Stack: `[.., limit]` → `[.., value]` with `0 <= value < limit`.
pub struct OpRandom;

impl NullaryHandler for OpRandom {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let limit = runtime.pop().int();
        if limit < 0 {
            tracing::warn!(limit, "random: negative limit");
        }
        let value = runtime.context().random(limit);
        runtime.push_int(value);
    }
}

pub struct MiscExtension;

impl Extension for MiscExtension {
    fn name(&self) -> &str {
        "misc"
    }

    fn register_instructions(&self, table: &mut InstructionTable) -> Result<(), ConfigError> {
        let misc = table.reserve("misc", Segment::Five, BASE, 3)?;
        let functions = [("menumode", ""), ("xbox", ""), ("random", "l")];
        for ((mnemonic, signature), opcode) in functions.into_iter().zip(misc.opcodes()) {
            table.register_function(mnemonic, 'l', signature, opcode)?;
        }
        Ok(())
    }

    fn install_opcodes(&self, builder: &mut DispatchBuilder) -> Result<(), ConfigError> {
        builder.install_nullary(Opcode::new(Segment::Five, BASE), OpMenuMode)?;
        builder.install_nullary(Opcode::new(Segment::Five, BASE + 1), OpXBox)?;
        builder.install_nullary(Opcode::new(Segment::Five, BASE + 2), OpRandom)?;
        Ok(())
    }
}
