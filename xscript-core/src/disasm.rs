use itertools::Itertools;

use crate::compiler::instruction_table::InstructionTable;
use crate::vm::opcode::Instruction;

/// One line per code word: `pc  word  mnemonic args`.
pub fn disassemble(code: &[u32], table: &InstructionTable) -> String {
    code.iter()
        .enumerate()
        .map(|(pc, &word)| format!("{pc:04}  {word:08x}  {}\n", describe(word, table)))
        .collect()
}

/// The mnemonic and inline arguments of a single word.
pub fn describe(word: u32, table: &InstructionTable) -> String {
    let Ok(inst) = Instruction::decode(word) else {
        return "<invalid>".to_string();
    };

    let Some(desc) = table.by_opcode(inst.opcode) else {
        return format!("<unknown {}>", inst.opcode);
    };

    let arity = inst.opcode.segment.arity();
    if arity == 0 {
        return desc.mnemonic.clone();
    }
    format!("{} {}", desc.mnemonic, inst.args[..arity].iter().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::assemble;
    use crate::engine::EngineBuilder;

    #[test]
    fn listing() {
        let engine = EngineBuilder::new().build().unwrap();
        let mut script = assemble(
            "pushint 7\npushint \"hi\"\nmessagebox 0\njumpbackward 3\nreturn",
            engine.instructions(),
        )
        .unwrap();
        script.code.push(0xca00_1234);
        script.code.push(0xffff_ffff);

        insta::assert_snapshot!(disassemble(&script.code, engine.instructions()), @r###"
        0000  00000007  pushint 7
        0001  00000000  pushint 0
        0002  c0000000  messagebox 0
        0003  02000003  jumpbackward 3
        0004  c8000012  return
        0005  ca001234  <unknown segment 5 opcode 0x2001234>
        0006  ffffffff  <invalid>
        "###);
    }
}
