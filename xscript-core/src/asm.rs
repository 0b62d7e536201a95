//! Line-oriented assembler for hand-written test scripts.
//!
//! ```text
//! ; comment
//! pushint "Rest here?"        ; string literal index
//! pushint #2.5                ; float literal index
//! pushint @-70000             ; int literal index
//! messagebox 0
//! enableplayerfighting
//! ```

use crate::compiler::instruction_table::InstructionTable;
use crate::error::AsmError;
use crate::script::{Literals, Script};
use crate::vm::opcode::Instruction;

pub fn assemble(source: &str, table: &InstructionTable) -> Result<Script, AsmError> {
    let mut literals = Literals::new();
    let mut code = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let tokens = tokenize(raw, line)?;
        let Some((mnemonic, operands)) = tokens.split_first() else {
            continue;
        };

        let desc = table
            .lookup(mnemonic)
            .map_err(|source| AsmError::Lookup { line, source })?;
        let segment = desc.opcode.segment;
        if operands.len() != segment.arity() {
            return Err(AsmError::OperandCount {
                line,
                mnemonic: desc.mnemonic.clone(),
                expected: segment.arity(),
                got: operands.len(),
            });
        }

        let mut args = [0u32; 2];
        for ((slot, token), bits) in args.iter_mut().zip(operands).zip(segment.arg_bits()) {
            let value = operand(token, line, &mut literals)?;
            if value < 0 || value >= 1i64 << bits {
                return Err(AsmError::OperandRange { line, value, bits });
            }
            *slot = value as u32;
        }
        code.push(Instruction::new(desc.opcode, args).encode());
    }

    Ok(Script::new(code, literals))
}

fn operand(token: &str, line: usize, literals: &mut Literals) -> Result<i64, AsmError> {
    let bad = || AsmError::BadOperand {
        line,
        token: token.to_string(),
    };

    if let Some(s) = token.strip_prefix('"') {
        let s = s.strip_suffix('"').ok_or_else(bad)?;
        return Ok(literals.add_string(s) as i64);
    }
    if let Some(f) = token.strip_prefix('#') {
        let f: f32 = f.parse().map_err(|_| bad())?;
        return Ok(literals.add_float(f) as i64);
    }
    if let Some(n) = token.strip_prefix('@') {
        let n = parse_int(n).and_then(|n| i32::try_from(n).ok()).ok_or_else(bad)?;
        return Ok(literals.add_int(n) as i64);
    }
    parse_int(token).ok_or_else(bad)
}

fn parse_int(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (radix, digits) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // `from_str_radix` accepts its own sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(digits, radix).ok()?;
    if negative {
        value.checked_neg()
    } else {
        Some(value)
    }
}

/// Splits on whitespace and commas, keeps quoted strings whole and drops
/// everything after a `;` outside quotes.
fn tokenize(raw: &str, line: usize) -> Result<Vec<String>, AsmError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for c in raw.chars() {
        match c {
            '"' => {
                current.push(c);
                in_string = !in_string;
            }
            _ if in_string => current.push(c),
            ';' => break,
            c if c.is_whitespace() || c == ',' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_string {
        return Err(AsmError::BadOperand { line, token: current });
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineBuilder;
    use crate::error::LookupError;
    use crate::vm::ops::CoreOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_operands_and_literals() {
        let engine = EngineBuilder::new().build().unwrap();
        let source = r#"
            ; greet
            pushint "Hello; world"
            pushint "Ok"
            messagebox 1   ; one button
            pushint #0.5
            fetchfloatliteral
            pushint @-70000
            FetchIntLiteral
            return
        "#;
        let script = assemble(source, engine.instructions()).unwrap();

        assert_eq!(script.literals.strings(), &["Hello; world".to_string(), "Ok".to_string()]);
        assert_eq!(script.literals.floats(), &[0.5]);
        assert_eq!(script.literals.ints(), &[-70000]);
        assert_eq!(script.code.len(), 8);
        assert_eq!(script.code[0], Instruction::new(CoreOp::PushInt.opcode(), [0, 0]).encode());
        assert_eq!(script.code[1], Instruction::new(CoreOp::PushInt.opcode(), [1, 0]).encode());
        assert_eq!(script.code[2], Instruction::new(CoreOp::MessageBox.opcode(), [1, 0]).encode());
        assert_eq!(script.code[6], Instruction::bare(CoreOp::FetchIntLiteral.opcode()).encode());
    }

    #[test]
    fn diagnostics_carry_the_line() {
        let engine = EngineBuilder::new().build().unwrap();
        let table = engine.instructions();

        assert_eq!(
            assemble("return\nfly", table).unwrap_err(),
            AsmError::Lookup {
                line: 2,
                source: LookupError::UnknownInstruction { mnemonic: "fly".into() },
            }
        );
        assert_eq!(
            assemble("return 1", table).unwrap_err(),
            AsmError::OperandCount {
                line: 1,
                mnemonic: "return".into(),
                expected: 0,
                got: 1,
            }
        );
        assert_eq!(
            assemble("messagebox 256", table).unwrap_err(),
            AsmError::OperandRange {
                line: 1,
                value: 256,
                bits: 8,
            }
        );
        assert_eq!(
            assemble("pushint \"open", table).unwrap_err(),
            AsmError::BadOperand {
                line: 1,
                token: "\"open".into(),
            }
        );
    }

    #[test]
    fn hex_and_negative_integers() {
        assert_eq!(parse_int("0x1f"), Some(31));
        assert_eq!(parse_int("-12"), Some(-12));
        assert_eq!(parse_int("twelve"), None);
        assert_eq!(parse_int("-9223372036854775807"), Some(-i64::MAX));
        assert_eq!(parse_int("-9223372036854775808"), None);
    }

    #[test]
    fn doubled_signs_are_rejected() {
        for token in ["--9223372036854775808", "-+5", "+5", "--1", "0x-1", "-", "0x"] {
            assert_eq!(parse_int(token), None, "{token}");
        }

        let engine = EngineBuilder::new().build().unwrap();
        assert_eq!(
            assemble("pushint --9223372036854775808", engine.instructions()).unwrap_err(),
            AsmError::BadOperand {
                line: 1,
                token: "--9223372036854775808".into(),
            }
        );
    }
}
