use crate::vm::context::Data;
use crate::vm::handler::NullaryHandler;
use crate::vm::runtime::Runtime;

pub struct Pop;

impl NullaryHandler for Pop {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        runtime.pop();
    }
}

/// Replaces a literal index on top of the stack with the literal.
pub struct FetchLiteral {
    pub float: bool,
}

impl NullaryHandler for FetchLiteral {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let literals = runtime.literals();
        let index = runtime.peek(0).int() as usize;
        let value = if self.float {
            Data::from_float(literals.float(index).unwrap_or_default())
        } else {
            Data::from_int(literals.int(index).unwrap_or_default())
        };
        runtime.replace(0, value);
    }
}

pub struct IntToFloat;

impl NullaryHandler for IntToFloat {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let value = runtime.peek(0).int() as f32;
        runtime.replace(0, Data::from_float(value));
    }
}

/// Truncates toward zero; out-of-range floats saturate.
pub struct FloatToInt;

impl NullaryHandler for FloatToInt {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let value = runtime.peek(0).float() as i32;
        runtime.replace(0, Data::from_int(value));
    }
}

pub struct Negate {
    pub float: bool,
}

impl NullaryHandler for Negate {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let top = runtime.peek(0);
        let value = if self.float {
            Data::from_float(-top.float())
        } else {
            Data::from_int(top.int().wrapping_neg())
        };
        runtime.replace(0, value);
    }
}
