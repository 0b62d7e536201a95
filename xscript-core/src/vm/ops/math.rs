use tracing::warn;

use crate::vm::context::Data;
use crate::vm::handler::NullaryHandler;
use crate::vm::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NonEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    fn holds<T: PartialOrd>(self, left: T, right: T) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NonEqual => left != right,
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Greater => left > right,
            Comparison::GreaterOrEqual => left >= right,
        }
    }
}

/// Pops the right operand and replaces the left one (the cell below) with
/// the result.
fn binary(runtime: &mut Runtime<'_>, f: impl FnOnce(Data, Data) -> Data) {
    let right = runtime.pop();
    let left = runtime.peek(0);
    runtime.replace(0, f(left, right));
}

/// Integer arithmetic wraps on overflow.
pub struct IntArith(pub ArithOp);

impl NullaryHandler for IntArith {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let op = self.0;
        let pc = runtime.pc();
        binary(runtime, |l, r| {
            let (l, r) = (l.int(), r.int());
            let value = match op {
                ArithOp::Add => l.wrapping_add(r),
                ArithOp::Sub => l.wrapping_sub(r),
                ArithOp::Mul => l.wrapping_mul(r),
                ArithOp::Div if r == 0 => {
                    warn!(pc, "integer division by zero");
                    0
                }
                ArithOp::Div => l.wrapping_div(r),
            };
            Data::from_int(value)
        });
    }
}

pub struct FloatArith(pub ArithOp);

impl NullaryHandler for FloatArith {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let op = self.0;
        let pc = runtime.pc();
        binary(runtime, |l, r| {
            let (l, r) = (l.float(), r.float());
            let value = match op {
                ArithOp::Add => l + r,
                ArithOp::Sub => l - r,
                ArithOp::Mul => l * r,
                ArithOp::Div if r == 0.0 => {
                    warn!(pc, "float division by zero");
                    0.0
                }
                ArithOp::Div => l / r,
            };
            Data::from_float(value)
        });
    }
}

pub struct IntCompare(pub Comparison);

impl NullaryHandler for IntCompare {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let cmp = self.0;
        binary(runtime, |l, r| Data::from_bool(cmp.holds(l.int(), r.int())));
    }
}

pub struct FloatCompare(pub Comparison);

impl NullaryHandler for FloatCompare {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let cmp = self.0;
        binary(runtime, |l, r| Data::from_bool(cmp.holds(l.float(), r.float())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Literals;
    use crate::test_support::MockContext;

    fn eval_int(handler: &dyn NullaryHandler, left: i32, right: i32) -> i32 {
        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        runtime.push_int(left);
        runtime.push_int(right);
        handler.execute(&mut runtime);
        assert_eq!(runtime.stack().len(), 1);
        runtime.peek(0).int()
    }

    fn eval_float(handler: &dyn NullaryHandler, left: f32, right: f32) -> Data {
        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        runtime.push_float(left);
        runtime.push_float(right);
        handler.execute(&mut runtime);
        runtime.peek(0)
    }

    #[test]
    fn operand_order_is_left_below_right() {
        assert_eq!(eval_int(&IntArith(ArithOp::Sub), 10, 3), 7);
        assert_eq!(eval_int(&IntArith(ArithOp::Div), 10, 3), 3);
        assert_eq!(eval_float(&FloatArith(ArithOp::Div), 1.0, 4.0).float(), 0.25);
        assert_eq!(eval_int(&IntCompare(Comparison::Less), 1, 2), 1);
        assert_eq!(eval_int(&IntCompare(Comparison::Less), 2, 1), 0);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        assert_eq!(eval_int(&IntArith(ArithOp::Div), 5, 0), 0);
        assert_eq!(eval_float(&FloatArith(ArithOp::Div), 5.0, 0.0).float(), 0.0);
    }

    #[test]
    fn integer_overflow_wraps() {
        assert_eq!(eval_int(&IntArith(ArithOp::Add), i32::MAX, 1), i32::MIN);
        assert_eq!(eval_int(&IntArith(ArithOp::Div), i32::MIN, -1), i32::MIN);
    }

    #[test]
    fn float_comparisons_push_an_int() {
        assert_eq!(eval_float(&FloatCompare(Comparison::GreaterOrEqual), 2.0, 2.0).int(), 1);
        assert_eq!(eval_float(&FloatCompare(Comparison::NonEqual), 2.0, 2.0).int(), 0);
    }
}
