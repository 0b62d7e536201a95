use crate::vm::handler::NullaryHandler;
use crate::vm::runtime::Runtime;

/// Stack: `[.., name, value]` → `[..]`, where `name` is a string literal
/// index.
pub struct StoreGlobal;

impl NullaryHandler for StoreGlobal {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let value = runtime.pop();
        let name = runtime.pop().int();
        let name = runtime.string_literal(name);
        runtime.context().set_global(name, value);
    }
}

/// Stack: `[.., name]` → `[.., value]`.
pub struct FetchGlobal;

impl NullaryHandler for FetchGlobal {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let name = runtime.string_literal(runtime.peek(0).int());
        let value = runtime.context_ref().global(name);
        runtime.replace(0, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Literals;
    use crate::test_support::MockContext;
    use crate::vm::context::Data;

    #[test]
    fn globals_are_addressed_by_name() {
        let mut literals = Literals::default();
        let gamehour = literals.add_string("gamehour") as i32;
        let mut ctx = MockContext::default();
        {
            let mut runtime = Runtime::new(&literals, &mut ctx);
            runtime.push_int(gamehour);
            runtime.push_float(13.5);
            StoreGlobal.execute(&mut runtime);

            runtime.push_int(gamehour);
            FetchGlobal.execute(&mut runtime);
            assert_eq!(runtime.peek(0).float(), 13.5);
        }
        assert_eq!(ctx.globals["gamehour"], Data::from_float(13.5));
    }
}
