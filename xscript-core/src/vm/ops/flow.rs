use tracing::trace;

use crate::vm::handler::{NullaryHandler, UnaryHandler};
use crate::vm::runtime::Runtime;

pub struct PushInt;

impl UnaryHandler for PushInt {
    fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32) {
        runtime.push_int(arg0 as i32);
    }
}

/// Relative jump measured from the jump instruction itself.
pub struct Jump {
    pub forward: bool,
}

impl UnaryHandler for Jump {
    fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32) {
        let own = runtime.pc().saturating_sub(1);
        let target = if self.forward {
            own.saturating_add(arg0 as usize)
        } else {
            own.saturating_sub(arg0 as usize)
        };
        trace!(own, target, "jump");
        runtime.set_pc(target);
    }
}

pub struct Return;

impl NullaryHandler for Return {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        runtime.halt();
    }
}

/// Pops a condition and skips the next instruction when it matches.
pub struct Skip {
    pub on_zero: bool,
}

impl NullaryHandler for Skip {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let zero = runtime.pop().int() == 0;
        if zero == self.on_zero {
            runtime.set_pc(runtime.pc() + 1);
        }
    }
}
