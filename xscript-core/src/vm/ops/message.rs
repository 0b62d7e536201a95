use tracing::debug;

use crate::vm::handler::UnaryHandler;
use crate::vm::runtime::Runtime;

/// `arg0` is the button count. Stack: `[.., message, button_1 .. button_n]`,
/// all string literal indices.
pub struct MessageBox;

impl UnaryHandler for MessageBox {
    fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32) {
        let mut buttons = (0..arg0)
            .map(|_| {
                let index = runtime.pop().int();
                runtime.string_literal(index).to_string()
            })
            .collect::<Vec<_>>();
        buttons.reverse();

        let message = runtime.pop().int();
        let message = runtime.string_literal(message);
        debug!(%message, ?buttons, "message box");
        runtime.context().message_box(message, &buttons);
    }
}
