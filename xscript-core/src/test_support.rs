use std::collections::HashMap;

use crate::vm::context::{Data, Locals, ScriptContext};

/// Records everything a script does to its host.
#[derive(Debug, Default)]
pub(crate) struct MockContext {
    pub locals: Locals,
    pub globals: HashMap<String, Data>,
    pub messages: Vec<(String, Vec<String>)>,
    pub disabled: Vec<String>,
    pub menu_mode: bool,
    pub next_random: i32,
}

impl ScriptContext for MockContext {
    fn locals(&mut self) -> &mut Locals {
        &mut self.locals
    }

    fn global(&self, name: &str) -> Data {
        self.globals.get(name).copied().unwrap_or_default()
    }

    fn set_global(&mut self, name: &str, value: Data) {
        self.globals.insert(name.to_string(), value);
    }

    fn message_box(&mut self, message: &str, buttons: &[String]) {
        self.messages.push((message.to_string(), buttons.to_vec()));
    }

    fn set_control_enabled(&mut self, control: &str, enabled: bool) {
        self.disabled.retain(|c| c != control);
        if !enabled {
            self.disabled.push(control.to_string());
        }
    }

    fn control_enabled(&self, control: &str) -> bool {
        !self.disabled.iter().any(|c| c == control)
    }

    fn menu_mode(&self) -> bool {
        self.menu_mode
    }

    fn random(&mut self, limit: i32) -> i32 {
        if limit <= 0 {
            return 0;
        }
        self.next_random.rem_euclid(limit)
    }
}
