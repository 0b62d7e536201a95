use std::collections::HashMap;

use enum_map::EnumMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xscript_core::{Data, Locals, ScriptContext};

use crate::control::Control;

/// Which player controls are currently locked. Everything starts enabled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ControlState {
    disabled: EnumMap<Control, bool>,
}

impl ControlState {
    pub fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.disabled[control] = !enabled;
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        !self.disabled[control]
    }

    pub fn disabled(&self) -> impl Iterator<Item = Control> + '_ {
        self.disabled.iter().filter(|(_, off)| **off).map(|(control, _)| control)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub buttons: Vec<String>,
}

/// The state one running script sees: the locals of the object it belongs
/// to plus the session-wide globals and player state.
#[derive(Debug)]
pub struct GameSession {
    locals: Locals,
    globals: HashMap<String, Data>,
    controls: ControlState,
    messages: Vec<Message>,
    menu_mode: bool,
    rng: StdRng,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic `random` results, for replays and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            locals: Locals::default(),
            globals: HashMap::new(),
            controls: ControlState::default(),
            messages: Vec::new(),
            menu_mode: false,
            rng,
        }
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlState {
        &mut self.controls
    }

    pub fn locals_ref(&self) -> &Locals {
        &self.locals
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Hand the queued message boxes to the UI.
    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn globals(&self) -> &HashMap<String, Data> {
        &self.globals
    }

    pub fn set_menu_mode(&mut self, menu_mode: bool) {
        self.menu_mode = menu_mode;
    }
}

impl ScriptContext for GameSession {
    fn locals(&mut self) -> &mut Locals {
        &mut self.locals
    }

    fn global(&self, name: &str) -> Data {
        self.globals.get(&name.to_ascii_lowercase()).copied().unwrap_or_default()
    }

    fn set_global(&mut self, name: &str, value: Data) {
        self.globals.insert(name.to_ascii_lowercase(), value);
    }

    fn message_box(&mut self, message: &str, buttons: &[String]) {
        self.messages.push(Message {
            text: message.to_string(),
            buttons: buttons.to_vec(),
        });
    }

    fn set_control_enabled(&mut self, control: &str, enabled: bool) {
        match control.parse::<Control>() {
            Ok(control) => {
                tracing::info!(control = control.name(), enabled, "player control changed");
                self.controls.set_enabled(control, enabled);
            }
            Err(_) => log::warn!("unknown player control: {}", control),
        }
    }

    fn control_enabled(&self, control: &str) -> bool {
        control
            .parse::<Control>()
            .map(|control| self.controls.is_enabled(control))
            .unwrap_or(true)
    }

    fn menu_mode(&self) -> bool {
        self.menu_mode
    }

    fn random(&mut self, limit: i32) -> i32 {
        if limit <= 0 {
            return 0;
        }
        self.rng.gen_range(0..limit)
    }
}
