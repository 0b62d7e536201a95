use enum_map::Enum;
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use xscript_core::{
    ConfigError, DispatchBuilder, Extension, InstructionTable, NullaryHandler, Opcode, Reservation, Runtime, Segment,
};

pub const OPCODE_ENABLE: u32 = 0x200_007e;
pub const OPCODE_DISABLE: u32 = 0x200_0085;
pub const OPCODE_GET_DISABLED: u32 = 0x200_0160;

/// Player controls a script may lock. The declaration order is the opcode
/// order within each family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, EnumIter, EnumCount, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Control {
    PlayerControls,
    PlayerFighting,
    PlayerJumping,
    PlayerLooking,
    PlayerMagic,
    PlayerViewSwitch,
    VanityMode,
}

impl Control {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// `enable<control>` / `disable<control>`.
pub struct OpSetControl {
    control: Control,
    enable: bool,
}

impl OpSetControl {
    pub fn new(control: Control, enable: bool) -> Self {
        Self { control, enable }
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn enable(&self) -> bool {
        self.enable
    }
}

impl NullaryHandler for OpSetControl {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        log::debug!(
            "{} {}",
            if self.enable { "enable" } else { "disable" },
            self.control.name()
        );
        runtime.context().set_control_enabled(self.control.name(), self.enable);
    }
}

/// `get<control>disabled`: pushes 1 if the control is locked.
pub struct OpGetDisabled {
    control: Control,
}

impl NullaryHandler for OpGetDisabled {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let disabled = !runtime.context_ref().control_enabled(self.control.name());
        runtime.push_int(disabled as i32);
    }
}

pub struct ControlExtension;

impl ControlExtension {
    fn family(table: &mut InstructionTable, group: &str, base: u32) -> Result<Reservation, ConfigError> {
        table.reserve(group, Segment::Five, base, Control::COUNT as u32)
    }
}

impl Extension for ControlExtension {
    fn name(&self) -> &str {
        "control"
    }

    fn register_instructions(&self, table: &mut InstructionTable) -> Result<(), ConfigError> {
        let enable = Self::family(table, "control.enable", OPCODE_ENABLE)?;
        let disable = Self::family(table, "control.disable", OPCODE_DISABLE)?;
        let get_disabled = Self::family(table, "control.getdisabled", OPCODE_GET_DISABLED)?;

        let families = enable.opcodes().zip(disable.opcodes()).zip(get_disabled.opcodes());
        for (control, ((on, off), get)) in Control::iter().zip(families) {
            let name = control.name();
            table.register_instruction(&format!("enable{name}"), "", on)?;
            table.register_instruction(&format!("disable{name}"), "", off)?;
            table.register_function(&format!("get{name}disabled"), 'l', "", get)?;
        }
        Ok(())
    }

    fn install_opcodes(&self, builder: &mut DispatchBuilder) -> Result<(), ConfigError> {
        for (i, control) in Control::iter().enumerate() {
            let i = i as u32;
            builder.install_nullary(Opcode::new(Segment::Five, OPCODE_ENABLE + i), OpSetControl::new(control, true))?;
            builder.install_nullary(Opcode::new(Segment::Five, OPCODE_DISABLE + i), OpSetControl::new(control, false))?;
            builder.install_nullary(Opcode::new(Segment::Five, OPCODE_GET_DISABLED + i), OpGetDisabled { control })?;
        }
        Ok(())
    }
}
