//! Instruction extensions layered on top of the core instruction set, and
//! the game session they act upon.

pub mod control;
pub mod misc;
pub mod session;

use xscript_core::EngineBuilder;

pub use control::{Control, ControlExtension};
pub use misc::MiscExtension;
pub use session::{ControlState, GameSession, Message};

/// Engine builder with every extension of this crate, in load order.
pub fn engine_builder() -> EngineBuilder {
    EngineBuilder::new()
        .with_extension(ControlExtension)
        .with_extension(MiscExtension)
}
