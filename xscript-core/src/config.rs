use serde::{Deserialize, Serialize};

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Instructions one invocation may execute before it is aborted.
    /// `0` disables the limit.
    pub step_limit: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}
