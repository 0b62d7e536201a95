use tracing::warn;

use crate::vm::context::Data;
use crate::vm::handler::NullaryHandler;
use crate::vm::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    Short,
    Long,
    Float,
}

/// Negative indices map past the end, where reads give 0 and writes are refused.
fn slot(index: Data) -> usize {
    usize::try_from(index.int()).unwrap_or(usize::MAX)
}

/// Stack: `[.., index, value]` → `[..]`.
pub struct StoreLocal(pub LocalKind);

impl NullaryHandler for StoreLocal {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let value = runtime.pop();
        let index = runtime.pop();
        let locals = runtime.context().locals();
        let stored = match self.0 {
            LocalKind::Short => locals.set_short(slot(index), value.int()),
            LocalKind::Long => locals.set_long(slot(index), value.int()),
            LocalKind::Float => locals.set_float(slot(index), value.float()),
        };
        if !stored {
            warn!(index = index.int(), kind = ?self.0, "store to missing local ignored");
        }
    }
}

/// Stack: `[.., index]` → `[.., value]`.
pub struct FetchLocal(pub LocalKind);

impl NullaryHandler for FetchLocal {
    fn execute(&self, runtime: &mut Runtime<'_>) {
        let index = slot(runtime.peek(0));
        let locals = runtime.context().locals();
        let value = match self.0 {
            LocalKind::Short => Data::from_int(locals.short(index)),
            LocalKind::Long => Data::from_int(locals.long(index)),
            LocalKind::Float => Data::from_float(locals.float(index)),
        };
        runtime.replace(0, value);
    }
}
