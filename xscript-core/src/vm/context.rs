use std::fmt;

/// One operand stack cell. Integers and floats share the slot; the compiler
/// knows which one it put there.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Data(u32);

impl Data {
    pub const ZERO: Data = Data(0);

    #[inline]
    pub fn from_int(v: i32) -> Self {
        Data(v as u32)
    }

    #[inline]
    pub fn from_float(v: f32) -> Self {
        Data(v.to_bits())
    }

    #[inline]
    pub fn from_bool(v: bool) -> Self {
        Data(v as u32)
    }

    #[inline]
    pub fn int(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub fn float(self) -> f32 {
        f32::from_bits(self.0)
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data(0x{:08x})", self.0)
    }
}

/// Slots per kind in a default-constructed [`Locals`].
pub const DEFAULT_LOCALS: usize = 16;

/// Local variables of the object a script is attached to.
///
/// The slot counts are fixed when the object is created. Reads past the end
/// yield zero and writes past the end are refused, so a script cannot size
/// its host's storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Locals {
    shorts: Vec<i16>,
    longs: Vec<i32>,
    floats: Vec<f32>,
}

impl Default for Locals {
    fn default() -> Self {
        Self::with_sizes(DEFAULT_LOCALS, DEFAULT_LOCALS, DEFAULT_LOCALS)
    }
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sizes(shorts: usize, longs: usize, floats: usize) -> Self {
        Self {
            shorts: vec![0; shorts],
            longs: vec![0; longs],
            floats: vec![0.0; floats],
        }
    }

    /// Slot counts as `(shorts, longs, floats)`.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.shorts.len(), self.longs.len(), self.floats.len())
    }

    pub fn short(&self, index: usize) -> i32 {
        self.shorts.get(index).copied().unwrap_or_default() as i32
    }

    pub fn long(&self, index: usize) -> i32 {
        self.longs.get(index).copied().unwrap_or_default()
    }

    pub fn float(&self, index: usize) -> f32 {
        self.floats.get(index).copied().unwrap_or_default()
    }

    /// Returns `false` and leaves the locals alone if `index` is out of range.
    pub fn set_short(&mut self, index: usize, value: i32) -> bool {
        store(&mut self.shorts, index, value as i16)
    }

    pub fn set_long(&mut self, index: usize, value: i32) -> bool {
        store(&mut self.longs, index, value)
    }

    pub fn set_float(&mut self, index: usize, value: f32) -> bool {
        store(&mut self.floats, index, value)
    }
}

fn store<T>(slots: &mut [T], index: usize, value: T) -> bool {
    match slots.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// What the engine exposes to a running script: the object it is attached
/// to and the game session around it.
///
/// One context per invocation; the interpreter borrows it exclusively for the
/// duration of a run.
pub trait ScriptContext {
    fn locals(&mut self) -> &mut Locals;

    fn global(&self, name: &str) -> Data;

    fn set_global(&mut self, name: &str, value: Data);

    fn message_box(&mut self, message: &str, buttons: &[String]);

    /// Apply a named player control change to the active session.
    fn set_control_enabled(&mut self, control: &str, enabled: bool);

    fn control_enabled(&self, control: &str) -> bool;

    fn menu_mode(&self) -> bool {
        false
    }

    /// A value in `0..limit`; `limit <= 0` yields 0.
    fn random(&mut self, limit: i32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_keeps_int_and_float_bits() {
        assert_eq!(Data::from_int(-3).int(), -3);
        assert_eq!(Data::from_float(1.5).float(), 1.5);
        assert_eq!(Data::from_bool(true).int(), 1);
    }

    #[test]
    fn locals_have_a_fixed_size() {
        let mut locals = Locals::with_sizes(1, 2, 0);
        assert_eq!(locals.long(4), 0);
        assert!(!locals.set_long(4, 9));
        assert_eq!(locals.long(4), 0);
        assert!(locals.set_long(1, 9));
        assert_eq!(locals.long(1), 9);
        assert!(locals.set_short(0, 70000));
        assert_eq!(locals.short(0), 70000i32 as i16 as i32);
        assert!(!locals.set_float(0, 0.25));
        assert_eq!(locals.sizes(), (1, 2, 0));
    }

    #[test]
    fn default_locals() {
        let mut locals = Locals::default();
        assert_eq!(locals.sizes(), (DEFAULT_LOCALS, DEFAULT_LOCALS, DEFAULT_LOCALS));
        assert!(!locals.set_long(usize::MAX, 1));
        assert_eq!(locals, Locals::default());
    }
}
