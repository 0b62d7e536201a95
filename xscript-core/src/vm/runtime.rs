use crate::script::Literals;
use crate::vm::context::{Data, ScriptContext};

/// Per-invocation execution state handed to every handler.
///
/// Created for one run and dropped when it completes; never shared between
/// concurrent invocations.
pub struct Runtime<'a> {
    stack: Vec<Data>,
    pc: usize,
    halted: bool,
    literals: &'a Literals,
    context: &'a mut dyn ScriptContext,
}

impl<'a> Runtime<'a> {
    pub fn new(literals: &'a Literals, context: &'a mut dyn ScriptContext) -> Self {
        Self {
            stack: Vec::with_capacity(32),
            pc: 0,
            halted: false,
            literals,
            context,
        }
    }

    /// Address of the next instruction. While a handler runs, this already
    /// points one past the handler's own instruction.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc;
    }

    /// Stop the run after the current instruction.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn literals(&self) -> &'a Literals {
        self.literals
    }

    pub fn context(&mut self) -> &mut (dyn ScriptContext + 'a) {
        &mut *self.context
    }

    pub fn context_ref(&self) -> &(dyn ScriptContext + 'a) {
        &*self.context
    }

    pub fn push(&mut self, value: Data) {
        self.stack.push(value);
    }

    pub fn push_int(&mut self, value: i32) {
        self.push(Data::from_int(value));
    }

    pub fn push_float(&mut self, value: f32) {
        self.push(Data::from_float(value));
    }

    /// Compiled code never pops an empty stack; if it does, that is a
    /// compiler defect and release builds read zero.
    pub fn pop(&mut self) -> Data {
        debug_assert!(!self.stack.is_empty(), "operand stack underflow at pc={}", self.pc);
        self.stack.pop().unwrap_or_default()
    }

    /// The cell `depth` entries below the top (`0` is the top).
    pub fn peek(&self, depth: usize) -> Data {
        debug_assert!(depth < self.stack.len(), "operand stack underflow at pc={}", self.pc);
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.stack[i])
            .unwrap_or_default()
    }

    /// Overwrite the cell `depth` entries below the top.
    pub fn replace(&mut self, depth: usize, value: Data) {
        debug_assert!(depth < self.stack.len(), "operand stack underflow at pc={}", self.pc);
        if let Some(i) = self.stack.len().checked_sub(depth + 1) {
            self.stack[i] = value;
        }
    }

    pub fn stack(&self) -> &[Data] {
        &self.stack
    }

    /// String literal by index; out-of-range indices read as empty.
    pub fn string_literal(&self, index: i32) -> &'a str {
        let literals = self.literals;
        usize::try_from(index)
            .ok()
            .and_then(|i| literals.string(i))
            .unwrap_or_default()
    }
}
