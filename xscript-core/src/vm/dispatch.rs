use std::collections::HashMap;

use enum_map::EnumMap;
use tracing::{debug, info};

use crate::error::{ConfigError, ExecError};
use crate::vm::handler::{BinaryHandler, Handler, NullaryHandler, UnaryHandler};
use crate::vm::opcode::{Instruction, Opcode};
use crate::vm::runtime::Runtime;
use crate::vm::segment::Segment;

type SegmentTables = EnumMap<Segment, HashMap<u32, Handler>>;

/// Dispatch table while extensions are still installing handlers.
///
/// Turning it into a [`DispatchTable`] with [`DispatchBuilder::seal`] is one
/// way: the sealed table has no install API, so nothing can be added once
/// scripts may be running.
#[derive(Default)]
pub struct DispatchBuilder {
    segments: SegmentTables,
}

impl DispatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `opcode`. The table owns the handler from here on.
    pub fn install(&mut self, opcode: Opcode, handler: Handler) -> Result<(), ConfigError> {
        let segment = opcode.segment;
        if !opcode.fits() {
            return Err(ConfigError::OutOfSegment {
                segment,
                code: opcode.code as u64,
                limit: segment.opcode_limit(),
            });
        }

        if handler.arity() != segment.arity() {
            return Err(ConfigError::ArityMismatch {
                opcode,
                expected: segment.arity(),
                got: handler.arity(),
            });
        }

        let table = &mut self.segments[segment];
        if table.contains_key(&opcode.code) {
            return Err(ConfigError::AlreadyInstalled { opcode });
        }

        debug!(%opcode, "installed handler");
        table.insert(opcode.code, handler);
        Ok(())
    }

    pub fn install_nullary(&mut self, opcode: Opcode, handler: impl NullaryHandler + 'static) -> Result<(), ConfigError> {
        self.install(opcode, Handler::nullary(handler))
    }

    pub fn install_unary(&mut self, opcode: Opcode, handler: impl UnaryHandler + 'static) -> Result<(), ConfigError> {
        self.install(opcode, Handler::unary(handler))
    }

    pub fn install_binary(&mut self, opcode: Opcode, handler: impl BinaryHandler + 'static) -> Result<(), ConfigError> {
        self.install(opcode, Handler::binary(handler))
    }

    pub fn contains(&self, opcode: Opcode) -> bool {
        self.segments[opcode.segment].contains_key(&opcode.code)
    }

    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        opcodes(&self.segments)
    }

    pub fn seal(self) -> DispatchTable {
        let table = DispatchTable { segments: self.segments };
        info!(handlers = table.len(), "dispatch table sealed");
        table
    }
}

/// Sealed opcode → handler table, read-only and shareable across threads.
pub struct DispatchTable {
    segments: SegmentTables,
}

impl DispatchTable {
    /// Run the handler bound to `instruction.opcode` exactly once.
    ///
    /// When nothing is installed the runtime is left untouched.
    pub fn dispatch(&self, instruction: Instruction, runtime: &mut Runtime<'_>) -> Result<(), ExecError> {
        let opcode = instruction.opcode;
        let handler = self.segments[opcode.segment]
            .get(&opcode.code)
            .ok_or(ExecError::UnimplementedOpcode { opcode })?;
        handler.execute(runtime, instruction.args);
        Ok(())
    }

    /// Decode a code word and dispatch it.
    pub fn execute(&self, word: u32, runtime: &mut Runtime<'_>) -> Result<(), ExecError> {
        self.dispatch(Instruction::decode(word)?, runtime)
    }

    pub fn contains(&self, opcode: Opcode) -> bool {
        self.segments[opcode.segment].contains_key(&opcode.code)
    }

    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        opcodes(&self.segments)
    }

    pub fn len(&self) -> usize {
        self.segments.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn opcodes(segments: &SegmentTables) -> impl Iterator<Item = Opcode> + '_ {
    segments
        .iter()
        .flat_map(|(segment, table)| table.keys().map(move |&code| Opcode::new(segment, code)))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::script::Literals;
    use crate::test_support::MockContext;
    use pretty_assertions::assert_eq;

    struct Count {
        hits: Arc<AtomicUsize>,
        tag: i32,
    }

    impl NullaryHandler for Count {
        fn execute(&self, runtime: &mut Runtime<'_>) {
            self.hits.fetch_add(1, Ordering::SeqCst);
            runtime.push_int(self.tag);
        }
    }

    struct Sum;

    impl BinaryHandler for Sum {
        fn execute(&self, runtime: &mut Runtime<'_>, arg0: u32, arg1: u32) {
            runtime.push_int((arg0 + arg1) as i32);
        }
    }

    fn op5(code: u32) -> Opcode {
        Opcode::new(Segment::Five, code)
    }

    #[test]
    fn dispatch_hits_only_the_installed_handler() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let mut builder = DispatchBuilder::new();
        builder.install_nullary(op5(0x200_0000), Count { hits: a.clone(), tag: 1 }).unwrap();
        builder.install_nullary(op5(0x200_0001), Count { hits: b.clone(), tag: 2 }).unwrap();
        let table = builder.seal();

        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        table.dispatch(Instruction::bare(op5(0x200_0001)), &mut runtime).unwrap();

        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.stack().len(), 1);
        assert_eq!(runtime.peek(0).int(), 2);
    }

    #[test]
    fn unimplemented_opcode_leaves_the_runtime_alone() {
        let table = DispatchBuilder::new().seal();
        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        runtime.push_int(7);

        let err = table.dispatch(Instruction::bare(op5(0x200_0042)), &mut runtime).unwrap_err();
        assert_eq!(err, ExecError::UnimplementedOpcode { opcode: op5(0x200_0042) });
        assert_eq!(runtime.stack(), &[crate::vm::context::Data::from_int(7)]);
        assert_eq!(runtime.pc(), 0);
    }

    #[test]
    fn binary_segment_passes_both_arguments() {
        let mut builder = DispatchBuilder::new();
        builder.install_binary(Opcode::new(Segment::Four, 3), Sum).unwrap();
        let table = builder.seal();

        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        table.execute(Segment::Four.encode(3, [40, 2]), &mut runtime).unwrap();
        assert_eq!(runtime.peek(0).int(), 42);
    }

    #[test]
    fn second_install_is_rejected() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut builder = DispatchBuilder::new();
        builder.install_nullary(op5(1), Count { hits: hits.clone(), tag: 0 }).unwrap();
        let err = builder.install_nullary(op5(1), Count { hits, tag: 0 }).unwrap_err();
        assert_eq!(err, ConfigError::AlreadyInstalled { opcode: op5(1) });
    }

    #[test]
    fn handler_arity_must_match_segment() {
        let mut builder = DispatchBuilder::new();
        let err = builder.install_binary(op5(2), Sum).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ArityMismatch {
                opcode: op5(2),
                expected: 0,
                got: 2,
            }
        );
        assert!(!builder.contains(op5(2)));
    }

    #[test]
    fn out_of_segment_opcode_is_rejected() {
        let mut builder = DispatchBuilder::new();
        let err = builder.install_binary(Opcode::new(Segment::Four, 0x400), Sum).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfSegment { segment: Segment::Four, .. }));
    }

    #[test]
    fn invalid_word_is_reported() {
        let table = DispatchBuilder::new().seal();
        let literals = Literals::default();
        let mut ctx = MockContext::default();
        let mut runtime = Runtime::new(&literals, &mut ctx);
        assert_eq!(
            table.execute(0xfc00_0000, &mut runtime),
            Err(ExecError::InvalidCode { word: 0xfc00_0000 })
        );
    }
}
