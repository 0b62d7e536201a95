use thiserror::Error;

use crate::vm::opcode::Opcode;
use crate::vm::segment::{Region, Segment};

/// Startup-time assembly defects. Any of these means the engine must not start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mnemonic `{mnemonic}` is already registered")]
    DuplicateMnemonic { mnemonic: String },

    #[error("invalid argument signature {signature:?} for `{mnemonic}`: {reason}")]
    InvalidSignature {
        mnemonic: String,
        signature: String,
        reason: String,
    },

    #[error("invalid return type {return_type:?} for `{mnemonic}`")]
    InvalidReturnType { mnemonic: String, return_type: char },

    #[error("group `{group}` reserves an empty opcode range")]
    EmptyReservation { group: String },

    #[error("opcode 0x{code:x} does not fit {segment} (limit 0x{limit:x})")]
    OutOfSegment {
        segment: Segment,
        code: u64,
        limit: u32,
    },

    #[error("group `{group}` range [0x{base:x}, +{count}) in {segment} leaves the {region} region")]
    RegionViolation {
        group: String,
        segment: Segment,
        base: u32,
        count: u32,
        region: Region,
    },

    #[error("group `{group}` range [0x{base:x}, +{count}) in {segment} overlaps group `{other}`")]
    RangeOverlap {
        group: String,
        other: String,
        segment: Segment,
        base: u32,
        count: u32,
    },

    #[error("`{mnemonic}` uses {opcode}, which no group has reserved")]
    Unreserved { mnemonic: String, opcode: Opcode },

    #[error("`{mnemonic}` uses {opcode}, already taken by `{other}`")]
    OpcodeTaken {
        mnemonic: String,
        other: String,
        opcode: Opcode,
    },

    #[error("a handler is already installed for {opcode}")]
    AlreadyInstalled { opcode: Opcode },

    #[error("{opcode} needs a {expected}-argument handler, got {got}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },

    #[error("`{mnemonic}` ({opcode}) is registered but has no handler")]
    MissingHandler { mnemonic: String, opcode: Opcode },

    #[error("handler installed for {opcode} has no registered instruction")]
    MissingDescriptor { opcode: Opcode },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown instruction `{mnemonic}`")]
    UnknownInstruction { mnemonic: String },
}

/// Failures that abort a single script invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("no handler installed for {opcode}")]
    UnimplementedOpcode { opcode: Opcode },

    #[error("invalid instruction word 0x{word:08x}")]
    InvalidCode { word: u32 },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimit { limit: usize },

    #[error("script aborted at pc={pc}: {source}")]
    Aborted {
        pc: usize,
        #[source]
        source: Box<ExecError>,
    },
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("script is truncated: {section} needs {needed} bytes, {available} left")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("string literal #{index} is not terminated")]
    UnterminatedString { index: usize },

    #[error("string literal #{index} is not valid UTF-8")]
    InvalidString { index: usize },

    #[error("string literal #{index} contains a NUL byte")]
    NulInString { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AsmError {
    #[error("line {line}: {source}")]
    Lookup {
        line: usize,
        #[source]
        source: LookupError,
    },

    #[error("line {line}: `{mnemonic}` takes {expected} operand(s), got {got}")]
    OperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: operand {value} does not fit in {bits} bits")]
    OperandRange { line: usize, value: i64, bits: u32 },

    #[error("line {line}: cannot parse operand `{token}`")]
    BadOperand { line: usize, token: String },
}
