use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::compiler::signature::ArgSignature;
use crate::error::{ConfigError, LookupError};
use crate::vm::opcode::Opcode;
use crate::vm::segment::Segment;
use crate::vm::segmenter::{OpcodeSegmenter, Reservation};

/// Whether an instruction leaves a value on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Instruction,
    /// Pushes one value; `return_type` is `l`, `s` or `f`.
    Function { return_type: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDescriptor {
    pub mnemonic: String,
    pub signature: ArgSignature,
    pub opcode: Opcode,
    pub kind: InstructionKind,
}

/// Mnemonic → opcode registry consulted by the compiler.
///
/// Keywords are case-insensitive in scripts, so mnemonics are stored
/// lowercased.
#[derive(Debug, Default)]
pub struct InstructionTable {
    by_mnemonic: HashMap<String, InstructionDescriptor>,
    by_opcode: BTreeMap<Opcode, String>,
    segmenter: OpcodeSegmenter,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, group: &str, segment: Segment, base: u32, count: u32) -> Result<Reservation, ConfigError> {
        self.segmenter.reserve(group, segment, base, count)
    }

    pub fn reserve_core(&mut self, group: &str, segment: Segment, base: u32, count: u32) -> Result<Reservation, ConfigError> {
        self.segmenter.reserve_core(group, segment, base, count)
    }

    pub fn segmenter(&self) -> &OpcodeSegmenter {
        &self.segmenter
    }

    pub fn register_instruction(&mut self, mnemonic: &str, signature: &str, opcode: Opcode) -> Result<(), ConfigError> {
        self.insert(mnemonic, signature, opcode, InstructionKind::Instruction)
    }

    pub fn register_function(
        &mut self,
        mnemonic: &str,
        return_type: char,
        signature: &str,
        opcode: Opcode,
    ) -> Result<(), ConfigError> {
        if !matches!(return_type, 'l' | 's' | 'f') {
            return Err(ConfigError::InvalidReturnType {
                mnemonic: mnemonic.to_string(),
                return_type,
            });
        }
        self.insert(mnemonic, signature, opcode, InstructionKind::Function { return_type })
    }

    /// All checks run before anything is inserted, so a failed call leaves
    /// the table as it was.
    fn insert(&mut self, mnemonic: &str, signature: &str, opcode: Opcode, kind: InstructionKind) -> Result<(), ConfigError> {
        let key = mnemonic.to_ascii_lowercase();
        if self.by_mnemonic.contains_key(&key) {
            return Err(ConfigError::DuplicateMnemonic { mnemonic: key });
        }

        let signature = ArgSignature::parse(signature).map_err(|reason| ConfigError::InvalidSignature {
            mnemonic: key.clone(),
            signature: signature.to_string(),
            reason,
        })?;

        if self.segmenter.owner(opcode).is_none() {
            return Err(ConfigError::Unreserved { mnemonic: key, opcode });
        }

        if let Some(other) = self.by_opcode.get(&opcode) {
            return Err(ConfigError::OpcodeTaken {
                mnemonic: key,
                other: other.clone(),
                opcode,
            });
        }

        trace!(mnemonic = %key, %opcode, "registered instruction");
        self.by_opcode.insert(opcode, key.clone());
        self.by_mnemonic.insert(
            key.clone(),
            InstructionDescriptor {
                mnemonic: key,
                signature,
                opcode,
                kind,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, mnemonic: &str) -> Result<&InstructionDescriptor, LookupError> {
        self.by_mnemonic
            .get(&mnemonic.to_ascii_lowercase())
            .ok_or_else(|| LookupError::UnknownInstruction {
                mnemonic: mnemonic.to_string(),
            })
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.by_mnemonic.contains_key(&mnemonic.to_ascii_lowercase())
    }

    pub fn by_opcode(&self, opcode: Opcode) -> Option<&InstructionDescriptor> {
        self.by_opcode.get(&opcode).and_then(|m| self.by_mnemonic.get(m))
    }

    /// Descriptors ordered by opcode.
    pub fn iter(&self) -> impl Iterator<Item = &InstructionDescriptor> + '_ {
        self.by_opcode.values().filter_map(|m| self.by_mnemonic.get(m))
    }

    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        self.by_opcode.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_mnemonic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mnemonic.is_empty()
    }
}
