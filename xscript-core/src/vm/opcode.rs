use std::fmt;

use crate::error::ExecError;
use crate::vm::segment::Segment;

/// A specific instruction variant: the segment it decodes in plus its value
/// within that segment's opcode field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode {
    pub segment: Segment,
    pub code: u32,
}

impl Opcode {
    pub const fn new(segment: Segment, code: u32) -> Self {
        Self { segment, code }
    }

    pub fn fits(&self) -> bool {
        self.code < self.segment.opcode_limit()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} opcode 0x{:x}", self.segment, self.code)
    }
}

/// A decoded code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub args: [u32; 2],
}

impl Instruction {
    pub fn new(opcode: Opcode, args: [u32; 2]) -> Self {
        Self { opcode, args }
    }

    /// An instruction without inline arguments.
    pub fn bare(opcode: Opcode) -> Self {
        Self::new(opcode, [0, 0])
    }

    pub fn decode(word: u32) -> Result<Self, ExecError> {
        let segment = Segment::of_word(word).ok_or(ExecError::InvalidCode { word })?;
        let (code, args) = segment.split(word);
        Ok(Self::new(Opcode::new(segment, code), args))
    }

    pub fn encode(&self) -> u32 {
        self.opcode.segment.encode(self.opcode.code, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_segment_zero_keeps_the_inline_argument() {
        let inst = Instruction::decode(0x0000_0005).unwrap();
        assert_eq!(inst.opcode, Opcode::new(Segment::Zero, 0));
        assert_eq!(inst.args, [5, 0]);
    }

    #[test]
    fn decode_segment_four_splits_both_arguments() {
        let word = Segment::Four.encode(0x12, [0xab, 0xcd]);
        let inst = Instruction::decode(word).unwrap();
        assert_eq!(inst.opcode, Opcode::new(Segment::Four, 0x12));
        assert_eq!(inst.args, [0xab, 0xcd]);
        assert_eq!(inst.encode(), word);
    }

    #[test]
    fn decode_rejects_unassigned_selector() {
        assert_eq!(
            Instruction::decode(0xd000_0000),
            Err(ExecError::InvalidCode { word: 0xd000_0000 })
        );
    }

    #[test]
    fn display_names_segment_and_value() {
        let opcode = Opcode::new(Segment::Five, 0x200_0080);
        assert_eq!(opcode.to_string(), "segment 5 opcode 0x2000080");
    }
}
