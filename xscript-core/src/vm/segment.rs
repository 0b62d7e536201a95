//! Partitioning of the 32-bit instruction word.
//!
//! Layout of a code word per segment:
//!
//! | segment | selector           | opcode field | inline arguments          |
//! |---------|--------------------|--------------|---------------------------|
//! | 0       | `00` (31..30)      | 29..24       | arg0 = 23..0              |
//! | 1       | `01`               | 29..24       | arg0 = 23..12, arg1 = 11..0 |
//! | 2       | `10`               | 29..20       | arg0 = 19..0              |
//! | 3       | `110000` (31..26)  | 25..8        | arg0 = 7..0               |
//! | 4       | `110001`           | 25..16       | arg0 = 15..8, arg1 = 7..0 |
//! | 5       | `110010`           | 25..0        | none                      |
//!
//! Opcode values are part of the compiled bytecode, so this table must stay
//! stable across builds.

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum, EnumIter, Display, Serialize, Deserialize,
)]
pub enum Segment {
    #[strum(serialize = "segment 0")]
    Zero,
    #[strum(serialize = "segment 1")]
    One,
    #[strum(serialize = "segment 2")]
    Two,
    #[strum(serialize = "segment 3")]
    Three,
    #[strum(serialize = "segment 4")]
    Four,
    #[strum(serialize = "segment 5")]
    Five,
}

/// Which part of a segment a range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    Core,
    Extension,
}

const SELECTOR_THREE: u32 = 0x30;
const SELECTOR_FOUR: u32 = 0x31;
const SELECTOR_FIVE: u32 = 0x32;

impl Segment {
    /// Number of inline arguments carried by the code word, which is also the
    /// handler arity.
    pub const fn arity(self) -> usize {
        match self {
            Segment::Zero | Segment::Two | Segment::Three => 1,
            Segment::One | Segment::Four => 2,
            Segment::Five => 0,
        }
    }

    /// Exclusive upper bound of the opcode field.
    pub const fn opcode_limit(self) -> u32 {
        match self {
            Segment::Zero | Segment::One => 0x40,
            Segment::Two | Segment::Four => 0x400,
            Segment::Three => 0x40000,
            Segment::Five => 0x400_0000,
        }
    }

    /// Bit width of each inline argument.
    pub const fn arg_bits(self) -> [u32; 2] {
        match self {
            Segment::Zero => [24, 0],
            Segment::One => [12, 12],
            Segment::Two => [20, 0],
            Segment::Three => [8, 0],
            Segment::Four => [8, 8],
            Segment::Five => [0, 0],
        }
    }

    /// First opcode of the extension region, if the segment has one.
    pub const fn extension_base(self) -> Option<u32> {
        match self {
            Segment::Three => Some(0x20000),
            Segment::Five => Some(0x200_0000),
            _ => None,
        }
    }

    /// The region `[start, end)` covers within this segment.
    pub const fn region_bounds(self, region: Region) -> (u32, u32) {
        match (region, self.extension_base()) {
            (Region::Core, Some(base)) => (0, base),
            (Region::Core, None) => (0, self.opcode_limit()),
            (Region::Extension, Some(base)) => (base, self.opcode_limit()),
            (Region::Extension, None) => (0, 0),
        }
    }

    pub const fn region_of(self, code: u32) -> Region {
        match self.extension_base() {
            Some(base) if code >= base => Region::Extension,
            _ => Region::Core,
        }
    }

    /// Classify a code word by its selector bits.
    pub fn of_word(word: u32) -> Option<Segment> {
        match word >> 30 {
            0 => return Some(Segment::Zero),
            1 => return Some(Segment::One),
            2 => return Some(Segment::Two),
            _ => {}
        }

        match word >> 26 {
            SELECTOR_THREE => Some(Segment::Three),
            SELECTOR_FOUR => Some(Segment::Four),
            SELECTOR_FIVE => Some(Segment::Five),
            _ => None,
        }
    }

    /// Pack an opcode and its inline arguments. Out-of-range fields are masked;
    /// callers validate ranges beforehand.
    pub fn encode(self, code: u32, args: [u32; 2]) -> u32 {
        let [a0, a1] = args;
        match self {
            Segment::Zero => ((code & 0x3f) << 24) | (a0 & 0xff_ffff),
            Segment::One => 0x4000_0000 | ((code & 0x3f) << 24) | ((a0 & 0xfff) << 12) | (a1 & 0xfff),
            Segment::Two => 0x8000_0000 | ((code & 0x3ff) << 20) | (a0 & 0xf_ffff),
            Segment::Three => (SELECTOR_THREE << 26) | ((code & 0x3_ffff) << 8) | (a0 & 0xff),
            Segment::Four => (SELECTOR_FOUR << 26) | ((code & 0x3ff) << 16) | ((a0 & 0xff) << 8) | (a1 & 0xff),
            Segment::Five => (SELECTOR_FIVE << 26) | (code & 0x3ff_ffff),
        }
    }

    /// Split a word already known to belong to this segment.
    pub fn split(self, word: u32) -> (u32, [u32; 2]) {
        match self {
            Segment::Zero => (word >> 24, [word & 0xff_ffff, 0]),
            Segment::One => ((word >> 24) & 0x3f, [(word >> 12) & 0xfff, word & 0xfff]),
            Segment::Two => ((word >> 20) & 0x3ff, [word & 0xf_ffff, 0]),
            Segment::Three => ((word >> 8) & 0x3_ffff, [word & 0xff, 0]),
            Segment::Four => ((word >> 16) & 0x3ff, [(word >> 8) & 0xff, word & 0xff]),
            Segment::Five => (word & 0x3ff_ffff, [0, 0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_segment_round_trips_its_selector() {
        for segment in Segment::iter() {
            let code = segment.opcode_limit() - 1;
            let word = segment.encode(code, [1, 1]);
            assert_eq!(Segment::of_word(word), Some(segment), "{segment}");
            let (decoded, _) = segment.split(word);
            assert_eq!(decoded, code);
        }
    }

    #[test]
    fn unused_selectors_are_invalid() {
        assert_eq!(Segment::of_word(0xcc00_0000), None);
        assert_eq!(Segment::of_word(0xffff_ffff), None);
    }

    #[test]
    fn segment_five_word_for_extension_opcode() {
        let word = Segment::Five.encode(0x200_007e, [0, 0]);
        assert_eq!(word, 0xca00_007e);
        assert_eq!(Segment::Five.region_of(0x200_007e), Region::Extension);
        assert_eq!(Segment::Five.region_of(0x1ff_ffff), Region::Core);
    }

    #[test]
    fn segments_without_extension_region() {
        assert_eq!(Segment::Zero.region_bounds(Region::Extension), (0, 0));
        assert_eq!(Segment::Four.region_bounds(Region::Core), (0, 0x400));
    }
}
