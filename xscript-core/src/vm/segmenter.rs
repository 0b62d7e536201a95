use tracing::debug;

use crate::error::ConfigError;
use crate::vm::opcode::Opcode;
use crate::vm::segment::{Region, Segment};

/// A contiguous opcode block `[base, base + count)` owned by one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    group: String,
    segment: Segment,
    base: u32,
    count: u32,
    region: Region,
}

impl Reservation {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// `base + i`, if `i` is inside the block.
    pub fn get(&self, i: u32) -> Option<Opcode> {
        (i < self.count).then(|| Opcode::new(self.segment, self.base + i))
    }

    pub fn opcodes(&self) -> impl Iterator<Item = Opcode> + '_ {
        (self.base..self.base + self.count).map(move |code| Opcode::new(self.segment, code))
    }

    pub fn contains(&self, opcode: Opcode) -> bool {
        opcode.segment == self.segment && (self.base..self.base + self.count).contains(&opcode.code)
    }

    fn overlaps(&self, segment: Segment, base: u32, end: u32) -> bool {
        self.segment == segment && base < self.base + self.count && self.base < end
    }
}

/// Hands out non-overlapping opcode ranges.
///
/// Every check is a startup configuration check; nothing here runs once
/// scripts execute.
#[derive(Debug, Default, Clone)]
pub struct OpcodeSegmenter {
    reservations: Vec<Reservation>,
}

impl OpcodeSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `count` opcodes from `base` in the extension region of `segment`.
    pub fn reserve(&mut self, group: &str, segment: Segment, base: u32, count: u32) -> Result<Reservation, ConfigError> {
        self.reserve_in(Region::Extension, group, segment, base, count)
    }

    /// Reserve a range in the core region. Only the built-in instruction set
    /// should need this.
    pub fn reserve_core(&mut self, group: &str, segment: Segment, base: u32, count: u32) -> Result<Reservation, ConfigError> {
        self.reserve_in(Region::Core, group, segment, base, count)
    }

    fn reserve_in(
        &mut self,
        region: Region,
        group: &str,
        segment: Segment,
        base: u32,
        count: u32,
    ) -> Result<Reservation, ConfigError> {
        if count == 0 {
            return Err(ConfigError::EmptyReservation { group: group.to_string() });
        }

        let end = base as u64 + count as u64;
        let limit = segment.opcode_limit();
        if end > limit as u64 {
            return Err(ConfigError::OutOfSegment {
                segment,
                code: end - 1,
                limit,
            });
        }
        let end = end as u32;

        let (start, stop) = segment.region_bounds(region);
        if base < start || end > stop {
            return Err(ConfigError::RegionViolation {
                group: group.to_string(),
                segment,
                base,
                count,
                region,
            });
        }

        if let Some(other) = self.reservations.iter().find(|r| r.overlaps(segment, base, end)) {
            return Err(ConfigError::RangeOverlap {
                group: group.to_string(),
                other: other.group.clone(),
                segment,
                base,
                count,
            });
        }

        let reservation = Reservation {
            group: group.to_string(),
            segment,
            base,
            count,
            region,
        };
        debug!(group, %segment, base, count, "reserved opcode range");
        self.reservations.push(reservation.clone());
        Ok(reservation)
    }

    /// The reservation holding `opcode`, if any.
    pub fn owner(&self, opcode: Opcode) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.contains(opcode))
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }
}
