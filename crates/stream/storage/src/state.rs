//! The reconciled chain state.

use crate::ChainStateError;
use blockstream_schema::BlockRef;
use serde::{Deserialize, Serialize};

/// The last reconciled view of the chain.
///
/// Holds a contiguous, hash-linked segment of recent blocks ending at the tip,
/// and the announced range: every block numbered from `first_announceable` up
/// to `last_announced` has been announced downstream. Announcements always
/// cover a contiguous run of the chain, so two numbers describe them.
///
/// Blocks below `first_announceable` are never announced. After a bootstrap it
/// is the bootstrap head; the blocks below it only serve reorg detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawChainState")]
pub struct ChainState {
    tracked: Vec<BlockRef>,
    last_announced: Option<u64>,
    first_announceable: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChainState {
    tracked: Vec<BlockRef>,
    last_announced: Option<u64>,
    #[serde(default)]
    first_announceable: u64,
}

impl TryFrom<RawChainState> for ChainState {
    type Error = ChainStateError;

    fn try_from(raw: RawChainState) -> Result<Self, Self::Error> {
        Self::new(raw.tracked, raw.last_announced)?.with_first_announceable(raw.first_announceable)
    }
}

impl ChainState {
    /// Creates a new [`ChainState`] from an ascending chain segment.
    ///
    /// Every block may be announced; see
    /// [`with_first_announceable`](Self::with_first_announceable).
    pub fn new(tracked: Vec<BlockRef>, last_announced: Option<u64>) -> Result<Self, ChainStateError> {
        let state = Self { tracked, last_announced, first_announceable: 0 };
        state.validate()?;
        Ok(state)
    }

    /// Creates the state of a fresh deployment: nothing is announced yet, and
    /// announcements start at the tip.
    pub fn bootstrapped(tracked: Vec<BlockRef>) -> Result<Self, ChainStateError> {
        let first_announceable = tracked.last().map_or(0, |tip| tip.number);
        Self::new(tracked, None)?.with_first_announceable(first_announceable)
    }

    /// Sets the lowest block number that may be announced.
    pub fn with_first_announceable(mut self, number: u64) -> Result<Self, ChainStateError> {
        self.first_announceable = number;
        self.validate()?;
        Ok(self)
    }

    /// Checks the segment invariants.
    pub fn validate(&self) -> Result<(), ChainStateError> {
        let tip = self.tracked.last().ok_or(ChainStateError::Empty)?;

        if let Some(pair) = self.tracked.windows(2).find(|pair| !pair[0].is_parent_of(&pair[1])) {
            return Err(ChainStateError::Discontinuous {
                parent: pair[0].number,
                child: pair[1].number,
            });
        }

        match self.last_announced {
            Some(watermark) if watermark > tip.number => {
                Err(ChainStateError::WatermarkAboveTip { watermark, tip: tip.number })
            }
            Some(watermark) if watermark < self.first_announceable => {
                Err(ChainStateError::WatermarkBelowFloor {
                    watermark,
                    first_announceable: self.first_announceable,
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns the tip.
    pub fn tip(&self) -> &BlockRef {
        // Never empty once constructed.
        &self.tracked[self.tracked.len() - 1]
    }

    /// Returns the oldest tracked block.
    pub fn oldest(&self) -> &BlockRef {
        &self.tracked[0]
    }

    /// Returns the tracked segment, oldest first.
    pub fn tracked(&self) -> &[BlockRef] {
        &self.tracked
    }

    /// Returns the announcement watermark.
    pub const fn last_announced(&self) -> Option<u64> {
        self.last_announced
    }

    /// Returns the lowest block number that may be announced.
    pub const fn first_announceable(&self) -> u64 {
        self.first_announceable
    }

    /// Returns true if the block at `number` has been announced.
    pub fn is_announced(&self, number: u64) -> bool {
        number >= self.first_announceable &&
            self.last_announced.is_some_and(|watermark| number <= watermark)
    }

    /// Returns the tracked block at `number`.
    pub fn block_at(&self, number: u64) -> Option<&BlockRef> {
        let offset = number.checked_sub(self.oldest().number)?;
        self.tracked.get(usize::try_from(offset).ok()?)
    }

    /// Returns true if `block` is tracked.
    pub fn contains(&self, block: &BlockRef) -> bool {
        self.block_at(block.number).is_some_and(|tracked| tracked.hash == block.hash)
    }

    /// Returns the tracked blocks above `number`, highest first.
    pub fn blocks_above(&self, number: u64) -> impl Iterator<Item = &BlockRef> {
        self.tracked.iter().rev().take_while(move |block| block.number > number)
    }

    /// Drops all but the `window` most recent blocks.
    pub fn trim(&mut self, window: usize) {
        let excess = self.tracked.len().saturating_sub(window.max(1));
        self.tracked.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn chain(from: u64, to: u64) -> Vec<BlockRef> {
        (from..=to)
            .map(|n| BlockRef::new(n, B256::with_last_byte(n as u8), B256::with_last_byte(n as u8 - 1)))
            .collect()
    }

    #[test]
    fn test_new_validates_segment() {
        assert_eq!(ChainState::new(vec![], None), Err(ChainStateError::Empty));

        let mut gap = chain(10, 12);
        gap.remove(1);
        assert_eq!(
            ChainState::new(gap, None),
            Err(ChainStateError::Discontinuous { parent: 10, child: 12 })
        );

        let mut forked = chain(10, 12);
        forked[2].parent_hash = B256::repeat_byte(0xff);
        assert!(ChainState::new(forked, None).is_err());

        assert_eq!(
            ChainState::new(chain(10, 12), Some(13)),
            Err(ChainStateError::WatermarkAboveTip { watermark: 13, tip: 12 })
        );
    }

    #[test]
    fn test_lookups() {
        let state = ChainState::new(chain(10, 14), Some(11)).unwrap();

        assert_eq!(state.tip().number, 14);
        assert_eq!(state.oldest().number, 10);
        assert_eq!(state.block_at(12).map(|b| b.number), Some(12));
        assert!(state.block_at(9).is_none());
        assert!(state.block_at(15).is_none());
        assert!(state.contains(&state.tracked()[3]));
        assert!(!state.contains(&BlockRef::new(13, B256::ZERO, B256::ZERO)));
        assert!(state.is_announced(11));
        assert!(!state.is_announced(12));

        let above: Vec<_> = state.blocks_above(12).map(|b| b.number).collect();
        assert_eq!(above, vec![14, 13]);
    }

    #[test]
    fn test_trim_keeps_most_recent() {
        let mut state = ChainState::new(chain(10, 19), None).unwrap();
        state.trim(4);

        assert_eq!(state.tracked().len(), 4);
        assert_eq!(state.oldest().number, 16);
        assert_eq!(state.tip().number, 19);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_bootstrapped_state_has_announced_nothing() {
        let state = ChainState::bootstrapped(chain(10, 14)).unwrap();

        assert_eq!(state.first_announceable(), 14);
        assert_eq!(state.last_announced(), None);
        assert!((10..=14).all(|n| !state.is_announced(n)));
    }

    #[test]
    fn test_blocks_below_the_floor_are_never_announced() {
        let state = ChainState::new(chain(10, 14), Some(13))
            .unwrap()
            .with_first_announceable(12)
            .unwrap();

        assert!(!state.is_announced(11));
        assert!(state.is_announced(12));
        assert!(state.is_announced(13));
        assert!(!state.is_announced(14));

        assert_eq!(
            ChainState::new(chain(10, 14), Some(11)).unwrap().with_first_announceable(12),
            Err(ChainStateError::WatermarkBelowFloor { watermark: 11, first_announceable: 12 })
        );
        // The floor may sit above the tip after the chain got shorter.
        assert!(ChainState::new(chain(10, 14), None).unwrap().with_first_announceable(20).is_ok());
    }

    #[test]
    fn test_deserialize_rejects_broken_segment() {
        let mut broken = chain(1, 3);
        broken[1].parent_hash = B256::repeat_byte(0xee);
        let json = serde_json::json!({ "tracked": broken, "lastAnnounced": null });

        assert!(serde_json::from_value::<ChainState>(json).is_err());

        let json = serde_json::json!({
            "tracked": chain(1, 3),
            "lastAnnounced": 1,
            "firstAnnounceable": 2
        });
        assert!(serde_json::from_value::<ChainState>(json).is_err());
    }

    #[test]
    fn test_deserialize_defaults_floor_to_genesis() {
        let json = serde_json::json!({ "tracked": chain(1, 3), "lastAnnounced": 2 });
        let state: ChainState = serde_json::from_value(json).unwrap();

        assert_eq!(state.first_announceable(), 0);
        assert!(state.is_announced(1));
    }

    #[test]
    fn test_json_round_trip() {
        let state =
            ChainState::new(chain(5, 8), Some(6)).unwrap().with_first_announceable(6).unwrap();
        let decoded: ChainState = serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(decoded, state);
    }
}
