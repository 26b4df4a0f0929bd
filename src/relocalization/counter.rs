use crate::mapping::TrajectoryId;
use crate::relocalization::error::RelocalizationError;

/// Id of the trajectory the next relocalization will finish.
///
/// Trajectory 0 is the frozen reference, so counting starts at 1.
/// Advanced once per relocalization whatever its outcome, never rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryCounter {
    next: u32,
}

impl Default for TrajectoryCounter {
    fn default() -> Self {
        TrajectoryCounter { next: 1 }
    }
}

impl TrajectoryCounter {
    pub fn starting_at(trajectory_id: TrajectoryId) -> TrajectoryCounter {
        TrajectoryCounter {
            next: trajectory_id.0,
        }
    }

    pub fn current(&self) -> TrajectoryId {
        TrajectoryId(self.next)
    }

    /// Returns the current id and moves to the next one.
    ///
    /// Fails without moving once the next id would not fit in a `u32`.
    pub fn advance(&mut self) -> Result<TrajectoryId, RelocalizationError> {
        let current = self.current();
        self.next = self
            .next
            .checked_add(1)
            .ok_or(RelocalizationError::TrajectoryIdsExhausted(current))?;
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_after_reference() {
        assert_eq!(TrajectoryId(1), TrajectoryCounter::default().current());
    }

    #[test]
    fn advance_returns_previous() -> Result<(), RelocalizationError> {
        let mut counter = TrajectoryCounter::starting_at(TrajectoryId(5));
        assert_eq!(TrajectoryId(5), counter.advance()?);
        assert_eq!(TrajectoryId(6), counter.advance()?);
        assert_eq!(TrajectoryId(7), counter.current());
        Ok(())
    }

    #[test]
    fn exhausted_counter_stays_put() {
        let mut counter = TrajectoryCounter::starting_at(TrajectoryId(u32::MAX));
        assert_eq!(
            Err(RelocalizationError::TrajectoryIdsExhausted(TrajectoryId(u32::MAX))),
            counter.advance()
        );
        assert_eq!(TrajectoryId(u32::MAX), counter.current());
    }
}
