//! Recurring thunder flashes as a cancelable, clock-driven schedule.
//!
//! A [`ThunderCycle`] holds the single pending deadline of the flash chain.
//! It has no background timer: the owner advances it with the frame clock and
//! applies the returned [`ThunderEvent`]s. Dropping the cycle cancels the
//! whole chain, so nothing can fire after teardown.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;

/// Delay before the first flash after a storm begins.
const FIRST_FLASH_MS: Range<u64> = 100..300;
/// How long a flash stays lit.
const FLASH_MS: Range<u64> = 100..300;
/// Quiet time between the end of one flash and the next.
const GAP_MS: Range<u64> = 2000..5000;

/// Upper bound on events handled in a single advance, so a huge clock jump
/// cannot spin.
const MAX_EVENTS_PER_ADVANCE: usize = 64;

/// Where the cycle is, with the deadline of its one pending transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThunderPhase {
    Waiting { fire_at: Duration },
    Flashing { restore_at: Duration },
}

/// A transition the owner must apply to the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThunderEvent {
    FlashStart,
    FlashEnd,
}

#[derive(Clone, Debug)]
pub struct ThunderCycle {
    phase: ThunderPhase,
}

impl ThunderCycle {
    /// Arm a cycle whose first flash fires 100-300 ms after `now`.
    pub fn arm(now: Duration, rng: &mut impl Rng) -> Self {
        let fire_at = now + Duration::from_millis(rng.random_range(FIRST_FLASH_MS));
        tracing::debug!(?fire_at, "Thunder armed");
        Self {
            phase: ThunderPhase::Waiting { fire_at },
        }
    }

    pub fn phase(&self) -> ThunderPhase {
        self.phase
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self.phase, ThunderPhase::Flashing { .. })
    }

    /// The deadline of the pending transition.
    pub fn next_deadline(&self) -> Duration {
        match self.phase {
            ThunderPhase::Waiting { fire_at } => fire_at,
            ThunderPhase::Flashing { restore_at } => restore_at,
        }
    }

    /// Fire every transition due at or before `now`, in order.
    ///
    /// Follow-up deadlines are measured from the deadline that produced them,
    /// not from `now`, so frame jitter does not stretch the cycle.
    pub fn advance(&mut self, now: Duration, rng: &mut impl Rng) -> Vec<ThunderEvent> {
        let mut events = Vec::new();
        while self.next_deadline() <= now && events.len() < MAX_EVENTS_PER_ADVANCE {
            match self.phase {
                ThunderPhase::Waiting { fire_at } => {
                    let restore_at = fire_at + Duration::from_millis(rng.random_range(FLASH_MS));
                    self.phase = ThunderPhase::Flashing { restore_at };
                    events.push(ThunderEvent::FlashStart);
                }
                ThunderPhase::Flashing { restore_at } => {
                    let fire_at = restore_at + Duration::from_millis(rng.random_range(GAP_MS));
                    self.phase = ThunderPhase::Waiting { fire_at };
                    events.push(ThunderEvent::FlashEnd);
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_flash_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let cycle = ThunderCycle::arm(ms(1000), &mut rng);
            let d = cycle.next_deadline();
            assert!(d >= ms(1100) && d < ms(1300));
        }
    }

    #[test]
    fn test_nothing_fires_early() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut cycle = ThunderCycle::arm(ms(0), &mut rng);
        assert!(cycle.advance(ms(99), &mut rng).is_empty());
        assert!(!cycle.is_flashing());
    }

    #[test]
    fn test_flash_then_restore_then_gap() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut cycle = ThunderCycle::arm(ms(0), &mut rng);
        let fire = cycle.next_deadline();
        assert_eq!(cycle.advance(fire, &mut rng), vec![ThunderEvent::FlashStart]);
        assert!(cycle.is_flashing());

        let restore = cycle.next_deadline();
        let lit = restore - fire;
        assert!(lit >= ms(100) && lit < ms(300));
        assert_eq!(cycle.advance(restore, &mut rng), vec![ThunderEvent::FlashEnd]);

        let gap = cycle.next_deadline() - restore;
        assert!(gap >= ms(2000) && gap < ms(5000));
    }

    #[test]
    fn test_large_jump_fires_in_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut cycle = ThunderCycle::arm(ms(0), &mut rng);
        let events = cycle.advance(ms(60_000), &mut rng);
        assert!(events.len() >= 2);
        for pair in events.chunks(2) {
            assert_eq!(pair[0], ThunderEvent::FlashStart);
            if pair.len() == 2 {
                assert_eq!(pair[1], ThunderEvent::FlashEnd);
            }
        }
        assert!(cycle.next_deadline() > ms(60_000));
    }
}
