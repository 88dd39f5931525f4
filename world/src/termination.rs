//! Winner detection, the exhausted-ammunition countdown and the turn cap.

use tank_battle_core::{Event, GameOutcome, PlayerId};

#[derive(Clone, Debug)]
pub(crate) struct TerminationTracker {
    max_steps: u32,
    countdown_length: u32,
    remaining: Option<u32>,
}

impl TerminationTracker {
    pub(crate) const fn new(max_steps: u32, countdown_length: u32) -> Self {
        Self {
            max_steps,
            countdown_length,
            remaining: None,
        }
    }

    /// Turns left on the ammunition countdown once it started.
    pub(crate) const fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Decides whether the game is over after `turn` turns.
    ///
    /// `live_tanks` is indexed by [`PlayerId::index`]. The countdown starts at the
    /// first evaluation that finds no ammunition and ticks on every later one;
    /// ammunition never comes back so it is never reset.
    pub(crate) fn evaluate(
        &mut self,
        turn: u32,
        live_tanks: [u32; 2],
        any_ammo: bool,
        out_events: &mut Vec<Event>,
    ) -> Option<GameOutcome> {
        let [player_one_tanks, player_two_tanks] = live_tanks;
        match (player_one_tanks, player_two_tanks) {
            (0, 0) => return Some(GameOutcome::TieNoTanks),
            (0, tanks_remaining) => {
                return Some(GameOutcome::Victory {
                    winner: PlayerId::Two,
                    tanks_remaining,
                })
            }
            (tanks_remaining, 0) => {
                return Some(GameOutcome::Victory {
                    winner: PlayerId::One,
                    tanks_remaining,
                })
            }
            _ => {}
        }

        if !any_ammo {
            match self.remaining {
                None => {
                    self.remaining = Some(self.countdown_length);
                    out_events.push(Event::AmmoCountdownStarted {
                        turns: self.countdown_length,
                    });
                }
                Some(remaining) => {
                    let remaining = remaining.saturating_sub(1);
                    self.remaining = Some(remaining);
                    if remaining == 0 {
                        return Some(GameOutcome::TieAmmoExhausted {
                            countdown: self.countdown_length,
                        });
                    }
                }
            }
        }

        if turn >= self.max_steps {
            return Some(GameOutcome::TieMaxSteps {
                max_steps: self.max_steps,
                player_one_tanks,
                player_two_tanks,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_without_tanks_loses() {
        let mut tracker = TerminationTracker::new(10, 40);
        let mut events = Vec::new();

        assert_eq!(
            tracker.evaluate(1, [0, 2], true, &mut events),
            Some(GameOutcome::Victory {
                winner: PlayerId::Two,
                tanks_remaining: 2,
            })
        );
        assert_eq!(
            tracker.evaluate(1, [0, 0], true, &mut events),
            Some(GameOutcome::TieNoTanks)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn countdown_ends_after_configured_evaluations() {
        let mut tracker = TerminationTracker::new(1_000, 3);
        let mut events = Vec::new();

        assert_eq!(tracker.evaluate(1, [1, 1], false, &mut events), None);
        assert_eq!(events, vec![Event::AmmoCountdownStarted { turns: 3 }]);
        assert_eq!(tracker.evaluate(2, [1, 1], false, &mut events), None);
        assert_eq!(tracker.evaluate(3, [1, 1], false, &mut events), None);
        assert_eq!(tracker.remaining(), Some(1));
        assert_eq!(
            tracker.evaluate(4, [1, 1], false, &mut events),
            Some(GameOutcome::TieAmmoExhausted { countdown: 3 })
        );
    }

    #[test]
    fn winner_preempts_running_countdown() {
        let mut tracker = TerminationTracker::new(1_000, 2);
        let mut events = Vec::new();

        assert_eq!(tracker.evaluate(1, [1, 1], false, &mut events), None);
        assert_eq!(
            tracker.evaluate(2, [1, 0], false, &mut events),
            Some(GameOutcome::Victory {
                winner: PlayerId::One,
                tanks_remaining: 1,
            })
        );
    }

    #[test]
    fn turn_cap_reports_remaining_tanks() {
        let mut tracker = TerminationTracker::new(5, 40);
        let mut events = Vec::new();

        assert_eq!(tracker.evaluate(4, [2, 1], true, &mut events), None);
        assert_eq!(
            tracker.evaluate(5, [2, 1], true, &mut events),
            Some(GameOutcome::TieMaxSteps {
                max_steps: 5,
                player_one_tanks: 2,
                player_two_tanks: 1,
            })
        );
    }
}
