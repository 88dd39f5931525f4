//! Deterministic strategies for tests and experiments.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tank_battle_core::{Action, BattleInfo, PlayerId, TankStrategy};

/// Shared log of every battle info a scripted strategy received.
pub type BattleInfoInbox = Rc<RefCell<Vec<BattleInfo>>>;

/// Replays a fixed list of requests, then idles with [`Action::DoNothing`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedStrategy {
    actions: VecDeque<Action>,
    inbox: Option<BattleInfoInbox>,
}

impl ScriptedStrategy {
    /// Creates a strategy issuing `actions` in order.
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            inbox: None,
        }
    }

    /// Records every received battle info into `inbox`.
    #[must_use]
    pub fn with_inbox(mut self, inbox: BattleInfoInbox) -> Self {
        self.inbox = Some(inbox);
        self
    }
}

impl TankStrategy for ScriptedStrategy {
    fn next_action(&mut self) -> Action {
        self.actions.pop_front().unwrap_or(Action::DoNothing)
    }

    fn update_battle_info(&mut self, info: BattleInfo) {
        if let Some(inbox) = &self.inbox {
            inbox.borrow_mut().push(info);
        }
    }
}

/// Picks uniformly among all nine requests using a seeded generator.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: ChaCha8Rng,
}

impl RandomStrategy {
    /// Creates a strategy whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derives a distinct stream for each tank from a shared game seed.
    #[must_use]
    pub fn for_tank(seed: u64, player: PlayerId, player_tank_index: u32) -> Self {
        let stream = (u64::from(player.number()) << 32) | u64::from(player_tank_index);
        Self::new(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl TankStrategy for RandomStrategy {
    fn next_action(&mut self) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }

    fn update_battle_info(&mut self, _info: BattleInfo) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::info_from_rows;

    #[test]
    fn scripted_strategy_idles_after_its_script() {
        let mut strategy = ScriptedStrategy::new([Action::Shoot, Action::RotateLeft45]);

        assert_eq!(strategy.next_action(), Action::Shoot);
        assert_eq!(strategy.next_action(), Action::RotateLeft45);
        assert_eq!(strategy.next_action(), Action::DoNothing);
        assert_eq!(strategy.next_action(), Action::DoNothing);
    }

    #[test]
    fn scripted_strategy_records_battle_info() {
        let inbox = BattleInfoInbox::default();
        let mut strategy = ScriptedStrategy::default().with_inbox(Rc::clone(&inbox));

        strategy.update_battle_info(info_from_rows(&["%1"], PlayerId::Two, 3));

        assert_eq!(inbox.borrow().len(), 1);
        assert_eq!(inbox.borrow()[0].initial_ammo(), 3);
    }

    #[test]
    fn random_strategy_is_reproducible_per_seed() {
        let mut first = RandomStrategy::for_tank(7, PlayerId::One, 0);
        let mut second = RandomStrategy::for_tank(7, PlayerId::One, 0);
        let mut sibling = RandomStrategy::for_tank(7, PlayerId::One, 1);

        let a: Vec<_> = (0..32).map(|_| first.next_action()).collect();
        let b: Vec<_> = (0..32).map(|_| second.next_action()).collect();
        let c: Vec<_> = (0..32).map(|_| sibling.next_action()).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
