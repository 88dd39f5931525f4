//! Side controllers that turn satellite views into battle info.

use std::collections::BTreeSet;

use tank_battle_core::{BattleInfo, CellCoord, Player, PlayerId, SatelliteView, TankStrategy};
use tracing::debug;

/// Hands every requesting tank a plain snapshot without a target.
#[derive(Clone, Debug)]
pub struct DefensivePlayer {
    player: PlayerId,
    num_shells: u32,
}

impl DefensivePlayer {
    /// Creates the controller for `player` whose tanks start with `num_shells`.
    #[must_use]
    pub const fn new(player: PlayerId, num_shells: u32) -> Self {
        Self { player, num_shells }
    }
}

impl Player for DefensivePlayer {
    fn update_tank_with_battle_info(
        &mut self,
        strategy: &mut dyn TankStrategy,
        view: &dyn SatelliteView,
    ) {
        strategy.update_battle_info(BattleInfo::from_view(view, self.player, self.num_shells));
    }
}

/// Assigns each requesting tank the closest visible enemy as its target.
///
/// Enemies already handed to a sibling tank are skipped while others remain,
/// spreading the fleet across targets. Assignments vanish once their enemy is
/// no longer visible.
#[derive(Clone, Debug)]
pub struct AggressivePlayer {
    player: PlayerId,
    num_shells: u32,
    assigned: BTreeSet<CellCoord>,
}

impl AggressivePlayer {
    /// Creates the controller for `player` whose tanks start with `num_shells`.
    #[must_use]
    pub const fn new(player: PlayerId, num_shells: u32) -> Self {
        Self {
            player,
            num_shells,
            assigned: BTreeSet::new(),
        }
    }

    fn pick_target(&mut self, info: &BattleInfo, enemies: &[CellCoord]) -> Option<CellCoord> {
        let origin = info.self_cell()?;
        let (columns, rows) = info.dimensions();
        let distance = |cell: &&CellCoord| torus_distance_squared(origin, **cell, columns, rows);

        let fresh = enemies
            .iter()
            .filter(|cell| !self.assigned.contains(*cell))
            .min_by_key(distance);
        if let Some(&target) = fresh {
            let _ = self.assigned.insert(target);
            return Some(target);
        }

        enemies.iter().min_by_key(distance).copied()
    }
}

impl Player for AggressivePlayer {
    fn update_tank_with_battle_info(
        &mut self,
        strategy: &mut dyn TankStrategy,
        view: &dyn SatelliteView,
    ) {
        let info = BattleInfo::from_view(view, self.player, self.num_shells);
        let enemies: Vec<CellCoord> = info.enemy_tanks().collect();
        self.assigned.retain(|cell| enemies.contains(cell));

        let target = self.pick_target(&info, &enemies);
        debug!(player = self.player.number(), ?target, "target assigned");
        strategy.update_battle_info(info.with_target(target));
    }
}

fn torus_distance_squared(from: CellCoord, to: CellCoord, columns: u32, rows: u32) -> u64 {
    let axis = |a: u32, b: u32, extent: u32| {
        let direct = a.abs_diff(b);
        u64::from(direct.min(extent.saturating_sub(direct)))
    };
    let dx = axis(from.column(), to.column(), columns);
    let dy = axis(from.row(), to.row(), rows);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scripted::{BattleInfoInbox, ScriptedStrategy},
        test_support::GridView,
    };
    use std::rc::Rc;

    fn request(player: &mut dyn Player, rows: &[&str]) -> BattleInfo {
        let inbox = BattleInfoInbox::default();
        let mut strategy = ScriptedStrategy::default().with_inbox(Rc::clone(&inbox));
        player.update_tank_with_battle_info(&mut strategy, &GridView::new(rows));
        let info = inbox.borrow_mut().pop();
        info.expect("battle info delivered")
    }

    #[test]
    fn defensive_player_hands_out_plain_info() {
        let mut player = DefensivePlayer::new(PlayerId::One, 5);

        let info = request(&mut player, &["% 2"]);

        assert_eq!(info.target(), None);
        assert_eq!(info.initial_ammo(), 5);
        assert_eq!(info.self_cell(), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn aggressive_player_targets_the_closest_enemy() {
        let mut player = AggressivePlayer::new(PlayerId::Two, 1);

        let info = request(&mut player, &["%   1     1  "]);

        assert_eq!(info.target(), Some(CellCoord::new(10, 0)));
    }

    #[test]
    fn aggressive_player_spreads_siblings_over_enemies() {
        let mut player = AggressivePlayer::new(PlayerId::Two, 1);

        let first = request(&mut player, &["%2 1     1"]);
        let second = request(&mut player, &["2% 1     1"]);
        let third = request(&mut player, &["22%1     1"]);

        assert_eq!(first.target(), Some(CellCoord::new(9, 0)));
        assert_eq!(second.target(), Some(CellCoord::new(3, 0)));
        assert_eq!(third.target(), Some(CellCoord::new(3, 0)));
    }

    #[test]
    fn assignments_expire_when_the_enemy_disappears() {
        let mut player = AggressivePlayer::new(PlayerId::Two, 1);

        let _ = request(&mut player, &["%1         "]);
        let _ = request(&mut player, &["%     1    "]);
        let info = request(&mut player, &["%1  1 1    "]);

        assert_eq!(info.target(), Some(CellCoord::new(1, 0)));
    }
}
