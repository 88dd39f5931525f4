#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure event consumer that renders the per-turn battle log.

use tank_battle_core::{Event, TankId};

const DEAD_TANK: &str = "killed";
const IGNORED_SUFFIX: &str = " (ignored)";
const KILLED_SUFFIX: &str = " (killed)";
const SEPARATOR: &str = ", ";

/// Accumulates one log line per turn plus the final result line.
///
/// Every turn opens one slot per spawned tank in creation order. Slots of
/// tanks that never act during the turn keep the `killed` placeholder.
#[derive(Debug, Default)]
pub struct TurnLog {
    tank_count: usize,
    slots: Option<Vec<String>>,
    lines: Vec<String>,
    result: Option<String>,
}

impl TurnLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events in the order they were emitted.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TankSpawned { tank, .. } => {
                    self.tank_count = self.tank_count.max(slot_index(*tank).saturating_add(1));
                }
                Event::TurnStarted { .. } => {
                    self.slots = Some(vec![DEAD_TANK.to_owned(); self.tank_count]);
                }
                Event::ActionReceived { tank, action } => {
                    if let Some(slot) = self.slot_mut(*tank) {
                        *slot = action.name().to_owned();
                    }
                }
                Event::ActionIgnored { tank, .. } => {
                    if let Some(slot) = self.slot_mut(*tank) {
                        slot.push_str(IGNORED_SUFFIX);
                    }
                }
                Event::TankDestroyed { tank, .. } => {
                    if let Some(slot) = self.slot_mut(*tank) {
                        slot.push_str(KILLED_SUFFIX);
                    }
                }
                Event::GameEnded { outcome } => {
                    self.result = Some(outcome.result_line());
                }
                _ => {}
            }
        }
    }

    /// Closes the open turn, returning its rendered line.
    pub fn finish_turn(&mut self) -> Option<String> {
        let slots = self.slots.take()?;
        let line = slots.join(SEPARATOR);
        self.lines.push(line.clone());
        Some(line)
    }

    /// Rendered lines of every finished turn.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Final result line once the game ended.
    #[must_use]
    pub fn result_line(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Full log text: every turn line followed by the result line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::new();
        for line in self.lines.iter().chain(self.result.as_ref()) {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    fn slot_mut(&mut self, tank: TankId) -> Option<&mut String> {
        self.slots.as_mut()?.get_mut(slot_index(tank))
    }
}

fn slot_index(tank: TankId) -> usize {
    usize::try_from(tank.get()).unwrap_or(usize::MAX)
}
