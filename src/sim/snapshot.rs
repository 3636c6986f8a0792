//! Immutable per-tick render view
//!
//! The presentation layer reads only this; it never touches `GameState`
//! directly. Taken once per frame after the tick ran.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState, ItemKind};

/// One falling item as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub kind: ItemKind,
    pub glyph: char,
}

/// The player box as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub width: f32,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<ItemView>,
    pub player: PlayerView,
    pub score: u64,
    pub lives: u8,
    /// Animation cue: food is near the player's mouth
    pub chomping: bool,
    /// Animation cue: recent bomb hit still flashing
    pub hurt_pulse: bool,
    pub phase: GamePhase,
}

impl GameState {
    /// Publish the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self
                .items
                .iter()
                .map(|i| ItemView {
                    id: i.id,
                    x: i.pos.x,
                    y: i.pos.y,
                    kind: i.kind,
                    glyph: i.glyph,
                })
                .collect(),
            player: PlayerView {
                x: self.player.x,
                width: self.player.width,
            },
            score: self.ledger.score(),
            lives: self.ledger.lives(),
            chomping: self.chomping,
            hurt_pulse: self.hurt_pulse > 0,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CHARACTERS;
    use crate::consts::*;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(11, &CHARACTERS[1]);
        for _ in 0..SPAWN_INTERVAL_TICKS {
            tick(&mut state, &TickInput::default());
        }

        let snap = state.snapshot();
        assert_eq!(snap.score, state.score());
        assert_eq!(snap.lives, state.lives());
        assert_eq!(snap.items.len(), state.items.len());
        assert_eq!(snap.player.x, state.player.x);
        assert_eq!(snap.phase, GamePhase::Running);
        assert!(!snap.hurt_pulse);

        let item = &snap.items[0];
        assert_eq!(item.id, state.items[0].id);
        assert_eq!(item.y, state.items[0].pos.y);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(12, &CHARACTERS[0]);
        let snap = state.snapshot();
        let json = serde_json::to_string(&snap).expect("snapshot should serialize");
        assert!(json.contains("\"score\":0"));
    }
}
