//! Run state and core simulation types
//!
//! Everything that defines one playthrough lives here. A new run is always a
//! fresh `GameState`; there is no resume after the terminal phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::characters::Character;
use crate::clamp_to_field;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation frozen, waiting for resume
    Paused,
    /// Run ended; terminal for this state
    Ended,
}

/// What a falling item does on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Food,
    Bomb,
}

/// Glyphs for food items; picked uniformly at spawn
pub const FOOD_GLYPHS: [char; 8] = ['🍎', '🍇', '🍌', '🍑', '🍒', '🧀', '🍩', '🍪'];
/// Glyph for bombs
pub const BOMB_GLYPH: char = '💣';

/// A falling entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Position in 0-100 field coordinates (top-left corner)
    pub pos: Vec2,
    pub kind: ItemKind,
    /// Visual symbol; not behaviorally significant
    pub glyph: char,
    /// Vertical delta per tick, fixed at spawn time
    pub fall_speed: f32,
}

impl FallingItem {
    /// Bounding box for the collision test
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ITEM_SIZE, ITEM_SIZE)
    }
}

/// The player's character on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Left edge, clamped to [0, 100 - width]
    pub x: f32,
    /// Hitbox width; grows once when the size-up threshold is crossed
    pub width: f32,
    /// Latched after the one-time size-up so it never re-fires
    pub sized_up: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 50.0,
            width: PLAYER_START_WIDTH,
            sized_up: false,
        }
    }
}

impl Player {
    /// Move by `dx` and clamp to the field bounds
    pub fn shift(&mut self, dx: f32) {
        self.x = clamp_to_field(self.x + dx, self.width);
    }

    /// Hitbox band near the bottom of the field
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, PLAYER_TOP_Y, self.width, PLAYER_HITBOX_HEIGHT)
    }
}

/// Score and lives bookkeeping with a one-way game-over latch
///
/// Once the latch is set the mutators are inert; a new run replaces the
/// whole state rather than resetting this in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    score: u64,
    lives: u8,
    game_over: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            score: 0,
            lives: MAX_LIVES,
            game_over: false,
        }
    }
}

impl Ledger {
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Food caught: +1 score
    pub fn record_food_eaten(&mut self) {
        if self.game_over {
            return;
        }
        self.score += 1;
    }

    /// Bomb hit: -1 life. Returns whether the run is still alive.
    pub fn record_bomb_hit(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
        }
        !self.game_over
    }
}

/// One-shot signals produced by the tick, drained by the host each frame.
/// These drive audio and view transitions, never gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// Food caught; carries the score after the increment
    FoodEaten { score: u64 },
    /// Bomb hit; carries the lives remaining after the decrement
    BombHit { lives: u8 },
    /// The one-time hitbox size-up triggered
    SizeUp,
    /// Terminal transition; fires exactly once per run
    RunEnded { final_score: u64 },
}

/// Complete state of one run (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG; every random draw of the run flows through this
    pub(crate) rng: Pcg32,
    /// Chosen character (display only; the tick loop never reads it)
    pub character_id: String,
    /// Simulation tick counter, the run's time source
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Live items, ascending by id
    pub items: Vec<FallingItem>,
    pub ledger: Ledger,
    /// Tick of the most recent spawn
    pub last_spawn_tick: u64,
    /// Cosmetic: food is near the player's mouth this tick
    #[serde(skip)]
    pub chomping: bool,
    /// Cosmetic: ticks left on the hurt flash
    #[serde(skip)]
    pub hurt_pulse: u32,
    /// Pending one-shot events, drained by the host
    #[serde(skip)]
    pub(crate) events: Vec<RunEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a fresh run with the given seed and character
    pub fn new(seed: u64, character: &Character) -> Self {
        log::info!("run started: character={} seed={}", character.id, seed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            character_id: character.id.to_string(),
            time_ticks: 0,
            phase: GamePhase::Running,
            player: Player::default(),
            items: Vec::new(),
            ledger: Ledger::default(),
            last_spawn_tick: 0,
            chomping: false,
            hurt_pulse: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u64 {
        self.ledger.score()
    }

    pub fn lives(&self) -> u8 {
        self.ledger.lives()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CHARACTERS;

    #[test]
    fn test_fresh_run_initial_state() {
        let state = GameState::new(7, &CHARACTERS[0]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lives(), MAX_LIVES);
        assert!(state.items.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_ledger_food_increments_by_one() {
        let mut ledger = Ledger::default();
        ledger.record_food_eaten();
        assert_eq!(ledger.score(), 1);
        assert_eq!(ledger.lives(), MAX_LIVES);
    }

    #[test]
    fn test_ledger_bomb_decrements_to_game_over() {
        let mut ledger = Ledger::default();
        assert!(ledger.record_bomb_hit());
        assert!(ledger.record_bomb_hit());
        assert_eq!(ledger.lives(), 1);
        assert!(!ledger.is_game_over());

        // Third hit exhausts the lives
        assert!(!ledger.record_bomb_hit());
        assert_eq!(ledger.lives(), 0);
        assert!(ledger.is_game_over());
    }

    #[test]
    fn test_ledger_inert_after_game_over() {
        let mut ledger = Ledger::default();
        for _ in 0..MAX_LIVES {
            ledger.record_bomb_hit();
        }
        let score = ledger.score();

        ledger.record_food_eaten();
        assert_eq!(ledger.score(), score);
        assert!(!ledger.record_bomb_hit());
        assert_eq!(ledger.lives(), 0);
    }

    #[test]
    fn test_player_shift_clamps_to_field() {
        let mut player = Player::default();
        player.shift(-1000.0);
        assert_eq!(player.x, 0.0);
        player.shift(1000.0);
        assert_eq!(player.x, FIELD_WIDTH - player.width);
    }
}
