//! Item spawning
//!
//! At most one item per invocation, gated on the fixed spawn interval. All
//! randomness (kind, position, glyph, speed jitter) comes from the run RNG
//! so a seed reproduces the exact item stream.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{BOMB_GLYPH, FOOD_GLYPHS, FallingItem, GameState, ItemKind};
use crate::consts::*;

/// Per-tick fall speed for an item spawned at the given score.
///
/// Rises linearly with score up to the cap, then stays bounded by jitter
/// alone.
pub fn fall_speed(score: u64, rng: &mut Pcg32) -> f32 {
    let scaled = score.min(FALL_SPEED_CAP_SCORE) as f32 * FALL_SPEED_PER_POINT;
    FALL_SPEED_BASE + scaled + rng.random_range(0.0..FALL_SPEED_JITTER)
}

/// Spawn one item if the interval since the last spawn has elapsed.
pub(crate) fn maybe_spawn(state: &mut GameState) {
    if state.time_ticks - state.last_spawn_tick < SPAWN_INTERVAL_TICKS {
        return;
    }

    let is_bomb = state.rng.random_bool(BOMB_PROBABILITY);
    let x = state.rng.random_range(0.0..FIELD_WIDTH - ITEM_SIZE);
    let (kind, glyph) = if is_bomb {
        (ItemKind::Bomb, BOMB_GLYPH)
    } else {
        let glyph = FOOD_GLYPHS[state.rng.random_range(0..FOOD_GLYPHS.len())];
        (ItemKind::Food, glyph)
    };
    let fall_speed = fall_speed(state.ledger.score(), &mut state.rng);

    let id = state.next_item_id();
    state.items.push(FallingItem {
        id,
        pos: Vec2::new(x, SPAWN_Y),
        kind,
        glyph,
        fall_speed,
    });
    state.last_spawn_tick = state.time_ticks;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_fall_speed_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        for score in [0u64, 10, 50, 200] {
            let floor = FALL_SPEED_BASE + score.min(FALL_SPEED_CAP_SCORE) as f32 * FALL_SPEED_PER_POINT;
            for _ in 0..100 {
                let speed = fall_speed(score, &mut rng);
                assert!(speed >= floor);
                assert!(speed < floor + FALL_SPEED_JITTER);
            }
        }
    }

    #[test]
    fn test_fall_speed_caps_at_speed_cap_score() {
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        let at_cap = fall_speed(FALL_SPEED_CAP_SCORE, &mut a);
        let past_cap = fall_speed(FALL_SPEED_CAP_SCORE + 100, &mut b);
        assert_eq!(at_cap, past_cap);
    }

    #[test]
    fn test_spawned_item_within_field() {
        use crate::characters::CHARACTERS;

        let mut state = GameState::new(42, &CHARACTERS[0]);
        state.time_ticks = SPAWN_INTERVAL_TICKS;
        maybe_spawn(&mut state);

        assert_eq!(state.items.len(), 1);
        let item = &state.items[0];
        assert!(item.pos.x >= 0.0);
        assert!(item.pos.x <= FIELD_WIDTH - ITEM_SIZE);
        assert_eq!(item.pos.y, SPAWN_Y);
        assert_eq!(state.last_spawn_tick, state.time_ticks);
    }

    #[test]
    fn test_spawn_respects_interval() {
        use crate::characters::CHARACTERS;

        let mut state = GameState::new(42, &CHARACTERS[0]);
        state.time_ticks = SPAWN_INTERVAL_TICKS;
        maybe_spawn(&mut state);
        assert_eq!(state.items.len(), 1);

        // One tick later: still inside the interval, no spawn
        state.time_ticks += 1;
        maybe_spawn(&mut state);
        assert_eq!(state.items.len(), 1);

        // Interval elapsed: next item arrives
        state.time_ticks = SPAWN_INTERVAL_TICKS * 2;
        maybe_spawn(&mut state);
        assert_eq!(state.items.len(), 2);
        assert!(state.items[1].id > state.items[0].id);
    }
}
