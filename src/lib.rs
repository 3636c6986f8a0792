//! Snack Drop - a catch-the-falling-snacks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, run state)
//! - `characters`: Static playable-character catalog
//! - `feedback`: End-of-run remark generation
//! - `audio`: Web Audio sound cues (wasm32 only)
//! - `settings`: Player preferences

pub mod characters;
pub mod feedback;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use characters::{CHARACTERS, Character};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick rate (aligned to the nominal display refresh)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum ticks consumed per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field spans 0-100 in both axes (percent of width/height)
    pub const FIELD_WIDTH: f32 = 100.0;
    pub const FIELD_HEIGHT: f32 = 100.0;
    /// Items spawn just above the visible field
    pub const SPAWN_Y: f32 = -10.0;
    /// Items are discarded once past this y (10% exit margin below the field)
    pub const EXIT_Y: f32 = 110.0;

    /// Item square side, percent of field width
    pub const ITEM_SIZE: f32 = 10.0;
    /// Minimum ticks between spawns (600 ms at 60 Hz)
    pub const SPAWN_INTERVAL_TICKS: u64 = 36;
    /// Weighted coin flip for spawning a bomb instead of food
    pub const BOMB_PROBABILITY: f64 = 0.2;

    /// Fall speed: base + min(score, cap) * per_point + jitter, per tick
    pub const FALL_SPEED_BASE: f32 = 0.4;
    pub const FALL_SPEED_PER_POINT: f32 = 0.02;
    pub const FALL_SPEED_CAP_SCORE: u64 = 50;
    /// Upper bound (exclusive) of the uniform jitter added at spawn
    pub const FALL_SPEED_JITTER: f32 = 0.2;

    /// Player hitbox width at run start
    pub const PLAYER_START_WIDTH: f32 = 18.0;
    /// Player hitbox width after the one-time size-up
    pub const PLAYER_WIDE_WIDTH: f32 = 22.0;
    /// Score at which the size-up triggers
    pub const SIZE_UP_SCORE: u64 = 25;
    /// Horizontal movement per tick per held direction
    pub const PLAYER_SPEED: f32 = 1.5;
    /// Top edge of the player hitbox band
    pub const PLAYER_TOP_Y: f32 = 80.0;
    /// Height of the player hitbox band
    pub const PLAYER_HITBOX_HEIGHT: f32 = 15.0;

    /// Lives at run start
    pub const MAX_LIVES: u8 = 3;
    /// Duration of the cosmetic hurt pulse, in ticks
    pub const HURT_PULSE_TICKS: u32 = 30;

    /// Vertical band in which nearby food triggers the chomp animation
    pub const CHOMP_BAND_TOP: f32 = 60.0;
    pub const CHOMP_BAND_BOTTOM: f32 = 90.0;
    /// Horizontal distance to the player that counts as "nearby"
    pub const CHOMP_RANGE_X: f32 = 20.0;
}

/// Clamp a player left edge so the hitbox stays inside the field
#[inline]
pub fn clamp_to_field(x: f32, width: f32) -> f32 {
    x.clamp(0.0, consts::FIELD_WIDTH - width)
}
