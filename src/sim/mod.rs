//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, rects_overlap};
pub use snapshot::{ItemView, PlayerView, Snapshot};
pub use spawn::fall_speed;
pub use state::{FallingItem, GamePhase, GameState, ItemKind, Ledger, Player, RunEvent};
pub use tick::{TickInput, tick};
