//! Axis-aligned rectangle collision
//!
//! The whole physics model is AABB overlap in the 0-100 field space: items
//! fall straight down and the player is a fixed-height band near the bottom.

use serde::{Deserialize, Serialize};

use super::state::{FallingItem, ItemKind, Player};
use crate::consts::*;

/// Axis-aligned rectangle in field coordinates (top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Standard four-inequality overlap test. Edge contact does not count.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Whether a food item is close enough to the player to trigger the chomp
/// animation. Loose band check, not gameplay-affecting.
#[inline]
pub fn near_player(item: &FallingItem, player: &Player) -> bool {
    item.kind == ItemKind::Food
        && item.pos.y > CHOMP_BAND_TOP
        && item.pos.y < CHOMP_BAND_BOTTOM
        && (item.pos.x - player.x).abs() < CHOMP_RANGE_X
}
