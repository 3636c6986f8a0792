//! Static playable-character catalog
//!
//! Read-only input to run start. The tick loop never consults it; the
//! frontend uses the theme for styling and the feedback generator uses the
//! name for the end-of-run remark.

use serde::Serialize;

/// A playable character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Character {
    pub id: &'static str,
    pub name: &'static str,
    /// CSS theme class applied by the frontend
    pub theme: &'static str,
    /// Icon glyph shown on the select card
    pub glyph: char,
    pub description: &'static str,
}

pub const CHARACTERS: &[Character] = &[
    Character {
        id: "volt",
        name: "Volt",
        theme: "theme-amber",
        glyph: '⚡',
        description: "Electric speed!",
    },
    Character {
        id: "bongo",
        name: "Bongo",
        theme: "theme-leaf",
        glyph: '🍃',
        description: "Rhythmic beats!",
    },
    Character {
        id: "wisp",
        name: "Wisp",
        theme: "theme-rose",
        glyph: '✨',
        description: "Mystical floating!",
    },
];

impl Character {
    /// Look up a character by its stable id
    pub fn by_id(id: &str) -> Option<&'static Character> {
        CHARACTERS.iter().find(|c| c.id == id)
    }
}
