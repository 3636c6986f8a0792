//! End-of-run remark generation
//!
//! Called exactly once per completed run by the game-over view, never by
//! the simulation. Two interchangeable sources sit behind one trait: a
//! deterministic tier table (the default) and a remote text service whose
//! failures degrade to a generic remark. Callers treat the result as an
//! opaque display string.

use crate::characters::Character;

/// Produces the one-line remark shown on the game-over screen
pub trait FeedbackSource {
    fn feedback(&self, character: &Character, score: u64) -> String;
}

/// Deterministic score-tier table
#[derive(Debug, Clone, Copy, Default)]
pub struct TierTable;

impl FeedbackSource for TierTable {
    fn feedback(&self, character: &Character, score: u64) -> String {
        let name = character.name;
        match score {
            0 => format!("Oh no! {name} didn't get to eat anything. Watch out for those bombs!"),
            1..=5 => format!("{name} had a light snack. Good warm-up, but I know you can eat more!"),
            6..=15 => format!("Tasty! {name} is feeling good. That was a solid meal!"),
            16..=30 => format!("Wow! {name} has a serious appetite today! Great reflexes!"),
            31..=50 => format!("Incredible! {name} is basically a vacuum cleaner! Amazing score!"),
            _ => format!("Legendary! You and {name} are the ultimate eating champions! Unbeatable!"),
        }
    }
}

/// Generic remark used when the remote service fails
fn fallback_remark(character: &Character) -> String {
    format!("Great run! {} is proud of you. Play again!", character.name)
}

/// Remote text service behind a caller-supplied fetch closure.
///
/// The embedding page owns the actual network call; this wrapper only adds
/// the recovery contract: any failure is logged and replaced by the
/// fallback remark, never surfaced to the player.
pub struct RemoteSource<F>
where
    F: Fn(&Character, u64) -> anyhow::Result<String>,
{
    fetch: F,
}

impl<F> RemoteSource<F>
where
    F: Fn(&Character, u64) -> anyhow::Result<String>,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> FeedbackSource for RemoteSource<F>
where
    F: Fn(&Character, u64) -> anyhow::Result<String>,
{
    fn feedback(&self, character: &Character, score: u64) -> String {
        match (self.fetch)(character, score) {
            Ok(remark) => remark,
            Err(err) => {
                log::warn!("feedback service failed, using fallback: {err:#}");
                fallback_remark(character)
            }
        }
    }
}
