//! Point accumulation

use serde::Serialize;

/// Flat award for knocking a snowball out of the air
pub const SNOWBALL_INTERCEPT_POINTS: u64 = 50;
/// Side quest answered well
pub const GOOD_CHOICE_POINTS: u64 = 500;
/// Level finished without ever dropping below max hp
pub const NO_DAMAGE_BONUS: u64 = 1000;

/// Monotonic score total
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreState {
    score: u64,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Add `base * multiplier` and return the awarded delta
    pub fn add_points(&mut self, base: u64, multiplier: u32) -> u64 {
        let total = base.saturating_mul(u64::from(multiplier));
        self.score = self.score.saturating_add(total);
        total
    }
}
