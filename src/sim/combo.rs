//! Hit-streak multiplier
//!
//! Thresholds: 0-2 hits x1, 3-5 x2, 6-9 x3, 10-14 x5. Reaching 15 enters
//! maxed mode, which pins the multiplier at x10 for a fixed window no matter
//! what happens to the hit count, then falls back to the threshold value.

use serde::Serialize;

/// Hits needed to enter maxed mode
pub const MAXED_HITS: u32 = 15;
/// Multiplier while maxed
pub const MAXED_MULTIPLIER: u32 = 10;
/// Maxed mode duration (seconds of simulation time)
pub const MAXED_DURATION: f32 = 10.0;

/// One-shot cues raised by a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboCue {
    /// Streak just reached three hits
    Started,
    /// Maxed mode just began
    Maxed,
}

/// Threshold multiplier for a raw hit count
pub fn multiplier_for_hits(hits: u32) -> u32 {
    match hits {
        0..=2 => 1,
        3..=5 => 2,
        6..=9 => 3,
        _ => 5,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComboState {
    hits: u32,
    multiplier: u32,
    /// Deadline of the active maxed window
    maxed_until: Option<f32>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboState {
    pub fn new() -> Self {
        Self {
            hits: 0,
            multiplier: 1,
            maxed_until: None,
        }
    }

    #[inline]
    pub fn hits(&self) -> u32 {
        self.hits
    }

    #[inline]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    #[inline]
    pub fn is_maxed(&self) -> bool {
        self.maxed_until.is_some()
    }

    /// Register a successful hit at simulation time `now`
    pub fn add_hit(&mut self, now: f32) -> Option<ComboCue> {
        self.hits += 1;

        if self.is_maxed() {
            return None;
        }
        if self.hits >= MAXED_HITS {
            self.maxed_until = Some(now + MAXED_DURATION);
            self.multiplier = MAXED_MULTIPLIER;
            return Some(ComboCue::Maxed);
        }

        self.multiplier = multiplier_for_hits(self.hits);
        (self.hits == 3).then_some(ComboCue::Started)
    }

    /// Expire maxed mode once its window has passed. Returns true on expiry.
    pub fn update(&mut self, now: f32) -> bool {
        match self.maxed_until {
            Some(until) if now >= until => {
                self.maxed_until = None;
                self.multiplier = multiplier_for_hits(self.hits);
                true
            }
            _ => false,
        }
    }

    /// Reset the streak (player took damage). Cancels maxed mode.
    pub fn break_combo(&mut self) {
        self.hits = 0;
        self.multiplier = 1;
        self.maxed_until = None;
    }
}
