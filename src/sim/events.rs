//! Events produced during a tick
//!
//! The simulation never calls out to audio or UI. It appends events here and
//! the session drains them after the tick.

use glam::Vec2;
use serde::Serialize;

use super::dialogue::DialogueResult;
use super::projectile::ChargeTier;

/// Floating labels shown next to a score popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreLabel {
    /// Kill with a ball that bounced once
    Ricochet,
    /// Kill with a ball that bounced two or more times
    Analytics,
    /// Kill with a max-charge ball
    Processed,
    ProcessApproved,
    BadProcess,
    NoDamageBonus,
}

impl ScoreLabel {
    pub fn text(&self) -> &'static str {
        match self {
            ScoreLabel::Ricochet => "RICOCHET!",
            ScoreLabel::Analytics => "ANALYTICS!",
            ScoreLabel::Processed => "PROCESSED!",
            ScoreLabel::ProcessApproved => "PROCESS APPROVED",
            ScoreLabel::BadProcess => "BAD PROCESS",
            ScoreLabel::NoDamageBonus => "NO DAMAGE BONUS!",
        }
    }
}

/// Something observable that happened inside the simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    BallThrown { tier: ChargeTier },
    ChargeReady,
    /// Ball touched the floor (or the top of a prop)
    BallBounced,
    /// Ball glanced off a wall
    BallRicocheted,
    PlayerDodged,
    /// Damage actually applied (not absorbed by invincibility)
    PlayerHurt { amount: i32 },
    PlayerHealthChanged { hp: i32, max_hp: i32 },
    PlayerLivesChanged { lives: u8 },
    /// Terminal: emitted exactly once per session
    PlayerDied,
    EnemyHit { id: u32 },
    EnemyDefeated { id: u32, pos: Vec2 },
    EnemySpeech { id: u32, line: &'static str },
    SnowballThrown { id: u32 },
    SnowballShattered { pos: Vec2 },
    PointsAwarded { amount: u64, pos: Vec2 },
    Label { label: ScoreLabel, pos: Vec2 },
    ComboChanged { hits: u32, multiplier: u32, maxed: bool },
    /// Streak reached three hits
    ComboStarted,
    ComboMaxed,
    ComboMaxedEnded,
    WaveSpawned { index: usize, enemies: usize },
    DialogueOpened,
    DialogueResolved { result: DialogueResult },
    LevelComplete,
    EndPromo,
    Paused,
    Resumed,
}
