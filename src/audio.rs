//! Audio cue boundary
//!
//! The simulation raises events; the session maps them to named cues and
//! hands them to an [`AudioPort`]. Playback is fire-and-forget: the core
//! never waits on a sound.

use serde::Serialize;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AudioCue {
    /// Ball leaves the player's hand
    Throw,
    /// Ball hits the floor
    Bounce,
    /// Ball glances off a wall or prop
    Ricochet,
    EnemyHit,
    EnemyDefeated,
    /// Player took damage
    HealthLost,
    /// Streak reached x2, or maxed mode started
    Combo,
    /// Charge meter full
    ChargeReady,
    LevelComplete,
    GameOver,
    Pause,
}

impl AudioCue {
    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let cue = match event {
            GameEvent::BallThrown { .. } | GameEvent::SnowballThrown { .. } => AudioCue::Throw,
            GameEvent::BallBounced => AudioCue::Bounce,
            GameEvent::BallRicocheted => AudioCue::Ricochet,
            GameEvent::EnemyHit { .. } => AudioCue::EnemyHit,
            GameEvent::EnemyDefeated { .. } => AudioCue::EnemyDefeated,
            GameEvent::PlayerHurt { .. } => AudioCue::HealthLost,
            GameEvent::ComboStarted | GameEvent::ComboMaxed => AudioCue::Combo,
            GameEvent::ChargeReady => AudioCue::ChargeReady,
            GameEvent::LevelComplete => AudioCue::LevelComplete,
            GameEvent::PlayerDied => AudioCue::GameOver,
            GameEvent::Paused => AudioCue::Pause,
            _ => return None,
        };
        Some(cue)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Throw => "throw",
            AudioCue::Bounce => "bounce",
            AudioCue::Ricochet => "ricochet",
            AudioCue::EnemyHit => "enemy-hit",
            AudioCue::EnemyDefeated => "enemy-defeated",
            AudioCue::HealthLost => "health-lost",
            AudioCue::Combo => "combo",
            AudioCue::ChargeReady => "max-charge-ready",
            AudioCue::LevelComplete => "level-complete",
            AudioCue::GameOver => "game-over",
            AudioCue::Pause => "pause",
        }
    }
}

/// Whatever actually makes noise
pub trait AudioPort {
    fn play(&mut self, cue: AudioCue);
}

/// Records cues in order; handy for tests and replays
impl AudioPort for Vec<AudioCue> {
    fn play(&mut self, cue: AudioCue) {
        self.push(cue);
    }
}

/// Audio port for headless runs: writes cues to the log
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    muted: bool,
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues played since creation (muted cues not counted)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioPort for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::trace!("audio: {}", cue.name());
    }
}
