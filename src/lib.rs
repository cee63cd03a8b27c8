//! Process Arcade - a side-scrolling charged-throw brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, combo, waves, dialogue gate)
//! - `session`: Frame driver that owns the simulation and feeds the outer ports
//! - `audio`: Fire-and-forget audio cue port
//! - `publish`: Observable state published to UI overlays
//! - `config`: Data-driven level definition and seed

pub mod audio;
pub mod config;
pub mod error;
pub mod publish;
pub mod session;
pub mod sim;

pub use audio::{AudioCue, AudioPort};
pub use config::SessionConfig;
pub use error::{ConfigError, ConfigResult};
pub use publish::{PublishPort, PublishedState, StateDiff};
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Nominal frame step (60 Hz); `tick` accepts any elapsed time
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest elapsed time integrated in one tick. Longer frames run the clock slow.
    pub const MAX_TICK_DT: f32 = 0.05;

    /// Visible playfield
    pub const GAME_WIDTH: f32 = 900.0;
    pub const GAME_HEIGHT: f32 = 400.0;
    /// Top surface of the floor
    pub const GROUND_Y: f32 = GAME_HEIGHT - 30.0;
    /// Horizontal extent of a level
    pub const LEVEL_WIDTH: f32 = 3600.0;

    /// World gravity (pixels/s²)
    pub const GRAVITY: f32 = 800.0;
    /// Terminal fall speed for actors
    pub const MAX_FALL_SPEED: f32 = 600.0;

    /// Slack around the camera view before projectiles are retired
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Left edge of the camera view when it follows `focus_x`
#[inline]
pub fn view_left(focus_x: f32) -> f32 {
    use consts::*;
    (focus_x - GAME_WIDTH / 2.0).clamp(0.0, LEVEL_WIDTH - GAME_WIDTH)
}

/// Horizontal sign of `to - from` (+1 when level)
#[inline]
pub fn direction_toward(from: f32, to: f32) -> f32 {
    if to < from { -1.0 } else { 1.0 }
}
