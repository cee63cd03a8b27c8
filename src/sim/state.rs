//! Game state and core simulation types
//!
//! Everything the tick mutates lives here, owned in one place so a seed plus
//! an input sequence reproduces a run exactly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Terrain;
use super::context::Systems;
use super::dialogue::DialogueGate;
use super::draw::DrawFrame;
use super::enemy::Enemy;
use super::events::GameEvent;
use super::level::LevelSchedule;
use super::player::{PLAYER_HEIGHT, Player};
use super::projectile::{Ball, Snowball};
use crate::consts::*;

/// How long a defeated enemy lingers for its death animation
pub const FADE_DURATION: f32 = 0.5;
/// Delay between level completion and the end promo
pub const END_PROMO_DELAY: f32 = 3.0;
pub const END_PROMO_MESSAGE: &str = "While Hinkie rebuilds Philly, rebuild your fantasy roster.\n\
     MNS.COM - The smartest fantasy basketball platform on the internet.";

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (the dialogue gate may still suspend it)
    Playing,
    Paused,
    /// Level cleared; only the promo timer runs
    Complete,
    /// Out of lives
    GameOver,
}

/// Defeated enemy kept around for drawing only
#[derive(Debug, Clone)]
pub struct FadingEnemy {
    pub enemy: Enemy,
    pub until: f32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Simulation clock in seconds; frozen while paused or in dialogue
    pub time: f32,
    pub phase: GamePhase,
    pub player: Player,
    /// Live enemies only: defeated ones move to `fading` in the same tick
    pub enemies: Vec<Enemy>,
    pub fading: Vec<FadingEnemy>,
    pub balls: Vec<Ball>,
    pub snowballs: Vec<Snowball>,
    pub systems: Systems,
    pub dialogue: DialogueGate,
    pub schedule: LevelSchedule,
    pub terrain: Terrain,
    /// One-shot flag per wave, parallel to `schedule.waves`
    pub waves_spawned: Vec<bool>,
    pub side_quest_fired: bool,
    pub completed_at: Option<f32>,
    pub promo_shown: bool,
}

impl GameState {
    pub fn new(seed: u64, schedule: LevelSchedule) -> Self {
        let start = Vec2::new(schedule.player_start_x, GROUND_Y - PLAYER_HEIGHT / 2.0);
        Self {
            time: 0.0,
            phase: GamePhase::Playing,
            player: Player::new(start),
            enemies: Vec::new(),
            fading: Vec::new(),
            balls: Vec::new(),
            snowballs: Vec::new(),
            systems: Systems::new(seed),
            dialogue: DialogueGate::default(),
            terrain: schedule.terrain(),
            waves_spawned: vec![false; schedule.waves.len()],
            side_quest_fired: false,
            completed_at: None,
            promo_shown: false,
            schedule,
        }
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.systems.score.score()
    }

    pub fn all_waves_spawned(&self) -> bool {
        self.waves_spawned.iter().all(|&spawned| spawned)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.systems.events)
    }

    /// Snapshot of everything the renderer needs this frame
    pub fn draw_frame(&self) -> DrawFrame {
        DrawFrame::capture(self)
    }
}
