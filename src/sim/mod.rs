//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timers are absolute deadlines against the simulation clock
//! - Seeded RNG only
//! - Stable update order (player, projectiles, enemies, combat)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod combat;
pub mod combo;
pub mod context;
pub mod dialogue;
pub mod draw;
pub mod enemy;
pub mod events;
pub mod input;
pub mod level;
pub mod player;
pub mod projectile;
pub mod score;
pub mod state;
pub mod tick;

pub use body::{Aabb, Blocked, KinematicBody, Terrain};
pub use collision::{aabb_overlap, point_in_aabb, within_radius};
pub use combo::{ComboCue, ComboState};
pub use context::{SimContext, Systems};
pub use dialogue::{DialogueChoice, DialogueGate, DialogueOption, DialoguePayload, DialogueResult};
pub use draw::DrawFrame;
pub use enemy::{Enemy, EnemyVariant};
pub use events::{GameEvent, ScoreLabel};
pub use input::InputSnapshot;
pub use level::{EnemySpawn, LevelSchedule, Obstacle, SideQuest, Wave};
pub use player::Player;
pub use projectile::{Ball, BallHit, ChargeTier, Snowball};
pub use score::ScoreState;
pub use state::{GamePhase, GameState};
pub use tick::{resolve_dialogue, tick};
