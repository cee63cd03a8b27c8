//! Per-frame draw data for an external renderer
//!
//! Pure read-only projection of [`GameState`]; the simulation holds no
//! drawing code of its own.

use glam::Vec2;
use serde::Serialize;

use super::body::Aabb;
use super::enemy::EnemyVariant;
use super::projectile::ChargeTier;
use super::state::{FADE_DURATION, GamePhase, GameState};
use crate::view_left;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSprite {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: f32,
    pub walk_frame: u8,
    pub ducking: bool,
    pub charging: bool,
    pub charge: f32,
    pub dodging: bool,
    /// Off-phase of the invincibility flicker
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySprite {
    pub id: u32,
    pub variant: EnemyVariant,
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: f32,
    pub walk_frame: u8,
    pub stunned: bool,
    pub winding_up: bool,
    pub flashing: bool,
    pub speech: Option<&'static str>,
    /// 1.0 while alive, falls to 0.0 over the death fade
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileSprite {
    pub pos: Vec2,
    pub radius: f32,
    /// None for snowballs
    pub tier: Option<ChargeTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawFrame {
    pub time: f32,
    pub phase: GamePhase,
    /// Left edge of the camera in world units
    pub camera_x: f32,
    pub player: PlayerSprite,
    pub enemies: Vec<EnemySprite>,
    pub balls: Vec<ProjectileSprite>,
    pub snowballs: Vec<ProjectileSprite>,
    pub obstacles: Vec<Aabb>,
}

impl DrawFrame {
    pub fn capture(state: &GameState) -> Self {
        let now = state.time;
        let player = &state.player;

        let live = state.enemies.iter().map(|e| (e, 1.0));
        let fading = state
            .fading
            .iter()
            .map(|f| (&f.enemy, ((f.until - now) / FADE_DURATION).clamp(0.0, 1.0)));
        let enemies = live
            .chain(fading)
            .map(|(e, opacity)| EnemySprite {
                id: e.id,
                variant: e.variant,
                pos: e.pos(),
                size: e.body.size,
                facing: e.facing,
                walk_frame: e.walk_frame,
                stunned: e.is_stunned(now),
                winding_up: e.is_winding_up(),
                flashing: e.is_flashing(now),
                speech: e.speech.map(|(line, _)| line),
                opacity,
            })
            .collect();

        Self {
            time: now,
            phase: state.phase,
            camera_x: view_left(player.pos().x),
            player: PlayerSprite {
                pos: player.pos(),
                size: player.body.size,
                facing: player.facing,
                walk_frame: player.walk_frame,
                ducking: player.ducking,
                charging: player.charging,
                charge: player.charge,
                dodging: player.is_dodging(now),
                hidden: player.flicker_hidden(now),
            },
            enemies,
            balls: state
                .balls
                .iter()
                .map(|b| ProjectileSprite {
                    pos: b.pos(),
                    radius: b.radius,
                    tier: Some(b.tier),
                })
                .collect(),
            snowballs: state
                .snowballs
                .iter()
                .map(|s| ProjectileSprite {
                    pos: s.pos(),
                    radius: s.body.size.x / 2.0,
                    tier: None,
                })
                .collect(),
            obstacles: state.terrain.solids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Enemy;
    use crate::sim::level::level_one;
    use crate::sim::state::FadingEnemy;

    #[test]
    fn test_capture_lists_fading_enemies() {
        let mut state = GameState::new(1, level_one());
        state.time = 2.0;
        let enemy = Enemy::new(5, EnemyVariant::Normal, Vec2::new(600.0, 350.0), 10.0, 10.0);
        state.enemies.push(enemy.clone());
        state.fading.push(FadingEnemy {
            enemy,
            until: 2.25,
        });

        let frame = state.draw_frame();
        assert_eq!(frame.enemies.len(), 2);
        assert_eq!(frame.enemies[0].opacity, 1.0);
        assert!((frame.enemies[1].opacity - 0.5).abs() < 1e-5);
        assert_eq!(frame.obstacles.len(), 5);
        assert_eq!(frame.camera_x, 0.0);
    }

    #[test]
    fn test_frame_serializes() {
        let state = GameState::new(1, level_one());
        let json = serde_json::to_string(&state.draw_frame()).unwrap();
        assert!(json.contains("\"player\""));
    }
}
