//! Fans (and the boss): chase, hop obstacles, lob snowballs, heckle
//!
//! Behavior is a small state machine, Chase -> Stunned -> Defeated, with the
//! throw wind-up and speech bubbles layered on as independent deadlines.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Aabb, KinematicBody, Terrain};
use super::context::SimContext;
use super::events::{GameEvent, ScoreLabel};
use super::projectile::{BallHit, ChargeTier};
use crate::direction_toward;

/// Upward impulse used to clear an obstacle
pub const HOP_VELOCITY: f32 = -300.0;
/// Reverse speed multiplier after bumping into something
pub const BUMP_SPEED_FACTOR: f32 = 1.5;
pub const KNOCKBACK_SPEED: f32 = 200.0;
pub const KNOCKBACK_DURATION: f32 = 0.2;
/// Enemy halts this long before the snowball leaves its hand
pub const THROW_WINDUP: f32 = 0.2;
/// Random extra delay added to each throw cooldown
pub const THROW_JITTER: f32 = 1.0;
/// Snowball launch height above body center
const THROW_HEIGHT: f32 = 18.0;
const THROW_REACH: f32 = 10.0;

pub const SPEECH_DURATION: f32 = 2.5;
const WALK_FRAME_TIME: f32 = 0.2;
const HIT_FLASH: f32 = 0.1;

/// Base points for a straight kill
pub const KILL_POINTS: u64 = 150;
/// Kill after one bounce
pub const RICOCHET_POINTS: u64 = 300;
/// Kill after two or more bounces
pub const MULTI_RICOCHET_POINTS: u64 = 500;

pub const SPEECH_LINES: [&str; 5] = [
    "WHAT IS A PING PONG BALL",
    "JUST WIN GAMES BRO",
    "FIRE HIM NOW",
    "TANK JOB!",
    "WE WANT WINS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyVariant {
    #[default]
    Normal,
    Fast,
    Boss,
}

/// Per-variant tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: i32,
    pub speed: f32,
    pub size: Vec2,
    pub contact_damage: i32,
    /// Center distance for ball hits and contact damage
    pub hit_radius: f32,
    pub throw_cooldown: f32,
    /// Throws only when the player is farther than this...
    pub throw_min_range: f32,
    /// ...and closer than this
    pub throw_max_range: f32,
    pub defeat_bonus: u64,
}

impl EnemyVariant {
    pub fn stats(self) -> EnemyStats {
        const BASE_SPEED: f32 = 60.0;
        match self {
            EnemyVariant::Normal => EnemyStats {
                hp: 30,
                speed: BASE_SPEED,
                size: Vec2::new(20.0, 36.0),
                contact_damage: 10,
                hit_radius: 25.0,
                throw_cooldown: 3.0,
                throw_min_range: 60.0,
                throw_max_range: 300.0,
                defeat_bonus: 100,
            },
            EnemyVariant::Fast => EnemyStats {
                hp: 20,
                speed: BASE_SPEED * 1.6,
                size: Vec2::new(20.0, 36.0),
                contact_damage: 10,
                hit_radius: 25.0,
                throw_cooldown: 2.0,
                throw_min_range: 60.0,
                throw_max_range: 300.0,
                defeat_bonus: 100,
            },
            EnemyVariant::Boss => EnemyStats {
                hp: 150,
                speed: BASE_SPEED * 0.75,
                size: Vec2::new(28.0, 48.0),
                contact_damage: 20,
                hit_radius: 32.0,
                throw_cooldown: 1.5,
                throw_min_range: 60.0,
                throw_max_range: 400.0,
                defeat_bonus: 1000,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub variant: EnemyVariant,
    pub stats: EnemyStats,
    pub body: KinematicBody,
    pub hp: i32,
    pub max_hp: i32,
    pub facing: f32,
    pub alive: bool,
    pub defeated: bool,
    pub walk_frame: u8,
    /// Current speech bubble and when it disappears
    pub speech: Option<(&'static str, f32)>,
    stunned_until: f32,
    knockback_until: Option<f32>,
    next_throw_at: f32,
    throw_release_at: Option<f32>,
    throw_target_x: f32,
    next_speech_at: f32,
    hit_flash_until: f32,
    walk_timer: f32,
}

impl Enemy {
    /// Spawn with jittered first-throw and first-speech deadlines
    pub fn spawn(variant: EnemyVariant, pos: Vec2, ctx: &mut SimContext) -> Self {
        let id = ctx.next_entity_id();
        let now = ctx.now();
        let next_throw_at = now + 1.5 + ctx.random() * 2.0;
        let next_speech_at = now + 2.0 + ctx.random() * 3.0;
        Self::new(id, variant, pos, next_throw_at, next_speech_at)
    }

    pub fn new(
        id: u32,
        variant: EnemyVariant,
        pos: Vec2,
        next_throw_at: f32,
        next_speech_at: f32,
    ) -> Self {
        let stats = variant.stats();
        Self {
            id,
            variant,
            stats,
            body: KinematicBody::new(pos, stats.size),
            hp: stats.hp,
            max_hp: stats.hp,
            facing: -1.0,
            alive: true,
            defeated: false,
            walk_frame: 0,
            speech: None,
            stunned_until: f32::NEG_INFINITY,
            knockback_until: None,
            next_throw_at,
            throw_release_at: None,
            throw_target_x: pos.x,
            next_speech_at,
            hit_flash_until: f32::NEG_INFINITY,
            walk_timer: 0.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        self.body.aabb()
    }

    #[inline]
    pub fn is_stunned(&self, now: f32) -> bool {
        now < self.stunned_until
    }

    #[inline]
    pub fn is_winding_up(&self) -> bool {
        self.throw_release_at.is_some()
    }

    #[inline]
    pub fn is_flashing(&self, now: f32) -> bool {
        now < self.hit_flash_until
    }

    pub fn update(&mut self, dt: f32, terrain: &Terrain, ctx: &mut SimContext) {
        if !self.alive {
            return;
        }
        let now = ctx.now();

        if self.knockback_until.is_some_and(|until| now >= until) {
            self.knockback_until = None;
            self.body.vel.x = 0.0;
        }

        if self.is_stunned(now) {
            self.body.vel.x = 0.0;
            self.body.step(dt, terrain);
            return;
        }

        let player_x = ctx.player_position().x;
        self.steer(player_x);

        self.walk_timer += dt;
        if self.walk_timer > WALK_FRAME_TIME {
            self.walk_frame = (self.walk_frame + 1) % 4;
            self.walk_timer = 0.0;
        }

        self.update_throw(player_x, ctx);
        self.update_speech(ctx);

        self.body.step(dt, terrain);
    }

    fn steer(&mut self, player_x: f32) {
        let blocked = self.body.blocked;
        if self.knockback_until.is_some() {
            // Let the knockback play out
        } else if self.is_winding_up() {
            self.body.vel.x = 0.0;
        } else if blocked.wall() {
            let away = if blocked.left { 1.0 } else { -1.0 };
            self.body.vel.x = away * self.stats.speed * BUMP_SPEED_FACTOR;
            if blocked.down {
                self.body.vel.y = HOP_VELOCITY;
            }
            self.facing = away;
        } else {
            let dir = direction_toward(self.body.pos.x, player_x);
            self.body.vel.x = dir * self.stats.speed;
            self.facing = dir;
        }
    }

    fn update_throw(&mut self, player_x: f32, ctx: &mut SimContext) {
        let now = ctx.now();
        let dist = (player_x - self.body.pos.x).abs();

        if !self.is_winding_up()
            && now > self.next_throw_at
            && dist > self.stats.throw_min_range
            && dist < self.stats.throw_max_range
        {
            self.throw_release_at = Some(now + THROW_WINDUP);
            self.throw_target_x = player_x;
            self.body.vel.x = 0.0;
            self.next_throw_at = now + self.stats.throw_cooldown + ctx.random() * THROW_JITTER;
        }

        if self.throw_release_at.is_some_and(|at| now >= at) {
            self.throw_release_at = None;
            let dir = direction_toward(self.body.pos.x, self.throw_target_x);
            let from = self.body.pos + Vec2::new(dir * THROW_REACH, -THROW_HEIGHT);
            ctx.spawn_snowball(from, dir);
        }
    }

    /// Cosmetic heckling on its own clock
    fn update_speech(&mut self, ctx: &mut SimContext) {
        let now = ctx.now();
        if self.speech.is_some_and(|(_, until)| now >= until) {
            self.speech = None;
        }
        if self.speech.is_none() && now > self.next_speech_at {
            let line = SPEECH_LINES[ctx.random_index(SPEECH_LINES.len())];
            self.speech = Some((line, now + SPEECH_DURATION));
            self.next_speech_at = now + 4.0 + ctx.random() * 3.0;
            ctx.emit(GameEvent::EnemySpeech { id: self.id, line });
        }
    }

    /// Apply ball damage. Returns true if this hit defeated the enemy.
    pub fn take_damage(&mut self, amount: i32, hit: Option<&BallHit>, ctx: &mut SimContext) -> bool {
        if !self.alive {
            return false;
        }
        let now = ctx.now();
        self.hp -= amount;
        self.hit_flash_until = now + HIT_FLASH;
        ctx.emit(GameEvent::EnemyHit { id: self.id });

        if self.hp <= 0 {
            self.defeat(hit, ctx);
            return true;
        }

        let dir = hit.map_or(1.0, |h| h.direction);
        self.body.vel.x = dir * KNOCKBACK_SPEED;
        self.knockback_until = Some(now + KNOCKBACK_DURATION);
        false
    }

    fn defeat(&mut self, hit: Option<&BallHit>, ctx: &mut SimContext) {
        self.alive = false;
        self.defeated = true;
        self.hp = 0;
        self.throw_release_at = None;
        self.speech = None;
        let pos = self.body.pos;
        self.body.alive = false;
        ctx.emit(GameEvent::EnemyDefeated { id: self.id, pos });

        match hit {
            Some(h) if h.ricochet => {
                let (points, label) = if h.bounces >= 2 {
                    (MULTI_RICOCHET_POINTS, ScoreLabel::Analytics)
                } else {
                    (RICOCHET_POINTS, ScoreLabel::Ricochet)
                };
                ctx.award_points(points, pos - Vec2::new(0.0, 20.0));
                ctx.label(label, pos);
                log::debug!("enemy {} defeated by ricochet ({} bounces)", self.id, h.bounces);
            }
            _ => {
                ctx.award_points(KILL_POINTS, pos - Vec2::new(0.0, 20.0));
                log::debug!("enemy {} ({:?}) defeated", self.id, self.variant);
            }
        }
        ctx.award_points(self.stats.defeat_bonus, pos - Vec2::new(0.0, 40.0));
        ctx.register_hit();

        if hit.is_some_and(|h| h.tier == ChargeTier::Full) {
            ctx.label(ScoreLabel::Processed, pos - Vec2::new(0.0, 10.0));
        }
    }

    /// Freeze movement and attacks for `duration`; replaces any pending stun
    pub fn stun(&mut self, duration: f32, now: f32) {
        if !self.alive {
            return;
        }
        self.stunned_until = now + duration;
        self.throw_release_at = None;
        self.body.vel.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::context::Systems;

    fn fan_at(x: f32) -> Enemy {
        let mut enemy = Enemy::new(1, EnemyVariant::Normal, Vec2::new(x, GROUND_Y - 18.0), 100.0, 100.0);
        enemy.body.blocked.down = true;
        enemy
    }

    fn low_hit(direction: f32) -> BallHit {
        BallHit {
            direction,
            tier: ChargeTier::Low,
            ricochet: false,
            bounces: 0,
        }
    }

    #[test]
    fn test_variant_stats() {
        let normal = EnemyVariant::Normal.stats();
        let fast = EnemyVariant::Fast.stats();
        assert_eq!(normal.hp, 30);
        assert_eq!(fast.hp, 20);
        assert!((fast.speed - normal.speed * 1.6).abs() < 1e-4);
        assert!(EnemyVariant::Boss.stats().hp > normal.hp);
    }

    #[test]
    fn test_chases_player() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = fan_at(600.0);
        let mut ctx = systems.context(0.0, Vec2::new(200.0, 330.0));
        enemy.update(FRAME_DT, &terrain, &mut ctx);
        assert_eq!(enemy.facing, -1.0);
        assert_eq!(enemy.body.vel.x, -60.0);
        assert!(enemy.pos().x < 600.0);
    }

    #[test]
    fn test_bumps_and_hops_when_blocked() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = fan_at(600.0);
        enemy.body.blocked.left = true;
        let mut ctx = systems.context(0.0, Vec2::new(200.0, 330.0));
        enemy.update(FRAME_DT, &terrain, &mut ctx);
        assert_eq!(enemy.facing, 1.0);
        assert_eq!(enemy.body.vel.x, 90.0);
        assert!(enemy.body.vel.y < 0.0);
    }

    #[test]
    fn test_knockback_then_recover() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = fan_at(600.0);
        {
            let mut ctx = systems.context(1.0, Vec2::new(200.0, 330.0));
            assert!(!enemy.take_damage(10, Some(&low_hit(1.0)), &mut ctx));
            assert_eq!(enemy.hp, 20);
            assert_eq!(enemy.body.vel.x, KNOCKBACK_SPEED);

            // Still sliding away from the player during the knockback window
            enemy.update(FRAME_DT, &terrain, &mut ctx);
            assert_eq!(enemy.body.vel.x, KNOCKBACK_SPEED);
        }
        let mut ctx = systems.context(1.25, Vec2::new(200.0, 330.0));
        enemy.update(FRAME_DT, &terrain, &mut ctx);
        assert_eq!(enemy.body.vel.x, -60.0);
    }

    #[test]
    fn test_three_low_hits_defeat_normal_fan() {
        let mut systems = Systems::new(0);
        let mut enemy = fan_at(600.0);
        let mut ctx = systems.context(1.0, Vec2::new(200.0, 330.0));
        assert!(!enemy.take_damage(10, Some(&low_hit(1.0)), &mut ctx));
        assert!(!enemy.take_damage(10, Some(&low_hit(1.0)), &mut ctx));
        assert!(enemy.take_damage(10, Some(&low_hit(1.0)), &mut ctx));
        assert!(!enemy.alive);
        assert!(enemy.defeated);
        // Dead enemies ignore further damage
        assert!(!enemy.take_damage(10, Some(&low_hit(1.0)), &mut ctx));
        // 150 kill + 100 defeat bonus at x1
        assert_eq!(systems.score.score(), 250);
        assert_eq!(systems.combo.hits(), 1);
    }

    #[test]
    fn test_ricochet_kill_scoring() {
        let mut systems = Systems::new(0);
        let mut enemy = fan_at(600.0);
        let hit = BallHit {
            direction: 1.0,
            tier: ChargeTier::Full,
            ricochet: true,
            bounces: 2,
        };
        let mut ctx = systems.context(1.0, Vec2::ZERO);
        assert!(enemy.take_damage(90, Some(&hit), &mut ctx));
        assert_eq!(systems.score.score(), 600);
        let labels: Vec<ScoreLabel> = systems
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Label { label, .. } => Some(*label),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![ScoreLabel::Analytics, ScoreLabel::Processed]);
    }

    #[test]
    fn test_points_use_multiplier_before_hit_is_counted() {
        let mut systems = Systems::new(0);
        // Two hits in: x1 now, the defeat makes it three
        systems.combo.add_hit(0.0);
        systems.combo.add_hit(0.0);
        let mut enemy = fan_at(600.0);
        let mut ctx = systems.context(1.0, Vec2::ZERO);
        enemy.take_damage(30, None, &mut ctx);
        assert_eq!(systems.score.score(), 250);
        assert_eq!(systems.combo.multiplier(), 2);
    }

    #[test]
    fn test_windup_then_throw_at_last_known_x() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = Enemy::new(1, EnemyVariant::Normal, Vec2::new(600.0, GROUND_Y - 18.0), 0.5, 100.0);
        enemy.body.blocked.down = true;

        {
            let mut ctx = systems.context(1.0, Vec2::new(450.0, 330.0));
            enemy.update(FRAME_DT, &terrain, &mut ctx);
        }
        assert!(enemy.is_winding_up());
        assert_eq!(enemy.body.vel.x, 0.0);
        assert!(systems.pending_snowballs.is_empty());

        {
            // Player moved past the enemy; the throw still goes where they were
            let mut ctx = systems.context(1.1, Vec2::new(900.0, 330.0));
            enemy.update(FRAME_DT, &terrain, &mut ctx);
            assert!(enemy.is_winding_up());
        }
        {
            let mut ctx = systems.context(1.25, Vec2::new(900.0, 330.0));
            enemy.update(FRAME_DT, &terrain, &mut ctx);
        }
        assert!(!enemy.is_winding_up());
        assert_eq!(systems.pending_snowballs.len(), 1);
        assert_eq!(systems.pending_snowballs[0].direction, -1.0);
    }

    #[test]
    fn test_no_throw_out_of_band() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = Enemy::new(1, EnemyVariant::Normal, Vec2::new(600.0, GROUND_Y - 18.0), 0.0, 100.0);
        for player_x in [580.0, 200.0] {
            let mut ctx = systems.context(1.0, Vec2::new(player_x, 330.0));
            enemy.update(FRAME_DT, &terrain, &mut ctx);
            assert!(!enemy.is_winding_up());
        }
    }

    #[test]
    fn test_stun_suspends_and_is_retriggerable() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(0);
        let mut enemy = Enemy::new(1, EnemyVariant::Normal, Vec2::new(600.0, GROUND_Y - 18.0), 0.0, 100.0);
        enemy.stun(2.0, 1.0);
        enemy.stun(0.5, 1.2);
        assert!(enemy.is_stunned(1.69));
        assert!(!enemy.is_stunned(1.71));

        let mut ctx = systems.context(1.5, Vec2::new(450.0, 330.0));
        enemy.update(FRAME_DT, &terrain, &mut ctx);
        assert_eq!(enemy.body.vel.x, 0.0);
        assert!(!enemy.is_winding_up());
    }

    #[test]
    fn test_speech_is_cosmetic() {
        let terrain = Terrain::default();
        let mut systems = Systems::new(3);
        let mut enemy = Enemy::new(1, EnemyVariant::Normal, Vec2::new(600.0, GROUND_Y - 18.0), 50.0, 0.5);
        enemy.body.blocked.down = true;
        let mut ctx = systems.context(1.0, Vec2::new(200.0, 330.0));
        enemy.update(FRAME_DT, &terrain, &mut ctx);
        let (line, until) = enemy.speech.expect("speech should start");
        assert!(SPEECH_LINES.contains(&line));
        assert_eq!(until, 1.0 + SPEECH_DURATION);
        assert_eq!(enemy.body.vel.x, -60.0);
        assert!(!enemy.is_winding_up());
    }
}
