//! Thrown projectiles: the player's ball and the fans' snowballs

use glam::Vec2;
use serde::Serialize;

use super::body::{KinematicBody, Terrain};
use super::context::SimContext;
use super::events::GameEvent;
use crate::consts::*;
use crate::view_left;

/// Horizontal launch speed at zero charge
pub const BALL_BASE_SPEED: f32 = 300.0;
/// Extra horizontal speed at full charge
pub const BALL_CHARGE_SPEED: f32 = 200.0;
/// Upward launch speed at zero charge
pub const BALL_BASE_LIFT: f32 = 150.0;
/// Extra upward launch speed at full charge
pub const BALL_CHARGE_LIFT: f32 = 100.0;
/// Ball gravity on top of world gravity
pub const BALL_EXTRA_GRAVITY: f32 = 300.0;
pub const BALL_RESTITUTION: f32 = 0.7;
/// Seconds before an idle ball is retired
pub const BALL_LIFETIME: f32 = 6.0;

pub const SNOWBALL_SPEED: f32 = 200.0;
pub const SNOWBALL_DAMAGE: i32 = 15;
pub const SNOWBALL_RADIUS: f32 = 4.0;

/// Discretized charge level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ChargeTier {
    Low,
    Mid,
    Full,
}

impl ChargeTier {
    /// Charge at or above this is mid tier
    pub const MID_THRESHOLD: f32 = 0.34;
    /// Charge at or above this is full tier
    pub const FULL_THRESHOLD: f32 = 0.67;

    const DAMAGE: [i32; 3] = [10, 20, 30];
    const FULL_DAMAGE_MULTIPLIER: i32 = 3;
    const MAX_BOUNCES: [u32; 3] = [1, 2, 4];
    const RADIUS: [f32; 3] = [4.0, 5.0, 6.0];

    pub fn from_charge(charge: f32) -> Self {
        if charge >= Self::FULL_THRESHOLD {
            ChargeTier::Full
        } else if charge >= Self::MID_THRESHOLD {
            ChargeTier::Mid
        } else {
            ChargeTier::Low
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn damage(self) -> i32 {
        let base = Self::DAMAGE[self.index()];
        if self == ChargeTier::Full {
            base * Self::FULL_DAMAGE_MULTIPLIER
        } else {
            base
        }
    }

    pub fn max_bounces(self) -> u32 {
        Self::MAX_BOUNCES[self.index()]
    }

    pub fn radius(self) -> f32 {
        Self::RADIUS[self.index()]
    }
}

/// What an enemy learns about the ball that hit it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallHit {
    pub direction: f32,
    pub tier: ChargeTier,
    pub ricochet: bool,
    pub bounces: u32,
}

/// The player's thrown ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub body: KinematicBody,
    pub charge: f32,
    pub tier: ChargeTier,
    pub damage: i32,
    pub max_bounces: u32,
    pub bounces: u32,
    pub direction: f32,
    pub radius: f32,
    touched_surface: bool,
    spawned_at: f32,
    was_down: bool,
    was_wall: bool,
    /// Enemies this ball already damaged
    struck: Vec<u32>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, direction: f32, charge: f32, now: f32) -> Self {
        let charge = charge.clamp(0.0, 1.0);
        let tier = ChargeTier::from_charge(charge);
        let radius = tier.radius();

        let mut body = KinematicBody::new(pos, Vec2::splat(radius * 2.0));
        body.gravity_scale = (GRAVITY + BALL_EXTRA_GRAVITY) / GRAVITY;
        body.max_fall_speed = f32::INFINITY;
        body.restitution = BALL_RESTITUTION;
        body.clamp_to_world = false;
        body.vel = Vec2::new(
            direction * (BALL_BASE_SPEED + charge * BALL_CHARGE_SPEED),
            -(BALL_BASE_LIFT + charge * BALL_CHARGE_LIFT),
        );

        Self {
            id,
            body,
            charge,
            tier,
            damage: tier.damage(),
            max_bounces: tier.max_bounces(),
            bounces: 0,
            direction,
            radius,
            touched_surface: false,
            spawned_at: now,
            was_down: false,
            was_wall: false,
            struck: Vec::new(),
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.body.alive
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// True once the ball has bounced off the floor or a wall
    pub fn is_ricochet(&self) -> bool {
        self.touched_surface && self.bounces >= 1
    }

    /// A ricocheting max-charge ball keeps going after a hit
    pub fn survives_hit(&self) -> bool {
        self.is_ricochet() && self.tier == ChargeTier::Full
    }

    pub fn hit_info(&self) -> BallHit {
        BallHit {
            direction: self.direction,
            tier: self.tier,
            ricochet: self.is_ricochet(),
            bounces: self.bounces,
        }
    }

    pub fn has_struck(&self, enemy_id: u32) -> bool {
        self.struck.contains(&enemy_id)
    }

    pub fn mark_struck(&mut self, enemy_id: u32) {
        self.struck.push(enemy_id);
    }

    pub fn destroy(&mut self) {
        self.body.alive = false;
    }

    pub fn update(&mut self, dt: f32, terrain: &Terrain, ctx: &mut SimContext) {
        if !self.alive() {
            return;
        }

        self.body.step(dt, terrain);
        let blocked = self.body.blocked;
        self.note_contacts(blocked.down, blocked.wall(), ctx);
        if !self.alive() {
            return;
        }

        let left = view_left(ctx.player_position().x);
        let pos = self.body.pos;
        if pos.y > GAME_HEIGHT + OFFSCREEN_MARGIN
            || pos.x < left - OFFSCREEN_MARGIN
            || pos.x > left + GAME_WIDTH + OFFSCREEN_MARGIN
            || ctx.now() - self.spawned_at > BALL_LIFETIME
        {
            self.destroy();
        }
    }

    /// Count contacts that started this step; retire the ball past its budget
    fn note_contacts(&mut self, down: bool, wall: bool, ctx: &mut SimContext) {
        let new_down = down && !self.was_down;
        let new_wall = wall && !self.was_wall;
        self.was_down = down;
        self.was_wall = wall;

        if new_down {
            self.bounces += 1;
            self.touched_surface = true;
            ctx.emit(GameEvent::BallBounced);
            if self.bounces > self.max_bounces {
                self.destroy();
                return;
            }
        }
        if new_wall {
            self.bounces += 1;
            self.touched_surface = true;
            ctx.emit(GameEvent::BallRicocheted);
            if self.bounces > self.max_bounces {
                self.destroy();
            }
        }
    }
}

/// A fan's snowball: straight line, no gravity, breaks on anything
#[derive(Debug, Clone)]
pub struct Snowball {
    pub id: u32,
    pub body: KinematicBody,
    pub damage: i32,
    pub direction: f32,
}

impl Snowball {
    pub fn new(id: u32, pos: Vec2, direction: f32) -> Self {
        let mut body = KinematicBody::new(pos, Vec2::splat(SNOWBALL_RADIUS * 2.0));
        body.gravity_scale = 0.0;
        body.solid = false;
        body.clamp_to_world = false;
        body.vel = Vec2::new(direction * SNOWBALL_SPEED, 0.0);
        Self {
            id,
            body,
            damage: SNOWBALL_DAMAGE,
            direction,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.body.alive
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn update(&mut self, dt: f32, terrain: &Terrain, ctx: &mut SimContext) {
        if !self.alive() {
            return;
        }
        self.body.step(dt, terrain);

        let left = view_left(ctx.player_position().x);
        let x = self.body.pos.x;
        if x < left - OFFSCREEN_MARGIN || x > left + GAME_WIDTH + OFFSCREEN_MARGIN {
            self.body.alive = false;
        }
    }

    /// Break apart with a cosmetic burst
    pub fn shatter(&mut self, ctx: &mut SimContext) {
        if !self.alive() {
            return;
        }
        ctx.emit(GameEvent::SnowballShattered { pos: self.body.pos });
        self.body.alive = false;
    }
}
