//! Minimal platformer kinematics
//!
//! Every moving entity embeds a [`KinematicBody`]. Axes are resolved one at a
//! time (horizontal first) against the static [`Terrain`], which is the usual
//! platformer convention and avoids diagonal contact resolution entirely.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::aabb_overlap;
use crate::consts::*;

/// Rebound speeds below this settle instead of bouncing forever
pub const REST_SPEED: f32 = 40.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Contact flags, recomputed every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocked {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Blocked {
    #[inline]
    pub fn wall(&self) -> bool {
        self.left || self.right
    }
}

/// Static level geometry: a floor plane, solid props and the level's side walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub ground_y: f32,
    pub width: f32,
    pub solids: Vec<Aabb>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self {
            ground_y: GROUND_Y,
            width: LEVEL_WIDTH,
            solids: Vec::new(),
        }
    }
}

impl Terrain {
    pub fn with_solids(solids: Vec<Aabb>) -> Self {
        Self {
            solids,
            ..Default::default()
        }
    }
}

/// Position/velocity/box for a single entity (position is the box center)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Multiplier on world gravity (0 disables gravity)
    pub gravity_scale: f32,
    /// Downward speed cap
    pub max_fall_speed: f32,
    /// Fraction of speed kept when bouncing off a surface (0 = stop dead)
    pub restitution: f32,
    /// Whether the body collides with terrain at all
    pub solid: bool,
    /// Whether the level's side walls stop the body
    pub clamp_to_world: bool,
    pub blocked: Blocked,
    pub alive: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            gravity_scale: 1.0,
            max_fall_speed: MAX_FALL_SPEED,
            restitution: 0.0,
            solid: true,
            clamp_to_world: true,
            blocked: Blocked::default(),
            alive: true,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.blocked.down
    }

    /// Resize the box keeping its bottom edge in place
    pub fn resize_anchored_bottom(&mut self, size: Vec2) {
        let bottom = self.pos.y + self.size.y / 2.0;
        self.size = size;
        self.pos.y = bottom - size.y / 2.0;
    }

    /// Integrate one step of `dt` seconds against the terrain
    pub fn step(&mut self, dt: f32, terrain: &Terrain) {
        self.blocked = Blocked::default();
        if !self.alive {
            return;
        }

        if self.gravity_scale != 0.0 {
            self.vel.y += GRAVITY * self.gravity_scale * dt;
        }
        self.vel.y = self.vel.y.min(self.max_fall_speed);

        self.pos.x += self.vel.x * dt;
        if self.solid {
            self.resolve_horizontal(terrain);
        }

        self.pos.y += self.vel.y * dt;
        if self.solid {
            self.resolve_vertical(terrain);
        }
    }

    fn resolve_horizontal(&mut self, terrain: &Terrain) {
        let half = self.size / 2.0;
        for solid in &terrain.solids {
            if !aabb_overlap(&self.aabb(), solid) {
                continue;
            }
            // Push out on the side we came from; a stationary overlap uses the shallower side
            let from_left = if self.vel.x != 0.0 {
                self.vel.x > 0.0
            } else {
                self.pos.x < solid.center().x
            };
            if from_left {
                self.pos.x = solid.min.x - half.x;
                self.blocked.right = true;
            } else {
                self.pos.x = solid.max.x + half.x;
                self.blocked.left = true;
            }
            self.vel.x = self.rebound(self.vel.x);
        }

        if self.clamp_to_world {
            if self.pos.x - half.x < 0.0 {
                self.pos.x = half.x;
                self.blocked.left = true;
                self.vel.x = self.rebound(self.vel.x);
            } else if self.pos.x + half.x > terrain.width {
                self.pos.x = terrain.width - half.x;
                self.blocked.right = true;
                self.vel.x = self.rebound(self.vel.x);
            }
        }
    }

    fn resolve_vertical(&mut self, terrain: &Terrain) {
        let half = self.size / 2.0;
        for solid in &terrain.solids {
            if !aabb_overlap(&self.aabb(), solid) {
                continue;
            }
            if self.vel.y >= 0.0 {
                self.pos.y = solid.min.y - half.y;
                self.blocked.down = true;
            } else {
                self.pos.y = solid.max.y + half.y;
                self.blocked.up = true;
            }
            self.vel.y = self.rebound(self.vel.y);
        }

        if self.pos.y + half.y > terrain.ground_y {
            self.pos.y = terrain.ground_y - half.y;
            self.blocked.down = true;
            if self.vel.y > 0.0 {
                self.vel.y = self.rebound(self.vel.y);
            }
        }
    }

    fn rebound(&self, speed: f32) -> f32 {
        let out = -speed * self.restitution;
        if out.abs() < REST_SPEED { 0.0 } else { out }
    }
}
