//! The player: movement, jump, duck, dodge and the charge/throw state machine

use glam::Vec2;

use super::body::{Aabb, KinematicBody, Terrain};
use super::context::SimContext;
use super::events::GameEvent;
use super::input::InputSnapshot;

pub const PLAYER_WIDTH: f32 = 24.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLAYER_DUCK_HEIGHT: f32 = 24.0;
pub const MOVE_SPEED: f32 = 160.0;
pub const JUMP_VELOCITY: f32 = -350.0;
pub const MAX_HP: i32 = 100;
pub const START_LIVES: u8 = 3;

/// Invincibility after a hit (seconds)
pub const HIT_INVINCIBILITY: f32 = 0.75;
/// Invincibility after losing a life
pub const RESPAWN_INVINCIBILITY: f32 = 2.0;

/// Holding the action button longer than this starts a charge
pub const HOLD_THRESHOLD: f32 = 0.12;
/// Time from zero to full charge
pub const MAX_CHARGE_TIME: f32 = 1.5;

/// Two presses of a direction within this window trigger a dodge
pub const DOUBLE_TAP_WINDOW: f32 = 0.25;
pub const DODGE_DURATION: f32 = 0.3;
pub const DODGE_INVINCIBILITY: f32 = 0.4;
pub const DODGE_SPEED: f32 = 350.0;

/// Where the ball leaves the hand, relative to body center (x is mirrored by facing)
const THROW_OFFSET: Vec2 = Vec2::new(20.0, -5.0);
/// Seconds per walk-cycle frame
const WALK_FRAME_TIME: f32 = 0.15;
/// Invincibility flicker half-period
const FLICKER_PERIOD: f32 = 0.08;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: KinematicBody,
    pub hp: i32,
    pub max_hp: i32,
    pub lives: u8,
    /// +1 right, -1 left
    pub facing: f32,
    /// 0..=1 while charging
    pub charge: f32,
    pub charging: bool,
    pub ducking: bool,
    /// 0..4 walk cycle
    pub walk_frame: u8,
    charge_start: f32,
    charge_ready_sent: bool,
    action_pressed_at: f32,
    prev_action: bool,
    prev_left: bool,
    prev_right: bool,
    last_left_tap: f32,
    last_right_tap: f32,
    invincible_until: f32,
    dodge_until: f32,
    walk_timer: f32,
    took_damage: bool,
    dead: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: KinematicBody::new(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            hp: MAX_HP,
            max_hp: MAX_HP,
            lives: START_LIVES,
            facing: 1.0,
            charge: 0.0,
            charging: false,
            ducking: false,
            walk_frame: 0,
            charge_start: 0.0,
            charge_ready_sent: false,
            action_pressed_at: 0.0,
            prev_action: false,
            prev_left: false,
            prev_right: false,
            last_left_tap: f32::NEG_INFINITY,
            last_right_tap: f32::NEG_INFINITY,
            invincible_until: f32::NEG_INFINITY,
            dodge_until: f32::NEG_INFINITY,
            walk_timer: 0.0,
            took_damage: false,
            dead: false,
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
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[inline]
    pub fn is_invincible(&self, now: f32) -> bool {
        now < self.invincible_until
    }

    #[inline]
    pub fn is_dodging(&self, now: f32) -> bool {
        now < self.dodge_until
    }

    /// Whether hp has ever dropped below max this level
    #[inline]
    pub fn took_damage(&self) -> bool {
        self.took_damage
    }

    /// Renderer hint: skip drawing on alternate flicker frames
    pub fn flicker_hidden(&self, now: f32) -> bool {
        self.is_invincible(now) && ((now / FLICKER_PERIOD) as i64) % 2 == 0
    }

    pub fn update(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        terrain: &Terrain,
        ctx: &mut SimContext,
    ) {
        if self.dead {
            return;
        }
        let now = ctx.now();
        let on_ground = self.body.on_ground();

        // Double-tap dodge
        if input.left && !self.prev_left {
            if now - self.last_left_tap < DOUBLE_TAP_WINDOW {
                self.dodge(-1.0, ctx);
            }
            self.last_left_tap = now;
        }
        if input.right && !self.prev_right {
            if now - self.last_right_tap < DOUBLE_TAP_WINDOW {
                self.dodge(1.0, ctx);
            }
            self.last_right_tap = now;
        }
        self.prev_left = input.left;
        self.prev_right = input.right;

        let dodging = self.is_dodging(now);
        let mut moving = false;
        if dodging {
            // Dodge burst keeps its velocity
        } else if input.left {
            self.body.vel.x = -MOVE_SPEED;
            self.facing = -1.0;
            moving = true;
        } else if input.right {
            self.body.vel.x = MOVE_SPEED;
            self.facing = 1.0;
            moving = true;
        } else {
            self.body.vel.x = 0.0;
        }

        if input.jump() && on_ground {
            self.body.vel.y = JUMP_VELOCITY;
        }

        if input.down && on_ground && !dodging {
            if !self.ducking {
                self.ducking = true;
                self.body
                    .resize_anchored_bottom(Vec2::new(PLAYER_WIDTH, PLAYER_DUCK_HEIGHT));
            }
            self.body.vel.x = 0.0;
        } else if self.ducking {
            self.ducking = false;
            self.body
                .resize_anchored_bottom(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
        }

        self.update_charge(input.action_a, now, ctx);

        if moving && on_ground {
            self.walk_timer += dt;
            if self.walk_timer > WALK_FRAME_TIME {
                self.walk_frame = (self.walk_frame + 1) % 4;
                self.walk_timer = 0.0;
            }
        } else {
            self.walk_frame = 0;
            self.walk_timer = 0.0;
        }

        self.body.step(dt, terrain);
    }

    /// Tap throws immediately on release; hold past the threshold charges
    fn update_charge(&mut self, action: bool, now: f32, ctx: &mut SimContext) {
        if action && !self.prev_action {
            self.action_pressed_at = now;
        }

        if action && now - self.action_pressed_at >= HOLD_THRESHOLD {
            if !self.charging {
                self.charging = true;
                self.charge_start = now;
            }
            self.charge = ((now - self.charge_start) / MAX_CHARGE_TIME).min(1.0);
            if self.charge >= 1.0 && !self.charge_ready_sent {
                self.charge_ready_sent = true;
                ctx.emit(GameEvent::ChargeReady);
            }
        }

        if !action && self.prev_action {
            if !self.charging {
                self.charge = 0.0;
            }
            self.fire(ctx);
            self.charging = false;
            self.charge = 0.0;
            self.charge_ready_sent = false;
        }

        self.prev_action = action;
    }

    /// Throw a ball at the current charge level
    pub fn fire(&mut self, ctx: &mut SimContext) {
        let offset = Vec2::new(THROW_OFFSET.x * self.facing, THROW_OFFSET.y);
        ctx.spawn_ball(self.body.pos + offset, self.facing, self.charge);
    }

    fn dodge(&mut self, direction: f32, ctx: &mut SimContext) {
        let now = ctx.now();
        if self.is_dodging(now) {
            return;
        }
        self.dodge_until = now + DODGE_DURATION;
        self.invincible_until = self.invincible_until.max(now + DODGE_INVINCIBILITY);
        self.body.vel.x = direction * DODGE_SPEED;
        self.facing = direction;
        ctx.emit(GameEvent::PlayerDodged);
    }

    /// Apply damage unless invincible or already out of lives
    ///
    /// Returns true if the hit landed.
    pub fn take_damage(&mut self, amount: i32, ctx: &mut SimContext) -> bool {
        if self.is_invincible(ctx.now()) {
            return false;
        }
        self.apply_damage(amount, ctx)
    }

    /// Damage that ignores hit invincibility, used for scripted penalties.
    /// Still grants the usual post-hit window and costs a life at zero hp.
    pub fn take_penalty(&mut self, amount: i32, ctx: &mut SimContext) -> bool {
        self.apply_damage(amount, ctx)
    }

    fn apply_damage(&mut self, amount: i32, ctx: &mut SimContext) -> bool {
        let now = ctx.now();
        if self.dead || amount <= 0 {
            return false;
        }

        self.hp = (self.hp - amount).max(0);
        self.took_damage = true;
        self.invincible_until = self.invincible_until.max(now + HIT_INVINCIBILITY);
        ctx.emit(GameEvent::PlayerHurt { amount });
        ctx.break_combo();
        ctx.emit(GameEvent::PlayerHealthChanged {
            hp: self.hp,
            max_hp: self.max_hp,
        });

        if self.hp == 0 {
            self.lives = self.lives.saturating_sub(1);
            ctx.emit(GameEvent::PlayerLivesChanged { lives: self.lives });
            if self.lives == 0 {
                self.dead = true;
                ctx.emit(GameEvent::PlayerDied);
            } else {
                // Respawn in place
                self.hp = self.max_hp;
                self.invincible_until = self.invincible_until.max(now + RESPAWN_INVINCIBILITY);
                ctx.emit(GameEvent::PlayerHealthChanged {
                    hp: self.hp,
                    max_hp: self.max_hp,
                });
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::context::Systems;
    use crate::sim::projectile::ChargeTier;

    fn grounded_player() -> Player {
        let mut player = Player::new(Vec2::new(300.0, GROUND_Y - PLAYER_HEIGHT / 2.0));
        player.body.blocked.down = true;
        player
    }

    /// Drive the player through a list of (time, input) frames
    fn run(player: &mut Player, systems: &mut Systems, frames: &[(f32, InputSnapshot)]) {
        let terrain = Terrain::default();
        for (now, input) in frames {
            let mut ctx = systems.context(*now, player.pos());
            player.update(input, FRAME_DT, &terrain, &mut ctx);
        }
    }

    fn held(action_a: bool) -> InputSnapshot {
        InputSnapshot {
            action_a,
            ..Default::default()
        }
    }

    #[test]
    fn test_quick_tap_fires_low_tier() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        run(
            &mut player,
            &mut systems,
            &[(0.0, held(true)), (0.05, held(true)), (0.1, held(false))],
        );
        assert_eq!(systems.pending_balls.len(), 1);
        assert_eq!(systems.pending_balls[0].tier, ChargeTier::Low);
        assert_eq!(systems.pending_balls[0].charge, 0.0);
        assert!(!player.charging);
    }

    #[test]
    fn test_hold_charges_and_fires_full() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        let mut frames = vec![(0.0, held(true))];
        // Threshold at 0.12s, full at 1.62s
        for i in 1..=20 {
            frames.push((i as f32 * 0.1, held(true)));
        }
        run(&mut player, &mut systems, &frames);
        assert!(player.charging);
        assert_eq!(player.charge, 1.0);
        let ready = systems
            .events
            .iter()
            .filter(|e| **e == GameEvent::ChargeReady)
            .count();
        assert_eq!(ready, 1);

        run(&mut player, &mut systems, &[(2.1, held(false))]);
        assert_eq!(systems.pending_balls.len(), 1);
        assert_eq!(systems.pending_balls[0].tier, ChargeTier::Full);
        assert_eq!(player.charge, 0.0);
        assert!(!player.charging);
    }

    #[test]
    fn test_charge_ramps_linearly_from_threshold() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        run(
            &mut player,
            &mut systems,
            &[(0.0, held(true)), (0.2, held(true)), (0.95, held(true))],
        );
        assert!((player.charge - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_new_tap_after_charge_is_not_stale() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        run(
            &mut player,
            &mut systems,
            &[
                (0.0, held(true)),
                (0.2, held(true)),
                (1.5, held(true)),
                (1.6, held(false)),
                (3.0, held(true)),
                (3.05, held(false)),
            ],
        );
        assert_eq!(systems.pending_balls.len(), 2);
        assert_eq!(systems.pending_balls[0].tier, ChargeTier::Full);
        assert_eq!(systems.pending_balls[1].tier, ChargeTier::Low);
    }

    #[test]
    fn test_ball_spawns_in_facing_direction() {
        let mut player = grounded_player();
        player.facing = -1.0;
        let mut systems = Systems::new(0);
        let mut ctx = systems.context(0.0, player.pos());
        player.fire(&mut ctx);
        let ball = &systems.pending_balls[0];
        assert_eq!(ball.pos().x, player.pos().x - 20.0);
        assert!(ball.body.vel.x < 0.0);
    }

    #[test]
    fn test_double_tap_dodges_with_invincibility() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        let right = InputSnapshot {
            right: true,
            ..Default::default()
        };
        let idle = InputSnapshot::default();
        run(
            &mut player,
            &mut systems,
            &[(0.0, right), (0.1, idle), (0.2, right)],
        );
        assert!(player.is_dodging(0.2));
        assert!(player.is_invincible(0.55));
        assert!(!player.is_invincible(0.61));
        assert!(systems.events.contains(&GameEvent::PlayerDodged));

        let mut ctx = systems.context(0.3, player.pos());
        assert!(!player.take_damage(10, &mut ctx));
        assert_eq!(player.hp, MAX_HP);
    }

    #[test]
    fn test_slow_taps_do_not_dodge() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        let left = InputSnapshot {
            left: true,
            ..Default::default()
        };
        let idle = InputSnapshot::default();
        run(
            &mut player,
            &mut systems,
            &[(0.0, left), (0.2, idle), (0.3, left)],
        );
        assert!(!player.is_dodging(0.3));
        assert_eq!(player.body.vel.x, -MOVE_SPEED);
    }

    #[test]
    fn test_duck_shrinks_and_stops() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        let duck_right = InputSnapshot {
            down: true,
            right: true,
            ..Default::default()
        };
        run(&mut player, &mut systems, &[(0.0, duck_right)]);
        assert!(player.ducking);
        assert_eq!(player.hitbox().height(), PLAYER_DUCK_HEIGHT);
        assert_eq!(player.body.vel.x, 0.0);

        run(&mut player, &mut systems, &[(0.1, InputSnapshot::default())]);
        assert!(!player.ducking);
        assert_eq!(player.hitbox().height(), PLAYER_HEIGHT);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        let jump = InputSnapshot {
            up: true,
            ..Default::default()
        };
        run(&mut player, &mut systems, &[(0.0, jump)]);
        assert!(player.body.vel.y < 0.0);
        let airborne_vy = player.body.vel.y;
        run(&mut player, &mut systems, &[(FRAME_DT, jump)]);
        // Gravity only, no second impulse
        assert!(player.body.vel.y > airborne_vy);
    }

    #[test]
    fn test_damage_while_invincible_is_noop() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        {
            let mut ctx = systems.context(1.0, player.pos());
            assert!(player.take_damage(15, &mut ctx));
        }
        systems.events.clear();
        let mut ctx = systems.context(1.5, player.pos());
        assert!(!player.take_damage(15, &mut ctx));
        assert_eq!(player.hp, 85);
        assert!(systems.events.is_empty());
    }

    #[test]
    fn test_penalty_lands_through_invincibility() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        {
            let mut ctx = systems.context(1.0, player.pos());
            assert!(player.take_damage(15, &mut ctx));
        }
        let mut ctx = systems.context(1.2, player.pos());
        assert!(player.is_invincible(1.2));
        assert!(player.take_penalty(10, &mut ctx));
        assert_eq!(player.hp, 75);
        assert!(player.took_damage());
        // The penalty opens a fresh hit window
        assert!(player.is_invincible(1.9));
    }

    #[test]
    fn test_damage_breaks_combo() {
        let mut player = grounded_player();
        let mut systems = Systems::new(0);
        for _ in 0..7 {
            systems.combo.add_hit(0.0);
        }
        let mut ctx = systems.context(1.0, player.pos());
        player.take_damage(10, &mut ctx);
        assert_eq!(systems.combo.hits(), 0);
        assert_eq!(systems.combo.multiplier(), 1);
    }

    #[test]
    fn test_lethal_hit_respawns_with_long_invincibility() {
        let mut player = grounded_player();
        player.hp = 10;
        let mut systems = Systems::new(0);
        let mut ctx = systems.context(5.0, player.pos());
        assert!(player.take_damage(25, &mut ctx));
        assert_eq!(player.hp, MAX_HP);
        assert_eq!(player.lives, START_LIVES - 1);
        assert!(player.is_invincible(6.99));
        assert!(!player.is_invincible(7.0));
        assert!(!player.is_dead());
    }

    #[test]
    fn test_last_life_dies_exactly_once() {
        let mut player = grounded_player();
        player.lives = 1;
        player.hp = 5;
        let mut systems = Systems::new(0);
        {
            let mut ctx = systems.context(1.0, player.pos());
            assert!(player.take_damage(50, &mut ctx));
        }
        assert!(player.is_dead());
        assert_eq!(player.lives, 0);
        assert_eq!(player.hp, 0);

        // Long after invincibility: still nothing changes
        let mut ctx = systems.context(100.0, player.pos());
        assert!(!player.take_damage(50, &mut ctx));
        let deaths = systems
            .events
            .iter()
            .filter(|e| **e == GameEvent::PlayerDied)
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(player.lives, 0);
    }
}
