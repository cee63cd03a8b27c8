//! The narrow window entities get onto the rest of the simulation
//!
//! Entities never see the whole [`GameState`](super::GameState). During an
//! update they get a [`SimContext`]: the clock, where the player is, a way to
//! spawn projectiles, the score/combo systems and the event queue.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combo::{ComboCue, ComboState};
use super::events::{GameEvent, ScoreLabel};
use super::projectile::{Ball, Snowball};
use super::score::ScoreState;

/// Shared simulation services owned by the game state
#[derive(Debug, Clone)]
pub struct Systems {
    pub rng: Pcg32,
    pub score: ScoreState,
    pub combo: ComboState,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Projectiles spawned during the current update pass
    pub pending_balls: Vec<Ball>,
    pub pending_snowballs: Vec<Snowball>,
    next_id: u32,
}

impl Systems {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            score: ScoreState::new(),
            combo: ComboState::new(),
            events: Vec::new(),
            pending_balls: Vec::new(),
            pending_snowballs: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Borrow the services for one update pass at time `now`
    pub fn context(&mut self, now: f32, player_pos: Vec2) -> SimContext<'_> {
        SimContext {
            now,
            player_pos,
            systems: self,
        }
    }
}

pub struct SimContext<'a> {
    now: f32,
    player_pos: Vec2,
    systems: &'a mut Systems,
}

impl SimContext<'_> {
    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    #[inline]
    pub fn player_position(&self) -> Vec2 {
        self.player_pos
    }

    pub fn set_player_position(&mut self, pos: Vec2) {
        self.player_pos = pos;
    }

    pub fn next_entity_id(&mut self) -> u32 {
        self.systems.next_entity_id()
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.systems.events.push(event);
    }

    /// Queue a thrown ball; its tier and stats derive from `charge`
    pub fn spawn_ball(&mut self, pos: Vec2, direction: f32, charge: f32) -> u32 {
        let id = self.systems.next_entity_id();
        let ball = Ball::new(id, pos, direction, charge, self.now);
        self.emit(GameEvent::BallThrown { tier: ball.tier });
        self.systems.pending_balls.push(ball);
        id
    }

    pub fn spawn_snowball(&mut self, pos: Vec2, direction: f32) -> u32 {
        let id = self.systems.next_entity_id();
        self.systems
            .pending_snowballs
            .push(Snowball::new(id, pos, direction));
        self.emit(GameEvent::SnowballThrown { id });
        id
    }

    /// Uniform sample in [0, 1)
    pub fn random(&mut self) -> f32 {
        self.systems.rng.random::<f32>()
    }

    /// Uniform index in [0, len)
    pub fn random_index(&mut self, len: usize) -> usize {
        self.systems.rng.random_range(0..len.max(1))
    }

    #[inline]
    pub fn combo_multiplier(&self) -> u32 {
        self.systems.combo.multiplier()
    }

    /// Award `base` points through the current combo multiplier
    pub fn award_points(&mut self, base: u64, pos: Vec2) -> u64 {
        let multiplier = self.systems.combo.multiplier();
        let amount = self.systems.score.add_points(base, multiplier);
        self.emit(GameEvent::PointsAwarded { amount, pos });
        amount
    }

    pub fn label(&mut self, label: ScoreLabel, pos: Vec2) {
        self.emit(GameEvent::Label { label, pos });
    }

    /// Count a successful hit toward the streak
    pub fn register_hit(&mut self) {
        match self.systems.combo.add_hit(self.now) {
            Some(ComboCue::Started) => self.emit(GameEvent::ComboStarted),
            Some(ComboCue::Maxed) => self.emit(GameEvent::ComboMaxed),
            None => {}
        }
        self.emit_combo();
    }

    /// Reset the streak; cancels maxed mode early
    pub fn break_combo(&mut self) {
        let was_maxed = self.systems.combo.is_maxed();
        self.systems.combo.break_combo();
        if was_maxed {
            self.emit(GameEvent::ComboMaxedEnded);
        }
        self.emit_combo();
    }

    /// Leave maxed mode once its window has passed
    pub fn expire_combo(&mut self) {
        if self.systems.combo.update(self.now) {
            self.emit(GameEvent::ComboMaxedEnded);
            self.emit_combo();
        }
    }

    fn emit_combo(&mut self) {
        let combo = &self.systems.combo;
        let event = GameEvent::ComboChanged {
            hits: combo.hits(),
            multiplier: combo.multiplier(),
            maxed: combo.is_maxed(),
        };
        self.emit(event);
    }
}
