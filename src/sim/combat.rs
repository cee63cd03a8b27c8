//! Combat resolution, run once per tick after everything has moved
//!
//! Pass order is fixed: balls vs enemies, snowballs vs player, balls vs
//! snowballs, then enemy contact. Chain kills and score-before-combo-bump
//! depend on it.

use glam::Vec2;

use super::collision::{point_in_aabb, within_radius};
use super::score::SNOWBALL_INTERCEPT_POINTS;
use super::state::{FADE_DURATION, FadingEnemy, GameState};

/// Ball center to snowball center distance for an intercept
pub const INTERCEPT_RADIUS: f32 = 15.0;
/// Tolerance around the player's hitbox for snowball hits
pub const SNOWBALL_HIT_MARGIN: f32 = 6.0;

pub fn resolve_combat(state: &mut GameState) {
    let now = state.time;
    let mut ctx = state.systems.context(now, state.player.pos());

    // Balls vs enemies
    for ball in state.balls.iter_mut() {
        for enemy in state.enemies.iter_mut() {
            if !ball.alive() {
                break;
            }
            if !enemy.alive
                || ball.has_struck(enemy.id)
                || !within_radius(ball.pos(), enemy.pos(), enemy.stats.hit_radius)
            {
                continue;
            }
            let hit = ball.hit_info();
            ball.mark_struck(enemy.id);
            enemy.take_damage(ball.damage, Some(&hit), &mut ctx);
            if !ball.survives_hit() {
                ball.destroy();
            }
        }
    }

    // Snowballs vs player
    let hitbox = state.player.hitbox();
    for snowball in state.snowballs.iter_mut() {
        if !snowball.alive() {
            continue;
        }
        if point_in_aabb(snowball.pos(), &hitbox, SNOWBALL_HIT_MARGIN) {
            state.player.take_damage(snowball.damage, &mut ctx);
            snowball.shatter(&mut ctx);
        }
    }

    // Balls vs snowballs
    for ball in state.balls.iter() {
        if !ball.alive() {
            continue;
        }
        for snowball in state.snowballs.iter_mut() {
            if !snowball.alive() || !within_radius(ball.pos(), snowball.pos(), INTERCEPT_RADIUS) {
                continue;
            }
            let pos = snowball.pos();
            snowball.shatter(&mut ctx);
            ctx.award_points(SNOWBALL_INTERCEPT_POINTS, pos - Vec2::new(0.0, 10.0));
        }
    }

    // Enemy contact
    let player_pos = state.player.pos();
    for enemy in state.enemies.iter() {
        if !enemy.alive || enemy.is_stunned(now) {
            continue;
        }
        if within_radius(player_pos, enemy.pos(), enemy.stats.hit_radius) {
            state.player.take_damage(enemy.stats.contact_damage, &mut ctx);
        }
    }

    state.balls.retain(|b| b.alive());
    state.snowballs.retain(|s| s.alive());

    let (live, defeated): (Vec<_>, Vec<_>) =
        std::mem::take(&mut state.enemies).into_iter().partition(|e| e.alive);
    state.enemies = live;
    state.fading.extend(defeated.into_iter().map(|enemy| FadingEnemy {
        enemy,
        until: now + FADE_DURATION,
    }));
}
