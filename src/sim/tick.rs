//! Variable-step simulation tick
//!
//! One call per rendered frame. Order inside a tick is a contract: player,
//! wave triggers, side quest, balls, enemies, snowballs, combat, completion.

use glam::Vec2;

use super::combat::resolve_combat;
use super::dialogue::{DialogueChoice, DialogueResult};
use super::enemy::Enemy;
use super::events::{GameEvent, ScoreLabel};
use super::input::InputSnapshot;
use super::score::{GOOD_CHOICE_POINTS, NO_DAMAGE_BONUS};
use super::state::{END_PROMO_DELAY, GamePhase, GameState};
use crate::consts::*;

/// Damage dealt by the bad side-quest choice
pub const BAD_CHOICE_DAMAGE: i32 = 10;

/// Advance the game state by `dt` seconds of wall time
pub fn tick(state: &mut GameState, input: &InputSnapshot, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.systems.events.push(GameEvent::Paused);
                log::info!("paused at t={:.2}", state.time);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.systems.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    let dt = dt.clamp(0.0, MAX_TICK_DT);
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Complete => {
            state.time += dt;
            update_end_promo(state);
            return;
        }
        GamePhase::Playing => {}
    }

    if state.dialogue.is_active() {
        return;
    }

    state.time += dt;
    let now = state.time;

    {
        let mut ctx = state.systems.context(now, state.player.pos());
        ctx.expire_combo();
        state.player.update(input, dt, &state.terrain, &mut ctx);
    }
    state.balls.append(&mut state.systems.pending_balls);

    spawn_waves(state);
    trigger_side_quest(state);

    let player_pos = state.player.pos();
    {
        let mut ctx = state.systems.context(now, player_pos);
        for ball in state.balls.iter_mut() {
            ball.update(dt, &state.terrain, &mut ctx);
        }
        for enemy in state.enemies.iter_mut() {
            enemy.update(dt, &state.terrain, &mut ctx);
        }
    }
    state.balls.retain(|b| b.alive());
    state.enemies.retain(|e| e.alive);
    state.snowballs.append(&mut state.systems.pending_snowballs);
    {
        let mut ctx = state.systems.context(now, player_pos);
        for snowball in state.snowballs.iter_mut() {
            snowball.update(dt, &state.terrain, &mut ctx);
        }
    }
    state.snowballs.retain(|s| s.alive());
    state.fading.retain(|f| f.until > now);

    resolve_combat(state);

    if check_game_over(state) {
        return;
    }
    check_level_complete(state);
}

/// Spawn every not-yet-spawned wave whose trigger the player has passed
///
/// A big enough jump releases several waves in the same tick.
fn spawn_waves(state: &mut GameState) {
    let player_pos = state.player.pos();
    let mut ctx = state.systems.context(state.time, player_pos);

    for (index, wave) in state.schedule.waves.iter().enumerate() {
        if state.waves_spawned[index] || wave.trigger_x >= player_pos.x {
            continue;
        }
        state.waves_spawned[index] = true;

        for spawn in &wave.enemies {
            let half_height = spawn.variant.stats().size.y / 2.0;
            let pos = Vec2::new(spawn.x, state.terrain.ground_y - half_height);
            state.enemies.push(Enemy::spawn(spawn.variant, pos, &mut ctx));
        }
        ctx.emit(GameEvent::WaveSpawned {
            index,
            enemies: wave.enemies.len(),
        });
        log::info!(
            "wave {} spawned ({} enemies) at x={:.0}",
            index + 1,
            wave.enemies.len(),
            player_pos.x
        );
    }
}

fn trigger_side_quest(state: &mut GameState) {
    if state.side_quest_fired {
        return;
    }
    let Some(quest) = &state.schedule.side_quest else {
        return;
    };
    if quest.trigger_x >= state.player.pos().x {
        return;
    }

    state.side_quest_fired = true;
    if state.dialogue.show(quest.dialogue.clone()) {
        state.systems.events.push(GameEvent::DialogueOpened);
        log::info!("side quest opened: {}", quest.dialogue.speaker);
    }
}

/// Apply the outcome of the open dialogue exactly once
///
/// Returns the applied result, or `None` if no dialogue was open.
pub fn resolve_dialogue(state: &mut GameState, choice: DialogueChoice) -> Option<DialogueResult> {
    let Some(result) = state.dialogue.resolve(choice) else {
        log::warn!("resolve_dialogue called with no dialogue open");
        return None;
    };

    let pos = state.player.pos();
    let mut ctx = state.systems.context(state.time, pos);
    ctx.emit(GameEvent::DialogueResolved { result });
    match result {
        DialogueResult::Good => {
            ctx.award_points(GOOD_CHOICE_POINTS, pos - Vec2::new(0.0, 30.0));
            ctx.label(ScoreLabel::ProcessApproved, pos);
        }
        DialogueResult::Bad => {
            state.player.take_penalty(BAD_CHOICE_DAMAGE, &mut ctx);
            ctx.label(ScoreLabel::BadProcess, pos);
        }
    }
    log::info!("dialogue resolved: {:?}", result);

    check_game_over(state);
    Some(result)
}

fn check_game_over(state: &mut GameState) -> bool {
    if !state.player.is_dead() {
        return false;
    }
    if state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        log::info!("game over at t={:.2} with score {}", state.time, state.score());
    }
    true
}

fn check_level_complete(state: &mut GameState) {
    if state.phase != GamePhase::Playing
        || state.dialogue.is_active()
        || !state.all_waves_spawned()
        || !state.enemies.is_empty()
        || state.player.pos().x <= state.schedule.finish_x
    {
        return;
    }

    let now = state.time;
    state.phase = GamePhase::Complete;
    state.completed_at = Some(now);

    let pos = state.player.pos();
    let mut ctx = state.systems.context(now, pos);
    ctx.emit(GameEvent::LevelComplete);
    if !state.player.took_damage() {
        ctx.award_points(NO_DAMAGE_BONUS, pos - Vec2::new(0.0, 40.0));
        ctx.label(ScoreLabel::NoDamageBonus, pos - Vec2::new(0.0, 30.0));
    }
    log::info!(
        "level '{}' complete at t={:.2} with score {}",
        state.schedule.name,
        now,
        state.score()
    );
}

fn update_end_promo(state: &mut GameState) {
    if state.promo_shown {
        return;
    }
    if state
        .completed_at
        .is_some_and(|done| state.time >= done + END_PROMO_DELAY)
    {
        state.promo_shown = true;
        state.systems.events.push(GameEvent::EndPromo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::level_one;
    use crate::sim::projectile::Ball;

    fn count(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.systems.events.iter().filter(|e| pred(e)).count()
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut state = GameState::new(12345, level_one());
        tick(&mut state, &idle(), FRAME_DT);
        assert!((state.time - FRAME_DT).abs() < 1e-6);

        // A one-second hitch only advances the clock by the cap
        tick(&mut state, &idle(), 1.0);
        assert!((state.time - FRAME_DT - MAX_TICK_DT).abs() < 1e-6);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345, level_one());
        tick(&mut state, &idle(), FRAME_DT);

        let pause = InputSnapshot {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.time;
        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.time, frozen);

        // Unpause
        tick(&mut state, &pause, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.time > frozen);
        assert_eq!(count(&state, |e| *e == GameEvent::Paused), 1);
        assert_eq!(count(&state, |e| *e == GameEvent::Resumed), 1);
    }

    #[test]
    fn test_first_wave_triggers_once() {
        let mut state = GameState::new(1, level_one());
        state.player.body.pos.x = 250.0;
        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.enemies.len(), 2);
        assert!(state.waves_spawned[0]);

        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::WaveSpawned { .. })), 1);
    }

    #[test]
    fn test_wave_needs_player_strictly_past_trigger() {
        let mut state = GameState::new(1, level_one());
        state.player.body.pos.x = 200.0;
        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.player.pos().x, 200.0);
        assert!(!state.waves_spawned[0]);
        assert!(state.enemies.is_empty());

        state.player.body.pos.x = 200.5;
        tick(&mut state, &idle(), FRAME_DT);
        assert!(state.waves_spawned[0]);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_side_quest_needs_player_strictly_past_trigger() {
        let mut state = GameState::new(1, level_one());
        state.waves_spawned.iter_mut().for_each(|w| *w = true);
        state.player.body.pos.x = 1400.0;
        tick(&mut state, &idle(), FRAME_DT);
        assert!(!state.dialogue.is_active());
        assert!(!state.side_quest_fired);

        state.player.body.pos.x = 1400.5;
        tick(&mut state, &idle(), FRAME_DT);
        assert!(state.dialogue.is_active());
        assert_eq!(count(&state, |e| *e == GameEvent::DialogueOpened), 1);
    }

    #[test]
    fn test_waves_batch_trigger_when_player_jumps_ahead() {
        let mut state = GameState::new(1, level_one());
        state.side_quest_fired = true;
        state.player.body.pos.x = 2100.0;
        tick(&mut state, &idle(), FRAME_DT);

        assert!(state.all_waves_spawned());
        assert_eq!(state.enemies.len(), 9);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::WaveSpawned { .. })), 3);
    }

    #[test]
    fn test_side_quest_gate_and_bad_choice() {
        let mut state = GameState::new(1, level_one());
        state.player.body.pos.x = 1450.0;
        tick(&mut state, &idle(), FRAME_DT);
        assert!(state.dialogue.is_active());
        assert_eq!(count(&state, |e| *e == GameEvent::DialogueOpened), 1);

        // Gate open: ticks are no-ops
        let time = state.time;
        let enemy_x: Vec<f32> = state.enemies.iter().map(|e| e.pos().x).collect();
        for _ in 0..30 {
            tick(&mut state, &idle(), FRAME_DT);
        }
        assert_eq!(state.time, time);
        let after: Vec<f32> = state.enemies.iter().map(|e| e.pos().x).collect();
        assert_eq!(enemy_x, after);

        let choice = DialogueChoice {
            choice_index: 0,
            result: DialogueResult::Bad,
        };
        assert_eq!(resolve_dialogue(&mut state, choice), Some(DialogueResult::Bad));
        assert_eq!(state.player.hp, 90);
        assert!(state.systems.events.contains(&GameEvent::Label {
            label: ScoreLabel::BadProcess,
            pos: state.player.pos(),
        }));

        // A doubled callback changes nothing
        assert_eq!(resolve_dialogue(&mut state, choice), None);
        assert_eq!(state.player.hp, 90);

        // Still past the trigger, but the gate stays shut
        tick(&mut state, &idle(), FRAME_DT);
        assert!(!state.dialogue.is_active());
        assert_eq!(count(&state, |e| *e == GameEvent::DialogueOpened), 1);
    }

    #[test]
    fn test_bad_choice_lands_during_hit_invincibility() {
        let mut state = GameState::new(1, level_one());
        {
            let mut ctx = state.systems.context(state.time, state.player.pos());
            assert!(state.player.take_damage(15, &mut ctx));
        }
        state.player.body.pos.x = 1450.0;
        tick(&mut state, &idle(), FRAME_DT);
        assert!(state.dialogue.is_active());

        // The clock is frozen behind the gate, so the hit window never runs out
        for _ in 0..120 {
            tick(&mut state, &idle(), FRAME_DT);
        }
        assert!(state.player.is_invincible(state.time));

        let choice = DialogueChoice {
            choice_index: 0,
            result: DialogueResult::Bad,
        };
        assert_eq!(resolve_dialogue(&mut state, choice), Some(DialogueResult::Bad));
        assert_eq!(state.player.hp, 100 - 15 - BAD_CHOICE_DAMAGE);
    }

    #[test]
    fn test_good_choice_awards_points() {
        let mut state = GameState::new(1, level_one());
        state.player.body.pos.x = 1450.0;
        tick(&mut state, &idle(), FRAME_DT);
        let before = state.score();
        let choice = DialogueChoice {
            choice_index: 1,
            result: DialogueResult::Good,
        };
        assert_eq!(resolve_dialogue(&mut state, choice), Some(DialogueResult::Good));
        assert_eq!(state.score(), before + GOOD_CHOICE_POINTS);
        assert_eq!(state.player.hp, 100);
    }

    /// Past the finish with every wave out and one weak fan left standing
    fn stage_last_fan(state: &mut GameState) {
        state.side_quest_fired = true;
        state.waves_spawned.iter_mut().for_each(|w| *w = true);
        state.player.body.pos.x = 2550.0;

        let mut ctx = state.systems.context(state.time, state.player.pos());
        let mut fan = Enemy::spawn(
            crate::sim::EnemyVariant::Normal,
            Vec2::new(2750.0, GROUND_Y - 18.0),
            &mut ctx,
        );
        fan.hp = 10;
        state.enemies.push(fan);
    }

    fn drop_ball_on_last_fan(state: &mut GameState) {
        let pos = state.enemies[0].pos();
        let id = state.systems.next_entity_id();
        state.balls.push(Ball::new(id, pos, 1.0, 0.0, state.time));
        tick(state, &idle(), FRAME_DT);
    }

    fn has_no_damage_label(state: &GameState) -> bool {
        state.systems.events.iter().any(|e| {
            matches!(
                e,
                GameEvent::Label {
                    label: ScoreLabel::NoDamageBonus,
                    ..
                }
            )
        })
    }

    #[test]
    fn test_level_complete_waits_for_last_enemy() {
        let mut state = GameState::new(1, level_one());
        stage_last_fan(&mut state);

        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 1);

        // Drop a ball on the last fan: it dies and the level ends this tick
        drop_ball_on_last_fan(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::Complete);
        assert_eq!(count(&state, |e| *e == GameEvent::LevelComplete), 1);
        assert!(has_no_damage_label(&state));
        // 150 kill + 100 bonus + 1000 no-damage, all at x1
        assert_eq!(state.score(), 1250);
    }

    #[test]
    fn test_single_hit_forfeits_no_damage_bonus() {
        let mut state = GameState::new(1, level_one());
        {
            let mut ctx = state.systems.context(state.time, state.player.pos());
            assert!(state.player.take_damage(5, &mut ctx));
        }
        stage_last_fan(&mut state);
        tick(&mut state, &idle(), FRAME_DT);
        drop_ball_on_last_fan(&mut state);

        assert_eq!(state.phase, GamePhase::Complete);
        assert!(!has_no_damage_label(&state));
        assert_eq!(state.score(), 250);
    }

    #[test]
    fn test_lost_life_forfeits_bonus_despite_full_hp() {
        let mut state = GameState::new(1, level_one());
        state.player.hp = 10;
        {
            let mut ctx = state.systems.context(state.time, state.player.pos());
            assert!(state.player.take_damage(15, &mut ctx));
        }
        // Respawned with a full bar, but the run is no longer clean
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.player.lives, 2);

        stage_last_fan(&mut state);
        tick(&mut state, &idle(), FRAME_DT);
        drop_ball_on_last_fan(&mut state);

        assert_eq!(state.phase, GamePhase::Complete);
        assert!(!has_no_damage_label(&state));
        assert_eq!(state.score(), 250);
    }

    #[test]
    fn test_end_promo_after_delay() {
        let mut state = GameState::new(1, level_one());
        state.phase = GamePhase::Complete;
        state.completed_at = Some(state.time);

        for _ in 0..170 {
            tick(&mut state, &idle(), FRAME_DT);
        }
        assert!(!state.promo_shown);
        for _ in 0..20 {
            tick(&mut state, &idle(), FRAME_DT);
        }
        assert!(state.promo_shown);
        assert_eq!(count(&state, |e| *e == GameEvent::EndPromo), 1);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = GameState::new(1, level_one());
        state.player.lives = 1;
        state.player.hp = 10;
        let pos = state.player.pos();
        let id = state.systems.next_entity_id();
        state
            .snowballs
            .push(crate::sim::Snowball::new(id, pos, -1.0));

        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(count(&state, |e| *e == GameEvent::PlayerDied), 1);

        let time = state.time;
        tick(&mut state, &idle(), FRAME_DT);
        assert_eq!(state.time, time);
        assert_eq!(count(&state, |e| *e == GameEvent::PlayerDied), 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, level_one());
        let mut state2 = GameState::new(99999, level_one());

        let walk = InputSnapshot {
            right: true,
            ..Default::default()
        };
        let throw = InputSnapshot {
            right: true,
            action_a: true,
            ..Default::default()
        };
        for frame in 0..600 {
            let input = if frame % 20 < 3 { &throw } else { &walk };
            tick(&mut state1, input, FRAME_DT);
            tick(&mut state2, input, FRAME_DT);
        }

        assert_eq!(state1.time, state2.time);
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.pos(), b.pos());
        }
        assert_eq!(state1.player.pos(), state2.player.pos());
    }
}
