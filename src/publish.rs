//! Observable state for UI overlays
//!
//! The core is the only writer. Once per tick the session snapshots a
//! [`PublishedState`], diffs it against the previous snapshot and hands the
//! changed fields to a [`PublishPort`].

use serde::Serialize;

use crate::sim::state::END_PROMO_MESSAGE;
use crate::sim::{DialoguePayload, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedState {
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub player_lives: u8,
    pub score: u64,
    pub combo_hits: u32,
    pub combo_multiplier: u32,
    pub combo_maxed: bool,
    /// 0..=1 while charging
    pub charge_level: f32,
    pub level_name: String,
    pub dialogue_active: bool,
    pub dialogue: Option<DialoguePayload>,
    pub show_end_promo: bool,
    pub promo_message: Option<String>,
    pub phase: GamePhase,
}

impl PublishedState {
    pub fn capture(state: &GameState) -> Self {
        let combo = &state.systems.combo;
        let dialogue = state.dialogue.payload().cloned();
        Self {
            player_hp: state.player.hp,
            player_max_hp: state.player.max_hp,
            player_lives: state.player.lives,
            score: state.score(),
            combo_hits: combo.hits(),
            combo_multiplier: combo.multiplier(),
            combo_maxed: combo.is_maxed(),
            charge_level: state.player.charge,
            level_name: state.schedule.name.clone(),
            dialogue_active: dialogue.is_some(),
            dialogue,
            show_end_promo: state.promo_shown,
            promo_message: state.promo_shown.then(|| END_PROMO_MESSAGE.to_string()),
            phase: state.phase,
        }
    }

    /// Fields of `next` that differ from `self`
    pub fn diff(&self, next: &PublishedState) -> StateDiff {
        fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
            (old != new).then(|| new.clone())
        }

        StateDiff {
            player_hp: changed(&self.player_hp, &next.player_hp),
            player_max_hp: changed(&self.player_max_hp, &next.player_max_hp),
            player_lives: changed(&self.player_lives, &next.player_lives),
            score: changed(&self.score, &next.score),
            combo_hits: changed(&self.combo_hits, &next.combo_hits),
            combo_multiplier: changed(&self.combo_multiplier, &next.combo_multiplier),
            combo_maxed: changed(&self.combo_maxed, &next.combo_maxed),
            charge_level: changed(&self.charge_level, &next.charge_level),
            level_name: changed(&self.level_name, &next.level_name),
            dialogue_active: changed(&self.dialogue_active, &next.dialogue_active),
            dialogue: changed(&self.dialogue, &next.dialogue),
            show_end_promo: changed(&self.show_end_promo, &next.show_end_promo),
            promo_message: changed(&self.promo_message, &next.promo_message),
            phase: changed(&self.phase, &next.phase),
        }
    }

    /// Diff that carries every field, for a subscriber's first frame
    pub fn full(&self) -> StateDiff {
        StateDiff {
            player_hp: Some(self.player_hp),
            player_max_hp: Some(self.player_max_hp),
            player_lives: Some(self.player_lives),
            score: Some(self.score),
            combo_hits: Some(self.combo_hits),
            combo_multiplier: Some(self.combo_multiplier),
            combo_maxed: Some(self.combo_maxed),
            charge_level: Some(self.charge_level),
            level_name: Some(self.level_name.clone()),
            dialogue_active: Some(self.dialogue_active),
            dialogue: Some(self.dialogue.clone()),
            show_end_promo: Some(self.show_end_promo),
            promo_message: Some(self.promo_message.clone()),
            phase: Some(self.phase),
        }
    }
}

/// Changed fields only; `None` means unchanged
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StateDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_max_hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_lives: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_hits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_multiplier: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_maxed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_level: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue_active: Option<bool>,
    /// `Some(None)` when the dialogue closed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<Option<DialoguePayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_end_promo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_message: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<GamePhase>,
}

impl StateDiff {
    pub fn is_empty(&self) -> bool {
        *self == StateDiff::default()
    }
}

/// Subscriber for published state changes
pub trait PublishPort {
    fn publish(&mut self, diff: &StateDiff);
}

/// Records every diff; used by tests and the headless runner
impl PublishPort for Vec<StateDiff> {
    fn publish(&mut self, diff: &StateDiff) {
        self.push(diff.clone());
    }
}
