//! Frame driver: owns the simulation and talks to the outside world
//!
//! Ports are injected at construction. After every tick (and after a dialogue
//! resolution) the session drains simulation events into audio cues and
//! publishes a diff of the observable state.

use crate::audio::{AudioCue, AudioPort};
use crate::config::SessionConfig;
use crate::publish::{PublishPort, PublishedState};
use crate::sim::{
    DialogueChoice, DialogueResult, DrawFrame, GameEvent, GamePhase, GameState, InputSnapshot,
};

pub struct Session<A: AudioPort, P: PublishPort> {
    state: GameState,
    audio: A,
    publisher: P,
    published: PublishedState,
}

impl<A: AudioPort, P: PublishPort> Session<A, P> {
    /// Start a session; subscribers receive the full initial state
    pub fn new(config: SessionConfig, audio: A, mut publisher: P) -> Self {
        let state = GameState::new(config.seed, config.level);
        let published = PublishedState::capture(&state);
        publisher.publish(&published.full());
        log::info!(
            "session started: level '{}', seed {}",
            state.schedule.name,
            config.seed
        );
        Self {
            state,
            audio,
            publisher,
            published,
        }
    }

    /// Advance one frame. Returns the events raised during it.
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32) -> Vec<GameEvent> {
        crate::sim::tick(&mut self.state, input, dt);
        self.flush()
    }

    /// Forward the player's dialogue pick; `None` if nothing was open
    pub fn resolve_dialogue(&mut self, choice: DialogueChoice) -> Option<DialogueResult> {
        let result = crate::sim::resolve_dialogue(&mut self.state, choice);
        self.flush();
        result
    }

    fn flush(&mut self) -> Vec<GameEvent> {
        let events = self.state.take_events();
        for cue in events.iter().filter_map(AudioCue::for_event) {
            self.audio.play(cue);
        }

        let next = PublishedState::capture(&self.state);
        let diff = self.published.diff(&next);
        if !diff.is_empty() {
            self.publisher.publish(&diff);
            self.published = next;
        }
        events
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios and debugging
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn published(&self) -> &PublishedState {
        &self.published
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn draw_frame(&self) -> DrawFrame {
        self.state.draw_frame()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_ports(self) -> (A, P) {
        (self.audio, self.publisher)
    }
}
