//! Dialogue gate: suspends the simulation while a scripted choice is on screen

use serde::{Deserialize, Serialize};

/// Outcome tag attached to a dialogue option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueResult {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    pub result: DialogueResult,
}

/// What the dialogue box shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialoguePayload {
    pub speaker: String,
    pub text: String,
    pub options: Vec<DialogueOption>,
}

/// What the dialogue box sends back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub choice_index: usize,
    pub result: DialogueResult,
}

#[derive(Debug, Clone, Default)]
pub struct DialogueGate {
    current: Option<DialoguePayload>,
}

impl DialogueGate {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn payload(&self) -> Option<&DialoguePayload> {
        self.current.as_ref()
    }

    /// Open the gate. Returns false if a dialogue is already showing.
    pub fn show(&mut self, payload: DialoguePayload) -> bool {
        if self.is_active() {
            return false;
        }
        self.current = Some(payload);
        true
    }

    /// Close the gate and hand back the chosen result
    ///
    /// Returns `None` when nothing is open, so a stale or doubled UI callback
    /// cannot apply side effects twice. The result is taken from the payload
    /// when the index names a real option.
    pub fn resolve(&mut self, choice: DialogueChoice) -> Option<DialogueResult> {
        let payload = self.current.take()?;
        match payload.options.get(choice.choice_index) {
            Some(option) => Some(option.result),
            None => {
                log::warn!(
                    "dialogue choice {} out of range ({} options), using reported result",
                    choice.choice_index,
                    payload.options.len()
                );
                Some(choice.result)
            }
        }
    }
}
