//! Level schedule: waves, the side quest, props and the finish line
//!
//! A schedule is plain data so it can come from JSON as well as from the
//! built-in level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Aabb, Terrain};
use super::dialogue::{DialogueOption, DialoguePayload, DialogueResult};
use super::enemy::EnemyVariant;
use crate::consts::*;

/// One enemy placed by a wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    #[serde(default)]
    pub variant: EnemyVariant,
}

/// Enemies released once the player reaches `trigger_x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub trigger_x: f32,
    pub enemies: Vec<EnemySpawn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideQuest {
    pub trigger_x: f32,
    pub dialogue: DialoguePayload,
}

/// Static prop standing on the ground, centered on `x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn aabb(&self, ground_y: f32) -> Aabb {
        Aabb {
            min: Vec2::new(self.x - self.width / 2.0, ground_y - self.height),
            max: Vec2::new(self.x + self.width / 2.0, ground_y),
        }
    }
}

/// Keys left out of a level file take these defaults: no side quest, no
/// props, the player starting at x 100 and the finish at the level's far end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSchedule {
    #[serde(default = "default_name")]
    pub name: String,
    /// Ordered by trigger
    #[serde(default)]
    pub waves: Vec<Wave>,
    #[serde(default)]
    pub side_quest: Option<SideQuest>,
    /// Player must be past this x with the level cleared
    #[serde(default = "default_finish_x")]
    pub finish_x: f32,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default = "default_player_start_x")]
    pub player_start_x: f32,
}

fn default_name() -> String {
    "UNTITLED".to_string()
}

fn default_finish_x() -> f32 {
    LEVEL_WIDTH
}

fn default_player_start_x() -> f32 {
    100.0
}

impl Default for LevelSchedule {
    fn default() -> Self {
        level_one()
    }
}

impl LevelSchedule {
    /// Static collision geometry for this level
    pub fn terrain(&self) -> Terrain {
        Terrain::with_solids(self.obstacles.iter().map(|o| o.aabb(GROUND_Y)).collect())
    }

    pub fn enemy_count(&self) -> usize {
        self.waves.iter().map(|w| w.enemies.len()).sum()
    }
}

fn spawns(variants: &[(f32, EnemyVariant)]) -> Vec<EnemySpawn> {
    variants
        .iter()
        .map(|&(x, variant)| EnemySpawn { x, variant })
        .collect()
}

/// The arena concourse
pub fn level_one() -> LevelSchedule {
    use EnemyVariant::{Fast, Normal};

    let trash_can = |x: f32| Obstacle {
        x,
        width: 16.0,
        height: 20.0,
    };

    LevelSchedule {
        name: "THE WELLS FARGO CENTER".to_string(),
        waves: vec![
            Wave {
                trigger_x: 200.0,
                enemies: spawns(&[(600.0, Normal), (700.0, Normal)]),
            },
            Wave {
                trigger_x: 900.0,
                enemies: spawns(&[(1400.0, Normal), (1500.0, Normal), (1600.0, Normal)]),
            },
            Wave {
                trigger_x: 2000.0,
                enemies: spawns(&[
                    (2500.0, Normal),
                    (2600.0, Normal),
                    (2700.0, Normal),
                    (2800.0, Fast),
                ]),
            },
        ],
        side_quest: Some(SideQuest {
            trigger_x: 1400.0,
            dialogue: DialoguePayload {
                speaker: "ANALYST".to_string(),
                text: "\"Sam, the owner wants us to sign a 32-year-old point guard for $18M a year. \
                       He can still play.\""
                    .to_string(),
                options: vec![
                    DialogueOption {
                        text: "Sign him. The fans will be happy.".to_string(),
                        result: DialogueResult::Bad,
                    },
                    DialogueOption {
                        text: "Pass. We need the cap space for the right player in 3 years."
                            .to_string(),
                        result: DialogueResult::Good,
                    },
                ],
            },
        }),
        finish_x: 2500.0,
        obstacles: vec![
            trash_can(400.0),
            trash_can(1100.0),
            Obstacle {
                x: 1600.0,
                width: 40.0,
                height: 24.0,
            },
            trash_can(1900.0),
            trash_can(2600.0),
        ],
        player_start_x: 100.0,
    }
}
