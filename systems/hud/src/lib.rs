#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure heads-up display system that mirrors score and lives from world events.

use catcher_core::Event;
use log::info;

/// Pure system that folds world events into the labels shown on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    initial_lives: u32,
    score: u32,
    lives: u32,
    best_score: u32,
    sessions_completed: u32,
}

impl Hud {
    /// Creates a HUD for a session that starts with `initial_lives` lives.
    #[must_use]
    pub fn new(initial_lives: u32) -> Self {
        Self {
            initial_lives,
            score: 0,
            lives: initial_lives,
            best_score: 0,
            sessions_completed: 0,
        }
    }

    /// Consumes world events emitted since the previous call.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FallingObjectCaught { score, .. } => {
                    self.score = *score;
                    self.best_score = self.best_score.max(*score);
                }
                Event::FallingObjectMissed { lives, .. } => {
                    self.lives = *lives;
                }
                Event::WorldReset { final_score } => {
                    self.sessions_completed = self.sessions_completed.saturating_add(1);
                    self.best_score = self.best_score.max(*final_score);
                    info!(
                        "session {} ended with score {final_score} (best {})",
                        self.sessions_completed, self.best_score
                    );
                    self.score = 0;
                    self.lives = self.initial_lives;
                }
                _ => {}
            }
        }
    }

    /// Score of the current session.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Lives remaining in the current session.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Highest score reached since the process started.
    #[must_use]
    pub const fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Number of sessions that ended in a reset.
    #[must_use]
    pub const fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    /// Score rendered as a six digit, zero padded counter.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{:06}", self.score)
    }

    /// Lives rendered with a leading zero.
    #[must_use]
    pub fn lives_label(&self) -> String {
        format!("0{}", self.lives)
    }
}
