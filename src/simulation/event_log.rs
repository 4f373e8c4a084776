//! Bounded log of recent training events for display.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::environment::EndReason;
use super::evaluation::GenerationSummary;

/// A logged event for display in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Generation the event belongs to.
    pub generation: u32,
    /// Human-readable description of the event.
    pub description: String,
    /// Color hint for the event.
    pub color: EventColor,
}

/// Color categories for events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventColor {
    /// A generation ended normally (gray)
    Generation,
    /// A new best fitness (green)
    Record,
    /// Every bird died before the first pipe (red)
    Extinction,
    /// The score limit ended the generation (yellow)
    ScoreLimit,
}

/// Event log that tracks recent events, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    max_events: usize,
    best_fitness: Option<f32>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
            best_fitness: None,
        }
    }

    /// Adds a new event to the log
    pub fn log(&mut self, generation: u32, description: String, color: EventColor) {
        self.events.push_front(LoggedEvent {
            generation,
            description,
            color,
        });

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Logs the events implied by a finished generation.
    pub fn record_generation(&mut self, summary: &GenerationSummary) {
        let generation = summary.generation;

        match summary.end {
            EndReason::ScoreLimit => self.log(
                generation,
                format!("Score limit reached at {}", summary.score),
                EventColor::ScoreLimit,
            ),
            EndReason::Extinct if summary.score == 0 => self.log(
                generation,
                format!("No bird passed a pipe ({} ticks)", summary.ticks),
                EventColor::Extinction,
            ),
            _ => self.log(
                generation,
                format!(
                    "Score {}, best {:.1}, mean {:.1}",
                    summary.score, summary.best_fitness, summary.mean_fitness
                ),
                EventColor::Generation,
            ),
        }

        if self
            .best_fitness
            .is_none_or(|best| summary.best_fitness > best)
        {
            self.best_fitness = Some(summary.best_fitness);
            self.log(
                generation,
                format!("New best fitness {:.1}", summary.best_fitness),
                EventColor::Record,
            );
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
        self.best_fitness = None;
    }
}
