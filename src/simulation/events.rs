//! Event system for the collision phase of a tick.
//!
//! Birds are scanned against pipes in parallel; every finding is recorded as
//! an event and the events are applied serially afterwards, so the score and
//! the pipe list are only touched from one place.

use std::collections::BTreeSet;

use super::bird::{Bird, BirdId};
use super::pipe::Pipe;

/// Findings of the collision scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// A bird's silhouette overlapped a pipe.
    Collided {
        /// The bird that hit the pipe.
        bird_id: BirdId,
        /// Index of the pipe in the environment's pipe list.
        pipe_index: usize,
    },
    /// A bird is past the left edge of a pipe not yet marked as passed.
    Crossed {
        /// The bird ahead of the pipe.
        bird_id: BirdId,
        /// Index of the pipe in the environment's pipe list.
        pipe_index: usize,
    },
}

/// Queue for collecting events from the parallel scan.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<TickEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: TickEvent) {
        self.events.push(event);
    }

    /// Appends events, keeping their order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = TickEvent>) {
        self.events.extend(events);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Checks if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, TickEvent> {
        self.events.drain(..)
    }
}

/// Result of applying one tick's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedEvents {
    /// Birds removed by a collision, in ascending id order.
    pub collided: Vec<BirdId>,
    /// Whether at least one pipe became passed.
    pub spawn_pipe: bool,
}

/// Applies all queued events.
///
/// Collisions are resolved first; a crossing only counts when its bird
/// survived every collision of the tick.
pub fn apply_events(birds: &mut [Bird], pipes: &mut [Pipe], mut queue: EventQueue) -> AppliedEvents {
    let mut collided = BTreeSet::new();
    let mut crossings = Vec::new();

    for event in queue.drain() {
        match event {
            TickEvent::Collided { bird_id, .. } => {
                collided.insert(bird_id);
            }
            TickEvent::Crossed {
                bird_id,
                pipe_index,
            } => crossings.push((bird_id, pipe_index)),
        }
    }

    for &bird_id in &collided {
        if let Some(bird) = birds.get_mut(bird_id) {
            bird.kill();
        }
    }

    let mut spawn_pipe = false;
    for (bird_id, pipe_index) in crossings {
        if collided.contains(&bird_id) {
            continue;
        }
        if let Some(pipe) = pipes.get_mut(pipe_index) {
            if !pipe.passed {
                pipe.passed = true;
                spawn_pipe = true;
            }
        }
    }

    AppliedEvents {
        collided: collided.into_iter().collect(),
        spawn_pipe,
    }
}
