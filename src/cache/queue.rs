//! Pending Queue Module
//!
//! Buffers mutations issued before the initial load resolves.

use std::collections::VecDeque;

use serde_json::Value;

// == Command ==
/// A deferred mutation together with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set {
        key: String,
        value: Option<Value>,
        ttl_ms: Option<u64>,
    },
}

// == Pending Queue ==
/// FIFO of deferred commands.
///
/// Commands are pushed at the back and replayed from the front.
#[derive(Debug, Default)]
pub struct PendingQueue {
    commands: VecDeque<Command>,
}

impl PendingQueue {
    // == Constructor ==
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    // == Push ==
    /// Appends a command behind everything already queued.
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    // == Take All ==
    /// Removes and returns every queued command in submission order.
    pub fn take_all(&mut self) -> Vec<Command> {
        self.commands.drain(..).collect()
    }

    // == Length ==
    /// Returns the number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
