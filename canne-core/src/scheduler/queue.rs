//! Fixed-capacity command queue
//!
//! A ring buffer with two indices. One slot is always left unused so that
//! `head == tail` means empty and `(tail + 1) % N == head` means full,
//! without a separate length counter. A queue of `N` slots therefore holds
//! at most `N - 1` commands.
//!
//! Overflow drops the newest command: work that was already admitted keeps
//! its place and order.

use canne_protocol::Command;

/// Default number of slots (4 usable)
pub const QUEUE_CAPACITY: usize = 5;

/// FIFO ring buffer of pending commands
#[derive(Debug, Clone)]
pub struct CommandQueue<const N: usize = QUEUE_CAPACITY> {
    buffer: [Option<Command>; N],
    /// Index of the oldest command
    head: usize,
    /// Index of the next free slot
    tail: usize,
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CommandQueue<N> {
    const MIN_SLOTS: () = assert!(N >= 2, "command queue needs at least two slots");

    /// Create an empty queue
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::MIN_SLOTS;
        Self {
            buffer: [None; N],
            head: 0,
            tail: 0,
        }
    }

    /// Check if no commands are waiting
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Check if every usable slot is taken
    pub fn is_full(&self) -> bool {
        (self.tail + 1) % N == self.head
    }

    /// Number of commands waiting
    pub fn len(&self) -> usize {
        (self.tail + N - self.head) % N
    }

    /// Maximum number of commands the queue can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append a command at the tail
    ///
    /// When the queue is full the command is handed back and the queue is
    /// left untouched.
    pub fn enqueue(&mut self, cmd: Command) -> Result<(), Command> {
        if self.is_full() {
            return Err(cmd);
        }
        self.buffer[self.tail] = Some(cmd);
        self.tail = (self.tail + 1) % N;
        Ok(())
    }

    /// Append a command, returning false if it was dropped
    pub fn try_enqueue(&mut self, cmd: Command) -> bool {
        self.enqueue(cmd).is_ok()
    }

    /// Remove and return the oldest command
    pub fn dequeue(&mut self) -> Option<Command> {
        if self.is_empty() {
            return None;
        }
        let cmd = self.buffer[self.head].take();
        self.head = (self.head + 1) % N;
        cmd
    }

    /// Look at the oldest command without removing it
    pub fn peek(&self) -> Option<&Command> {
        if self.is_empty() {
            return None;
        }
        self.buffer[self.head].as_ref()
    }

    /// Drop every pending command
    pub fn clear(&mut self) {
        while self.dequeue().is_some() {}
    }

    /// Iterate over pending commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Command> + '_ {
        (0..self.len()).filter_map(move |i| self.buffer[(self.head + i) % N].as_ref())
    }
}
