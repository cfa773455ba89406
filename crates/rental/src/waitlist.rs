//! Per-title waiting queues.
//!
//! Queues are first-come first-served and hold each customer at most once.
//! Nothing is pushed to customers; the manager pops the head explicitly when
//! a copy is back on the shelf.

use std::collections::{HashMap, VecDeque};

use crate::customer::CustomerId;

/// Outcome of asking to join a title's waitlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistStatus {
    /// Added at this 1-based position
    Queued(usize),
    /// Was already waiting at this 1-based position; queue unchanged
    AlreadyQueued(usize),
    /// The title can be rented right now; queue unchanged
    CopiesAvailable,
}

#[derive(Debug, Default)]
pub struct Waitlist {
    queues: HashMap<String, VecDeque<CustomerId>>,
}

impl Waitlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a customer unless they are already waiting for the title
    pub fn enqueue(&mut self, title: &str, customer_id: CustomerId) -> WaitlistStatus {
        let queue = self.queues.entry(title.to_string()).or_default();
        if let Some(position) = queue.iter().position(|&id| id == customer_id) {
            return WaitlistStatus::AlreadyQueued(position + 1);
        }
        queue.push_back(customer_id);
        WaitlistStatus::Queued(queue.len())
    }

    /// Remove and return the customer at the head of the title's queue
    pub fn pop_next(&mut self, title: &str) -> Option<CustomerId> {
        let queue = self.queues.get_mut(title)?;
        let next = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(title);
        }
        next
    }

    /// Customers waiting for a title, head first
    pub fn waiting(&self, title: &str) -> Vec<CustomerId> {
        self.queues
            .get(title)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }
}
