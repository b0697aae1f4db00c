use std::time::{Duration, Instant};

/// Coalesces bursts of zoom events into one overlay recompute.
///
/// Every [`ZoomDebouncer::schedule`] cancels the pending deadline and starts a new one, so at most one recompute is ever
/// pending. Time is passed in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomDebouncer {
	delay: Duration,
	deadline: Option<Instant>,
}

impl ZoomDebouncer {
	pub fn new(delay: Duration) -> Self {
		Self { delay, deadline: None }
	}

	/// A delay too long to represent fires on the next poll.
	pub fn schedule(&mut self, now: Instant) {
		self.deadline = Some(now.checked_add(self.delay).unwrap_or(now));
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Returns `true` exactly once, on the first poll at or after the deadline.
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}
