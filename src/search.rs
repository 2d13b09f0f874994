//! Debounced dispatch for the search box.

use std::time::Duration;

use crate::config::SearchConfig;
use crate::graph::{RequestTracker, Ticket};

/// Decides which of a burst of keystrokes actually issues a search.
///
/// Every keystroke calls [`schedule`](Self::schedule) and arms a timer for
/// [`delay`](Self::delay); when the timer fires, the search runs only if
/// [`should_fire`](Self::should_fire) agrees. Responses are applied only while
/// [`is_current`](Self::is_current) still holds for their ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debouncer {
	delay: Duration,
	tracker: RequestTracker,
	fired: Option<Ticket>,
}

impl Debouncer {
	/// Debouncer waiting `delay` after the last keystroke.
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			tracker: RequestTracker::new(),
			fired: None,
		}
	}

	/// Debouncer using the configured delay.
	pub fn from_config(config: &SearchConfig) -> Self {
		Self::new(config.debounce())
	}

	/// Quiet period before a search goes out.
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Supersede any pending dispatch.
	pub fn schedule(&mut self) -> Ticket {
		self.tracker.begin()
	}

	/// True once, for the most recently scheduled ticket.
	pub fn should_fire(&mut self, ticket: Ticket) -> bool {
		if !self.tracker.is_current(ticket) || self.fired == Some(ticket) {
			return false;
		}
		self.fired = Some(ticket);
		true
	}

	/// Whether a response for `ticket` may still be applied.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.tracker.is_current(ticket)
	}

	/// Drop every pending dispatch and in-flight response.
	pub fn cancel(&mut self) {
		self.tracker.invalidate();
	}
}

/// Trimmed query, or `None` when it is too short to search for.
pub fn normalize_query(raw: &str, min_len: usize) -> Option<&str> {
	let query = raw.trim();
	if query.is_empty() || query.chars().count() < min_len {
		None
	} else {
		Some(query)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_the_last_keystroke_fires() {
		let mut debouncer = Debouncer::new(Duration::from_millis(200));
		let a = debouncer.schedule();
		let b = debouncer.schedule();
		let c = debouncer.schedule();
		assert!(!debouncer.should_fire(a));
		assert!(!debouncer.should_fire(b));
		assert!(debouncer.should_fire(c));
		assert!(!debouncer.should_fire(c));
		assert!(debouncer.is_current(c));
	}

	#[test]
	fn newer_input_invalidates_in_flight_response() {
		let mut debouncer = Debouncer::from_config(&SearchConfig::default());
		assert_eq!(debouncer.delay(), Duration::from_millis(200));
		let first = debouncer.schedule();
		assert!(debouncer.should_fire(first));
		let second = debouncer.schedule();
		assert!(!debouncer.is_current(first));
		assert!(debouncer.should_fire(second));
	}

	#[test]
	fn cancel_drops_everything() {
		let mut debouncer = Debouncer::new(Duration::ZERO);
		let pending = debouncer.schedule();
		debouncer.cancel();
		assert!(!debouncer.should_fire(pending));
		assert!(!debouncer.is_current(pending));
	}

	#[test]
	fn queries_are_trimmed() {
		assert_eq!(normalize_query("  amen ", 1), Some("amen"));
		assert_eq!(normalize_query("   ", 1), None);
		assert_eq!(normalize_query("", 0), None);
		assert_eq!(normalize_query("ab", 3), None);
		assert_eq!(normalize_query("éé", 2), Some("éé"));
	}
}
