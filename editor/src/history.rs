use crate::consts::MAX_HISTORY_DEPTH;

use std::collections::VecDeque;

/// Undo and redo stacks of serialized polygon snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStack {
	undo: VecDeque<String>,
	redo: Vec<String>,
	max_depth: usize,
}

impl Default for HistoryStack {
	fn default() -> Self {
		Self::with_max_depth(MAX_HISTORY_DEPTH)
	}
}

/// What [`HistoryStack::begin_edit`] discarded, so that an aborted edit can put it back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditCheckpoint {
	cleared_redo: Vec<String>,
	evicted: Option<String>,
}

impl HistoryStack {
	pub fn with_max_depth(max_depth: usize) -> Self {
		Self {
			undo: VecDeque::new(),
			redo: Vec::new(),
			max_depth: max_depth.max(1),
		}
	}

	/// Records the state before an edit. Any new edit clears the redo stack.
	pub fn begin_edit(&mut self, snapshot: String) -> EditCheckpoint {
		let evicted = self.push_undo(snapshot);
		EditCheckpoint {
			cleared_redo: std::mem::take(&mut self.redo),
			evicted,
		}
	}

	/// Forgets the entry pushed by the matching [`HistoryStack::begin_edit`] and restores what it discarded.
	pub fn cancel_edit(&mut self, checkpoint: EditCheckpoint) -> Option<String> {
		let snapshot = self.undo.pop_back();
		if let Some(evicted) = checkpoint.evicted {
			self.undo.push_front(evicted);
		}
		self.redo = checkpoint.cleared_redo;
		snapshot
	}

	/// Swaps `current` for the latest undo entry. `None` when there is nothing to undo.
	pub fn undo(&mut self, current: String) -> Option<String> {
		let previous = self.undo.pop_back()?;
		self.redo.push(current);
		Some(previous)
	}

	/// Swaps `current` for the latest redo entry. `None` when there is nothing to redo.
	pub fn redo(&mut self, current: String) -> Option<String> {
		let next = self.redo.pop()?;
		self.push_undo(current);
		Some(next)
	}

	pub fn clear(&mut self) {
		self.undo.clear();
		self.redo.clear();
	}

	pub fn can_undo(&self) -> bool {
		!self.undo.is_empty()
	}

	pub fn can_redo(&self) -> bool {
		!self.redo.is_empty()
	}

	pub fn undo_depth(&self) -> usize {
		self.undo.len()
	}

	pub fn redo_depth(&self) -> usize {
		self.redo.len()
	}

	fn push_undo(&mut self, snapshot: String) -> Option<String> {
		self.undo.push_back(snapshot);
		if self.undo.len() > self.max_depth { self.undo.pop_front() } else { None }
	}
}
