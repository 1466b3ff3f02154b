use std::ops::Range;

/// Pagination over the ranked results.
///
/// `selected` is an absolute rank and is kept inside
/// `[start, start + max)` by sliding `start` whenever the selection leaves the
/// visible page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
	start: usize,
	max: usize,
	selected: usize,
}

impl Window {
	/// Create a window showing `max` rows; a zero capacity is raised to one.
	#[must_use]
	pub fn new(max: usize) -> Self {
		Self {
			start: 0,
			max: max.max(1),
			selected: 0,
		}
	}

	#[must_use]
	pub fn start(&self) -> usize {
		self.start
	}

	#[must_use]
	pub fn max(&self) -> usize {
		self.max
	}

	#[must_use]
	pub fn selected(&self) -> usize {
		self.selected
	}

	/// Selection expressed as a row within the visible page.
	#[must_use]
	pub fn relative_selection(&self) -> usize {
		self.selected.saturating_sub(self.start)
	}

	/// Re-establish the window invariants against `total` ranked results.
	///
	/// An empty result set or a start past the end resets both start and
	/// selection to the top.
	pub fn fit(&mut self, total: usize) {
		if total == 0 || self.start >= total {
			self.start = 0;
			self.selected = 0;
			return;
		}
		if self.selected >= total {
			self.selected = total - 1;
		}
		self.scroll_to_selection();
	}

	/// Rank range currently visible.
	#[must_use]
	pub fn range(&self, total: usize) -> Range<usize> {
		let start = self.start.min(total);
		let end = self.start.saturating_add(self.max).min(total);
		start..end
	}

	/// Move the selection one rank down, wrapping to the top after the last
	/// rank. Returns whether the visible page moved.
	pub fn select_next(&mut self, total: usize) -> bool {
		let before = self.start;
		self.fit(total);
		if total == 0 {
			return before != self.start;
		}
		self.selected = if self.selected + 1 >= total {
			0
		} else {
			self.selected + 1
		};
		self.scroll_to_selection();
		before != self.start
	}

	/// Move the selection one rank up, wrapping to the bottom before the first
	/// rank. Returns whether the visible page moved.
	pub fn select_previous(&mut self, total: usize) -> bool {
		let before = self.start;
		self.fit(total);
		if total == 0 {
			return before != self.start;
		}
		self.selected = match self.selected {
			0 => total - 1,
			selected => selected - 1,
		};
		self.scroll_to_selection();
		before != self.start
	}

	fn scroll_to_selection(&mut self) {
		if self.selected < self.start {
			self.start = self.selected;
		} else if self.selected >= self.start + self.max {
			self.start = self.selected + 1 - self.max;
		}
	}
}
