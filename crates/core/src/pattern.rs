/// Query text plus an insertion cursor, addressed by character rather than
/// by byte so multi-byte input never splits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
	chars: Vec<char>,
	cursor: usize,
}

impl Pattern {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert `ch` at the cursor and advance past it.
	pub fn insert(&mut self, ch: char) {
		self.chars.insert(self.cursor, ch);
		self.cursor += 1;
	}

	/// Remove the character before the cursor. Returns `false` at position 0.
	pub fn backspace(&mut self) -> bool {
		if self.cursor == 0 {
			return false;
		}
		self.cursor -= 1;
		self.chars.remove(self.cursor);
		true
	}

	/// Returns whether the cursor moved.
	pub fn move_left(&mut self) -> bool {
		if self.cursor == 0 {
			return false;
		}
		self.cursor -= 1;
		true
	}

	/// Returns whether the cursor moved.
	pub fn move_right(&mut self) -> bool {
		if self.cursor >= self.chars.len() {
			return false;
		}
		self.cursor += 1;
		true
	}

	#[must_use]
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	#[must_use]
	pub fn text(&self) -> String {
		self.chars.iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn typed(text: &str) -> Pattern {
		let mut pattern = Pattern::new();
		for ch in text.chars() {
			pattern.insert(ch);
		}
		pattern
	}

	#[test]
	fn inserts_at_the_cursor() {
		let mut pattern = typed("ac");
		assert!(pattern.move_left());
		pattern.insert('b');
		assert_eq!(pattern.text(), "abc");
		assert_eq!(pattern.cursor(), 2);
	}

	#[test]
	fn backspace_is_a_no_op_at_the_start() {
		let mut pattern = typed("ab");
		pattern.move_left();
		pattern.move_left();
		assert!(!pattern.backspace());
		assert_eq!(pattern.text(), "ab");
		assert_eq!(pattern.cursor(), 0);
	}

	#[test]
	fn backspace_removes_before_the_cursor() {
		let mut pattern = typed("abc");
		pattern.move_left();
		assert!(pattern.backspace());
		assert_eq!(pattern.text(), "ac");
		assert_eq!(pattern.cursor(), 1);
	}

	#[test]
	fn cursor_clamps_at_both_ends() {
		let mut pattern = typed("xy");
		assert!(!pattern.move_right());
		assert_eq!(pattern.cursor(), 2);
		assert!(pattern.move_left());
		assert!(pattern.move_left());
		assert!(!pattern.move_left());
		assert_eq!(pattern.cursor(), 0);
	}

	#[test]
	fn multibyte_characters_stay_whole() {
		let mut pattern = typed("héllo→");
		assert_eq!(pattern.text().chars().count(), 6);
		pattern.move_left();
		pattern.move_left();
		pattern.move_left();
		pattern.move_left();
		assert!(pattern.backspace());
		assert_eq!(pattern.text(), "hllo→");
		pattern.insert('ü');
		assert_eq!(pattern.text(), "hüllo→");
		assert_eq!(pattern.cursor(), 2);
	}
}
