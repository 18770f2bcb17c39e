//! Source positions and caret highlighting for diagnostics.
//!
//! Locating an error is pure arithmetic over byte offsets and is kept apart from formatting:
//! [`locate()`] gives a [`Location`], and [`Highlight`] turns a line plus a location into text.

use unicode_width::UnicodeWidthStr;

/// The position of a span of text, relative to the line containing it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Location {
	/// The zero-based index of the line within the source text.
	pub line: usize,

	/// The display width of the text before the span on its line.
	pub column: usize,

	/// The display width of the span.
	pub length: usize,
}

/// Locate a byte range of `source`.
///
/// The range must start on a character boundary and should not cross a line terminator.
/// If it does, the length is cut off at the end of the line.
///
/// # Panics
/// Panics if `range.start` is out of bounds or not on a character boundary.
pub fn locate(source: &str, range: std::ops::Range<usize>) -> Location {
	let start = line_start(source, range.start);
	let end = line_end(source, range.start);
	let range_end = range.end.clamp(range.start, end);
	Location {
		line: memchr::memchr_iter(b'\n', &source.as_bytes()[..start]).count(),
		column: source[start..range.start].width(),
		length: source[range.start..range_end].width(),
	}
}

/// Get the line of `source` that contains the byte at `position`, without line terminator.
///
/// # Panics
/// Panics if `position` is out of bounds or not on a character boundary.
pub fn line_at(source: &str, position: usize) -> &str {
	&source[line_start(source, position)..line_end(source, position)]
}

fn line_start(source: &str, position: usize) -> usize {
	match memchr::memrchr(b'\n', &source.as_bytes()[..position]) {
		Some(line_end) => line_end + 1,
		None => 0,
	}
}

fn line_end(source: &str, position: usize) -> usize {
	match memchr::memchr(b'\n', &source.as_bytes()[position..]) {
		Some(line_end) => position + line_end,
		None => source.len(),
	}
}

/// A line of text with a caret span underneath it.
///
/// Formats as the line, a newline, then `column` spaces followed by `length` carets.
#[derive(Debug, Clone, Copy)]
pub struct Highlight<'a> {
	line: &'a str,
	location: Location,
}

impl<'a> Highlight<'a> {
	/// Create a highlight for a span on the given line.
	pub fn new(line: &'a str, location: Location) -> Self {
		Self { line, location }
	}
}

impl std::fmt::Display for Highlight<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		writeln!(f, "{}", self.line)?;
		write!(f, "{}", " ".repeat(self.location.column))?;
		write!(f, "{}", "^".repeat(self.location.length))
	}
}
