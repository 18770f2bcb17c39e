//! Module containing error details.

use crate::diagnostic::{Highlight, Location};

/// An error that can occur while normalizing a template.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum Error {
	/// A segment contains a malformed or forbidden escape sequence.
	EscapeSyntax(EscapeSyntaxError),

	/// An indented block does not have the required shape.
	StructuralFormat(StructuralFormatError),

	/// An operation was invoked outside its calling convention.
	Usage(UsageError),
}

impl From<EscapeSyntaxError> for Error {
	fn from(other: EscapeSyntaxError) -> Self {
		Self::EscapeSyntax(other)
	}
}

impl From<StructuralFormatError> for Error {
	fn from(other: StructuralFormatError) -> Self {
		Self::StructuralFormat(other)
	}
}

impl From<UsageError> for Error {
	fn from(other: UsageError) -> Self {
		Self::Usage(other)
	}
}

impl From<std::convert::Infallible> for Error {
	fn from(other: std::convert::Infallible) -> Self {
		match other {}
	}
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::EscapeSyntax(e) => e.fmt(f),
			Self::StructuralFormat(e) => e.fmt(f),
			Self::Usage(e) => e.fmt(f),
		}
	}
}

/// The kind of problem found in an escape sequence.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EscapeErrorKind {
	/// An octal escape such as `\1` or `\00`.
	///
	/// A lone `\0` that is not followed by a digit is allowed.
	Octal,

	/// The escapes `\8` and `\9`.
	EightOrNine,

	/// A `\x` that is not followed by exactly two hexadecimal digits.
	InvalidHexadecimal,

	/// A `\u` that is not followed by four hexadecimal digits or one to six digits in braces.
	InvalidUnicode,

	/// A `\u{...}` escape above U+10FFFF.
	UndefinedCodePoint,
}

impl EscapeErrorKind {
	/// Get the human readable message for this kind of error.
	pub fn message(&self) -> &'static str {
		match self {
			Self::Octal => "Octal escape sequences are not allowed",
			Self::EightOrNine => r"\8 and \9 are not allowed",
			Self::InvalidHexadecimal => "Invalid hexadecimal escape sequence",
			Self::InvalidUnicode => "Invalid Unicode escape sequence",
			Self::UndefinedCodePoint => "Undefined Unicode code-point",
		}
	}
}

impl std::fmt::Display for EscapeErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(self.message())
	}
}

/// A segment contains a malformed or forbidden escape sequence.
///
/// The [`Display`][std::fmt::Display] output is a three line diagnostic:
/// the message, the offending line and a caret span under the escape sequence.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct EscapeSyntaxError {
	/// What is wrong with the escape sequence.
	pub kind: EscapeErrorKind,

	/// The full text of the matched escape sequence, including the backslash.
	pub sequence: String,

	/// The byte offset of the backslash in the decoded text.
	pub position: usize,

	/// The line of text containing the escape sequence, without line terminator.
	pub line: String,

	/// The location of the escape sequence within [`Self::line`].
	pub location: Location,
}

impl EscapeSyntaxError {
	/// Get the highlighting part of the diagnostic: the line and the caret span.
	pub fn highlight(&self) -> Highlight<'_> {
		Highlight::new(&self.line, self.location)
	}
}

impl std::error::Error for EscapeSyntaxError {}

impl std::fmt::Display for EscapeSyntaxError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}\n{}", self.kind, self.highlight())
	}
}

/// An indented block does not have the required shape.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum StructuralFormatError {
	/// The template has no segments at all.
	NoSegments,

	/// The first segment does not start with a newline.
	MissingLeadingNewline,

	/// The last segment contains something other than spaces or tabs after its last newline,
	/// or it contains no newline at all.
	TrailingContent,

	/// A line starts with something other than the common indent.
	MisalignedIndent {
		/// The index of the segment containing the line.
		segment: usize,

		/// The byte offset of the newline that precedes the misaligned line.
		position: usize,
	},
}

impl std::error::Error for StructuralFormatError {}

impl std::fmt::Display for StructuralFormatError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::NoSegments => write!(f, "Call as a template."),
			Self::MissingLeadingNewline => {
				write!(f, "There must be a newline character immediately following the opening delimiter.")
			},
			Self::TrailingContent => write!(
				f,
				"There must be no characters other than spaces or tabs between the last newline and the closing delimiter."
			),
			Self::MisalignedIndent { .. } => {
				write!(f, "Each line must be blank or begin with the indent at the beginning of the line.")
			},
		}
	}
}

/// An operation was invoked outside its calling convention.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UsageError {
	/// The number of segments that were given.
	pub segments: usize,

	/// The number of values that were given.
	pub values: usize,
}

impl std::error::Error for UsageError {}

impl std::fmt::Display for UsageError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"A template with {} values needs {} segments, but got {}",
			self.values,
			self.values + 1,
			self.segments,
		)
	}
}
