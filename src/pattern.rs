//! Building regular expressions from free-form templates.
//!
//! The segments of the template are pattern source written for humans:
//!
//! * `// line comments` and `/* block comments */` are removed.
//! * A run of whitespace between two word characters becomes `\s+`.
//! * All other whitespace is removed.
//! * Anything escaped with a backslash is kept verbatim, so `\ ` and `\/\/` still mean what they say.
//!
//! The values are [`Fragment`]s: literal strings that are escaped,
//! pattern sources that are inserted as a non-capturing group,
//! and flags that are merged into the flags of the result.
//!
//! ```
//! # fn main() -> Result<(), tmplnorm::Error> {
//! use tmplnorm::{Fragment, Template};
//!
//! let values = [Fragment::pattern("[a-z_]+"), Fragment::literal("."), Fragment::flags("i")];
//! let template = Template::new(
//! 	&[
//! 		"
//! 		// A key, an equals sign and a quoted value.
//! 		^",
//! 		r"\s*=\s*",
//! 		" /* the value */ \"[^\"]*\"$
//! 		",
//! 		"",
//! 	],
//! 	&values,
//! )?;
//! let regex = tmplnorm::build(&template);
//! assert_eq!(regex.source(), r#"^(?:[a-z_]+)\s*=\s*\."[^"]*"$"#);
//! assert_eq!(regex.flags(), "i");
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::convert::Infallible;

use crate::template::{compose, infallible, Hooks, Template};

/// The source of an empty pattern that still works as a standalone pattern.
const EMPTY_PATTERN: &str = "(?:)";

/// The characters that are escaped when a literal string is inserted.
const METACHARACTERS: &[char] = &['[', ']', '(', ')', '{', '}', '.', '?', '+', '*', '|', '^', '$', '\\'];

/// A value inserted into a regex template.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fragment<'a> {
	/// A literal string, matched exactly.
	Literal(&'a str),

	/// Pattern source, inserted as a non-capturing group, with flags to merge into the result.
	Pattern {
		/// The pattern source.
		source: &'a str,

		/// The flags of the pattern, possibly empty.
		flags: &'a str,
	},

	/// Flags to merge into the result, without adding anything to the source.
	Flags(&'a str),
}

impl<'a> Fragment<'a> {
	/// Create a fragment for a literal string.
	pub const fn literal(text: &'a str) -> Self {
		Self::Literal(text)
	}

	/// Create a fragment for pattern source without flags.
	pub const fn pattern(source: &'a str) -> Self {
		Self::Pattern { source, flags: "" }
	}

	/// Create a fragment that only sets flags.
	pub const fn flags(flags: &'a str) -> Self {
		Self::Flags(flags)
	}

	/// Get the flags this fragment contributes.
	pub fn flag_chars(&self) -> &'a str {
		match self {
			Self::Literal(_) => "",
			Self::Pattern { flags, .. } => *flags,
			Self::Flags(flags) => *flags,
		}
	}
}

impl<'a> From<&'a str> for Fragment<'a> {
	fn from(text: &'a str) -> Self {
		Self::Literal(text)
	}
}

impl<'a> From<&'a RegexSource> for Fragment<'a> {
	fn from(other: &'a RegexSource) -> Self {
		Self::Pattern {
			source: &other.source,
			flags: &other.flags,
		}
	}
}

/// Writes the text the fragment adds to the pattern source.
impl std::fmt::Display for Fragment<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Literal(text) => f.write_str(&escape_literal(text)),
			Self::Pattern { source, .. } => write!(f, "(?:{source})"),
			Self::Flags(_) => Ok(()),
		}
	}
}

/// The pattern source and flags produced by [`build()`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegexSource {
	source: String,
	flags: String,
}

impl RegexSource {
	/// Create a regex source from its parts.
	pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			flags: flags.into(),
		}
	}

	/// Get the pattern source.
	#[inline]
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Get the flags, each flag once, in order of first appearance.
	#[inline]
	pub fn flags(&self) -> &str {
		&self.flags
	}

	/// Split into the pattern source and the flags.
	pub fn into_parts(self) -> (String, String) {
		(self.source, self.flags)
	}
}

/// [`Hooks`] for building a regex source.
///
/// The flags of all fragments are accumulated in the hooks while the template is composed.
#[derive(Debug, Clone, Default)]
pub struct PatternHooks {
	flags: String,
}

impl<'f> Hooks<Fragment<'f>> for PatternHooks {
	type Output = RegexSource;
	type Error = Infallible;

	fn modify_segment<'s>(
		&mut self,
		segment: &'s str,
		_index: usize,
		_segments: &[Cow<'_, str>],
	) -> Result<Cow<'s, str>, Infallible> {
		Ok(strip_insignificant(segment))
	}

	fn convert_value(&mut self, value: &Fragment<'f>, _index: usize, _values: &[Fragment<'f>]) -> Result<String, Infallible> {
		for flag in value.flag_chars().chars() {
			if !self.flags.contains(flag) {
				self.flags.push(flag);
			}
		}
		Ok(value.to_string())
	}

	fn finalize(self, text: String) -> Result<RegexSource, Infallible> {
		let source = if text.is_empty() {
			String::from(EMPTY_PATTERN)
		} else {
			text
		};
		Ok(RegexSource {
			source,
			flags: self.flags,
		})
	}
}

/// Build a regex source from a template.
///
/// The segments are read raw: escape sequences are not decoded but passed on to the regex.
pub fn build(template: &Template<'_, Fragment<'_>>) -> RegexSource {
	infallible(compose(template, PatternHooks::default()))
}

/// Escape all regex metacharacters in a literal string.
///
/// # Example
/// ```
/// assert_eq!(tmplnorm::pattern::escape_literal("(x86)"), r"\(x86\)");
/// ```
pub fn escape_literal(text: &str) -> Cow<'_, str> {
	if !text.contains(METACHARACTERS) {
		return Cow::Borrowed(text);
	}
	let mut output = String::with_capacity(text.len() + text.len() / 4);
	for c in text.chars() {
		if METACHARACTERS.contains(&c) {
			output.push('\\');
		}
		output.push(c);
	}
	Cow::Owned(output)
}

/// Remove comments and insignificant whitespace from a segment of pattern source.
///
/// Whitespace between two word characters becomes `\s+`, other whitespace is removed.
/// The start and end of the segment count as no character at all.
pub fn strip_insignificant(segment: &str) -> Cow<'_, str> {
	let bytes = segment.as_bytes();
	let mut output = None;
	let mut copied = 0;
	let mut finger = 0;
	while finger < bytes.len() {
		if bytes[finger] == b'\\' {
			finger += 1;
			if let Some(c) = segment[finger..].chars().next() {
				finger += c.len_utf8();
			}
			continue;
		}

		let (end, has_whitespace) = match find_gap(segment, finger) {
			Some(x) => x,
			None => {
				finger += segment[finger..].chars().next().map_or(1, char::len_utf8);
				continue;
			},
		};

		let out = output.get_or_insert_with(|| String::with_capacity(segment.len()));
		out.push_str(&segment[copied..finger]);
		let before = segment[..finger].chars().next_back();
		let after = segment[end..].chars().next();
		if has_whitespace && before.is_some_and(is_word) && after.is_some_and(is_word) {
			out.push_str(r"\s+");
		}
		finger = end;
		copied = end;
	}

	match output {
		None => Cow::Borrowed(segment),
		Some(mut output) => {
			output.push_str(&segment[copied..]);
			Cow::Owned(output)
		},
	}
}

/// Find the end of a run of comments and whitespace starting at `start`.
///
/// Also reports whether the run contains any whitespace outside of comments.
/// Returns `None` if there is no comment or whitespace at `start`.
fn find_gap(segment: &str, start: usize) -> Option<(usize, bool)> {
	let mut end = start;
	let mut has_whitespace = false;
	loop {
		let rest = &segment[end..];
		if rest.starts_with("//") {
			end += rest.find(is_line_terminator).unwrap_or(rest.len());
		} else if rest.starts_with("/*") {
			match rest[2..].find("*/") {
				Some(close) => end += close + 4,
				None => break,
			}
		} else {
			match rest.chars().next() {
				Some(c) if is_whitespace(c) => {
					end += c.len_utf8();
					has_whitespace = true;
				},
				_ => break,
			}
		}
	}
	(end > start).then_some((end, has_whitespace))
}

/// Word characters are ASCII letters, digits and underscores.
fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn is_whitespace(c: char) -> bool {
	c.is_whitespace() || c == '\u{feff}'
}

fn is_line_terminator(c: char) -> bool {
	matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{assert, check, let_assert};

	fn build_str(segments: &[&str], values: &[Fragment<'_>]) -> RegexSource {
		let_assert!(Ok(template) = Template::new(segments, values));
		build(&template)
	}

	#[test]
	fn test_empty_pattern() {
		check!(build_str(&[], &[]).source() == "(?:)");
		check!(build_str(&[""], &[]).source() == "(?:)");
		check!(build_str(&["\n  // nothing here\n  "], &[]).source() == "(?:)");
	}

	#[test]
	fn test_simple_pattern() {
		check!(build_str(&["abc"], &[]).source() == "abc");
		check!(build_str(&[r"[abc](\w+)\(\)\[\]"], &[]).source() == r"[abc](\w+)\(\)\[\]");
	}

	#[test]
	fn test_whitespace_between_words() {
		check!(build_str(&["abc   def"], &[]).source() == r"abc\s+def");
		check!(
			build_str(&["\n      abc def ghi      jkl   mno\tpqr\n    "], &[]).source()
			== r"abc\s+def\s+ghi\s+jkl\s+mno\s+pqr"
		);
		check!(build_str(&["a + b"], &[]).source() == "a+b");
		check!(build_str(&["( a )"], &[]).source() == "(a)");
	}

	#[test]
	fn test_whitespace_next_to_value_is_removed() {
		let source = build_str(&["abc ", " def"], &[Fragment::literal("x")]);
		check!(source.source() == "abcxdef");
	}

	#[test]
	fn test_comments_are_removed() {
		let source = build_str(&["
			// a comment
			[a-z_][a-z_0-9]*
			/**
			 * block comments too
			 */
			[-+](?:0|[1-9][0-9]*)(?:\\.[0-9]+)?(?:[eE][-+][0-9]+)?
			// and the newlines around them
		"], &[]);
		check!(source.source() == r"[a-z_][a-z_0-9]*[-+](?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][-+][0-9]+)?");

		check!(build_str(&["abc/* c */def"], &[]).source() == "abcdef");
		check!(build_str(&["abc /* c */ def"], &[]).source() == r"abc\s+def");
		check!(build_str(&["a // x\r\nb"], &[]).source() == r"a\s+b");
	}

	#[test]
	fn test_escaped_content_is_kept() {
		check!(build_str(&[r"\/\/ not a comment"], &[]).source() == r"\/\/not\s+a\s+comment");
		check!(build_str(&[r"/\* not a comment \*/"], &[]).source() == r"/\*not\s+a\s+comment\*/");
		check!(build_str(&[r"a\ b"], &[]).source() == r"a\ b");
		check!(build_str(&["a\\\n b"], &[]).source() == "a\\\nb");
		check!(build_str(&["ab\\"], &[]).source() == "ab\\");
	}

	#[test]
	fn test_unclosed_block_comment_is_literal() {
		check!(build_str(&["a/*b"], &[]).source() == "a/*b");
	}

	#[test]
	fn test_literals_are_escaped() {
		let path = r"C:\Program Files (x86)\Common Files\Microsoft";
		let source = build_str(&[r"[abc](\w+)\(\)\[", r"\]"], &[Fragment::literal(path)]);
		check!(source.source() == r"[abc](\w+)\(\)\[C:\\Program Files \(x86\)\\Common Files\\Microsoft\]");
		check!(escape_literal("[](){}.?+*|^$\\") == r"\[\]\(\)\{\}\.\?\+\*\|\^\$\\");
		let_assert!(Cow::Borrowed("a-b c") = escape_literal("a-b c"));
	}

	#[test]
	fn test_patterns_are_grouped() {
		let inner = Fragment::Pattern { source: "[a-z_][a-z_0-9]*", flags: "i" };
		let source = build_str(&[r"[abc](\w+)\(\)\[", r"\]"], &[inner]);
		check!(source.source() == r"[abc](\w+)\(\)\[(?:[a-z_][a-z_0-9]*)\]");
		check!(source.flags() == "i");
	}

	#[test]
	fn test_insert_string_and_pattern() {
		let source = build_str(
			&["\n      ", "\n      ", "\n      ", "\n    "],
			&[Fragment::literal("[]{}()"), Fragment::pattern("[a-z]"), Fragment::flags("i")],
		);
		check!(source.source() == r"\[\]\{\}\(\)(?:[a-z])");
		check!(source.flags() == "i");
	}

	#[test]
	fn test_flags() {
		check!(build_str(&["", ""], &[Fragment::Pattern { source: "(?:)", flags: "s" }]).flags() == "s");
		check!(build_str(&["", ""], &[Fragment::flags("s")]).flags() == "s");
		check!(build_str(&["", ""], &[Fragment::flags("s")]).source() == "(?:)");
		check!(build_str(&["", "", ""], &[Fragment::flags("i"), Fragment::flags("s")]).flags() == "is");
		check!(build_str(&["", "", ""], &[Fragment::flags("ii"), Fragment::flags("si")]).flags() == "is");
	}

	#[test]
	fn test_nested_sources() {
		let number = build_str(&["[0-9]+", ""], &[Fragment::flags("u")]);
		let pair = build_str(&["", r"\s*,\s*", ""], &[Fragment::from(&number), Fragment::from(&number)]);
		check!(pair.source() == r"(?:[0-9]+)\s*,\s*(?:[0-9]+)");
		check!(pair.flags() == "u");
		assert!(pair.into_parts() == (String::from(r"(?:[0-9]+)\s*,\s*(?:[0-9]+)"), String::from("u")));
	}

	#[test]
	fn test_fragment_display() {
		check!(Fragment::from("a.b").to_string() == r"a\.b");
		check!(Fragment::pattern("a|b").to_string() == "(?:a|b)");
		check!(Fragment::flags("g").to_string() == "");
	}
}
