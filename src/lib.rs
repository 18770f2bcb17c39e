//! Normalization of segment/value templates: escape decoding, indentation stripping and regex assembly.
//!
//! A [`Template`] is a list of literal segments interleaved with values, like a template literal that has been taken apart.
//! This crate turns such templates into strings or regular expressions.
//!
//! # Features
//!
//! * Decode escape sequences (`\n`, `\x41`, `\u{1F38F}`, ...) strictly, leniently or not at all.
//! * Write multi-line strings indented along with the code around them: [`indented()`] removes the common indent.
//! * Write regular expressions with comments and free whitespace: [`build()`] strips them and inserts escaped values.
//! * Lenient functions never fail: problems are reported to a [`WarningSink`], by default through [`tracing`].
//! * Compile built regex sources with the [`regex`](https://docs.rs/regex) crate (optional, requires the `regex` feature).
//! * Serialize and deserialize regex fragments and sources (optional, requires the `serde` feature).
//!
//! # Examples
//!
//! The [`basic()`] function decodes the escape sequences in the segments and inserts the values.
//!
//! ```
//! # fn main() -> Result<(), tmplnorm::Error> {
//! use tmplnorm::Template;
//!
//! let template = Template::new(&[r"Hello\t", r"!\n"], &["world"])?;
//! assert_eq!(tmplnorm::basic(&template)?, "Hello\tworld!\n");
//! # Ok(())
//! # }
//! ```
//!
//! The [`indented()`] function removes the indent that is shared by all lines.
//! The template must start with a newline and end with a newline followed by the indent.
//!
//! ```
//! # fn main() -> Result<(), tmplnorm::Error> {
//! use tmplnorm::Template;
//!
//! let template = Template::new(
//! 	&[
//! 		"
//! 		fn main() {
//! 			println!(\"",
//! 		"\");
//! 		}
//! 		",
//! 	],
//! 	&["hello"],
//! )?;
//! assert_eq!(tmplnorm::indented(&template)?, "fn main() {\n\tprintln!(\"hello\");\n}");
//! # Ok(())
//! # }
//! ```
//!
//! The `*_safe` functions never fail.
//! Every problem is reported to a [`WarningSink`], and the result is the best effort.
//!
//! ```
//! use tmplnorm::Template;
//!
//! let mut warnings: Vec<tmplnorm::Error> = Vec::new();
//! let template = Template::from_literal(&r"version \8");
//! assert_eq!(tmplnorm::basic_safe(&template, &mut warnings), "version 8");
//! assert_eq!(warnings.len(), 1);
//!
//! // Or send the warnings to the application log.
//! assert_eq!(tmplnorm::basic_safe(&template, &mut tmplnorm::TracingSink), "version 8");
//! ```
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

use std::fmt::Display;

pub mod diagnostic;
pub mod error;
pub mod sink;
pub mod template;
pub mod unescape;

pub mod basic;
pub mod indent;
pub mod pattern;

mod features;

pub use basic::{basic, basic_raw, basic_safe};
pub use error::Error;
pub use indent::{indented, indented_raw, indented_safe};
pub use pattern::{build, Fragment, RegexSource};
pub use sink::{TracingSink, WarningSink};
pub use template::{compose, Hooks, Template};
pub use unescape::{decode, unescape, unescape_lenient, Mode};

/// Build a human readable message from a template, without ever failing.
///
/// If the first segment starts with a newline, the template is processed like [`indented_safe()`],
/// so that long messages can be written over multiple indented lines.
/// Otherwise it is processed like [`basic_safe()`].
///
/// Problems with the template are reported to `sink`,
/// so that a message can always be produced, even if it is not exactly what was intended.
///
/// # Example
/// ```
/// use tmplnorm::Template;
///
/// let template = Template::new(&["\n\tUnknown value: ", "\n\tExpected one of: a, b, c\n\t"], &["d"]).unwrap();
/// let message = tmplnorm::message(&template, &mut tmplnorm::TracingSink);
/// assert_eq!(message, "Unknown value: d\nExpected one of: a, b, c");
/// ```
pub fn message<V: Display>(template: &Template<'_, V>, sink: &mut dyn WarningSink) -> String {
	match template.segments().first() {
		Some(first) if first.starts_with('\n') => indented_safe(template, sink),
		_ => basic_safe(template, sink),
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::error::StructuralFormatError;
	use assert2::{assert, check, let_assert};

	#[test]
	fn test_message_without_values() {
		let mut warnings: Vec<Error> = Vec::new();
		check!(message(&Template::empty(), &mut warnings) == "");
		check!(message(&Template::from_literal(&"\n    "), &mut warnings) == "");
		check!(message(&Template::from_literal(&"\n      message\n      "), &mut warnings) == "message");
		check!(message(&Template::from_literal(&"abc"), &mut warnings) == "abc");
		check!(warnings.is_empty());
	}

	#[test]
	fn test_message_with_values() {
		let mut warnings: Vec<Error> = Vec::new();
		let_assert!(Ok(template) = Template::new(&["\n      message ", "\n      "], &[123]));
		check!(message(&template, &mut warnings) == "message 123");
		check!(warnings.is_empty());
	}

	#[test]
	fn test_message_with_invalid_escape_sequences() {
		let mut warnings: Vec<Error> = Vec::new();
		let_assert!(Ok(template) = Template::new(
			&[
				"\n\t\t\\00\\1\\2\\3\\4\\5\\6\\7\\8\\9\\n",
				"\\u{1f38f}\\u{110000}\\xXX\\uXXXXX\n\t\t",
			],
			&[""],
		));
		check!(message(&template, &mut warnings) == "00123456789\n🎏u{110000}xXXuXXXXX");
		check!(warnings.len() == 13);
		check!(warnings.iter().all(|w| matches!(w, Error::EscapeSyntax(_))));
	}

	#[test]
	fn test_message_multiline() {
		let mut warnings: Vec<Error> = Vec::new();
		let values = [
			String::from(r"abc def ghi jkl mno pqr st\u vwx yz"),
			" ".repeat(26),
			"^".repeat(2),
		];
		let_assert!(Ok(template) = Template::new(
			&["\n\tInvalid Unicode escape sequence\n\t", "\n\t", "", "\n\t"],
			&values,
		));
		check!(message(&template, &mut warnings) == concat!(
			"Invalid Unicode escape sequence\n",
			r"abc def ghi jkl mno pqr st\u vwx yz", "\n",
			"                          ^^",
		));
		check!(warnings.is_empty());
	}

	#[test]
	fn test_message_falls_back_to_basic() {
		let mut warnings: Vec<Error> = Vec::new();
		let source = "\n      a\n      b\n      c\n   x   ";
		check!(message(&Template::from_literal(&source), &mut warnings) == source);
		let_assert!([Error::StructuralFormat(e)] = warnings.as_slice());
		assert!(*e == StructuralFormatError::TrailingContent);
	}

	#[test]
	fn test_message_does_not_decode_values() {
		let mut warnings: Vec<Error> = Vec::new();
		let_assert!(Ok(template) = Template::new(&["value: ", ""], &[r"\8"]));
		check!(message(&template, &mut warnings) == r"value: \8");
		check!(warnings.is_empty());
	}
}
