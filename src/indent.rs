//! Indented multi-line templates.
//!
//! An indented template starts with a newline and ends with a newline followed by only spaces or tabs.
//! That final run of spaces and tabs is the common indent:
//! every line must either be empty or start with it, and it is removed from every line.
//!
//! ```
//! # fn main() -> Result<(), tmplnorm::Error> {
//! use tmplnorm::Template;
//!
//! let template = Template::from_literal(&"
//!     aaaaaa\\
//!     bbbbbb
//!
//!     cccccc
//!     ");
//! assert_eq!(tmplnorm::indented(&template)?, "aaaaaabbbbbb\n\ncccccc");
//! assert_eq!(tmplnorm::indented_raw(&template)?, "aaaaaa\\\nbbbbbb\n\ncccccc");
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::fmt::Display;

use crate::basic::basic_safe;
use crate::error::StructuralFormatError;
use crate::template::{compose, Hooks, Template};
use crate::unescape::{Decoder, Lenient, Raw, Strict};
use crate::{Error, WarningSink};

/// Validate the shape of an indented template and strip the common indent.
///
/// The segments should be raw: a backslash before a newline must still be present,
/// so that the line continuation is handled after the indent has been removed.
///
/// On success, the leading newline of the first segment and the trailing newline of the last segment are gone,
/// and every newline is directly followed by the rest of its line.
pub fn normalize<'t>(segments: &[&'t str]) -> Result<Vec<Cow<'t, str>>, StructuralFormatError> {
	let (first, last) = match (segments.first(), segments.last()) {
		(Some(first), Some(last)) => (*first, *last),
		_ => return Err(StructuralFormatError::NoSegments),
	};

	if !first.starts_with('\n') {
		return Err(StructuralFormatError::MissingLeadingNewline);
	}

	let indent = common_indent(last).ok_or(StructuralFormatError::TrailingContent)?;

	for (index, segment) in segments.iter().enumerate() {
		for position in memchr::memchr_iter(b'\n', segment.as_bytes()) {
			let line = &segment[position + 1..];
			if !line.starts_with('\n') && !line.starts_with(indent) {
				return Err(StructuralFormatError::MisalignedIndent {
					segment: index,
					position,
				});
			}
		}
	}

	let search = format!("\n{indent}");
	let last_index = segments.len() - 1;
	let normalized = segments
		.iter()
		.enumerate()
		.map(|(index, &segment)| {
			let segment = strip_indent(segment, &search);
			trim_newlines(segment, index == 0, index == last_index)
		})
		.collect();
	Ok(normalized)
}

/// Get the run of spaces and tabs after the last newline.
///
/// Returns `None` if there is no newline, or if something else follows it.
fn common_indent(segment: &str) -> Option<&str> {
	let newline = memchr::memrchr(b'\n', segment.as_bytes())?;
	let indent = &segment[newline + 1..];
	indent.bytes().all(|c| c == b' ' || c == b'\t').then_some(indent)
}

/// Replace every newline followed by the indent with just a newline.
fn strip_indent<'t>(segment: &'t str, search: &str) -> Cow<'t, str> {
	if search.len() > 1 && segment.contains(search) {
		Cow::Owned(segment.replace(search, "\n"))
	} else {
		Cow::Borrowed(segment)
	}
}

/// Remove one leading and/or one trailing newline.
fn trim_newlines(segment: Cow<'_, str>, leading: bool, trailing: bool) -> Cow<'_, str> {
	match segment {
		Cow::Borrowed(mut segment) => {
			if leading {
				segment = segment.strip_prefix('\n').unwrap_or(segment);
			}
			if trailing {
				segment = segment.strip_suffix('\n').unwrap_or(segment);
			}
			Cow::Borrowed(segment)
		},
		Cow::Owned(mut segment) => {
			if leading && segment.starts_with('\n') {
				segment.remove(0);
			}
			if trailing && segment.ends_with('\n') {
				segment.pop();
			}
			Cow::Owned(segment)
		},
	}
}

/// [`Hooks`] that strip the common indent and then run every segment through a [`Decoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Indented<D> {
	decoder: D,
}

impl<D: Decoder> Indented<D> {
	/// Create hooks that decode the unindented segments with the given decoder.
	pub fn new(decoder: D) -> Self {
		Self { decoder }
	}
}

impl<V, D> Hooks<V> for Indented<D>
where
	V: Display,
	D: Decoder,
	D::Error: Into<Error>,
{
	type Output = String;
	type Error = Error;

	fn prepare_segments<'t>(&mut self, template: &Template<'t, V>) -> Result<Vec<Cow<'t, str>>, Error> {
		Ok(normalize(template.segments())?)
	}

	fn modify_segment<'s>(
		&mut self,
		segment: &'s str,
		_index: usize,
		_segments: &[Cow<'_, str>],
	) -> Result<Cow<'s, str>, Error> {
		self.decoder.decode(segment).map_err(Into::into)
	}

	#[inline]
	fn finalize(self, text: String) -> Result<String, Error> {
		Ok(text)
	}
}

/// Build a string from an indented template, removing the common indent.
///
/// Escape sequences are decoded after the indent is removed,
/// so a backslash at the end of a line joins it with the next line.
pub fn indented<V: Display>(template: &Template<'_, V>) -> Result<String, Error> {
	compose(template, Indented::new(Strict))
}

/// Build a string from an indented template without decoding escape sequences.
///
/// A backslash at the end of a line is kept, and so is the newline after it.
pub fn indented_raw<V: Display>(template: &Template<'_, V>) -> Result<String, Error> {
	compose(template, Indented::new(Raw))
}

/// Build a string from an indented template, but never fail.
///
/// Invalid escape sequences are reported to `sink` and only their backslash is removed.
/// If the template does not have the shape of an indented template,
/// the problem is reported to `sink` and the template is processed by [`basic_safe()`] instead.
pub fn indented_safe<V: Display>(template: &Template<'_, V>, sink: &mut dyn WarningSink) -> String {
	match compose(template, Indented::new(Lenient::new(sink))) {
		Ok(text) => text,
		Err(e) => {
			sink.warn(e);
			basic_safe(template, sink)
		},
	}
}
