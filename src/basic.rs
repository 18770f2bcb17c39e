//! Plain templates: decode the escape sequences in every segment and insert the values.

use std::borrow::Cow;
use std::fmt::Display;

use crate::template::{compose, infallible, Hooks, Template};
use crate::unescape::{Decoder, Lenient, Raw, Strict};
use crate::{Error, WarningSink};

/// [`Hooks`] that run every segment through a [`Decoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Basic<D> {
	decoder: D,
}

impl<D: Decoder> Basic<D> {
	/// Create hooks that decode segments with the given decoder.
	pub fn new(decoder: D) -> Self {
		Self { decoder }
	}
}

impl<V: Display, D: Decoder> Hooks<V> for Basic<D> {
	type Output = String;
	type Error = D::Error;

	fn modify_segment<'s>(
		&mut self,
		segment: &'s str,
		_index: usize,
		_segments: &[Cow<'_, str>],
	) -> Result<Cow<'s, str>, D::Error> {
		self.decoder.decode(segment)
	}

	#[inline]
	fn finalize(self, text: String) -> Result<String, D::Error> {
		Ok(text)
	}
}

/// Build a string like a normal template literal would.
///
/// The escape sequences in the segments are decoded, the values are inserted with their [`Display`] implementation.
/// Escape sequences in the values are left alone.
///
/// # Example
/// ```
/// # fn main() -> Result<(), tmplnorm::Error> {
/// use tmplnorm::Template;
///
/// let template = Template::new(&[r"abc\t", r"\n"], &["def"])?;
/// assert_eq!(tmplnorm::basic(&template)?, "abc\tdef\n");
/// # Ok(())
/// # }
/// ```
pub fn basic<V: Display>(template: &Template<'_, V>) -> Result<String, Error> {
	Ok(compose(template, Basic::new(Strict))?)
}

/// Build a string without decoding escape sequences.
pub fn basic_raw<V: Display>(template: &Template<'_, V>) -> String {
	infallible(compose(template, Basic::new(Raw)))
}

/// Build a string like [`basic()`], but never fail.
///
/// Invalid escape sequences are reported to `sink` and only their backslash is removed.
pub fn basic_safe<V: Display>(template: &Template<'_, V>, sink: &mut dyn WarningSink) -> String {
	infallible(compose(template, Basic::new(Lenient::new(sink))))
}
