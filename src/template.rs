//! Templates and the composition pipeline.
//!
//! Every transform in this crate is a set of [`Hooks`] driven by [`compose()`]:
//! the driver walks the segments in order, asks the hooks for the text of each segment and each value,
//! concatenates everything and lets the hooks build the final result.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt::Display;

use crate::error::UsageError;

/// A sequence of literal segments interleaved with substitution values.
///
/// Segment `i` always precedes value `i`, and the last segment comes after the last value.
/// A template therefore has exactly one more segment than it has values,
/// except for the empty template which has neither.
#[derive(Debug)]
pub struct Template<'a, V> {
	segments: &'a [&'a str],
	values: &'a [V],
}

impl<V> Clone for Template<'_, V> {
	#[inline]
	fn clone(&self) -> Self {
		*self
	}
}

impl<V> Copy for Template<'_, V> {}

impl<'a, V> Template<'a, V> {
	/// Create a template from segments and values.
	///
	/// Returns an error if there is not exactly one more segment than there are values.
	/// Zero segments with zero values is allowed and gives the empty template.
	pub fn new(segments: &'a [&'a str], values: &'a [V]) -> Result<Self, UsageError> {
		let valid = segments.len() == values.len() + 1 || (segments.is_empty() && values.is_empty());
		if !valid {
			return Err(UsageError {
				segments: segments.len(),
				values: values.len(),
			});
		}
		Ok(Self { segments, values })
	}

	/// Get the literal segments.
	#[inline]
	pub fn segments(&self) -> &'a [&'a str] {
		self.segments
	}

	/// Get the substitution values.
	#[inline]
	pub fn values(&self) -> &'a [V] {
		self.values
	}
}

impl<'a> Template<'a, Infallible> {
	/// Create a template from a single segment without values.
	#[inline]
	pub fn from_literal(segment: &'a &'a str) -> Self {
		Self {
			segments: std::slice::from_ref(segment),
			values: &[],
		}
	}

	/// Create the empty template, with no segments at all.
	#[inline]
	pub fn empty() -> Self {
		Self {
			segments: &[],
			values: &[],
		}
	}
}

/// Per-invocation hooks for [`compose()`].
///
/// A fresh hooks object is created for every invocation,
/// so `&mut self` doubles as the context shared between all hook calls of that invocation.
pub trait Hooks<V: Display> {
	/// The final result type.
	type Output;

	/// The error type of all hooks.
	type Error;

	/// Get the segments to compose.
	///
	/// The default returns the segments of the template unchanged.
	fn prepare_segments<'t>(&mut self, template: &Template<'t, V>) -> Result<Vec<Cow<'t, str>>, Self::Error> {
		Ok(template.segments().iter().map(|&s| Cow::Borrowed(s)).collect())
	}

	/// Transform one prepared segment.
	///
	/// The default returns the segment unchanged.
	fn modify_segment<'s>(
		&mut self,
		segment: &'s str,
		index: usize,
		segments: &[Cow<'_, str>],
	) -> Result<Cow<'s, str>, Self::Error> {
		let _ = (index, segments);
		Ok(Cow::Borrowed(segment))
	}

	/// Convert one value to text.
	///
	/// The default uses the [`Display`] implementation of the value.
	fn convert_value(&mut self, value: &V, index: usize, values: &[V]) -> Result<String, Self::Error> {
		let _ = (index, values);
		Ok(value.to_string())
	}

	/// Build the result from the concatenated text.
	fn finalize(self, text: String) -> Result<Self::Output, Self::Error>;
}

/// Hooks that keep everything as is: the plain concatenation of segments and values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<V: Display> Hooks<V> for Plain {
	type Output = String;
	type Error = Infallible;

	#[inline]
	fn finalize(self, text: String) -> Result<String, Infallible> {
		Ok(text)
	}
}

/// Run a template through a set of hooks.
///
/// Errors from the hooks are propagated unchanged.
/// The empty template composes to the empty string before finalization.
pub fn compose<V, H>(template: &Template<'_, V>, mut hooks: H) -> Result<H::Output, H::Error>
where
	V: Display,
	H: Hooks<V>,
{
	let segments = hooks.prepare_segments(template)?;
	let values = template.values();
	let mut output = String::with_capacity(segments.iter().map(|s| s.len()).sum());
	for (index, segment) in segments.iter().enumerate() {
		output.push_str(&hooks.modify_segment(segment, index, &segments)?);
		if let Some(value) = values.get(index) {
			output.push_str(&hooks.convert_value(value, index, values)?);
		}
	}
	hooks.finalize(output)
}

/// Unwrap a result that can not hold an error.
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
	match result {
		Ok(value) => value,
		Err(never) => match never {},
	}
}
