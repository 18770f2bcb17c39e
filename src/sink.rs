//! Warning sinks for the lenient code paths.
//!
//! Lenient decoding and the `*_safe` functions never fail.
//! Instead, every problem they recover from is reported to a [`WarningSink`] passed in by the caller.

use crate::Error;

/// Trait for types that receive warnings from lenient operations.
///
/// Warnings are emitted in the order the problems are found during a single left-to-right scan.
pub trait WarningSink {
	/// Receive one warning.
	fn warn(&mut self, warning: Error);
}

/// Forward warnings to [`tracing`] at the `WARN` level.
///
/// This does not install a subscriber: the warnings go wherever the application sends its logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
	fn warn(&mut self, warning: Error) {
		tracing::warn!("{}", warning);
	}
}

/// Silently drop all warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl WarningSink for Discard {
	#[inline]
	fn warn(&mut self, _warning: Error) {}
}

/// Collect warnings in a vector.
///
/// # Example
/// ```rust
/// let mut warnings: Vec<tmplnorm::Error> = Vec::new();
/// assert_eq!(tmplnorm::unescape_lenient(r"a\8", &mut warnings), "a8");
/// assert_eq!(warnings.len(), 1);
/// ```
impl WarningSink for Vec<Error> {
	fn warn(&mut self, warning: Error) {
		self.push(warning);
	}
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
	#[inline(always)]
	fn warn(&mut self, warning: Error) {
		(**self).warn(warning)
	}
}

impl<S: WarningSink + ?Sized> WarningSink for Box<S> {
	#[inline(always)]
	fn warn(&mut self, warning: Error) {
		(**self).warn(warning)
	}
}

/// [`WarningSink`] produced by [`from_fn()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FnSink<F> {
	func: F,
}

impl<F> WarningSink for FnSink<F>
where
	F: FnMut(Error),
{
	#[inline(always)]
	fn warn(&mut self, warning: Error) {
		(self.func)(warning)
	}
}

/// Creates a [`WarningSink`] that delegates to the given function.
///
/// # Example
/// ```rust
/// let mut count = 0;
/// let mut sink = tmplnorm::sink::from_fn(|_| count += 1);
/// tmplnorm::unescape_lenient(r"\1\2\3", &mut sink);
/// assert_eq!(count, 3);
/// ```
pub const fn from_fn<F>(func: F) -> FnSink<F>
where
	F: FnMut(Error),
{
	FnSink { func }
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::error::{StructuralFormatError, UsageError};
	use assert2::{assert, let_assert};

	fn warning() -> Error {
		UsageError { segments: 0, values: 1 }.into()
	}

	#[test]
	fn test_vec_sink_keeps_order() {
		let mut sink: Vec<Error> = Vec::new();
		sink.warn(warning());
		sink.warn(StructuralFormatError::NoSegments.into());
		let_assert!([Error::Usage(_), Error::StructuralFormat(_)] = sink.as_slice());
	}

	#[test]
	fn test_dyn_sink() {
		let mut warnings: Vec<Error> = Vec::new();
		let sink: &mut dyn WarningSink = &mut warnings;
		sink.warn(warning());
		assert!(warnings.len() == 1);
	}

	#[test]
	fn test_fn_sink() {
		let mut seen = Vec::new();
		from_fn(|w: Error| seen.push(w.to_string())).warn(warning());
		assert!(seen == ["A template with 1 values needs 2 segments, but got 0"]);
	}

	#[test]
	fn test_discard_and_tracing() {
		Discard.warn(warning());
		TracingSink.warn(warning());
	}
}
