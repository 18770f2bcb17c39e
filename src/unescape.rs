//! Decoding of backslash escape sequences.
//!
//! The supported escapes are those of a JavaScript template literal:
//!
//! * `\b`, `\f`, `\n`, `\r`, `\t` and `\v` become the matching control character.
//! * A backslash before a line terminator removes both (line continuation).
//! * `\0` becomes a NUL character, as long as it is not followed by another digit.
//! * `\xHH` becomes the character with code point `0xHH`.
//! * `\uHHHH` and `\u{H...}` (one to six digits) become the character with that code point.
//! * Any other character after a backslash is kept as is and the backslash is removed.
//!
//! Octal escapes, `\8` and `\9`, malformed `\x` and `\u` escapes,
//! and code points above U+10FFFF are errors.

use std::borrow::Cow;
use std::convert::Infallible;

use crate::diagnostic::{line_at, locate};
use crate::error::{EscapeErrorKind, EscapeSyntaxError};
use crate::sink::WarningSink;

/// The fixed two-character escapes and their replacements.
pub const ESCAPE_TABLE: &[(&str, &str)] = &[
	("\\b", "\u{8}"),
	("\\f", "\u{c}"),
	("\\n", "\n"),
	("\\r", "\r"),
	("\\t", "\t"),
	("\\v", "\u{b}"),
	("\\\r", ""),
	("\\\n", ""),
	("\\0", "\0"),
];

/// How to deal with invalid escape sequences.
pub enum Mode<'s> {
	/// Stop at the first invalid escape sequence and return an error.
	Strict,

	/// Report invalid escape sequences to the sink and remove only their backslash.
	Lenient(&'s mut dyn WarningSink),
}

impl std::fmt::Debug for Mode<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Strict => write!(f, "Strict"),
			Self::Lenient(_) => f.debug_tuple("Lenient").finish_non_exhaustive(),
		}
	}
}

/// Decode all escape sequences in `text`.
///
/// In [`Mode::Strict`], the first invalid escape sequence aborts decoding.
/// In [`Mode::Lenient`], this function never returns an error.
///
/// If `text` contains no escape sequences, it is returned without copying.
pub fn decode<'t>(text: &'t str, mode: Mode<'_>) -> Result<Cow<'t, str>, EscapeSyntaxError> {
	match mode {
		Mode::Strict => decode_impl(text, Err),
		Mode::Lenient(sink) => decode_impl(text, |error| {
			sink.warn(error.into());
			Ok(())
		}),
	}
}

/// Decode all escape sequences in `text`, failing on the first invalid one.
///
/// # Example
/// ```
/// # fn main() -> Result<(), tmplnorm::error::EscapeSyntaxError> {
/// assert_eq!(tmplnorm::unescape(r"tab\there")?, "tab\there");
/// assert_eq!(tmplnorm::unescape(r"\u{1f38f}")?, "🎏");
/// # Ok(())
/// # }
/// ```
pub fn unescape(text: &str) -> Result<Cow<'_, str>, EscapeSyntaxError> {
	decode(text, Mode::Strict)
}

/// Decode all escape sequences in `text`, reporting invalid ones to `sink`.
///
/// The backslash of an invalid escape sequence is removed, the rest of it is kept.
pub fn unescape_lenient<'t>(text: &'t str, sink: &mut dyn WarningSink) -> Cow<'t, str> {
	Lenient::new(sink).decode_infallible(text)
}

/// Strategy for decoding the escape sequences in a segment.
pub trait Decoder {
	/// The error returned for invalid escape sequences.
	type Error;

	/// Decode the escape sequences in `text`.
	fn decode<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>, Self::Error>;
}

/// Fail on the first invalid escape sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl Decoder for Strict {
	type Error = EscapeSyntaxError;

	fn decode<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>, EscapeSyntaxError> {
		decode_impl(text, Err)
	}
}

/// Warn about invalid escape sequences and strip their backslash.
pub struct Lenient<'s> {
	sink: &'s mut dyn WarningSink,
}

impl<'s> Lenient<'s> {
	/// Create a lenient decoder that reports to the given sink.
	pub fn new(sink: &'s mut dyn WarningSink) -> Self {
		Self { sink }
	}

	fn decode_infallible<'t>(&mut self, text: &'t str) -> Cow<'t, str> {
		crate::template::infallible(Decoder::decode(self, text))
	}
}

impl std::fmt::Debug for Lenient<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Lenient").finish_non_exhaustive()
	}
}

impl Decoder for Lenient<'_> {
	type Error = Infallible;

	fn decode<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>, Infallible> {
		decode_impl(text, |error| {
			self.sink.warn(error.into());
			Ok(())
		})
	}
}

/// Leave escape sequences alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl Decoder for Raw {
	type Error = Infallible;

	#[inline]
	fn decode<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>, Infallible> {
		Ok(Cow::Borrowed(text))
	}
}

impl Decoder for Mode<'_> {
	type Error = EscapeSyntaxError;

	fn decode<'t>(&mut self, text: &'t str) -> Result<Cow<'t, str>, EscapeSyntaxError> {
		match self {
			Self::Strict => Strict.decode(text),
			Self::Lenient(sink) => decode(text, Mode::Lenient(&mut **sink)),
		}
	}
}

/// Decode all escape sequences in `source`.
///
/// Every invalid escape sequence is passed to `on_error`.
/// If it returns an error, decoding stops and the error is returned.
/// Otherwise, the backslash of the escape sequence is dropped and decoding continues.
fn decode_impl<E>(
	source: &str,
	mut on_error: impl FnMut(EscapeSyntaxError) -> Result<(), E>,
) -> Result<Cow<'_, str>, E> {
	let mut escape = match EscapeMatch::find(source, 0) {
		Some(x) => x,
		None => return Ok(Cow::Borrowed(source)),
	};

	let mut output = String::with_capacity(source.len());
	let mut high_surrogate = None;
	let mut finger = 0;
	loop {
		if escape.start != finger {
			flush_surrogate(&mut output, &mut high_surrogate);
			output.push_str(&source[finger..escape.start]);
		}

		let decoded = match escape.decode() {
			Ok(x) => x,
			Err(kind) => {
				on_error(escape.error(kind))?;
				Decoded::Text(&escape.as_str()[1..])
			},
		};

		match decoded {
			Decoded::Text(text) => {
				flush_surrogate(&mut output, &mut high_surrogate);
				output.push_str(text);
			},
			Decoded::Char(c) => {
				flush_surrogate(&mut output, &mut high_surrogate);
				output.push(c);
			},
			Decoded::Surrogate(low @ 0xDC00..=0xDFFF) => match high_surrogate.take() {
				Some(high) => {
					let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
					output.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
				},
				None => output.push(char::REPLACEMENT_CHARACTER),
			},
			Decoded::Surrogate(high) => {
				flush_surrogate(&mut output, &mut high_surrogate);
				high_surrogate = Some(high);
			},
		}

		finger = escape.end;
		escape = match EscapeMatch::find(source, finger) {
			Some(x) => x,
			None => break,
		};
	}

	flush_surrogate(&mut output, &mut high_surrogate);
	output.push_str(&source[finger..]);
	Ok(Cow::Owned(output))
}

/// Write an unpaired high surrogate as a replacement character.
fn flush_surrogate(output: &mut String, high_surrogate: &mut Option<u32>) {
	if high_surrogate.take().is_some() {
		output.push(char::REPLACEMENT_CHARACTER);
	}
}

/// The replacement for a single escape sequence.
#[derive(Debug, Eq, PartialEq)]
enum Decoded<'a> {
	/// Replace the escape sequence with a string.
	Text(&'a str),

	/// Replace the escape sequence with a character.
	Char(char),

	/// A UTF-16 surrogate that may pair up with the next escape sequence.
	Surrogate(u32),
}

/// A backslash, the character after it, and any hexadecimal digits that belong to it.
#[derive(Debug)]
struct EscapeMatch<'a> {
	/// The entire text the escape sequence was found in.
	source: &'a str,

	/// The byte offset of the backslash.
	start: usize,

	/// The byte offset just past the escape sequence.
	end: usize,

	/// The character after the backslash.
	character: char,

	/// The hexadecimal digits of a well-formed `\x` or `\u` escape.
	hex: Option<&'a str>,
}

impl<'a> EscapeMatch<'a> {
	/// Find the first escape sequence in `source` at or after `from`.
	///
	/// A backslash at the very end of the source is not an escape sequence.
	fn find(source: &'a str, from: usize) -> Option<Self> {
		let bytes = source.as_bytes();
		let start = from + memchr::memchr(b'\\', &bytes[from..])?;
		let character = source[start + 1..].chars().next()?;
		let mut end = start + 1 + character.len_utf8();
		let mut hex = None;

		match character {
			'0' if bytes.get(end).is_some_and(u8::is_ascii_digit) => end += 1,
			'x' if hex_digits(&bytes[end..], 2) == 2 => {
				hex = Some(&source[end..end + 2]);
				end += 2;
			},
			'u' => {
				let digits = hex_digits(bytes.get(end + 1..).unwrap_or_default(), 7);
				if bytes.get(end) == Some(&b'{') && (1..=6).contains(&digits) && bytes.get(end + 1 + digits) == Some(&b'}') {
					hex = Some(&source[end + 1..end + 1 + digits]);
					end += digits + 2;
				} else if hex_digits(&bytes[end..], 4) == 4 {
					hex = Some(&source[end..end + 4]);
					end += 4;
				}
			},
			_ => (),
		}

		Some(Self {
			source,
			start,
			end,
			character,
			hex,
		})
	}

	/// Get the full text of the escape sequence.
	fn as_str(&self) -> &'a str {
		&self.source[self.start..self.end]
	}

	/// Get the replacement for the escape sequence.
	fn decode(&self) -> Result<Decoded<'a>, EscapeErrorKind> {
		let text = self.as_str();
		if let Some((_, value)) = ESCAPE_TABLE.iter().find(|(escape, _)| *escape == text) {
			return Ok(Decoded::Text(*value));
		}

		match self.character {
			'0'..='7' => Err(EscapeErrorKind::Octal),
			'8' | '9' => Err(EscapeErrorKind::EightOrNine),
			'x' => {
				let hex = self.hex.ok_or(EscapeErrorKind::InvalidHexadecimal)?;
				let code = u8::from_str_radix(hex, 16).map_err(|_| EscapeErrorKind::InvalidHexadecimal)?;
				Ok(Decoded::Char(char::from(code)))
			},
			'u' => {
				let hex = self.hex.ok_or(EscapeErrorKind::InvalidUnicode)?;
				let code = u32::from_str_radix(hex, 16).map_err(|_| EscapeErrorKind::InvalidUnicode)?;
				if code > 0x10FFFF {
					return Err(EscapeErrorKind::UndefinedCodePoint);
				}
				match char::from_u32(code) {
					Some(c) => Ok(Decoded::Char(c)),
					None => Ok(Decoded::Surrogate(code)),
				}
			},
			_ => Ok(Decoded::Text(&text[1..])),
		}
	}

	/// Create the diagnostic for this escape sequence.
	fn error(&self, kind: EscapeErrorKind) -> EscapeSyntaxError {
		EscapeSyntaxError {
			kind,
			sequence: self.as_str().to_owned(),
			position: self.start,
			line: line_at(self.source, self.start).to_owned(),
			location: locate(self.source, self.start..self.end),
		}
	}
}

/// Count the leading ASCII hexadecimal digits in `data`, up to `max`.
fn hex_digits(data: &[u8], max: usize) -> usize {
	data.iter().take(max).take_while(|c| c.is_ascii_hexdigit()).count()
}
