use crate::{Fragment, RegexSource};

impl RegexSource {
	/// Compile the source into a [`regex::Regex`].
	///
	/// The flags `i` (case insensitive), `m` (multi-line), `s` (dot matches newline) and `u` (Unicode) are applied.
	/// Other flags have no equivalent in the [`regex`] crate and are ignored.
	///
	/// # Example
	/// ```
	/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
	/// use tmplnorm::{Fragment, Template};
	///
	/// let values = [Fragment::literal("v1.0"), Fragment::flags("i")];
	/// let template = Template::new(&["^ ", " /* exactly */ $", ""], &values)?;
	/// let regex = tmplnorm::build(&template).compile()?;
	/// assert!(regex.is_match("V1.0"));
	/// assert!(!regex.is_match("v100"));
	/// # Ok(())
	/// # }
	/// ```
	pub fn compile(&self) -> Result<regex::Regex, regex::Error> {
		let mut builder = regex::RegexBuilder::new(self.source());
		for flag in self.flags().chars() {
			match flag {
				'i' => builder.case_insensitive(true),
				'm' => builder.multi_line(true),
				's' => builder.dot_matches_new_line(true),
				'u' => builder.unicode(true),
				_ => &mut builder,
			};
		}
		builder.build()
	}
}

impl<'a> From<&'a regex::Regex> for Fragment<'a> {
	fn from(other: &'a regex::Regex) -> Self {
		Self::pattern(other.as_str())
	}
}
