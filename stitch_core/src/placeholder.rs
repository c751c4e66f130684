use std::fmt::Display;

use serde::Deserialize;

use crate::StitchError;
use crate::StitchResult;
use crate::include::DIRECTIVE_MARKER;

/// Terminator closing an inline placeholder token. A directive never ends
/// with it, which is how `#INCLUDE name#` is told apart from
/// `#INCLUDE file.js`.
pub const PLACEHOLDER_TERMINATOR: char = '#';

/// How a placeholder is spelled in source text.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderSyntax {
	/// `#INCLUDE name#`
	#[default]
	Include,
	/// `#name#`, e.g. `#VERSION#`.
	Bare,
}

/// A named value injected into source text at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
	pub name: String,
	pub value: String,
	pub syntax: PlaceholderSyntax,
}

impl Placeholder {
	/// Create a placeholder using the `#INCLUDE name#` syntax.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> StitchResult<Self> {
		Self::with_syntax(name, value, PlaceholderSyntax::Include)
	}

	pub fn with_syntax(
		name: impl Into<String>,
		value: impl Into<String>,
		syntax: PlaceholderSyntax,
	) -> StitchResult<Self> {
		let name = name.into();
		if !is_valid_name(&name) {
			return Err(StitchError::InvalidPlaceholder(name));
		}

		Ok(Self {
			name,
			value: value.into(),
			syntax,
		})
	}

	/// The literal token replaced in source text.
	pub fn token(&self) -> String {
		match self.syntax {
			PlaceholderSyntax::Include => {
				format!(
					"{DIRECTIVE_MARKER}{}{PLACEHOLDER_TERMINATOR}",
					self.name
				)
			}
			PlaceholderSyntax::Bare => {
				format!(
					"{PLACEHOLDER_TERMINATOR}{}{PLACEHOLDER_TERMINATOR}",
					self.name
				)
			}
		}
	}
}

impl Display for Placeholder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.token())
	}
}

fn is_valid_name(name: &str) -> bool {
	!name.is_empty()
		&& !name
			.chars()
			.any(|ch| ch.is_whitespace() || ch == PLACEHOLDER_TERMINATOR)
}

/// Replace every occurrence of the placeholder's token with its value.
///
/// Values are inserted verbatim. Callers that target a string literal
/// position must quote the value themselves.
pub fn substitute(content: &str, placeholder: &Placeholder) -> String {
	content.replace(&placeholder.token(), &placeholder.value)
}

/// Count the occurrences of the placeholder's token in `content`.
pub fn count_occurrences(content: &str, placeholder: &Placeholder) -> usize {
	content.matches(&placeholder.token()).count()
}
