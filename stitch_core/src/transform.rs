use std::fmt::Display;
use std::path::Path;

use crate::StitchResult;
use crate::files::read_source;
use crate::header::strip_license_header;
use crate::include::SearchPath;
use crate::include::resolve_includes;
use crate::include::resolve_includes_from;
use crate::placeholder::Placeholder;
use crate::placeholder::substitute;

/// A single text-to-text stage of a [`TransformationChain`].
///
/// Every parameter is captured when the transformation is constructed, so
/// applying it needs nothing but the input text. Only
/// [`Transformation::ResolveIncludes`] touches the file system, and only to
/// read included files.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Transformation {
	/// Put fixed text before the input, separated by a newline.
	Prepend(String),
	/// Put fixed text after the input, separated by a newline.
	Append(String),
	/// Replace a placeholder token with its value.
	Substitute(Placeholder),
	/// Inline `#INCLUDE` directives from the given search roots.
	ResolveIncludes(SearchPath),
	/// Remove a leading license header from the input.
	StripHeader,
}

impl Transformation {
	/// Prepend the contents of `path`, read once at construction.
	pub fn prepend_file(path: &Path) -> StitchResult<Self> {
		Ok(Self::Prepend(read_source(path)?))
	}

	/// Append the contents of `path` without its license header, read once at
	/// construction.
	pub fn append_file(path: &Path) -> StitchResult<Self> {
		let content = read_source(path)?;
		Ok(Self::Append(strip_license_header(&content).to_string()))
	}

	/// Put `prefix` directly in front of the fixed text of a
	/// [`Transformation::Prepend`] or [`Transformation::Append`]. Other stages
	/// are returned unchanged.
	#[must_use]
	pub fn with_prefix(self, prefix: &str) -> Self {
		match self {
			Self::Prepend(text) => Self::Prepend(format!("{prefix}{text}")),
			Self::Append(text) => Self::Append(format!("{prefix}{text}")),
			other => other,
		}
	}

	/// Apply this stage to `content`.
	pub fn apply(&self, content: &str) -> StitchResult<String> {
		self.apply_from(content, None)
	}

	/// Apply this stage to `content` read from `origin`. Include resolution
	/// treats `origin` as already being expanded, so a file that includes
	/// itself fails on the first directive.
	pub fn apply_from(&self, content: &str, origin: Option<&Path>) -> StitchResult<String> {
		let result = match self {
			Self::Prepend(text) => format!("{text}\n{content}"),
			Self::Append(text) => format!("{content}\n{text}"),
			Self::Substitute(placeholder) => substitute(content, placeholder),
			Self::ResolveIncludes(search_path) => {
				match origin {
					Some(origin) => resolve_includes_from(content, search_path, origin)?,
					None => resolve_includes(content, search_path)?,
				}
			}
			Self::StripHeader => strip_license_header(content).to_string(),
		};

		Ok(result)
	}
}

impl Display for Transformation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Prepend(text) => write!(f, "prepend ({} bytes)", text.len()),
			Self::Append(text) => write!(f, "append ({} bytes)", text.len()),
			Self::Substitute(placeholder) => write!(f, "substitute {placeholder}"),
			Self::ResolveIncludes(search_path) => {
				write!(f, "resolve includes from {}", search_path.describe())
			}
			Self::StripHeader => write!(f, "strip license header"),
		}
	}
}

/// An ordered list of transformations applied strictly left to right, each
/// stage receiving the full output of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationChain {
	stages: Vec<Transformation>,
}

impl TransformationChain {
	pub fn new(stages: Vec<Transformation>) -> Self {
		Self { stages }
	}

	/// Add a stage to the end of the chain.
	#[must_use]
	pub fn then(mut self, stage: Transformation) -> Self {
		self.stages.push(stage);
		self
	}

	pub fn push(&mut self, stage: Transformation) {
		self.stages.push(stage);
	}

	pub fn stages(&self) -> &[Transformation] {
		&self.stages
	}

	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Run `content` through every stage in order.
	pub fn apply(&self, content: &str) -> StitchResult<String> {
		self.run(content, None)
	}

	/// Run `content`, read from the file at `origin`, through every stage in
	/// order.
	pub fn apply_from(&self, content: &str, origin: &Path) -> StitchResult<String> {
		self.run(content, Some(origin))
	}

	fn run(&self, content: &str, origin: Option<&Path>) -> StitchResult<String> {
		let mut result = content.to_string();

		for stage in &self.stages {
			tracing::debug!(stage = %stage, "applying transformation");
			result = stage.apply_from(&result, origin)?;
		}

		Ok(result)
	}
}

impl FromIterator<Transformation> for TransformationChain {
	fn from_iter<T: IntoIterator<Item = Transformation>>(iter: T) -> Self {
		Self::new(iter.into_iter().collect())
	}
}
