use std::path::PathBuf;

use crate::StitchResult;
use crate::files::normalize_line_endings;
use crate::files::read_source;
use crate::files::write_atomic;
use crate::transform::TransformationChain;

/// One output file produced by running a primary source through a chain of
/// transformations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
	pub name: String,
	pub source: PathBuf,
	pub chain: TransformationChain,
	pub target: PathBuf,
}

impl Artifact {
	pub fn new(
		name: impl Into<String>,
		source: impl Into<PathBuf>,
		chain: TransformationChain,
		target: impl Into<PathBuf>,
	) -> Self {
		Self {
			name: name.into(),
			source: source.into(),
			chain,
			target: target.into(),
		}
	}

	/// Run the chain over the source without writing anything.
	pub fn render(&self) -> StitchResult<String> {
		let content = read_source(&self.source)?;
		let output = self.chain.apply_from(&content, &self.source)?;
		Ok(normalize_line_endings(&output))
	}

	/// Build the artifact and write it to its target, returning the target
	/// path. The output is complete in memory before anything is written.
	#[tracing::instrument(skip_all, fields(artifact = %self.name))]
	pub fn assemble(&self) -> StitchResult<PathBuf> {
		let output = self.render()?;
		write_atomic(&self.target, output.as_bytes())?;

		tracing::info!(
			target_path = %self.target.display(),
			bytes = output.len(),
			"wrote artifact"
		);

		Ok(self.target.clone())
	}
}
