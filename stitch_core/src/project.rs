use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::Artifact;
use crate::StitchError;
use crate::StitchResult;
use crate::config::ArtifactConfig;
use crate::config::StepConfig;
use crate::config::StitchConfig;
use crate::context::BuildContext;
use crate::files::clear_directory;
use crate::files::normalize_path;
use crate::include::SearchPath;
use crate::lint::LintDiagnostic;
use crate::lint::lint_paths;
use crate::placeholder::Placeholder;
use crate::transform::Transformation;
use crate::transform::TransformationChain;
use crate::tree::FileKind;
use crate::tree::TreeArtifact;

/// A declared output with every path resolved and every template rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedArtifact {
	File(Artifact),
	Directory(TreeArtifact),
}

impl PlannedArtifact {
	pub fn name(&self) -> &str {
		match self {
			Self::File(artifact) => &artifact.name,
			Self::Directory(tree) => &tree.name,
		}
	}

	pub fn target(&self) -> &Path {
		match self {
			Self::File(artifact) => &artifact.target,
			Self::Directory(tree) => &tree.target,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::File(_) => "file",
			Self::Directory(_) => "directory",
		}
	}
}

/// Everything needed to run a build, derived from a config and a
/// [`BuildContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
	pub context: BuildContext,
	pub target_dir: PathBuf,
	pub clean: bool,
	pub artifacts: Vec<PlannedArtifact>,
}

impl BuildPlan {
	/// Resolve `config` against the project `root`.
	pub fn from_config(
		root: &Path,
		config: &StitchConfig,
		context: &BuildContext,
	) -> StitchResult<Self> {
		let source_dir = root.join(&config.source);
		let target_dir = root.join(&config.target);
		check_target_dir(root, &source_dir, &target_dir)?;
		let mut artifacts: Vec<PlannedArtifact> = Vec::with_capacity(config.artifacts.len());

		for artifact in &config.artifacts {
			if artifacts.iter().any(|planned| planned.name() == artifact.name()) {
				return Err(StitchError::DuplicateArtifact(artifact.name().to_string()));
			}

			let chain = build_chain(artifact.steps(), &source_dir, context)?;
			let target = target_dir.join(context.render(artifact.target())?);

			let planned = match artifact {
				ArtifactConfig::File { name, source, .. } => {
					let source = source_dir.join(source);
					if matches!(FileKind::of(&source), Ok(FileKind::Binary)) {
						return Err(StitchError::BinaryTransform(source.display().to_string()));
					}
					PlannedArtifact::File(Artifact::new(name.clone(), source, chain, target))
				}
				ArtifactConfig::Directory {
					name,
					sources,
					archive,
					..
				} => {
					let archive = archive
						.as_deref()
						.map(|archive| context.render(archive).map(|path| target_dir.join(path)))
						.transpose()?;
					PlannedArtifact::Directory(TreeArtifact {
						name: name.clone(),
						sources: sources.iter().map(|path| source_dir.join(path)).collect(),
						chain,
						target,
						archive,
					})
				}
			};

			artifacts.push(planned);
		}

		Ok(Self {
			context: context.clone(),
			target_dir,
			clean: config.clean,
			artifacts,
		})
	}

	/// Load the config at `root`, resolve its version and plan a build for
	/// `build_date`.
	pub fn load(root: &Path, build_date: NaiveDate) -> StitchResult<(StitchConfig, Self)> {
		let config = StitchConfig::load_required(root)?;
		let version = config.version.resolve(root)?;
		let context = BuildContext::new(version, build_date);
		let plan = Self::from_config(root, &config, &context)?;

		Ok((config, plan))
	}
}

/// Refuse a target directory that would swallow the project root or the
/// source tree, since a clean build empties the target.
fn check_target_dir(root: &Path, source_dir: &Path, target_dir: &Path) -> StitchResult<()> {
	let absolute = |path: &Path| {
		let path = if path.is_absolute() {
			path.to_path_buf()
		} else {
			std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
		};
		normalize_path(&path)
	};

	let root = absolute(root);
	let source = absolute(source_dir);
	let target = absolute(target_dir);
	let target_display = target_dir.display().to_string();

	if root.starts_with(&target) {
		return Err(StitchError::UnsafeTarget {
			target: target_display,
			overlaps: "the project root".to_string(),
		});
	}

	if source.starts_with(&target) || target.starts_with(&source) {
		return Err(StitchError::UnsafeTarget {
			target: target_display,
			overlaps: source_dir.display().to_string(),
		});
	}

	Ok(())
}

/// Translate configured steps into a chain. Step paths are relative to
/// `source_dir` and step values are rendered against `context`.
pub fn build_chain(
	steps: &[StepConfig],
	source_dir: &Path,
	context: &BuildContext,
) -> StitchResult<TransformationChain> {
	let mut chain = TransformationChain::default();

	for step in steps {
		let stage = match step {
			StepConfig::Prepend { file, text } => {
				let stage = match file {
					Some(file) => Transformation::prepend_file(&source_dir.join(file))?,
					None => Transformation::Prepend(String::new()),
				};
				stage.with_prefix(&context.render(text.as_deref().unwrap_or_default())?)
			}
			StepConfig::Append { file, text } => {
				let stage = match file {
					Some(file) => Transformation::append_file(&source_dir.join(file))?,
					None => Transformation::Append(String::new()),
				};
				stage.with_prefix(&context.render(text.as_deref().unwrap_or_default())?)
			}
			StepConfig::Include { roots } => {
				Transformation::ResolveIncludes(roots.iter().map(|root| source_dir.join(root)).collect())
			}
			StepConfig::Substitute {
				name,
				value,
				syntax,
			} => {
				let value = context.render(value)?;
				Transformation::Substitute(Placeholder::with_syntax(name, value, *syntax)?)
			}
			StepConfig::StripHeader => Transformation::StripHeader,
		};
		chain.push(stage);
	}

	Ok(chain)
}

/// What one artifact wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
	pub name: String,
	pub files: Vec<PathBuf>,
	pub archive: Option<PathBuf>,
}

/// What a build wrote, in build order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
	pub artifacts: Vec<ArtifactReport>,
}

impl BuildReport {
	/// Every file written, archives included.
	pub fn written(&self) -> impl Iterator<Item = &Path> {
		self.artifacts.iter().flat_map(|report| {
			report
				.files
				.iter()
				.chain(report.archive.iter())
				.map(PathBuf::as_path)
		})
	}
}

/// Run every artifact in `plan` in declaration order. Later artifacts may
/// overwrite files written by earlier ones.
pub fn build_project(plan: &BuildPlan) -> StitchResult<BuildReport> {
	if plan.clean {
		tracing::debug!(target_dir = %plan.target_dir.display(), "cleaning target directory");
		clear_directory(&plan.target_dir)?;
	}

	let mut report = BuildReport::default();

	for artifact in &plan.artifacts {
		let artifact_report = match artifact {
			PlannedArtifact::File(file) => {
				ArtifactReport {
					name: file.name.clone(),
					files: vec![file.assemble()?],
					archive: None,
				}
			}
			PlannedArtifact::Directory(tree) => {
				let output = tree.assemble()?;
				ArtifactReport {
					name: tree.name.clone(),
					files: output.files,
					archive: output.archive,
				}
			}
		};
		report.artifacts.push(artifact_report);
	}

	tracing::info!(
		version = %plan.context.version,
		artifacts = report.artifacts.len(),
		"build finished"
	);

	Ok(report)
}

/// Run the configured static checks. Returns no findings when linting is
/// disabled.
pub fn lint_project(root: &Path, config: &StitchConfig) -> StitchResult<Vec<LintDiagnostic>> {
	if !config.lint.enabled {
		return Ok(Vec::new());
	}

	lint_paths(root, &config.lint.paths, &config.lint.exclude)
}
