use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StitchError {
	#[error(transparent)]
	#[diagnostic(code(stitch::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(stitch::file_read))]
	FileRead { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(code(stitch::file_write))]
	FileWrite { path: String, reason: String },

	#[error("include file `{name}` not found in {roots}")]
	#[diagnostic(
		code(stitch::include_not_found),
		help("add `{name}` to one of the search roots or fix the `#INCLUDE` directive")
	)]
	IncludeNotFound { name: String, roots: String },

	#[error("include cycle detected: {chain}")]
	#[diagnostic(
		code(stitch::include_cycle),
		help("a file cannot include itself, directly or through other includes")
	)]
	IncludeCycle { chain: String },

	#[error("invalid include path `{0}`")]
	#[diagnostic(
		code(stitch::invalid_include_path),
		help("include names must be relative to a search root and must not contain `..`")
	)]
	InvalidIncludePath(String),

	#[error("invalid placeholder name `{0}`")]
	#[diagnostic(
		code(stitch::invalid_placeholder),
		help("placeholder names must be non-empty and contain no whitespace or `#`")
	)]
	InvalidPlaceholder(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stitch::config_parse),
		help("check that stitch.toml is valid TOML with an `[[artifacts]]` list")
	)]
	ConfigParse(String),

	#[error("no config file found in `{0}`")]
	#[diagnostic(
		code(stitch::missing_config),
		help("run `stitch init` to create a stitch.toml")
	)]
	MissingConfig(String),

	#[error("duplicate artifact name `{0}`")]
	#[diagnostic(
		code(stitch::duplicate_artifact),
		help("each `[[artifacts]]` entry must have a unique name")
	)]
	DuplicateArtifact(String),

	#[error("failed to determine the build version: {0}")]
	#[diagnostic(code(stitch::version))]
	Version(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(stitch::template_render))]
	TemplateRender(String),

	#[error("unrecognized file type: `{0}`")]
	#[diagnostic(
		code(stitch::unrecognized_file_type),
		help("supported text types: js, json, html, txt, css; binary types: png, gif, jpg, ico")
	)]
	UnrecognizedFileType(String),

	#[error("cannot apply text transformations to binary file `{0}`")]
	#[diagnostic(code(stitch::binary_transform))]
	BinaryTransform(String),

	#[error("target directory `{target}` overlaps `{overlaps}`")]
	#[diagnostic(
		code(stitch::unsafe_target),
		help("point `target` at a directory outside the project root and the source tree, e.g. `target = \"target\"`")
	)]
	UnsafeTarget { target: String, overlaps: String },

	#[error("`{0}` step needs a `file` or a `text` value")]
	#[diagnostic(code(stitch::empty_step))]
	EmptyStep(String),

	#[error("failed to create archive `{path}`: {reason}")]
	#[diagnostic(code(stitch::archive))]
	Archive { path: String, reason: String },
}

impl StitchError {
	pub(crate) fn read(path: &std::path::Path, error: &std::io::Error) -> Self {
		Self::FileRead {
			path: path.display().to_string(),
			reason: error.to_string(),
		}
	}

	pub(crate) fn write(path: &std::path::Path, error: &std::io::Error) -> Self {
		Self::FileWrite {
			path: path.display().to_string(),
			reason: error.to_string(),
		}
	}
}

pub type StitchResult<T> = Result<T, StitchError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
