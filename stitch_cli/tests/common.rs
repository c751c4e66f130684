#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;

pub fn stitch_cmd() -> Command {
	let mut cmd = Command::cargo_bin("stitch").unwrap_or_else(|e| panic!("cargo bin: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {relative}: {e}"));
}

pub const SAMPLE_CONFIG: &str = r#"version = "2.0.0"

[[artifacts]]
kind = "file"
name = "userscript"
source = "main.js"
target = "main.user.js"
steps = [
  { kind = "include", roots = ["includes"] },
  { kind = "substitute", name = "buildDate", value = "'{{ build_date }}'" },
]

[[artifacts]]
kind = "directory"
name = "extension"
sources = ["extension"]
target = "extension"
archive = "extension_{{ version_underscored }}.zip"
"#;

/// A project with one file artifact and one zipped directory artifact and
/// no lint findings.
pub fn sample_project(root: &Path) {
	write_file(root, "stitch.toml", SAMPLE_CONFIG);
	write_file(
		root,
		"src/main.js",
		"/**\n * Entry point.\n */\nfunction main() {}\n#INCLUDE util.js\nvar built = #INCLUDE buildDate#;\n",
	);
	write_file(
		root,
		"src/includes/util.js",
		"/**\n * Util.\n */\nfunction util() {}\n",
	);
	write_file(root, "src/extension/manifest.json", "{\n  \"name\": \"demo\"\n}\n");
}
