use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::BuildContext;

pub const LICENSE_HEADER: &str = "/*\n * Copyright (c) 2024 Example Authors\n *\n * Permission is hereby granted.\n */\n\n";

pub fn tempdir() -> TempDir {
	tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {relative}: {e}"));
	path
}

pub fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub fn read_bytes(path: &Path) -> Vec<u8> {
	std::fs::read(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub fn new_year_2024() -> NaiveDate {
	NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_else(|| panic!("invalid date"))
}

pub fn build_context() -> BuildContext {
	BuildContext::new("1.2.3", new_year_2024())
}

/// A 1x1 transparent PNG.
pub const TINY_PNG: &[u8] = &[
	0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
	0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
	0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
	0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
	0x42, 0x60, 0x82,
];

/// A small project resembling a browser extension build: a userscript file
/// artifact and a directory artifact that is zipped.
pub fn sample_project() -> TempDir {
	let tmp = tempdir();
	let root = tmp.path();

	write_file(root, "version.txt", "1.2.3\n");
	write_file(
		root,
		"stitch.toml",
		r#"source = "src"
target = "target"
version = { file = "version.txt" }

[lint]
paths = ["src"]

[[artifacts]]
kind = "file"
name = "userscript"
source = "greasemonkey/main.js"
target = "main_{{ build_date_compact }}.user.js"
steps = [
  { kind = "prepend", file = "greasemonkey/metadata_block.txt" },
  { kind = "include", roots = ["common/includes", "greasemonkey/includes"] },
  { kind = "substitute", name = "buildDate", value = "'{{ build_date }}'" },
  { kind = "append", file = "common/lib.js" },
]

[[artifacts]]
kind = "directory"
name = "extension"
sources = ["extension"]
target = "extension"
archive = "extension_{{ version_underscored }}.zip"
steps = [{ kind = "substitute", name = "VERSION", syntax = "bare", value = "{{ version }}" }]
"#,
	);

	write_file(
		root,
		"src/greasemonkey/metadata_block.txt",
		"// ==UserScript==\n// @version #INCLUDE buildDate#\n// ==/UserScript==",
	);
	write_file(
		root,
		"src/greasemonkey/main.js",
		format!("{LICENSE_HEADER}#INCLUDE util.js\nmain();\n"),
	);
	write_file(
		root,
		"src/common/includes/util.js",
		format!("{LICENSE_HEADER}function util() {{}}\n"),
	);
	write_file(
		root,
		"src/common/lib.js",
		format!("{LICENSE_HEADER}function lib() {{}}\n"),
	);
	write_file(
		root,
		"src/extension/manifest.json",
		"{\n  \"version\": \"#VERSION#\"\n}\n",
	);
	write_file(root, "src/extension/icon.png", TINY_PNG);
	write_file(root, "src/extension/.manifest.json.swp", "junk");

	tmp
}
