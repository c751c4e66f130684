mod common;

use stitch_core::AnyEmptyResult;

#[test]
fn lint_passes_on_clean_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());

	common::stitch_cmd()
		.arg("lint")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No lint findings."));

	Ok(())
}

#[test]
fn lint_exits_with_one_on_findings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());
	common::write_file(
		tmp.path(),
		"src/includes/bad.js",
		"/**\n * Bad.\n * @return {number}\n */\nfunction bad() {\n\treturn 1;\n}\n",
	);

	common::stitch_cmd()
		.arg("lint")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("2 lint finding(s)"))
		.stderr(predicates::str::contains("src/includes/bad.js:3"))
		.stderr(predicates::str::contains("src/includes/bad.js:6"));

	Ok(())
}

#[test]
fn lint_respects_disabled_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "stitch.toml", "[lint]\nenabled = false\n");
	common::write_file(tmp.path(), "src/bad.js", "\tfunction bad() {}\n");

	common::stitch_cmd()
		.arg("lint")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("disabled"));

	Ok(())
}
