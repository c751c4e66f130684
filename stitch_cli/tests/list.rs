mod common;

use stitch_core::AnyEmptyResult;

#[test]
fn list_shows_resolved_targets() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path());

	let output = common::stitch_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	insta::assert_snapshot!(stdout, @r"
	Artifacts:
	  userscript [file] -> target/main.user.js
	  extension [directory] -> target/extension

	2 artifact(s)
	");

	Ok(())
}

#[test]
fn list_without_artifacts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "stitch.toml", "version = \"1.0\"\n");

	common::stitch_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No artifacts declared."));

	Ok(())
}
