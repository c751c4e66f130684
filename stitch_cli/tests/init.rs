mod common;

use stitch_core::AnyEmptyResult;
use stitch_core::StitchConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("stitch build"));

	let config_path = tmp.path().join("stitch.toml");
	assert!(config_path.exists());

	let content = std::fs::read_to_string(&config_path)?;
	assert!(content.contains("[lint]"));
	assert!(content.contains("# [[artifacts]]"));

	Ok(())
}

#[test]
fn init_creates_loadable_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let config = StitchConfig::load_required(tmp.path())?;
	assert!(config.clean);
	assert!(config.artifacts.is_empty());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join(".stitch.toml");
	std::fs::write(&config_path, "existing config")?;

	common::stitch_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");
	assert!(!tmp.path().join("stitch.toml").exists());

	Ok(())
}
