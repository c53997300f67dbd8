use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub fn run_podstamp(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let config = env.config_path();
    let output = Command::new(env!("CARGO_BIN_EXE_podstamp"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .arg("--no-color")
        .env("XDG_CONFIG_HOME", env.path())
        .current_dir(env.path())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Run without the extra flags, exactly as given.
pub fn run_podstamp_raw(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_podstamp"))
        .args(args)
        .env("XDG_CONFIG_HOME", env.path())
        .current_dir(env.path())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are valid UTF-8")
}
