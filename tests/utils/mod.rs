use anyhow::Result;
use std::io::Write;
use std::process::{Command, Stdio};

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

#[allow(dead_code)]
impl CommandOutput {
    /// Parses every stdout line as a JSON event (for `--output json` runs).
    pub fn json_events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("stdout line is a JSON event"))
            .collect()
    }

    pub fn events_with_code(&self, code: &str) -> Vec<serde_json::Value> {
        self.json_events()
            .into_iter()
            .filter(|event| event["code"] == code)
            .collect()
    }
}

/// Runs the `captl` binary against the environment's config file, optionally
/// feeding `stdin`.
pub fn run_captl(env: &TestEnvironment, args: &[&str], stdin: Option<&str>) -> Result<CommandOutput> {
    let config_path = env.config_path();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_captl"));
    cmd.arg("--config")
        .arg(&config_path)
        .args(args)
        .current_dir(env.path())
        .env("XDG_CONFIG_HOME", env.path())
        .env("NO_COLOR", "1")
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    if let Some(input) = stdin
        && let Some(mut pipe) = child.stdin.take()
    {
        pipe.write_all(input.as_bytes())?;
    }
    let output = child.wait_with_output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}
