use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEMO_RESPONSE: &str = r#"{
    "status": "success",
    "segments": [
        {"start": 0.0, "end": 0.4, "text": "If you are watching"},
        {"start": 0.5, "end": 1.4, "text": "all this,"},
        {"start": 2.0, "end": 3.0, "text": "you can watch this"}
    ],
    "detected_language": "en (0.99)"
}"#;

/// Scratch directory holding fixtures and an isolated config file.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config").join("config.toml")
    }

    /// Writes a fixture file and returns its path.
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn demo_captions(&self) -> Result<PathBuf> {
        self.write_file("captions.json", DEMO_RESPONSE)
    }
}
