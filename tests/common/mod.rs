#![allow(dead_code)]

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use uuid::Uuid;

pub struct TestRepo {
    pub path: PathBuf,
}

impl TestRepo {
    pub fn new(name: &str) -> Result<Self> {
        let path = temp_dir("logboss_tests", name);
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn write(&self, path: &str, content: &str) -> Result<()> {
        let p = self.path.join(path);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(p, content)?;
        Ok(())
    }

    pub fn read(&self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path.join(path))?)
    }

    pub fn file(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }

    pub fn run(&self, args: &[&str]) -> Result<String> {
        run_cmd(&self.path, args)
    }

    pub fn run_err(&self, args: &[&str]) -> Result<String> {
        let output = build_cmd(&self.path, args).output()?;
        if output.status.success() {
            anyhow::bail!("logboss succeeded but expected failure");
        }
        Ok(String::from_utf8(output.stderr)?)
    }

    pub fn run_raw(&self, args: &[&str]) -> Result<std::process::Output> {
        Ok(build_cmd(&self.path, args).output()?)
    }
}

// Helpers

fn temp_dir(base: &str, name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(base)
        .join(name)
        .join(Uuid::new_v4().to_string())
}

fn build_cmd(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_logboss"));
    cmd.args(args)
        .current_dir(dir)
        .env("LOGBOSS_STATE_DIR", dir.join(".logboss"));
    cmd
}

fn run_cmd(dir: &Path, args: &[&str]) -> Result<String> {
    let output = build_cmd(dir, args).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "logboss failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8(output.stdout)?)
}

pub fn json_value(output: &str) -> Result<Value> {
    Ok(serde_json::from_str(output)?)
}

pub fn json_array(output: &str) -> Result<Vec<Value>> {
    let value = json_value(output)?;
    match value {
        Value::Array(items) => Ok(items),
        other => anyhow::bail!("expected JSON array, got {}", other),
    }
}
