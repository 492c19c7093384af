//! A stand-in for the juju CLI
//!
//! The fake is a small shell script that answers `juju status` from files in
//! its own directory, so tests can move a "model" through states without a
//! controller. Status documents queued with [`FakeJuju::push_status`] are
//! served once each, in order; after that the last one keeps being served.

use std::path::{Path, PathBuf};

const SCRIPT: &str = r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
echo "$*" >> "$dir/calls.log"
case "$1" in
  status)
    if [ -f "$dir/unreachable" ]; then
      echo "ERROR cannot connect to controller" >&2
      exit 1
    fi
    next="$(ls "$dir/queue" 2>/dev/null | head -n 1)"
    if [ -n "$next" ]; then
      mv "$dir/queue/$next" "$dir/status.json"
    fi
    if [ ! -f "$dir/status.json" ]; then
      echo "ERROR no status configured" >&2
      exit 1
    fi
    cat "$dir/status.json"
    ;;
  print-juju-data)
    echo "$JUJU_DATA"
    ;;
  *)
    echo "ERROR unrecognized command: $1" >&2
    exit 2
    ;;
esac
"#;

pub struct FakeJuju {
    dir: PathBuf,
    queued: usize,
}

impl FakeJuju {
    /// Write the fake binary into `dir`, creating the directory if needed
    pub fn install<P: AsRef<Path>>(dir: P) -> crate::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(dir.join("queue"))?;

        let script = dir.join("juju");
        std::fs::write(&script, SCRIPT)?;
        make_executable(&script)?;

        Ok(Self { dir, queued: 0 })
    }

    /// Path of the fake `juju` executable
    pub fn path(&self) -> PathBuf {
        self.dir.join("juju")
    }

    /// Serve `status` from now on, dropping anything still queued
    pub fn set_status(&self, status: &serde_json::Value) -> crate::Result<()> {
        for entry in std::fs::read_dir(self.dir.join("queue"))? {
            std::fs::remove_file(entry?.path())?;
        }
        self.write_atomic(&self.dir.join("status.json"), &status.to_string())
    }

    /// Serve `status` once, after everything queued before it
    pub fn push_status(&mut self, status: &serde_json::Value) -> crate::Result<()> {
        self.queued += 1;
        let path = self.dir.join("queue").join(format!("{:06}.json", self.queued));
        self.write_atomic(&path, &status.to_string())
    }

    /// Serve raw text as the status document, e.g. to simulate garbage output
    pub fn set_raw_status(&self, text: &str) -> crate::Result<()> {
        self.write_atomic(&self.dir.join("status.json"), text)
    }

    pub fn set_reachable(&self, reachable: bool) -> crate::Result<()> {
        let marker = self.dir.join("unreachable");
        if reachable {
            if marker.exists() {
                std::fs::remove_file(marker)?;
            }
        } else {
            std::fs::write(marker, "")?;
        }
        Ok(())
    }

    /// Arguments of every invocation so far, one line per call
    pub fn calls(&self) -> crate::Result<Vec<String>> {
        let log = self.dir.join("calls.log");
        if !log.exists() {
            return Ok(Vec::new());
        }
        Ok(std::fs::read_to_string(log)?
            .lines()
            .map(str::to_string)
            .collect())
    }

    // the script may be reading while a test writes
    fn write_atomic(&self, path: &Path, content: &str) -> crate::Result<()> {
        let tmp = self.dir.join(".status.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "the fake juju binary is a shell script and needs a unix host",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(fake: &FakeJuju, args: &[&str]) -> std::process::Output {
        std::process::Command::new(fake.path())
            .args(args)
            .output()
            .expect("fake juju should run")
    }

    #[test]
    fn serves_queue_then_last_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut fake = FakeJuju::install(dir.path()).unwrap();
        fake.push_status(&json!({"n": 1})).unwrap();
        fake.push_status(&json!({"n": 2})).unwrap();

        let outputs: Vec<String> = (0..3)
            .map(|_| String::from_utf8_lossy(&run(&fake, &["status"]).stdout).to_string())
            .collect();

        assert_eq!(outputs, vec![r#"{"n":1}"#, r#"{"n":2}"#, r#"{"n":2}"#]);
        assert_eq!(fake.calls().unwrap(), vec!["status"; 3]);
    }

    #[test]
    fn unreachable_controller_fails_status() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeJuju::install(dir.path()).unwrap();
        fake.set_status(&json!({})).unwrap();
        fake.set_reachable(false).unwrap();

        let output = run(&fake, &["status", "--format", "json"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("cannot connect"));

        fake.set_reachable(true).unwrap();
        assert!(run(&fake, &["status"]).status.success());
    }

    #[test]
    fn status_without_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeJuju::install(dir.path()).unwrap();

        assert!(!run(&fake, &["status"]).status.success());
    }
}
