//! External conversion tool runner.
//!
//! The batch runner invokes the document converter as a blocking subprocess
//! with a timeout — the only point where a run can be interrupted. On
//! timeout the child is killed and the document is marked failed; a missing
//! executable and a non-zero exit are likewise per-document failures, never
//! batch failures.

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Default conversion timeout: three hours per document.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3 * 60 * 60);

/// Poll interval while waiting on the converter.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Failure modes of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The converter executable was not found on PATH.
    MissingExecutable(String),
    /// The converter exceeded the configured timeout and was killed.
    Timeout { secs: u64 },
    /// The converter exited with a non-zero status.
    Failed { code: Option<i32> },
    /// Spawning or waiting on the converter failed.
    Io(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::MissingExecutable(program) => {
                write!(f, "converter not found: {program}")
            }
            ConvertError::Timeout { secs } => write!(f, "conversion timed out after {secs}s"),
            ConvertError::Failed { code: Some(code) } => {
                write!(f, "converter exited with status {code}")
            }
            ConvertError::Failed { code: None } => write!(f, "converter killed by signal"),
            ConvertError::Io(msg) => write!(f, "converter I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

/// Configuration for the external document converter.
#[derive(Debug, Clone)]
pub struct Converter {
    /// Executable name or path.
    pub program: String,
    /// Wall-clock limit for one document.
    pub timeout: Duration,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            program: "marker_single".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Converter {
    /// Convert one source document into `output_dir`.
    ///
    /// Blocks until the converter exits or the timeout elapses. The child's
    /// output streams are discarded; only the exit status is inspected.
    pub fn run(&self, input: &Path, output_dir: &Path) -> Result<(), ConvertError> {
        info!(
            program = %self.program,
            input = %input.display(),
            "running converter"
        );

        let mut child = Command::new(&self.program)
            .arg(input)
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("markdown")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConvertError::MissingExecutable(self.program.clone())
                } else {
                    ConvertError::Io(e.to_string())
                }
            })?;

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    return Err(ConvertError::Failed {
                        code: status.code(),
                    });
                }
                Ok(None) => {
                    if started.elapsed() >= self.timeout {
                        warn!(input = %input.display(), "conversion timed out, killing converter");
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ConvertError::Timeout {
                            secs: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(ConvertError::Io(e.to_string()));
                }
            }
        }
    }
}
