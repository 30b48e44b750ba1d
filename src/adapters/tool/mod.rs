//! External tool lookup and capture-style process runs

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

use crate::adapters::env_locale::Utf8Environment;
use crate::error::{SplicerError, SplicerResult};

/// Keeps tool runs from opening console windows on Windows
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Lines of stderr kept in error messages
const STDERR_TAIL_LINES: usize = 40;

/// Resolves a tool name or path on the search path once, on first use
#[derive(Debug)]
pub struct ToolLocator {
    name: String,
    resolved: OnceLock<PathBuf>,
}

impl ToolLocator {
    /// `name` is either a bare program name or a path to the executable
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the executable
    pub fn resolve(&self) -> SplicerResult<PathBuf> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.clone());
        }
        let path = which::which(&self.name).map_err(|e| {
            tracing::debug!(tool = %self.name, error = %e, "Tool lookup failed");
            SplicerError::ToolNotFound {
                tool: self.name.clone(),
            }
        })?;
        tracing::debug!(tool = %self.name, path = %path.display(), "Resolved tool");
        Ok(self.resolved.get_or_init(|| path).clone())
    }
}

/// Command for `program` with the UTF-8 overrides applied and no console window
pub fn tool_command(program: impl AsRef<OsStr>, env: &Utf8Environment) -> Command {
    let mut command = Command::new(program);
    env.apply(&mut command);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);
    command
}

/// Run to completion capturing stdout and stderr
pub fn run_captured<I, S>(
    locator: &ToolLocator,
    args: I,
    env: &Utf8Environment,
) -> SplicerResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = locator.resolve()?;
    tool_command(&program, env)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SplicerError::ToolNotFound {
                    tool: locator.name().to_string(),
                }
            } else {
                SplicerError::IoError(e)
            }
        })
}

/// Last lines of a tool's stderr, for error messages
pub fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
