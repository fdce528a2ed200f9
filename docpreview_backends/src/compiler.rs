use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use docpreview_api::DocsSnapshot;
use docpreview_backend_api::{BackendError, BackendResult, DocsCompiler};
use wait_timeout::ChildExt;

const DEFAULT_BINARY: &str = "elm";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const BINARY_ENV: &str = "DOCPREVIEW_COMPILER_BIN";
const TIMEOUT_ENV: &str = "DOCPREVIEW_COMPILER_TIMEOUT_SECS";
const DOCS_OUTPUT: &str = "elm-stuff/docpreview/docs.json";

/// Drives the external compiler binary as a child process.
#[derive(Debug, Clone)]
pub struct CompilerCli {
    binary: OsString,
    timeout: Duration,
}

impl CompilerCli {
    /// Construct a runner configured from `DOCPREVIEW_COMPILER_BIN` and
    /// `DOCPREVIEW_COMPILER_TIMEOUT_SECS`, defaulting to `elm` and 60 seconds.
    #[must_use]
    pub fn new() -> Self {
        let binary = env::var_os(BINARY_ENV).unwrap_or_else(|| OsString::from(DEFAULT_BINARY));
        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    tracing::warn!(var = TIMEOUT_ENV, value = %raw, "ignoring invalid timeout");
                    None
                }
            })
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            binary,
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Use a specific compiler binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<OsString>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Kill the compiler when it runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Binary that will be spawned.
    #[must_use]
    pub fn binary(&self) -> &OsStr {
        &self.binary
    }

    /// Path the docs build writes to, relative to the project directory.
    #[must_use]
    pub fn docs_output(project_dir: &Path) -> PathBuf {
        project_dir.join(DOCS_OUTPUT)
    }

    fn program(&self) -> String {
        self.binary.to_string_lossy().into_owned()
    }

    fn run<I, S>(&self, args: I, cwd: &Path) -> BackendResult<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.program();
        let mut command = Command::new(&self.binary);
        command.args(args);
        command.current_dir(cwd);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        tracing::debug!(%program, cwd = %cwd.display(), "spawning compiler");

        let mut child = command
            .spawn()
            .map_err(|err| BackendError::message(format!("failed to spawn {program}: {err}")))?;

        let stdout_handle = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stdout.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stderr.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        match child.wait_timeout(self.timeout) {
            Ok(Some(_)) => (),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::Timeout {
                    program,
                    seconds: self.timeout.as_secs(),
                });
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BackendError::message(format!(
                    "failed waiting on {program}: {err}"
                )));
            }
        }

        let status = child
            .wait()
            .map_err(|err| BackendError::message(format!("failed to reap {program}: {err}")))?;

        let stdout = join_reader(stdout_handle, &program, "stdout")?;
        let stderr = join_reader(stderr_handle, &program, "stderr")?;

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "terminated".to_string(), |c| c.to_string());
            return Err(BackendError::ExitStatus {
                program,
                status: code,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}

impl Default for CompilerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DocsCompiler for CompilerCli {
    fn build_docs(&self, project_dir: &Path) -> BackendResult<DocsSnapshot> {
        let output = Self::docs_output(project_dir);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                BackendError::message(format!("failed to create {}: {err}", parent.display()))
            })?;
        }
        match fs::remove_file(&output) {
            Ok(()) => (),
            Err(err) if err.kind() == io::ErrorKind::NotFound => (),
            Err(err) => {
                return Err(BackendError::message(format!(
                    "failed to clear stale {}: {err}",
                    output.display()
                )))
            }
        }

        let mut docs_arg = OsString::from("--docs=");
        docs_arg.push(&output);
        let result = self.run([OsString::from("make"), docs_arg], project_dir)?;
        if !result.stderr.trim().is_empty() {
            tracing::debug!(stderr = %result.stderr.trim(), "compiler reported on stderr");
        }

        let raw = fs::read_to_string(&output).map_err(|err| {
            BackendError::message(format!("failed to read {}: {err}", output.display()))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            BackendError::message(format!("malformed docs in {}: {err}", output.display()))
        })
    }

    fn diff(&self, project_dir: &Path) -> BackendResult<String> {
        self.run(["diff"], project_dir).map(|output| output.stdout)
    }
}

fn join_reader(
    handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>,
    program: &str,
    stream: &str,
) -> BackendResult<String> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| {
                    BackendError::message(format!("failed to join {program} {stream} reader"))
                })?
                .map_err(|err| {
                    BackendError::message(format!("failed to read {program} {stream}: {err}"))
                })?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
        None => Ok(String::new()),
    }
}

#[derive(Debug)]
struct ProcessOutput {
    stdout: String,
    stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_output_lives_under_elm_stuff() {
        let path = CompilerCli::docs_output(Path::new("/work/pkg"));
        assert_eq!(path, Path::new("/work/pkg/elm-stuff/docpreview/docs.json"));
    }

    #[test]
    fn builder_overrides_binary_and_timeout() {
        let cli = CompilerCli::new()
            .with_binary("/opt/bin/compiler")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(cli.binary(), OsStr::new("/opt/bin/compiler"));
        assert_eq!(cli.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_binary_is_a_spawn_failure() {
        let cli = CompilerCli::new().with_binary("/definitely/not/a/compiler");
        let err = cli.diff(Path::new(".")).expect_err("spawn should fail");
        assert!(err.to_string().contains("failed to spawn"), "{err}");
    }
}
