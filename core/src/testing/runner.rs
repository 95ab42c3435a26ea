use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
    time::Instant,
};

use super::{error::*, testcase::read_bytes, verdict::*};

/// Program and arguments of the solution under test. Executed directly, without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionCommand {
    program: String,
    args: Vec<String>,
}

impl SolutionCommand {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words = words.into_iter().map(Into::into);
        let program = words.next().ok_or(JudgeError::EmptyCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Split on whitespace. Quoting is not supported.
    pub fn parse(s: &str) -> Result<Self> {
        Self::new(s.split_whitespace())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for SolutionCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeLimits {
    /// Scored limit; exceeding it yields `TimeLimitExceeded`.
    pub time_limit: Duration,
    /// Safety net; exceeding it kills the process and yields `ProcessTimeout`.
    pub hard_timeout: Duration,
}

impl JudgeLimits {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(2);
    pub const DEFAULT_HARD_TIMEOUT: Duration = Duration::from_secs(60);
}

impl Default for JudgeLimits {
    fn default() -> Self {
        Self {
            time_limit: Self::DEFAULT_TIME_LIMIT,
            hard_timeout: Self::DEFAULT_HARD_TIMEOUT,
        }
    }
}

/// Runs one solution command in one working directory. Both are fixed at construction.
#[derive(Debug, Clone)]
pub struct JudgeRunner {
    command: SolutionCommand,
    working_dir: PathBuf,
}

impl JudgeRunner {
    /// `working_dir` defaults to the current dir at the time of this call.
    pub fn new(command: SolutionCommand, working_dir: Option<PathBuf>) -> Result<Self> {
        let working_dir = match working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(JudgeError::CurrentDir)?,
        };
        log::debug!("Command: {}", command);
        log::debug!("Working dir: {}", working_dir.to_string_lossy());
        Ok(Self {
            command,
            working_dir,
        })
    }

    pub fn command(&self) -> &SolutionCommand {
        &self.command
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Judge the solution against one pair of files.
    pub async fn run(
        &self,
        input_file: impl AsRef<Path>,
        expected_file: impl AsRef<Path>,
        limits: &JudgeLimits,
    ) -> Result<JudgeOutcome> {
        let (input, expected) = tokio::try_join!(
            read_bytes(input_file.as_ref()),
            read_bytes(expected_file.as_ref())
        )?;
        self.run_with_data(&input, &expected, limits).await
    }

    pub async fn run_with_data(
        &self,
        input: &[u8],
        expected: &[u8],
        limits: &JudgeLimits,
    ) -> Result<JudgeOutcome> {
        let mut stdout_buf = Vec::new();

        let start_at = Instant::now();
        let mut command = Command::new(&self.command.program);
        command
            .args(&self.command.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        // Own process group, so that descendants can be killed along with the child.
        #[cfg(unix)]
        command.process_group(0);

        let mut proc = command
            .spawn()
            .map_err(|source| JudgeError::Spawn {
                command: self.command.to_string(),
                source,
            })?;

        let mut stdin = proc.stdin.take().ok_or_else(|| pipe_unavailable("stdin"))?;
        let mut stdout = proc.stdout.take().ok_or_else(|| pipe_unavailable("stdout"))?;

        let feed_stdin = async move {
            let res = stdin.write_all(input).await;
            drop(stdin); // EOF for the child
            match res {
                // The child is free to exit without reading all of its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                res => res,
            }
        };
        let read_stdout = stdout.read_to_end(&mut stdout_buf);

        let res = tokio::time::timeout(limits.hard_timeout, async {
            tokio::try_join!(feed_stdin, read_stdout, proc.wait())
        })
        .await;
        let elapsed = start_at.elapsed();

        let exit_status = match res {
            Err(_) => {
                kill_process_group(&proc);
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill hung process: {:#}", e));
                return Err(JudgeError::ProcessTimeout {
                    command: self.command.to_string(),
                    timeout: limits.hard_timeout,
                });
            }
            Ok(Err(e)) => {
                kill_process_group(&proc);
                let _ = proc.kill().await;
                return Err(JudgeError::Communicate(e));
            }
            Ok(Ok((_, _, exit_status))) => exit_status,
        };
        log::debug!("Finished in {:.3}s ({})", elapsed.as_secs_f64(), exit_status);

        let verdict = Verdict::classify(
            exit_status.success(),
            elapsed,
            limits.time_limit,
            stdout_buf == expected,
        );

        Ok(JudgeOutcome {
            verdict,
            elapsed,
            exit_status: exit_status.code(),
            output: String::from_utf8_lossy(&stdout_buf).into_owned(),
        })
    }
}

/// SIGKILL every process in the child's group. The child itself is still
/// reaped by the caller.
#[cfg(unix)]
fn kill_process_group(proc: &Child) {
    use nix::{
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };

    let Some(pid) = proc.id() else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        log::debug!("Failed to kill process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_proc: &Child) {}

fn pipe_unavailable(name: &str) -> JudgeError {
    JudgeError::Communicate(io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("Failed to open {} of subprocess", name),
    ))
}
