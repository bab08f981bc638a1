use parking_lot::Mutex;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Line-oriented consumer of the build transcript.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "build", "{}", line);
    }
}

#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("lost contact with `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs external tools one at a time, streaming output to the sink line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Runs one tool and returns its exit code; a nonzero exit is not an
    /// error at this level.
    pub async fn run(
        &self,
        program: &str,
        args: &[String],
        sink: &dyn LogSink,
    ) -> Result<i32, ProcessError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained concurrently with the wait; draining them one
        // after the other can deadlock once a pipe buffer fills up.
        let run = async {
            let (out, err, status) = tokio::join!(
                async {
                    if let Some(stream) = stdout {
                        forward_lines(stream, sink).await
                    } else {
                        Ok(())
                    }
                },
                async {
                    if let Some(stream) = stderr {
                        forward_lines(stream, sink).await
                    } else {
                        Ok(())
                    }
                },
                child.wait(),
            );
            out?;
            err?;
            status
        };

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(finished) => finished,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(ProcessError::Timeout {
                        program: program.to_string(),
                        timeout: limit,
                    });
                }
            },
            None => run.await,
        };

        let status = waited.map_err(|source| ProcessError::Io {
            program: program.to_string(),
            source,
        })?;

        Ok(status.code().unwrap_or(-1))
    }
}

async fn forward_lines<R>(stream: R, sink: &dyn LogSink) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        sink.write_line(&line);
    }
    Ok(())
}
