use log::{debug, warn};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("無法執行 {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("無法檢查 {program} 程序狀態: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} 執行失敗 ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} 超過 {}s 未完成，已終止", after.as_secs())]
    TimedOut { program: String, after: Duration },

    #[error("{program} 收到中斷信號，已終止")]
    Cancelled { program: String },
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            // 內容可能不是 UTF-8，讀取失敗時保留已讀到的部分
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            buffer = String::from_utf8_lossy(&bytes).into_owned();
        }
        buffer
    })
}

fn terminate(child: &mut Child, program: &str) {
    warn!("終止程序 {program} [{}]", child.id());
    let _ = child.kill();
    let _ = child.wait();
}

/// 執行外部程序並等待結束，回傳 stdout
///
/// 每 50ms 檢查一次程序狀態；收到中斷信號或超過逾時時間時會 kill 子程序。
/// stdout/stderr 由背景執行緒讀取，避免管線緩衝區塞滿造成死結。
pub fn run_cancellable(
    mut command: Command,
    shutdown_signal: &AtomicBool,
    timeout: Option<Duration>,
) -> Result<String, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();

    if shutdown_signal.load(Ordering::SeqCst) {
        return Err(ProcessError::Cancelled { program });
    }

    debug!("執行 {program} {:?}", command.get_args().collect::<Vec<_>>());

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());
    let started = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(source) => {
                terminate(&mut child, &program);
                return Err(ProcessError::Wait { program, source });
            }
        }

        if shutdown_signal.load(Ordering::SeqCst) {
            terminate(&mut child, &program);
            return Err(ProcessError::Cancelled { program });
        }

        if let Some(limit) = timeout
            && started.elapsed() >= limit
        {
            terminate(&mut child, &program);
            return Err(ProcessError::TimedOut {
                program,
                after: limit,
            });
        }

        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    if !status.success() {
        return Err(ProcessError::Failed {
            program,
            status,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo frames"]);
        let out = run_cancellable(cmd, &AtomicBool::new(false), None).unwrap();
        assert_eq!(out.trim(), "frames");
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo broken >&2; exit 3"]);
        let err = run_cancellable(cmd, &AtomicBool::new(false), None).unwrap_err();
        match err {
            ProcessError::Failed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cancelled_before_spawn() {
        let cmd = Command::new("sh");
        let err = run_cancellable(cmd, &AtomicBool::new(true), None).unwrap_err();
        assert!(matches!(err, ProcessError::Cancelled { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 5"]);
        let started = Instant::now();
        let err =
            run_cancellable(cmd, &AtomicBool::new(false), Some(Duration::from_millis(200)))
                .unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program() {
        let cmd = Command::new("definitely-not-an-installed-program");
        let err = run_cancellable(cmd, &AtomicBool::new(false), None).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
