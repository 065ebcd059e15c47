use std::{ffi::CString, io, iter, ptr};

use libc::{EINTR, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WTERMSIG, c_char, c_int, execvp, fork,
           pid_t, waitpid};

use crate::parse::Command;
use crate::sig;

/// Exit status a child reports when the exec itself fails (program not found
/// or not executable).
pub const EXEC_FAILURE: i32 = 127;

#[derive(Debug, PartialEq)]
pub enum LaunchResult {
    /// Foreground child terminated with this decoded exit status.
    Completed(i32),
    /// Background child was started and left to the reaper.
    Started(pid_t),
}

/// Forks a child and replaces its image via `execvp` (PATH search).
///
/// Foreground commands block until the child exits. Background commands print
/// a start notice and return immediately; the SIGCHLD reaper cleans them up.
/// A fork failure surfaces as `Err` and the command is discarded.
pub fn launch(cmd: &Command) -> io::Result<LaunchResult> {
    let program = CString::new(cmd.name())?;
    let args: Vec<CString> = cmd
        .args
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<Result<_, _>>()?;

    // argv for execvp: pointers into the CStrings plus the null sentinel.
    let argv: Vec<*const c_char> = args
        .iter()
        .map(|a| a.as_ptr())
        .chain(iter::once(ptr::null()))
        .collect();

    let chld_set = sig::block_sigchld()?;

    match unsafe { fork() } {
        -1 => {
            let err = io::Error::last_os_error();
            let _ = sig::unblock_sigchld(&chld_set);
            Err(err)
        }
        0 => {
            sig::reset_child_signals(&chld_set);
            unsafe { execvp(program.as_ptr(), argv.as_ptr()) };
            // Only reached when exec failed; report and die without returning
            // into the parent's code paths.
            eprintln!("bcsh: {}: {}", cmd.name(), io::Error::last_os_error());
            unsafe { libc::_exit(EXEC_FAILURE) }
        }
        pid => {
            if cmd.background {
                sig::unblock_sigchld(&chld_set)?;
                println!("[{pid}] {} started in background", cmd.name());
                Ok(LaunchResult::Started(pid))
            } else {
                let status = wait_foreground(pid);
                sig::unblock_sigchld(&chld_set)?;
                status.map(LaunchResult::Completed)
            }
        }
    }
}

fn wait_foreground(pid: pid_t) -> io::Result<i32> {
    let mut status: c_int = 0;
    loop {
        match unsafe { waitpid(pid, &mut status, 0) } {
            -1 if io::Error::last_os_error().raw_os_error() == Some(EINTR) => continue,
            -1 => return Err(io::Error::last_os_error()),
            _ => break,
        }
    }

    if WIFEXITED(status) {
        Ok(WEXITSTATUS(status))
    } else if WIFSIGNALED(status) {
        Ok(128 + WTERMSIG(status))
    } else {
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::null_mut;
    use std::time::{Duration, Instant};

    fn command(args: &[&str], background: bool) -> Command {
        Command {
            args: args.iter().map(|s| s.to_string()).collect(),
            background,
        }
    }

    #[test]
    fn foreground_reports_zero_exit_status() {
        let result = launch(&command(&["true"], false)).unwrap();
        assert_eq!(result, LaunchResult::Completed(0));
    }

    #[test]
    fn foreground_reports_nonzero_exit_status() {
        let result = launch(&command(&["sh", "-c", "exit 7"], false)).unwrap();
        assert_eq!(result, LaunchResult::Completed(7));
    }

    #[test]
    fn missing_program_completes_with_exec_failure_status() {
        let result = launch(&command(&["bcsh-no-such-program"], false)).unwrap();
        assert_eq!(result, LaunchResult::Completed(EXEC_FAILURE));
    }

    #[test]
    fn foreground_blocks_until_child_exits() {
        let start = Instant::now();
        let result = launch(&command(&["sh", "-c", "sleep 0.3"], false)).unwrap();
        assert_eq!(result, LaunchResult::Completed(0));
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn background_returns_without_waiting() {
        let start = Instant::now();
        let result = launch(&command(&["sleep", "5"], true)).unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));

        match result {
            LaunchResult::Started(pid) => {
                assert!(pid > 0);
                // No reaper runs in the test binary; clean up by hand.
                unsafe {
                    libc::kill(pid, libc::SIGKILL);
                    waitpid(pid, null_mut(), 0);
                }
            }
            other => panic!("expected Started, got {other:?}"),
        }
    }
}
