use std::{env, io, path::PathBuf};

use crate::parse::Command;

#[derive(Debug, PartialEq)]
pub enum BuiltinResult {
    /// Not a builtin; the caller should launch an external process.
    NotBuiltin,
    /// Ran inside the shell process; any error has already been reported.
    Handled,
    /// `exit` was given; the loop must terminate without launching anything.
    ExitRequested,
}

/// Recognizes and runs commands that only make sense in the shell's own
/// process. `cd` and `exit` never fork.
pub fn dispatch(cmd: &Command) -> BuiltinResult {
    match cmd.name() {
        "exit" => BuiltinResult::ExitRequested,
        "cd" => {
            if let Err(e) = cd(&cmd.args[1..]) {
                eprintln!("bcsh: {e}");
            }
            BuiltinResult::Handled
        }
        _ => BuiltinResult::NotBuiltin,
    }
}

// With no argument the target comes from HOME. The path is handed to the OS
// chdir verbatim, no tilde or relative-path handling of our own.
fn cd(args: &[String]) -> io::Result<()> {
    let target = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home),
            None => return Err(io::Error::other("cd: HOME not set")),
        },
    };

    env::set_current_dir(&target)
        .map_err(|e| io::Error::other(format!("cd: {}: {e}", target.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    // The working directory and HOME are process-wide; serialize the tests
    // that touch them.
    fn lock_process_state() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    fn make_unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = env::temp_dir().join(format!("bcsh_test_cd_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn command(line: &str) -> Command {
        crate::parse::tokenize(line).unwrap()
    }

    #[test]
    fn exit_is_requested_regardless_of_arguments() {
        assert_eq!(dispatch(&command("exit")), BuiltinResult::ExitRequested);
        assert_eq!(dispatch(&command("exit now 3")), BuiltinResult::ExitRequested);
    }

    #[test]
    fn unknown_names_are_not_builtin() {
        assert_eq!(dispatch(&command("ls -la")), BuiltinResult::NotBuiltin);
        assert_eq!(dispatch(&command("cdx")), BuiltinResult::NotBuiltin);
    }

    #[test]
    fn cd_changes_to_given_directory() {
        let _lock = lock_process_state();
        let temp = make_unique_temp_dir();
        let canonical = fs::canonicalize(&temp).unwrap();
        let orig = env::current_dir().unwrap();

        let cmd = command(&format!("cd {}", temp.display()));
        assert_eq!(dispatch(&cmd), BuiltinResult::Handled);
        assert_eq!(fs::canonicalize(env::current_dir().unwrap()).unwrap(), canonical);

        env::set_current_dir(orig).unwrap();
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn cd_without_argument_uses_home() {
        let _lock = lock_process_state();
        let temp = make_unique_temp_dir();
        let canonical = fs::canonicalize(&temp).unwrap();
        let orig = env::current_dir().unwrap();
        let orig_home = env::var_os("HOME");

        unsafe { env::set_var("HOME", &temp) };
        assert_eq!(dispatch(&command("cd")), BuiltinResult::Handled);
        assert_eq!(fs::canonicalize(env::current_dir().unwrap()).unwrap(), canonical);

        match orig_home {
            Some(home) => unsafe { env::set_var("HOME", home) },
            None => unsafe { env::remove_var("HOME") },
        }
        env::set_current_dir(orig).unwrap();
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn cd_without_argument_and_home_is_handled() {
        let _lock = lock_process_state();
        let orig = env::current_dir().unwrap();
        let orig_home = env::var_os("HOME");

        unsafe { env::remove_var("HOME") };
        assert_eq!(dispatch(&command("cd")), BuiltinResult::Handled);
        assert_eq!(env::current_dir().unwrap(), orig);

        if let Some(home) = orig_home {
            unsafe { env::set_var("HOME", home) };
        }
    }

    #[test]
    fn cd_to_nonexistent_path_leaves_directory_unchanged() {
        let _lock = lock_process_state();
        let orig = env::current_dir().unwrap();

        let target = format!("/nonexistent_bcsh_{}", std::process::id());
        let cmd = command(&format!("cd {target}"));
        assert_eq!(dispatch(&cmd), BuiltinResult::Handled);
        assert_eq!(env::current_dir().unwrap(), orig);
    }
}
