mod builtins;
mod config;
mod parse;
mod process_exec;
mod prompt;
mod shell;
mod sig;

use anyhow::Context;
use reedline::{Reedline, Signal};

use crate::prompt::ShellPrompt;
use crate::shell::{Flow, Session};

fn main() -> anyhow::Result<()> {
    // Process-wide dispositions, set once for the lifetime of the shell.
    sig::install_reaper().context("failed to install SIGCHLD reaper")?;
    sig::ignore_interactive_signals();

    let cfg = config::init();
    let prompt = ShellPrompt::new(&cfg);
    let mut session = Session::new(cfg);

    if session.run_startup() == Flow::Exit {
        return Ok(());
    }

    let mut editor = Reedline::create();

    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                if session.eval(&line) == Flow::Exit {
                    break;
                }
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Err(e) => return Err(e).context("failed to read input"),
        }
    }

    Ok(())
}
