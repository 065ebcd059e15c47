use crate::{
    builtins::{self, BuiltinResult},
    config::Config,
    parse, process_exec,
};

/// What the loop controller should do after evaluating one line.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive session. Holds the loaded configuration; the working
/// directory and the reaping disposition live in the process itself.
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Feeds the config's startup commands through the normal evaluation path
    /// before the first prompt. An `exit` there ends the shell.
    pub fn run_startup(&mut self) -> Flow {
        let lines = self.config.startup.clone();
        for line in &lines {
            if self.eval(line) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Evaluates a single raw input line. Every error is absorbed here: the
    /// caller only learns whether to keep looping.
    pub fn eval(&mut self, input: &str) -> Flow {
        let Some(line) = parse::normalize(input) else {
            return Flow::Continue;
        };
        let Some(cmd) = parse::tokenize(line) else {
            return Flow::Continue;
        };

        match builtins::dispatch(&cmd) {
            BuiltinResult::ExitRequested => return Flow::Exit,
            BuiltinResult::Handled => return Flow::Continue,
            BuiltinResult::NotBuiltin => {}
        }

        if let Err(e) = process_exec::launch(&cmd) {
            eprintln!("bcsh: {e}");
        }
        Flow::Continue
    }
}
