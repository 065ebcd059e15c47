/// A single command line after normalization and tokenization.
///
/// `args` is never empty; `args[0]` is the program or builtin name. A trailing
/// standalone `&` never appears in `args` — it is consumed into `background`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub args: Vec<String>,
    pub background: bool,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.args[0]
    }
}

/// Strips the comment and surrounding whitespace from a raw input line.
///
/// Returns `None` for lines that are blank or comment-only, which the caller
/// skips without side effects.
pub fn normalize(raw: &str) -> Option<&str> {
    let uncommented = match comment_start(raw) {
        Some(i) => &raw[..i],
        None => raw,
    };

    let line = uncommented.trim();
    if line.is_empty() { None } else { Some(line) }
}

// A `\#` shields the hash from truncation; no other unescaping happens.
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len()).find(|&i| bytes[i] == b'#' && (i == 0 || bytes[i - 1] != b'\\'))
}

/// Splits a normalized line into a [`Command`], detecting a trailing `&`.
///
/// Runs of whitespace collapse, so no empty tokens are produced. A lone `&`
/// leaves nothing to run and yields `None`, same as an empty line.
pub fn tokenize(line: &str) -> Option<Command> {
    let mut args: Vec<String> = line.split_whitespace().map(str::to_string).collect();

    let background = args.last().is_some_and(|token| token == "&");
    if background {
        args.pop();
    }

    if args.is_empty() {
        return None;
    }

    Some(Command { args, background })
}
