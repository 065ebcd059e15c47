use std::{borrow::Cow, env};

use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};

use crate::config::Config;

pub const SHELL_NAME: &str = "bcsh";

pub struct ShellPrompt {
    custom_prompt: Option<String>,
}

impl ShellPrompt {
    pub fn new(config: &Config) -> Self {
        Self {
            custom_prompt: config.prompt.clone(),
        }
    }
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'static, str> {
        if let Some(ref prompt) = self.custom_prompt {
            return Cow::Owned(prompt.clone());
        }

        let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
        let cwd = env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "?".to_string());

        Cow::Owned(format!(
            "{}:{} $ ",
            Color::Green.paint(format!("{user}@{SHELL_NAME}")),
            Color::Blue.paint(cwd),
        ))
    }

    fn render_prompt_right(&self) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'static, str> {
        Cow::Borrowed("? ")
    }
}
