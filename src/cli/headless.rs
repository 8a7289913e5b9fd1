use std::io::{self, Write};
use std::path::Path;

use crate::presenter::Presenter;
use crate::utils::strip_ansi_codes;

/// Presenter for the one-shot `ask` command: responses go to the given writer
pub struct StdoutPresenter<W: Write = io::Stdout> {
    out: W,
}

impl StdoutPresenter {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutPresenter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for StdoutPresenter<W> {
    fn render_text_bubble(&mut self, text: &str, is_user: bool) {
        // The prompt is already on the caller's command line
        if !is_user {
            let _ = writeln!(self.out, "{}", strip_ansi_codes(text));
        }
    }

    fn render_image(&mut self, path: &Path) {
        let _ = writeln!(self.out, "Generated image: {}", path.display());
    }

    fn render_session_marker(&mut self, _timestamp: &str) {}

    fn show_transient_indicator(&mut self) {}

    fn dismiss_transient_indicator(&mut self) {}

    fn notify(&mut self, text: &str, _is_error: bool) {
        eprintln!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_only_bot_output_is_written() {
        let mut presenter = StdoutPresenter::with_writer(Vec::new());
        presenter.render_session_marker("2024-01-15 10:30:00");
        presenter.render_text_bubble("prompt", true);
        presenter.render_text_bubble("\x1b[1manswer\x1b[0m", false);
        presenter.render_image(&PathBuf::from("/images/cat.jpg"));

        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(out, "answer\nGenerated image: /images/cat.jpg\n");
    }
}
