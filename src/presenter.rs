use std::path::Path;

/// Surface the chat controller renders into
///
/// Implemented by the terminal UI's chat view and by the headless `ask` command.
pub trait Presenter {
    fn render_text_bubble(&mut self, text: &str, is_user: bool);
    fn render_image(&mut self, path: &Path);
    fn render_session_marker(&mut self, timestamp: &str);
    fn show_transient_indicator(&mut self);
    fn dismiss_transient_indicator(&mut self);
    /// Short-lived notice that is not part of the conversation
    fn notify(&mut self, text: &str, is_error: bool);
}
