pub mod commands;
mod headless;

pub use commands::{Cli, Commands, run};
pub use headless::StdoutPresenter;
