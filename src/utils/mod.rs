pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_data_dir, get_image_dir};
pub use paths::{format_path_with_tilde, resolve_image_path};
pub use terminal::strip_ansi_codes;
