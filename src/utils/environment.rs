use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory holding generated images and the log (~/chatgpt)
pub fn get_data_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join("chatgpt"))
}

/// Default output folder for image generation (~/chatgpt/images)
pub fn get_image_dir() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("images"))
}
