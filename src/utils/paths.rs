use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

/// Join an image file name reported by the tool onto the image directory
///
/// # Errors
///
/// Returns an error if `name` is anything other than a single plain file name
/// (separators, `..`, or an absolute path), so tool output can never point outside
/// the image directory.
pub fn resolve_image_path(image_dir: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(image_dir.join(name)),
        _ => bail!("Image name is not a plain file name: {}", name),
    }
}

/// Show `path` relative to the home directory as `~/...` when it lives under it
///
/// ```no_run
/// use std::path::Path;
/// use tgpt_chat::format_path_with_tilde;
///
/// // "~/chat_history.txt" when the home directory is /home/alice
/// let shown = format_path_with_tilde(Path::new("/home/alice/chat_history.txt"));
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    match home.filter(|h| !h.as_os_str().is_empty()).and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_name() {
        let dir = PathBuf::from("/home/alice/chatgpt/images");
        assert_eq!(
            resolve_image_path(&dir, "cat123.jpg").unwrap(),
            PathBuf::from("/home/alice/chatgpt/images/cat123.jpg")
        );
    }

    #[test]
    fn test_resolve_rejects_parent_dir() {
        let dir = PathBuf::from("/images");
        assert!(resolve_image_path(&dir, "../etc/passwd.jpg").is_err());
        assert!(resolve_image_path(&dir, "..").is_err());
    }

    #[test]
    fn test_resolve_rejects_nested_and_absolute() {
        let dir = PathBuf::from("/images");
        assert!(resolve_image_path(&dir, "sub/cat.jpg").is_err());
        assert!(resolve_image_path(&dir, "/tmp/cat.jpg").is_err());
        assert!(resolve_image_path(&dir, "").is_err());
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/chatgpt/images/cat.jpg");
        let formatted = format_path_with_tilde_internal(&path, Some(Path::new("/Users/testuser")));
        assert_eq!(formatted, "~/chatgpt/images/cat.jpg");

        // Path not under home
        let path2 = PathBuf::from("/opt/local/images/cat.jpg");
        let formatted2 = format_path_with_tilde_internal(&path2, Some(Path::new("/Users/testuser")));
        assert_eq!(formatted2, "/opt/local/images/cat.jpg");

        // Sibling directory sharing the prefix is not home
        let path3 = PathBuf::from("/Users/testuser2/cat.jpg");
        let formatted3 = format_path_with_tilde_internal(&path3, Some(Path::new("/Users/testuser")));
        assert_eq!(formatted3, "/Users/testuser2/cat.jpg");

        let home = PathBuf::from("/Users/testuser");
        assert_eq!(format_path_with_tilde_internal(&home, Some(&home)), "~");
        assert_eq!(format_path_with_tilde_internal(&path2, None), "/opt/local/images/cat.jpg");
    }
}
