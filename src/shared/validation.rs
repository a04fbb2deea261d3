use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for file names that may be resolved inside the uploads directory
    /// Must be a single path segment made of alphanumerics, dots, underscores and hyphens
    /// - Valid: "150_0f8e.png", "books.jpeg", "cover-1.webp"
    /// - Invalid: "../secret", "a/b.png", "with space.png", ""
    pub static ref SAFE_FILE_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();

    /// Regex for extensions carried over from an uploaded file name
    /// - Valid: "png", "JPG", "webp"
    /// - Invalid: "", "tar.gz", "p ng", "averyveryverylongext"
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();
}

/// Returns true when `name` names a plain file directly inside a directory
pub fn is_safe_file_name(name: &str) -> bool {
    SAFE_FILE_NAME_REGEX.is_match(name) && name != "." && name != ".."
}
