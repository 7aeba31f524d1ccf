use std::fs;
use std::path::Path;

/// Read a file with a user-friendly error message.
///
/// Returns `Err(1)` with a message printed to stderr when the file is
/// missing or unreadable.
pub fn read_file(path: &Path) -> Result<String, i32> {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        return Err(1);
    }
    fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", path.display());
        1
    })
}

/// Print an error message and map it to exit code 1.
pub fn fail<E: std::fmt::Display>(err: E) -> i32 {
    eprintln!("Error: {err}");
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_file_missing_is_err() {
        assert_eq!(read_file(Path::new("/nonexistent/file.md")), Err(1));
    }

    #[test]
    fn read_file_returns_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"content").unwrap();
        assert_eq!(read_file(file.path()).unwrap(), "content");
    }
}
