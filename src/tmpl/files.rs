//! Reading templates and writing formatted output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Permissions of written output files.
pub const OUTPUT_MODE: u32 = 0o644;

pub fn read_template(path: impl AsRef<Path>) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Writes `contents` to `path` atomically.
///
/// The data goes to a temporary file in the target directory first, which is then renamed over
/// `path`. Readers see either the old file or the complete new one. The result has mode
/// [`OUTPUT_MODE`] on Unix.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    set_output_permissions(file.as_file())?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_output_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(OUTPUT_MODE))
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.tmpl");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(read_template(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn output_mode_is_0644() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tmpl");

        write_atomic(&path, "x").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, OUTPUT_MODE);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.tmpl");
        assert!(write_atomic(&path, "x").is_err());
    }
}
