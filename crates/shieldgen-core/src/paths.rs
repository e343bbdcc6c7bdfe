//! Path helpers shared by descriptor loading, graph resolution and markup scanning.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use shieldgen_error::{Error, Result};

/// Case-insensitive extension check (`Foo.CSPROJ` is a project descriptor too).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Resolve `.` and `..` components without touching the file system.
///
/// `..` above the root is dropped, matching what the OS does for absolute paths.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonical form used as a graph key.
///
/// Existing paths go through `fs::canonicalize` (symlinks, platform casing);
/// dangling ones are normalized lexically so they still compare equal.
pub fn canonical_key(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => {
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            };
            normalize_lexically(&absolute)
        }
    }
}

/// Resolve a reference written inside a descriptor against the descriptor's directory.
///
/// Descriptors are usually authored on Windows, so `\` separators are accepted
/// everywhere.
pub fn resolve_reference(base_dir: &Path, include: &str) -> PathBuf {
    let include = include.trim();
    let relative: PathBuf = if std::path::MAIN_SEPARATOR == '\\' {
        PathBuf::from(include)
    } else {
        PathBuf::from(include.replace('\\', "/"))
    };
    canonical_key(&base_dir.join(relative))
}

/// Read a text file, decoding lossily and dropping a leading byte-order mark.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| Error::io(err, path))?;
    Ok(decode_text(&bytes))
}

/// Like [`read_text`], but keeps the raw `io::Error` so callers can branch on `NotFound`.
pub fn try_read_text(path: &Path) -> io::Result<String> {
    fs::read(path).map(|bytes| decode_text(&bytes))
}

fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}
