//! File I/O utilities for reading replays and preparing output paths.

use std::path::{Path, PathBuf};

/// Read a UTF-8 text file, stripping a leading byte order mark.
///
/// ```rust,no_run
/// # use liar_cli::io_utils::read_text;
/// let content = read_text("data/game.json").unwrap();
/// ```
pub fn read_text(path: &str) -> Result<String, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Ensure parent directory exists for the given file path.
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Output path for game `index` (zero-based) of `total`. A single game keeps
/// the path as given; otherwise `_game{index+1}` goes before the extension.
///
/// ```rust
/// # use liar_cli::io_utils::replay_path;
/// # use std::path::PathBuf;
/// assert_eq!(replay_path("out/run.json", 0, 1), PathBuf::from("out/run.json"));
/// assert_eq!(replay_path("out/run.json", 1, 3), PathBuf::from("out/run_game2.json"));
/// ```
pub fn replay_path(base: &str, index: usize, total: usize) -> PathBuf {
    let path = PathBuf::from(base);
    if total <= 1 {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_game{}.{}", stem, index + 1, ext.to_string_lossy()),
        None => format!("{}_game{}", stem, index + 1),
    };
    path.with_file_name(name)
}
