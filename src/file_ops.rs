//! File discovery, output naming and atomic writes
//!
//! This is the only module of the crate that touches the filesystem on behalf
//! of a batch. The engine itself only ever sees byte buffers.

use log::{debug, warn};
use rustc_hash::FxHashSet as HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{RepairError, Result};

/// Name of the output directory created inside the input folder
pub const REPAIRED_DIR_NAME: &str = "Repaired";

/// Whether a file name is a repair candidate: `*.wav` or `*.wav.*`
pub fn is_candidate_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".wav") || lower.contains(".wav.")
}

/// List candidate files directly inside `folder`, sorted by path
pub fn list_candidate_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).map_err(|source| RepairError::ListingFailed {
        folder: folder.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            let is_file = entry.file_type().ok()?.is_file();
            let name = path.file_name()?.to_str()?;
            (is_file && is_candidate_name(name)).then_some(path)
        })
        .collect();

    files.sort();
    debug!("{} candidate files in {}", files.len(), folder.display());
    Ok(files)
}

/// Normalise an input name to a single `.wav` extension
///
/// Everything from the first `.wav` onward is replaced, so `take.wav.enc`
/// and `take.WAV` both become `take.wav`. Names without `.wav` keep their
/// stem and gain the extension.
pub fn output_file_name(input_name: &str) -> String {
    let lower = input_name.to_ascii_lowercase();
    let base = match lower.find(".wav") {
        Some(idx) if idx > 0 => &input_name[..idx],
        _ => Path::new(input_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(input_name),
    };
    format!("{base}.wav")
}

/// Directory that receives repaired files for an input folder
pub fn output_dir(folder: &Path) -> PathBuf {
    folder.join(REPAIRED_DIR_NAME)
}

/// Destination paths for a whole batch, one per input, never repeated
///
/// Inputs that normalise to the same name (`take.wav`, `take.WAV.bak`) would
/// otherwise overwrite each other. The first input in `files` order keeps the
/// plain name; later ones get `name (1).wav`, `name (2).wav` and so on. Names
/// are compared case-insensitively so the plan also holds on case-folding
/// filesystems.
pub fn plan_output_paths(folder: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    let names: Vec<String> = files
        .iter()
        .map(|input| {
            let name = input
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            output_file_name(&name)
        })
        .collect();

    let mut claimed: HashSet<String> = HashSet::default();
    let mut planned: Vec<Option<String>> = names
        .iter()
        .map(|name| claimed.insert(name.to_ascii_lowercase()).then(|| name.clone()))
        .collect();

    for (index, slot) in planned.iter_mut().enumerate() {
        if slot.is_some() {
            continue;
        }
        let base = names[index].strip_suffix(".wav").unwrap_or(&names[index]);
        let mut n = 1usize;
        let unique = loop {
            let candidate = format!("{base} ({n}).wav");
            if claimed.insert(candidate.to_ascii_lowercase()) {
                break candidate;
            }
            n += 1;
        };
        warn!(
            "{} would overwrite another repaired file, writing {unique} instead",
            files[index].display()
        );
        *slot = Some(unique);
    }

    let dir = output_dir(folder);
    planned
        .into_iter()
        .zip(names)
        .map(|(slot, name)| dir.join(slot.unwrap_or(name)))
        .collect()
}

/// Whether two paths name the same file, resolving `..` and symlinks
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Read a damaged file into memory
pub fn read_damaged(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| RepairError::UnreadableFile {
        file: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `dest` so that `dest` is either absent or complete
///
/// Data goes to a temporary file in the destination directory first and is
/// renamed into place once flushed and synced.
pub fn write_atomic(bytes: &[u8], dest: &Path) -> Result<()> {
    let write_failure = |source: std::io::Error| RepairError::WriteFailure {
        file: dest.to_path_buf(),
        source,
    };

    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_failure)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(write_failure)?;
    temp.write_all(bytes).map_err(write_failure)?;
    temp.flush().map_err(write_failure)?;
    temp.as_file().sync_all().map_err(write_failure)?;
    temp.persist(dest).map_err(|e| write_failure(e.error))?;

    debug!("wrote {} bytes to {}", bytes.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_candidate_name() {
        assert!(is_candidate_name("take.wav"));
        assert!(is_candidate_name("TAKE.WAV"));
        assert!(is_candidate_name("take.wav.enc"));
        assert!(!is_candidate_name("take.mp3"));
        assert!(!is_candidate_name("take.wave"));
        assert!(!is_candidate_name("notes.txt"));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("take.wav"), "take.wav");
        assert_eq!(output_file_name("take.wav.enc"), "take.wav");
        assert_eq!(output_file_name("Take.WAV.locked"), "Take.wav");
        assert_eq!(output_file_name("my.song.wav.x"), "my.song.wav");
        assert_eq!(output_file_name("raw.bin"), "raw.wav");
    }

    #[test]
    fn test_plan_output_paths_disambiguates_collisions() {
        let folder = Path::new("/music");
        let files: Vec<PathBuf> = [
            "a.wav",
            "a.wav.enc",
            "b.wav",
            "take.WAV.bak",
            "take.wav",
            "A (1).wav",
        ]
        .iter()
        .map(|name| folder.join(name))
        .collect();

        let names: Vec<String> = plan_output_paths(folder, &files)
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(
            names,
            vec!["a.wav", "a (2).wav", "b.wav", "take.wav", "take (1).wav", "A (1).wav"]
        );
        assert!(plan_output_paths(folder, &files)
            .iter()
            .all(|p| p.parent() == Some(Path::new("/music/Repaired"))));
    }

    #[test]
    fn test_is_same_file_resolves_parent_segments() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ref.wav");
        fs::write(&file, b"x").unwrap();

        fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(is_same_file(&file, &dir.path().join("sub").join("..").join("ref.wav")));
        assert!(!is_same_file(&file, &dir.path().join("other.wav")));
    }

    #[test]
    fn test_write_atomic_creates_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Repaired").join("out.wav");

        write_atomic(b"RIFF", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"RIFF");

        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.wav");
        fs::write(&dest, b"old contents").unwrap();

        write_atomic(b"new", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_list_candidate_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.wav", "a.wav.enc", "c.txt", "d.WAV"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.wav")).unwrap();

        let files = list_candidate_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.wav.enc", "b.wav", "d.WAV"]);
    }

    #[test]
    fn test_list_missing_folder() {
        let err = list_candidate_files(Path::new("/nonexistent/folder")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_read_damaged_missing_file() {
        let err = read_damaged(Path::new("/nonexistent/a.wav")).unwrap_err();
        assert!(matches!(err, RepairError::UnreadableFile { .. }));
        assert!(!err.is_fatal());
    }
}
