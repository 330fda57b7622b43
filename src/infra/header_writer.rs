// ============================================================
// Layer 5 - Header Writer
// ============================================================
// Puts a fully rendered set of headers on disk.
//
// Writing happens in two phases:
//
//   1. stage   every header is written to a hidden sibling
//              ".<name>.tmp" file and flushed; the handle is
//              closed when its scope ends, on success or error
//   2. commit  each staged file is renamed over its target
//
// If any header fails to stage, the staged files are removed and
// no target is touched, so the output directory keeps the previous
// generation. Each rename replaces its target in a single step, so
// no header is ever half-written. A rename that fails during commit
// stops the run: targets renamed before it already hold the new
// generation, the rest keep the previous one, and the leftover
// staged files are removed.

use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::error::{ExportError, ExportResult};

/// One header that reached the disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path:  PathBuf,
    pub bytes: usize,
}

pub struct HeaderWriter {
    dir: PathBuf,
}

impl HeaderWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write every (file name, contents) pair. Staging is all or nothing;
    /// each commit rename is atomic per file.
    pub fn write_all(&self, files: &[(String, String)]) -> ExportResult<Vec<WrittenFile>> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::IoWrite {
            path: self.dir.clone(),
            source,
        })?;

        // ── Phase 1: stage ───────────────────────────────────────────────────
        let mut staged: Vec<(PathBuf, PathBuf, usize)> = Vec::with_capacity(files.len());
        for (name, contents) in files {
            let target = self.dir.join(name);
            let tmp    = self.dir.join(format!(".{name}.tmp"));
            if let Err(e) = stage(&tmp, contents) {
                if tmp.exists() {
                    remove_staged(&tmp);
                }
                discard(&staged);
                return Err(e);
            }
            tracing::debug!("Staged '{}' ({} bytes)", tmp.display(), contents.len());
            staged.push((tmp, target, contents.len()));
        }

        // ── Phase 2: commit ──────────────────────────────────────────────────
        let mut written = Vec::with_capacity(staged.len());
        for (i, (tmp, target, bytes)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(tmp, target) {
                discard(&staged[i..]);
                return Err(ExportError::IoWrite { path: target.clone(), source });
            }
            tracing::info!("Wrote '{}' ({} bytes)", target.display(), bytes);
            written.push(WrittenFile { path: target.clone(), bytes: *bytes });
        }

        Ok(written)
    }
}

/// Write `contents` to `tmp` and flush it to disk.
fn stage(tmp: &Path, contents: &str) -> ExportResult<()> {
    let io_err = |source| ExportError::IoWrite { path: tmp.to_path_buf(), source };

    let file = File::create(tmp).map_err(io_err)?;
    let mut w = BufWriter::new(file);
    w.write_all(contents.as_bytes()).map_err(io_err)?;
    w.flush().map_err(io_err)?;
    w.get_ref().sync_all().map_err(io_err)?;
    Ok(())
}

fn discard(staged: &[(PathBuf, PathBuf, usize)]) {
    for (tmp, _, _) in staged {
        remove_staged(tmp);
    }
}

fn remove_staged(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        tracing::warn!("Could not remove staged file '{}': {}", tmp.display(), e);
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pair(name: &str, contents: &str) -> (String, String) {
        (name.to_string(), contents.to_string())
    }

    #[test]
    fn test_writes_and_reports_sizes() {
        let dir    = tempdir().unwrap();
        let writer = HeaderWriter::new(dir.path().join("Headers"));
        let out    = writer.write_all(&[pair("a.h", "abc"), pair("b.h", "de")]).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].bytes, 3);
        assert_eq!(fs::read_to_string(dir.path().join("Headers/a.h")).unwrap(), "abc");
        assert_eq!(fs::read_to_string(dir.path().join("Headers/b.h")).unwrap(), "de");
    }

    #[test]
    fn test_overwrites_in_place_and_leaves_no_temp_files() {
        let dir    = tempdir().unwrap();
        let writer = HeaderWriter::new(dir.path());
        writer.write_all(&[pair("a.h", "old")]).unwrap();
        writer.write_all(&[pair("a.h", "new")]).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.h")).unwrap(), "new");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.h".to_string()]);
    }

    #[test]
    fn test_failed_stage_touches_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "previous").unwrap();

        // A name inside a missing subdirectory cannot be staged
        let writer = HeaderWriter::new(dir.path());
        let err = writer
            .write_all(&[pair("a.h", "next"), pair("missing/b.h", "x")])
            .unwrap_err();

        assert!(matches!(err, ExportError::IoWrite { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("a.h")).unwrap(), "previous");
        assert!(!dir.path().join(".a.h.tmp").exists());
    }

    #[test]
    fn test_failed_commit_stops_and_cleans_up() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "previous a").unwrap();
        // A non-empty directory cannot be replaced by a file rename
        fs::create_dir(dir.path().join("b.h")).unwrap();
        fs::write(dir.path().join("b.h/keep"), "").unwrap();
        fs::write(dir.path().join("c.h"), "previous c").unwrap();

        let writer = HeaderWriter::new(dir.path());
        let err = writer
            .write_all(&[pair("a.h", "next a"), pair("b.h", "next b"), pair("c.h", "next c")])
            .unwrap_err();

        match err {
            ExportError::IoWrite { path, .. } => assert_eq!(path, dir.path().join("b.h")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(dir.path().join("a.h")).unwrap(), "next a");
        assert_eq!(fs::read_to_string(dir.path().join("c.h")).unwrap(), "previous c");
        assert!(dir.path().join("b.h/keep").exists());
        for tmp in [".a.h.tmp", ".b.h.tmp", ".c.h.tmp"] {
            assert!(!dir.path().join(tmp).exists(), "{tmp} left behind");
        }
    }

    #[test]
    fn test_output_dir_that_is_a_file_fails_with_path() {
        let dir  = tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "").unwrap();

        let err = HeaderWriter::new(&file).write_all(&[pair("a.h", "x")]).unwrap_err();
        match err {
            ExportError::IoWrite { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {other}"),
        }
    }
}
