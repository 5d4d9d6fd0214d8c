//! # Export: Trace Files
//!
//! Writes a sequence of traces as a pretty-printed JSON array and reads it
//! back. Writes are atomic: the file is written to a `.tmp` sibling, then
//! renamed over the target, so a crash never leaves a half-written export.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::trace::Trace;

/// Export traces to a JSON file.
pub fn export_traces(traces: &[Trace], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(traces)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming onto {}", path.display()))?;
    Ok(())
}

/// Load traces previously written by [`export_traces`].
pub fn load_traces(path: &Path) -> Result<Vec<Trace>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let traces = serde_json::from_str(&raw)
        .with_context(|| format!("parsing traces from {}", path.display()))?;
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::create_trace;
    use rug::Integer;

    fn sample() -> Vec<Trace> {
        vec![
            create_trace(1, &Integer::from(7), &Integer::from(3), 1.0, 1.0, true),
            create_trace(10, &Integer::from(167), &Integer::from(83), 1.0, 1.0, true),
        ]
    }

    #[test]
    fn export_load_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        let traces = sample();
        export_traces(&traces, &path).unwrap();

        let loaded = load_traces(&path).unwrap();
        assert_eq!(loaded, traces);
        assert!(loaded.iter().all(Trace::is_intact));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn export_is_indented_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        export_traces(&sample(), &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"version\": \"1.0.0\""), "{}", raw);
        assert!(raw.contains("\"p\": \"167\""));
    }

    #[test]
    fn empty_export_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        export_traces(&[], &path).unwrap();
        assert!(load_traces(&path).unwrap().is_empty());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        fs::write(&path, "garbage").unwrap();
        export_traces(&sample()[..1], &path).unwrap();
        assert_eq!(load_traces(&path).unwrap().len(), 1);
    }

    #[test]
    fn load_reports_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_traces(&dir.path().join("missing.json")).is_err());
        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "[{\"version\": 1}]").unwrap();
        assert!(load_traces(&corrupt).is_err());
    }
}
