use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::TrainingCenterDatabase;

pub mod tcx;
pub mod xml;

/// Importer for TCX files and directories of TCX files
pub struct TcxImporter;

impl TcxImporter {
    pub fn new() -> Self {
        Self
    }

    /// Check if this importer can handle the given file
    pub fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("tcx"))
            .unwrap_or(false)
    }

    /// Parse a single file
    pub fn import_file(&self, file_path: &Path) -> crate::Result<TrainingCenterDatabase> {
        info!(file = %file_path.display(), "Importing TCX file");
        tcx::parse_file(file_path)
    }

    /// Parse every TCX file in a directory
    ///
    /// Files that fail to parse are reported and skipped; the result holds the
    /// documents that decoded, paired with their paths, in path order.
    pub fn import_directory(&self, dir_path: &Path) -> Result<Vec<(PathBuf, TrainingCenterDatabase)>> {
        let mut documents = Vec::new();

        let files = self.collect_importable_files(dir_path)?;

        if files.is_empty() {
            info!(dir = %dir_path.display(), "No TCX files found");
            return Ok(documents);
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
                )?
                .progress_chars("#>-"),
        );

        for file_path in files {
            let file_name = file_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            pb.set_message(format!("Processing {}", file_name));

            match self.import_file(&file_path) {
                Ok(tcx) => {
                    pb.println(format!(
                        "✓ Imported {} activities from {}",
                        tcx.activities.len(),
                        file_name
                    ));
                    documents.push((file_path, tcx));
                }
                Err(e) => {
                    warn!(file = %file_path.display(), error = %e, "Failed to import TCX file");
                    pb.println(format!("✗ Failed to import {}: {}", file_name, e));
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Import complete");
        Ok(documents)
    }

    /// Collect all files that can be imported from a directory, sorted by path
    pub fn collect_importable_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        if !dir_path.is_dir() {
            anyhow::bail!("Path is not a directory: {}", dir_path.display());
        }

        for entry in std::fs::read_dir(dir_path)? {
            let path = entry?.path();

            if path.is_file() && self.can_import(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for TcxImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"<TrainingCenterDatabase><Activities>
        <Activity Sport="Running"><Lap><DistanceMeters>100</DistanceMeters></Lap></Activity>
    </Activities></TrainingCenterDatabase>"#;

    #[test]
    fn test_can_import_by_extension() {
        let importer = TcxImporter::new();
        assert!(importer.can_import(Path::new("run.tcx")));
        assert!(importer.can_import(Path::new("RUN.TCX")));
        assert!(!importer.can_import(Path::new("run.gpx")));
        assert!(!importer.can_import(Path::new("tcx")));
    }

    #[test]
    fn test_import_directory_skips_failures() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.tcx"), DOCUMENT).unwrap();
        fs::write(dir.path().join("a.tcx"), DOCUMENT).unwrap();
        fs::write(dir.path().join("broken.tcx"), "not xml").unwrap();
        fs::write(dir.path().join("notes.txt"), DOCUMENT).unwrap();

        let importer = TcxImporter::new();
        let files = importer.collect_importable_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.tcx", "b.tcx", "broken.tcx"]);

        let documents = importer.import_directory(dir.path()).unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].0.ends_with("a.tcx"));
        assert_eq!(documents[1].1.activities[0].total_distance(), 100.0);
    }

    #[test]
    fn test_import_directory_requires_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.tcx");
        fs::write(&file, DOCUMENT).unwrap();

        assert!(TcxImporter::new().import_directory(&file).is_err());
    }
}
