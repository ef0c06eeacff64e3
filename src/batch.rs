//! Convert every rule file in a directory tree on a pool of worker threads.
//!
//! Files are handed to workers over a channel and each worker sends back one
//! [`FileResult`]. A failing file never stops the batch; its error is kept in
//! the report.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::config::{BatchConfig, TableConfig};
use crate::convert::convert;
use crate::error::DmnifyError;

/// What one successfully converted file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub rules: usize,
    pub skipped: usize,
    /// Written `.dmn` files, in partition order.
    pub tables: Vec<PathBuf>,
}

/// The outcome of converting one source file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: Result<FileOutput, DmnifyError>,
    pub duration: Duration,
}

impl FileResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The source file name without its directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(out) => write!(
                f,
                "{}: {} rules -> {} tables ({:?})",
                self.file_name(),
                out.rules,
                out.tables.len(),
                self.duration
            ),
            Err(e) => write!(f, "{}: failed: {e}", self.file_name()),
        }
    }
}

/// Per-file results of a batch, sorted by source path.
#[derive(Debug)]
#[must_use]
pub struct BatchReport {
    results: Vec<FileResult>,
    duration: Duration,
}

impl BatchReport {
    #[must_use]
    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    #[must_use]
    pub fn total_files(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn successful_files(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    #[must_use]
    pub fn failed_files(&self) -> usize {
        self.total_files() - self.successful_files()
    }

    /// Rules converted across all successful files.
    #[must_use]
    pub fn total_rules(&self) -> usize {
        self.outputs().map(|o| o.rules).sum()
    }

    /// `.dmn` files written across all successful files.
    #[must_use]
    pub fn total_tables(&self) -> usize {
        self.outputs().map(|o| o.tables.len()).sum()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn outputs(&self) -> impl Iterator<Item = &FileOutput> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().ok())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{} files converted, {} rules, {} tables in {:?}",
            self.successful_files(),
            self.total_files(),
            self.total_rules(),
            self.total_tables(),
            self.duration
        )?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        Ok(())
    }
}

/// Every file under `dir` (recursively) with the given extension, sorted.
///
/// Symbolic links to directories are not followed. Links to regular files
/// are picked up like the files themselves.
///
/// # Errors
///
/// Returns any I/O error from reading a directory.
pub fn discover(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            if is_file && path.extension().is_some_and(|ext| ext == extension) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Output file names for a source with stem `base` split into `count` tables.
///
/// A single table is `<base>.dmn`; otherwise `<base>_part1.dmn`,
/// `<base>_part2.dmn`, ...
#[must_use]
pub fn output_file_names(base: &str, count: usize) -> Vec<String> {
    if count <= 1 {
        return vec![format!("{base}.dmn")];
    }
    (1..=count).map(|n| format!("{base}_part{n}.dmn")).collect()
}

/// Convert one rule file and write its tables into `config.output_dir`.
///
/// The decision name and id come from the file stem (see
/// [`TableConfig::from_stem`]). Nothing is written unless the whole file
/// converts.
pub fn process_file(path: &Path, config: &BatchConfig) -> FileResult {
    let start = Instant::now();
    let outcome = convert_file(path, config);
    let result = FileResult {
        path: path.to_path_buf(),
        outcome,
        duration: start.elapsed(),
    };
    match &result.outcome {
        Ok(out) => info!(
            file = %path.display(),
            rules = out.rules,
            tables = out.tables.len(),
            "converted rule file"
        ),
        Err(error) => warn!(file = %path.display(), %error, "rule file failed"),
    }
    result
}

fn convert_file(path: &Path, config: &BatchConfig) -> Result<FileOutput, DmnifyError> {
    let text = fs::read_to_string(path)?;
    let base = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let table = TableConfig::from_stem(&base);
    let conversion = convert(&text, &table, &config.convert)?;

    let names = output_file_names(&base, conversion.documents.len());
    let mut tables = Vec::with_capacity(names.len());
    for (name, xml) in names.into_iter().zip(&conversion.documents) {
        let out = config.output_dir.join(name);
        fs::write(&out, xml)?;
        tables.push(out);
    }

    Ok(FileOutput {
        rules: conversion.rules,
        skipped: conversion.skipped.len(),
        tables,
    })
}

/// Convert `files` on `config.effective_workers()` threads.
///
/// # Errors
///
/// Fails only if the output directory cannot be created. Per-file failures
/// are reported in the returned [`BatchReport`].
pub fn process_files(files: Vec<PathBuf>, config: &BatchConfig) -> Result<BatchReport, DmnifyError> {
    let start = Instant::now();
    fs::create_dir_all(&config.output_dir)?;

    let workers = config.effective_workers().min(files.len()).max(1);
    debug!(files = files.len(), workers, "starting batch");

    let (job_tx, job_rx) = channel::unbounded::<PathBuf>();
    let (result_tx, result_rx) = channel::unbounded::<FileResult>();
    for path in files {
        // The receiver outlives this loop, so sending cannot fail.
        let _ = job_tx.send(path);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move || {
                for path in jobs {
                    if results.send(process_file(&path, config)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<FileResult> = result_rx.into_iter().collect();
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let report = BatchReport {
        results,
        duration: start.elapsed(),
    };
    info!(
        files = report.total_files(),
        failed = report.failed_files(),
        rules = report.total_rules(),
        tables = report.total_tables(),
        "batch finished"
    );
    Ok(report)
}

/// Discover rule files under `input_dir` and convert them all.
///
/// # Errors
///
/// Fails if `input_dir` cannot be read or the output directory cannot be
/// created.
pub fn process_directory(input_dir: &Path, config: &BatchConfig) -> Result<BatchReport, DmnifyError> {
    let files = discover(input_dir, &config.extension)?;
    info!(dir = %input_dir.display(), files = files.len(), "discovered rule files");
    process_files(files, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_output_name() {
        assert_eq!(output_file_names("loan", 1), ["loan.dmn"]);
    }

    #[test]
    fn partitioned_output_names() {
        assert_eq!(
            output_file_names("loan", 3),
            ["loan_part1.dmn", "loan_part2.dmn", "loan_part3.dmn"]
        );
    }

    #[test]
    fn report_totals() {
        let ok = FileResult {
            path: PathBuf::from("a.txt"),
            outcome: Ok(FileOutput {
                rules: 4,
                skipped: 1,
                tables: vec![PathBuf::from("out/a_part1.dmn"), PathBuf::from("out/a_part2.dmn")],
            }),
            duration: Duration::ZERO,
        };
        let failed = FileResult {
            path: PathBuf::from("b.txt"),
            outcome: Err(DmnifyError::NoValidRules { skipped: 2 }),
            duration: Duration::ZERO,
        };
        let report = BatchReport {
            results: vec![ok, failed],
            duration: Duration::ZERO,
        };

        assert_eq!(report.total_files(), 2);
        assert_eq!(report.successful_files(), 1);
        assert_eq!(report.failed_files(), 1);
        assert_eq!(report.total_rules(), 4);
        assert_eq!(report.total_tables(), 2);
        assert_eq!(report.failures().next().unwrap().file_name(), "b.txt");

        let text = report.to_string();
        assert!(text.starts_with("1/2 files converted, 4 rules, 2 tables"), "{text}");
        assert!(text.contains("b.txt: failed: no valid rules found (2 lines skipped)"));
    }
}
