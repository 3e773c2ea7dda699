//! CSV discovery and loading.
//!
//! A data location is either a single CSV file or a directory whose
//! matching files are concatenated in file-name order. Every cell is kept
//! verbatim for display; [`SimileRecord`] derives the matching keys.

use std::fs::File;
use std::path::{Path, PathBuf};

use globset::Glob;
use serde::Deserialize;
use walkdir::WalkDir;

use punchline_core::{SimileRecord, SimileTable};

use crate::error::{LoadError, LoadResult};

/// Pattern used when a directory is given without one.
pub const DEFAULT_PATTERN: &str = "*.csv";

/// Columns every data file must have, in the order they are checked.
const REQUIRED_COLUMNS: [&str; 3] = ["line", "artist", "song"];

/// Where simile data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// One CSV file.
    File(PathBuf),
    /// Every file directly inside `dir` whose name matches `pattern`.
    Directory { dir: PathBuf, pattern: String },
}

impl DataSource {
    /// Pick [`DataSource::Directory`] when `path` is an existing directory
    /// and [`DataSource::File`] otherwise.
    pub fn from_path(path: impl Into<PathBuf>, pattern: &str) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory {
                dir: path,
                pattern: pattern.to_string(),
            }
        } else {
            Self::File(path)
        }
    }

    pub fn location(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::Directory { dir, .. } => dir,
        }
    }
}

/// Options applied after all files are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop records whose `(artist, line)` pair was already seen.
    pub dedupe: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { dedupe: true }
    }
}

/// One CSV row. Optional columns deserialize to `None` when absent or
/// empty; missing display columns become empty strings.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    line: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    song: String,
    #[serde(default)]
    signified: Option<String>,
    #[serde(default)]
    signifier: Option<String>,
}

impl From<CsvRow> for SimileRecord {
    fn from(row: CsvRow) -> Self {
        let mut record = SimileRecord::new(row.artist, row.song, row.line);
        if let Some(signified) = row.signified {
            record = record.with_signified(signified);
        }
        if let Some(signifier) = row.signifier {
            record = record.with_signifier(signifier);
        }
        record
    }
}

/// List the files a source refers to, sorted by file name.
///
/// # Errors
/// Returns [`LoadError::NotFound`] when the file or directory is missing or
/// no file in the directory matches the pattern.
pub fn discover_files(source: &DataSource) -> LoadResult<Vec<PathBuf>> {
    match source {
        DataSource::File(path) => {
            if path.is_file() {
                Ok(vec![path.clone()])
            } else {
                Err(LoadError::NotFound { path: path.clone() })
            }
        }
        DataSource::Directory { dir, pattern } => {
            if !dir.is_dir() {
                return Err(LoadError::NotFound { path: dir.clone() });
            }

            let matcher = Glob::new(pattern)?.compile_matcher();
            let mut files: Vec<PathBuf> = WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter(|entry| matcher.is_match(entry.file_name()))
                .map(walkdir::DirEntry::into_path)
                .collect();

            if files.is_empty() {
                return Err(LoadError::NotFound {
                    path: dir.join(pattern),
                });
            }

            files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            Ok(files)
        }
    }
}

/// Read every record from one CSV file, in file order.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid CSV, or lacks
/// one of the `line`, `artist` and `song` columns.
pub fn read_file(path: &Path) -> LoadResult<Vec<SimileRecord>> {
    log::debug!("Reading similes from {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_error)?;
    if let Some(column) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        records.push(row.map_err(csv_error)?.into());
    }
    Ok(records)
}

/// Build the session table from a data source.
///
/// # Errors
/// Returns [`LoadError::NotFound`] when there is no data, or the first
/// read error encountered.
pub fn load_table(source: &DataSource, options: LoadOptions) -> LoadResult<SimileTable> {
    let files = discover_files(source)?;

    let mut records = Vec::new();
    for path in &files {
        let before = records.len();
        records.extend(read_file(path)?);
        log::debug!("{}: {} rows", path.display(), records.len() - before);
    }

    let mut table = SimileTable::new(records, files);
    if options.dedupe {
        let removed = table.dedupe();
        if removed > 0 {
            log::info!("Dropped {} duplicate (artist, line) rows", removed);
        }
    }

    log::info!(
        "Loaded {} similes from {} file(s) at {}",
        table.len(),
        table.sources().len(),
        source.location().display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "artist,song,line,signified,signifier\n";

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let source = DataSource::File(temp_dir.path().join("simile_database.csv"));

        let err = load_table(&source, LoadOptions::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let source = DataSource::Directory {
            dir: PathBuf::from("/definitely/not/here"),
            pattern: DEFAULT_PATTERN.to_string(),
        };
        assert!(discover_files(&source).unwrap_err().is_not_found());
    }

    #[test]
    fn test_directory_without_matches_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not data").unwrap();

        let source = DataSource::from_path(temp_dir.path(), DEFAULT_PATTERN);
        let err = discover_files(&source).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_path_picks_variant() {
        let temp_dir = TempDir::new().unwrap();
        let dir_source = DataSource::from_path(temp_dir.path(), DEFAULT_PATTERN);
        assert!(matches!(dir_source, DataSource::Directory { .. }));

        let file_source = DataSource::from_path(temp_dir.path().join("x.csv"), DEFAULT_PATTERN);
        assert!(matches!(file_source, DataSource::File(_)));
        assert_eq!(file_source.location(), temp_dir.path().join("x.csv"));
    }

    #[test]
    fn test_discover_sorts_by_file_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b_similes.csv", "a_similes.csv", "c_similes.csv", "readme.md"] {
            fs::write(temp_dir.path().join(name), HEADER).unwrap();
        }

        let source = DataSource::from_path(temp_dir.path(), DEFAULT_PATTERN);
        let files = discover_files(&source).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_similes.csv", "b_similes.csv", "c_similes.csv"]);
    }

    #[test]
    fn test_read_keeps_display_text_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("similes.csv");
        fs::write(
            &path,
            format!("{HEADER}Nas,N.Y. State of Mind,\"  Eyes Like ICE \", Eyes ,ICE\n"),
        )
        .unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.line(), "  Eyes Like ICE ");
        assert_eq!(record.line_key(), "eyes like ice");
        assert_eq!(record.signified(), Some(" Eyes "));
        assert_eq!(record.signified_key(), Some("eyes"));
        assert_eq!(record.signifier_key(), Some("ice"));
    }

    #[test]
    fn test_read_line_only_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("simile_database.csv");
        fs::write(&path, "line,artist,song\nfly like a kite,Artist,Song\n").unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].has_comparison());
    }

    #[test]
    fn test_read_requires_display_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.csv");
        fs::write(&path, "line\nsmooth like butter\n").unwrap();

        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "artist", .. }));
        assert!(err.to_string().contains("lines.csv"));

        fs::write(&path, "line,artist\nsmooth like butter,Sade\n").unwrap();
        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "song", .. }));
    }

    #[test]
    fn test_read_required_columns_in_any_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reordered.csv");
        fs::write(&path, "song,extra,line,artist\nSmooth,x,smooth like butter,Sade\n").unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(records[0].artist(), "Sade");
        assert_eq!(records[0].song(), "Smooth");
        assert_eq!(records[0].line(), "smooth like butter");
    }

    #[test]
    fn test_read_without_line_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(&path, "artist,song\nA,B\n").unwrap();

        let err = read_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "line", .. }));
    }

    #[test]
    fn test_load_concatenates_and_dedupes() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("01.csv"),
            format!("{HEADER}Jay-Z,First,cold like ice,heart,ice\nNas,Song,sharp like a knife,words,knife\n"),
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("02.csv"),
            format!("{HEADER}Jay-Z,Second,cold like ice,heart,ice\nBig L,Song,slick like oil,flow,oil\n"),
        )
        .unwrap();

        let source = DataSource::from_path(temp_dir.path(), DEFAULT_PATTERN);
        let table = load_table(&source, LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.sources().len(), 2);
        assert_eq!(table.records()[0].song(), "First");
        assert_eq!(table.records()[2].artist(), "Big L");
    }

    #[test]
    fn test_load_without_dedupe_keeps_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("similes.csv");
        fs::write(
            &path,
            format!("{HEADER}A,S,same line,x,y\nA,S,same line,x,y\n"),
        )
        .unwrap();

        let table = load_table(&DataSource::File(path), LoadOptions { dedupe: false }).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let source = DataSource::Directory {
            dir: temp_dir.path().to_path_buf(),
            pattern: "[".to_string(),
        };
        assert!(matches!(
            discover_files(&source).unwrap_err(),
            LoadError::Pattern(_)
        ));
    }
}
