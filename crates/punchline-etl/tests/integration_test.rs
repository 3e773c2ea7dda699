//! Integration tests for discovering, loading and caching simile files.

use std::fs;
use std::path::PathBuf;

use punchline_etl::{discover_files, load_table, Catalog, DataSource, LoadError, LoadOptions};
use tempfile::TempDir;

const HEADER: &str = "artist,song,line,signified,signifier\n";

fn write_corpus(dir: &TempDir) {
    fs::write(
        dir.path().join("similes_2019.csv"),
        format!(
            "{HEADER}\
             Jay-Z,Song A,\"My heart is cold like ice\",my heart,ice\n\
             Nas,Song B,\"Fly like the maple leaves\",me,the maple leaves\n"
        ),
    )
    .unwrap();
    fs::write(
        dir.path().join("similes_2020.csv"),
        format!(
            "{HEADER}\
             Jay-Z,Song C,\"My heart is cold like ice\",my heart,ice\n\
             Big L,Song D,\"Hungry like the wolf\",i,the wolf\n"
        ),
    )
    .unwrap();
}

/// Normalized keys equal trim(lowercase(raw)); display fields are untouched.
#[test]
fn test_loaded_keys_are_normalized() {
    let temp_dir = TempDir::new().unwrap();
    write_corpus(&temp_dir);

    let table = load_table(
        &DataSource::from_path(temp_dir.path(), "*.csv"),
        LoadOptions::default(),
    )
    .unwrap();

    for record in table.iter() {
        assert_eq!(record.line_key(), record.line().to_lowercase().trim());
        assert_eq!(
            record.signifier_key().unwrap(),
            record.signifier().unwrap().to_lowercase().trim()
        );
    }
    assert_eq!(table.records()[1].signifier(), Some("the maple leaves"));
}

/// Identical (artist, line) pairs across files collapse to the first one.
#[test]
fn test_duplicate_rows_across_files() {
    let temp_dir = TempDir::new().unwrap();
    write_corpus(&temp_dir);

    let table = load_table(
        &DataSource::from_path(temp_dir.path(), "*.csv"),
        LoadOptions::default(),
    )
    .unwrap();

    assert_eq!(table.len(), 3);
    let songs: Vec<&str> = table.iter().map(|r| r.song()).collect();
    assert_eq!(songs, vec!["Song A", "Song B", "Song D"]);
}

/// A narrower pattern only picks up matching files.
#[test]
fn test_pattern_selects_files() {
    let temp_dir = TempDir::new().unwrap();
    write_corpus(&temp_dir);

    let source = DataSource::Directory {
        dir: temp_dir.path().to_path_buf(),
        pattern: "*2020.csv".to_string(),
    };
    let files = discover_files(&source).unwrap();
    assert_eq!(files, vec![temp_dir.path().join("similes_2020.csv")]);
}

/// No data yields an explicit not-found state, never a panic.
#[test]
fn test_missing_data_reports_not_found() {
    let catalog = Catalog::new(
        DataSource::File(PathBuf::from("/nowhere/simile_database.csv")),
        LoadOptions::default(),
    );

    match catalog.table() {
        Err(LoadError::NotFound { path }) => {
            assert_eq!(path, PathBuf::from("/nowhere/simile_database.csv"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

/// Malformed rows surface as a CSV error naming the file.
#[test]
fn test_malformed_csv_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.csv");
    fs::write(&path, b"line,artist,song\n\"unterminated,quote\xff\n").unwrap();

    let err = load_table(&DataSource::File(path.clone()), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Csv { .. }));
    assert!(err.to_string().contains("broken.csv"));
}
