use anyhow::{Context, Result};
use punchline_core::MatchMode;
use punchline_etl::{config, Config};
use toml_edit::{Array, DocumentMut, Item};

/// Value shape of a settable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Flag,
    Count,
    Mode,
    Words,
}

const KEYS: &[(&str, Kind)] = &[
    ("data_path", Kind::Text),
    ("file_pattern", Kind::Text),
    ("dedupe", Kind::Flag),
    ("match_mode", Kind::Mode),
    ("result_limit", Kind::Count),
    ("sample_size", Kind::Count),
    ("determiners", Kind::Words),
    ("synonyms.enabled", Kind::Flag),
    ("synonyms.endpoint", Kind::Text),
    ("synonyms.max_results", Kind::Count),
    ("synonyms.timeout_secs", Kind::Count),
];

fn valid_keys() -> String {
    KEYS.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(", ")
}

fn kind_of(key: &str) -> Result<Kind> {
    KEYS.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| {
            anyhow::anyhow!("Unknown config key: {}\n\nValid keys: {}", key, valid_keys())
        })
}

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    for (key, _) in KEYS {
        if let Some(value) = effective_value(config, key) {
            println!("  {key}: {value}");
        }
    }
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (PUNCH_*) > Config file > Defaults");

    Ok(())
}

fn effective_value(config: &Config, key: &str) -> Option<String> {
    let value = match key {
        "data_path" => config.data_path.display().to_string(),
        "file_pattern" => config.file_pattern.clone(),
        "dedupe" => config.dedupe.to_string(),
        "match_mode" => config.match_mode.to_string(),
        "result_limit" => config.result_limit.to_string(),
        "sample_size" => config.sample_size.to_string(),
        "determiners" => config.determiners.words().join(", "),
        "synonyms.enabled" => config.synonyms.enabled.to_string(),
        "synonyms.endpoint" => config.synonyms.endpoint.clone(),
        "synonyms.max_results" => config.synonyms.max_results.to_string(),
        "synonyms.timeout_secs" => config.synonyms.timeout_secs.to_string(),
        _ => return None,
    };
    Some(value)
}

/// Get a specific config value, or the whole config file when no key is given.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        kind_of(&key)?;
        if let Some(value) = effective_value(config, &key) {
            println!("{value}");
        }
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'punchline config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included) intact.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path)
        .context("Failed to read config file")?;
    let updated = apply_setting(&contents, key, value)?;
    std::fs::write(&config_path, updated)
        .context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Write `key = value` into the TOML document in `contents`.
///
/// An existing key keeps its position and the comment above it; only the
/// value is replaced.
fn apply_setting(contents: &str, key: &str, value: &str) -> Result<String> {
    let item = parse_value(kind_of(key)?, key, value)?;
    let mut doc: DocumentMut = contents
        .parse()
        .context("Config file is not valid TOML")?;

    match key.split_once('.') {
        Some((section, name)) => {
            let table = doc
                .entry(section)
                .or_insert(toml_edit::table())
                .as_table_mut()
                .ok_or_else(|| {
                    anyhow::anyhow!("'{}' in the config file is not a table", section)
                })?;
            table[name] = item;
        }
        None => doc[key] = item,
    }

    Ok(doc.to_string())
}

fn parse_value(kind: Kind, key: &str, value: &str) -> Result<Item> {
    let item = match kind {
        Kind::Text => toml_edit::value(value),
        Kind::Flag => {
            let flag: bool = value
                .trim()
                .parse()
                .with_context(|| format!("{key} must be true or false"))?;
            toml_edit::value(flag)
        }
        Kind::Count => {
            let count: i64 = value
                .trim()
                .parse::<u32>()
                .map(i64::from)
                .with_context(|| format!("{key} must be a non-negative whole number"))?;
            toml_edit::value(count)
        }
        Kind::Mode => {
            let mode: MatchMode = value.parse()?;
            toml_edit::value(mode.as_str())
        }
        Kind::Words => {
            let words: Array = value
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .collect();
            toml_edit::value(words)
        }
    };
    Ok(item)
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure punchline.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_top_level_key_keeps_comments() {
        let contents = "# Match policy\nmatch_mode = \"word-boundary\"\nresult_limit = 50\n";
        let updated = apply_setting(contents, "match_mode", "Last_Word").unwrap();
        assert!(updated.contains("# Match policy"));
        assert!(updated.contains("match_mode = \"last-word\""));
        assert!(updated.contains("result_limit = 50"));
    }

    #[test]
    fn test_set_nested_key_keeps_comments() {
        let contents = "[synonyms]\n# Related-word lookups\nenabled = true\nmax_results = 4\n";
        let updated = apply_setting(contents, "synonyms.enabled", "false").unwrap();
        assert!(updated.contains("# Related-word lookups\nenabled = false"));
        assert!(updated.contains("max_results = 4"));
    }

    #[test]
    fn test_set_keeps_example_config_explanations() {
        let updated = apply_setting(config::example_config(), "match_mode", "substring").unwrap();
        assert!(updated.contains("# Match policy: substring, last-word"));
        assert!(updated.contains("match_mode = \"substring\""));
        assert!(updated.contains("# Maximum number of matches shown per query"));
    }

    #[test]
    fn test_set_nested_key_creates_table() {
        let updated = apply_setting("", "synonyms.enabled", "false").unwrap();
        let doc: DocumentMut = updated.parse().unwrap();
        assert_eq!(doc["synonyms"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn test_set_nested_key_in_existing_table() {
        let contents = "[synonyms]\nenabled = true\nmax_results = 4\n";
        let updated = apply_setting(contents, "synonyms.max_results", "2").unwrap();
        let doc: DocumentMut = updated.parse().unwrap();
        assert_eq!(doc["synonyms"]["max_results"].as_integer(), Some(2));
        assert_eq!(doc["synonyms"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn test_set_determiners_list() {
        let updated = apply_setting("", "determiners", "the, a ,,my").unwrap();
        let doc: DocumentMut = updated.parse().unwrap();
        let words: Vec<&str> = doc["determiners"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(words, vec!["the", "a", "my"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(apply_setting("", "dedupe", "maybe").is_err());
        assert!(apply_setting("", "result_limit", "-1").is_err());
        assert!(apply_setting("", "match_mode", "fuzzy").is_err());
    }

    #[test]
    fn test_rejects_unknown_key() {
        let err = apply_setting("", "database_path", "/tmp").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_effective_values() {
        let config = Config::default();
        assert_eq!(effective_value(&config, "match_mode").as_deref(), Some("word-boundary"));
        assert_eq!(effective_value(&config, "synonyms.max_results").as_deref(), Some("4"));
        assert_eq!(effective_value(&config, "nope"), None);
    }

    #[test]
    fn test_every_key_has_an_effective_value() {
        let config = Config::default();
        for (key, _) in KEYS {
            assert!(effective_value(&config, key).is_some(), "missing {key}");
        }
    }
}
