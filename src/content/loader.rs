//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::data::*;
use super::validation::{ValidationError, validate_defaults, validate_objectives};

/// Error type for content loading failures.
#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("Failed to load {file}: IO error: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load {file}: Parse error: {source}")]
    Parse {
        file: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Invalid content in {file}: {source}")]
    Invalid {
        file: String,
        #[source]
        source: ValidationError,
    },
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|source| ContentLoadError::Io {
        file: path.display().to_string(),
        source,
    })
}

/// Parse a single RON struct (not wrapped in DataFile).
pub fn parse_single<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|source| ContentLoadError::Parse {
            file: file.to_string(),
            source,
        })
}

/// Parse a RON file containing a DataFile<T> wrapper.
pub fn parse_data_file<T>(file: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = parse_single(file, contents)?;
    Ok(data.items)
}

fn invalid(file: &str, errors: Vec<ValidationError>) -> Vec<ContentLoadError> {
    errors
        .into_iter()
        .map(|source| ContentLoadError::Invalid {
            file: file.to_string(),
            source,
        })
        .collect()
}

/// Parse and validate combat defaults from RON text.
pub fn parse_combat_defaults(
    file: &str,
    contents: &str,
) -> Result<CombatDefaults, Vec<ContentLoadError>> {
    let defaults: CombatDefaults = parse_single(file, contents).map_err(|e| vec![e])?;
    let errors = validate_defaults(&defaults);
    if errors.is_empty() {
        Ok(defaults)
    } else {
        Err(invalid(file, errors))
    }
}

/// Parse and validate objective definitions from RON text.
pub fn parse_objectives(
    file: &str,
    contents: &str,
) -> Result<Vec<ObjectiveDef>, Vec<ContentLoadError>> {
    let objectives: Vec<ObjectiveDef> = parse_data_file(file, contents).map_err(|e| vec![e])?;
    let errors = validate_objectives(&objectives);
    if errors.is_empty() {
        Ok(objectives)
    } else {
        Err(invalid(file, errors))
    }
}

/// Load combat.ron and objectives.ron from `base_path`.
/// Each file that fails falls back to its built-in defaults; the errors are
/// returned alongside so the caller can report them.
pub fn load_all_content(
    base_path: &Path,
) -> (CombatDefaults, ObjectiveCatalog, Vec<ContentLoadError>) {
    let mut errors = Vec::new();

    let combat_path = base_path.join("combat.ron");
    let file_name = combat_path.display().to_string();
    let defaults = match read_file(&combat_path)
        .map_err(|e| vec![e])
        .and_then(|contents| parse_combat_defaults(&file_name, &contents))
    {
        Ok(defaults) => defaults,
        Err(mut e) => {
            errors.append(&mut e);
            CombatDefaults::default()
        }
    };

    let objectives_path = base_path.join("objectives.ron");
    let file_name = objectives_path.display().to_string();
    let catalog = match read_file(&objectives_path)
        .map_err(|e| vec![e])
        .and_then(|contents| parse_objectives(&file_name, &contents))
    {
        Ok(objectives) => ObjectiveCatalog(objectives),
        Err(mut e) => {
            errors.append(&mut e);
            ObjectiveCatalog::tutorial()
        }
    };

    (defaults, catalog, errors)
}
