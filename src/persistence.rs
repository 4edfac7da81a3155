// File: src/persistence.rs
use crate::config::{Settings, SettingsPatch};
use crate::core::rules::CustomRule;
use crate::core::types::{Category, Rule};
use crate::error::ImportError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Error, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const PAYLOAD_VERSION: u64 = 1;
pub const DEFAULT_SETTINGS_FILENAME: &str = "unieraser-settings.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload<'a> {
    version: u64,
    settings: &'a Settings,
    custom_rules: Vec<CustomRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    #[serde(default)]
    settings: Option<SettingsPatch>,
    #[serde(default)]
    custom_rules: Option<Vec<CustomRule>>,
}

/// A parsed payload. Nothing is applied until the caller decides to.
///
/// `settings` is a patch: fields the payload leaves out stay as they are
/// when it is merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSettings {
    pub settings: Option<SettingsPatch>,
    pub custom_rules: Vec<CustomRule>,
}

/// Serializes `settings` and the custom rules among `rules` as pretty JSON.
pub fn export_settings(settings: &Settings, rules: &[Rule]) -> serde_json::Result<String> {
    let payload = ExportPayload {
        version: PAYLOAD_VERSION,
        settings,
        custom_rules: rules
            .iter()
            .filter(|r| r.category == Category::Custom)
            .map(CustomRule::from)
            .collect(),
    };
    serde_json::to_string_pretty(&payload)
}

pub fn import_settings(json: &str) -> Result<ImportedSettings, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        warn!("rejected settings payload: {e}");
        ImportError::InvalidPayload(e.to_string())
    })?;

    if !value.get("version").is_some_and(is_supported_version) {
        warn!("rejected settings payload: missing or unsupported version");
        return Err(ImportError::UnrecognizedFormat);
    }

    let payload: ImportPayload = serde_json::from_value(value)
        .map_err(|e| ImportError::InvalidPayload(e.to_string()))?;

    Ok(ImportedSettings {
        settings: payload.settings,
        custom_rules: payload.custom_rules.unwrap_or_default(),
    })
}

/// `1` and `1.0` are the same version; `"1"` is not.
fn is_supported_version(version: &serde_json::Value) -> bool {
    match version.as_u64() {
        Some(v) => v == PAYLOAD_VERSION,
        None => version.as_f64() == Some(PAYLOAD_VERSION as f64),
    }
}

/// Atomically writes the export payload to `path`.
pub fn save_settings_file(path: &Path, settings: &Settings, rules: &[Rule]) -> Result<(), Error> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let json = export_settings(settings, rules).map_err(|e| Error::new(ErrorKind::Other, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

pub fn load_settings_file(path: &Path) -> Result<ImportedSettings, ImportError> {
    let json = fs::read_to_string(path)?;
    import_settings(&json)
}
