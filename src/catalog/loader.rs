//! Catalog files: format detection, TOML and JSON documents

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::catalog::legacy::LegacyLinesParser;
use crate::catalog::{Catalog, CatalogBuilder};
use crate::version::error::CatalogError;
use crate::version::semver::{InvalidVersion, VersionNumber};
use crate::version::types::{ReleaseChannel, VersionDescriptor};

/// On-disk catalog format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `[programs.<name>.<channel>]` tables
    Toml,
    /// `{"programs": {"<name>": {"<channel>": {...}}}}`
    Json,
    /// `name=version` lines
    Lines,
}

impl CatalogFormat {
    /// Detect the format from the file extension, defaulting to lines
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => CatalogFormat::Toml,
            Some("json") => CatalogFormat::Json,
            _ => CatalogFormat::Lines,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default)]
    programs: IndexMap<String, IndexMap<String, ReleaseRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReleaseRecord {
    version: RecordValue,
    #[serde(default)]
    build: Option<RecordValue>,
}

/// Versions may be written as `"1.2"` or `3`, builds as `5` or `"5"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordValue {
    Text(String),
    Number(i64),
}

impl RecordValue {
    fn version(&self) -> Result<VersionNumber, String> {
        match self {
            RecordValue::Text(text) => text.parse().map_err(|e: InvalidVersion| e.to_string()),
            RecordValue::Number(n) => u64::try_from(*n)
                .map(VersionNumber::from)
                .map_err(|_| format!("version {} is negative", n)),
        }
    }

    fn build(&self) -> Result<u64, String> {
        let invalid = |value: &dyn std::fmt::Display| {
            format!("build number '{}' is not a non-negative integer", value)
        };
        match self {
            RecordValue::Text(text) => text.trim().parse().map_err(|_| invalid(text)),
            RecordValue::Number(n) => u64::try_from(*n).map_err(|_| invalid(n)),
        }
    }
}

/// Load the catalog from a file, picking the format from its extension
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = parse_catalog(&content, CatalogFormat::from_path(path))?;
    info!(
        "Loaded catalog from {:?}: {} programs, {} releases",
        path,
        catalog.len(),
        catalog
            .programs()
            .map(|(_, entry)| entry.len())
            .sum::<usize>()
    );
    Ok(catalog)
}

/// Parse catalog content in the given format
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Catalog, CatalogError> {
    match format {
        CatalogFormat::Toml => {
            let document: CatalogDocument =
                toml::from_str(content).map_err(|e| CatalogError::Syntax(e.to_string()))?;
            build_from_document(document)
        }
        CatalogFormat::Json => {
            let document: CatalogDocument = serde_json::from_str(content)
                .map_err(|e| CatalogError::Syntax(e.to_string()))?;
            build_from_document(document)
        }
        CatalogFormat::Lines => LegacyLinesParser::new().parse(content),
    }
}

fn build_from_document(document: CatalogDocument) -> Result<Catalog, CatalogError> {
    let mut builder = CatalogBuilder::default();

    for (program, channels) in document.programs {
        builder.program(&format!("programs.{}", program), &program)?;

        for (channel_key, record) in channels {
            let location = format!("programs.{}.{}", program, channel_key);
            let channel: ReleaseChannel = channel_key
                .parse()
                .map_err(|e| CatalogError::malformed(&location, e))?;
            let version = record
                .version
                .version()
                .map_err(|e| CatalogError::malformed(&location, e))?;
            let build = match &record.build {
                Some(build) => build
                    .build()
                    .map_err(|e| CatalogError::malformed(&location, e))?,
                None => 0,
            };

            builder.insert(
                &location,
                &program,
                VersionDescriptor::new(version, build, channel),
            )?;
        }
    }

    Ok(builder.build())
}
