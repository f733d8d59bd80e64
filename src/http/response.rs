//! Response bodies for the check endpoints

use std::str::FromStr;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::version::types::{CheckResult, ReleaseChannel, VersionDescriptor};

/// How a check result is written back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `true` or `false:<version>b<build>[ <LABEL>]`
    Text,
    /// `{"upToDate": ..., "latest": ...}`
    Json,
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(ResponseFormat::Text),
            "json" => Ok(ResponseFormat::Json),
            other => Err(format!("unknown format '{}' (expected text or json)", other)),
        }
    }
}

/// Render the legacy plain-text answer
pub fn legacy_body(result: &CheckResult) -> String {
    if result.up_to_date {
        return "true".to_string();
    }
    match &result.latest {
        Some(latest) => format!("false:{}", latest),
        None => "false".to_string(),
    }
}

/// Body text exactly as the check endpoint would send it
pub fn render_body(result: &CheckResult, format: ResponseFormat) -> serde_json::Result<String> {
    match format {
        ResponseFormat::Text => Ok(legacy_body(result)),
        ResponseFormat::Json => serde_json::to_string(result),
    }
}

pub fn render(result: CheckResult, format: ResponseFormat) -> Response {
    match format {
        ResponseFormat::Text => legacy_body(&result).into_response(),
        ResponseFormat::Json => Json(result).into_response(),
    }
}

/// Release report of the `/program` lookup, in the shape legacy clients
/// match: `{"VERSION":{"MAJOR":"1","MINOR":"2","REVISION":"0"},"STATUS":"STABLE"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ProgramReport {
    pub version: ReportedVersion,
    pub status: &'static str,
}

/// Version components as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ReportedVersion {
    pub major: String,
    pub minor: String,
    pub revision: String,
}

impl From<&VersionDescriptor> for ProgramReport {
    fn from(release: &VersionDescriptor) -> Self {
        let version = release.version().normalized();
        Self {
            version: ReportedVersion {
                major: version.major.to_string(),
                minor: version.minor.to_string(),
                revision: version.patch.to_string(),
            },
            status: status_label(release.channel()),
        }
    }
}

/// Legacy status names are single words, so the candidate label keeps
/// its underscore
fn status_label(channel: ReleaseChannel) -> &'static str {
    match channel {
        ReleaseChannel::ReleaseCandidate => "RELEASE_CANDIDATE",
        other => other.as_str(),
    }
}
