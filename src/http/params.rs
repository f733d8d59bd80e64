//! Check request fields and their validation
//!
//! The same field set arrives as a query string, a form body or a JSON
//! body, so every value is accepted as text and, for JSON, also as a
//! number or boolean.

use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::response::ResponseFormat;
use crate::version::error::CheckError;
use crate::version::semver::VersionNumber;
use crate::version::types::{ReleaseChannel, VersionDescriptor};

/// A request value as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(u64),
    Text(String),
    /// Any other JSON value (negative or fractional numbers, arrays,
    /// objects), kept so it is reported as an invalid field
    Other(serde_json::Value),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }

    fn to_version(&self, field: &'static str) -> Result<VersionNumber, CheckError> {
        match self {
            FieldValue::Number(n) => Ok(VersionNumber::from(*n)),
            FieldValue::Text(text) => text.parse().map_err(|e| invalid(field, e)),
            FieldValue::Flag(_) => Err(invalid(field, "expected a version, got a boolean")),
            FieldValue::Other(value) => Err(invalid(
                field,
                format!("'{}' is not a numeric version", value),
            )),
        }
    }

    fn to_build(&self, field: &'static str) -> Result<u64, CheckError> {
        match self {
            FieldValue::Number(n) => Ok(*n),
            FieldValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| invalid(field, format!("'{}' is not a non-negative integer", text))),
            FieldValue::Flag(_) => Err(invalid(field, "expected an integer, got a boolean")),
            FieldValue::Other(value) => Err(invalid(
                field,
                format!("'{}' is not a non-negative integer", value),
            )),
        }
    }

    fn to_flag(&self, field: &'static str) -> Result<bool, CheckError> {
        match self {
            FieldValue::Flag(flag) => Ok(*flag),
            FieldValue::Number(0) => Ok(false),
            FieldValue::Number(1) => Ok(true),
            FieldValue::Number(n) => Err(invalid(field, format!("'{}' is not a boolean", n))),
            FieldValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(invalid(field, format!("'{}' is not a boolean", text))),
            },
            FieldValue::Other(value) => Err(invalid(field, format!("'{}' is not a boolean", value))),
        }
    }
}

fn invalid(field: &'static str, reason: impl ToString) -> CheckError {
    CheckError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

/// Present and non-blank, blank values count as absent
fn present(value: &Option<FieldValue>) -> Option<&FieldValue> {
    value.as_ref().filter(|value| !value.is_blank())
}

fn present_text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Fields of a version check request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckParams {
    pub program: Option<String>,
    pub version: Option<FieldValue>,
    pub build: Option<FieldValue>,
    pub channel: Option<String>,
    /// Legacy channel flag
    pub is_beta: Option<FieldValue>,
    /// Legacy channel flag
    #[serde(rename = "isRC", alias = "isRc")]
    pub is_rc: Option<FieldValue>,
    /// `checkunstable` is the spelling legacy form clients send
    #[serde(alias = "checkunstable")]
    pub check_unstable: Option<FieldValue>,
    /// `text` (default) or `json`
    pub format: Option<String>,
}

impl CheckParams {
    /// The requested program. Its absence is a generic bad request.
    pub fn program(&self) -> Result<&str, ApiError> {
        present_text(&self.program).ok_or(ApiError::BadRequest)
    }

    /// The client's release, validated in field order version, build, channel
    pub fn client_release(&self) -> Result<VersionDescriptor, CheckError> {
        let version = present(&self.version)
            .ok_or(CheckError::MissingField("version"))?
            .to_version("version")?;
        let build = present(&self.build)
            .ok_or(CheckError::MissingField("build"))?
            .to_build("build")?;
        let channel = self.channel()?;

        Ok(VersionDescriptor::new(version, build, channel))
    }

    /// Explicit `channel` wins over the legacy `isBeta` / `isRC` flags
    fn channel(&self) -> Result<ReleaseChannel, CheckError> {
        if let Some(label) = present_text(&self.channel) {
            return label.parse().map_err(|e| invalid("channel", e));
        }

        let is_beta = present(&self.is_beta);
        let is_rc = present(&self.is_rc);
        if is_beta.is_none() && is_rc.is_none() {
            return Err(CheckError::MissingField("channel"));
        }

        let is_beta = is_beta.map(|v| v.to_flag("isBeta")).transpose()?;
        let is_rc = is_rc.map(|v| v.to_flag("isRC")).transpose()?;
        Ok(ReleaseChannel::from_flags(
            is_beta.unwrap_or(false),
            is_rc.unwrap_or(false),
        ))
    }

    pub fn check_unstable(&self) -> Result<bool, CheckError> {
        present(&self.check_unstable)
            .map(|v| v.to_flag("checkUnstable"))
            .transpose()
            .map(|flag| flag.unwrap_or(false))
    }

    /// Requested response format, `default` when none is given
    pub fn format(&self, default: ResponseFormat) -> Result<ResponseFormat, CheckError> {
        match present_text(&self.format) {
            Some(format) => format.parse().map_err(|e| invalid("format", e)),
            None => Ok(default),
        }
    }
}

/// Query of the legacy `versionchecker` lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyVersionQuery {
    pub name: Option<String>,
}

impl LegacyVersionQuery {
    pub fn name(&self) -> Option<&str> {
        present_text(&self.name)
    }
}

/// Form of the program listing lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramQuery {
    pub program: Option<String>,
}

impl ProgramQuery {
    pub fn program(&self) -> Option<&str> {
        present_text(&self.program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn text(value: &str) -> Option<FieldValue> {
        Some(FieldValue::Text(value.to_string()))
    }

    fn params() -> CheckParams {
        CheckParams {
            program: Some("Foo".to_string()),
            version: text("1.1"),
            build: text("1"),
            channel: Some("STABLE".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn client_release_from_text_fields() {
        let release = params().client_release().unwrap();

        assert_eq!(release, "1.1b1".parse().unwrap());
    }

    #[test]
    fn deserializes_json_numbers_and_booleans() {
        let params: CheckParams = serde_json::from_value(json!({
            "program": "Foo",
            "version": 3,
            "build": 12,
            "isBeta": true,
            "checkUnstable": true
        }))
        .unwrap();

        let release = params.client_release().unwrap();
        assert_eq!(release.to_string(), "3b12 BETA");
        assert_eq!(params.check_unstable(), Ok(true));
    }

    #[rstest]
    #[case(json!(1.5), "version", "'1.5' is not a numeric version")]
    #[case(json!(-1), "build", "'-1' is not a non-negative integer")]
    #[case(json!([1]), "build", "'[1]' is not a non-negative integer")]
    fn json_values_of_the_wrong_kind_are_invalid_fields(
        #[case] value: serde_json::Value,
        #[case] field: &'static str,
        #[case] reason: &str,
    ) {
        let mut body = json!({ "program": "Foo", "version": "1.0", "build": 1, "channel": "STABLE" });
        body[field] = value;
        let params: CheckParams = serde_json::from_value(body).unwrap();

        assert_eq!(
            params.client_release(),
            Err(CheckError::InvalidField {
                field,
                reason: reason.to_string()
            })
        );
    }

    #[test]
    fn legacy_lowercase_check_unstable_is_accepted() {
        let params: CheckParams = serde_json::from_value(json!({
            "program": "Bar",
            "version": "1.0",
            "build": "1",
            "isBeta": "true",
            "checkunstable": "true"
        }))
        .unwrap();

        assert_eq!(params.check_unstable(), Ok(true));
        assert_eq!(
            params.client_release().unwrap().channel(),
            ReleaseChannel::Beta
        );
    }

    #[rstest]
    #[case(CheckParams { program: None, ..params() })]
    #[case(CheckParams { program: Some("  ".to_string()), ..params() })]
    fn program_missing_is_generic_bad_request(#[case] params: CheckParams) {
        assert_eq!(params.program(), Err(ApiError::BadRequest));
    }

    #[rstest]
    #[case(CheckParams { version: None, build: None, ..params() }, "version")]
    #[case(CheckParams { version: text(""), ..params() }, "version")]
    #[case(CheckParams { build: None, ..params() }, "build")]
    #[case(CheckParams { build: None, channel: None, ..params() }, "build")]
    #[case(CheckParams { channel: None, ..params() }, "channel")]
    fn client_release_reports_first_missing_field(
        #[case] params: CheckParams,
        #[case] field: &'static str,
    ) {
        assert_eq!(params.client_release(), Err(CheckError::MissingField(field)));
    }

    #[rstest]
    #[case(CheckParams { version: text("1.x"), ..params() }, "version")]
    #[case(CheckParams { version: Some(FieldValue::Flag(true)), ..params() }, "version")]
    #[case(CheckParams { build: text("-3"), ..params() }, "build")]
    #[case(CheckParams { channel: Some("NIGHTLY".to_string()), ..params() }, "channel")]
    #[case(CheckParams { channel: None, is_beta: text("maybe"), ..params() }, "isBeta")]
    fn client_release_reports_invalid_field(
        #[case] params: CheckParams,
        #[case] expected: &'static str,
    ) {
        let Err(CheckError::InvalidField { field, .. }) = params.client_release() else {
            panic!("expected InvalidField");
        };
        assert_eq!(field, expected);
    }

    #[rstest]
    #[case(None, None, ReleaseChannel::Stable)] // falls back to the explicit channel
    #[case(text("true"), None, ReleaseChannel::Beta)]
    #[case(text("0"), text("yes"), ReleaseChannel::ReleaseCandidate)]
    #[case(text("false"), text("off"), ReleaseChannel::Stable)]
    #[case(Some(FieldValue::Flag(true)), Some(FieldValue::Flag(true)), ReleaseChannel::Beta)]
    fn client_release_maps_legacy_flags(
        #[case] is_beta: Option<FieldValue>,
        #[case] is_rc: Option<FieldValue>,
        #[case] expected: ReleaseChannel,
    ) {
        let channel = if is_beta.is_none() && is_rc.is_none() {
            Some("stable".to_string())
        } else {
            None
        };
        let params = CheckParams {
            channel,
            is_beta,
            is_rc,
            ..params()
        };

        assert_eq!(params.client_release().unwrap().channel(), expected);
    }

    #[test]
    fn explicit_channel_wins_over_legacy_flags() {
        let params = CheckParams {
            channel: Some("ALPHA".to_string()),
            is_beta: text("true"),
            ..params()
        };

        assert_eq!(
            params.client_release().unwrap().channel(),
            ReleaseChannel::Alpha
        );
    }

    #[rstest]
    #[case(None, Ok(false))]
    #[case(text(""), Ok(false))]
    #[case(text("TRUE"), Ok(true))]
    #[case(Some(FieldValue::Number(1)), Ok(true))]
    #[case(
        Some(FieldValue::Number(2)),
        Err(CheckError::InvalidField { field: "checkUnstable", reason: "'2' is not a boolean".to_string() })
    )]
    fn check_unstable_defaults_to_false(
        #[case] value: Option<FieldValue>,
        #[case] expected: Result<bool, CheckError>,
    ) {
        let params = CheckParams {
            check_unstable: value,
            ..params()
        };

        assert_eq!(params.check_unstable(), expected);
    }

    #[rstest]
    #[case(None, Ok(ResponseFormat::Text))]
    #[case(Some("json"), Ok(ResponseFormat::Json))]
    #[case(Some("TEXT"), Ok(ResponseFormat::Text))]
    fn format_parses_known_values(
        #[case] format: Option<&str>,
        #[case] expected: Result<ResponseFormat, CheckError>,
    ) {
        let params = CheckParams {
            format: format.map(str::to_string),
            ..params()
        };

        assert_eq!(params.format(ResponseFormat::Text), expected);
    }

    #[test]
    fn format_rejects_unknown_value() {
        let params = CheckParams {
            format: Some("xml".to_string()),
            ..params()
        };

        assert!(matches!(
            params.format(ResponseFormat::Text),
            Err(CheckError::InvalidField { field: "format", .. })
        ));
    }
}
