//! Parser for legacy `name=version` catalog files
//!
//! Each non-blank line maps a program to one release:
//!
//! ```text
//! # comment
//! Foo=1.2
//! Foo=1.3b7 BETA
//! Bar = 2.0.1b12
//! ```
//!
//! A bare version is a stable release with build 0.

use regex::Regex;
use tracing::debug;

use crate::catalog::{Catalog, CatalogBuilder};
use crate::version::error::CatalogError;
use crate::version::types::VersionDescriptor;

pub struct LegacyLinesParser {
    /// Regex for an entry line: `name = release`
    entry_re: Regex,
}

impl LegacyLinesParser {
    pub fn new() -> Self {
        Self {
            entry_re: Regex::new(r"^\s*([^=]*?)\s*=\s*(.*?)\s*$")
                .expect("legacy entry pattern is valid"),
        }
    }

    pub fn parse(&self, content: &str) -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::default();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let location = format!("line {}", index + 1);
            let Some(captures) = self.entry_re.captures(line) else {
                return Err(CatalogError::malformed(location, "expected name=version"));
            };

            let name = &captures[1];
            let release: VersionDescriptor = captures[2]
                .parse()
                .map_err(|e| CatalogError::malformed(&location, e))?;

            debug!("{}: {} => {}", location, name, release);
            builder.insert(&location, name, release)?;
        }

        Ok(builder.build())
    }
}

impl Default for LegacyLinesParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::checker::ReleaseLookup;
    use crate::version::types::ReleaseChannel;
    use rstest::rstest;

    #[test]
    fn parse_reads_programs_and_channels() {
        let content = "# releases\nFoo=1.2\n\nFoo=1.3b7 BETA\nBar = 2.0.1b12\r\n";

        let catalog = LegacyLinesParser::new().parse(content).unwrap();

        assert_eq!(catalog.len(), 2);
        let foo_stable = catalog
            .latest_release("Foo", ReleaseChannel::Stable)
            .unwrap();
        assert_eq!(foo_stable.to_string(), "1.2b0");
        let foo_beta = catalog.latest_release("Foo", ReleaseChannel::Beta).unwrap();
        assert_eq!(foo_beta.to_string(), "1.3b7 BETA");
        let bar = catalog.latest_release("Bar", ReleaseChannel::Stable).unwrap();
        assert_eq!(bar.build(), 12);
    }

    #[test]
    fn parse_empty_content_yields_empty_catalog() {
        let catalog = LegacyLinesParser::new().parse("\n# nothing yet\n").unwrap();

        assert!(catalog.is_empty());
    }

    #[rstest]
    #[case("Foo 1.2", "line 1")]
    #[case("Foo=1.2\nBar=abc", "line 2")]
    #[case("=1.2", "line 1")]
    #[case("Foo=", "line 1")]
    #[case("Foo=1.2b1 NIGHTLY", "line 1")]
    #[case("Foo=1.2\n\nFoo=1.3", "line 3")]
    fn parse_rejects_malformed_line(#[case] content: &str, #[case] expected_location: &str) {
        let result = LegacyLinesParser::new().parse(content);

        let Err(CatalogError::MalformedEntry { location, .. }) = result else {
            panic!("expected MalformedEntry");
        };
        assert_eq!(location, expected_location);
    }
}
