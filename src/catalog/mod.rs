//! Release catalog: the latest known release per program and channel
//!
//! The catalog is built once at startup, either inline through
//! [`CatalogBuilder`] or from a file through [`loader::load_catalog`], and is
//! never mutated afterwards. Request handlers share it behind an `Arc`.
//!
//! # Modules
//!
//! - [`loader`]: TOML / JSON catalog files and format detection
//! - [`legacy`]: `name=version` line files

pub mod legacy;
pub mod loader;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::version::checker::ReleaseLookup;
use crate::version::error::CatalogError;
use crate::version::types::{ReleaseChannel, VersionDescriptor};

/// Latest release per channel for a single program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseCatalogEntry {
    releases: HashMap<ReleaseChannel, VersionDescriptor>,
}

impl ReleaseCatalogEntry {
    /// Get the release published on a channel
    pub fn get(&self, channel: ReleaseChannel) -> Option<&VersionDescriptor> {
        self.releases.get(&channel)
    }

    /// Releases ordered from most to least stable
    pub fn releases(&self) -> impl Iterator<Item = &VersionDescriptor> {
        ReleaseChannel::BY_STABILITY
            .iter()
            .filter_map(|channel| self.releases.get(channel))
    }

    /// The release on the most stable channel that has one
    pub fn most_stable(&self) -> Option<&VersionDescriptor> {
        self.releases().next()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Returns false, leaving the entry untouched, when the channel is taken
    fn insert(&mut self, release: VersionDescriptor) -> bool {
        if self.releases.contains_key(&release.channel()) {
            return false;
        }
        self.releases.insert(release.channel(), release);
        true
    }
}

/// Read-only table of programs, in the order they were declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    programs: IndexMap<String, ReleaseCatalogEntry>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get(&self, program: &str) -> Option<&ReleaseCatalogEntry> {
        self.programs.get(program)
    }

    pub fn programs(&self) -> impl Iterator<Item = (&str, &ReleaseCatalogEntry)> {
        self.programs
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl ReleaseLookup for Catalog {
    fn has_program(&self, program: &str) -> bool {
        self.programs.contains_key(program)
    }

    fn latest_release(&self, program: &str, channel: ReleaseChannel) -> Option<VersionDescriptor> {
        self.get(program)
            .and_then(|entry| entry.get(channel))
            .cloned()
    }
}

/// Accumulates releases and enforces one release per program and channel
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    programs: IndexMap<String, ReleaseCatalogEntry>,
}

impl CatalogBuilder {
    /// Add an inline release written as `<version>b<build> [LABEL]`
    pub fn release(mut self, program: &str, release: &str) -> Result<Self, CatalogError> {
        let descriptor = release
            .parse()
            .map_err(|e| CatalogError::malformed(program, e))?;
        self.insert(program, program, descriptor)?;
        Ok(self)
    }

    /// Register a program, even one without releases yet
    pub fn program(&mut self, location: &str, program: &str) -> Result<(), CatalogError> {
        let name = program.trim();
        if name.is_empty() {
            return Err(CatalogError::malformed(location, "program name is empty"));
        }
        self.programs.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Add a release, `location` names the source line or record for errors
    pub fn insert(
        &mut self,
        location: &str,
        program: &str,
        release: VersionDescriptor,
    ) -> Result<(), CatalogError> {
        self.program(location, program)?;
        let channel = release.channel();
        let entry = self.programs.entry(program.trim().to_string()).or_default();
        if !entry.insert(release) {
            return Err(CatalogError::malformed(
                location,
                format!(
                    "duplicate {} release for program '{}'",
                    channel,
                    program.trim()
                ),
            ));
        }
        Ok(())
    }

    pub fn build(self) -> Catalog {
        Catalog {
            programs: self.programs,
        }
    }
}
