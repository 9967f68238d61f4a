use crate::service::ServiceUnit;
use crate::ComposeError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_SCHEMA_VERSION: &str = "3.8";

/// The aggregate document: an ordered collection of service units plus the
/// network declarations derived from them.
///
/// Rendering sorts the stored units by name in place, so the order observable
/// through [`Manifest::units`] after a render is the rendered order. The
/// manifest exclusively owns its units; callers mutate it only between
/// renders (`render` takes `&mut self`, there is no internal locking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    schema_version: String,
    units: Vec<ServiceUnit>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::with_schema_version(DEFAULT_SCHEMA_VERSION)
    }

    pub fn with_schema_version(version: impl Into<String>) -> Self {
        Self {
            schema_version: version.into(),
            units: Vec::new(),
        }
    }

    /// Build a pre-populated manifest, enforcing name uniqueness.
    pub fn from_units(units: Vec<ServiceUnit>) -> Result<Self, ComposeError> {
        let mut manifest = Self::new();
        for unit in units {
            manifest.push(unit)?;
        }
        Ok(manifest)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn units(&self) -> &[ServiceUnit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Append a unit. Names must stay unique: rendered blocks are keyed by
    /// service name and a duplicate would shadow its sibling.
    pub fn push(&mut self, unit: ServiceUnit) -> Result<(), ComposeError> {
        if self.units.iter().any(|u| u.name() == unit.name()) {
            return Err(ComposeError::DuplicateService(unit.name().to_owned()));
        }
        self.units.push(unit);
        Ok(())
    }

    /// Remove the unit with the given name, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<ServiceUnit> {
        let idx = self.units.iter().position(|u| u.name() == name)?;
        Some(self.units.remove(idx))
    }

    /// Render the full document as lines.
    ///
    /// The header is `version: '<schema_version>'`, a blank line, and
    /// `services:`; unit blocks follow in ascending name order; the network
    /// section, when any unit declares a network, closes the document.
    pub fn render(&mut self) -> Vec<String> {
        let network_lines = self.network_section();

        let mut lines = vec![
            format!("version: '{}'", self.schema_version),
            String::new(),
            "services:".to_owned(),
        ];

        self.units.sort_by(|a, b| a.name().cmp(b.name()));

        for unit in &self.units {
            lines.extend(unit.render_block());
        }
        lines.extend(network_lines);
        lines
    }

    /// Every network referenced by any unit, listed once, sorted lexically.
    fn network_section(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        for unit in &self.units {
            for network in unit.networks() {
                if !seen.contains(&network.as_str()) {
                    seen.push(network);
                }
            }
        }
        if seen.is_empty() {
            return Vec::new();
        }
        seen.sort_unstable();

        let mut lines = vec!["networks:".to_owned()];
        for network in seen {
            lines.push(format!("  {network}:"));
            lines.push(format!("    name: {network}"));
            lines.push("    driver: bridge".to_owned());
        }
        lines
    }

    /// Write the newline-joined render output to `path`.
    ///
    /// The content goes through a temp file in the target directory and a
    /// rename, so a failed write leaves any existing file untouched.
    pub fn write_to_file(&mut self, path: &Path) -> Result<(), ComposeError> {
        let content = self.render().join("\n");

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| ComposeError::Io(e.error))?;
        Ok(())
    }
}
