use crate::ir::Location;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Source generated for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// See [`Location::key`].
    pub key: String,
    pub location: Location,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: &'static str,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Output surface shared by every declaration of a pass.
///
/// Units are keyed by declaration, so publishing the same declaration again
/// replaces its unit. Safe to share between worker threads.
#[derive(Debug, Default)]
pub struct Publication {
    units: Mutex<BTreeMap<String, GeneratedUnit>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Publication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the unit previously published under the same key.
    pub fn publish(&self, unit: GeneratedUnit) -> Option<GeneratedUnit> {
        self.units
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit.key.clone(), unit)
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    pub fn unit(&self, key: &str) -> Option<GeneratedUnit> {
        self.units
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Published units ordered by key.
    pub fn units(&self) -> Vec<GeneratedUnit> {
        self.units
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Reported diagnostics in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(item: &str, source: &str) -> GeneratedUnit {
        let location = Location {
            crate_name: "app".into(),
            module_path: vec![],
            item: item.into(),
            line: 0,
            column: 0,
            anchor: None,
        };
        GeneratedUnit {
            key: location.key(),
            location,
            source: source.into(),
        }
    }

    #[test]
    fn publishing_again_replaces_the_unit() {
        let publication = Publication::new();
        assert_eq!(publication.publish(unit("Quad", "first")), None);
        let previous = publication.publish(unit("Quad", "second")).unwrap();
        assert_eq!(previous.source, "first");
        publication.publish(unit("Pair", "third"));

        let units = publication.units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].key, "app/Pair.fixed-array.rs");
        assert_eq!(
            publication.unit("app/Quad.fixed-array.rs").unwrap().source,
            "second"
        );
    }

    #[test]
    fn diagnostic_display() {
        let diagnostic = Diagnostic {
            id: "FA0001",
            severity: Severity::Error,
            location: unit("Quad", "").location,
            message: "boom".into(),
        };
        assert_eq!(diagnostic.to_string(), "error[FA0001]: boom");
    }
}
