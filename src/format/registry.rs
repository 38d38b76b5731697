//! Lookup of export formats by id.

use std::collections::HashMap;

use crate::format::error::FormatError;
use crate::format::formats::{CreateMlFormat, TuriFormat};
use crate::format::traits::ManifestFormat;

/// Export formats keyed by [`ManifestFormat::id`]. Create ML and Turi Create
/// are always present.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn ManifestFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(CreateMlFormat));
        registry.register(Box::new(TuriFormat));

        registry
    }

    /// Add a format, replacing any with the same id.
    pub fn register(&mut self, format: Box<dyn ManifestFormat>) {
        self.formats.insert(format.id(), format);
    }

    pub fn get(&self, id: &str) -> Option<&dyn ManifestFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Like [`FormatRegistry::get`], failing with [`FormatError::UnknownFormat`].
    pub fn require(&self, id: &str) -> Result<&dyn ManifestFormat, FormatError> {
        self.get(id)
            .ok_or_else(|| FormatError::UnknownFormat(id.to_string()))
    }

    /// Registered ids in alphabetical order.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.formats.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::new();

        assert!(registry.get("createml").is_some());
        assert!(registry.get("turi").is_some());
        assert_eq!(registry.ids(), vec!["createml", "turi"]);
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = FormatRegistry::new();
        registry.register(Box::new(TuriFormat));
        assert_eq!(registry.ids().len(), 2);
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::new();
        assert!(matches!(
            registry.require("coco"),
            Err(FormatError::UnknownFormat(id)) if id == "coco"
        ));
    }
}
