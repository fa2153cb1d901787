use crate::app::ports::ProductCatalog;
use indexmap::IndexMap;
use std::path::Path;
use tracing::warn;

/// Product catalog snapshot loaded from a JSON object of
/// `{"<gin>": "<display name>"}` entries.
///
/// Doubles as the product existence oracle for reference validation.
pub struct JsonProductCatalog {
    products: IndexMap<String, String>,
}

impl JsonProductCatalog {
    pub fn empty() -> Self {
        Self {
            products: IndexMap::new(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            products: entries.into_iter().collect(),
        }
    }

    pub fn from_file(path: &Path) -> crate::common::error::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let products: IndexMap<String, String> = serde_json::from_str(&raw)?;
        Ok(Self { products })
    }

    /// Load a catalog, degrading to an empty snapshot when the source is
    /// unreadable. The run proceeds with a conservative catalog rather than
    /// aborting.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(
                    "failed to load product catalog from {}: {err}; proceeding with empty catalog",
                    path.display()
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for JsonProductCatalog {
    fn exists(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    fn product_name(&self, product_id: &str) -> Option<String> {
        self.products
            .get(product_id)
            .filter(|name| !name.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn catalog_answers_existence_and_names() {
        let catalog = JsonProductCatalog::from_entries([
            ("PS1".to_string(), "Aristo 500ix".to_string()),
            ("F1".to_string(), String::new()),
        ]);

        assert!(catalog.exists("PS1"));
        assert!(catalog.exists("F1"));
        assert!(!catalog.exists("GHOST"));
        assert_eq!(catalog.product_name("PS1").as_deref(), Some("Aristo 500ix"));
        // Empty display names fall through to downstream fallbacks.
        assert_eq!(catalog.product_name("F1"), None);
    }

    #[test]
    fn unreadable_file_degrades_to_empty_catalog() {
        let catalog = JsonProductCatalog::load_or_empty(Path::new("/nonexistent/catalog.json"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn loads_catalog_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"PS1": "Warrior 500i"}}"#).expect("write");

        let catalog = JsonProductCatalog::from_file(file.path()).expect("load");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.product_name("PS1").as_deref(), Some("Warrior 500i"));
    }
}
