//! Fixed-size catalog of remote models offered in the selection menu

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The selection menu has room for five models
pub const MAX_CATALOG_ENTRIES: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog holds at most {max} models, got {count}")]
    TooManyEntries { count: usize, max: usize },
    #[error("model {index} has an empty URL")]
    EmptyUrl { index: usize },
}

/// A model the user can pick from the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Label shown in the menu; the URL's file stem when left empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Remote glTF/GLB location
    pub url: String,
}

impl ModelEntry {
    /// Create an entry labelled with the URL's file stem
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = name_from_url(&url);
        Self { name, url }
    }
}

/// Ordered, index-addressed list of models
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    /// Validate `entries`, naming any unnamed entry after its URL
    pub fn new(mut entries: Vec<ModelEntry>) -> Result<Self, CatalogError> {
        if entries.len() > MAX_CATALOG_ENTRIES {
            return Err(CatalogError::TooManyEntries {
                count: entries.len(),
                max: MAX_CATALOG_ENTRIES,
            });
        }
        if let Some(index) = entries.iter().position(|e| e.url.trim().is_empty()) {
            return Err(CatalogError::EmptyUrl { index });
        }
        for entry in entries.iter_mut().filter(|e| e.name.trim().is_empty()) {
            entry.name = name_from_url(&entry.url);
        }
        Ok(Self { entries })
    }

    pub fn from_urls<I, S>(urls: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(urls.into_iter().map(ModelEntry::from_url).collect())
    }

    pub fn get(&self, index: usize) -> Option<&ModelEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive a display name from the last path segment of a URL
fn name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    let stem = match file.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file,
    };
    if stem.is_empty() {
        url.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_rejects_more_than_five() {
        let urls: Vec<String> = (0..6).map(|i| format!("https://example.com/m{}.glb", i)).collect();
        assert_eq!(
            ModelCatalog::from_urls(urls),
            Err(CatalogError::TooManyEntries { count: 6, max: 5 })
        );
    }

    #[test]
    fn test_catalog_rejects_blank_url() {
        let result = ModelCatalog::from_urls(["https://example.com/a.glb", "  "]);
        assert_eq!(result, Err(CatalogError::EmptyUrl { index: 1 }));
    }

    #[test]
    fn test_catalog_lookup_is_bounded() {
        let catalog = ModelCatalog::from_urls([
            "https://example.com/models/Duck.glb",
            "https://example.com/models/Lantern.glb?raw=true",
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name, "Duck");
        assert_eq!(catalog.get(1).unwrap().name, "Lantern");
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_unnamed_entry_takes_url_stem() {
        let catalog = ModelCatalog::new(vec![
            ModelEntry {
                name: String::new(),
                url: "https://example.com/assets/Chair.glb".to_string(),
            },
            ModelEntry {
                name: "Big lamp".to_string(),
                url: "https://example.com/assets/lamp.glb".to_string(),
            },
        ])
        .unwrap();

        assert_eq!(catalog.get(0).unwrap().name, "Chair");
        assert_eq!(catalog.get(1).unwrap().name, "Big lamp");
    }

    #[test]
    fn test_name_from_url_fallbacks() {
        assert_eq!(name_from_url("https://example.com/scene"), "scene");
        assert_eq!(name_from_url("https://example.com/dir/"), "dir");
        assert_eq!(name_from_url("model.gltf#frag"), "model");
    }
}
