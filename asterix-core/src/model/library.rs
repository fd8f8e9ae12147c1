//! The process-wide (but not singleton — `spec.md` §9) category catalogue.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::LoadError;
use crate::xml;

use super::category::CategoryDescription;

/// An immutable-after-load catalogue of category descriptions.
///
/// Lifecycle per `spec.md` §4.2/§5: built up by one or more `load_*` calls
/// from a single thread, then frozen (by [`Self::freeze`], called by
/// [`crate::Parser::new`]) before any parsing begins. A `load_*` call
/// after freezing is a programming error, surfaced as
/// [`LoadError::AlreadyInitialized`] rather than silently ignored or
/// mutating shared state a concurrent parser may already be reading.
#[derive(Debug, Default)]
pub struct DescriptionLibrary {
    categories: BTreeMap<u8, CategoryDescription>,
    frozen: bool,
}

impl DescriptionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library directly from already-constructed categories,
    /// bypassing XML loading entirely. Useful for tests and for embedding
    /// categories assembled by some other means than the XML loader.
    pub fn from_categories(categories: impl IntoIterator<Item = CategoryDescription>) -> Self {
        let mut lib = Self::default();
        for category in categories {
            lib.categories.insert(category.id, category);
        }
        lib
    }

    /// Loads every `*.xml` file directly under `dir` as a category
    /// description. Stops at (and propagates) the first failure; the
    /// library is left exactly as it was before the call in that case,
    /// per `spec.md` §4.3 ("failure to validate is a fatal initialization
    /// error and the library remains empty").
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<(), LoadError> {
        if self.frozen {
            return Err(LoadError::AlreadyInitialized);
        }
        let display = dir.display().to_string();
        let read_dir = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: display,
            source,
        })?;
        let mut paths: Vec<_> = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("xml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = BTreeMap::new();
        for path in paths {
            let category = xml::load_category_file(&path)?;
            if loaded.insert(category.id, category).is_some() {
                return Err(LoadError::InvalidXml {
                    path: path.display().to_string(),
                    reason: "duplicate category id within directory".into(),
                });
            }
        }
        self.categories.extend(loaded);
        Ok(())
    }

    /// Loads a single category description XML file.
    pub fn load_category(&mut self, xml_path: &Path) -> Result<(), LoadError> {
        if self.frozen {
            return Err(LoadError::AlreadyInitialized);
        }
        let category = xml::load_category_file(xml_path)?;
        self.categories.insert(category.id, category);
        Ok(())
    }

    /// Loads a single category description already held in memory, e.g. an
    /// XML document embedded as a string constant or received over a
    /// channel other than the filesystem. `label` is used only for error
    /// messages.
    pub fn load_category_str(&mut self, xml: &str, label: &str) -> Result<(), LoadError> {
        if self.frozen {
            return Err(LoadError::AlreadyInitialized);
        }
        let category = xml::parse_category_str(xml, label)?;
        self.categories.insert(category.id, category);
        Ok(())
    }

    /// Marks the library read-only. Called once by [`crate::Parser::new`];
    /// idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn category(&self, id: u8) -> Option<&CategoryDescription> {
        self.categories.get(&id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
