// src/fonts.rs
//! Font discovery for the renderer's font reference.
//!
//! Wraps a `fontdb` database: font files dropped into the application's
//! fonts directory take priority, system fonts can be mixed in on request.
//! Resolved font bytes are cached per family since the renderer re-reads
//! them on every render.

use fontdb::{Database, Family, Query};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

pub struct FontLibrary {
    db: Database,
    cache: RwLock<HashMap<String, Arc<Vec<u8>>>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Scans a directory (recursively) for font files.
    pub fn load_fonts_dir(&mut self, dir: &Path) {
        if !dir.exists() {
            debug!("[FONTS] Directory {} does not exist, skipping", dir.display());
            return;
        }
        self.db.load_fonts_dir(dir);
        debug!(
            "[FONTS] {} face(s) known after scanning {}",
            self.db.len(),
            dir.display()
        );
    }

    /// Adds the host system's installed fonts to the database.
    pub fn load_system_fonts(&mut self) {
        self.db.load_system_fonts();
        debug!("[FONTS] {} face(s) known after system scan", self.db.len());
    }

    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }

    /// Distinct family names, sorted, for populating a font picker.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Resolves a family name to its font bytes, caching the result.
    /// Returns `None` when no face matches.
    pub fn font_data(&self, family: &str) -> Option<Arc<Vec<u8>>> {
        if let Some(data) = self.cache.read().ok()?.get(family) {
            return Some(Arc::clone(data));
        }

        let query = Query {
            families: &[Family::Name(family)],
            ..Query::default()
        };
        let id = self.db.query(&query)?;
        let data = self
            .db
            .with_face_data(id, |bytes, _index| Arc::new(bytes.to_vec()))?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(family.to_string(), Arc::clone(&data));
        } else {
            warn!("[FONTS] Cache lock poisoned, resolving {} uncached", family);
        }
        Some(data)
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}
