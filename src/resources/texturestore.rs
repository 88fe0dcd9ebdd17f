//! Texture cache.
//!
//! The [`TextureStore`] maps file paths to [`Texture`] handles produced by the
//! platform's [`TextureLoader`]. A path is loaded at most once; failed loads are
//! reported to the caller and never cached, so a later retry hits the loader again.

use log::{debug, error, info};
use rustc_hash::FxHashMap;

use crate::error::AssetError;

/// Opaque identifier of a texture owned by the platform backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// A loaded texture: backend id plus pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Loads and frees textures on behalf of the world.
///
/// Implemented by the platform backends: the raylib backend decodes image files
/// into GPU textures, the headless backend hands out ids with configured sizes.
pub trait TextureLoader {
    fn load(&mut self, path: &str) -> Result<Texture, AssetError>;
    fn release(&mut self, texture: Texture);
}

pub struct TextureStore {
    map: FxHashMap<String, Texture>,
    loader: Box<dyn TextureLoader>,
}

impl TextureStore {
    pub fn new(loader: Box<dyn TextureLoader>) -> Self {
        Self {
            map: FxHashMap::default(),
            loader,
        }
    }

    /// Cached texture for `path`, loading it on first use.
    pub fn get(&mut self, path: &str) -> Result<Texture, AssetError> {
        if let Some(texture) = self.map.get(path) {
            return Ok(*texture);
        }
        debug!("Texture cache miss: {}", path);
        match self.loader.load(path) {
            Ok(texture) => {
                info!(
                    "Loaded texture {} ({}x{}) as {:?}",
                    path, texture.width, texture.height, texture.id
                );
                self.map.insert(path.to_string(), texture);
                Ok(texture)
            }
            Err(e) => {
                error!("Failed to load texture {}: {}", path, e);
                Err(e)
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.map.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Release every cached texture through the loader and empty the cache.
    pub fn unload_all(&mut self) {
        for (path, texture) in self.map.drain() {
            debug!("Releasing texture {}", path);
            self.loader.release(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingLoader {
        loads: Rc<RefCell<Vec<String>>>,
        released: Rc<RefCell<Vec<TextureId>>>,
        next: u32,
    }

    impl TextureLoader for CountingLoader {
        fn load(&mut self, path: &str) -> Result<Texture, AssetError> {
            self.loads.borrow_mut().push(path.to_string());
            if path.contains("missing") {
                return Err(AssetError::NotFound(path.to_string()));
            }
            self.next += 1;
            Ok(Texture {
                id: TextureId(self.next),
                width: 64,
                height: 32,
            })
        }

        fn release(&mut self, texture: Texture) {
            self.released.borrow_mut().push(texture.id);
        }
    }

    #[test]
    fn test_get_caches_by_path() {
        let loader = CountingLoader::default();
        let loads = loader.loads.clone();
        let mut store = TextureStore::new(Box::new(loader));

        let a = store.get("assets/ship.png").unwrap();
        let b = store.get("assets/ship.png").unwrap();
        assert_eq!(a, b);
        assert_eq!(loads.borrow().len(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains("assets/ship.png"));
    }

    #[test]
    fn test_distinct_paths_get_distinct_textures() {
        let mut store = TextureStore::new(Box::new(CountingLoader::default()));
        let a = store.get("assets/ship.png").unwrap();
        let b = store.get("assets/laser.png").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.width, 64);
        assert_eq!(a.height, 32);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let loader = CountingLoader::default();
        let loads = loader.loads.clone();
        let mut store = TextureStore::new(Box::new(loader));

        assert!(store.get("assets/missing.png").is_err());
        assert!(store.get("assets/missing.png").is_err());
        assert_eq!(loads.borrow().len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unload_all_releases_everything() {
        let loader = CountingLoader::default();
        let released = loader.released.clone();
        let mut store = TextureStore::new(Box::new(loader));
        store.get("a.png").unwrap();
        store.get("b.png").unwrap();

        store.unload_all();
        assert!(store.is_empty());
        assert_eq!(released.borrow().len(), 2);
    }
}
