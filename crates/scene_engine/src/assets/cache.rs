//! Type-indexed resource cache
//!
//! Every key resolves to exactly one instance for the lifetime of the cache.
//! Entries are released through the loader that produced them when the
//! cache is unloaded.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use super::{AssetError, DynLoader, LoaderContext, LoaderRegistry};

/// Loader instance owned by the cache
struct LoaderSlot {
    name: String,
    loader: Box<dyn DynLoader>,
}

/// One memoized resource
struct CacheEntry {
    key: String,
    resource_type: TypeId,
    resource_type_name: &'static str,
    resource: Rc<dyn Any>,
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Loads answered from the memo table
    pub hits: u64,
    /// Loads that went to a loader
    pub misses: u64,
}

/// Memoizing resource cache with one loader per resource type
pub struct ResourceCache {
    loaders: HashMap<TypeId, LoaderSlot>,
    entries: Vec<CacheEntry>,
    index: HashMap<String, usize>,
    stats: CacheStats,
    unloaded: bool,
}

impl ResourceCache {
    /// Instantiate every registered loader and build the cache
    ///
    /// Fails with [`AssetError::InvalidLoaderType`] when a factory produces
    /// a loader for another type than it was registered for, and with
    /// [`AssetError::DuplicateLoader`] when two loaders claim the same type
    /// without an explicit [`LoaderRegistry::replace`].
    pub fn new(registry: LoaderRegistry, context: &LoaderContext) -> Result<Self, AssetError> {
        let mut loaders: HashMap<TypeId, LoaderSlot> = HashMap::new();

        for registration in registry.into_registrations() {
            let loader = (registration.factory)(context);

            if loader.resource_type() != registration.resource_type {
                return Err(AssetError::InvalidLoaderType {
                    loader: registration.name,
                    expected: registration.resource_type_name,
                    actual: loader.resource_type_name(),
                });
            }

            if let Some(existing) = loaders.get(&registration.resource_type) {
                if !registration.replace {
                    return Err(AssetError::DuplicateLoader {
                        resource: registration.resource_type_name,
                        existing: existing.name.clone(),
                    });
                }
                log::info!(
                    "Loader {} replaces {} for {}",
                    registration.name,
                    existing.name,
                    registration.resource_type_name
                );
            } else {
                log::debug!(
                    "Registered loader {} for {}",
                    registration.name,
                    registration.resource_type_name
                );
            }

            loaders.insert(
                registration.resource_type,
                LoaderSlot {
                    name: registration.name,
                    loader,
                },
            );
        }

        log::info!("Resource cache ready with {} loader(s)", loaders.len());

        Ok(Self {
            loaders,
            entries: Vec::new(),
            index: HashMap::new(),
            stats: CacheStats::default(),
            unloaded: false,
        })
    }

    /// Cache without any loaders
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
            entries: Vec::new(),
            index: HashMap::new(),
            stats: CacheStats::default(),
            unloaded: false,
        }
    }

    /// Load `key` as a `T`, memoizing the result
    ///
    /// Keys are global across resource types, so asking for a cached key
    /// with another type fails with [`AssetError::TypeMismatch`]. A failed
    /// load leaves no entry behind.
    pub fn load<T: Any>(&mut self, key: &str) -> Result<Rc<T>, AssetError> {
        if self.unloaded {
            return Err(AssetError::Unloaded);
        }

        if let Some(&slot) = self.index.get(key) {
            let entry = &self.entries[slot];
            let resource = Rc::clone(&entry.resource)
                .downcast::<T>()
                .map_err(|_| AssetError::TypeMismatch {
                    key: key.to_string(),
                    expected: std::any::type_name::<T>(),
                    actual: entry.resource_type_name,
                })?;
            self.stats.hits += 1;
            return Ok(resource);
        }

        let type_id = TypeId::of::<T>();
        let slot = self
            .loaders
            .get_mut(&type_id)
            .ok_or(AssetError::NoLoaderForType(std::any::type_name::<T>()))?;

        let resource = slot.loader.load_dyn(key)?;
        let typed = Rc::clone(&resource)
            .downcast::<T>()
            .map_err(|_| AssetError::InvalidLoaderType {
                loader: slot.name.clone(),
                expected: std::any::type_name::<T>(),
                actual: slot.loader.resource_type_name(),
            })?;

        log::debug!("Loaded '{}' with {}", key, slot.name);
        self.stats.misses += 1;
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push(CacheEntry {
            key: key.to_string(),
            resource_type: type_id,
            resource_type_name: std::any::type_name::<T>(),
            resource,
        });

        Ok(typed)
    }

    /// Return a cached resource without loading it
    pub fn get<T: Any>(&self, key: &str) -> Option<Rc<T>> {
        let slot = *self.index.get(key)?;
        Rc::clone(&self.entries[slot].resource).downcast::<T>().ok()
    }

    /// Check if `key` has been loaded
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Check if a loader is registered for `T`
    pub fn has_loader<T: Any>(&self) -> bool {
        self.loaders.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered loaders
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Check if [`ResourceCache::unload`] has run
    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Release every entry through its loader, in load order
    ///
    /// Afterwards every load fails with [`AssetError::Unloaded`]. Calling
    /// this again does nothing. Returns the number of released entries.
    pub fn unload(&mut self) -> usize {
        if self.unloaded {
            return 0;
        }
        self.unloaded = true;
        self.index.clear();

        let released = self.entries.len();
        for entry in self.entries.drain(..) {
            match self.loaders.get_mut(&entry.resource_type) {
                Some(slot) => slot.loader.release_dyn(&entry.key, entry.resource),
                None => log::warn!("No loader left to release '{}'", entry.key),
            }
        }

        log::info!("Resource cache unloaded, released {} resource(s)", released);
        released
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("loaders", &self.loaders.len())
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .field("unloaded", &self.unloaded)
            .finish()
    }
}
