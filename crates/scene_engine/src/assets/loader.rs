//! Loader trait and registry
//!
//! Loaders are registered per resource type through [`LoaderRegistry`] and
//! instantiated once when the [`ResourceCache`](super::ResourceCache) is
//! built. Each factory receives the runtime [`LoaderContext`].

use std::any::{Any, TypeId};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{AssetError, ImageLoader, TextLoader};
use crate::core::AssetConfig;

/// Runtime information handed to every loader factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderContext {
    root_dir: PathBuf,
}

impl LoaderContext {
    /// Create a context resolving keys against `root_dir`
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Build a context from the asset section of the runtime configuration
    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(&config.root_dir)
    }

    /// Directory that relative keys resolve against
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Resolve a resource key to a file path
    ///
    /// Absolute keys are returned unchanged.
    pub fn resolve(&self, key: &str) -> PathBuf {
        let path = Path::new(key);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }
}

impl Default for LoaderContext {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

/// Produces and releases resources of one type
pub trait Loader: 'static {
    /// The resource type this loader yields
    type Resource: Any;

    /// Load the resource identified by `key`
    fn load(&mut self, key: &str) -> Result<Self::Resource, AssetError>;

    /// Release a resource previously produced by [`Loader::load`]
    ///
    /// Called exactly once per cached entry when the cache is unloaded.
    fn release(&mut self, _key: &str, _resource: Rc<Self::Resource>) {}
}

/// Object-safe view of a [`Loader`] used by the cache
pub trait DynLoader {
    /// Type id of the produced resource
    fn resource_type(&self) -> TypeId;

    /// Type name of the produced resource
    fn resource_type_name(&self) -> &'static str;

    /// Load a resource and erase its type
    fn load_dyn(&mut self, key: &str) -> Result<Rc<dyn Any>, AssetError>;

    /// Release a type-erased resource
    fn release_dyn(&mut self, key: &str, resource: Rc<dyn Any>);
}

impl<L: Loader> DynLoader for L {
    fn resource_type(&self) -> TypeId {
        TypeId::of::<L::Resource>()
    }

    fn resource_type_name(&self) -> &'static str {
        std::any::type_name::<L::Resource>()
    }

    fn load_dyn(&mut self, key: &str) -> Result<Rc<dyn Any>, AssetError> {
        let resource: Rc<dyn Any> = Rc::new(self.load(key)?);
        Ok(resource)
    }

    fn release_dyn(&mut self, key: &str, resource: Rc<dyn Any>) {
        match resource.downcast::<L::Resource>() {
            Ok(resource) => self.release(key, resource),
            Err(_) => log::warn!(
                "Loader for {} was asked to release '{}' of another type",
                std::any::type_name::<L::Resource>(),
                key
            ),
        }
    }
}

/// Factory that builds a loader from the runtime context
pub type LoaderFactory = Box<dyn FnOnce(&LoaderContext) -> Box<dyn DynLoader>>;

/// A factory waiting to be instantiated by the cache
pub(crate) struct Registration {
    pub(crate) name: String,
    pub(crate) resource_type: TypeId,
    pub(crate) resource_type_name: &'static str,
    pub(crate) replace: bool,
    pub(crate) factory: LoaderFactory,
}

/// Explicit list of loader factories keyed by resource type
///
/// ```no_run
/// use scene_engine::assets::{LoaderRegistry, ResourceCache, LoaderContext, TextLoader};
///
/// let registry = LoaderRegistry::new().register_default::<TextLoader>();
/// let cache = ResourceCache::new(registry, &LoaderContext::new("resources"))?;
/// # Ok::<(), scene_engine::assets::AssetError>(())
/// ```
#[derive(Default)]
pub struct LoaderRegistry {
    registrations: Vec<Registration>,
}

impl LoaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in image and text loaders
    pub fn with_defaults() -> Self {
        Self::new()
            .register(ImageLoader::new)
            .register(TextLoader::new)
    }

    /// Register a loader factory for `L::Resource`
    pub fn register<L, F>(self, factory: F) -> Self
    where
        L: Loader,
        F: FnOnce(&LoaderContext) -> L + 'static,
    {
        self.push::<L::Resource>(
            std::any::type_name::<L>(),
            false,
            Box::new(move |context: &LoaderContext| -> Box<dyn DynLoader> {
                Box::new(factory(context))
            }),
        )
    }

    /// Register a loader that needs no context
    pub fn register_default<L: Loader + Default>(self) -> Self {
        self.register(|_| L::default())
    }

    /// Register a loader that replaces any earlier one for the same type
    pub fn replace<L, F>(self, factory: F) -> Self
    where
        L: Loader,
        F: FnOnce(&LoaderContext) -> L + 'static,
    {
        self.push::<L::Resource>(
            std::any::type_name::<L>(),
            true,
            Box::new(move |context: &LoaderContext| -> Box<dyn DynLoader> {
                Box::new(factory(context))
            }),
        )
    }

    /// Register a type-erased factory tagged with the resource type `T`
    ///
    /// The cache checks at construction time that the produced loader
    /// really yields `T`.
    pub fn register_tagged<T: Any>(
        self,
        loader_name: impl Into<String>,
        factory: impl FnOnce(&LoaderContext) -> Box<dyn DynLoader> + 'static,
    ) -> Self {
        self.push::<T>(loader_name, false, Box::new(factory))
    }

    /// Number of pending registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Check if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn push<T: Any>(mut self, name: impl Into<String>, replace: bool, factory: LoaderFactory) -> Self {
        self.registrations.push(Registration {
            name: name.into(),
            resource_type: TypeId::of::<T>(),
            resource_type_name: std::any::type_name::<T>(),
            replace,
            factory,
        });
        self
    }

    pub(crate) fn into_registrations(self) -> Vec<Registration> {
        self.registrations
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|r| r.name.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let context = LoaderContext::new("assets");
        assert_eq!(context.resolve("ship.png"), PathBuf::from("assets/ship.png"));

        let absolute = std::env::temp_dir().join("ship.png");
        let key = absolute.to_string_lossy().into_owned();
        assert_eq!(context.resolve(&key), absolute);
    }

    #[test]
    fn test_registry_keeps_order() {
        let registry = LoaderRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        let registrations = registry.into_registrations();
        assert_eq!(registrations[0].resource_type, TypeId::of::<crate::assets::ImageData>());
        assert_eq!(registrations[1].resource_type, TypeId::of::<String>());
    }
}
