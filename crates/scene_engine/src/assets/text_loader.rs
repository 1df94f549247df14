//! UTF-8 text resources

use std::rc::Rc;

use crate::assets::{AssetError, Loader, LoaderContext};

/// Loads whole files as `String`
#[derive(Debug, Clone)]
pub struct TextLoader {
    context: LoaderContext,
}

impl TextLoader {
    /// Create a loader resolving keys through `context`
    pub fn new(context: &LoaderContext) -> Self {
        Self {
            context: context.clone(),
        }
    }
}

impl Default for TextLoader {
    fn default() -> Self {
        Self::new(&LoaderContext::default())
    }
}

impl Loader for TextLoader {
    type Resource = String;

    fn load(&mut self, key: &str) -> Result<String, AssetError> {
        let path = self.context.resolve(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(AssetError::Io(e)),
        }
    }

    fn release(&mut self, key: &str, _resource: Rc<String>) {
        log::trace!("Released text '{}'", key);
    }
}
