//! Texture handle acquisition

use std::collections::HashMap;

/// Opaque handle to a texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Hands out one stable handle per texture name
#[derive(Debug, Default)]
pub struct TextureRegistry {
    handles: HashMap<String, TextureHandle>,
    names: Vec<String>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `name`, allocating one on first request
    pub fn acquire(&mut self, name: &str) -> TextureHandle {
        if let Some(handle) = self.handles.get(name) {
            return *handle;
        }
        let handle = TextureHandle(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.handles.insert(name.to_string(), handle);
        self.names.push(name.to_string());
        log::debug!("Registered texture '{}' as {:?}", name, handle);
        handle
    }

    /// Name a handle was acquired for
    pub fn name(&self, handle: TextureHandle) -> Option<&str> {
        self.names.get(handle.0 as usize).map(String::as_str)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
