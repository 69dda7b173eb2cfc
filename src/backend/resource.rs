//! GPU resource objects handed out by resource pools.

use std::sync::Arc;

use crate::types::{
    BufferDescriptor, Extent3d, ResourceDescriptor, ResourceKind, TextureDescriptor,
    TextureFormat,
};

/// A GPU texture.
///
/// Textures are created by a [`ResourcePool`](super::ResourcePool) (transient)
/// or by the caller (imported) and are shared through `Arc`.
pub struct Texture {
    id: u64,
    descriptor: TextureDescriptor,
}

impl Texture {
    /// Create a texture object for a backend-specific resource id.
    pub fn new(id: u64, descriptor: TextureDescriptor) -> Self {
        Self { id, descriptor }
    }

    /// Backend-specific resource id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the texture size.
    pub fn size(&self) -> Extent3d {
        self.descriptor.size
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.size.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.size.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .field("usage", &self.descriptor.usage)
            .finish()
    }
}

/// A GPU buffer.
pub struct Buffer {
    id: u64,
    descriptor: BufferDescriptor,
}

impl Buffer {
    /// Create a buffer object for a backend-specific resource id.
    pub fn new(id: u64, descriptor: BufferDescriptor) -> Self {
        Self { id, descriptor }
    }

    /// Backend-specific resource id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the buffer descriptor.
    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id)
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .finish()
    }
}

static_assertions::assert_impl_all!(Texture: Send, Sync);
static_assertions::assert_impl_all!(Buffer: Send, Sync);

/// A materialized GPU resource of any kind.
#[derive(Debug, Clone)]
pub enum GpuResource {
    /// A texture.
    Texture(Arc<Texture>),
    /// A buffer.
    Buffer(Arc<Buffer>),
}

impl GpuResource {
    /// Backend-specific resource id.
    pub fn id(&self) -> u64 {
        match self {
            Self::Texture(t) => t.id(),
            Self::Buffer(b) => b.id(),
        }
    }

    /// Kind of this resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Texture(_) => ResourceKind::Texture,
            Self::Buffer(_) => ResourceKind::Buffer,
        }
    }

    /// Copy of the resource's descriptor.
    pub fn descriptor(&self) -> ResourceDescriptor {
        match self {
            Self::Texture(t) => ResourceDescriptor::Texture(t.descriptor().clone()),
            Self::Buffer(b) => ResourceDescriptor::Buffer(b.descriptor().clone()),
        }
    }

    /// Get this resource as a texture, if it is one.
    pub fn as_texture(&self) -> Option<&Arc<Texture>> {
        if let Self::Texture(t) = self {
            Some(t)
        } else {
            None
        }
    }

    /// Get this resource as a buffer, if it is one.
    pub fn as_buffer(&self) -> Option<&Arc<Buffer>> {
        if let Self::Buffer(b) = self {
            Some(b)
        } else {
            None
        }
    }
}

impl From<Arc<Texture>> for GpuResource {
    fn from(texture: Arc<Texture>) -> Self {
        Self::Texture(texture)
    }
}

impl From<Arc<Buffer>> for GpuResource {
    fn from(buffer: Arc<Buffer>) -> Self {
        Self::Buffer(buffer)
    }
}
