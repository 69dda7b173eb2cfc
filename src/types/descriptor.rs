//! Kind-tagged resource descriptors.

use super::{BufferDescriptor, TextureDescriptor};

/// Kind of a frame graph resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A texture (render target, depth buffer, storage image, ...).
    Texture,
    /// A buffer or buffer view.
    Buffer,
}

impl ResourceKind {
    /// Short lowercase name used in logs and graph exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Buffer => "buffer",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a frame graph resource.
///
/// This is the value handed to the
/// [`ResourcePool`](crate::backend::ResourcePool) when a transient resource is
/// acquired. Equal descriptors describe interchangeable resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceDescriptor {
    /// Texture descriptor.
    Texture(TextureDescriptor),
    /// Buffer descriptor.
    Buffer(BufferDescriptor),
}

impl ResourceDescriptor {
    /// Get the resource kind described by this descriptor.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Texture(_) => ResourceKind::Texture,
            Self::Buffer(_) => ResourceKind::Buffer,
        }
    }

    /// Get this descriptor as a texture descriptor, if it is one.
    pub fn as_texture(&self) -> Option<&TextureDescriptor> {
        if let Self::Texture(desc) = self {
            Some(desc)
        } else {
            None
        }
    }

    /// Get this descriptor as a buffer descriptor, if it is one.
    pub fn as_buffer(&self) -> Option<&BufferDescriptor> {
        if let Self::Buffer(desc) = self {
            Some(desc)
        } else {
            None
        }
    }

    /// Approximate memory footprint of the described resource in bytes.
    pub fn byte_size(&self) -> u64 {
        match self {
            Self::Texture(desc) => desc.byte_size(),
            Self::Buffer(desc) => desc.size,
        }
    }
}

impl From<TextureDescriptor> for ResourceDescriptor {
    fn from(desc: TextureDescriptor) -> Self {
        Self::Texture(desc)
    }
}

impl From<BufferDescriptor> for ResourceDescriptor {
    fn from(desc: BufferDescriptor) -> Self {
        Self::Buffer(desc)
    }
}

impl std::fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Texture(desc) => write!(f, "{:?} {}", desc.format, desc.size),
            Self::Buffer(desc) => write!(f, "{} bytes", desc.size),
        }
    }
}
