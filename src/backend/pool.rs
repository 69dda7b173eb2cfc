//! The allocator interface for transient resources.

use thiserror::Error;

use crate::types::ResourceDescriptor;

use super::GpuResource;

/// Errors a [`ResourcePool`] can report when materializing a resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("out of GPU memory while acquiring '{0}'")]
    OutOfMemory(String),
    #[error("unsupported descriptor: {0}")]
    UnsupportedDescriptor(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Source of backing storage for transient frame graph resources.
///
/// The frame graph calls [`acquire`](Self::acquire) exactly once per live
/// transient resource, at the timeline step of the task that produces it, and
/// [`release`](Self::release) exactly once at the step of its last use.
/// Captured resources are released by
/// [`FrameGraph::clear`](crate::FrameGraph::clear) unless the caller took them.
///
/// Whether released resources are recycled, cached across frames or destroyed
/// is entirely up to the implementation.
pub trait ResourcePool {
    /// Materialize a resource matching `descriptor`.
    fn acquire(
        &mut self,
        name: &str,
        descriptor: &ResourceDescriptor,
    ) -> Result<GpuResource, PoolError>;

    /// Return a resource previously obtained from [`acquire`](Self::acquire).
    fn release(&mut self, resource: GpuResource);
}

impl<P: ResourcePool + ?Sized> ResourcePool for Box<P> {
    fn acquire(
        &mut self,
        name: &str,
        descriptor: &ResourceDescriptor,
    ) -> Result<GpuResource, PoolError> {
        (**self).acquire(name, descriptor)
    }

    fn release(&mut self, resource: GpuResource) {
        (**self).release(resource)
    }
}

impl<P: ResourcePool + ?Sized> ResourcePool for &mut P {
    fn acquire(
        &mut self,
        name: &str,
        descriptor: &ResourceDescriptor,
    ) -> Result<GpuResource, PoolError> {
        (**self).acquire(name, descriptor)
    }

    fn release(&mut self, resource: GpuResource) {
        (**self).release(resource)
    }
}
