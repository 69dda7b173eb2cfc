//! Dummy resource pool for testing and development.
//!
//! This pool doesn't allocate GPU memory but hands out valid resource objects
//! with unique ids, and keeps a log of every acquire and release so tests can
//! check the frame graph's contract with its allocator.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::ResourceDescriptor;

use super::{Buffer, GpuResource, PoolError, ResourcePool, Texture};

/// A call made to a [`DummyPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A resource was acquired under the given debug name.
    Acquire { id: u64, name: String },
    /// A resource was released.
    Release { id: u64 },
}

/// Dummy resource pool.
#[derive(Debug, Default)]
pub struct DummyPool {
    next_id: u64,
    /// Live resources: id -> (name, size in bytes).
    live: HashMap<u64, (String, u64)>,
    live_bytes: u64,
    peak_bytes: u64,
    budget: Option<u64>,
    events: Vec<PoolEvent>,
}

impl DummyPool {
    /// Create a new dummy pool with unlimited memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of bytes that may be live at once.
    ///
    /// Acquires that would exceed the budget fail with
    /// [`PoolError::OutOfMemory`].
    pub fn with_budget(mut self, bytes: u64) -> Self {
        self.budget = Some(bytes);
        self
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Dummy"
    }

    /// All calls made to this pool, in order.
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Forget the recorded events. Live resources are kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of acquired resources that were not released yet.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Bytes currently held by live resources.
    pub fn live_bytes(&self) -> u64 {
        self.live_bytes
    }

    /// Largest number of bytes that were live at the same time.
    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }

    /// Number of acquire calls recorded.
    pub fn acquire_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PoolEvent::Acquire { .. }))
            .count()
    }

    /// Number of release calls recorded.
    pub fn release_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PoolEvent::Release { .. }))
            .count()
    }

    /// Check whether a resource with the given debug name is currently live.
    pub fn is_live(&self, name: &str) -> bool {
        self.live.values().any(|(live_name, _)| live_name == name)
    }
}

impl ResourcePool for DummyPool {
    fn acquire(
        &mut self,
        name: &str,
        descriptor: &ResourceDescriptor,
    ) -> Result<GpuResource, PoolError> {
        let bytes = descriptor.byte_size();
        if let Some(budget) = self.budget
            && self.live_bytes + bytes > budget
        {
            return Err(PoolError::OutOfMemory(name.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;

        log::trace!("DummyPool: acquire '{}' #{} ({})", name, id, descriptor);

        self.live.insert(id, (name.to_string(), bytes));
        self.live_bytes += bytes;
        self.peak_bytes = self.peak_bytes.max(self.live_bytes);
        self.events.push(PoolEvent::Acquire {
            id,
            name: name.to_string(),
        });

        Ok(match descriptor {
            ResourceDescriptor::Texture(desc) => {
                GpuResource::Texture(Arc::new(Texture::new(id, desc.clone())))
            }
            ResourceDescriptor::Buffer(desc) => {
                GpuResource::Buffer(Arc::new(Buffer::new(id, desc.clone())))
            }
        })
    }

    fn release(&mut self, resource: GpuResource) {
        let id = resource.id();
        match self.live.remove(&id) {
            Some((name, bytes)) => {
                log::trace!("DummyPool: release '{}' #{}", name, id);
                self.live_bytes -= bytes;
            }
            None => log::warn!("DummyPool: release of unknown resource #{}", id),
        }
        self.events.push(PoolEvent::Release { id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BufferDescriptor, BufferUsage, TextureDescriptor, TextureFormat, TextureUsage};

    #[test]
    fn test_acquire_release_bookkeeping() {
        let mut pool = DummyPool::new();
        let desc = ResourceDescriptor::Buffer(BufferDescriptor::new(128, BufferUsage::STORAGE));

        let a = pool.acquire("a", &desc).unwrap();
        let b = pool.acquire("b", &desc).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(pool.live_count(), 2);
        assert_eq!(pool.live_bytes(), 256);
        assert!(pool.is_live("a"));

        pool.release(a);
        assert_eq!(pool.live_count(), 1);
        assert!(!pool.is_live("a"));
        assert_eq!(pool.peak_bytes(), 256);
        assert_eq!(pool.acquire_count(), 2);
        assert_eq!(pool.release_count(), 1);
    }

    #[test]
    fn test_budget_exhaustion() {
        let mut pool = DummyPool::new().with_budget(1024);
        let desc = ResourceDescriptor::Texture(TextureDescriptor::new_2d(
            32,
            32,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT,
        ));

        let result = pool.acquire("too_big", &desc);
        assert_eq!(result.unwrap_err(), PoolError::OutOfMemory("too_big".into()));
        assert_eq!(pool.live_count(), 0);
        assert!(pool.events().is_empty());
    }
}
