//! Resource proxies: the graph's view of one logical resource for one frame.

use crate::backend::GpuResource;
use crate::types::{ResourceDescriptor, ResourceKind};

use super::{ResourceHandle, TaskHandle};

/// Resource access type for dependency tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAccess {
    /// Consumes the previous contents.
    Read,
    /// Overwrites the resource without depending on its contents.
    Write,
    /// Consumes and overwrites.
    ReadWrite,
}

impl ResourceAccess {
    /// Check if this access includes reading.
    pub fn reads(&self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Check if this access includes writing.
    pub fn writes(&self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Who owns the storage behind a resource proxy.
#[derive(Debug, Clone)]
pub enum ResourceOrigin {
    /// Produced by a task; storage comes from the graph's resource pool.
    Transient {
        /// The task that produces the resource.
        creator: TaskHandle,
    },
    /// Supplied by the caller; the graph never acquires or releases it.
    External(GpuResource),
}

/// A logical resource of the current frame.
///
/// Proxies are created by [`TaskBuilder::produce`](super::TaskBuilder::produce)
/// (transient) or by the `import_*` methods of
/// [`FrameGraph`](super::FrameGraph) (external), and live until the graph is
/// cleared.
#[derive(Debug)]
pub struct ResourceProxy {
    id: u64,
    handle: ResourceHandle,
    name: String,
    descriptor: ResourceDescriptor,
    origin: ResourceOrigin,
    /// Tasks reading the resource, in declaration order. Read-write users
    /// appear here and in `writers`.
    readers: Vec<TaskHandle>,
    writers: Vec<TaskHandle>,
    captured: bool,
    /// Number of readers still alive, computed by `build()`.
    pub(crate) refs: u32,
    pub(crate) culled: bool,
}

impl ResourceProxy {
    pub(crate) fn create_transient(
        id: u64,
        handle: ResourceHandle,
        name: String,
        creator: TaskHandle,
        descriptor: ResourceDescriptor,
    ) -> Self {
        Self {
            id,
            handle,
            name,
            descriptor,
            origin: ResourceOrigin::Transient { creator },
            readers: Vec::new(),
            writers: Vec::new(),
            captured: false,
            refs: 0,
            culled: false,
        }
    }

    pub(crate) fn import_external(
        id: u64,
        handle: ResourceHandle,
        name: String,
        resource: GpuResource,
    ) -> Self {
        Self {
            id,
            handle,
            name,
            descriptor: resource.descriptor(),
            origin: ResourceOrigin::External(resource),
            readers: Vec::new(),
            writers: Vec::new(),
            captured: false,
            refs: 0,
            culled: false,
        }
    }

    pub(crate) fn register_read(&mut self, task: TaskHandle) {
        self.readers.push(task);
    }

    pub(crate) fn register_write(&mut self, task: TaskHandle) {
        self.writers.push(task);
    }

    pub(crate) fn register_read_write(&mut self, task: TaskHandle) {
        self.readers.push(task);
        self.writers.push(task);
    }

    pub(crate) fn mark_captured(&mut self) {
        self.captured = true;
    }

    /// Transient, uncaptured resources are the only ones culling can remove.
    pub(crate) fn is_collectable(&self) -> bool {
        self.is_transient() && !self.captured
    }

    /// Numeric id, unique within the owning graph across frames.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Handle of this resource.
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind()
    }

    /// Shape of the resource.
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Ownership of the resource.
    pub fn origin(&self) -> &ResourceOrigin {
        &self.origin
    }

    /// Check if the graph owns this resource's storage.
    pub fn is_transient(&self) -> bool {
        matches!(self.origin, ResourceOrigin::Transient { .. })
    }

    /// Check if this resource was imported.
    pub fn is_external(&self) -> bool {
        matches!(self.origin, ResourceOrigin::External(_))
    }

    /// Check if this resource must outlive the frame.
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Check if the last build removed this resource.
    pub fn is_culled(&self) -> bool {
        self.culled
    }

    /// The task producing this resource, `None` for external resources.
    pub fn creator(&self) -> Option<TaskHandle> {
        match self.origin {
            ResourceOrigin::Transient { creator } => Some(creator),
            ResourceOrigin::External(_) => None,
        }
    }

    /// The imported GPU resource, `None` for transient resources.
    pub fn external(&self) -> Option<&GpuResource> {
        match &self.origin {
            ResourceOrigin::External(resource) => Some(resource),
            ResourceOrigin::Transient { .. } => None,
        }
    }

    /// Tasks reading this resource, in declaration order.
    pub fn readers(&self) -> &[TaskHandle] {
        &self.readers
    }

    /// Tasks writing this resource, in declaration order.
    pub fn writers(&self) -> &[TaskHandle] {
        &self.writers
    }
}
