//! Render tasks and the builder used to declare their resources.

use crate::types::{BufferDescriptor, ResourceDescriptor, TextureDescriptor};

use super::executor::TaskContext;
use super::graph::GraphNodes;
use super::{ResourceAccess, ResourceHandle, TaskHandle};

/// Work recorded by a task, invoked once by the executor if the task survives
/// culling.
pub type TaskWork = Box<dyn FnOnce(&mut TaskContext<'_>) + Send>;

/// Kind of GPU work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Rasterization work (vertex/fragment shaders).
    Graphics,
    /// Compute shader dispatches.
    Compute,
    /// Copy operations.
    Transfer,
    /// Arbitrary caller code that needs resources scheduled around it.
    Callback,
}

impl TaskKind {
    /// Short lowercase name used in logs and graph exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graphics => "graphics",
            Self::Compute => "compute",
            Self::Transfer => "transfer",
            Self::Callback => "callback",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of GPU work in a frame graph.
pub struct RenderTask {
    name: String,
    kind: TaskKind,
    handle: TaskHandle,
    pub(crate) produced: Vec<ResourceHandle>,
    pub(crate) reads: Vec<ResourceHandle>,
    pub(crate) writes: Vec<ResourceHandle>,
    pub(crate) read_writes: Vec<ResourceHandle>,
    /// Number of outputs still alive, computed by `build()`.
    pub(crate) refs: u32,
    pub(crate) culled: bool,
    pub(crate) work: Option<TaskWork>,
}

impl RenderTask {
    pub(crate) fn new(name: String, kind: TaskKind, handle: TaskHandle) -> Self {
        Self {
            name,
            kind,
            handle,
            produced: Vec::new(),
            reads: Vec::new(),
            writes: Vec::new(),
            read_writes: Vec::new(),
            refs: 0,
            culled: false,
            work: None,
        }
    }

    /// Number of declared outputs: produced, written and read-written resources.
    pub(crate) fn output_count(&self) -> u32 {
        (self.produced.len() + self.writes.len() + self.read_writes.len()) as u32
    }

    /// Every resource the task touches, in the order releases are emitted.
    pub(crate) fn used_resources(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.reads
            .iter()
            .chain(&self.writes)
            .chain(&self.read_writes)
            .chain(&self.produced)
            .copied()
    }

    /// Check whether the task declared any use of `resource`.
    pub(crate) fn uses(&self, resource: ResourceHandle) -> bool {
        self.used_resources().any(|h| h == resource)
    }

    /// Get the task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the task kind.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Handle of this task.
    pub fn handle(&self) -> TaskHandle {
        self.handle
    }

    /// Resources created by this task.
    pub fn produced(&self) -> &[ResourceHandle] {
        &self.produced
    }

    /// Resources this task only reads.
    pub fn reads(&self) -> &[ResourceHandle] {
        &self.reads
    }

    /// Resources this task only overwrites.
    pub fn writes(&self) -> &[ResourceHandle] {
        &self.writes
    }

    /// Resources this task reads and overwrites.
    pub fn read_writes(&self) -> &[ResourceHandle] {
        &self.read_writes
    }

    /// Check if the last build removed this task.
    pub fn is_culled(&self) -> bool {
        self.culled
    }

    /// Check if the task has work attached that was not executed yet.
    pub fn has_work(&self) -> bool {
        self.work.is_some()
    }
}

impl std::fmt::Debug for RenderTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTask")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("produced", &self.produced.len())
            .field("reads", &self.reads.len())
            .field("writes", &self.writes.len())
            .field("read_writes", &self.read_writes.len())
            .field("culled", &self.culled)
            .finish()
    }
}

/// Declares the resources of a task.
///
/// Returned by [`FrameGraph::add_task`](super::FrameGraph::add_task) and
/// [`FrameGraph::task`](super::FrameGraph::task). All methods panic once the
/// graph has been built.
///
/// # Example
///
/// ```
/// use redlilium_frame_graph::{
///     DummyPool, FrameGraph, TaskKind, TextureDescriptor, TextureFormat, TextureUsage,
/// };
///
/// let mut graph = FrameGraph::new(DummyPool::new());
///
/// let mut gbuffer = graph.add_task("gbuffer", TaskKind::Graphics);
/// let albedo = gbuffer.produce_texture(
///     "albedo",
///     TextureDescriptor::new_2d(1920, 1080, TextureFormat::Rgba8Unorm, TextureUsage::RENDER_ATTACHMENT),
/// );
///
/// graph
///     .add_task("lighting", TaskKind::Compute)
///     .read(albedo)
///     .execute(move |ctx| assert!(ctx.texture(albedo).is_some()));
/// ```
pub struct TaskBuilder<'g> {
    nodes: &'g mut GraphNodes,
    task: TaskHandle,
}

impl<'g> TaskBuilder<'g> {
    pub(crate) fn new(nodes: &'g mut GraphNodes, task: TaskHandle) -> Self {
        Self { nodes, task }
    }

    /// Handle of the task being built.
    pub fn handle(&self) -> TaskHandle {
        self.task
    }

    /// Create a new transient resource owned by this task.
    pub fn produce(
        &mut self,
        name: impl Into<String>,
        descriptor: impl Into<ResourceDescriptor>,
    ) -> ResourceHandle {
        let name = name.into();
        self.nodes.assert_recording("produce");
        let handle = self
            .nodes
            .push_transient(name, self.task, descriptor.into());
        self.nodes.tasks[self.task.index()].produced.push(handle);
        handle
    }

    /// Create a new transient texture owned by this task.
    pub fn produce_texture(
        &mut self,
        name: impl Into<String>,
        descriptor: TextureDescriptor,
    ) -> ResourceHandle {
        self.produce(name, descriptor)
    }

    /// Create a new transient buffer owned by this task.
    pub fn produce_buffer(
        &mut self,
        name: impl Into<String>,
        descriptor: BufferDescriptor,
    ) -> ResourceHandle {
        self.produce(name, descriptor)
    }

    /// Declare a use of `resource`.
    ///
    /// The same resource must not be declared twice with the same access; the
    /// graph does not deduplicate.
    ///
    /// # Panics
    ///
    /// Panics if the graph was built, if the handle belongs to another graph
    /// or frame, or if the resource is produced by this task or a later one.
    pub fn use_resource(&mut self, resource: ResourceHandle, access: ResourceAccess) -> &mut Self {
        self.nodes.assert_recording("use");
        let index = self.nodes.resource_index(resource);
        let proxy = &mut self.nodes.resources[index];
        let task = &mut self.nodes.tasks[self.task.index()];

        if let Some(creator) = proxy.creator() {
            assert!(
                creator < self.task,
                "task '{}' uses resource '{}' which is not produced by an earlier task",
                task.name(),
                proxy.name()
            );
        }

        match access {
            ResourceAccess::Read => {
                proxy.register_read(self.task);
                task.reads.push(resource);
            }
            ResourceAccess::Write => {
                proxy.register_write(self.task);
                task.writes.push(resource);
            }
            ResourceAccess::ReadWrite => {
                proxy.register_read_write(self.task);
                task.read_writes.push(resource);
            }
        }

        log::trace!(
            "Task '{}' uses '{}' ({:?})",
            task.name(),
            proxy.name(),
            access
        );
        self
    }

    /// Declare that this task reads `resource`.
    pub fn read(&mut self, resource: ResourceHandle) -> &mut Self {
        self.use_resource(resource, ResourceAccess::Read)
    }

    /// Declare that this task overwrites `resource` without reading it.
    pub fn write(&mut self, resource: ResourceHandle) -> &mut Self {
        self.use_resource(resource, ResourceAccess::Write)
    }

    /// Declare that this task reads and overwrites `resource`.
    pub fn read_write(&mut self, resource: ResourceHandle) -> &mut Self {
        self.use_resource(resource, ResourceAccess::ReadWrite)
    }

    /// Mark `resource` as captured, see [`FrameGraph::capture`](super::FrameGraph::capture).
    pub fn capture(&mut self, resource: ResourceHandle) -> &mut Self {
        self.nodes.capture(resource);
        self
    }

    /// Attach the work this task performs. Replaces earlier work.
    pub fn execute<F>(&mut self, work: F) -> &mut Self
    where
        F: FnOnce(&mut TaskContext<'_>) + Send + 'static,
    {
        self.nodes.assert_recording("execute");
        self.nodes.tasks[self.task.index()].work = Some(Box::new(work));
        self
    }
}
