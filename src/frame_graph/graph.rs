//! The frame graph: task and resource arenas plus the build state machine.

use std::sync::Arc;

use crate::backend::{Buffer, GpuResource, ResourcePool, Texture};
use crate::config::FrameGraphConfig;
use crate::profiling::{profile_plot, profile_scope};
use crate::recycle::Recycled;
use crate::types::ResourceDescriptor;

use super::cull;
use super::handle::next_graph_id;
use super::{
    BuildStats, RenderTask, ResourceHandle, ResourceProxy, TaskBuilder, TaskHandle, TaskKind,
    Timeline,
};

/// Lifecycle of a frame graph within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// Tasks and resources are being declared.
    Recording,
    /// `build()` ran; the timeline is available.
    Built,
    /// The timeline was executed.
    Executed,
}

/// Dense storage for the tasks and resources of the current frame.
///
/// Everything here dies together at `clear()`, so tasks and resources refer to
/// each other by index instead of by reference.
#[derive(Debug)]
pub(crate) struct GraphNodes {
    pub(crate) graph_id: u32,
    /// Bumped by every `clear()` so handles of earlier frames are rejected.
    pub(crate) epoch: u32,
    pub(crate) next_resource_id: u64,
    pub(crate) state: GraphState,
    pub(crate) tasks: Vec<RenderTask>,
    pub(crate) resources: Vec<ResourceProxy>,
}

impl GraphNodes {
    fn new() -> Self {
        Self {
            graph_id: next_graph_id(),
            epoch: 0,
            next_resource_id: 0,
            state: GraphState::Recording,
            tasks: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub(crate) fn assert_recording(&self, operation: &str) {
        assert!(
            self.state == GraphState::Recording,
            "{} is not allowed after the frame graph was built; call clear() first",
            operation
        );
    }

    /// Validate a resource handle and return its arena index.
    pub(crate) fn resource_index(&self, handle: ResourceHandle) -> usize {
        assert!(
            handle.graph() == self.graph_id,
            "resource handle belongs to another frame graph"
        );
        assert!(
            handle.epoch() == self.epoch,
            "stale resource handle from an earlier frame"
        );
        assert!(
            handle.index() < self.resources.len(),
            "invalid resource handle"
        );
        handle.index()
    }

    /// Validate a task handle and return its arena index.
    pub(crate) fn task_index(&self, handle: TaskHandle) -> usize {
        assert!(
            handle.graph() == self.graph_id,
            "task handle belongs to another frame graph"
        );
        assert!(
            handle.epoch() == self.epoch,
            "stale task handle from an earlier frame"
        );
        assert!(handle.index() < self.tasks.len(), "invalid task handle");
        handle.index()
    }

    fn next_resource_handle(&mut self) -> (u64, ResourceHandle) {
        let id = self.next_resource_id;
        self.next_resource_id += 1;
        let handle = ResourceHandle::new(self.graph_id, self.epoch, self.resources.len() as u32);
        (id, handle)
    }

    pub(crate) fn push_transient(
        &mut self,
        name: String,
        creator: TaskHandle,
        descriptor: ResourceDescriptor,
    ) -> ResourceHandle {
        let (id, handle) = self.next_resource_handle();
        log::trace!(
            "Task '{}' produces '{}' ({})",
            self.tasks[creator.index()].name(),
            name,
            descriptor
        );
        self.resources.push(ResourceProxy::create_transient(
            id, handle, name, creator, descriptor,
        ));
        handle
    }

    pub(crate) fn push_external(&mut self, name: String, resource: GpuResource) -> ResourceHandle {
        let (id, handle) = self.next_resource_handle();
        log::trace!("Imported '{}' ({})", name, resource.kind());
        self.resources
            .push(ResourceProxy::import_external(id, handle, name, resource));
        handle
    }

    pub(crate) fn capture(&mut self, resource: ResourceHandle) {
        self.assert_recording("capture");
        let index = self.resource_index(resource);
        self.resources[index].mark_captured();
    }
}

/// A per-frame graph of render tasks and the resources they exchange.
///
/// # Construction
///
/// Declare tasks in the order they should run. Each task produces transient
/// resources and reads or writes resources of earlier tasks or imported ones:
///
/// ```
/// use redlilium_frame_graph::{
///     DummyPool, FrameGraph, TaskKind, TextureDescriptor, TextureFormat, TextureUsage,
/// };
///
/// let mut graph = FrameGraph::new(DummyPool::new());
/// let desc = TextureDescriptor::new_2d(
///     1920,
///     1080,
///     TextureFormat::Rgba16Float,
///     TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
/// );
///
/// let hdr = graph.add_task("scene", TaskKind::Graphics).produce_texture("hdr", desc.clone());
///
/// let mut tonemap = graph.add_task("tonemap", TaskKind::Graphics);
/// tonemap.read(hdr);
/// let ldr = tonemap.produce_texture("ldr", desc);
/// graph.capture(ldr);
///
/// graph.build();
/// assert_eq!(graph.timeline().len(), 2);
/// ```
///
/// # Frame lifecycle
///
/// `add_task`/`import_*` → [`build`](Self::build) → [`execute`](Self::execute)
/// → [`clear`](Self::clear). Culled tasks never run and their resources are
/// never acquired from the pool.
pub struct FrameGraph<P: ResourcePool> {
    config: FrameGraphConfig,
    pub(crate) nodes: GraphNodes,
    pub(crate) timeline: Recycled<Timeline>,
    stats: BuildStats,
    /// Storage acquired for transient resources, indexed like `nodes.resources`.
    pub(crate) physical: Vec<Option<GpuResource>>,
    pub(crate) pool: P,
}

impl<P: ResourcePool> FrameGraph<P> {
    /// Create a frame graph bound to `pool` with the default configuration.
    pub fn new(pool: P) -> Self {
        Self::with_config(pool, FrameGraphConfig::default())
    }

    /// Create a frame graph bound to `pool`.
    pub fn with_config(pool: P, config: FrameGraphConfig) -> Self {
        Self {
            config,
            nodes: GraphNodes::new(),
            timeline: Recycled::default(),
            stats: BuildStats::default(),
            physical: Vec::new(),
            pool,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FrameGraphConfig {
        &self.config
    }

    /// Get the bound resource pool.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Get the bound resource pool mutably.
    pub fn pool_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> GraphState {
        self.nodes.state
    }

    /// Register a new task. Insertion order is execution order.
    ///
    /// # Panics
    ///
    /// Panics if the graph was built and not cleared.
    pub fn add_task(&mut self, name: impl Into<String>, kind: TaskKind) -> TaskBuilder<'_> {
        self.nodes.assert_recording("add_task");
        let handle = TaskHandle::new(
            self.nodes.graph_id,
            self.nodes.epoch,
            self.nodes.tasks.len() as u32,
        );
        self.nodes
            .tasks
            .push(RenderTask::new(name.into(), kind, handle));
        TaskBuilder::new(&mut self.nodes, handle)
    }

    /// Reopen a task of the current frame to declare more resources.
    pub fn task(&mut self, handle: TaskHandle) -> TaskBuilder<'_> {
        self.nodes.task_index(handle);
        TaskBuilder::new(&mut self.nodes, handle)
    }

    /// Import a caller-owned resource for this frame.
    pub fn import_external(
        &mut self,
        name: impl Into<String>,
        resource: GpuResource,
    ) -> ResourceHandle {
        self.nodes.assert_recording("import");
        self.nodes.push_external(name.into(), resource)
    }

    /// Import a caller-owned texture for this frame.
    pub fn import_texture(
        &mut self,
        name: impl Into<String>,
        texture: Arc<Texture>,
    ) -> ResourceHandle {
        self.import_external(name, GpuResource::Texture(texture))
    }

    /// Import a caller-owned buffer for this frame.
    pub fn import_buffer(&mut self, name: impl Into<String>, buffer: Arc<Buffer>) -> ResourceHandle {
        self.import_external(name, GpuResource::Buffer(buffer))
    }

    /// Mark a resource as needed beyond this frame.
    ///
    /// A captured resource is never culled, which keeps its producer alive, and
    /// is never released by the timeline. After execution the caller can take
    /// it with [`take_captured`](Self::take_captured); otherwise
    /// [`clear`](Self::clear) returns it to the pool. Idempotent.
    pub fn capture(&mut self, resource: ResourceHandle) {
        self.nodes.capture(resource);
    }

    /// Cull unused tasks and resources and compute the timeline.
    ///
    /// # Panics
    ///
    /// Panics if called twice without [`clear`](Self::clear) in between, or if
    /// validation is enabled and the timeline breaks an invariant.
    pub fn build(&mut self) -> &BuildStats {
        profile_scope!("frame_graph_build");
        assert!(
            self.nodes.state == GraphState::Recording,
            "frame graph '{}' was already built; call clear() before building again",
            self.config.label
        );
        self.nodes.state = GraphState::Built;

        let GraphNodes {
            tasks, resources, ..
        } = &mut self.nodes;

        cull::seed_reference_counts(tasks, resources);
        if self.config.culling {
            cull::cull_unused(tasks, resources);
        }

        let timeline = self.timeline.activate();
        timeline.emit(tasks, resources);

        self.stats = BuildStats::collect(tasks, resources, timeline);
        log::debug!(
            "Built frame graph '{}': {}/{} tasks, {}/{} resources culled, {} steps",
            self.config.label,
            self.stats.culled_tasks,
            self.stats.tasks,
            self.stats.culled_resources,
            self.stats.resources,
            self.stats.steps
        );
        profile_plot!("frame_graph_tasks", self.stats.tasks);
        profile_plot!("frame_graph_culled_tasks", self.stats.culled_tasks);
        profile_plot!("frame_graph_transient_bytes", self.stats.transient_bytes);

        if self.config.validate
            && let Err(err) = self.validate_timeline()
        {
            panic!("frame graph '{}': {}", self.config.label, err);
        }
        if self.config.log_timeline {
            for line in self.timeline_report().lines() {
                log::debug!("{}", line);
            }
        }

        &self.stats
    }

    /// Check whether [`build`](Self::build) ran this frame.
    pub fn is_built(&self) -> bool {
        self.nodes.state != GraphState::Recording
    }

    /// The timeline computed by the last build. Empty before `build()`.
    pub fn timeline(&self) -> &Timeline {
        self.timeline.inner()
    }

    /// Statistics of the last build.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// All tasks of the current frame in insertion order.
    pub fn tasks(&self) -> &[RenderTask] {
        &self.nodes.tasks
    }

    /// All resources of the current frame in creation order.
    pub fn resources(&self) -> &[ResourceProxy] {
        &self.nodes.resources
    }

    /// Get a task of the current frame.
    pub fn render_task(&self, handle: TaskHandle) -> &RenderTask {
        &self.nodes.tasks[self.nodes.task_index(handle)]
    }

    /// Get a resource of the current frame.
    pub fn resource(&self, handle: ResourceHandle) -> &ResourceProxy {
        &self.nodes.resources[self.nodes.resource_index(handle)]
    }

    /// Check if the last build removed a task.
    pub fn is_task_culled(&self, handle: TaskHandle) -> bool {
        self.render_task(handle).is_culled()
    }

    /// Check if the last build removed a resource.
    pub fn is_resource_culled(&self, handle: ResourceHandle) -> bool {
        self.resource(handle).is_culled()
    }

    /// Reset the graph for the next frame.
    ///
    /// Captured resources the caller did not take are released to the pool,
    /// as is any storage left behind by an execution that failed midway. All
    /// tasks and resources are dropped and every handle of this frame becomes
    /// invalid.
    pub fn clear(&mut self) {
        profile_scope!("frame_graph_clear");
        for (index, slot) in self.physical.iter_mut().enumerate() {
            if let Some(resource) = slot.take() {
                let proxy = &self.nodes.resources[index];
                if proxy.is_captured() {
                    log::trace!("Releasing captured '{}'", proxy.name());
                } else {
                    log::warn!(
                        "Releasing '{}' left over from an interrupted execution",
                        proxy.name()
                    );
                }
                self.pool.release(resource);
            }
        }
        self.physical.clear();

        self.nodes.tasks.clear();
        self.nodes.resources.clear();
        self.nodes.epoch = self.nodes.epoch.wrapping_add(1);
        self.nodes.state = GraphState::Recording;
        self.timeline.recycle();
        self.stats = BuildStats::default();
    }
}

impl<P: ResourcePool> Drop for FrameGraph<P> {
    fn drop(&mut self) {
        if self.physical.iter().any(Option::is_some) {
            self.clear();
        }
    }
}

static_assertions::assert_impl_all!(FrameGraph<crate::backend::DummyPool>: Send);

impl<P: ResourcePool + std::fmt::Debug> std::fmt::Debug for FrameGraph<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameGraph")
            .field("label", &self.config.label)
            .field("state", &self.nodes.state)
            .field("tasks", &self.nodes.tasks.len())
            .field("resources", &self.nodes.resources.len())
            .field("pool", &self.pool)
            .finish()
    }
}
