//! Timeline execution.

use std::any::Any;
use std::sync::Arc;

use crate::backend::{Buffer, GpuResource, ResourcePool, Texture};
use crate::error::FrameGraphResult;
use crate::profiling::{profile_scope, profile_scope_dynamic};
use crate::types::ResourceDescriptor;

use super::graph::{GraphNodes, GraphState};
use super::{FrameGraph, ResourceHandle, ResourceOrigin, TaskHandle, TaskKind};

/// What a task's work closure sees while it runs.
///
/// Gives access to the physical resources the task declared and to the
/// caller's command stream.
pub struct TaskContext<'a> {
    nodes: &'a GraphNodes,
    physical: &'a [Option<GpuResource>],
    task: TaskHandle,
    commands: &'a mut dyn Any,
}

impl<'a> TaskContext<'a> {
    /// Name of the running task.
    pub fn name(&self) -> &str {
        self.nodes.tasks[self.task.index()].name()
    }

    /// Kind of the running task.
    pub fn kind(&self) -> TaskKind {
        self.nodes.tasks[self.task.index()].kind()
    }

    /// Handle of the running task.
    pub fn handle(&self) -> TaskHandle {
        self.task
    }

    /// Get the physical resource behind `resource`.
    ///
    /// Returns `None` for a transient resource without storage, which is the
    /// case when its creator was culled.
    ///
    /// # Panics
    ///
    /// Panics if the task did not declare `resource`.
    pub fn resource(&self, resource: ResourceHandle) -> Option<&GpuResource> {
        let index = self.nodes.resource_index(resource);
        let task = &self.nodes.tasks[self.task.index()];
        assert!(
            task.uses(resource),
            "task '{}' accesses '{}' without declaring it",
            task.name(),
            self.nodes.resources[index].name()
        );
        match self.nodes.resources[index].origin() {
            ResourceOrigin::External(external) => Some(external),
            ResourceOrigin::Transient { .. } => self.physical[index].as_ref(),
        }
    }

    /// Get the physical texture behind `resource`, if it is a texture.
    pub fn texture(&self, resource: ResourceHandle) -> Option<&Arc<Texture>> {
        self.resource(resource).and_then(GpuResource::as_texture)
    }

    /// Get the physical buffer behind `resource`, if it is a buffer.
    pub fn buffer(&self, resource: ResourceHandle) -> Option<&Arc<Buffer>> {
        self.resource(resource).and_then(GpuResource::as_buffer)
    }

    /// Get the descriptor of any resource of this frame.
    pub fn descriptor(&self, resource: ResourceHandle) -> &ResourceDescriptor {
        self.nodes.resources[self.nodes.resource_index(resource)].descriptor()
    }

    /// Get the command stream passed to `execute()`, if it has type `C`.
    pub fn commands<C: Any>(&mut self) -> Option<&mut C> {
        self.commands.downcast_mut::<C>()
    }
}

impl<P: ResourcePool> FrameGraph<P> {
    /// Run the timeline built by [`build`](Self::build).
    ///
    /// For every step the produced resources are acquired from the pool, the
    /// task's work runs with `commands` available through
    /// [`TaskContext::commands`], and resources whose last use was this step
    /// go back to the pool. Culled tasks never run.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGraphError::Pool`](crate::FrameGraphError::Pool) when the
    /// pool fails to acquire a resource. Execution stops there; resources
    /// already acquired are returned to the pool by [`clear`](Self::clear).
    ///
    /// # Panics
    ///
    /// Panics if the graph was not built, or was already executed this frame.
    pub fn execute(&mut self, commands: &mut dyn Any) -> FrameGraphResult<()> {
        profile_scope!("frame_graph_execute");
        match self.nodes.state {
            GraphState::Recording => panic!("execute() called before build()"),
            GraphState::Executed => {
                panic!("frame graph was already executed; call clear() first")
            }
            GraphState::Built => {}
        }
        self.nodes.state = GraphState::Executed;

        let FrameGraph {
            nodes,
            timeline,
            physical,
            pool,
            ..
        } = self;
        physical.clear();
        physical.resize(nodes.resources.len(), None);

        for step in timeline.inner().steps() {
            for &handle in step.acquires() {
                let proxy = &nodes.resources[handle.index()];
                let resource = pool
                    .acquire(proxy.name(), proxy.descriptor())
                    .inspect_err(|err| {
                        log::error!("Failed to acquire '{}': {}", proxy.name(), err)
                    })?;
                log::trace!("Acquired '{}' as #{}", proxy.name(), resource.id());
                physical[handle.index()] = Some(resource);
            }

            let task = step.task();
            if let Some(work) = nodes.tasks[task.index()].work.take() {
                profile_scope_dynamic!(nodes.tasks[task.index()].name());
                let mut ctx = TaskContext {
                    nodes: &*nodes,
                    physical: physical.as_slice(),
                    task,
                    commands: &mut *commands,
                };
                work(&mut ctx);
            }

            for &handle in step.releases() {
                if let Some(resource) = physical[handle.index()].take() {
                    log::trace!("Released '{}'", nodes.resources[handle.index()].name());
                    pool.release(resource);
                }
            }
        }

        Ok(())
    }

    /// Take the physical storage of a captured resource after execution.
    ///
    /// The caller owns the result; `clear()` will not release it. Returns
    /// `None` if the resource is not captured, was not acquired, or was taken
    /// already.
    pub fn take_captured(&mut self, resource: ResourceHandle) -> Option<GpuResource> {
        let index = self.nodes.resource_index(resource);
        if !self.nodes.resources[index].is_captured() {
            return None;
        }
        self.physical.get_mut(index).and_then(Option::take)
    }

    /// Peek at the physical storage of a captured resource after execution.
    pub fn captured_resource(&self, resource: ResourceHandle) -> Option<&GpuResource> {
        let index = self.nodes.resource_index(resource);
        if !self.nodes.resources[index].is_captured() {
            return None;
        }
        self.physical.get(index).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::{DummyPool, PoolEvent};
    use crate::types::{BufferDescriptor, BufferUsage, TextureDescriptor, TextureFormat, TextureUsage};
    use crate::FrameGraphError;

    fn target() -> TextureDescriptor {
        TextureDescriptor::new_2d(
            64,
            64,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
    }

    #[test]
    fn test_execute_runs_live_tasks_in_order() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Graphics);
        let color = a.produce_texture("color", target());
        a.execute(|ctx| ctx.commands::<Vec<String>>().unwrap().push("a".into()));

        graph
            .add_task("dead", TaskKind::Graphics)
            .execute(|ctx| ctx.commands::<Vec<String>>().unwrap().push("dead".into()));

        let mut b = graph.add_task("b", TaskKind::Graphics);
        b.read(color);
        let out = b.produce_texture("out", target());
        b.capture(out).execute(move |ctx| {
            assert!(ctx.texture(color).is_some());
            assert!(ctx.texture(out).is_some());
            ctx.commands::<Vec<String>>().unwrap().push("b".into());
        });

        graph.build();
        let mut log: Vec<String> = Vec::new();
        graph.execute(&mut log).unwrap();

        assert_eq!(log, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(graph.pool().acquire_count(), 2);
        assert_eq!(graph.pool().release_count(), 1);
        assert!(graph.pool().is_live("out"));
    }

    #[test]
    fn test_external_resource_visible_to_task() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let backbuffer = graph.import_texture("backbuffer", Arc::new(Texture::new(99, target())));
        graph
            .add_task("present", TaskKind::Graphics)
            .write(backbuffer)
            .execute(move |ctx| {
                assert_eq!(ctx.texture(backbuffer).map(|t| t.id()), Some(99));
                assert_eq!(ctx.name(), "present");
                assert_eq!(ctx.kind(), TaskKind::Graphics);
            });

        graph.build();
        graph.execute(&mut ()).unwrap();

        assert!(graph.pool().events().is_empty());
    }

    #[test]
    fn test_take_captured_skips_release_on_clear() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let history = graph
            .add_task("taa", TaskKind::Compute)
            .produce_buffer("history", BufferDescriptor::new(512, BufferUsage::STORAGE));
        graph.capture(history);

        graph.build();
        graph.execute(&mut ()).unwrap();
        assert!(graph.captured_resource(history).is_some());

        let taken = graph.take_captured(history);
        assert!(taken.is_some());
        assert!(graph.take_captured(history).is_none());

        graph.clear();
        assert_eq!(graph.pool().release_count(), 0);
        assert_eq!(graph.pool().live_count(), 1);
    }

    #[test]
    fn test_clear_releases_untaken_capture() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let history = graph
            .add_task("taa", TaskKind::Compute)
            .produce_buffer("history", BufferDescriptor::new(512, BufferUsage::STORAGE));
        graph.capture(history);

        graph.build();
        graph.execute(&mut ()).unwrap();
        graph.clear();

        assert_eq!(
            graph.pool().events().last(),
            Some(&PoolEvent::Release { id: 0 })
        );
        assert_eq!(graph.pool().live_count(), 0);
    }

    #[test]
    fn test_pool_failure_stops_execution() {
        let pool = DummyPool::new().with_budget(64 * 64 * 4);
        let mut graph = FrameGraph::new(pool);
        let mut a = graph.add_task("a", TaskKind::Graphics);
        let first = a.produce_texture("first", target());
        let second = a.produce_texture("second", target());
        graph.capture(first);
        graph.capture(second);

        graph.build();
        let err = graph.execute(&mut ()).unwrap_err();

        assert!(matches!(err, FrameGraphError::Pool(_)));
        assert_eq!(graph.pool().live_count(), 1);
        graph.clear();
        assert_eq!(graph.pool().live_count(), 0);
    }

    #[test]
    #[should_panic(expected = "before build")]
    fn test_execute_without_build_panics() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let _ = graph.execute(&mut ());
    }

    #[test]
    #[should_panic(expected = "already executed")]
    fn test_execute_twice_panics() {
        let mut graph = FrameGraph::new(DummyPool::new());
        graph.build();
        graph.execute(&mut ()).unwrap();
        let _ = graph.execute(&mut ());
    }

    #[test]
    #[should_panic(expected = "without declaring it")]
    fn test_undeclared_access_panics() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Graphics);
        let color = a.produce_texture("color", target());
        a.capture(color);
        let mut b = graph.add_task("b", TaskKind::Graphics);
        let other = b.produce_texture("other", target());
        b.capture(other).execute(move |ctx| {
            let _ = ctx.texture(color);
        });

        graph.build();
        graph.execute(&mut ()).unwrap();
    }
}
