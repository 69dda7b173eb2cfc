//! Reference-count culling.
//!
//! A task's reference count is the number of outputs it declares (produced,
//! written and read-written resources). A resource's reference count is the
//! number of reads by tasks that do not also write it; a task modifying a
//! resource in place only observes its own output. Transient, uncaptured
//! resources nobody else reads are removed, which drops one reference from
//! their creator and from every task writing them. A task reaching zero is
//! removed and drops one reference from everything it reads. This repeats
//! until nothing changes.
//!
//! External and captured resources are never collected, so their writers and
//! producers always survive.

use crate::profiling::profile_function;

use super::{RenderTask, ResourceProxy};

/// Reset culling state and compute the initial reference counts.
pub(crate) fn seed_reference_counts(tasks: &mut [RenderTask], resources: &mut [ResourceProxy]) {
    for task in tasks.iter_mut() {
        task.refs = task.output_count();
        task.culled = false;
    }
    for resource in resources.iter_mut() {
        let writers = resource.writers();
        let refs = resource
            .readers()
            .iter()
            .filter(|reader| !writers.contains(*reader))
            .count();
        resource.refs = refs as u32;
        resource.culled = false;
    }
}

/// Remove every task and resource that contributes to no surviving output.
///
/// Expects counts from [`seed_reference_counts`]. Iterative; a resource enters
/// the worklist once, when its count first reaches zero.
pub(crate) fn cull_unused(tasks: &mut [RenderTask], resources: &mut [ResourceProxy]) {
    profile_function!();
    let mut worklist: Vec<usize> = resources
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_collectable() && r.refs == 0)
        .map(|(i, _)| i)
        .collect();

    for index in 0..tasks.len() {
        if tasks[index].refs == 0 && !tasks[index].culled {
            cull_task(index, tasks, resources, &mut worklist);
        }
    }

    while let Some(resource) = worklist.pop() {
        if let Some(creator) = resources[resource].creator() {
            release_output(creator.index(), tasks, resources, &mut worklist);
        }
        for w in 0..resources[resource].writers().len() {
            let writer = resources[resource].writers()[w];
            release_output(writer.index(), tasks, resources, &mut worklist);
        }
    }

    for resource in resources.iter_mut() {
        resource.culled = resource
            .creator()
            .is_some_and(|creator| tasks[creator.index()].culled);
    }
}

fn release_output(
    task: usize,
    tasks: &mut [RenderTask],
    resources: &mut [ResourceProxy],
    worklist: &mut Vec<usize>,
) {
    if tasks[task].refs == 0 {
        return;
    }
    tasks[task].refs -= 1;
    if tasks[task].refs == 0 {
        cull_task(task, tasks, resources, worklist);
    }
}

fn cull_task(
    task: usize,
    tasks: &mut [RenderTask],
    resources: &mut [ResourceProxy],
    worklist: &mut Vec<usize>,
) {
    tasks[task].culled = true;
    log::trace!("Culling task '{}'", tasks[task].name());

    // Read-write uses hold no reference on their resource, see `seed_reference_counts`.
    let current = &tasks[task];
    let inputs = current
        .reads
        .iter()
        .filter(|h| !current.writes.contains(*h) && !current.read_writes.contains(*h));
    for handle in inputs {
        let resource = &mut resources[handle.index()];
        if resource.refs == 0 {
            continue;
        }
        resource.refs -= 1;
        if resource.refs == 0 && resource.is_collectable() {
            worklist.push(handle.index());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::DummyPool;
    use crate::frame_graph::{FrameGraph, TaskKind};
    use crate::types::{BufferDescriptor, BufferUsage};

    fn buffer() -> BufferDescriptor {
        BufferDescriptor::new(256, BufferUsage::STORAGE)
    }

    #[test]
    fn test_unread_chain_is_culled() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let mut b = graph.add_task("b", TaskKind::Compute);
        b.read(x);
        let b_handle = b.handle();
        let y = b.produce_buffer("y", buffer());

        graph.build();

        assert!(graph.is_task_culled(a_handle));
        assert!(graph.is_task_culled(b_handle));
        assert!(graph.is_resource_culled(x));
        assert!(graph.is_resource_culled(y));
    }

    #[test]
    fn test_captured_output_keeps_chain() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let mut b = graph.add_task("b", TaskKind::Compute);
        b.read(x);
        let y = b.produce_buffer("y", buffer());
        graph.capture(y);

        graph.build();

        assert!(!graph.is_task_culled(a_handle));
        assert!(!graph.is_resource_culled(x));
        assert!(!graph.is_resource_culled(y));
    }

    #[test]
    fn test_task_without_outputs_is_culled() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let a = graph.add_task("a", TaskKind::Callback).handle();
        graph.build();
        assert!(graph.is_task_culled(a));
        assert!(graph.timeline().is_empty());
    }

    #[test]
    fn test_culled_resource_drops_writer_reference() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let x = graph
            .add_task("a", TaskKind::Compute)
            .produce_buffer("x", buffer());
        let writer = graph.add_task("w", TaskKind::Compute).write(x).handle();

        graph.build();

        assert!(graph.is_task_culled(writer));
        assert!(graph.is_resource_culled(x));
    }

    #[test]
    fn test_reads_of_culled_task_are_released() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let kept = a.produce_buffer("kept", buffer());
        graph.capture(kept);

        let reader = graph.add_task("reader", TaskKind::Compute).read(x).handle();

        graph.build();

        assert!(graph.is_task_culled(reader));
        assert!(!graph.is_task_culled(a_handle));
        assert!(!graph.is_resource_culled(x));
        assert_eq!(graph.resource(x).refs, 0);
    }

    #[test]
    fn test_read_write_sink_is_culled() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let b = graph.add_task("b", TaskKind::Compute).read_write(x).handle();

        graph.build();

        assert!(graph.is_task_culled(a_handle));
        assert!(graph.is_task_culled(b));
        assert!(graph.is_resource_culled(x));
        assert!(graph.timeline().is_empty());
    }

    #[test]
    fn test_read_then_write_sink_is_culled() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let b = graph
            .add_task("b", TaskKind::Compute)
            .read(x)
            .write(x)
            .handle();

        graph.build();

        assert!(graph.is_task_culled(a_handle));
        assert!(graph.is_task_culled(b));
        assert!(graph.is_resource_culled(x));
    }

    #[test]
    fn test_chain_into_read_write_sink_is_culled() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let mut a = graph.add_task("a", TaskKind::Compute);
        let a_handle = a.handle();
        let x = a.produce_buffer("x", buffer());
        let mut b = graph.add_task("b", TaskKind::Compute);
        b.read(x);
        let b_handle = b.handle();
        let y = b.produce_buffer("y", buffer());
        let c = graph.add_task("c", TaskKind::Compute).read_write(y).handle();

        graph.build();

        for task in [a_handle, b_handle, c] {
            assert!(graph.is_task_culled(task));
        }
        assert!(graph.is_resource_culled(x));
        assert!(graph.is_resource_culled(y));
    }

    #[test]
    fn test_read_write_then_reader_survives() {
        let mut graph = FrameGraph::new(DummyPool::new());
        let x = graph
            .add_task("a", TaskKind::Compute)
            .produce_buffer("x", buffer());
        let b = graph.add_task("b", TaskKind::Compute).read_write(x).handle();
        let mut c = graph.add_task("c", TaskKind::Compute);
        c.read(x);
        let y = c.produce_buffer("y", buffer());
        graph.capture(y);

        graph.build();

        assert!(!graph.is_task_culled(b));
        assert!(!graph.is_resource_culled(x));
        assert_eq!(graph.resource(x).refs, 1);
        assert_eq!(graph.timeline().len(), 3);
    }

    #[test]
    fn test_disabled_culling_keeps_everything() {
        let config = crate::FrameGraphConfig::default().with_culling(false);
        let mut graph = FrameGraph::with_config(DummyPool::new(), config);
        let a = graph.add_task("a", TaskKind::Callback).handle();
        let x = graph
            .add_task("b", TaskKind::Compute)
            .produce_buffer("x", buffer());

        graph.build();

        assert!(!graph.is_task_culled(a));
        assert!(!graph.is_resource_culled(x));
        assert_eq!(graph.timeline().len(), 2);
    }
}
