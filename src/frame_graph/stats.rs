//! Build statistics, collected once per `build()`.

use super::{RenderTask, ResourceProxy, Timeline};

/// Summary of the last `build()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Tasks registered this frame.
    pub tasks: usize,
    /// Tasks removed by culling.
    pub culled_tasks: usize,
    /// Resources registered this frame, transient and external.
    pub resources: usize,
    /// Transient resources removed by culling.
    pub culled_resources: usize,
    /// Resources created by tasks this frame.
    pub transient_resources: usize,
    /// Resources imported from outside the graph.
    pub external_resources: usize,
    /// Transient resources marked to outlive the frame.
    pub captured_resources: usize,
    /// Steps in the timeline.
    pub steps: usize,
    /// Estimated bytes of the transient resources that survived.
    pub transient_bytes: u64,
}

impl BuildStats {
    pub(crate) fn collect(
        tasks: &[RenderTask],
        resources: &[ResourceProxy],
        timeline: &Timeline,
    ) -> Self {
        let mut stats = Self {
            tasks: tasks.len(),
            culled_tasks: tasks.iter().filter(|t| t.is_culled()).count(),
            resources: resources.len(),
            steps: timeline.len(),
            ..Self::default()
        };

        for resource in resources {
            if resource.is_external() {
                stats.external_resources += 1;
                continue;
            }
            stats.transient_resources += 1;
            if resource.is_captured() {
                stats.captured_resources += 1;
            }
            if resource.is_culled() {
                stats.culled_resources += 1;
            } else {
                stats.transient_bytes += resource.descriptor().byte_size();
            }
        }

        stats
    }

    /// Tasks that will execute.
    pub fn live_tasks(&self) -> usize {
        self.tasks - self.culled_tasks
    }
}

impl std::fmt::Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} tasks live, {} resources ({} transient, {} external, {} captured, {} culled), {} steps, {} transient bytes",
            self.live_tasks(),
            self.tasks,
            self.resources,
            self.transient_resources,
            self.external_resources,
            self.captured_resources,
            self.culled_resources,
            self.steps,
            self.transient_bytes
        )
    }
}
