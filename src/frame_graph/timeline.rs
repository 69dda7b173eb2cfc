//! The linear execution timeline computed by `build()`.

use std::ops::Range;

use thiserror::Error;

use crate::backend::ResourcePool;
use crate::profiling::profile_function;
use crate::recycle::Recycle;

use super::{FrameGraph, RenderTask, ResourceHandle, ResourceProxy, TaskHandle};

/// An invariant violation found by [`FrameGraph::validate_timeline`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// A live transient resource is never acquired.
    #[error("resource '{resource}' is never acquired")]
    MissingAcquire { resource: String },
    /// A resource is acquired more than once.
    #[error("resource '{resource}' is acquired more than once")]
    DuplicateAcquire { resource: String },
    /// A live, uncaptured transient resource is never released.
    #[error("resource '{resource}' is never released")]
    MissingRelease { resource: String },
    /// A resource is released more than once.
    #[error("resource '{resource}' is released more than once")]
    DuplicateRelease { resource: String },
    /// A captured resource is released by the timeline.
    #[error("captured resource '{resource}' is released by the timeline")]
    CapturedReleased { resource: String },
    /// An external resource appears in an acquire or release list.
    #[error("external resource '{resource}' is scheduled for acquire or release")]
    ExternalScheduled { resource: String },
    /// A culled resource appears in an acquire or release list.
    #[error("culled resource '{resource}' is scheduled")]
    CulledResourceScheduled { resource: String },
    /// A culled task has a timeline step.
    #[error("culled task '{task}' is scheduled")]
    CulledTaskScheduled { task: String },
    /// A surviving task has no step, or steps are not in insertion order.
    #[error("task '{task}' is missing from the timeline or out of order")]
    TaskOrder { task: String },
    /// A resource is acquired at a step other than its creator's.
    #[error("resource '{resource}' is acquired by '{task}' which did not create it")]
    AcquiredByNonCreator { resource: String, task: String },
    /// A task uses a resource before it is acquired.
    #[error("task '{task}' uses '{resource}' before it is acquired")]
    UseBeforeAcquire { resource: String, task: String },
    /// A task uses a resource after it was released.
    #[error("task '{task}' uses '{resource}' after it was released")]
    UseAfterRelease { resource: String, task: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StepRecord {
    task: TaskHandle,
    acquires: Range<usize>,
    releases: Range<usize>,
}

/// One step of the timeline: resources to acquire, the task to run, resources
/// to release afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineStep<'a> {
    task: TaskHandle,
    acquires: &'a [ResourceHandle],
    releases: &'a [ResourceHandle],
}

impl<'a> TimelineStep<'a> {
    /// The task executed at this step.
    pub fn task(&self) -> TaskHandle {
        self.task
    }

    /// Transient resources to acquire before the task runs.
    pub fn acquires(&self) -> &'a [ResourceHandle] {
        self.acquires
    }

    /// Transient resources to release after the task ran.
    pub fn releases(&self) -> &'a [ResourceHandle] {
        self.releases
    }
}

/// Ordered steps, one per surviving task, in insertion order.
///
/// Acquire and release lists of all steps share two flat arrays so a recycled
/// timeline rebuilds without allocating.
#[derive(Debug, Default)]
pub struct Timeline {
    steps: Vec<StepRecord>,
    acquires: Vec<ResourceHandle>,
    releases: Vec<ResourceHandle>,
    /// Scratch: index of the last surviving task using each resource.
    last_use: Vec<Option<usize>>,
}

impl Recycle for Timeline {
    fn new_empty() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.steps.clear();
        self.acquires.clear();
        self.releases.clear();
        self.last_use.clear();
    }
}

impl Timeline {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no task survived.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get a step by position.
    pub fn step(&self, index: usize) -> Option<TimelineStep<'_>> {
        self.steps.get(index).map(|record| self.view(record))
    }

    /// Iterate the steps in execution order.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = TimelineStep<'_>> + '_ {
        self.steps.iter().map(|record| self.view(record))
    }

    /// Total number of acquires over all steps.
    pub fn acquire_count(&self) -> usize {
        self.acquires.len()
    }

    /// Total number of releases over all steps.
    pub fn release_count(&self) -> usize {
        self.releases.len()
    }

    /// Find the step executing `task`.
    pub fn position(&self, task: TaskHandle) -> Option<usize> {
        self.steps.iter().position(|record| record.task == task)
    }

    fn view(&self, record: &StepRecord) -> TimelineStep<'_> {
        TimelineStep {
            task: record.task,
            acquires: &self.acquires[record.acquires.clone()],
            releases: &self.releases[record.releases.clone()],
        }
    }

    /// Fill the timeline from culled task and resource state.
    pub(crate) fn emit(&mut self, tasks: &[RenderTask], resources: &[ResourceProxy]) {
        profile_function!();
        self.reset();
        self.last_use.resize(resources.len(), None);

        for (index, task) in tasks.iter().enumerate() {
            if task.is_culled() {
                continue;
            }
            for resource in task.used_resources() {
                self.last_use[resource.index()] = Some(index);
            }
        }

        for (index, task) in tasks.iter().enumerate() {
            if task.is_culled() {
                continue;
            }

            let acquire_start = self.acquires.len();
            self.acquires.extend(task.produced().iter().copied());

            let release_start = self.releases.len();
            for handle in task.used_resources() {
                let resource = &resources[handle.index()];
                if !resource.is_collectable() || resource.is_culled() {
                    continue;
                }
                if self.last_use[handle.index()] == Some(index) {
                    self.releases.push(handle);
                    // A resource listed twice on one task is released once.
                    self.last_use[handle.index()] = None;
                }
            }

            self.steps.push(StepRecord {
                task: task.handle(),
                acquires: acquire_start..self.acquires.len(),
                releases: release_start..self.releases.len(),
            });
        }
    }

    pub(crate) fn validate(
        &self,
        tasks: &[RenderTask],
        resources: &[ResourceProxy],
    ) -> Result<(), TimelineError> {
        let resource_name = |h: ResourceHandle| resources[h.index()].name().to_owned();
        let task_name = |h: TaskHandle| tasks[h.index()].name().to_owned();

        let mut acquired_at: Vec<Option<usize>> = vec![None; resources.len()];
        let mut released_at: Vec<Option<usize>> = vec![None; resources.len()];

        let mut live_tasks = tasks.iter().filter(|t| !t.is_culled());
        for (position, step) in self.steps().enumerate() {
            let task = &tasks[step.task().index()];
            if task.is_culled() {
                return Err(TimelineError::CulledTaskScheduled {
                    task: task.name().to_owned(),
                });
            }
            if live_tasks.next().map(RenderTask::handle) != Some(step.task()) {
                return Err(TimelineError::TaskOrder {
                    task: task.name().to_owned(),
                });
            }

            for &handle in step.acquires() {
                let resource = &resources[handle.index()];
                check_schedulable(resource)?;
                if resource.creator() != Some(step.task()) {
                    return Err(TimelineError::AcquiredByNonCreator {
                        resource: resource_name(handle),
                        task: task_name(step.task()),
                    });
                }
                if acquired_at[handle.index()].replace(position).is_some() {
                    return Err(TimelineError::DuplicateAcquire {
                        resource: resource_name(handle),
                    });
                }
            }

            for handle in task.used_resources() {
                let resource = &resources[handle.index()];
                if !resource.is_transient() || resource.is_culled() {
                    continue;
                }
                if acquired_at[handle.index()].is_none() {
                    return Err(TimelineError::UseBeforeAcquire {
                        resource: resource_name(handle),
                        task: task_name(step.task()),
                    });
                }
                if released_at[handle.index()].is_some() {
                    return Err(TimelineError::UseAfterRelease {
                        resource: resource_name(handle),
                        task: task_name(step.task()),
                    });
                }
            }

            for &handle in step.releases() {
                let resource = &resources[handle.index()];
                check_schedulable(resource)?;
                if resource.is_captured() {
                    return Err(TimelineError::CapturedReleased {
                        resource: resource_name(handle),
                    });
                }
                if acquired_at[handle.index()].is_none() {
                    return Err(TimelineError::UseBeforeAcquire {
                        resource: resource_name(handle),
                        task: task_name(step.task()),
                    });
                }
                if released_at[handle.index()].replace(position).is_some() {
                    return Err(TimelineError::DuplicateRelease {
                        resource: resource_name(handle),
                    });
                }
            }
        }

        if let Some(task) = live_tasks.next() {
            return Err(TimelineError::TaskOrder {
                task: task.name().to_owned(),
            });
        }

        for (index, resource) in resources.iter().enumerate() {
            if !resource.is_transient() || resource.is_culled() {
                continue;
            }
            if acquired_at[index].is_none() {
                return Err(TimelineError::MissingAcquire {
                    resource: resource.name().to_owned(),
                });
            }
            if !resource.is_captured() && released_at[index].is_none() {
                return Err(TimelineError::MissingRelease {
                    resource: resource.name().to_owned(),
                });
            }
        }

        Ok(())
    }
}

fn check_schedulable(resource: &ResourceProxy) -> Result<(), TimelineError> {
    if resource.is_external() {
        return Err(TimelineError::ExternalScheduled {
            resource: resource.name().to_owned(),
        });
    }
    if resource.is_culled() {
        return Err(TimelineError::CulledResourceScheduled {
            resource: resource.name().to_owned(),
        });
    }
    Ok(())
}

impl<P: ResourcePool> FrameGraph<P> {
    /// Re-check the invariants of the current timeline.
    ///
    /// Every live transient resource is acquired exactly once at its creator's
    /// step and, unless captured, released exactly once. Culled and external
    /// resources are never scheduled, and no task uses a resource outside its
    /// acquire/release window. Runs after every `build()` when
    /// [`FrameGraphConfig::validate`](crate::FrameGraphConfig) is set.
    pub fn validate_timeline(&self) -> Result<(), TimelineError> {
        self.timeline().validate(self.tasks(), self.resources())
    }
}
