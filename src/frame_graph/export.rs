//! Human-readable timeline reports and Graphviz export.

use std::fmt::{self, Write as _};
use std::path::Path;

use petgraph::dot::Dot;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::backend::ResourcePool;
use crate::error::{FrameGraphError, FrameGraphResult};
use crate::types::ResourceKind;

use super::{FrameGraph, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceClass {
    Transient,
    External,
    Captured,
}

enum DotNode<'a> {
    Task {
        name: &'a str,
        kind: TaskKind,
        culled: bool,
    },
    Resource {
        name: &'a str,
        kind: ResourceKind,
        class: ResourceClass,
        culled: bool,
    },
}

impl fmt::Display for DotNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task { name, kind, .. } => write!(f, "{} [{}]", name, kind),
            Self::Resource { name, kind, .. } => write!(f, "{} ({})", name, kind),
        }
    }
}

impl DotNode<'_> {
    fn attributes(&self) -> String {
        match self {
            Self::Task { culled, .. } => {
                if *culled {
                    "shape = box, style = dashed".to_owned()
                } else {
                    "shape = box, style = filled, fillcolor = lightgray".to_owned()
                }
            }
            Self::Resource { class, culled, .. } => {
                let color = match class {
                    ResourceClass::Transient => "lightblue",
                    ResourceClass::External => "lightyellow",
                    ResourceClass::Captured => "palegreen",
                };
                let style = if *culled { "\"filled,dashed\"" } else { "filled" };
                format!("shape = ellipse, style = {}, fillcolor = {}", style, color)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DotEdge {
    Produce,
    Read,
    Write,
}

impl fmt::Display for DotEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Produce => "produce",
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

impl DotEdge {
    fn attributes(&self) -> &'static str {
        match self {
            Self::Produce => "",
            Self::Read => "color = blue",
            Self::Write => "color = red",
        }
    }
}

impl<P: ResourcePool> FrameGraph<P> {
    /// Describe the timeline as text, one line per acquire, task and release.
    ///
    /// Culled tasks are listed at the end. Empty before `build()` apart from
    /// the header.
    pub fn timeline_report(&self) -> String {
        let timeline = self.timeline();
        let mut report = String::new();
        let _ = writeln!(
            report,
            "frame graph '{}': {} steps",
            self.config().label,
            timeline.len()
        );

        for (position, step) in timeline.steps().enumerate() {
            let task = self.render_task(step.task());
            for &handle in step.acquires() {
                let _ = writeln!(report, "    acquire {}", self.resource(handle).name());
            }
            let _ = writeln!(report, "{}: {} [{}]", position, task.name(), task.kind());
            for &handle in step.releases() {
                let _ = writeln!(report, "    release {}", self.resource(handle).name());
            }
        }

        let culled: Vec<&str> = self
            .tasks()
            .iter()
            .filter(|t| t.is_culled())
            .map(|t| t.name())
            .collect();
        if !culled.is_empty() {
            let _ = writeln!(report, "culled: {}", culled.join(", "));
        }
        report
    }

    /// Log the timeline report at `info` level.
    pub fn debug(&self) {
        for line in self.timeline_report().lines() {
            log::info!("{}", line);
        }
    }

    /// Render every task and resource of the frame, culled ones included, as a
    /// Graphviz DOT document.
    ///
    /// Tasks are boxes and resources ellipses, colored by ownership: transient
    /// light blue, external light yellow, captured pale green. Culled nodes are
    /// dashed. Edges are labeled `produce`, `read` or `write`.
    pub fn to_dot(&self) -> String {
        let mut graph: Graph<DotNode<'_>, DotEdge> = Graph::new();

        let task_nodes: Vec<NodeIndex> = self
            .tasks()
            .iter()
            .map(|task| {
                graph.add_node(DotNode::Task {
                    name: task.name(),
                    kind: task.kind(),
                    culled: task.is_culled(),
                })
            })
            .collect();

        for resource in self.resources() {
            let class = if resource.is_external() {
                ResourceClass::External
            } else if resource.is_captured() {
                ResourceClass::Captured
            } else {
                ResourceClass::Transient
            };
            let node = graph.add_node(DotNode::Resource {
                name: resource.name(),
                kind: resource.kind(),
                class,
                culled: resource.is_culled(),
            });

            if let Some(creator) = resource.creator() {
                graph.add_edge(task_nodes[creator.index()], node, DotEdge::Produce);
            }
            for reader in resource.readers() {
                graph.add_edge(node, task_nodes[reader.index()], DotEdge::Read);
            }
            for writer in resource.writers() {
                graph.add_edge(task_nodes[writer.index()], node, DotEdge::Write);
            }
        }

        let dot = Dot::with_attr_getters(
            &graph,
            &[],
            &|_, edge| EdgeRef::weight(&edge).attributes().to_owned(),
            &|_, (_, node)| node.attributes(),
        );
        format!("{}", dot)
    }

    /// Write [`to_dot`](Self::to_dot) to `path`.
    pub fn export_graph(&self, path: impl AsRef<Path>) -> FrameGraphResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_dot()).map_err(|source| FrameGraphError::Export {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Exported frame graph '{}' to {}", self.config().label, path.display());
        Ok(())
    }
}
