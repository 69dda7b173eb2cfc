//! # RedLilium Frame Graph
//!
//! Per-frame render graph with automatic culling and transient resource
//! lifetimes.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`FrameGraph`] - Tasks and resources of one frame, culling and timeline
//! - [`TaskBuilder`] - Declares what a task produces, reads and writes
//! - [`Timeline`] - Ordered steps with acquire and release points
//! - [`ResourcePool`] - Trait the graph allocates transient resources through
//! - [`DummyPool`] - Pool that allocates nothing, for testing
//!
//! ## Example
//!
//! ```
//! use redlilium_frame_graph::{
//!     BufferDescriptor, BufferUsage, DummyPool, FrameGraph, TaskKind,
//! };
//!
//! let mut graph = FrameGraph::new(DummyPool::new());
//!
//! let mut cull = graph.add_task("light_cull", TaskKind::Compute);
//! let tiles = cull.produce_buffer("tiles", BufferDescriptor::new(4096, BufferUsage::STORAGE));
//!
//! let mut shade = graph.add_task("shade", TaskKind::Compute);
//! shade.read(tiles);
//! let lit = shade.produce_buffer("lit", BufferDescriptor::new(4096, BufferUsage::STORAGE));
//! graph.capture(lit);
//!
//! graph.build();
//! graph.execute(&mut ()).unwrap();
//! assert_eq!(graph.pool().acquire_count(), 2);
//! assert_eq!(graph.pool().release_count(), 1);
//!
//! graph.clear();
//! assert_eq!(graph.pool().live_count(), 0);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod frame_graph;
pub mod profiling;
pub mod recycle;
pub mod types;

// Re-export main types for convenience
pub use backend::{Buffer, DummyPool, GpuResource, PoolError, PoolEvent, ResourcePool, Texture};
pub use config::FrameGraphConfig;
pub use error::{FrameGraphError, FrameGraphResult};
pub use frame_graph::{
    BuildStats, FrameGraph, GraphState, RenderTask, ResourceAccess, ResourceHandle,
    ResourceOrigin, ResourceProxy, TaskBuilder, TaskContext, TaskHandle, TaskKind, Timeline,
    TimelineError, TimelineStep,
};
pub use types::{
    BufferDescriptor, BufferUsage, Extent3d, ResourceDescriptor, ResourceKind, TextureDescriptor,
    TextureFormat, TextureUsage,
};

/// Frame graph library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
///
/// Call once after the logger is installed.
pub fn init() {
    log::info!("RedLilium Frame Graph v{} initialized", VERSION);
}
