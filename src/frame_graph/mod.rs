//! Frame Graph System
//!
//! A per-frame graph of render tasks and the transient resources they
//! exchange. Tasks are declared in execution order; `build()` removes tasks
//! and resources that contribute nothing to a surviving output and computes a
//! linear timeline with the points where each transient resource is acquired
//! from and released to the [`ResourcePool`](crate::backend::ResourcePool).

mod cull;
pub mod executor;
pub mod export;
pub mod graph;
pub mod handle;
pub mod resource;
pub mod stats;
pub mod task;
pub mod timeline;

pub use executor::*;
pub use graph::*;
pub use handle::*;
pub use resource::*;
pub use stats::*;
pub use task::*;
pub use timeline::*;
