//! Backend boundary of the frame graph.
//!
//! The frame graph never talks to a GPU API directly. Transient resources are
//! materialized through a [`ResourcePool`] and handed to task payloads as
//! [`GpuResource`] values; command recording stays with the caller.
//!
//! [`DummyPool`] is a pool that allocates nothing and records every call,
//! which is what the tests and benchmarks run against.

mod dummy;
mod pool;
mod resource;

pub use dummy::{DummyPool, PoolEvent};
pub use pool::{PoolError, ResourcePool};
pub use resource::{Buffer, GpuResource, Texture};
