//! Resource descriptors.
//!
//! Descriptors describe the shape of a GPU resource without owning any memory.
//! The frame graph stores one per resource proxy and hands it to the
//! [`ResourcePool`](crate::backend::ResourcePool) when the resource is acquired.

mod buffer;
mod common;
mod descriptor;
mod texture;

pub use buffer::{BufferDescriptor, BufferUsage};
pub use common::Extent3d;
pub use descriptor::{ResourceDescriptor, ResourceKind};
pub use texture::{TextureDescriptor, TextureFormat, TextureUsage};
