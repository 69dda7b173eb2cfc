//! Common utilities for frame graph integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use redlilium_frame_graph::{
    BufferDescriptor, BufferUsage, DummyPool, FrameGraph, FrameGraphConfig, ResourceHandle,
    TaskHandle, Texture, TextureDescriptor, TextureFormat, TextureUsage,
};

/// Install the test logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A frame graph over a fresh dummy pool that validates every build.
pub fn graph() -> FrameGraph<DummyPool> {
    init_logging();
    FrameGraph::with_config(DummyPool::new(), FrameGraphConfig::default().with_validation(true))
}

/// A 256x256 color target.
pub fn color_target() -> TextureDescriptor {
    TextureDescriptor::new_2d(
        256,
        256,
        TextureFormat::Rgba8Unorm,
        TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
    )
}

/// A 256x256 depth target.
pub fn depth_target() -> TextureDescriptor {
    TextureDescriptor::new_2d(
        256,
        256,
        TextureFormat::Depth32Float,
        TextureUsage::RENDER_ATTACHMENT,
    )
}

/// A small storage buffer.
pub fn storage_buffer() -> BufferDescriptor {
    BufferDescriptor::new(1024, BufferUsage::STORAGE)
}

/// An external swapchain-like texture.
pub fn backbuffer() -> Arc<Texture> {
    Arc::new(Texture::new(1000, color_target()))
}

/// Names of the resources acquired at each step.
pub fn acquired_names(graph: &FrameGraph<DummyPool>) -> Vec<Vec<String>> {
    graph
        .timeline()
        .steps()
        .map(|step| names(graph, step.acquires()))
        .collect()
}

/// Names of the resources released at each step.
pub fn released_names(graph: &FrameGraph<DummyPool>) -> Vec<Vec<String>> {
    graph
        .timeline()
        .steps()
        .map(|step| names(graph, step.releases()))
        .collect()
}

/// Names of the tasks in timeline order.
pub fn scheduled_tasks(graph: &FrameGraph<DummyPool>) -> Vec<String> {
    graph
        .timeline()
        .steps()
        .map(|step| graph.render_task(step.task()).name().to_owned())
        .collect()
}

/// Handles of the culled tasks, in insertion order.
pub fn culled_tasks(graph: &FrameGraph<DummyPool>) -> Vec<TaskHandle> {
    graph
        .tasks()
        .iter()
        .filter(|t| t.is_culled())
        .map(|t| t.handle())
        .collect()
}

fn names(graph: &FrameGraph<DummyPool>, handles: &[ResourceHandle]) -> Vec<String> {
    handles
        .iter()
        .map(|&h| graph.resource(h).name().to_owned())
        .collect()
}
