use criterion::{Criterion, black_box, criterion_group, criterion_main};

use redlilium_frame_graph::{
    BufferDescriptor, BufferUsage, DummyPool, FrameGraph, FrameGraphConfig, ResourceHandle,
    TaskKind, TextureDescriptor, TextureFormat, TextureUsage,
};

fn color_target() -> TextureDescriptor {
    TextureDescriptor::new_2d(
        1920,
        1080,
        TextureFormat::Rgba16Float,
        TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
    )
}

fn record_chain(graph: &mut FrameGraph<DummyPool>, length: usize) {
    let mut previous: Option<ResourceHandle> = None;
    for i in 0..length {
        let mut task = graph.add_task(format!("pass_{i}"), TaskKind::Graphics);
        if let Some(input) = previous {
            task.read(input);
        }
        previous = Some(task.produce_texture(format!("target_{i}"), color_target()));
    }
    if let Some(tail) = previous {
        graph.capture(tail);
    }
}

/// A frame where every other compute branch is never consumed.
fn record_branching(graph: &mut FrameGraph<DummyPool>, branches: usize) {
    let mut gbuffer = graph.add_task("gbuffer", TaskKind::Graphics);
    let albedo = gbuffer.produce_texture("albedo", color_target());

    let mut lit = Vec::new();
    for i in 0..branches {
        let mut compute = graph.add_task(format!("compute_{i}"), TaskKind::Compute);
        compute.read(albedo);
        let out = compute.produce_buffer(
            format!("out_{i}"),
            BufferDescriptor::new(64 * 1024, BufferUsage::STORAGE),
        );
        if i % 2 == 0 {
            lit.push(out);
        }
    }

    let mut resolve = graph.add_task("resolve", TaskKind::Graphics);
    for &input in &lit {
        resolve.read(input);
    }
    let result = resolve.produce_texture("result", color_target());
    graph.capture(result);
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

fn bench_build_chain(c: &mut Criterion) {
    let config = FrameGraphConfig::default().with_validation(false);
    let mut graph = FrameGraph::with_config(DummyPool::new(), config);
    c.bench_function("frame_graph_build_64_chain", |b| {
        b.iter(|| {
            record_chain(&mut graph, 64);
            black_box(graph.build());
            graph.clear();
        });
    });
}

fn bench_build_branching(c: &mut Criterion) {
    let config = FrameGraphConfig::default().with_validation(false);
    let mut graph = FrameGraph::with_config(DummyPool::new(), config);
    c.bench_function("frame_graph_build_128_branches", |b| {
        b.iter(|| {
            record_branching(&mut graph, 128);
            black_box(graph.build());
            graph.clear();
        });
    });
}

fn bench_build_validated(c: &mut Criterion) {
    let config = FrameGraphConfig::default().with_validation(true);
    let mut graph = FrameGraph::with_config(DummyPool::new(), config);
    c.bench_function("frame_graph_build_128_branches_validated", |b| {
        b.iter(|| {
            record_branching(&mut graph, 128);
            black_box(graph.build());
            graph.clear();
        });
    });
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

fn bench_execute_chain(c: &mut Criterion) {
    let config = FrameGraphConfig::default().with_validation(false);
    let mut graph = FrameGraph::with_config(DummyPool::new(), config);
    c.bench_function("frame_graph_execute_64_chain", |b| {
        b.iter(|| {
            record_chain(&mut graph, 64);
            graph.build();
            black_box(graph.execute(&mut ())).ok();
            graph.clear();
            graph.pool_mut().clear_events();
        });
    });
}

criterion_group!(
    benches,
    bench_build_chain,
    bench_build_branching,
    bench_build_validated,
    bench_execute_chain,
);
criterion_main!(benches);
