use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thinkmap_renderer::config::{Config, LayoutConfig};
use thinkmap_renderer::layout::{compute_layout, LayoutOptions};
use thinkmap_renderer::redact::redact_scene;
use thinkmap_renderer::render::render_svg;
use thinkmap_renderer::scene::SceneGraph;
use thinkmap_renderer::spec::DiagramSpec;

fn fixture(name: &str) -> &'static str {
    match name {
        "bubble_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/bubble_map.json"
        )),
        "circle_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/circle_map.json"
        )),
        "double_bubble_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/double_bubble_map.json"
        )),
        "multi_flow_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/multi_flow_map.json"
        )),
        "tree_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/tree_map.json"
        )),
        "mind_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/mind_map.json"
        )),
        "brace_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/brace_map.json"
        )),
        "flow_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/flow_map.json"
        )),
        "bridge_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/bridge_map.json"
        )),
        "concept_map" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/concept_map.json"
        )),
        _ => panic!("unknown fixture"),
    }
}

const FAMILIES: [&str; 10] = [
    "bubble_map",
    "circle_map",
    "double_bubble_map",
    "multi_flow_map",
    "tree_map",
    "mind_map",
    "brace_map",
    "flow_map",
    "bridge_map",
    "concept_map",
];

fn fast_config() -> Config {
    Config {
        layout: LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        },
        ..Config::default()
    }
}

/// Synthetic wide bubble map for stressing the ring relaxation.
fn dense_bubble_spec(attributes: usize) -> String {
    let items: Vec<String> = (0..attributes)
        .map(|i| format!("\"attribute number {i}\""))
        .collect();
    format!(
        "{{\"type\":\"bubble_map\",\"topic\":\"Stress\",\"attributes\":[{}]}}",
        items.join(",")
    )
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in FAMILIES {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let spec = DiagramSpec::from_json(black_box(data)).expect("parse failed");
                black_box(spec.family());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = fast_config();
    let options = LayoutOptions::default();
    for name in FAMILIES {
        let spec = DiagramSpec::from_json(fixture(name)).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &spec, |b, spec| {
            b.iter(|| {
                let layout = compute_layout(black_box(spec), &config.theme, &config.layout, &options)
                    .expect("layout failed");
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_ring_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_ring_relaxation");
    let config = fast_config();
    let options = LayoutOptions::default();
    for attributes in [8usize, 14, 20] {
        let input = dense_bubble_spec(attributes);
        let spec = DiagramSpec::from_json(&input).expect("parse failed");
        group.bench_with_input(
            BenchmarkId::from_parameter(attributes),
            &spec,
            |b, spec| {
                b.iter(|| {
                    let layout =
                        compute_layout(black_box(spec), &config.theme, &config.layout, &options)
                            .expect("layout failed");
                    black_box(layout.bounds.width);
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let config = fast_config();
    let options = LayoutOptions::default();
    for name in FAMILIES {
        let spec = DiagramSpec::from_json(fixture(name)).expect("parse failed");
        let layout = compute_layout(&spec, &config.theme, &config.layout, &options)
            .expect("layout failed");
        let scene = SceneGraph::build(&layout, &config.theme, &config.layout);
        group.bench_with_input(BenchmarkId::from_parameter(name), &scene, |b, scene| {
            b.iter(|| {
                let svg = render_svg(black_box(scene), &config.theme, &config.layout);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_redaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("redaction");
    let config = fast_config();
    let options = LayoutOptions::default();
    let spec = DiagramSpec::from_json(fixture("bubble_map")).expect("parse failed");
    let layout =
        compute_layout(&spec, &config.theme, &config.layout, &options).expect("layout failed");
    let scene = SceneGraph::build(&layout, &config.theme, &config.layout);
    group.bench_function("bubble_map_half", |b| {
        b.iter(|| {
            let mut scene = scene.clone();
            let hidden = redact_scene(
                black_box(&mut scene),
                0.5,
                42,
                &config.layout.redaction,
                &config.theme,
            );
            black_box(hidden);
        });
    });
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = fast_config();
    let options = LayoutOptions::default();
    for name in FAMILIES {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let spec = DiagramSpec::from_json(black_box(data)).expect("parse failed");
                let layout = compute_layout(&spec, &config.theme, &config.layout, &options)
                    .expect("layout failed");
                let scene = SceneGraph::build(&layout, &config.theme, &config.layout);
                let svg = render_svg(&scene, &config.theme, &config.layout);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_ring_relaxation, bench_render, bench_redaction, bench_end_to_end
);
criterion_main!(benches);
