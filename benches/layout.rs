use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use paper_mindmap::config::{LayoutConfig, ReconstructOptions};
use paper_mindmap::generator::parse_generator_response;
use paper_mindmap::layout::compute_layout;
use paper_mindmap::model::RawNodeRecord;
use paper_mindmap::reconstruct::reconstruct_tree;
use paper_mindmap::render::render_svg;
use paper_mindmap::theme::Theme;
use std::hint::black_box;

/// One root with `count` direct children.
fn wide_records(count: usize) -> Vec<RawNodeRecord> {
    let mut out = vec![RawNodeRecord::new("root", None)];
    for i in 0..count {
        out.push(RawNodeRecord::new(&format!("n{i}"), Some("root")));
    }
    out
}

/// A single chain, the worst case for recursive traversals.
fn deep_records(count: usize) -> Vec<RawNodeRecord> {
    (0..count)
        .map(|i| {
            let parent = (i > 0).then(|| format!("n{}", i - 1));
            RawNodeRecord::new(&format!("n{i}"), parent.as_deref())
        })
        .collect()
}

/// Complete tree with the given branching factor.
fn balanced_records(count: usize, branching: usize) -> Vec<RawNodeRecord> {
    (0..count)
        .map(|i| {
            let parent = (i > 0).then(|| format!("n{}", (i - 1) / branching));
            RawNodeRecord::new(&format!("n{i}"), parent.as_deref())
                .with_label(&format!("Concept {i}"))
                .with_page((i % 40 + 1) as u32)
        })
        .collect()
}

/// Shuffled order with forward references, duplicates and a cycle.
fn messy_records(count: usize) -> Vec<RawNodeRecord> {
    let mut out: Vec<RawNodeRecord> = balanced_records(count, 4).into_iter().rev().collect();
    out.push(RawNodeRecord::new("n1", Some("n0")));
    out.push(RawNodeRecord::new("c0", Some("c1")));
    out.push(RawNodeRecord::new("c1", Some("c0")));
    out
}

fn shapes() -> Vec<(&'static str, Vec<RawNodeRecord>)> {
    vec![
        ("wide_1000", wide_records(1000)),
        ("deep_5000", deep_records(5000)),
        ("balanced_2000", balanced_records(2000, 3)),
        ("messy_2000", messy_records(2000)),
    ]
}

fn response_source(nodes: usize) -> String {
    let mut out = String::from("```json\n{\n  nodes: [\n");
    for i in 0..nodes {
        let parent = if i == 0 {
            "null".to_string()
        } else {
            format!("{}", (i - 1) / 3)
        };
        out.push_str(&format!(
            "    {{id: {i}, parentId: {parent}, label: 'Concept {i}', pageNumber: '{}'}},\n",
            i % 20 + 1
        ));
    }
    out.push_str("  ],\n  executiveSummary: 'Summary.',\n}\n```\n");
    out
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    let options = ReconstructOptions::default();
    for (name, records) in shapes() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &records, |b, data| {
            b.iter(|| {
                let tree = reconstruct_tree(black_box(data), &options).expect("reconstruct failed");
                black_box(tree.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let options = ReconstructOptions::default();
    let config = LayoutConfig::default();
    for (name, records) in shapes() {
        let tree = reconstruct_tree(&records, &options).expect("reconstruct failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| {
                let layout = compute_layout(Some(black_box(tree)), &config);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let options = ReconstructOptions::default();
    let config = LayoutConfig::default();
    let theme = Theme::modern();
    let render = paper_mindmap::config::RenderConfig::default();
    for nodes in [50usize, 500] {
        let input = response_source(nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &input, |b, data| {
            b.iter(|| {
                let response = parse_generator_response(black_box(data)).expect("parse failed");
                let tree = reconstruct_tree(&response.nodes, &options).expect("reconstruct failed");
                let layout = compute_layout(Some(&tree), &config);
                let svg = render_svg(&layout, &theme, &render);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_reconstruct, bench_layout, bench_end_to_end
);
criterion_main!(benches);
