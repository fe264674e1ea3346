// benches/docpick_bench.rs
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::time::Duration;

use docpick::core::{
    DocFilter, FileNode, Selection, build_tree, node_display_state, parse_github_tree,
    render_tree, toggle_leaf, toggle_subtree,
};

// ---------- Fixture: synthetic docs tree reused across benches ----------
static PATHS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut out = Vec::new();
    for section in 0..20 {
        for chapter in 0..10 {
            for page in 0..15 {
                out.push(format!("docs/s{section:02}/c{chapter:02}/page_{page:03}.md"));
            }
        }
    }
    out.push("README.md".to_string());
    out
});

static TREE: Lazy<Vec<FileNode>> = Lazy::new(|| build_tree(PATHS.as_slice()));

fn github_body(paths: &[String]) -> String {
    let entries: Vec<String> = paths
        .iter()
        .map(|p| format!(r#"{{"path":"{p}","type":"blob","mode":"100644"}}"#))
        .collect();
    format!(r#"{{"tree":[{}],"truncated":false}}"#, entries.join(","))
}

// ---------- Benches ----------

fn bench_build_tree(c: &mut Criterion) {
    let mut g = c.benchmark_group("build_tree");
    g.sample_size(50);
    g.measurement_time(Duration::from_secs(4));

    for n in [100usize, 1_000, PATHS.len()] {
        let slice = &PATHS[..n];
        g.throughput(Throughput::Elements(n as u64));
        g.bench_with_input(BenchmarkId::from_parameter(n), slice, |b, paths| {
            b.iter(|| black_box(build_tree(black_box(paths))));
        });
    }
    g.finish();
}

fn bench_toggles(c: &mut Criterion) {
    let docs = &TREE[0];

    c.bench_function("toggle_subtree_unbounded", |b| {
        b.iter(|| black_box(toggle_subtree(docs, true, &Selection::new(), None)));
    });

    let full = toggle_subtree(docs, true, &Selection::new(), None).into_selection();
    c.bench_function("toggle_subtree_rejected", |b| {
        b.iter(|| black_box(toggle_subtree(&TREE[1], true, &full, Some(full.len()))));
    });

    c.bench_function("toggle_leaf_into_full_set", |b| {
        b.iter(|| black_box(toggle_leaf("README.md", true, &full, None)));
    });
}

fn bench_display_states(c: &mut Criterion) {
    let half: Selection = PATHS.iter().step_by(2).cloned().collect();

    c.bench_function("node_display_state_root", |b| {
        b.iter(|| black_box(node_display_state(&TREE[0], black_box(&half))));
    });

    c.bench_function("render_tree_with_markers", |b| {
        b.iter(|| black_box(render_tree(&TREE, &half)));
    });
}

fn bench_parse_github_tree(c: &mut Criterion) {
    let body = github_body(PATHS.as_slice());
    let filter = DocFilter::markdown();

    let mut g = c.benchmark_group("github_tree");
    g.throughput(Throughput::Bytes(body.len() as u64));
    g.bench_function("parse_and_filter", |b| {
        b.iter(|| black_box(parse_github_tree(black_box(body.as_bytes()), &filter)));
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_build_tree,
    bench_toggles,
    bench_display_states,
    bench_parse_github_tree
);
criterion_main!(benches);
