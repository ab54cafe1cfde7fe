//! Criterion benchmarks for performance-critical hot paths
//!
//! Covers: selector synthesis on a deep document, recorder event dispatch,
//! and action-log compilation for each target framework.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use webscribe::capture::dom::{Dom, NodeId};
use webscribe::capture::events::{EventMeta, PageEvent, Platform};
use webscribe::capture::recorder::Recorder;
use webscribe::capture::types::{Action, ElementTarget, SelectorBundle};
use webscribe::codegen::{compile, ScriptType};
use webscribe::session::SessionStore;
use webscribe::synthesis::gen_selectors;

/// A table-like document: `rows` rows of five cells with a button each.
fn wide_page(rows: usize) -> (Dom, NodeId) {
    let (mut dom, root) = Dom::with_root("html");
    let body = dom.add_element(root, "body");
    let table = dom.add_element(body, "table");
    let mut last_button = table;
    for _ in 0..rows {
        let row = dom.add_element(table, "tr");
        for _ in 0..5 {
            let cell = dom.add_element(row, "td");
            last_button = dom.add_element(cell, "button");
        }
    }
    (dom, last_button)
}

fn click_target(general: &str) -> ElementTarget {
    ElementTarget {
        tag_name: "BUTTON".into(),
        selectors: SelectorBundle {
            general_selector: Some(general.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A log with `steps` click/input pairs between load and screenshot.
fn synthetic_log(steps: usize) -> Vec<Action> {
    let mut actions = vec![Action::Load {
        url: "https://bench.test".into(),
    }];
    for i in 0..steps {
        actions.push(Action::Click {
            target: click_target(&format!("#button-{i}")),
        });
        let mut field = click_target(&format!("#field-{i}"));
        field.tag_name = "INPUT".into();
        field.input_type = Some("text".into());
        actions.push(Action::Input {
            target: field,
            value: format!("value {i}"),
        });
    }
    actions.push(Action::FullScreenshot);
    actions
}

// ---------------------------------------------------------------------------
// Selector synthesis benchmarks
// ---------------------------------------------------------------------------

fn bench_selector_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_synthesis");
    for rows in [10, 50, 200] {
        let (dom, button) = wide_page(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| gen_selectors(black_box(&dom), black_box(button)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Recorder dispatch benchmarks
// ---------------------------------------------------------------------------

fn bench_recorder_dispatch(c: &mut Criterion) {
    c.bench_function("recorder_click_dispatch", |b| {
        let (dom, button) = wide_page(50);
        let store = Arc::new(SessionStore::new());
        store.set_start_recording(1, 0, "https://bench.test");
        let mut recorder = Recorder::new(store, Platform::Other);
        recorder.register(None);

        let mut tick = 0u64;
        b.iter(|| {
            tick += 1;
            recorder.dispatch(
                black_box(&dom),
                PageEvent::Click(EventMeta::on(button, tick as f64, tick)),
            );
        });
    });
}

// ---------------------------------------------------------------------------
// Compilation benchmarks
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let log = synthetic_log(100);
    let mut group = c.benchmark_group("compile_100_steps");
    for script_type in ScriptType::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(script_type),
            script_type,
            |b, &script_type| {
                b.iter(|| compile(black_box(&log), true, script_type).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_selector_synthesis,
    bench_recorder_dispatch,
    bench_compile
);
criterion_main!(benches);
