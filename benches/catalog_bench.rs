//! Catalog parsing and generation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csspropgen::*;
use serde_json::{json, Map, Value as JsonValue};
use std::fs;
use tempfile::TempDir;

const SIDES: [(&str, &str); 4] = [
    ("top", "block-start"),
    ("right", "inline-end"),
    ("bottom", "block-end"),
    ("left", "inline-start"),
];

/// Build a catalog with `groups` complete side groups plus a shorthand each
fn synthetic_catalog(groups: usize) -> String {
    let mut properties = Map::new();

    for i in 0..groups {
        let group = format!("box{}", i);
        let mut longhands = Vec::new();

        for (physical, logical) in SIDES {
            for resolver in [physical, logical] {
                let name = format!("{}-{}", group, resolver);
                properties.insert(
                    name.clone(),
                    json!({
                        "inherited": i % 2 == 0,
                        "values": ["auto", {"value": "none"}],
                        "codegen-properties": {
                            "logical-property-group": {"name": group, "resolver": resolver}
                        }
                    }),
                );
                longhands.push(JsonValue::String(name));
            }
        }

        properties.insert(
            group.clone(),
            json!({"codegen-properties": {"longhands": longhands, "aliases": [format!("-webkit-{}", group)]}}),
        );
        properties.insert(
            format!("-webkit-{}-color", group),
            json!({"codegen-properties": {"color-property": true, "settings-flag": format!("{}Enabled", group)}}),
        );
    }

    json!({"categories": {}, "instructions": [], "properties": properties}).to_string()
}

fn bench_parse_small_catalog(c: &mut Criterion) {
    let source = synthetic_catalog(10);
    let context = ParsingContext::new(None, true, false);

    c.bench_function("parse_small_catalog", |b| {
        b.iter(|| parse_properties_str(black_box(&source), &context).unwrap())
    });
}

fn bench_parse_large_catalog(c: &mut Criterion) {
    let source = synthetic_catalog(100);
    let context = ParsingContext::new(None, true, false);

    c.bench_function("parse_large_catalog", |b| {
        b.iter(|| parse_properties_str(black_box(&source), &context).unwrap())
    });
}

fn bench_generate_gperf(c: &mut Criterion) {
    let source = synthetic_catalog(100);
    let context = ParsingContext::new(None, true, false);
    let catalog = parse_properties_str(&source, &context).unwrap();

    c.bench_function("generate_gperf", |b| {
        b.iter(|| {
            GenerationContext::new(black_box(&catalog), false, None)
                .generate_css_property_names_gperf()
                .unwrap()
        })
    });
}

fn bench_generate_from_file(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let properties_path = temp_dir.path().join("CSSProperties.json");
    fs::write(&properties_path, synthetic_catalog(50)).unwrap();

    c.bench_function("generate_from_file", |b| {
        b.iter(|| {
            generate_with_options(GeneratorOptions {
                properties_path: black_box(properties_path.clone()),
                output_directory: temp_dir.path().to_path_buf(),
                skip_gperf: true,
                ..GeneratorOptions::default()
            })
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_parse_small_catalog,
    bench_parse_large_catalog,
    bench_generate_gperf,
    bench_generate_from_file
);
criterion_main!(benches);
