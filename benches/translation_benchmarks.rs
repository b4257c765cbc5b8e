//! End-to-End Translation Benchmarks
//!
//! This benchmark suite measures the translation of generated meta-models
//! into the intermediate representation. Benchmarks are organized into the
//! following categories:
//!
//! - **Deep Hierarchies**: Long inheritance chains with stacked members
//! - **Wide Models**: Many unrelated classes
//! - **Diamonds**: Layered multiple inheritance
//! - **Descriptions**: Cross-reference scanning and resolution
//! - **Pipeline Stages**: Ontology alone versus the full translation
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench deep_hierarchies
//! cargo bench pipeline_stages
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use metamodel_ir::lexer::scan_references;
use metamodel_ir::parsed::{Class, Description, Property, Symbol, SymbolTable, TypeAnnotation};
use metamodel_ir::semantic::{Ontology, Translator};

const ASSOCIATION: &str = "Reference";

fn optional_str(name: String) -> Property {
    Property::new(name, TypeAnnotation::optional(TypeAnnotation::atomic("str")))
}

fn table(mut classes: Vec<Class>) -> SymbolTable {
    classes.push(Class::concrete(ASSOCIATION));
    SymbolTable::new(classes.into_iter().map(Symbol::Class).collect(), ASSOCIATION)
        .unwrap_or_else(|err| panic!("invalid generated model: {err:?}"))
}

/// `Level_0 <- Level_1 <- ... <- Level_{depth - 1}`, each level adding a
/// property; only the last level is concrete.
fn chain(depth: usize) -> SymbolTable {
    let classes = (0..depth)
        .map(|level| {
            let name = format!("Level_{level}");
            let class = if level + 1 == depth {
                Class::concrete(name)
            } else {
                Class::abstract_class(name)
            };
            let class = class.with_property(optional_str(format!("property_{level}")));
            if level == 0 {
                class
            } else {
                class.with_parent(format!("Level_{}", level - 1))
            }
        })
        .collect();
    table(classes)
}

/// `count` unrelated classes with a handful of properties each.
fn wide(count: usize) -> SymbolTable {
    let classes = (0..count)
        .map(|index| {
            (0..5).fold(Class::concrete(format!("Class_{index}")), |class, property| {
                class.with_property(optional_str(format!("property_{property}")))
            })
        })
        .collect();
    table(classes)
}

/// Layers of two abstract classes, each inheriting from both classes of
/// the layer above.
fn diamonds(layers: usize) -> SymbolTable {
    let mut classes = Vec::new();
    for layer in 0..layers {
        for side in ["left", "right"] {
            let name = format!("Layer_{layer}_{side}");
            let mut class = if layer + 1 == layers {
                Class::concrete(name)
            } else {
                Class::abstract_class(name)
            }
            .with_property(optional_str(format!("property_{layer}_{side}")));
            if layer > 0 {
                class = class
                    .with_parent(format!("Layer_{}_left", layer - 1))
                    .with_parent(format!("Layer_{}_right", layer - 1));
            }
            classes.push(class);
        }
    }
    table(classes)
}

/// Classes whose descriptions refer to their neighbours and to their own
/// properties.
fn documented(count: usize) -> SymbolTable {
    let classes = (0..count)
        .map(|index| {
            let neighbour = (index + 1) % count;
            Class::concrete(format!("Class_{index}"))
                .with_property(optional_str("value".to_string()))
                .with_description(Description::new(format!(
                    "Holds a :attr:`value`, unlike :class:`.Class_{neighbour}` whose \
                     :attr:`~Class_{neighbour}.value` differs."
                )))
        })
        .collect();
    table(classes)
}

// ============================================================================
// Translation Benchmarks
// ============================================================================

fn bench_deep_hierarchies(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_hierarchies");

    for depth in [10, 50, 200] {
        let model = chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &model, |b, model| {
            b.iter(|| Translator::new().translate(black_box(model)));
        });
    }

    group.finish();
}

fn bench_wide_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_models");

    for count in [10, 100, 1000] {
        let model = wide(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &model, |b, model| {
            b.iter(|| Translator::new().translate(black_box(model)));
        });
    }

    group.finish();
}

fn bench_diamonds(c: &mut Criterion) {
    let mut group = c.benchmark_group("diamonds");

    // Ancestor sequences keep repetitions, so they double with every layer.
    for layers in [2, 4, 8] {
        let model = diamonds(layers);
        group.bench_with_input(BenchmarkId::from_parameter(layers), &model, |b, model| {
            b.iter(|| Translator::new().translate(black_box(model)));
        });
    }

    group.finish();
}

fn bench_descriptions(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptions");

    let text = "The :attr:`~Asset.id` of :class:`.Asset`, see :paramref:`value` \
                and :constraintref:`AASd-100`.";
    group.bench_function("scan_only", |b| {
        b.iter(|| scan_references(black_box(text), 0));
    });

    let model = documented(100);
    group.bench_function("translate_documented", |b| {
        b.iter(|| Translator::new().translate(black_box(&model)));
    });

    group.finish();
}

// ============================================================================
// Comparison Benchmarks (Ontology vs Translation)
// ============================================================================

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_stages");

    let model = chain(50);

    group.bench_function("01_ontology_only", |b| {
        b.iter(|| Ontology::build(black_box(&model)));
    });

    group.bench_function("02_full_translation", |b| {
        b.iter(|| Translator::new().translate(black_box(&model)));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_deep_hierarchies,
    bench_wide_models,
    bench_diamonds,
    bench_descriptions,
    bench_pipeline_stages,
);

criterion_main!(benches);
