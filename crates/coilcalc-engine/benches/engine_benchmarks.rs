//! Benchmarks `run_calculations` over a synthetic N-node linear chain, to
//! have a baseline for the O(V+E) complexity claim on the dependency
//! resolver.
//!
//! Run with: cargo bench -p coilcalc-engine

use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use coilcalc_engine::CalculationEngine;
use coilcalc_traits::bundle::ParameterBundle;
use coilcalc_traits::output::NodeOutput;
use coilcalc_traits::strategy::ClosureStrategy;

/// Builds a chain `n0(x) -> n1(n0) -> n2(n1) -> ... -> n{len-1}`, each node
/// doubling its single upstream input.
fn build_chain(engine: &mut CalculationEngine, len: usize) {
    engine.add_or_update_node(
        "n0",
        Arc::new(ClosureStrategy::new(vec!["x".to_string()], |deps, _params| {
            let x = deps.get("x").unwrap().as_scalar()?;
            Ok(NodeOutput::scalar(x * 2.0, vec!["v".into()], vec!["".into()]))
        })),
    );
    for i in 1..len {
        let upstream = format!("n{}", i - 1);
        engine.add_or_update_node(
            format!("n{i}"),
            Arc::new(ClosureStrategy::new(vec![upstream.clone()], move |deps, _params| {
                let v = deps.get(&upstream).unwrap().as_scalar()?;
                Ok(NodeOutput::scalar(v * 2.0, vec!["v".into()], vec!["".into()]))
            })),
        );
    }
}

fn bench_cold_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_calculations_cold");
    for &len in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let mut engine = CalculationEngine::with_defaults();
                build_chain(&mut engine, len);
                engine.update_parameters(ParameterBundle::new(HashMap::from([("x".to_string(), 1.0)])).unwrap());
                black_box(engine.run_calculations().unwrap());
            });
        });
    }
    group.finish();
}

fn bench_incremental_rerun(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_calculations_single_stale_node");
    for &len in &[10usize, 100, 1000] {
        let mut engine = CalculationEngine::with_defaults();
        build_chain(&mut engine, len);
        engine.update_parameters(ParameterBundle::new(HashMap::from([("x".to_string(), 1.0)])).unwrap());
        engine.run_calculations().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| {
                let last = format!("n{}", len - 1);
                engine.add_or_update_node(
                    last.clone(),
                    Arc::new(ClosureStrategy::new(vec![format!("n{}", len - 2)], |deps, _p| {
                        let v = deps.values().next().unwrap().as_scalar()?;
                        Ok(NodeOutput::scalar(v * 2.0, vec!["v".into()], vec!["".into()]))
                    })),
                );
                black_box(engine.run_calculations().unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cold_run, bench_incremental_rerun);
criterion_main!(benches);
