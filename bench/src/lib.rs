//! Benchmark utilities for sol_ecs.
//!
//! This crate provides benchmarking infrastructure for the ECS core:
//!
//! - **Microbenchmarks**: Individual World operations (add, group materialization, flush)
//! - **Scenario benchmarks**: A particle workload driven by systems through `World::update`
//! - **Frame timing**: Per-frame `World::update` timing with tail latency
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p sol_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p sol_ecs_bench -- entity_group
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod frame_timer;
pub mod scenarios;
