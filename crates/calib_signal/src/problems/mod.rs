//! Benchmark signal problems.

pub mod oscillator;
