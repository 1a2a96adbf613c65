//! Test suites for the bridge daemon.

mod pipeline_behaviour;
mod support;
