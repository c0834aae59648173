//! CI step-summary toolkit: SARIF aggregation reports and managed PR
//! comments. The binary in `main.rs` is a thin clap wrapper over these
//! modules.

pub mod cli;
pub mod config;
pub mod github;
pub mod report;
pub mod sarif;
