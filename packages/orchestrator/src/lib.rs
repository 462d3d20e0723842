//! Sequential build orchestration for wasm packages.
//!
//! A run checks the toolchain, reads the package name from the manifest,
//! clears stale outputs, picks an install destination, hands a
//! [`BuildContext`] to the build and install phases, and links the result.

pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod phase;
pub mod probe;
pub mod report;
pub mod runner;
pub mod workspace;

pub use config::{OrchestratorConfig, ReaderKind, CONFIG_FILE_NAME};
pub use context::{BuildContext, Environment, OutputSource};
pub use error::{OrchestratorError, Result};
pub use manifest::{ManifestReader, PackageName};
pub use orchestrator::{BuildReport, Orchestrator, Plan, ToolStatus, Toolchain};
pub use phase::{Phase, ScriptPhase};
pub use probe::ToolProbe;
pub use report::{Event, Reporter, Stage, TracingReporter};
pub use runner::run_or_fail;
