//! # mdsweep Core Library
//!
//! Orchestrates parameter sweeps over an external molecular-dynamics engine
//! (LAMMPS-style): one working directory per parameter combination, one engine
//! invocation per directory, run serially or handed to a batch scheduler.
//!
//! ## Architectural Philosophy
//!
//! The library is split into small, independently testable layers:
//!
//! - **[`config`]: The Declaration.** A TOML sweep description (engine,
//!   scheduler, static and dynamic variables) loaded into immutable typed
//!   structs and validated before anything touches the filesystem.
//!
//! - **[`sweep`] / [`vars`] / [`instance`]: The Expansion.** The Cartesian
//!   product over dynamic variable lists, yielding one [`vars::VariableSet`]
//!   per combination and one [`instance::SimulationInstance`] with a
//!   deterministic, collision-free working-directory name.
//!
//! - **[`engine`] / [`spawn`]: The Execution.** Engine command construction
//!   and the two spawning strategies: a serial in-process runner and a
//!   scheduler submitter that wraps each instance in an ephemeral job script
//!   around a serialized [`spawn::handoff::Handoff`] payload.
//!
//! - **[`analysis`]: The Aftermath.** Parsing of the engine's chunk-averaged
//!   density output and classification of the resulting sorption regime,
//!   for inspecting finished instances.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod instance;
pub mod progress;
pub mod spawn;
pub mod sweep;
pub mod vars;
