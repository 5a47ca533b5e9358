// src/launch/mod.rs

//! Task launching layer.
//!
//! - [`request`] defines the launch template and concrete invocations.
//! - [`planner`] decides batch vs per-repository invocations and renders
//!   command templates.
//! - [`runtime`] provides the `TaskRuntime` trait the rest of the crate
//!   talks to, and which tests replace with a fake.
//! - [`launcher`] issues invocations one by one and enforces that every
//!   launch starts at least one job.
//! - [`ecs`] is the production runtime on Amazon ECS.

pub mod ecs;
pub mod launcher;
pub mod planner;
pub mod request;
pub mod runtime;

pub use ecs::EcsTaskRuntime;
pub use launcher::{LaunchResult, TaskLauncher};
pub use planner::{LaunchPlan, REPO_PLACEHOLDER, render_command};
pub use request::{Invocation, InvocationTarget, LaunchRequest};
pub use runtime::{LaunchResponse, TaskRuntime};
