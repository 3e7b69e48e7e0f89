// src/engine/mod.rs

//! Orchestration engine for calcdag.
//!
//! Ties a shared [`Scheduler`](crate::dag::Scheduler) to a
//! [`WorkerPool`](crate::worker::WorkerPool) and a client-side poll loop.
//! The scheduler holds all semantics; [`runtime`] is the async shell.

pub mod runtime;

pub use runtime::Runtime;
