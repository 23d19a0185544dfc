//! C-targeting code generation
//!
//! This module translates a parsed Peregrine program into a single C
//! translation unit:
//! - [`generator`]: The [`generator::Codegen`] walker, emission sinks,
//!   and scope/state flags
//! - [`symbols`]: The two-tier name-mangling table and unit prefix
//!
//! The lowerings extend the walker through `impl` blocks in the sibling
//! modules (`statements`, `expressions`, `functions`).
//!
//! # Emitted-code contract
//!
//! The output assumes a runtime providing `_PEREGRINE_POWER(a,b)` and
//! `_PEREGRINE_FLOOR(x)`, plus container types exposing the mangled
//! iterator/container/context protocol (`____iter__`, `____iterate__`,
//! `____getitem__`, `____contains__`, `____enter__`, `____end__`). The
//! generator never checks that the emitted text compiles; that is the
//! downstream C compiler's job.

pub mod generator;
pub mod symbols;

mod expressions;
mod functions;
mod statements;
