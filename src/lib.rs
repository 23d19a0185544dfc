//! # Introduction
//!
//! Peregrine is a small, indentation-sensitive, Python-flavored language
//! compiled to C. This crate holds the compiler front-end and back-end:
//! the lexer, the parser, and a tree-walking code generator that emits a
//! single C translation unit with deterministically mangled identifiers.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Code generator → C source
//! ```
//!
//! 1. [`parser`] — tokenises the source (indentation becomes explicit
//!    `Indent`/`Dedent`/`NewLine` tokens) and builds an AST; parse errors
//!    accumulate in a batch instead of stopping at the first one.
//! 2. [`codegen`] — walks the AST once and writes C. High-level constructs
//!    (iterators, context managers, decorators, exceptions, enums, tuple
//!    returns) lower to portable C over a small runtime protocol.
//! 3. [`errors`] — the structured diagnostic record and its terminal
//!    rendering.
//! 4. [`modules`] — filesystem search used to resolve `import` targets.
//!
//! The emitted text is handed to a downstream C compiler as-is; this
//! crate never validates that it compiles.

pub mod codegen;
pub mod errors;
pub mod modules;
pub mod parser;
