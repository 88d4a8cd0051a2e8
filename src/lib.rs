//! Compiler for the scar language.
//!
//! A small statically typed, C-like language compiled to a textual IR. The
//! pipeline is a single strictly sequential pass per file:
//!
//! 1. [`frontend::source`] loads the file, [`frontend::lexer`] produces the
//!    token stream;
//! 2. [`frontend::parser`] builds the AST with statement-level error
//!    recovery;
//! 3. [`frontend::verifier`] resolves and validates every expression type in
//!    place, accumulating diagnostics;
//! 4. [`backend::codegen`] lowers the verified AST to [`backend::ir`], which
//!    is verified per function and printed.
//!
//! [`driver::compile`] ties the phases together; [`cli::run`] is the binary
//! entry point.

#![forbid(unsafe_code)]

pub mod backend;
pub mod cli;
pub mod driver;
pub mod frontend;
