//! Front end: source handling, lexing, parsing, and semantic verification.

pub mod ast;
pub mod decode;
pub mod diagnostics;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod types;
pub mod verifier;
