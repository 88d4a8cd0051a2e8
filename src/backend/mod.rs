//! Back end: IR definition and AST lowering.

pub mod codegen;
pub mod ir;
