//! Compilation driver.
//!
//! Owns the per-compilation [`Session`] (interner + diagnostics sink) and
//! runs the phases strictly in order: lex → parse → verify → codegen →
//! print. Codegen only runs when the sink is error-free after the full
//! verifier pass; a [`FatalError`] from any phase aborts the rest of the
//! pipeline immediately.

use std::fs;
use std::path::PathBuf;

use crate::backend::codegen;
use crate::backend::ir::{self, IrModule};
use crate::frontend::diagnostics::{Diagnostics, FatalError};
use crate::frontend::intern::Interner;
use crate::frontend::source::SourceBuffer;
use crate::frontend::{lexer, parser, verifier};

pub const EXIT_SUCCESS: i32 = 0;
/// Source errors were reported.
pub const EXIT_ERRORS: i32 = 1;
/// A fatal or internal error aborted the compilation.
pub const EXIT_FATAL: i32 = 2;

/// Pre-parsed configuration handed to the driver by the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output/package name; defaults to the input file stem.
    pub module_name: Option<String>,
    /// Annotate the output with source provenance.
    pub debug_info: bool,
    pub optimize: bool,
    pub warnings_off: bool,
    pub warnings_as_errors: bool,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from("out"),
            module_name: None,
            debug_info: false,
            optimize: false,
            warnings_off: false,
            warnings_as_errors: false,
        }
    }

    fn resolved_name(&self) -> String {
        match &self.module_name {
            Some(name) => name.clone(),
            None => self
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "out".to_string()),
        }
    }
}

/// All mutable state shared across phases of one compilation. Constructed
/// once by the driver and lent piecewise to each phase.
pub struct Session {
    pub interner: Interner,
    pub diagnostics: Diagnostics,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            interner: Interner::new(),
            diagnostics: Diagnostics::new(config.warnings_off, config.warnings_as_errors),
        }
    }
}

/// Compile one file per the configuration and return the process exit code.
#[tracing::instrument(skip_all, fields(input = %config.input.display()))]
pub fn compile(config: &Config) -> i32 {
    let source = match SourceBuffer::open(&config.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("fatal: {err}");
            return EXIT_FATAL;
        }
    };
    let mut session = Session::new(config);

    match run_pipeline(config, &source, &mut session) {
        Ok(()) => {
            session.diagnostics.flush(&source);
            if session.diagnostics.has_errors() {
                EXIT_ERRORS
            } else {
                EXIT_SUCCESS
            }
        }
        Err(fatal) => {
            session.diagnostics.fatal(&fatal);
            session.diagnostics.flush(&source);
            EXIT_FATAL
        }
    }
}

fn run_pipeline(
    config: &Config,
    source: &SourceBuffer,
    session: &mut Session,
) -> Result<(), FatalError> {
    let tokens = lexer::lex(source, &mut session.interner, &mut session.diagnostics)?;
    let mut module = parser::parse(&tokens, &mut session.interner, &mut session.diagnostics);
    verifier::verify(&mut module, &session.interner, &mut session.diagnostics);
    if session.diagnostics.has_errors() {
        return Ok(());
    }

    let mut ir_module = codegen::generate(&module, &session.interner)?;
    if config.optimize {
        for func in &mut ir_module.functions {
            ir::fold_constants(func);
        }
    }
    write_output(config, source, &ir_module)
}

fn write_output(
    config: &Config,
    source: &SourceBuffer,
    ir_module: &IrModule,
) -> Result<(), FatalError> {
    let mut text = String::new();
    if config.debug_info {
        text.push_str(&format!("; module: {}\n", config.resolved_name()));
        text.push_str(&format!("; source: {}\n\n", source.file_name()));
    }
    text.push_str(&ir_module.to_string());
    fs::write(&config.output, text).map_err(|err| FatalError::WriteOutput {
        path: config.output.display().to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str, ext: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scar_driver_{tag}_{}.{ext}", std::process::id()))
    }

    fn write_source(tag: &str, text: &str) -> PathBuf {
        let path = temp_path(tag, "scar");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_compile_success_writes_output() {
        let input = write_source("ok", "func add(a i32, b i32) -> i32 { return a + b; }");
        let output = temp_path("ok", "ll");
        let mut config = Config::new(&input);
        config.output = output.clone();
        assert_eq!(compile(&config), EXIT_SUCCESS);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("define i32 @add"));
        let _ = fs::remove_file(input);
        let _ = fs::remove_file(output);
    }

    #[test]
    fn test_compile_semantic_error_exits_one() {
        let input = write_source("bad", "func f() { var x: bool = 1; }");
        let output = temp_path("bad", "ll");
        let mut config = Config::new(&input);
        config.output = output.clone();
        assert_eq!(compile(&config), EXIT_ERRORS);
        assert!(!output.exists(), "no output on error");
        let _ = fs::remove_file(input);
    }

    #[test]
    fn test_compile_fatal_error_exits_two() {
        let input = write_source("fatal", "func f() {} /* unterminated");
        let mut config = Config::new(&input);
        config.output = temp_path("fatal", "ll");
        assert_eq!(compile(&config), EXIT_FATAL);
        let _ = fs::remove_file(input);
    }

    #[test]
    fn test_compile_missing_input_exits_two() {
        let config = Config::new("/nonexistent/scar/input.scar");
        assert_eq!(compile(&config), EXIT_FATAL);
    }

    #[test]
    fn test_debug_info_header() {
        let input = write_source("dbg", "func f() {}");
        let output = temp_path("dbg", "ll");
        let mut config = Config::new(&input);
        config.output = output.clone();
        config.debug_info = true;
        config.module_name = Some("demo".to_string());
        assert_eq!(compile(&config), EXIT_SUCCESS);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("; module: demo\n"));
        let _ = fs::remove_file(input);
        let _ = fs::remove_file(output);
    }
}
