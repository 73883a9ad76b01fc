//! # Introduction
//!
//! xlate translates between a C subset, a Java subset, and a C++ subset.
//! Each direction runs the same pipeline: a hand-written lexer, a
//! recursive-descent parser producing a language-neutral AST, and a
//! single-pass generator for the target language.
//!
//! ## Translation pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Generator → Target source
//! ```
//!
//! 1. [`c`] / [`java`] — front ends; each tokenises its source subset and
//!    builds the shared [`ast::Program`].
//! 2. [`tables`] — type mappings, library-call rewrites, and format-string
//!    conversions between the three targets.
//! 3. [`gen`] — the generators. [`gen::java::JavaGen`] wraps output in a
//!    `Main` class, [`gen::c::CGen`] lowers maps onto an emitted hashmap
//!    runtime and classes onto structs, [`gen::cpp::CppGen`] produces
//!    `cout`/`cin` and `std::map` code.
//!
//! ## Supported subset
//!
//! Types: `int`, `float`, `double`, `char`, `char*`/`String`, `boolean`,
//! 1-D and 2-D fixed-size arrays, integer hashmaps.
//! Control flow: `if/else`, `for`, `while`, `do-while`, `switch/case`,
//! `break`, `continue`, `return`, ternary expressions.
//! I/O: `printf`/`scanf` on the C side, `System.out` and `Scanner` on the
//! Java side, `cout`/`cin` on the C++ side.
//!
//! Generators run in one of two [`gen::GenMode`]s: `Strict` rejects any
//! construct the target has no rule for, `Lenient` leaves a placeholder
//! comment and keeps going.

pub mod ast;
pub mod c;
pub mod error;
pub mod gen;
pub mod java;
pub mod tables;
pub mod token;

use error::TranslateError;
use gen::{c::CGen, cpp::CppGen, java::JavaGen, GenMode};

/// Translate C source to Java.
pub fn c_to_java(source: &str, mode: GenMode) -> Result<String, TranslateError> {
    let program = c::Parser::new(source)?.parse_program()?;
    Ok(JavaGen::new(mode).generate(&program)?)
}

/// Translate C source to C++.
pub fn c_to_cpp(source: &str, mode: GenMode) -> Result<String, TranslateError> {
    let program = c::Parser::new(source)?.parse_program()?;
    Ok(CppGen::new(mode).generate(&program)?)
}

/// Translate Java source to C.
pub fn java_to_c(source: &str, mode: GenMode) -> Result<String, TranslateError> {
    let program = java::Parser::new(source)?.parse_program()?;
    Ok(CGen::new(mode).generate(&program)?)
}
