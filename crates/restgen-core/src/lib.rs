//! RestGen Core Library
//!
//! This library generates C# HTTP client implementations for annotated partial
//! classes, working from a symbol table exported by the host compiler.

pub mod builders;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod generate;
pub mod model;
pub mod planner;
pub mod support;
pub mod symbols;
pub mod utils;

pub use crate::{
    config::{Config, GenerationOptions},
    error::{Error, Result},
    generate::{generate, generate_sources, GeneratedSource},
    model::ClassModel,
    symbols::SymbolTable,
};
