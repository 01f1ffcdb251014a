//! Core analysis engine for the Lumen static analyzer.
//!
//! Parses JavaScript/TypeScript sources with SWC and runs lint rules over
//! the resulting AST, producing diagnostics with optional rewrite proposals.
//! Nothing in this crate applies a rewrite; fixes are suggestions for the
//! caller to offer.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod disable_comments;
pub mod parser;
pub mod rules;
pub mod visitor;
