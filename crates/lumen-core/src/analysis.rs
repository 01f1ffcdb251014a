//! Analysis engine for code analysis and diagnostic generation.
//!
//! Provides the core analysis entry point: parse errors and rule findings
//! for one file, with suppression comments and configured confidence
//! thresholds applied.

use tracing::debug;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::quality::PreferChainingOperator;
use crate::rules::{Confidence, RuleRegistry, Severity};

pub struct AnalysisEngine {
    registry: RuleRegistry,
    min_confidence: Option<Confidence>,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            registry: create_default_registry(),
            min_confidence: None,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = create_default_registry();
        registry.configure(&config.rules);
        Self {
            registry,
            min_confidence: config.rules.min_confidence.map(Into::into),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let disable_directives = file.disable_directives();

        for error in file.errors() {
            let diagnostic = Diagnostic::new(
                "PARSE",
                Severity::Error,
                error.message.clone(),
                &file.metadata().filename,
                error.line,
                error.column,
            );
            if !disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                diagnostics.push(diagnostic);
            }
        }

        for diagnostic in self.registry.run_all(file) {
            if disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                continue;
            }
            if let Some(min) = self.min_confidence {
                if diagnostic.confidence.level() < min.level() {
                    continue;
                }
            }
            diagnostics.push(diagnostic);
        }

        debug!(
            file = %file.metadata().filename,
            count = diagnostics.len(),
            "analysis complete"
        );

        diagnostics
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register(Box::new(PreferChainingOperator::new()));

    registry
}
