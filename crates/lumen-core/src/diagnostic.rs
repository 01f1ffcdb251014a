//! Diagnostic reporting for analysis results.
//!
//! Structured diagnostics produced by rules. A diagnostic may carry one or
//! more [`Fix`] proposals; fixes describe a rewrite but are never applied by
//! this crate. Whether to offer or apply them is the caller's decision.

use serde::Serialize;

use crate::rules::{Confidence, Severity};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        message: impl Into<String>,
        file: &str,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            confidence: Confidence::default(),
            message: message.into(),
            file: file.to_string(),
            line,
            column,
            end_line: line,
            end_column: column,
            suggestion: None,
            fixes: Vec::new(),
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub title: String,
    pub kind: FixKind,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixKind {
    ReplaceWith { new_text: String },
    InsertBefore { text: String },
}

impl Fix {
    pub fn replace(
        title: &str,
        new_text: &str,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self {
            title: title.to_string(),
            kind: FixKind::ReplaceWith {
                new_text: new_text.to_string(),
            },
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn insert_before(title: &str, text: &str, line: usize, column: usize) -> Self {
        Self {
            title: title.to_string(),
            kind: FixKind::InsertBefore {
                text: text.to_string(),
            },
            line,
            column,
            end_line: line,
            end_column: column,
        }
    }
}
