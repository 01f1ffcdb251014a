//! Rule system for code analysis.
//!
//! Provides the rule trait, metadata, and registry used to run lint rules
//! over parsed JavaScript/TypeScript files.

pub mod quality;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// How certain a rule is that its finding is real and its proposed rewrite
/// sound. Suggestions that may change runtime behavior report below High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn level(&self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Quality,
    Security,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub docs_url: Option<&'static str>,
    pub examples: Option<&'static str>,
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
    quality_enabled: bool,
    security_enabled: bool,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
            quality_enabled: true,
            security_enabled: true,
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules.clear();
        self.severity_overrides.clear();

        for rule_ref in &config.disabled {
            self.disabled_rules.insert(rule_ref.clone());
        }

        for (rule_ref, severity_value) in &config.severity {
            self.severity_overrides
                .insert(rule_ref.clone(), (*severity_value).into());
        }

        self.quality_enabled = config.quality.unwrap_or(true);
        self.security_enabled = config.security.unwrap_or(true);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn run_all(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| self.should_run_rule(rule.as_ref()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check(file);
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                diagnostics
            })
            .collect()
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        let metadata = rule.metadata();

        if !self.quality_enabled && metadata.category == RuleCategory::Quality {
            return false;
        }
        if !self.security_enabled && metadata.category == RuleCategory::Security {
            return false;
        }

        !self.is_rule_disabled(metadata)
    }

    fn is_rule_disabled(&self, metadata: &RuleMetadata) -> bool {
        self.disabled_rules.contains(metadata.id) || self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diag in diagnostics.iter_mut() {
                diag.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        if let Some(rule) = self
            .get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
        {
            self.should_run_rule(rule)
        } else {
            false
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
        $(, docs_url = $url:literal)?
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                        docs_url: declare_rule!(@docs_url $($url)?),
                        examples: declare_rule!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@docs_url $url:literal) => { Some($url) };
    (@docs_url) => { None };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule {
        metadata: RuleMetadata,
        diagnostics_to_return: Vec<Diagnostic>,
    }

    impl TestRule {
        fn new(id: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    id,
                    name: "test-rule",
                    description: "A test rule",
                    category: RuleCategory::Quality,
                    severity: Severity::Warning,
                    docs_url: None,
                    examples: None,
                },
                diagnostics_to_return: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_category(mut self, category: RuleCategory) -> Self {
            self.metadata.category = category;
            self
        }

        fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
            self.diagnostics_to_return.push(diagnostic);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile) -> Vec<Diagnostic> {
            self.diagnostics_to_return.clone()
        }
    }

    #[test]
    fn registry_contains_registered_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002")));

        let rules: Vec<_> = registry.rules().collect();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].metadata().id, "T001");
        assert_eq!(rules[1].metadata().id, "T002");
    }

    #[test]
    fn run_all_collects_diagnostics() {
        let mut registry = RuleRegistry::new();

        let diag1 = Diagnostic::new("T001", Severity::Warning, "Issue 1", "test.js", 1, 1);
        let diag2 = Diagnostic::new("T002", Severity::Error, "Issue 2", "test.js", 2, 1);

        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag1)));
        registry.register(Box::new(TestRule::new("T002").with_diagnostic(diag2)));

        let file = ParsedFile::from_source("test.js", "const x = 1;");
        let diagnostics = registry.run_all(&file);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule_id, "T001");
        assert_eq!(diagnostics[1].rule_id, "T002");
    }

    #[test]
    fn disabled_rule_not_executed() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.js", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let config = RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        };
        registry.configure(&config);

        let file = ParsedFile::from_source("test.js", "const x = 1;");

        assert!(registry.run_all(&file).is_empty());
        assert!(!registry.is_rule_enabled("T001"));
    }

    #[test]
    fn disabled_rule_by_name_not_executed() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.js", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001")
                .with_name("some-rule")
                .with_diagnostic(diag),
        ));

        let config = RulesConfig {
            disabled: vec!["some-rule".to_string()],
            ..Default::default()
        };
        registry.configure(&config);

        let file = ParsedFile::from_source("test.js", "const x = 1;");

        assert!(registry.run_all(&file).is_empty());
    }

    #[test]
    fn disable_category() {
        let mut registry = RuleRegistry::new();
        let diag1 = Diagnostic::new("Q001", Severity::Warning, "Quality issue", "test.js", 1, 1);
        let diag2 = Diagnostic::new("S001", Severity::Warning, "Security issue", "test.js", 2, 1);
        registry.register(Box::new(
            TestRule::new("Q001")
                .with_category(RuleCategory::Quality)
                .with_diagnostic(diag1),
        ));
        registry.register(Box::new(
            TestRule::new("S001")
                .with_category(RuleCategory::Security)
                .with_diagnostic(diag2),
        ));

        let config = RulesConfig {
            quality: Some(false),
            ..Default::default()
        };
        registry.configure(&config);

        let file = ParsedFile::from_source("test.js", "const x = 1;");
        let diagnostics = registry.run_all(&file);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "S001");
    }

    #[test]
    fn override_severity_by_id_and_name() {
        use crate::config::SeverityValue;

        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.js", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001")
                .with_name("some-rule")
                .with_diagnostic(diag),
        ));

        let mut severity_overrides = HashMap::new();
        severity_overrides.insert("some-rule".to_string(), SeverityValue::Error);

        let config = RulesConfig {
            severity: severity_overrides,
            ..Default::default()
        };
        registry.configure(&config);

        let file = ParsedFile::from_source("test.js", "const x = 1;");
        let diagnostics = registry.run_all(&file);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn get_rule_finds_by_id_and_name() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001").with_name("some-rule")));

        assert!(registry.get_rule("T001").is_some());
        assert!(registry.get_rule("UNKNOWN").is_none());
        assert_eq!(
            registry.get_rule_by_name("some-rule").unwrap().metadata().id,
            "T001"
        );
    }

    #[test]
    fn registry_len_returns_count() {
        let mut registry = RuleRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());

        registry.register(Box::new(TestRule::new("T001")));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn confidence_level_ordering() {
        assert!(Confidence::High.level() > Confidence::Medium.level());
        assert!(Confidence::Medium.level() > Confidence::Low.level());
        assert_eq!(Confidence::default(), Confidence::High);
    }

    declare_rule!(
        MacroTestRule,
        id = "M001",
        name = "macro-test",
        description = "Tests the declare_rule! macro",
        category = Quality,
        severity = Info,
        examples = "// Bad\nfoo && foo.bar\n\n// Good\nfoo?.bar"
    );

    impl Rule for MacroTestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile) -> Vec<Diagnostic> {
            Vec::new()
        }
    }

    #[test]
    fn declare_rule_macro_creates_rule() {
        let rule = MacroTestRule::new();
        let metadata = rule.metadata();

        assert_eq!(metadata.id, "M001");
        assert_eq!(metadata.name, "macro-test");
        assert_eq!(metadata.category, RuleCategory::Quality);
        assert_eq!(metadata.severity, Severity::Info);
        assert!(metadata.docs_url.is_none());
        assert!(metadata.examples.unwrap().contains("foo?.bar"));
    }
}
