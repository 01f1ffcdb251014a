//! Parser integration for JavaScript/TypeScript source code.
//!
//! Wraps SWC's error-recovering parser and owns the mapping between AST
//! spans and byte offsets in the original source text. SWC assigns each
//! source file a base position inside its `SourceMap`; every span in the
//! returned module is offset by that base, so `ParsedFile` records it and
//! all downstream slicing goes through it.

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_parser::{
    EsSyntax, StringInput, Syntax, TsSyntax, lexer::Lexer, parse_file_as_module,
};

use crate::disable_comments::DisableDirectives;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Byte position SWC assigned to the start of the file; spans in
    /// `module` are relative to this, not to offset zero.
    pub base_pos: u32,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

/// A source file together with its parse output and suppression directives.
/// The source string is kept verbatim so rules can slice exact ranges,
/// comments and all.
pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    base_pos: u32,
    disable_directives: DisableDirectives,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let parser = Parser::for_file(filename);
        let parse_result = parser.parse_module_recovering(source);
        let disable_directives = DisableDirectives::from_source(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count,
            has_errors: parse_result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: parse_result.module,
            errors: parse_result.errors,
            base_pos: parse_result.base_pos,
            disable_directives,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Offset of `span.lo` for the first byte of the source text.
    pub fn base_pos(&self) -> u32 {
        self.base_pos
    }

    pub fn disable_directives(&self) -> &DisableDirectives {
        &self.disable_directives
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Strict parse: the first syntax error aborts and is returned.
    pub fn parse_module(&self, code: &str) -> Result<Module, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let lexer = Lexer::new(
            self.syntax,
            Default::default(),
            StringInput::from(&*fm),
            None,
        );

        let mut parser = swc_ecma_parser::Parser::new_from(lexer);

        parser.parse_module().map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            ParseError {
                line: loc.line,
                column: loc.col_display,
                message: e.kind().msg().to_string(),
            }
        })
    }

    /// Recovering parse: collects what errors it can and still returns a
    /// module when SWC manages to produce one.
    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());
        let base_pos = fm.start_pos.0;

        let mut recovered_errors = Vec::new();

        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            ParseError {
                line: loc.line,
                column: loc.col_display,
                message: e.kind().msg().to_string(),
            }
        };

        let mut errors: Vec<ParseError> = recovered_errors
            .into_iter()
            .map(|e| to_parse_error(e))
            .collect();

        match result {
            Ok(module) => ParseResult {
                module: Some(module),
                errors,
                base_pos,
            },
            Err(e) => {
                errors.push(to_parse_error(e));
                ParseResult {
                    module: None,
                    errors,
                    base_pos,
                }
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
