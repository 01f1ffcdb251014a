//! Visitor context providing file information during AST traversal.

use swc_common::{BytePos, Span};

use crate::parser::ParsedFile;

/// Borrowed view of a file's text plus the span base offset, for code that
/// needs to slice exact source ranges.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    text: &'a str,
    base: u32,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str, base: u32) -> Self {
        Self { text, base }
    }

    /// Byte offset into the source text for an AST position.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base) as usize
    }

    /// Exact source substring covered by `span`, comments and whitespace
    /// included. `None` when the span does not lie inside the text.
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        let lo = self.offset(span.lo);
        let hi = self.offset(span.hi);

        if lo <= hi && hi <= self.text.len() {
            Some(&self.text[lo..hi])
        } else {
            None
        }
    }
}

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    pub fn source_text(&self) -> SourceText<'a> {
        SourceText::new(self.file.source(), self.file.base_pos())
    }

    /// 1-based line and column of the start of `span`.
    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        self.location_at(self.source_text().offset(span.lo))
    }

    /// 1-based start and end line/column of `span`.
    pub fn span_to_range(&self, span: Span) -> (usize, usize, usize, usize) {
        let src = self.source_text();
        let (line, column) = self.location_at(src.offset(span.lo));
        let (end_line, end_column) = self.location_at(src.offset(span.hi));
        (line, column, end_line, end_column)
    }

    /// Byte offsets of `span` into the source text.
    pub fn span_to_offsets(&self, span: Span) -> (usize, usize) {
        let src = self.source_text();
        (src.offset(span.lo), src.offset(span.hi))
    }

    pub fn get_source_text(&self, span: Span) -> Option<&'a str> {
        self.source_text().slice(span)
    }

    fn location_at(&self, offset: usize) -> (usize, usize) {
        let source = self.file.source();
        let offset = offset.min(source.len());
        let prefix = &source[..offset];
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (line, offset - line_start + 1)
    }
}
