//! Random-access token stream over a script source.
//!
//! The swc lexer skips whitespace and comments, but faithful source
//! reconstruction needs every byte. `TokenStream` therefore materializes the
//! gaps between lexed tokens as trivia tokens, so that copying any contiguous
//! token range reproduces the original source text exactly.

use crate::utils::{build_line_index, offset_to_line};

/// One token of a script source, trivia included.
#[derive(Debug, Clone)]
pub struct Token {
    /// Raw source text of the token.
    pub text: String,
    /// 1-based line of the token's first byte.
    pub line: usize,
    /// Byte offset of the token's first byte.
    pub lo: usize,
    /// Byte offset one past the token's last byte.
    pub hi: usize,
    /// True for synthesized whitespace/comment filler.
    pub trivia: bool,
}

/// Random-access token stream with line numbers and lossless text.
#[derive(Debug, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Build a stream from the byte spans of the lexed tokens.
    ///
    /// `spans` must be sorted and non-overlapping; any source bytes not
    /// covered by a span become trivia tokens.
    pub fn new(source: &str, spans: &[(usize, usize)]) -> Self {
        let line_index = build_line_index(source);
        let mut tokens = Vec::with_capacity(spans.len() * 2);
        let mut prev_end = 0usize;

        let mut push = |lo: usize, hi: usize, trivia: bool, tokens: &mut Vec<Token>| {
            if lo >= hi || hi > source.len() {
                return;
            }
            tokens.push(Token {
                text: source[lo..hi].to_string(),
                line: offset_to_line(&line_index, lo),
                lo,
                hi,
                trivia,
            });
        };

        for &(lo, hi) in spans {
            if lo > prev_end {
                push(prev_end, lo, true, &mut tokens);
            }
            push(lo, hi, false, &mut tokens);
            prev_end = prev_end.max(hi);
        }
        if prev_end < source.len() {
            push(prev_end, source.len(), true, &mut tokens);
        }

        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// Raw text of the token at `index`.
    pub fn text(&self, index: usize) -> &str {
        &self.tokens[index].text
    }

    /// 1-based line of the token at `index`.
    pub fn line(&self, index: usize) -> usize {
        self.tokens[index].line
    }

    /// Map a byte span onto (start, stop) token indices, both inclusive.
    ///
    /// `lo` must sit on a token boundary produced by the lexer; `hi` is the
    /// exclusive end offset of the span. Degenerate spans clamp to a single
    /// token.
    pub fn bounds(&self, lo: usize, hi: usize) -> (usize, usize) {
        let start = self.tokens.partition_point(|t| t.lo < lo);
        let stop = self.tokens.partition_point(|t| t.hi <= hi);
        let start = start.min(self.tokens.len().saturating_sub(1));
        let stop = stop.saturating_sub(1).max(start);
        (start, stop)
    }

    /// Concatenate the raw text of tokens in `range` (inclusive start,
    /// exclusive end).
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len());
        let mut out = String::new();
        for token in &self.tokens[start.min(end)..end] {
            out.push_str(&token.text);
        }
        out
    }
}
