//! Delimiter balancing.
//!
//! Produces the brace blocks used for scoping and a diagnostic for every
//! delimiter that has no partner.

use snippet_types::OffsetRange;

use super::lexer::{Token, TokenKind};
use crate::BackendDiagnostic;

#[derive(Debug, Default)]
pub(crate) struct Delimiters {
    /// `{ ... }` pairs, sorted by start offset
    pub blocks: Vec<OffsetRange>,
    pub errors: Vec<BackendDiagnostic>,
}

impl Delimiters {
    /// The block opened by the `{` at `offset`
    pub(crate) fn block_opened_at(&self, offset: usize) -> Option<OffsetRange> {
        self.blocks
            .binary_search_by_key(&offset, |block| block.start)
            .ok()
            .map(|i| self.blocks[i])
    }

    /// The smallest block strictly enclosing `offset`
    pub(crate) fn innermost_block(&self, offset: usize) -> Option<OffsetRange> {
        self.blocks
            .iter()
            .filter(|block| block.start < offset && offset < block.end)
            .min_by_key(|block| block.len())
            .copied()
    }
}

const fn opener_for(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

pub(crate) fn balance(text: &str, tokens: &[Token]) -> Delimiters {
    let mut stack: Vec<(char, OffsetRange)> = Vec::new();
    let mut out = Delimiters::default();

    for token in tokens.iter().filter(|t| t.kind == TokenKind::Punct) {
        let Some(c) = single_char(&text[token.range.start..token.range.end]) else {
            continue;
        };
        match c {
            '(' | '[' | '{' => stack.push((c, token.range)),
            ')' | ']' | '}' => {
                let open = opener_for(c);
                match stack.iter().rposition(|(o, _)| *o == open) {
                    Some(depth) => {
                        for (o, range) in stack.drain(depth + 1..) {
                            out.errors.push(unclosed(o, range));
                        }
                        if let Some((_, open_range)) = stack.pop() {
                            if open == '{' {
                                out.blocks
                                    .push(OffsetRange::new(open_range.start, token.range.end));
                            }
                        }
                    }
                    None => out.errors.push(BackendDiagnostic::error(
                        format!("unexpected closing `{c}`"),
                        token.range,
                    )),
                }
            }
            _ => {}
        }
    }

    for (o, range) in stack {
        out.errors.push(unclosed(o, range));
    }

    out.blocks.sort_by_key(|block| block.start);
    out.errors.sort_by_key(|diag| diag.range.start);
    out
}

fn unclosed(open: char, range: OffsetRange) -> BackendDiagnostic {
    BackendDiagnostic::error(format!("unclosed `{open}`"), range)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
