//! Declaration scanning over the significant (non-trivia) token stream.
//!
//! Recognizes type declarations, method headers (block or expression bodied),
//! their parameters, and local variable declarations. Each declaration gets a
//! visibility scope derived from the brace blocks found by
//! [`delimiters::balance`](super::delimiters::balance).

use std::collections::HashSet;

use snippet_types::OffsetRange;

use super::delimiters::Delimiters;
use super::keywords::{MEMBER_MODIFIERS, PARAMETER_MODIFIERS, TYPE_DECLARATION_KEYWORDS};
use super::lexer::{Token, TokenKind};
use crate::{DeclaredMethod, SymbolKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub name: String,
    pub kind: SymbolKind,
    pub type_name: Option<String>,
    pub name_range: OffsetRange,
    /// Where the declaration is visible
    pub scope: OffsetRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodHeader {
    pub method: DeclaredMethod,
    /// Modifier keywords in front of the return type
    pub modifiers: Vec<(String, OffsetRange)>,
    pub return_type_start: usize,
    /// Method body: the `{ }` block, or `=> ... ;` for expression bodies
    pub body: OffsetRange,
    /// `true` unless the header sits inside another method's body
    pub is_member: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Declarations {
    /// All declarations sorted by name position
    pub items: Vec<Declaration>,
    pub methods: Vec<MethodHeader>,
    /// Start offsets of identifier tokens used in type position
    pub type_positions: HashSet<usize>,
}

impl Declarations {
    pub(crate) fn type_names(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|d| d.kind == SymbolKind::Type)
            .map(|d| d.name.as_str())
    }
}

pub(crate) fn collect(text: &str, tokens: &[Token], delimiters: &Delimiters) -> Declarations {
    let sig: Vec<Token> = tokens
        .iter()
        .filter(|t| !t.kind.is_trivia())
        .copied()
        .collect();
    let mut scanner = Scanner {
        text,
        sig: &sig,
        delimiters,
        whole: OffsetRange::new(0, text.len()),
        out: Declarations::default(),
        parameter_lists: Vec::new(),
    };
    scanner.scan();
    scanner.finish()
}

struct Scanner<'a> {
    text: &'a str,
    sig: &'a [Token],
    delimiters: &'a Delimiters,
    whole: OffsetRange,
    out: Declarations,
    parameter_lists: Vec<OffsetRange>,
}

impl Scanner<'_> {
    fn t(&self, i: usize) -> &str {
        self.sig
            .get(i)
            .map_or("", |tok| &self.text[tok.range.start..tok.range.end])
    }

    fn kind(&self, i: usize) -> Option<TokenKind> {
        self.sig.get(i).map(|tok| tok.kind)
    }

    fn range(&self, i: usize) -> OffsetRange {
        self.sig
            .get(i)
            .map_or(OffsetRange::at(self.text.len()), |tok| tok.range)
    }

    fn is_keyword(&self, i: usize, set: &[&str]) -> bool {
        self.kind(i) == Some(TokenKind::Keyword) && set.contains(&self.t(i))
    }

    /// Whether a declaration may start at `i`, judged by the token before it
    fn at_statement_start(&self, i: usize, extra: &[&str]) -> bool {
        i == 0 || matches!(self.t(i - 1), "{" | "}" | ";") || extra.contains(&self.t(i - 1))
    }

    fn scan(&mut self) {
        for i in 0..self.sig.len() {
            if self.is_keyword(i, TYPE_DECLARATION_KEYWORDS)
                && self.kind(i + 1) == Some(TokenKind::Ident)
            {
                let scope = self.whole;
                self.push(i + 1, SymbolKind::Type, None, scope);
            }
            if self.at_statement_start(i, &["]"]) {
                self.method_header(i);
            }
        }

        // Locals need every parameter list known up front
        for i in 0..self.sig.len() {
            let start = self.range(i).start;
            if self.parameter_lists.iter().any(|list| list.contains(start)) {
                continue;
            }
            self.local(i);
        }
    }

    fn finish(mut self) -> Declarations {
        let bodies: Vec<OffsetRange> = self.out.methods.iter().map(|m| m.body).collect();
        for header in &mut self.out.methods {
            let start = header.method.name_range.start;
            header.is_member = !bodies
                .iter()
                .any(|body| body.start < start && start < body.end);
        }
        self.out.items.sort_by_key(|d| d.name_range.start);
        self.out
    }

    fn push(&mut self, i: usize, kind: SymbolKind, type_name: Option<String>, scope: OffsetRange) {
        self.out.items.push(Declaration {
            name: self.t(i).to_string(),
            kind,
            type_name,
            name_range: self.range(i),
            scope,
        });
    }

    fn mark_type_positions(&mut self, from: usize, to: usize) {
        for i in from..to {
            if self.kind(i) == Some(TokenKind::Ident) {
                self.out.type_positions.insert(self.range(i).start);
            }
        }
    }

    /// Parse a type starting at `i`; returns the index after it and its spelling.
    fn parse_type(&self, i: usize) -> Option<(usize, String)> {
        if !matches!(
            self.kind(i),
            Some(TokenKind::Ident | TokenKind::PredefinedType)
        ) {
            return None;
        }
        let mut text = self.t(i).to_string();
        let mut j = i + 1;
        while self.t(j) == "." && self.kind(j + 1) == Some(TokenKind::Ident) {
            text.push('.');
            text.push_str(self.t(j + 1));
            j += 2;
        }
        if self.t(j) == "<" {
            if let Some(close) = self.generic_arguments_end(j) {
                for k in j..=close {
                    text.push_str(self.t(k));
                    if self.t(k) == "," {
                        text.push(' ');
                    }
                }
                j = close + 1;
            }
        }
        if self.t(j) == "?" {
            text.push('?');
            j += 1;
        }
        while self.t(j) == "[" && self.t(j + 1) == "]" {
            text.push_str("[]");
            j += 2;
        }
        Some((j, text))
    }

    /// Index of the `>` closing the generic argument list opened at `open`
    fn generic_arguments_end(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for k in open..self.sig.len() {
            match self.t(k) {
                "<" => depth += 1,
                ">" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(k);
                    }
                }
                "," | "." | "?" | "[" | "]" => {}
                _ if matches!(
                    self.kind(k),
                    Some(TokenKind::Ident | TokenKind::PredefinedType)
                ) => {}
                _ => return None,
            }
        }
        None
    }

    /// Index of the `)` matching the `(` at `open`
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for k in open..self.sig.len() {
            match self.t(k) {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(k);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Index of the `;` ending the expression starting at `from`
    fn statement_end(&self, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        for k in from..self.sig.len() {
            match self.t(k) {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    if depth == 0 {
                        return None;
                    }
                    depth -= 1;
                }
                ";" if depth == 0 => return Some(k),
                _ => {}
            }
        }
        None
    }

    fn method_header(&mut self, i: usize) {
        let mut j = i;
        let mut modifiers = Vec::new();
        while self.is_keyword(j, MEMBER_MODIFIERS) {
            modifiers.push((self.t(j).to_string(), self.range(j)));
            j += 1;
        }
        let return_type_start = j;
        let Some((name, return_type)) = self.parse_type(j) else {
            return;
        };
        if self.kind(name) != Some(TokenKind::Ident) || self.t(name + 1) != "(" {
            return;
        }
        let Some(close) = self.matching_paren(name + 1) else {
            return;
        };

        let body = match self.t(close + 1) {
            "{" => {
                let open = self.range(close + 1).start;
                self.delimiters
                    .block_opened_at(open)
                    .unwrap_or_else(|| OffsetRange::new(open, self.text.len()))
            }
            "=>" => {
                let arrow = self.range(close + 1).start;
                let end = self
                    .statement_end(close + 2)
                    .map_or(self.text.len(), |k| self.range(k).end);
                OffsetRange::new(arrow, end)
            }
            _ => return,
        };

        self.mark_type_positions(return_type_start, name);
        self.parameter_lists.push(OffsetRange::new(
            self.range(name + 1).start,
            self.range(close).end,
        ));
        let first_parameter_type = self.parameters(name + 2, close, body);

        let method_scope = self
            .delimiters
            .innermost_block(self.range(name).start)
            .unwrap_or(self.whole);
        self.push(
            name,
            SymbolKind::Method,
            Some(return_type.clone()),
            method_scope,
        );

        self.out.methods.push(MethodHeader {
            method: DeclaredMethod {
                name: self.t(name).to_string(),
                return_type,
                first_parameter_type: first_parameter_type.unwrap_or_default(),
                name_range: self.range(name),
            },
            modifiers,
            return_type_start: self.range(return_type_start).start,
            body,
            is_member: true,
        });
    }

    /// Declare the parameters in `from..to`; returns the first parameter's type.
    fn parameters(&mut self, from: usize, to: usize, body: OffsetRange) -> Option<String> {
        let mut segments = Vec::new();
        let mut segment_start = from;
        let mut depth = 0usize;
        for k in from..to {
            match self.t(k) {
                "(" | "[" | "<" | "{" => depth += 1,
                ")" | "]" | ">" | "}" => depth = depth.saturating_sub(1),
                "," if depth == 0 => {
                    segments.push((segment_start, k));
                    segment_start = k + 1;
                }
                _ => {}
            }
        }
        if segment_start < to {
            segments.push((segment_start, to));
        }

        let mut first = None;
        for (index, (start, end)) in segments.into_iter().enumerate() {
            let ty = self.parameter(start, end, body);
            if index == 0 {
                first = ty;
            }
        }
        first
    }

    fn parameter(&mut self, from: usize, to: usize, body: OffsetRange) -> Option<String> {
        let mut p = from;
        while self.t(p) == "[" {
            while p < to && self.t(p) != "]" {
                p += 1;
            }
            p += 1;
        }
        while self.is_keyword(p, PARAMETER_MODIFIERS) {
            p += 1;
        }
        let (q, ty) = self.parse_type(p)?;
        if q >= to || self.kind(q) != Some(TokenKind::Ident) {
            return None;
        }
        self.mark_type_positions(p, q);
        self.push(q, SymbolKind::Parameter, Some(ty.clone()), body);
        Some(ty)
    }

    fn local(&mut self, i: usize) {
        if self.kind(i) == Some(TokenKind::Keyword) && self.t(i) == "var" {
            if self.kind(i + 1) == Some(TokenKind::Ident)
                && matches!(self.t(i + 2), "=" | ";" | "in")
            {
                let scope = self.local_scope(i + 1);
                self.push(i + 1, SymbolKind::Local, None, scope);
            }
            return;
        }
        if !self.at_statement_start(i, &["("]) {
            return;
        }
        let Some((name, ty)) = self.parse_type(i) else {
            return;
        };
        if self.kind(name) == Some(TokenKind::Ident) && matches!(self.t(name + 1), "=" | ";" | "in")
        {
            self.mark_type_positions(i, name);
            let scope = self.local_scope(name);
            self.push(name, SymbolKind::Local, Some(ty), scope);
        }
    }

    /// From the declared name to the end of the enclosing block
    fn local_scope(&self, name: usize) -> OffsetRange {
        let start = self.range(name).start;
        let end = self
            .delimiters
            .innermost_block(start)
            .map_or(self.text.len(), |block| block.end);
        OffsetRange::new(start, end)
    }
}
