//! Rewrites member method headers into `public static` form before compiling.

use super::declarations::MethodHeader;
use super::keywords::ACCESS_MODIFIERS;

struct Edit {
    start: usize,
    end: usize,
    text: &'static str,
}

/// Returns the promoted source and the number of headers that changed.
pub(crate) fn promote(text: &str, methods: &[MethodHeader]) -> (String, usize) {
    let mut edits = Vec::new();
    let mut promoted = 0;

    for header in methods.iter().filter(|m| m.is_member) {
        let before = edits.len();

        // Applied back to front, so an insertion pushed first ends up last
        // when two share an offset: `static` must be pushed before `public`.
        if !header.modifiers.iter().any(|(m, _)| m == "static") {
            edits.push(Edit {
                start: header.return_type_start,
                end: header.return_type_start,
                text: "static ",
            });
        }

        let mut access = header
            .modifiers
            .iter()
            .filter(|(m, _)| ACCESS_MODIFIERS.contains(&m.as_str()));
        match access.next() {
            None => {
                let at = header
                    .modifiers
                    .first()
                    .map_or(header.return_type_start, |(_, range)| range.start);
                edits.push(Edit {
                    start: at,
                    end: at,
                    text: "public ",
                });
            }
            Some((first, range)) => {
                if first != "public" {
                    edits.push(Edit {
                        start: range.start,
                        end: range.end,
                        text: "public",
                    });
                }
                // `protected internal` and friends collapse into one `public`
                for (_, range) in access {
                    edits.push(Edit {
                        start: range.start,
                        end: range.end,
                        text: "",
                    });
                }
            }
        }

        if edits.len() > before {
            promoted += 1;
        }
    }

    edits.sort_by_key(|edit| std::cmp::Reverse(edit.start));
    let mut out = text.to_string();
    for edit in edits {
        out.replace_range(edit.start..edit.end, edit.text);
    }
    (out, promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{declarations, delimiters, lexer};

    fn promote_text(text: &str) -> (String, usize) {
        let lexed = lexer::lex(text);
        let delims = delimiters::balance(text, &lexed.tokens);
        let decls = declarations::collect(text, &lexed.tokens, &delims);
        promote(text, &decls.methods)
    }

    #[test]
    fn test_bare_method_gets_both_modifiers() {
        let (out, count) = promote_text("class W { bool __4(P p) { return true; } }");
        assert_eq!(out, "class W { public static bool __4(P p) { return true; } }");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_private_instance_method() {
        let (out, count) = promote_text("class W { private int F(P p) => 1; }");
        assert_eq!(out, "class W { public static int F(P p) => 1; }");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_already_public_static_is_untouched() {
        let text = "class W { public static bool G(this P p) { return true; } }";
        let (out, count) = promote_text(text);
        assert_eq!(out, text);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_static_without_access_modifier() {
        let (out, _) = promote_text("class W { static bool H() { return true; } }");
        assert_eq!(out, "class W { public static bool H() { return true; } }");
    }

    #[test]
    fn test_local_functions_are_not_promoted() {
        let (out, count) =
            promote_text("class W { public static void O() { int L(int a) => a; } }");
        assert_eq!(out, "class W { public static void O() { int L(int a) => a; } }");
        assert_eq!(count, 0);
    }
}
