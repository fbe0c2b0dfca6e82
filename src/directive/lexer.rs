//! Directive scanner — splits a directive string into literal runs and
//! bracketed combo groups.
//!
//! # Grammar (informal)
//!
//! A combo group starts at `{` and runs to the matching `}` (braces do not
//! nest). The brace content is one or more `+`-separated names. Immediately
//! after the `}` an optional `+` plus a bare ASCII-alphanumeric key name may
//! follow, and after that one optional separator (space, newline, or
//! semicolon) is consumed and not reproduced. Everything the grammar does not
//! match — surrounding words, an unterminated `{`, an empty `{}` — is emitted
//! verbatim as [`Token::Literal`].
//!
//! The lexer is a plain [`Iterator`]; constructing a new one over the same
//! string restarts the scan. Tokens cover the whole input in text order with
//! no gaps and no overlaps (modulo the consumed separators).

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// One span of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain text run, reproduced exactly as written.
    Literal(String),
    /// A `{...}` group plus its optional trailing `+key` suffix.
    Combo(ComboToken),
}

/// The raw pieces of one combo group, before modifier/key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboToken {
    /// Brace-internal names in written order (the `+`-separated list).
    pub names: Vec<String>,
    /// Bare key name captured from a `+key` suffix outside the braces.
    pub trailing_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Iterator over the [`Token`]s of one directive string.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Start a scan over `src`.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.src.len() {
            return None;
        }

        let rest = &self.src[self.pos..];

        if rest.starts_with('{') {
            if let Some((combo, consumed)) = scan_combo(rest) {
                self.pos += consumed;
                return Some(Token::Combo(combo));
            }
            // `{` that opens no valid group falls through into the literal.
        }

        // Literal run: extends to the start of the next *valid* combo group.
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if c == '{' && i > 0 && scan_combo(&rest[i..]).is_some() {
                end = i;
                break;
            }
        }

        self.pos += end;
        Some(Token::Literal(rest[..end].to_string()))
    }
}

// ---------------------------------------------------------------------------
// Combo scanning
// ---------------------------------------------------------------------------

/// Try to scan one combo group at the start of `s` (which begins with `{`).
///
/// Returns the parsed token and the number of bytes consumed, including the
/// optional trailing `+key` suffix and one optional separator. Returns `None`
/// when the braces never close or the content is empty, in which case the
/// caller treats the `{` as literal text.
fn scan_combo(s: &str) -> Option<(ComboToken, usize)> {
    debug_assert!(s.starts_with('{'));

    let close = s.find('}')?;
    if close == 1 {
        // `{}` — no names; not a combo group.
        return None;
    }

    let names: Vec<String> = s[1..close].split('+').map(str::to_string).collect();
    let mut consumed = close + 1;

    // Optional `+key` suffix: a `+` immediately after `}` followed by a
    // non-empty ASCII-alphanumeric run. A `+` with no key chars after it is
    // left for the following literal.
    let mut trailing_key = None;
    let after = &s[consumed..];
    if let Some(suffix) = after.strip_prefix('+') {
        let key_len = suffix
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(suffix.len());
        if key_len > 0 {
            trailing_key = Some(suffix[..key_len].to_string());
            consumed += 1 + key_len;
        }
    }

    // One optional separator after the group is consumed, not reproduced.
    if let Some(c) = s[consumed..].chars().next() {
        if c == ' ' || c == ';' || c == '\n' {
            consumed += c.len_utf8();
        }
    }

    Some((
        ComboToken {
            names,
            trailing_key,
        },
        consumed,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(s: &str) -> Vec<Token> {
        Lexer::new(s).collect()
    }

    fn combo(names: &[&str], trailing_key: Option<&str>) -> Token {
        Token::Combo(ComboToken {
            names: names.iter().map(|s| s.to_string()).collect(),
            trailing_key: trailing_key.map(str::to_string),
        })
    }

    // ---- Plain literals ----------------------------------------------------

    #[test]
    fn no_braces_yields_single_literal() {
        assert_eq!(lex("cd ~"), vec![Token::Literal("cd ~".into())]);
    }

    #[test]
    fn empty_directive_yields_no_tokens() {
        assert_eq!(lex(""), Vec::<Token>::new());
    }

    #[test]
    fn whitespace_only_is_literal() {
        assert_eq!(lex("   "), vec![Token::Literal("   ".into())]);
    }

    // ---- Combo groups ------------------------------------------------------

    #[test]
    fn combo_with_trailing_key() {
        assert_eq!(lex("{Command}+t"), vec![combo(&["Command"], Some("t"))]);
    }

    #[test]
    fn combo_with_two_names_and_trailing_key() {
        assert_eq!(
            lex("{Command+Shift}+d"),
            vec![combo(&["Command", "Shift"], Some("d"))]
        );
    }

    #[test]
    fn combo_without_trailing_key() {
        assert_eq!(lex("{Enter}"), vec![combo(&["Enter"], None)]);
    }

    #[test]
    fn trailing_key_may_be_numeric() {
        assert_eq!(lex("{Command}+1"), vec![combo(&["Command"], Some("1"))]);
    }

    // ---- Separator consumption --------------------------------------------

    #[test]
    fn trailing_space_is_consumed() {
        assert_eq!(
            lex("{Command}+t ls"),
            vec![combo(&["Command"], Some("t")), Token::Literal("ls".into())]
        );
    }

    #[test]
    fn trailing_semicolon_is_consumed() {
        assert_eq!(
            lex("{Command}+t;ls"),
            vec![combo(&["Command"], Some("t")), Token::Literal("ls".into())]
        );
    }

    #[test]
    fn trailing_newline_is_consumed() {
        assert_eq!(
            lex("{Command}+t\nhttps://cnn.com{Enter}"),
            vec![
                combo(&["Command"], Some("t")),
                Token::Literal("https://cnn.com".into()),
                combo(&["Enter"], None),
            ]
        );
    }

    #[test]
    fn only_one_separator_is_consumed() {
        assert_eq!(
            lex("{Command}+t  ls"),
            vec![combo(&["Command"], Some("t")), Token::Literal(" ls".into())]
        );
    }

    #[test]
    fn no_separator_leaves_following_text_intact() {
        // A non-separator character directly after the suffix stays literal.
        assert_eq!(
            lex("{Command}+t~x"),
            vec![combo(&["Command"], Some("t")), Token::Literal("~x".into())]
        );
    }

    // ---- Mixed literal / combo order --------------------------------------

    #[test]
    fn literal_before_and_after_combo() {
        assert_eq!(
            lex("git status{Enter}done"),
            vec![
                Token::Literal("git status".into()),
                combo(&["Enter"], None),
                Token::Literal("done".into()),
            ]
        );
    }

    #[test]
    fn tokens_preserve_text_order() {
        let tokens = lex("a{Command}+t b{Enter}c");
        assert_eq!(
            tokens,
            vec![
                Token::Literal("a".into()),
                combo(&["Command"], Some("t")),
                Token::Literal("b".into()),
                combo(&["Enter"], None),
                Token::Literal("c".into()),
            ]
        );
    }

    // ---- Degenerate braces -------------------------------------------------

    #[test]
    fn unterminated_brace_is_literal() {
        assert_eq!(lex("{Command+t"), vec![Token::Literal("{Command+t".into())]);
    }

    #[test]
    fn empty_braces_are_literal() {
        assert_eq!(lex("{} ok"), vec![Token::Literal("{} ok".into())]);
    }

    #[test]
    fn bare_plus_after_group_stays_literal() {
        // `+` not followed by a key name belongs to the next literal.
        assert_eq!(
            lex("{Command}+ x"),
            vec![combo(&["Command"], None), Token::Literal("+ x".into())]
        );
    }

    // ---- Restartability ----------------------------------------------------

    #[test]
    fn lexer_is_restartable() {
        let src = "{Command}+t ls";
        let first: Vec<Token> = Lexer::new(src).collect();
        let second: Vec<Token> = Lexer::new(src).collect();
        assert_eq!(first, second);
    }
}
