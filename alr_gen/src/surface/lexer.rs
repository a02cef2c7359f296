// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C9: the grammar-file lexer. Nested comments and balanced-brace code
//! blocks aren't expressible as a single non-recursive regex, so this scans
//! by hand rather than through `lexan::Analyzer`; simple tokens (keywords,
//! punctuation, identifiers) are still recognised the same way the bundled
//! lexicon does it, by longest fixed-string/regex match over what's left
//! after comments and whitespace are stripped.
use lexan::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Percent,
    ColonColonEquals,
    ColonColonIdent,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Ident,
    Keyword(Keyword),
    String,
    Code,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Name,
    Namespace,
    HeaderInclude,
    Include,
    Code,
    TokenDestructor,
    TokenPrefix,
    SyntaxError,
    ParseAccept,
    ParseFailure,
    StackOverflow,
    ExtraArgument,
    TokenType,
    StackSize,
    StartSymbol,
    Left,
    Right,
    Nonassoc,
    Destructor,
    Type,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("name", Keyword::Name),
    ("namespace", Keyword::Namespace),
    ("header_include", Keyword::HeaderInclude),
    ("include", Keyword::Include),
    ("code", Keyword::Code),
    ("token_destructor", Keyword::TokenDestructor),
    ("token_prefix", Keyword::TokenPrefix),
    ("syntax_error", Keyword::SyntaxError),
    ("parse_accept", Keyword::ParseAccept),
    ("parse_failure", Keyword::ParseFailure),
    ("stack_overflow", Keyword::StackOverflow),
    ("extra_argument", Keyword::ExtraArgument),
    ("token_type", Keyword::TokenType),
    ("stack_size", Keyword::StackSize),
    ("start_symbol", Keyword::StartSymbol),
    ("left", Keyword::Left),
    ("right", Keyword::Right),
    ("nonassoc", Keyword::Nonassoc),
    ("destructor", Keyword::Destructor),
    ("type", Keyword::Type),
];

#[derive(Debug, Clone)]
pub struct SurfaceToken {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

#[derive(Debug)]
pub enum LexError {
    UnterminatedComment(Location),
    UnterminatedString(Location),
    UnterminatedCode(Location),
    UnexpectedChar(char, Location),
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LexError::UnterminatedComment(loc) => write!(f, "{}: unterminated comment", loc),
            LexError::UnterminatedString(loc) => write!(f, "{}: unterminated string literal", loc),
            LexError::UnterminatedCode(loc) => write!(f, "{}: unterminated code block", loc),
            LexError::UnexpectedChar(c, loc) => write!(f, "{}: unexpected character '{}'", loc, c),
        }
    }
}

pub struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    location: Location,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, label: &str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            location: Location::new(label),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self, n: usize) {
        self.location.incr(&self.text[self.pos..self.pos + n]);
        self.pos += n;
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.advance(1),
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some() && self.peek() != Some(b'\n') {
                        self.advance(1);
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.location.clone();
                    self.advance(2);
                    let mut depth = 1usize;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some(b'/'), Some(b'*')) => {
                                self.advance(2);
                                depth += 1;
                            }
                            (Some(b'*'), Some(b'/')) => {
                                self.advance(2);
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            (Some(_), _) => self.advance(1),
                            (None, _) => return Err(LexError::UnterminatedComment(start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Scan a `{...}` code block, matching nested braces and skipping over
    /// comments and string literals that may themselves contain `{`/`}`.
    fn scan_code_block(&mut self) -> Result<String, LexError> {
        let start = self.location.clone();
        let content_start = self.pos + 1;
        self.advance(1);
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Some(b'{') => {
                    depth += 1;
                    self.advance(1);
                }
                Some(b'}') => {
                    depth -= 1;
                    if depth == 0 {
                        let content = self.text[content_start..self.pos].to_string();
                        self.advance(1);
                        return Ok(content);
                    }
                    self.advance(1);
                }
                Some(b'"') => self.scan_string_body()?,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some() && self.peek() != Some(b'\n') {
                        self.advance(1);
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance(2);
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some(b'*'), Some(b'/')) => {
                                self.advance(2);
                                break;
                            }
                            (Some(_), _) => self.advance(1),
                            (None, _) => return Err(LexError::UnterminatedComment(start)),
                        }
                    }
                }
                Some(_) => self.advance(1),
                None => return Err(LexError::UnterminatedCode(start)),
            }
        }
    }

    /// Consume a string literal's body (the lexer is positioned on the
    /// opening quote); used both for standalone string tokens and for
    /// strings nested inside code blocks.
    fn scan_string_body(&mut self) -> Result<(), LexError> {
        let start = self.location.clone();
        self.advance(1);
        loop {
            match self.peek() {
                Some(b'\\') if self.peek_at(1).is_some() => self.advance(2),
                Some(b'"') => {
                    self.advance(1);
                    return Ok(());
                }
                Some(_) => self.advance(1),
                None => return Err(LexError::UnterminatedString(start)),
            }
        }
    }

    fn scan_string(&mut self) -> Result<String, LexError> {
        let content_start = self.pos + 1;
        self.scan_string_body()?;
        Ok(self.text[content_start..self.pos - 1].to_string())
    }

    fn scan_ident(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b':' {
                self.advance(1);
            } else {
                break;
            }
        }
        self.text[start..self.pos].to_string()
    }

    pub fn next_token(&mut self) -> Result<SurfaceToken, LexError> {
        self.skip_trivia()?;
        let location = self.location.clone();
        let Some(b) = self.peek() else {
            return Ok(SurfaceToken {
                kind: TokenKind::Eof,
                text: String::new(),
                location,
            });
        };
        match b {
            b'%' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::Percent,
                    text: "%".to_string(),
                    location,
                })
            }
            b':' if self.peek_at(1) == Some(b':') && self.peek_at(2) == Some(b'=') => {
                self.advance(3);
                Ok(SurfaceToken {
                    kind: TokenKind::ColonColonEquals,
                    text: "::=".to_string(),
                    location,
                })
            }
            b':' if self.peek_at(1) == Some(b':') => {
                self.advance(2);
                let ident = self.scan_ident();
                Ok(SurfaceToken {
                    kind: TokenKind::ColonColonIdent,
                    text: ident,
                    location,
                })
            }
            b'.' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::Dot,
                    text: ".".to_string(),
                    location,
                })
            }
            b'(' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::LParen,
                    text: "(".to_string(),
                    location,
                })
            }
            b')' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::RParen,
                    text: ")".to_string(),
                    location,
                })
            }
            b'[' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::LBracket,
                    text: "[".to_string(),
                    location,
                })
            }
            b']' => {
                self.advance(1);
                Ok(SurfaceToken {
                    kind: TokenKind::RBracket,
                    text: "]".to_string(),
                    location,
                })
            }
            b'{' => {
                let text = self.scan_code_block()?;
                Ok(SurfaceToken {
                    kind: TokenKind::Code,
                    text,
                    location,
                })
            }
            b'"' => {
                let text = self.scan_string()?;
                Ok(SurfaceToken {
                    kind: TokenKind::String,
                    text,
                    location,
                })
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let text = self.scan_ident();
                if let Some((_, keyword)) = KEYWORDS.iter().find(|(name, _)| *name == text) {
                    Ok(SurfaceToken {
                        kind: TokenKind::Keyword(*keyword),
                        text,
                        location,
                    })
                } else {
                    Ok(SurfaceToken {
                        kind: TokenKind::Ident,
                        text,
                        location,
                    })
                }
            }
            other => Err(LexError::UnexpectedChar(other as char, location)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(text, "test");
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn tokenizes_rule_with_precedence_and_action() {
        let toks = tokens("expr ::= expr PLUS expr . [PLUS] {$$ = $1 + $3;}");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident,
                TokenKind::ColonColonEquals,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::LBracket,
                TokenKind::Ident,
                TokenKind::RBracket,
                TokenKind::Code,
            ]
        );
    }

    #[test]
    fn nested_block_comment_is_skipped() {
        let toks = tokens("/* outer /* inner */ still-comment */ lhs");
        assert_eq!(toks, vec![TokenKind::Ident]);
    }

    #[test]
    fn code_block_tolerates_nested_braces_and_strings() {
        let mut lexer = Lexer::new("{ if (x) { return \"}\"; } }", "test");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Code);
        assert_eq!(token.text, " if (x) { return \"}\"; } ");
    }

    #[test]
    fn declaration_keyword_recognised() {
        let toks = tokens("%left PLUS MINUS");
        assert_eq!(
            toks,
            vec![
                TokenKind::Percent,
                TokenKind::Keyword(Keyword::Left),
                TokenKind::Ident,
                TokenKind::Ident,
            ]
        );
    }
}
