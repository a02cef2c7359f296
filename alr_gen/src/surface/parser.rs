// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C9: hand-written recursive-descent parser over [`super::lexer::Lexer`]
//! that populates a [`Generator`]'s symbol/rule tables and an
//! [`EmitterConfig`] from the §6 surface grammar syntax.
use crate::emitter::EmitterConfig;
use crate::grammar::Generator;
use crate::symbol::Associativity;

use super::lexer::{Keyword, LexError, Lexer, SurfaceToken, TokenKind};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: SurfaceToken,
    precedence_level: i32,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, label: &str) -> Result<Self, LexError> {
        let mut lexer = Lexer::new(text, label);
        let lookahead = lexer.next_token()?;
        Ok(Self {
            lexer,
            lookahead,
            precedence_level: 0,
        })
    }

    fn bump(&mut self) -> Result<SurfaceToken, LexError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<SurfaceToken, LexError> {
        if self.lookahead.kind == kind {
            self.bump()
        } else {
            Err(LexError::UnexpectedChar(
                what.chars().next().unwrap_or('?'),
                self.lookahead.location.clone(),
            ))
        }
    }

    /// Parse the whole grammar file into `generator`'s tables and `config`.
    /// Declaration/rule errors are accumulated on `generator.reporter` and
    /// parsing continues (§7's accumulate-and-continue policy); only a
    /// malformed token stream (unterminated comment/string/code) aborts
    /// outright, since there is no sensible resynchronisation point for it.
    pub fn parse(&mut self, generator: &mut Generator, config: &mut EmitterConfig) -> Result<(), LexError> {
        loop {
            match self.lookahead.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Percent => self.parse_declaration(generator, config)?,
                TokenKind::Ident => self.parse_rule(generator)?,
                _ => {
                    let location = self.lookahead.location.clone();
                    generator.reporter.error(
                        Some(location),
                        format!("unexpected token starting with \"{}\"", self.lookahead.text),
                    );
                    self.bump()?;
                }
            }
        }
    }

    fn parse_declaration(&mut self, generator: &mut Generator, config: &mut EmitterConfig) -> Result<(), LexError> {
        self.bump()?; // '%'
        let keyword = match self.lookahead.kind {
            TokenKind::Keyword(kw) => {
                self.bump()?;
                kw
            }
            _ => {
                generator.reporter.error(
                    Some(self.lookahead.location.clone()),
                    format!("\"{}\" is not a recognised declaration", self.lookahead.text),
                );
                return Ok(());
            }
        };
        match keyword {
            Keyword::Left | Keyword::Right | Keyword::Nonassoc => {
                self.precedence_level += 1;
                let associativity = match keyword {
                    Keyword::Left => Associativity::Left,
                    Keyword::Right => Associativity::Right,
                    _ => Associativity::None,
                };
                while self.lookahead.kind == TokenKind::Ident {
                    let token = self.bump()?;
                    let symbol = generator.symbols.find_or_create(&token.text);
                    if let Err(err) =
                        generator
                            .symbols
                            .set_precedence(symbol, associativity, self.precedence_level)
                    {
                        generator
                            .reporter
                            .error(Some(token.location), format!("{}", err));
                    }
                }
            }
            Keyword::Destructor | Keyword::Type => {
                // Symbol-scoped code: `%destructor SYM {code}` / `%type SYM {code}`.
                // Destructor/data-type text is recorded on the symbol table
                // entry so a later `%destructor`/`%type` for the same symbol
                // is caught as a semantic error.
                let mut symbol = None;
                if self.lookahead.kind == TokenKind::Ident {
                    let token = self.bump()?;
                    symbol = Some((generator.symbols.find_or_create(&token.text), token.location));
                }
                if self.lookahead.kind == TokenKind::Code {
                    let code_token = self.bump()?;
                    if let Some((symbol, location)) = symbol {
                        let result = if keyword == Keyword::Destructor {
                            generator
                                .symbols
                                .set_destructor(symbol, code_token.text, code_token.location.line_number() as u32)
                        } else {
                            generator.symbols.set_data_type(symbol, code_token.text)
                        };
                        if let Err(err) = result {
                            generator.reporter.error(Some(location), format!("{}", err));
                        }
                    }
                }
            }
            other => {
                let value = self.parse_declaration_argument()?;
                assign_config(config, other, value);
            }
        }
        Ok(())
    }

    fn parse_declaration_argument(&mut self) -> Result<String, LexError> {
        match self.lookahead.kind {
            TokenKind::Code | TokenKind::String | TokenKind::Ident => {
                Ok(self.bump()?.text)
            }
            _ => Ok(String::new()),
        }
    }

    fn parse_rule(&mut self, generator: &mut Generator) -> Result<(), LexError> {
        let lhs_token = self.bump()?;
        let lhs = generator.symbols.find_or_create(&lhs_token.text);
        let rule_id = generator.rules.create(lhs, lhs_token.location.line_number() as u32);

        if self.lookahead.kind == TokenKind::LParen {
            self.bump()?;
            if self.lookahead.kind == TokenKind::Ident {
                let alias = self.bump()?.text;
                generator.rules.set_lhs_alias(rule_id, alias);
            }
            self.expect(TokenKind::RParen, ")")?;
        }

        self.expect(TokenKind::ColonColonEquals, "::=")?;

        loop {
            match self.lookahead.kind {
                TokenKind::Ident | TokenKind::ColonColonIdent => {
                    let token = self.bump()?;
                    let symbol = generator.symbols.find_or_create(&token.text);
                    let alias = if self.lookahead.kind == TokenKind::LParen {
                        self.bump()?;
                        let alias = if self.lookahead.kind == TokenKind::Ident {
                            Some(self.bump()?.text)
                        } else {
                            None
                        };
                        self.expect(TokenKind::RParen, ")")?;
                        alias
                    } else {
                        None
                    };
                    generator.rules.push_rhs(rule_id, symbol, alias);
                }
                TokenKind::Dot => {
                    self.bump()?;
                    break;
                }
                TokenKind::Eof => {
                    generator.reporter.error(
                        Some(self.lookahead.location.clone()),
                        "unterminated rule: expected \".\"",
                    );
                    return Ok(());
                }
                _ => {
                    generator.reporter.error(
                        Some(self.lookahead.location.clone()),
                        format!("unexpected token \"{}\" in rule right-hand side", self.lookahead.text),
                    );
                    self.bump()?;
                }
            }
        }

        if self.lookahead.kind == TokenKind::LBracket {
            self.bump()?;
            if self.lookahead.kind == TokenKind::Ident {
                let token = self.bump()?;
                let symbol = generator.symbols.find_or_create(&token.text);
                generator.rules.set_explicit_precedence(rule_id, symbol);
            }
            self.expect(TokenKind::RBracket, "]")?;
        }

        if self.lookahead.kind == TokenKind::Code {
            let token = self.bump()?;
            generator
                .rules
                .set_action(rule_id, token.text, token.location.line_number() as u32);
        }

        Ok(())
    }
}

fn assign_config(config: &mut EmitterConfig, keyword: Keyword, value: String) {
    match keyword {
        Keyword::Name => config.name = Some(value),
        Keyword::Namespace => config.namespace = Some(value),
        Keyword::HeaderInclude => config.header_include = Some(value),
        Keyword::Include => config.include = Some(value),
        Keyword::Code => config.code = Some(value),
        Keyword::TokenDestructor => config.token_destructor = Some(value),
        Keyword::TokenPrefix => config.token_prefix = Some(value),
        Keyword::SyntaxError => config.syntax_error = Some(value),
        Keyword::ParseAccept => config.parse_accept = Some(value),
        Keyword::ParseFailure => config.parse_failure = Some(value),
        Keyword::ExtraArgument => config.extra_argument = Some(value),
        Keyword::TokenType => config.token_type = Some(value),
        Keyword::StartSymbol => config.start_symbol = Some(value),
        Keyword::StackOverflow | Keyword::StackSize => {}
        Keyword::Left | Keyword::Right | Keyword::Nonassoc | Keyword::Destructor | Keyword::Type => {
            unreachable!("handled separately in parse_declaration")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn parses_minimal_grammar_with_declarations() {
        let text = r#"
            %name "Calc"
            %left PLUS
            expr ::= expr PLUS expr . [PLUS] {$$ = $1 + $3;}
            expr ::= NUM .
        "#;
        let mut generator = Generator::new(Options::default());
        let mut config = EmitterConfig::default();
        let mut parser = Parser::new(text, "test").unwrap();
        parser.parse(&mut generator, &mut config).unwrap();

        assert_eq!(config.name.as_deref(), Some("Calc"));
        assert_eq!(generator.rules.count(), 2);
        assert!(!generator.reporter.has_errors());
    }

    #[test]
    fn rule_alias_and_precedence_symbol_parsed() {
        let text = "expr(e) ::= expr(a) PLUS(p) expr(b) . [PLUS] {}";
        let mut generator = Generator::new(Options::default());
        let mut config = EmitterConfig::default();
        let mut parser = Parser::new(text, "test").unwrap();
        parser.parse(&mut generator, &mut config).unwrap();

        let rule = generator.rules.nth(generator.rules.ids().next().unwrap());
        assert_eq!(rule.lhs_alias(), Some("e"));
        assert_eq!(rule.rhs()[0].alias.as_deref(), Some("a"));
        assert!(rule.precedence_symbol().is_some());
    }
}
