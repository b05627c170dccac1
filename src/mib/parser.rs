//! Lenient MIB module parser.
//!
//! Extracts what OID resolution needs and nothing more: the module name, its
//! imports, every definition that ends in an OID value, and type assignments
//! with their base syntax. Macro bodies, EXPORTS, constraints and clause text
//! are skipped without being checked.

use super::lexer::{Lexer, Token, TokenKind};

/// A parse failure with the line it occurred on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub line: u32,
    pub message: String,
}

/// Parsed module text.
#[derive(Debug)]
pub(crate) struct ModuleDef<'src> {
    pub name: &'src str,
    pub imports: Vec<Import<'src>>,
    pub oids: Vec<OidAssignment<'src>>,
    pub types: Vec<TypeAssignment<'src>>,
}

impl<'src> ModuleDef<'src> {
    /// The module a symbol is imported from, if any.
    pub fn import_source(&self, symbol: &str) -> Option<&'src str> {
        self.imports
            .iter()
            .find(|import| import.symbols.iter().any(|s| *s == symbol))
            .map(|import| import.module)
    }
}

/// `sym, sym FROM Module`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Import<'src> {
    pub module: &'src str,
    pub symbols: Vec<&'src str>,
}

/// A definition whose value is an OID: `name ... ::= { parent 1 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OidAssignment<'src> {
    pub name: &'src str,
    pub line: u32,
    pub components: Vec<OidComponent<'src>>,
    /// First `SYNTAX` clause of the definition.
    pub syntax: Option<TypeRef<'src>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OidComponent<'src> {
    Name(&'src str),
    Number(u32),
    /// `org(3)`
    NamedNumber(&'src str, u32),
}

/// `Name ::= ...` for a type or textual convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeAssignment<'src> {
    pub name: &'src str,
    pub syntax: TypeRef<'src>,
}

/// A reference to a type, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeRef<'src> {
    Named(&'src str),
    OctetString,
    ObjectIdentifier,
    /// SEQUENCE, SEQUENCE OF and CHOICE have no scalar syntax.
    Structured,
}

impl<'src> TypeRef<'src> {
    /// Name to look the type up by, `None` for structured types.
    pub fn name(&self) -> Option<&'src str> {
        match self {
            Self::Named(name) => Some(name),
            Self::OctetString => Some("OCTET STRING"),
            Self::ObjectIdentifier => Some("OBJECT IDENTIFIER"),
            Self::Structured => None,
        }
    }
}

/// Parse one module from source text.
pub(crate) fn parse(source: &str) -> Result<ModuleDef<'_>, ParseError> {
    Parser {
        tokens: Lexer::new(source).tokenize(),
        pos: 0,
    }
    .parse_module()
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Token<'src> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Token<'src> {
        // Eof is always last
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, token: Token<'_>, message: impl Into<String>) -> ParseError {
        ParseError {
            line: token.line,
            message: message.into(),
        }
    }

    fn unexpected(&self, token: Token<'_>, context: &str) -> ParseError {
        if token.kind == TokenKind::Eof {
            self.error(token, format!("unexpected end of input {}", context))
        } else {
            self.error(token, format!("unexpected '{}' {}", token.text, context))
        }
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token<'src>, ParseError> {
        let token = self.bump();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(token, context))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<Token<'src>, ParseError> {
        let token = self.bump();
        if token.is(word) {
            Ok(token)
        } else {
            Err(self.unexpected(token, &format!("(expected {})", word)))
        }
    }

    fn parse_module(mut self) -> Result<ModuleDef<'src>, ParseError> {
        let name = self.expect(TokenKind::Ident, "(expected module name)")?.text;
        if self.peek().kind == TokenKind::LBrace {
            self.skip_balanced()?;
        }
        self.expect_word("DEFINITIONS")?;
        // Tagging defaults such as IMPLICIT TAGS
        while self.peek().kind == TokenKind::Ident {
            self.bump();
        }
        self.expect(TokenKind::Assign, "after DEFINITIONS")?;
        self.expect_word("BEGIN")?;

        let mut module = ModuleDef {
            name,
            imports: Vec::new(),
            oids: Vec::new(),
            types: Vec::new(),
        };

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Ident if token.text == "END" => break,
                TokenKind::Ident if token.text == "IMPORTS" => {
                    self.bump();
                    self.parse_imports(&mut module.imports)?;
                }
                TokenKind::Ident if token.text == "EXPORTS" => {
                    while self.bump().kind != TokenKind::Semicolon {
                        if self.peek().kind == TokenKind::Eof {
                            return Err(self.unexpected(self.peek(), "in EXPORTS"));
                        }
                    }
                }
                TokenKind::Ident => self.parse_assignment(&mut module)?,
                TokenKind::Semicolon => {
                    self.bump();
                }
                _ => return Err(self.unexpected(token, "at top level")),
            }
        }

        Ok(module)
    }

    fn parse_imports(&mut self, imports: &mut Vec<Import<'src>>) -> Result<(), ParseError> {
        let mut symbols = Vec::new();
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::Semicolon if symbols.is_empty() => return Ok(()),
                TokenKind::Ident if token.text == "FROM" => {
                    let module = self.expect(TokenKind::Ident, "(expected module after FROM)")?;
                    imports.push(Import {
                        module: module.text,
                        symbols: std::mem::take(&mut symbols),
                    });
                }
                TokenKind::Ident => symbols.push(token.text),
                TokenKind::Comma => {}
                _ => return Err(self.unexpected(token, "in IMPORTS")),
            }
        }
    }

    fn parse_assignment(&mut self, module: &mut ModuleDef<'src>) -> Result<(), ParseError> {
        let name = self.bump();

        if self.peek().is("MACRO") {
            loop {
                let token = self.bump();
                if token.is("END") {
                    return Ok(());
                }
                if token.kind == TokenKind::Eof {
                    return Err(self.unexpected(token, &format!("in MACRO {}", name.text)));
                }
            }
        }

        if self.peek().kind == TokenKind::Assign {
            self.bump();
            let syntax = self.parse_type_assignment()?;
            module.types.push(TypeAssignment {
                name: name.text,
                syntax,
            });
            return Ok(());
        }

        // Value assignment or macro invocation: scan clauses up to `::=`
        let mut syntax = None;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Assign => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => {
                    return Err(self.unexpected(token, &format!("in definition of {}", name.text)));
                }
                TokenKind::Ident if token.text == "SYNTAX" && syntax.is_none() => {
                    self.bump();
                    syntax = Some(self.parse_type_ref()?);
                }
                _ => {
                    self.bump();
                }
            }
        }

        if self.peek().kind != TokenKind::LBrace {
            // Not an OID value (TRAP-TYPE numbers, plain INTEGER values)
            if self.bump().kind == TokenKind::Minus {
                self.bump();
            }
            return Ok(());
        }

        let components = self.parse_oid_value()?;
        module.oids.push(OidAssignment {
            name: name.text,
            line: name.line,
            components,
            syntax,
        });
        Ok(())
    }

    fn parse_type_assignment(&mut self) -> Result<TypeRef<'src>, ParseError> {
        let token = self.peek();
        if token.is("TEXTUAL-CONVENTION") {
            while !self.peek().is("SYNTAX") {
                if self.bump().kind == TokenKind::Eof {
                    return Err(self.unexpected(self.peek(), "in TEXTUAL-CONVENTION"));
                }
            }
            self.bump();
        } else if token.kind == TokenKind::LBracket {
            // [APPLICATION n] IMPLICIT type
            while self.bump().kind != TokenKind::RBracket {
                if self.peek().kind == TokenKind::Eof {
                    return Err(self.unexpected(self.peek(), "in tag"));
                }
            }
            if self.peek().is("IMPLICIT") || self.peek().is("EXPLICIT") {
                self.bump();
            }
        }

        let syntax = self.parse_type_ref()?;
        self.skip_constraints()?;
        Ok(syntax)
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef<'src>, ParseError> {
        let token = self.expect(TokenKind::Ident, "(expected type)")?;
        match token.text {
            "OCTET" => {
                self.expect_word("STRING")?;
                Ok(TypeRef::OctetString)
            }
            "OBJECT" => {
                self.expect_word("IDENTIFIER")?;
                Ok(TypeRef::ObjectIdentifier)
            }
            "SEQUENCE" if self.peek().is("OF") => {
                self.bump();
                self.expect(TokenKind::Ident, "after SEQUENCE OF")?;
                Ok(TypeRef::Structured)
            }
            "SEQUENCE" | "CHOICE" => {
                if self.peek().kind != TokenKind::LBrace {
                    return Err(self.unexpected(self.peek(), &format!("after {}", token.text)));
                }
                self.skip_balanced()?;
                Ok(TypeRef::Structured)
            }
            name => Ok(TypeRef::Named(name)),
        }
    }

    fn skip_constraints(&mut self) -> Result<(), ParseError> {
        while matches!(self.peek().kind, TokenKind::LParen | TokenKind::LBrace) {
            self.skip_balanced()?;
        }
        Ok(())
    }

    /// Skip a `(...)` or `{...}` group, including nested groups.
    fn skip_balanced(&mut self) -> Result<(), ParseError> {
        let open = self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.bump();
            match token.kind {
                TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(self.error(
                        token,
                        format!("unbalanced '{}' opened on line {}", open.text, open.line),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_oid_value(&mut self) -> Result<Vec<OidComponent<'src>>, ParseError> {
        let open = self.expect(TokenKind::LBrace, "(expected OID value)")?;
        let mut components = Vec::new();
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Number => components.push(OidComponent::Number(self.arc(token)?)),
                TokenKind::Ident => {
                    // Module-qualified reference: keep the last name
                    let mut name = token.text;
                    while self.peek().kind == TokenKind::Dot
                        && self.peek_at(1).kind == TokenKind::Ident
                    {
                        self.bump();
                        name = self.bump().text;
                    }
                    if self.peek().kind == TokenKind::LParen {
                        self.bump();
                        let number = self.expect(TokenKind::Number, "(expected arc number)")?;
                        let arc = self.arc(number)?;
                        self.expect(TokenKind::RParen, "after arc number")?;
                        components.push(OidComponent::NamedNumber(name, arc));
                    } else {
                        components.push(OidComponent::Name(name));
                    }
                }
                _ => return Err(self.unexpected(token, "in OID value")),
            }
        }
        if components.is_empty() {
            return Err(self.error(open, "empty OID value"));
        }
        Ok(components)
    }

    fn arc(&self, token: Token<'_>) -> Result<u32, ParseError> {
        token
            .text
            .parse()
            .map_err(|_| self.error(token, format!("arc {} out of range", token.text)))
    }
}
