//! MIB lexer.
//!
//! Tokenizes SMIv1/SMIv2 module text. Only the distinctions the registry's
//! parser needs are kept: identifiers, numbers, strings and punctuation.
//! Comments (`--` to end of line or to the next `--`) are dropped.

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword (`ifNumber`, `OBJECT-TYPE`, `BEGIN`).
    Ident,
    /// Unsigned decimal number.
    Number,
    /// `"..."`, possibly spanning lines.
    QuotedString,
    /// `'0F'H` or `'0101'B`.
    BinaryString,
    /// `::=`
    Assign,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Pipe,
    Dot,
    DotDot,
    Minus,
    /// Any other byte. Only meaningful inside skipped text.
    Other,
    Eof,
}

/// A token borrowing its text from the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// 1-based line of the token's first byte.
    pub line: u32,
}

impl Token<'_> {
    /// Whether this is the identifier or keyword `word`.
    pub fn is(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }
}

pub(crate) struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Tokenize the whole source. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0C) => {
                    self.advance();
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => self.skip_comment(),
                _ => return,
            }
        }
    }

    fn skip_comment(&mut self) {
        self.pos += 2;
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => return,
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: u32) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start..self.pos],
            line,
        }
    }

    fn next_token(&mut self) -> Token<'src> {
        self.skip_trivia();

        let start = self.pos;
        let line = self.line;
        let Some(b) = self.advance() else {
            return self.token(TokenKind::Eof, start, line);
        };

        let kind = match b {
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b'|' => TokenKind::Pipe,
            b'-' => TokenKind::Minus,
            b'.' if self.peek() == Some(b'.') => {
                self.advance();
                TokenKind::DotDot
            }
            b'.' => TokenKind::Dot,
            b':' if self.peek() == Some(b':') && self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                TokenKind::Assign
            }
            b'"' => {
                while let Some(c) = self.advance() {
                    if c == b'"' {
                        break;
                    }
                }
                TokenKind::QuotedString
            }
            b'\'' => {
                while let Some(c) = self.advance() {
                    if c == b'\'' {
                        break;
                    }
                }
                if matches!(self.peek(), Some(b'H' | b'h' | b'B' | b'b')) {
                    self.advance();
                }
                TokenKind::BinaryString
            }
            b'0'..=b'9' => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
                TokenKind::Number
            }
            b'A'..=b'Z' | b'a'..=b'z' => {
                while let Some(c) = self.peek() {
                    let continues = c.is_ascii_alphanumeric()
                        || c == b'_'
                        || (c == b'-' && self.peek_at(1) != Some(b'-'));
                    if !continues {
                        break;
                    }
                    self.advance();
                }
                TokenKind::Ident
            }
            _ => {
                // Keep multi-byte characters whole so `text` stays on a char boundary
                while !self.source.is_char_boundary(self.pos) {
                    self.pos += 1;
                }
                TokenKind::Other
            }
        };

        self.token(kind, start, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(src)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            kinds("ifNumber OBJECT-TYPE ::= { interfaces 1 }"),
            vec![
                (TokenKind::Ident, "ifNumber"),
                (TokenKind::Ident, "OBJECT-TYPE"),
                (TokenKind::Assign, "::="),
                (TokenKind::LBrace, "{"),
                (TokenKind::Ident, "interfaces"),
                (TokenKind::Number, "1"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(
            kinds("a -- comment\nb -- inline -- c"),
            vec![
                (TokenKind::Ident, "a"),
                (TokenKind::Ident, "b"),
                (TokenKind::Ident, "c"),
                (TokenKind::Eof, ""),
            ]
        );
        // "--" ends an identifier
        assert_eq!(kinds("foo--bar\n")[0], (TokenKind::Ident, "foo"));
    }

    #[test]
    fn test_strings_and_ranges() {
        let tokens = Lexer::new("DESCRIPTION \"two\nlines\" SIZE (0..255) DEFVAL { 'ff'H }\nx").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::QuotedString);
        assert_eq!(tokens[5].kind, TokenKind::DotDot);
        assert_eq!(tokens[10].kind, TokenKind::BinaryString);
        assert_eq!(tokens[10].text, "'ff'H");
        let last = tokens[tokens.len() - 2];
        assert!(last.is("x"));
        assert_eq!(last.line, 3);
    }

    #[test]
    fn test_unicode_is_other() {
        let tokens = Lexer::new("a \u{00e9} b").tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Other);
        assert!(tokens[2].is("b"));
    }
}
