use crate::token::{lookup_ident, Token, TokenKind};

/// Cursor over the raw source text. `next_token` never fails; bytes that
/// don't start any token come back as `Illegal` and the parser rejects them.
/// Once the input is exhausted it produces `Eof` forever.
pub struct Lexer<'src> {
    input: &'src str,
    position: usize,
    read_position: usize,
    ch: u8,
}

// Sentinel for "past the end of input"
const EOF_CHAR: u8 = 0;

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Lexer<'src> {
        let mut lexer = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: EOF_CHAR,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        let token = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    self.symbol(TokenKind::Eq, "==")
                } else {
                    self.symbol(TokenKind::Assign, "=")
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    self.symbol(TokenKind::NotEq, "!=")
                } else {
                    self.symbol(TokenKind::Bang, "!")
                }
            }
            b'+' => self.symbol(TokenKind::Plus, "+"),
            b'-' => self.symbol(TokenKind::Minus, "-"),
            b'*' => self.symbol(TokenKind::Asterisk, "*"),
            b'/' => self.symbol(TokenKind::Slash, "/"),
            b'<' => self.symbol(TokenKind::Lt, "<"),
            b'>' => self.symbol(TokenKind::Gt, ">"),
            b',' => self.symbol(TokenKind::Comma, ","),
            b';' => self.symbol(TokenKind::Semicolon, ";"),
            b':' => self.symbol(TokenKind::Colon, ":"),
            b'(' => self.symbol(TokenKind::LParen, "("),
            b')' => self.symbol(TokenKind::RParen, ")"),
            b'{' => self.symbol(TokenKind::LBrace, "{"),
            b'}' => self.symbol(TokenKind::RBrace, "}"),
            b'[' => self.symbol(TokenKind::LBracket, "["),
            b']' => self.symbol(TokenKind::RBracket, "]"),
            b'"' => {
                let literal = self.read_string();
                Token {
                    kind: TokenKind::Str,
                    literal,
                }
            }
            EOF_CHAR => Token {
                kind: TokenKind::Eof,
                literal: "",
            },
            ch if is_letter(ch) => {
                // read_identifier advances past the identifier, so return
                // here rather than fall through to the trailing read_char
                let literal = self.read_identifier();
                return Token {
                    kind: lookup_ident(literal),
                    literal,
                };
            }
            ch if ch.is_ascii_digit() => {
                // No numeric conversion here; the parser owns that and its
                // failure reporting
                let literal = self.read_number();
                return Token {
                    kind: TokenKind::Int,
                    literal,
                };
            }
            _ => {
                // Consume the whole character, not one byte, so the slice
                // below stays on a char boundary for multi-byte input
                let start = self.position;
                let width = self.input[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                for _ in 0..width {
                    self.read_char();
                }
                return Token {
                    kind: TokenKind::Illegal,
                    literal: &self.input[start..self.position],
                };
            }
        };
        self.read_char();
        token
    }

    fn symbol(&self, kind: TokenKind, literal: &'static str) -> Token<'src> {
        Token { kind, literal }
    }

    fn read_char(&mut self) {
        self.ch = *self
            .input
            .as_bytes()
            .get(self.read_position)
            .unwrap_or(&EOF_CHAR);
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        *self
            .input
            .as_bytes()
            .get(self.read_position)
            .unwrap_or(&EOF_CHAR)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\r' | b'\n') {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> &'src str {
        let start = self.position;
        while is_letter(self.ch) || self.ch.is_ascii_digit() {
            self.read_char();
        }
        &self.input[start..self.position]
    }

    fn read_number(&mut self) -> &'src str {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        &self.input[start..self.position]
    }

    /// Reads verbatim until the closing quote or end of input. There is no
    /// escape processing in the language.
    fn read_string(&mut self) -> &'src str {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == EOF_CHAR {
                break;
            }
        }
        &self.input[start..self.position]
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_tokens(input: &str, expected: &[(TokenKind, &str)]) {
        let mut lexer = Lexer::new(input);
        for (i, (kind, literal)) in expected.iter().enumerate() {
            let token = lexer.next_token();
            assert_eq!(*kind, token.kind, "token {} of {:?}", i, input);
            assert_eq!(*literal, token.literal, "token {} of {:?}", i, input);
        }
    }

    #[test]
    fn scan_full_token_set() {
        let input = r#"let five = 5;
let ten = 10;

let add = fn(x, y) {
  x + y;
};

let result = add(five, ten);
!-/*5;
5 < 10 > 5;

if (5 < 10) {
  return true;
} else {
  return false;
}

10 == 10;
10 != 9;
"foobar"
"foo bar"
[1, 2];
{"foo": "bar"}
"#;
        use TokenKind::*;
        assert_tokens(
            input,
            &[
                (Let, "let"),
                (Ident, "five"),
                (Assign, "="),
                (Int, "5"),
                (Semicolon, ";"),
                (Let, "let"),
                (Ident, "ten"),
                (Assign, "="),
                (Int, "10"),
                (Semicolon, ";"),
                (Let, "let"),
                (Ident, "add"),
                (Assign, "="),
                (Function, "fn"),
                (LParen, "("),
                (Ident, "x"),
                (Comma, ","),
                (Ident, "y"),
                (RParen, ")"),
                (LBrace, "{"),
                (Ident, "x"),
                (Plus, "+"),
                (Ident, "y"),
                (Semicolon, ";"),
                (RBrace, "}"),
                (Semicolon, ";"),
                (Let, "let"),
                (Ident, "result"),
                (Assign, "="),
                (Ident, "add"),
                (LParen, "("),
                (Ident, "five"),
                (Comma, ","),
                (Ident, "ten"),
                (RParen, ")"),
                (Semicolon, ";"),
                (Bang, "!"),
                (Minus, "-"),
                (Slash, "/"),
                (Asterisk, "*"),
                (Int, "5"),
                (Semicolon, ";"),
                (Int, "5"),
                (Lt, "<"),
                (Int, "10"),
                (Gt, ">"),
                (Int, "5"),
                (Semicolon, ";"),
                (If, "if"),
                (LParen, "("),
                (Int, "5"),
                (Lt, "<"),
                (Int, "10"),
                (RParen, ")"),
                (LBrace, "{"),
                (Return, "return"),
                (True, "true"),
                (Semicolon, ";"),
                (RBrace, "}"),
                (Else, "else"),
                (LBrace, "{"),
                (Return, "return"),
                (False, "false"),
                (Semicolon, ";"),
                (RBrace, "}"),
                (Int, "10"),
                (Eq, "=="),
                (Int, "10"),
                (Semicolon, ";"),
                (Int, "10"),
                (NotEq, "!="),
                (Int, "9"),
                (Semicolon, ";"),
                (Str, "foobar"),
                (Str, "foo bar"),
                (LBracket, "["),
                (Int, "1"),
                (Comma, ","),
                (Int, "2"),
                (RBracket, "]"),
                (Semicolon, ";"),
                (LBrace, "{"),
                (Str, "foo"),
                (Colon, ":"),
                (Str, "bar"),
                (RBrace, "}"),
                (Eof, ""),
            ],
        );
    }

    #[test]
    fn eof_repeats_forever() {
        let mut lexer = Lexer::new("5");
        assert_eq!(TokenKind::Int, lexer.next_token().kind);
        for _ in 0..4 {
            assert_eq!(TokenKind::Eof, lexer.next_token().kind);
        }
    }

    #[test]
    fn unknown_bytes_are_illegal_tokens() {
        let mut lexer = Lexer::new("$let");
        let token = lexer.next_token();
        assert_eq!(TokenKind::Illegal, token.kind);
        assert_eq!("$", token.literal);
        // Lexing continues past the bad byte
        assert_eq!(TokenKind::Let, lexer.next_token().kind);
    }

    #[test]
    fn multibyte_characters_are_illegal_tokens() {
        let mut lexer = Lexer::new("é + 1");
        let token = lexer.next_token();
        assert_eq!(TokenKind::Illegal, token.kind);
        assert_eq!("é", token.literal);
        assert_eq!(TokenKind::Plus, lexer.next_token().kind);
        assert_eq!(TokenKind::Int, lexer.next_token().kind);

        let mut lexer = Lexer::new("💡");
        assert_eq!("💡", lexer.next_token().literal);
        assert_eq!(TokenKind::Eof, lexer.next_token().kind);
    }

    #[test]
    fn unterminated_string_reads_to_end_of_input() {
        let mut lexer = Lexer::new("\"abc");
        let token = lexer.next_token();
        assert_eq!(TokenKind::Str, token.kind);
        assert_eq!("abc", token.literal);
        assert_eq!(TokenKind::Eof, lexer.next_token().kind);
    }

    #[test]
    fn underscores_are_identifier_characters() {
        let mut lexer = Lexer::new("foo_bar _x");
        let token = lexer.next_token();
        assert_eq!(TokenKind::Ident, token.kind);
        assert_eq!("foo_bar", token.literal);
        let token = lexer.next_token();
        assert_eq!("_x", token.literal);
    }
}
