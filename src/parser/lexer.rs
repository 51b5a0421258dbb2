//! Lexer (tokenizer) for Soo source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The stream always ends with a single [`TokenKind::Eof`] token, which is what
//! the parser uses as its end marker.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer.
///
/// The kind is what the parser matches on and what syntax errors report; the
/// source text lives in [`Token::lexeme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Num,

    // Identifiers
    Id,

    // Keywords
    Class,
    Public,
    Static,
    Void,
    Main,
    String,
    Extends,
    Return,
    Int,
    Boolean,
    If,
    Else,
    While,
    Println, // System.out.println
    True,
    False,
    This,
    New,

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Bang,   // !
    Lt,     // <
    AndAnd, // &&
    Eq,     // =

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    Comma,     // ,
    Semicolon, // ;

    // End of file
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Num => write!(f, "integer literal"),
            TokenKind::Id => write!(f, "identifier"),
            TokenKind::Class => write!(f, "'class'"),
            TokenKind::Public => write!(f, "'public'"),
            TokenKind::Static => write!(f, "'static'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::Main => write!(f, "'main'"),
            TokenKind::String => write!(f, "'String'"),
            TokenKind::Extends => write!(f, "'extends'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Int => write!(f, "'int'"),
            TokenKind::Boolean => write!(f, "'boolean'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Println => write!(f, "'System.out.println'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::This => write!(f, "'this'"),
            TokenKind::New => write!(f, "'new'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A single token: its kind, the exact source text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Num => write!(f, "integer literal {}", self.lexeme),
            TokenKind::Id => write!(f, "identifier '{}'", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {}", .location.line, .location.column, .message)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

const PRINTLN_SUFFIX: &str = ".out.println";

/// Lexer for Soo source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        log::trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        let kind = match ch {
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    return Ok(Token::new(TokenKind::AndAnd, "&&", loc));
                }
                return Err(LexError {
                    message: "Expected '&&', found a single '&'".to_string(),
                    location: loc,
                });
            }

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '!' => TokenKind::Bang,
            '<' => TokenKind::Lt,
            '=' => TokenKind::Eq,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                });
            }
        };

        Ok(Token::new(kind, ch.to_string(), loc))
    }

    /// Parse numeric literal (32-bit integers only)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.parse::<i32>().is_err() {
            return Err(LexError {
                message: format!("Integer literal out of range: {}", num_str),
                location: loc,
            });
        }

        Ok(Token::new(TokenKind::Num, num_str, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if ident == "System" && self.lookahead_is(PRINTLN_SUFFIX) {
            for _ in 0..PRINTLN_SUFFIX.len() {
                self.advance();
            }
            ident.push_str(PRINTLN_SUFFIX);
            return Token::new(TokenKind::Println, ident, loc);
        }

        // Check if it's a keyword
        let kind = match ident.as_str() {
            "class" => TokenKind::Class,
            "public" => TokenKind::Public,
            "static" => TokenKind::Static,
            "void" => TokenKind::Void,
            "main" => TokenKind::Main,
            "String" => TokenKind::String,
            "extends" => TokenKind::Extends,
            "return" => TokenKind::Return,
            "int" => TokenKind::Int,
            "boolean" => TokenKind::Boolean,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "this" => TokenKind::This,
            "new" => TokenKind::New,
            _ => TokenKind::Id,
        };

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Whether the unconsumed input starts with `text`
    fn lookahead_is(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek_ahead(i) == Some(expected))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("class Main { public static void main(String[] a) { } }");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Class);
        assert_eq!(tokens[1].kind, TokenKind::Main);
        assert_eq!(tokens[2].kind, TokenKind::LBrace);
        assert_eq!(tokens[3].kind, TokenKind::Public);
        assert_eq!(tokens[4].kind, TokenKind::Static);
        assert_eq!(tokens[5].kind, TokenKind::Void);
        assert_eq!(tokens[6].kind, TokenKind::Main);
        assert_eq!(tokens[7].kind, TokenKind::LParen);
        assert_eq!(tokens[8].kind, TokenKind::String);
        assert_eq!(tokens[9].kind, TokenKind::LBracket);
        assert_eq!(tokens[10].kind, TokenKind::RBracket);
        assert_eq!(tokens[11].kind, TokenKind::Id);
        assert_eq!(tokens[11].lexeme, "a");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * ! < && = . ,"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Bang,
                TokenKind::Lt,
                TokenKind::AndAnd,
                TokenKind::Eq,
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_println_is_one_token() {
        let tokens = Lexer::new("System.out.println(1);").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Println);
        assert_eq!(tokens[0].lexeme, "System.out.println");
        assert_eq!(tokens[1].kind, TokenKind::LParen);
    }

    #[test]
    fn test_system_alone_is_identifier() {
        assert_eq!(
            kinds("System.out"),
            vec![TokenKind::Id, TokenKind::Dot, TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("x // comment\ny /* block\ncomment */ z"),
            vec![TokenKind::Id, TokenKind::Id, TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Lexer::new("a\n\n  b").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(3, 3));
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = Lexer::new("2147483648").tokenize().unwrap_err();
        assert!(err.message.contains("out of range"));
        assert!(Lexer::new("2147483647").tokenize().is_ok());
    }

    #[test]
    fn test_single_ampersand_rejected() {
        let err = Lexer::new("a & b").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 3));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::new("x /* never closed").tokenize().unwrap_err();
        assert!(err.to_string().contains("Unterminated block comment"));
    }
}
