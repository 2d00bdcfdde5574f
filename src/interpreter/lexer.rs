use logos::Logos;
use tracing::debug;

use crate::error::LexError;

/// Result type used by the tokenizer.
pub type LexResult<T> = Result<T, LexError>;

/// The category of a lexical token.
///
/// Literal categories carry their decoded value. The derive builds the
/// scanner; variants without a pattern are produced by [`Tokenizer`] itself.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    /// Floating point literal such as `3.14` or `2.`.
    #[regex(r"[0-9]+\.[0-9]*", parse_float)]
    Float(f64),
    /// Integer literal such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// Double-quoted string literal with escapes already decoded.
    #[regex(r#""([^"\\]|\\(.|\n))*""#, unescape)]
    Str(String),
    /// Variable or function name.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `var`
    #[token("var")]
    Var,
    /// `func`
    #[token("func")]
    Func,
    /// `int`
    #[token("int")]
    IntType,
    /// `float`
    #[token("float")]
    FloatType,
    /// `bool`
    #[token("bool")]
    BoolType,
    /// `str`
    #[token("str")]
    StrType,
    /// `void`
    #[token("void")]
    Void,
    /// `if`
    #[token("if")]
    If,
    /// `elseif`
    #[token("elseif")]
    Elseif,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,

    /// `+`
    #[token("+")]
    Plus,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-`
    #[token("-")]
    Minus,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*`
    #[token("*")]
    Star,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/`
    #[token("/")]
    Slash,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `//`
    #[token("//")]
    DoubleSlash,
    /// `//=`
    #[token("//=")]
    DoubleSlashAssign,
    /// `%`
    #[token("%")]
    Percent,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `=`
    #[token("=")]
    Assign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,

    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| {
        let start = lex.span().start;
        if let Some(offset) = lex.slice().rfind('\n') {
            lex.extras.line += lex.slice().matches('\n').count();
            lex.extras.line_start = start + offset + 1;
        }
        logos::Skip
    })]
    Comment,
    /// Line breaks only advance the position.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// A `/*` that no `*/` closes.
    #[token("/*")]
    UnterminatedComment,
    /// A `"` that no closing quote matches.
    #[token("\"")]
    UnterminatedString,

    /// End of input sentinel.
    Eof,
}

impl TokenKind {
    /// Returns `true` if this keyword names a variable type.
    #[must_use]
    pub const fn is_type_keyword(&self) -> bool {
        matches!(self, Self::IntType | Self::FloatType | Self::BoolType | Self::StrType)
    }

    /// Describes the token for error messages, e.g. `';'` or `identifier 'x'`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Float(v) => format!("float literal {v:?}"),
            Self::Integer(v) => format!("integer literal {v}"),
            Self::Bool(v) => format!("boolean literal {v}"),
            Self::Str(s) => format!("string literal {s:?}"),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// The source spelling of keywords, operators and delimiters.
    ///
    /// Literal kinds return an empty string.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Func => "func",
            Self::IntType => "int",
            Self::FloatType => "float",
            Self::BoolType => "bool",
            Self::StrType => "str",
            Self::Void => "void",
            Self::If => "if",
            Self::Elseif => "elseif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Plus => "+",
            Self::PlusAssign => "+=",
            Self::Minus => "-",
            Self::MinusAssign => "-=",
            Self::Star => "*",
            Self::StarAssign => "*=",
            Self::Slash => "/",
            Self::SlashAssign => "/=",
            Self::DoubleSlash => "//",
            Self::DoubleSlashAssign => "//=",
            Self::Percent => "%",
            Self::PercentAssign => "%=",
            Self::Assign => "=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::UnterminatedComment => "/*",
            Self::UnterminatedString => "\"",
            Self::Float(_)
            | Self::Integer(_)
            | Self::Bool(_)
            | Self::Str(_)
            | Self::Identifier(_)
            | Self::Comment
            | Self::NewLine
            | Self::Eof => "",
        }
    }
}

/// A lexical token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is, including any literal value.
    pub kind:    TokenKind,
    /// The source text the token was scanned from.
    pub literal: String,
    /// 1-based line of the first character.
    pub line:    usize,
    /// 1-based column of the first character, counted in characters.
    pub column:  usize,
}

impl Token {
    /// Creates a token at the given position.
    #[must_use]
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind,
               literal: literal.into(),
               line,
               column }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset at which it starts, so token
/// columns can be derived from spans.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current 1-based line number.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Single-pass tokenizer over a source string.
///
/// Each call to [`Tokenizer::next_token`] yields the next token; once the input
/// is exhausted it keeps returning [`TokenKind::Eof`].
pub struct Tokenizer<'src> {
    source: &'src str,
    lexer:  logos::Lexer<'src, TokenKind>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source,
               lexer: TokenKind::lexer(source) }
    }

    /// Scans and returns the next token.
    ///
    /// # Errors
    /// Returns a [`LexError`] with the offending position when no token rule
    /// matches, a string or comment is left open, or an integer literal is out
    /// of range.
    pub fn next_token(&mut self) -> LexResult<Token> {
        let Some(result) = self.lexer.next() else {
            let (line, column) = self.position(self.source.len());
            return Ok(Token::new(TokenKind::Eof, "", line, column));
        };

        let span = self.lexer.span();
        let slice = self.lexer.slice();
        let (line, column) = self.position(span.start);

        match result {
            Ok(TokenKind::UnterminatedComment) => {
                Err(LexError::UnterminatedComment { line, column })
            },
            Ok(TokenKind::UnterminatedString) => Err(LexError::UnterminatedString { line, column }),
            Ok(kind) => {
                if let TokenKind::Str(_) = kind
                   && let Some(offset) = slice.rfind('\n')
                {
                    self.lexer.extras.line += slice.matches('\n').count();
                    self.lexer.extras.line_start = span.start + offset + 1;
                }
                Ok(Token::new(kind, slice, line, column))
            },
            Err(()) if slice.bytes().all(|b| b.is_ascii_digit()) => {
                Err(LexError::IntegerTooLarge { literal: slice.to_string(),
                                                line,
                                                column })
            },
            Err(()) if slice.bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
                Err(LexError::FloatTooLarge { literal: slice.to_string(),
                                              line,
                                              column })
            },
            Err(()) => {
                let character = slice.chars().next().unwrap_or('\0');
                Err(LexError::UnexpectedCharacter { character,
                                                    line,
                                                    column })
            },
        }
    }

    /// Converts a byte offset on the current line into a 1-based position.
    fn position(&self, offset: usize) -> (usize, usize) {
        let extras = &self.lexer.extras;
        let column = self.source
                         .get(extras.line_start..offset)
                         .map_or(0, |s| s.chars().count());
        (extras.line, column + 1)
    }
}

/// Tokenizes a whole source string.
///
/// The returned stream always ends with exactly one [`TokenKind::Eof`] token.
///
/// # Errors
/// Returns the first [`LexError`] encountered.
///
/// # Example
/// ```
/// use cove::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("var(int) a = 1;").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Var);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = tokenizer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integer literal; out of range values become a lexer error.
fn parse_integer(lex: &logos::Lexer<TokenKind>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Strips the quotes of a string literal and decodes its escapes.
///
/// `\n`, `\t`, `\r` and `\0` have their usual meaning; any other escaped
/// character stands for itself.
fn unescape(lex: &logos::Lexer<TokenKind>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => {},
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn string_escapes_are_decoded() {
        assert_eq!(kinds(r#""a\nb""#),
                   vec![TokenKind::Str("a\nb".to_string()), TokenKind::Eof]);
        assert_eq!(kinds(r#""\t\r\0\q\"\\""#),
                   vec![TokenKind::Str("\t\r\0q\"\\".to_string()), TokenKind::Eof]);
    }

    #[test]
    fn multi_character_operators_are_greedy() {
        assert_eq!(kinds("= == < <= / // /= //= %= !="),
                   vec![TokenKind::Assign,
                        TokenKind::EqualEqual,
                        TokenKind::Less,
                        TokenKind::LessEqual,
                        TokenKind::Slash,
                        TokenKind::DoubleSlash,
                        TokenKind::SlashAssign,
                        TokenKind::DoubleSlashAssign,
                        TokenKind::PercentAssign,
                        TokenKind::BangEqual,
                        TokenKind::Eof]);
    }

    #[test]
    fn keywords_identifiers_and_numbers() {
        assert_eq!(kinds("var(float) elsewhere = 2.5, x1 = 3. ;"),
                   vec![TokenKind::Var,
                        TokenKind::LParen,
                        TokenKind::FloatType,
                        TokenKind::RParen,
                        TokenKind::Identifier("elsewhere".to_string()),
                        TokenKind::Assign,
                        TokenKind::Float(2.5),
                        TokenKind::Comma,
                        TokenKind::Identifier("x1".to_string()),
                        TokenKind::Assign,
                        TokenKind::Float(3.0),
                        TokenKind::Semicolon,
                        TokenKind::Eof]);
        assert_eq!(kinds("true false"),
                   vec![TokenKind::Bool(true), TokenKind::Bool(false), TokenKind::Eof]);
    }

    #[test]
    fn positions_are_one_based_and_skip_comments() {
        let tokens = tokenize("a /* one\ntwo */ b\n  \"x\ny\" c").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, vec![(1, 1), (2, 8), (3, 3), (4, 4), (4, 5)]);
    }

    #[test]
    fn unknown_character_reports_position() {
        assert_eq!(tokenize("var(int) a;\n  a = 1 $ 2;"),
                   Err(LexError::UnexpectedCharacter { character: '$',
                                                       line:      2,
                                                       column:    9, }));
    }

    #[test]
    fn unterminated_literals_are_errors() {
        assert_eq!(tokenize("a = \"open"),
                   Err(LexError::UnterminatedString { line: 1, column: 5 }));
        assert_eq!(tokenize("a /* open"),
                   Err(LexError::UnterminatedComment { line: 1, column: 3 }));
        assert!(matches!(tokenize("99999999999999999999"),
                         Err(LexError::IntegerTooLarge { .. })));
    }

    #[test]
    fn float_literals_must_be_finite() {
        let huge = format!("x = 1{}.0;", "0".repeat(400));
        assert!(matches!(tokenize(&huge),
                         Err(LexError::FloatTooLarge { ref literal, line: 1, column: 5 })
                         if literal.len() == 403));
        let large = format!("1{}.5", "0".repeat(300));
        assert!(matches!(kinds(&large)[0], TokenKind::Float(v) if v.is_finite()));
    }

    #[test]
    fn identifiers_accept_unicode_letters() {
        let tokens = tokenize("var(int) größe = 1; π2 = 3;").unwrap();
        assert_eq!(tokens[4].kind, TokenKind::Identifier("größe".to_string()));
        assert_eq!((tokens[5].line, tokens[5].column), (1, 16));
        assert_eq!(tokens[8].kind, TokenKind::Identifier("π2".to_string()));
        assert!(matches!(tokenize("a = 1 € 2;"),
                         Err(LexError::UnexpectedCharacter { character: '€', .. })));
    }

    #[test]
    fn exhausted_tokenizer_keeps_returning_eof() {
        let mut tokenizer = Tokenizer::new("x");
        assert!(matches!(tokenizer.next_token().unwrap().kind, TokenKind::Identifier(_)));
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
