use std::iter::Peekable;
use std::str::Chars;

/// Tokens are purely whitespace-delimited. `<`, `>` and `&` are markers
/// only when a chunk is exactly that character; anything else, including
/// chunks like `>>` or `a&&b`, stays a plain word.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Word(String),
    Redirect(RedirectOp),
    Background,
    Eof,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RedirectOp {
    Input,  // <
    Output, // >
}

impl Token {
    /// Text form of the token, used when the grammar demotes a marker
    /// back into ordinary argument text.
    pub fn literal(&self) -> &str {
        match self {
            Token::Word(word) => word,
            Token::Redirect(RedirectOp::Input) => "<",
            Token::Redirect(RedirectOp::Output) => ">",
            Token::Background => "&",
            Token::Eof => "",
        }
    }
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let mut word = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            self.read_char();
        }

        match word.as_str() {
            "" => Token::Eof,
            "<" => Token::Redirect(RedirectOp::Input),
            ">" => Token::Redirect(RedirectOp::Output),
            "&" => Token::Background,
            _ => Token::Word(word),
        }
    }

    /// Consumes the rest of the input as a token sequence, Eof excluded.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token() {
                Token::Eof => break,
                token => tokens.push(token),
            }
        }
        tokens
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }
}
