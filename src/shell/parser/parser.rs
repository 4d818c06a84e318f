use super::ast::Command;
use super::lexer::{Lexer, RedirectOp, Token};

/// Grammar matcher over the token sequence:
///
/// ```text
/// program [arg...] [< inputPath] [> outputPath] [&]
/// ```
///
/// Argument accumulation stops at the first token that begins with `<`,
/// `>` or `&`. The redirection markers are matched only as exact
/// standalone tokens in that order, and `&` turns the command into a
/// background job only when it is the single remaining token. Any
/// trailing tokens that do not fit that shape are appended back into the
/// argument text verbatim, so a line never loses tokens.
pub struct Parser<'a> {
    line: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    pid: u32,
}

impl<'a> Parser<'a> {
    pub fn new(line: &'a str, pid: u32) -> Self {
        Parser {
            line,
            tokens: Lexer::new(line).tokenize(),
            pos: 0,
            pid,
        }
    }

    pub fn parse(&mut self) -> Command {
        let mut command = Command::default();

        // comment lines are recognized by the first byte of the raw line
        if self.line.starts_with('#') || self.tokens.is_empty() {
            return command;
        }

        command.program = Some(self.advance().literal().to_string());

        let mut args = self.parse_arguments();
        command.input_path = self.parse_redirect(RedirectOp::Input);
        command.output_path = self.parse_redirect(RedirectOp::Output);
        command.background = self.parse_trailer(&mut args);

        if !args.is_empty() {
            command.arg_text = Some(args.join(" "));
        }
        command
    }

    /// Plain words up to the first marker-initial token, expanded.
    fn parse_arguments(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while let Token::Word(word) = self.peek() {
            if word.starts_with(['<', '>', '&']) {
                break;
            }
            args.push(expand_pid(word, self.pid));
            self.advance();
        }
        args
    }

    /// Matches `op target` at the cursor. The target is taken verbatim,
    /// whatever token kind it lexed as, and is never expanded.
    fn parse_redirect(&mut self, op: RedirectOp) -> Option<String> {
        if *self.peek() != Token::Redirect(op) {
            return None;
        }
        self.advance();
        match self.peek() {
            Token::Eof => None,
            _ => Some(self.advance().literal().to_string()),
        }
    }

    /// A lone `&` as the very last token backgrounds the command; any
    /// other leftover tokens are demoted to literal argument text.
    fn parse_trailer(&mut self, args: &mut Vec<String>) -> bool {
        let rest = &self.tokens[self.pos..];
        if matches!(rest, [Token::Background]) {
            return true;
        }
        for token in rest {
            args.push(token.literal().to_string());
        }
        self.pos = self.tokens.len();
        false
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let pos = self.pos;
        if pos < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(pos).unwrap_or(&Token::Eof)
    }
}

/// Replaces every `$$` in an argument token with the shell's own PID in
/// decimal. Purely textual; `a$$b$$c` becomes `a<pid>b<pid>c`.
fn expand_pid(token: &str, pid: u32) -> String {
    token.replace("$$", &pid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Parser::new(line, 4242).parse()
    }

    #[test]
    fn test_simple_command() {
        let cmd = parse("ls -l -a");
        assert_eq!(cmd.program.as_deref(), Some("ls"));
        assert_eq!(cmd.arg_text.as_deref(), Some("-l -a"));
        assert_eq!(cmd.input_path, None);
        assert_eq!(cmd.output_path, None);
        assert!(!cmd.background);
    }

    #[test]
    fn test_blank_line_is_noop() {
        assert!(parse("").is_noop());
        assert!(parse("   \t  ").is_noop());
    }

    #[test]
    fn test_comment_line_is_noop() {
        assert!(parse("# this is a comment").is_noop());
        assert!(parse("#no-space").is_noop());
    }

    #[test]
    fn test_both_redirections() {
        let cmd = parse("sort < in.txt > out.txt");
        assert_eq!(cmd.program.as_deref(), Some("sort"));
        assert_eq!(cmd.arg_text, None);
        assert_eq!(cmd.input_path.as_deref(), Some("in.txt"));
        assert_eq!(cmd.output_path.as_deref(), Some("out.txt"));
        assert!(!cmd.background);
    }

    #[test]
    fn test_background_command() {
        let cmd = parse("sleep 10 &");
        assert_eq!(cmd.program.as_deref(), Some("sleep"));
        assert_eq!(cmd.arg_text.as_deref(), Some("10"));
        assert!(cmd.background);
    }

    #[test]
    fn test_redirection_then_background() {
        let cmd = parse("wc -l < names.txt > counts.txt &");
        assert_eq!(cmd.program.as_deref(), Some("wc"));
        assert_eq!(cmd.arg_text.as_deref(), Some("-l"));
        assert_eq!(cmd.input_path.as_deref(), Some("names.txt"));
        assert_eq!(cmd.output_path.as_deref(), Some("counts.txt"));
        assert!(cmd.background);
    }

    #[test]
    fn test_stray_ampersand_stays_literal() {
        // & not at the very end is ordinary argument text
        let cmd = parse("echo a & b");
        assert_eq!(cmd.arg_text.as_deref(), Some("a & b"));
        assert!(!cmd.background);
    }

    #[test]
    fn test_tokens_after_background_marker_stay_literal() {
        let cmd = parse("echo done & now");
        assert_eq!(cmd.arg_text.as_deref(), Some("done & now"));
        assert!(!cmd.background);
    }

    #[test]
    fn test_pid_expansion_in_arguments() {
        let cmd = parse("echo pid:$$");
        assert_eq!(cmd.arg_text.as_deref(), Some("pid:4242"));
    }

    #[test]
    fn test_pid_expansion_multiple_occurrences() {
        let cmd = parse("echo a$$b$$c");
        assert_eq!(cmd.arg_text.as_deref(), Some("a4242b4242c"));
    }

    #[test]
    fn test_pid_expansion_skips_program_and_targets() {
        let cmd = parse("x$$ arg$$ < in$$ > out$$x");
        assert_eq!(cmd.program.as_deref(), Some("x$$"));
        assert_eq!(cmd.arg_text.as_deref(), Some("arg4242"));
        assert_eq!(cmd.input_path.as_deref(), Some("in$$"));
        assert_eq!(cmd.output_path.as_deref(), Some("out$$x"));
    }

    #[test]
    fn test_marker_initial_word_ends_arguments() {
        // ">>out" is not a marker, but it still terminates argument
        // accumulation and comes back as literal trailing text
        let cmd = parse("echo hi >>out more");
        assert_eq!(cmd.program.as_deref(), Some("echo"));
        assert_eq!(cmd.arg_text.as_deref(), Some("hi >>out more"));
        assert_eq!(cmd.output_path, None);
    }

    #[test]
    fn test_output_before_input_not_reordered() {
        // grammar requires < before >; out-of-order markers are literal
        let cmd = parse("cmd > out < in");
        assert_eq!(cmd.input_path, None);
        assert_eq!(cmd.output_path.as_deref(), Some("out"));
        assert_eq!(cmd.arg_text.as_deref(), Some("< in"));
    }

    #[test]
    fn test_redirect_without_target() {
        let cmd = parse("cat <");
        assert_eq!(cmd.program.as_deref(), Some("cat"));
        assert_eq!(cmd.input_path, None);
        assert_eq!(cmd.arg_text, None);
    }

    #[test]
    fn test_double_ampersand_is_literal() {
        let cmd = parse("echo a && b &");
        assert_eq!(cmd.arg_text.as_deref(), Some("a && b &"));
        assert!(!cmd.background);
    }
}
