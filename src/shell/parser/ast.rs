/// One parsed input line. `program` is `None` for blank and comment
/// lines; the dispatcher skips those without touching any state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub program: Option<String>,
    pub arg_text: Option<String>,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub background: bool,
}

impl Command {
    pub fn is_noop(&self) -> bool {
        self.program.is_none()
    }

    /// Program name followed by the whitespace-separated pieces of the
    /// (already expanded) argument text, ready for execvp.
    pub fn argv(&self) -> Vec<&str> {
        let mut argv = Vec::new();
        if let Some(program) = self.program.as_deref() {
            argv.push(program);
        }
        if let Some(args) = self.arg_text.as_deref() {
            argv.extend(args.split_whitespace());
        }
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_command() {
        let cmd = Command::default();
        assert!(cmd.is_noop());
        assert!(cmd.argv().is_empty());
    }

    #[test]
    fn test_argv_splits_arg_text() {
        let cmd = Command {
            program: Some("ls".to_string()),
            arg_text: Some("-l -a /tmp".to_string()),
            ..Command::default()
        };
        assert_eq!(cmd.argv(), vec!["ls", "-l", "-a", "/tmp"]);
    }

    #[test]
    fn test_argv_without_arguments() {
        let cmd = Command {
            program: Some("pwd".to_string()),
            ..Command::default()
        };
        assert_eq!(cmd.argv(), vec!["pwd"]);
    }
}
