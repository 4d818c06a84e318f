use std::fmt;

/// Outcome of the most recent foreground command, as reported by the
/// `status` built-in. Starts out as a clean exit before anything ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastStatus {
    Exited(i32),
    Signaled(i32),
}

impl Default for LastStatus {
    fn default() -> Self {
        LastStatus::Exited(0)
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastStatus::Exited(code) => write!(f, "exit value {}", code),
            LastStatus::Signaled(sig) => write!(f, "terminated by signal {}", sig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_clean_exit() {
        assert_eq!(LastStatus::default(), LastStatus::Exited(0));
    }

    #[test]
    fn test_display_exit_value() {
        assert_eq!(LastStatus::Exited(2).to_string(), "exit value 2");
    }

    #[test]
    fn test_display_signal() {
        assert_eq!(
            LastStatus::Signaled(15).to_string(),
            "terminated by signal 15"
        );
    }
}
