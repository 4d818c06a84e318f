use log::{debug, error, warn};
use std::error::Error;
use std::io::Write;
use std::process;

use crate::shell::executor::Executor;
use crate::shell::parser::Parser;
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::shell::reaper;
use crate::shell::signals::{self, Notifications};
use crate::utils::config::Config;

const PROMPT: &str = ":  ";

pub struct Shell<'a> {
    readline: ReadlineManager<'a>,
    executor: Executor,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            readline: ReadlineManager::new(config),
            executor: Executor::new(),
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let notifications = signals::install()?;
        self.readline.load_history()?;
        debug!("smsh ready");

        self.run_loop(&notifications)?;

        self.readline.save_history()?;
        // EOF ends the session the same way `exit` does
        signals::terminate_children();
        debug!("smsh session over");
        Ok(())
    }

    fn run_loop(&mut self, notifications: &Notifications) -> Result<(), Box<dyn Error>> {
        loop {
            // completion notices only ever appear right before a prompt
            if notifications.take_pending_reap() {
                reaper::drain();
            }
            std::io::stdout().flush()?;

            match self.readline.readline(PROMPT) {
                Ok(line) => self.handle_line(&line, notifications)?,
                Err(ReadlineError::Eof) => {
                    warn!("EOF, leaving session");
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    // the shell itself never dies on interrupt
                    continue;
                }
                Err(err) => {
                    error!("readline error: {}", err);
                    eprintln!("smsh: {}", err);
                }
            }
        }
        Ok(())
    }

    fn handle_line(
        &mut self,
        line: &str,
        notifications: &Notifications,
    ) -> Result<(), Box<dyn Error>> {
        let mut command = Parser::new(line, process::id()).parse();
        if command.is_noop() {
            return Ok(());
        }
        self.readline.add_history(line.to_string())?;

        if notifications.foreground_only() {
            command.background = false;
        }

        if let Err(err) = self.executor.execute(&command) {
            error!("command failed: {}", err);
            eprintln!("smsh: {}", err);
        }
        Ok(())
    }
}
