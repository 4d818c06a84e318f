mod executor;
mod parser;
mod readline;
mod reaper;
mod shell;
mod signals;
mod status;

pub use shell::Shell;
