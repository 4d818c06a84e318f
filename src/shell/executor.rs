use log::{debug, error};
use std::env;
use std::ffi::CString;
use std::io;
use std::process;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::waitpid;
use nix::sys::wait::WaitStatus as WS;
use nix::unistd::{close, dup2, execvp, fork, ForkResult, Pid};

use crate::shell::parser::Command;
use crate::shell::signals;
use crate::shell::status::LastStatus;

const DEV_NULL: &str = "/dev/null";

pub struct Executor {
    last_status: LastStatus,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            last_status: LastStatus::default(),
        }
    }

    pub fn execute(&mut self, command: &Command) -> io::Result<()> {
        let program = match command.program.as_deref() {
            Some(program) => program.to_string(),
            None => return Ok(()),
        };

        if let Some(result) = self.handle_builtin(&program, command) {
            debug!("built-in: {:?}", command);
            return result;
        }

        debug!("external: {:?}", command);
        self.execute_external(command)
    }

    // Built-ins run in the shell process itself. Only `status` touches
    // the recorded foreground status, and it only reads it.
    fn handle_builtin(&mut self, program: &str, command: &Command) -> Option<io::Result<()>> {
        match program {
            "exit" => Some(Self::builtin_exit()),
            "cd" => Some(Self::builtin_cd(command)),
            "status" => Some(self.builtin_status()),
            _ => None,
        }
    }

    fn builtin_exit() -> io::Result<()> {
        debug!("exit: terminating session");
        signals::terminate_children();
        process::exit(0);
    }

    fn builtin_cd(command: &Command) -> io::Result<()> {
        let target = match command.arg_text.as_deref() {
            Some(path) => shellexpand::tilde(path).into_owned(),
            None => match env::var("HOME") {
                Ok(home) => home,
                Err(_) => {
                    eprintln!("cd: HOME is not set");
                    return Ok(());
                }
            },
        };

        if let Err(err) = env::set_current_dir(&target) {
            eprintln!("cd: {}: {}", target, err);
            return Ok(());
        }
        match env::current_dir() {
            Ok(cwd) => println!("{}", cwd.display()),
            Err(err) => error!("cd: cannot read new working dir: {}", err),
        }
        Ok(())
    }

    fn builtin_status(&self) -> io::Result<()> {
        println!("{}", self.last_status);
        Ok(())
    }

    fn execute_external(&mut self, command: &Command) -> io::Result<()> {
        let argv = build_argv(command)?;

        // A fork failure is the one error here that reaches the main
        // loop; it reports and re-prompts.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => exec_child(&argv, command),
            Ok(ForkResult::Parent { child }) => {
                if command.background {
                    println!("Started background process {}", child);
                } else {
                    self.wait_foreground(child);
                }
                Ok(())
            }
            Err(err) => Err(io::Error::from_raw_os_error(err as i32)),
        }
    }

    /// Blocks on the specific child just launched and records how it
    /// ended. The reaper never runs concurrently with this wait, so the
    /// child is collected exactly once.
    fn wait_foreground(&mut self, child: Pid) {
        loop {
            match waitpid(child, None) {
                Ok(WS::Exited(_, code)) => {
                    self.last_status = LastStatus::Exited(code);
                    break;
                }
                Ok(WS::Signaled(pid, signal, _core_dumped)) => {
                    self.last_status = LastStatus::Signaled(signal as i32);
                    println!(
                        "Foreground process {} was killed by signal {}",
                        pid, signal as i32
                    );
                    break;
                }
                Ok(other) => {
                    debug!("wait_foreground: ignoring wait status {:?}", other);
                }
                Err(Errno::EINTR) => continue,
                Err(err) => {
                    error!("waitpid({}) failed: {}", child, err);
                    self.last_status = LastStatus::Exited(1);
                    break;
                }
            }
        }
    }
}

fn build_argv(command: &Command) -> io::Result<Vec<CString>> {
    command
        .argv()
        .into_iter()
        .map(|piece| {
            CString::new(piece)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "NUL byte in argument"))
        })
        .collect()
}

// Child side, between fork and exec. Every failure is local to this
// process: one diagnostic line, then exit 1. The parent shell never
// sees any of it beyond the exit status.
fn exec_child(argv: &[CString], command: &Command) -> ! {
    signals::apply_child_dispositions(command.background);

    match command.input_path.as_deref() {
        Some(path) => redirect_stdin(path),
        None if command.background => redirect_stdin(DEV_NULL),
        None => {}
    }
    match command.output_path.as_deref() {
        Some(path) => redirect_stdout(path),
        None if command.background => redirect_stdout(DEV_NULL),
        None => {}
    }

    let program = &argv[0];
    if let Err(err) = execvp(program, argv) {
        eprintln!("{}: {}", program.to_string_lossy(), err.desc());
    }
    process::exit(1);
}

fn redirect_stdin(path: &str) {
    match open(path, OFlag::O_RDONLY, Mode::empty()) {
        Ok(fd) => rebind(fd, libc::STDIN_FILENO, path),
        Err(err) => fail_child(path, err),
    }
}

fn redirect_stdout(path: &str) {
    let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
    match open(path, flags, Mode::from_bits_truncate(0o644)) {
        Ok(fd) => rebind(fd, libc::STDOUT_FILENO, path),
        Err(err) => fail_child(path, err),
    }
}

fn rebind(fd: i32, stdio_fd: i32, path: &str) {
    if let Err(err) = dup2(fd, stdio_fd) {
        fail_child(path, err);
    }
    let _ = close(fd);
}

fn fail_child(path: &str, err: Errno) -> ! {
    eprintln!("cannot open {}: {}", path, err.desc());
    process::exit(1);
}
