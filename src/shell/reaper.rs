use log::debug;
use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::sys::wait::WaitPidFlag as WF;
use nix::sys::wait::WaitStatus as WS;

/// Collects every child that has already terminated, without blocking
/// and without naming a specific pid, and reports each outcome on one
/// line. Runs from the main loop only, so it never races the executor's
/// wait for its foreground child. "Nothing ready" is the common case.
pub fn drain() {
    loop {
        match waitpid(None, Some(WF::WNOHANG)) {
            Ok(WS::Exited(pid, code)) => {
                println!(
                    "Background process {} finished with exit status: {}",
                    pid, code
                );
            }
            Ok(WS::Signaled(pid, signal, _core_dumped)) => {
                println!(
                    "Background process {} was killed by signal {}",
                    pid, signal as i32
                );
            }
            Ok(WS::StillAlive) => break,
            Ok(other) => {
                debug!("reaper: ignoring wait status {:?}", other);
            }
            Err(Errno::ECHILD) => break,
            Err(err) => {
                debug!("reaper: waitpid failed: {}", err);
                break;
            }
        }
    }
}
