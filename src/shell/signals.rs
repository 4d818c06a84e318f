use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{kill, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::Pid;

// Written from handler context, read from the main loop. Plain atomics
// are the only shared state the handlers touch.
static PENDING_REAP: AtomicBool = AtomicBool::new(false);
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

const ENTER_NOTICE: &[u8] = b"Entering foreground-only mode (& is now ignored)\n";
const EXIT_NOTICE: &[u8] = b"Exiting foreground-only mode\n";

extern "C" fn handle_sigchld(_: libc::c_int) {
    PENDING_REAP.store(true, Ordering::SeqCst);
}

extern "C" fn handle_sigtstp(_: libc::c_int) {
    let was_on = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);
    let notice = if was_on { EXIT_NOTICE } else { ENTER_NOTICE };
    // raw write(2) is the only output safe in handler context
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            notice.as_ptr() as *const libc::c_void,
            notice.len(),
        );
    }
}

/// Polling handle over the handler-written flags, held by the shell so
/// the main loop never touches the statics directly.
pub struct Notifications {
    _private: (),
}

impl Notifications {
    /// True if any child changed state since the last call; clears the
    /// flag so the reaper runs at most once per prompt cycle.
    pub fn take_pending_reap(&self) -> bool {
        PENDING_REAP.swap(false, Ordering::SeqCst)
    }

    pub fn foreground_only(&self) -> bool {
        FOREGROUND_ONLY.load(Ordering::SeqCst)
    }
}

/// Installs the shell's own dispositions: SIGINT ignored (the shell
/// never dies while reading input), SIGTSTP toggles foreground-only
/// mode, SIGCHLD just flags that a reap is pending. SA_RESTART keeps
/// the blocking line read going across handler runs.
pub fn install() -> nix::Result<Notifications> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::SA_RESTART, SigSet::empty());
    let tstp = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    let chld = SigAction::new(
        SigHandler::Handler(handle_sigchld),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    unsafe {
        sigaction(Signal::SIGINT, &ignore)?;
        sigaction(Signal::SIGTSTP, &tstp)?;
        sigaction(Signal::SIGCHLD, &chld)?;
    }
    Ok(Notifications { _private: () })
}

/// Called in the child between fork and exec. A foreground child must be
/// interruptible again; a background child ignores SIGINT. No child ever
/// reacts to the foreground-only toggle.
pub fn apply_child_dispositions(background: bool) {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    let sigint = if background { &ignore } else { &default };
    unsafe {
        let _ = sigaction(Signal::SIGINT, sigint);
        let _ = sigaction(Signal::SIGTSTP, &ignore);
    }
}

/// Session shutdown: take down any background children still running by
/// signalling the whole process group, with the shell itself shielded.
pub fn terminate_children() {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe {
        let _ = sigaction(Signal::SIGTERM, &ignore);
    }
    let _ = kill(Pid::from_raw(0), Signal::SIGTERM);
}
