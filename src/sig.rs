use std::io;
use std::mem::MaybeUninit;
use std::ptr::null_mut;

use libc::{
    SA_NOCLDSTOP, SA_RESTART, SIG_BLOCK, SIG_DFL, SIG_IGN, SIG_UNBLOCK, SIGCHLD, SIGINT, SIGQUIT,
    WNOHANG, c_int, sigaddset, sigemptyset, sighandler_t, sigprocmask, sigset_t, waitpid,
};

// Collects every already-finished child so background jobs never linger as
// zombies. Runs in signal context: only async-signal-safe calls, errno saved.
extern "C" fn reap_children(_sig: c_int) {
    let saved_errno = unsafe { *libc::__errno_location() };
    while unsafe { waitpid(-1, null_mut(), WNOHANG) } > 0 {}
    unsafe { *libc::__errno_location() = saved_errno };
}

/// Installs the process-wide SIGCHLD disposition. Done once at startup and
/// never toggled per command.
pub fn install_reaper() -> io::Result<()> {
    let mut sa = unsafe { MaybeUninit::<libc::sigaction>::zeroed().assume_init() };
    sa.sa_sigaction = reap_children as sighandler_t;
    sa.sa_flags = SA_NOCLDSTOP | SA_RESTART;
    unsafe { sigemptyset(&mut sa.sa_mask) };

    match unsafe { libc::sigaction(SIGCHLD, &sa, null_mut()) } {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}

/// Blocks SIGCHLD around a fork/wait window so the reaper cannot steal a
/// foreground child's exit status. Returns the set to unblock with.
pub fn block_sigchld() -> io::Result<sigset_t> {
    let mut chld_set = unsafe { MaybeUninit::<sigset_t>::zeroed().assume_init() };
    unsafe {
        sigemptyset(&mut chld_set);
        sigaddset(&mut chld_set, SIGCHLD);
    }

    match unsafe { sigprocmask(SIG_BLOCK, &chld_set, null_mut()) } {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(chld_set),
    }
}

pub fn unblock_sigchld(chld_set: &sigset_t) -> io::Result<()> {
    match unsafe { sigprocmask(SIG_UNBLOCK, chld_set, null_mut()) } {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}

/// The shell itself shrugs off keyboard interrupts; they belong to the
/// foreground child.
pub fn ignore_interactive_signals() {
    unsafe {
        libc::signal(SIGINT, SIG_IGN);
        libc::signal(SIGQUIT, SIG_IGN);
    }
}

/// Restores default dispositions in a freshly forked child before exec.
/// Ignored dispositions and the blocked mask would otherwise survive exec.
pub fn reset_child_signals(chld_set: &sigset_t) {
    unsafe {
        libc::signal(SIGINT, SIG_DFL);
        libc::signal(SIGQUIT, SIG_DFL);
        libc::signal(SIGCHLD, SIG_DFL);
        sigprocmask(SIG_UNBLOCK, chld_set, null_mut());
    }
}
