//! Startup command spawning.

use std::io;
use std::mem::MaybeUninit;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::ptr;

use anyhow::{Context, Result};

use crate::util::logging::PROCESS;

/// Run `command` through `/bin/sh -c`, detached from the compositor.
///
/// The shell is double-forked into its own session so it is never left as
/// a zombie; its output goes to the compositor's stdout/stderr.
pub fn spawn_shell(command: &str) -> Result<()> {
    crate::wlog!(PROCESS, "Running startup command: {}", command);

    let mut shell = Command::new("/bin/sh");
    shell.arg("-c").arg(command);
    shell.stdin(Stdio::null());
    shell.stdout(Stdio::inherit());
    shell.stderr(Stdio::inherit());

    unsafe {
        shell.pre_exec(|| {
            match libc::fork() {
                -1 => return Err(io::Error::last_os_error()),
                0 => (),
                _ => libc::_exit(0),
            }

            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }

            // Don't leak the compositor's blocked signals to the child.
            let mut signal_set = MaybeUninit::uninit();
            libc::sigemptyset(signal_set.as_mut_ptr());
            libc::sigprocmask(libc::SIG_SETMASK, signal_set.as_mut_ptr(), ptr::null_mut());

            Ok(())
        });
    }

    shell
        .spawn()
        .with_context(|| format!("failed to spawn /bin/sh -c {command:?}"))?
        .wait()
        .context("failed to wait for the startup shell")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_shell_returns_after_detaching() {
        spawn_shell("true").unwrap();
    }
}
