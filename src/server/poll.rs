//! Readiness polling, a thin wrapper over `poll(2)`.

use std::io;
use std::os::unix::io::RawFd;

/// What one descriptor reported.
#[derive(Debug, Clone, Copy)]
pub(super) struct Readiness {
    pub readable: bool,
    pub hangup: bool,
}

/// A poll set, rebuilt for every wait.
pub(super) struct PollSet {
    fds: Vec<libc::pollfd>,
}

impl PollSet {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fds: Vec::with_capacity(n),
        }
    }

    /// Watch a descriptor for readability. Hang-up and error
    /// conditions are always reported by the kernel.
    pub fn push(&mut self, fd: RawFd) {
        self.fds.push(libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        });
    }

    /// Wait until a descriptor is ready or the timeout elapses.
    /// Returns the number of ready descriptors, 0 on timeout.
    /// An interrupted wait counts as a timeout.
    pub fn wait(&mut self, timeout_ms: i32) -> io::Result<usize> {
        let rc = unsafe {
            libc::poll(
                self.fds.as_mut_ptr(),
                self.fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if rc < 0 {
            let e = io::Error::last_os_error();
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(e);
        }

        Ok(rc as usize)
    }

    /// Readiness of the descriptor at `idx`, in push order.
    pub fn readiness(&self, idx: usize) -> Readiness {
        let revents = self.fds[idx].revents;
        Readiness {
            readable: revents & libc::POLLIN != 0,
            hangup: revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0,
        }
    }
}
