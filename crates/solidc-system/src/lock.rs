//! Whole-file advisory locks
//!
//! Non-blocking, exclusive and covering the entire file. On Unix the lock is
//! a POSIX record lock (`fcntl(F_SETLK)`), which belongs to the process:
//! closing *any* descriptor the process holds on the file releases it. On
//! Windows it is a `LockFileEx` byte-range lock over the full 64-bit range.
//!
//! Locks are advisory. They only exclude other processes that also ask for
//! them; plain reads and writes are not blocked.

use std::fs::File;
use std::io;

/// Take an exclusive lock on all of `file` without waiting.
///
/// Fails with the OS error (`EAGAIN`/`EACCES` or `ERROR_LOCK_VIOLATION`)
/// when another process already holds a conflicting lock.
pub fn try_lock_exclusive(file: &File) -> io::Result<()> {
    sys::set_lock(file, true)
}

/// Release a lock taken with [`try_lock_exclusive`].
pub fn unlock(file: &File) -> io::Result<()> {
    sys::set_lock(file, false)
}

#[cfg(unix)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    pub(super) fn set_lock(file: &File, exclusive: bool) -> io::Result<()> {
        // SAFETY: `flock` is plain old data; all-zero is a valid value.
        let mut region: libc::flock = unsafe { std::mem::zeroed() };
        let kind = if exclusive { libc::F_WRLCK } else { libc::F_UNLCK };
        region.l_type = kind as _;
        region.l_whence = libc::SEEK_SET as _;
        region.l_start = 0;
        // Zero length extends to end of file, however large it grows.
        region.l_len = 0;

        // SAFETY: the descriptor is owned by `file` and `region` outlives the call.
        let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_SETLK, &region) };
        if rc == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(windows)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::windows::io::AsRawHandle;

    use windows_sys::Win32::Foundation::HANDLE;
    use windows_sys::Win32::Storage::FileSystem::{
        LockFileEx, UnlockFileEx, LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY,
    };
    use windows_sys::Win32::System::IO::OVERLAPPED;

    pub(super) fn set_lock(file: &File, exclusive: bool) -> io::Result<()> {
        let handle = file.as_raw_handle() as HANDLE;
        // SAFETY: OVERLAPPED is plain old data; a zero offset starts the range at byte 0.
        let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };

        // SAFETY: the handle is owned by `file` and `overlapped` outlives the call.
        let ok = unsafe {
            if exclusive {
                LockFileEx(
                    handle,
                    LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
                    0,
                    u32::MAX,
                    u32::MAX,
                    &mut overlapped,
                )
            } else {
                UnlockFileEx(handle, 0, u32::MAX, u32::MAX, &mut overlapped)
            }
        };
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_unlock_same_process() {
        let file = ::tempfile::tempfile().unwrap();
        try_lock_exclusive(&file).unwrap();
        unlock(&file).unwrap();
        // Re-locking after release works.
        try_lock_exclusive(&file).unwrap();
        unlock(&file).unwrap();
    }
}
