//! ## Mode
//!
//! POSIX permission bits

use std::fmt;

/// Permission bits of a remote file (`0o777` at most).
/// File type bits are discarded on conversion.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Mode(u32);

impl Mode {
    /// Bits for the `owner`, `group` and `others` classes, each in `0..=7`
    pub fn new(owner: u8, group: u8, others: u8) -> Self {
        Self::from(((owner as u32) << 6) | ((group as u32) << 3) | others as u32)
    }

    /// `rwx` bits of the owner
    pub fn owner(&self) -> u8 {
        ((self.0 >> 6) & 0o7) as u8
    }

    /// `rwx` bits of the group
    pub fn group(&self) -> u8 {
        ((self.0 >> 3) & 0o7) as u8
    }

    /// `rwx` bits of everybody else
    pub fn others(&self) -> u8 {
        (self.0 & 0o7) as u8
    }
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Self {
        Self(bits & 0o777)
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> Self {
        mode.0
    }
}

/// Renders as `rwxr-xr-x`
impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in [self.owner(), self.group(), self.others()] {
            for (bit, c) in [(0o4, 'r'), (0o2, 'w'), (0o1, 'x')] {
                write!(f, "{}", if class & bit != 0 { c } else { '-' })?;
            }
        }
        Ok(())
    }
}
