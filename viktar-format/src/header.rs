use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::name::EntryName;

/// Signature at the start of every archive.
pub const MAGIC_BYTES: &[u8; 10] = b"#<viktar>\n";

/// Width of the NUL-padded name field.
pub const NAME_LEN: usize = 22;

pub(crate) const TIMESTAMP_LEN: usize = 8 + 4;

/// Encoded size of a [`Header`]: name, mode, uid, gid, size, then atime,
/// mtime and ctime.
pub const HEADER_LEN: usize = NAME_LEN + 4 + 4 + 4 + 8 + 3 * TIMESTAMP_LEN;

/// Seconds and nanoseconds relative to the Unix epoch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub secs: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub const fn new(secs: i64, nanos: u32) -> Timestamp {
        Timestamp { secs, nanos }
    }

    /// The same instant with the sub-second part dropped.
    pub const fn whole_seconds(self) -> Timestamp {
        Timestamp {
            secs: self.secs,
            nanos: 0,
        }
    }

    pub fn to_system_time(self) -> Option<SystemTime> {
        let base = if self.secs >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(self.secs as u64))?
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_secs(self.secs.unsigned_abs()))?
        };
        base.checked_add(Duration::from_nanos(u64::from(self.nanos)))
    }

    pub fn from_system_time(time: SystemTime) -> Timestamp {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Timestamp::new(d.as_secs() as i64, d.subsec_nanos()),
            Err(e) => {
                let d = e.duration();
                if d.subsec_nanos() == 0 {
                    Timestamp::new(-(d.as_secs() as i64), 0)
                } else {
                    Timestamp::new(-(d.as_secs() as i64) - 1, 1_000_000_000 - d.subsec_nanos())
                }
            }
        }
    }
}

/// The fixed-size record in front of every entry body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: EntryName,
    /// File type and permission bits, as reported by `stat`.
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// Exact length of the body that follows.
    pub size: u64,
    pub atime: Timestamp,
    pub mtime: Timestamp,
    /// Kept for completeness; never applied on extraction.
    pub ctime: Timestamp,
}

impl Header {
    /// Permission bits only, without the file type.
    #[inline(always)]
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    pub fn to_bytes(&self) -> std::io::Result<[u8; HEADER_LEN]> {
        use crate::ser::Serialize;

        let mut buf = [0u8; HEADER_LEN];
        self.write(&mut &mut buf[..])?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> std::io::Result<Header> {
        use crate::de::DeserializeOwned;

        Header::deserialize_owned(&mut &bytes[..])
    }
}
