use std::io::{Error, ErrorKind, Read, Result};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::header::{Header, Timestamp, NAME_LEN};
use crate::name::EntryName;

const NANOS_PER_SEC: u32 = 1_000_000_000;

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read>(reader: &mut R) -> Result<Self>
    where
        Self: Sized;
}

impl DeserializeOwned for Timestamp {
    fn deserialize_owned<R: Read>(reader: &mut R) -> Result<Self> {
        let secs = reader.read_i64::<LittleEndian>()?;
        let nanos = reader.read_u32::<LittleEndian>()?;

        if nanos >= NANOS_PER_SEC {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("nanoseconds out of range: {}", nanos),
            ));
        }

        Ok(Timestamp { secs, nanos })
    }
}

impl DeserializeOwned for EntryName {
    fn deserialize_owned<R: Read>(reader: &mut R) -> Result<Self> {
        let mut field = [0u8; NAME_LEN];
        reader.read_exact(&mut field)?;

        let len = field.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
        EntryName::from_bytes(&field[..len]).map_err(|e| e.as_io_error())
    }
}

impl DeserializeOwned for Header {
    fn deserialize_owned<R: Read>(reader: &mut R) -> Result<Self> {
        let name = EntryName::deserialize_owned(reader)?;
        let mode = reader.read_u32::<LittleEndian>()?;
        let uid = reader.read_u32::<LittleEndian>()?;
        let gid = reader.read_u32::<LittleEndian>()?;
        let size = reader.read_u64::<LittleEndian>()?;
        let atime = Timestamp::deserialize_owned(reader)?;
        let mtime = Timestamp::deserialize_owned(reader)?;
        let ctime = Timestamp::deserialize_owned(reader)?;

        Ok(Header {
            name,
            mode,
            uid,
            gid,
            size,
            atime,
            mtime,
            ctime,
        })
    }
}
