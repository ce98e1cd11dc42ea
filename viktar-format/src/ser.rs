use std::io::{Result, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::header::{Header, Timestamp, NAME_LEN};
use crate::name::EntryName;

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()>;
}

impl Serialize for Timestamp {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i64::<LittleEndian>(self.secs)?;
        writer.write_u32::<LittleEndian>(self.nanos)
    }
}

impl Serialize for EntryName {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        // NUL padding; a name filling the whole field has no terminator.
        let mut field = [0u8; NAME_LEN];
        field[..self.0.len()].copy_from_slice(&self.0);
        writer.write_all(&field)
    }
}

impl Serialize for Header {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.name.write(writer)?;
        writer.write_u32::<LittleEndian>(self.mode)?;
        writer.write_u32::<LittleEndian>(self.uid)?;
        writer.write_u32::<LittleEndian>(self.gid)?;
        writer.write_u64::<LittleEndian>(self.size)?;
        self.atime.write(writer)?;
        self.mtime.write(writer)?;
        self.ctime.write(writer)
    }
}
