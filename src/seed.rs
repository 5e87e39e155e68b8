//! Initial-data artifacts bound into the sandbox at boot time.

use std::fmt;
use std::io::{Read, Write};

use tempfile::NamedTempFile;

use crate::error::Result;

/// SQL loaded into the sandbox before the engine becomes reachable.
///
/// The two constructors are the only ways to build one, so a seed always
/// holds exactly one source: an open reader or an in-memory buffer.
pub enum SeedData {
    /// An open byte-stream source, drained in full at provisioning time.
    Reader(Box<dyn Read + Send>),
    /// An in-memory buffer.
    Buffer(Vec<u8>),
}

impl SeedData {
    /// Load the SQL script from a reader.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Load the SQL script from a byte buffer.
    pub fn from_buffer(buf: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(buf.into())
    }

    /// Copy the full content into a uniquely named transient file that
    /// Docker can bind-mount.
    ///
    /// The file is deleted when the returned guard drops, on every exit path
    /// from the provisioning call that consumes it, including unwinding.
    pub(crate) fn materialize(self) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("seed-")
            .suffix(".sql")
            .tempfile()?;

        match self {
            Self::Reader(mut reader) => {
                std::io::copy(&mut reader, &mut file)?;
            }
            Self::Buffer(buf) => {
                file.write_all(&buf)?;
            }
        }
        file.flush()?;

        Ok(file)
    }
}

impl fmt::Debug for SeedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader(_) => f.write_str("SeedData::Reader(..)"),
            Self::Buffer(buf) => write!(f, "SeedData::Buffer({} bytes)", buf.len()),
        }
    }
}
