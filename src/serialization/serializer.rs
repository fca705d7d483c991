use super::archive::{Archive, Fields};
use super::codec::{
    decode_bulk, decode_len, encode_bulk, encode_len, read_bytes, write_bytes, BulkPrimitive, Endianness, Primitive,
};
use super::error::{Result, SerializeError};
use std::any::type_name;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// Literal whose digest opens every file written by the engine.
pub const HEADER: &str = "Kestrel Engine";

const DIGEST_LEN: usize = blake3::OUT_LEN * 2;

pub fn header_digest() -> String {
    format_digest(HEADER)
}

/// Hex digest used to tag a payload with its format label.
pub fn format_digest(label: &str) -> String {
    blake3::hash(label.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Serialize,
    Deserialize,
}

enum Stream<'a> {
    Writer(&'a mut dyn Write),
    Reader(&'a mut dyn Read),
}

/// A serializer bound to one stream for the duration of a single pass.
pub struct Serializer<'a> {
    stream: Stream<'a>,
    order: Endianness,
}

impl<'a> Serializer<'a> {
    pub(crate) fn writer(out: &'a mut dyn Write, order: Endianness) -> Self {
        Self { stream: Stream::Writer(out), order }
    }

    pub(crate) fn reader(input: &'a mut dyn Read, order: Endianness) -> Self {
        Self { stream: Stream::Reader(input), order }
    }

    pub fn operation(&self) -> Operation {
        match self.stream {
            Stream::Writer(_) => Operation::Serialize,
            Stream::Reader(_) => Operation::Deserialize,
        }
    }

    pub fn is_reading(&self) -> bool {
        self.operation() == Operation::Deserialize
    }

    pub fn endianness(&self) -> Endianness {
        self.order
    }

    pub fn data<P: Primitive>(&mut self, value: &mut P) -> Result<()> {
        match &mut self.stream {
            Stream::Writer(out) => value.encode(&mut **out, self.order),
            Stream::Reader(input) => {
                *value = P::decode(&mut **input, self.order)?;
                Ok(())
            }
        }
    }

    /// Length-prefixed sequence encoded one element at a time.
    pub fn list<P: Primitive>(&mut self, values: &mut Vec<P>) -> Result<()> {
        match &mut self.stream {
            Stream::Writer(out) => {
                encode_len(&mut **out, values.len(), self.order)?;
                values.iter().try_for_each(|value| value.encode(&mut **out, self.order))
            }
            Stream::Reader(input) => {
                let len = decode_len(&mut **input, self.order)?;
                values.clear();
                values.reserve(len.min(4096));
                for _ in 0..len {
                    values.push(P::decode(&mut **input, self.order)?);
                }
                Ok(())
            }
        }
    }

    /// Length-prefixed sequence copied as one block.
    pub fn bulk<P: BulkPrimitive>(&mut self, values: &mut Vec<P>) -> Result<()> {
        match &mut self.stream {
            Stream::Writer(out) => encode_bulk(&mut **out, values, self.order),
            Stream::Reader(input) => {
                *values = decode_bulk(&mut **input, self.order)?;
                Ok(())
            }
        }
    }

    pub fn archive<A: Archive>(&mut self, archive: &mut A) -> Result<()> {
        let mut version = if self.is_reading() { 0 } else { A::VERSION };
        self.data(&mut version)?;
        if version < 0 {
            return Err(SerializeError::InvalidVersion(version));
        }
        if version > A::VERSION {
            return Err(SerializeError::NewerVersion {
                type_name: type_name::<A>(),
                found: version,
                supported: A::VERSION,
            });
        }
        archive.set_version(version);
        archive.fields(self)
    }

    pub fn archives<A: Archive + Default>(&mut self, archives: &mut Vec<A>) -> Result<()> {
        if self.is_reading() {
            let mut len = 0i32;
            self.data(&mut len)?;
            let len = usize::try_from(len).map_err(|_| SerializeError::InvalidLength(len))?;
            archives.clear();
            archives.reserve(len.min(4096));
            for _ in 0..len {
                let mut item = A::default();
                self.archive(&mut item)?;
                archives.push(item);
            }
            Ok(())
        } else {
            let mut len = i32::try_from(archives.len()).map_err(|_| SerializeError::TooLong(archives.len()))?;
            self.data(&mut len)?;
            archives.iter_mut().try_for_each(|item| self.archive(item))
        }
    }

    /// Walks the fields of an unversioned base record in place.
    pub fn inline<F: Fields>(&mut self, fields: &mut F) -> Result<()> {
        fields.fields(self)
    }
}

/// The envelope fields that precede every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub endianness: Endianness,
    pub format_digest: String,
    pub version: i32,
}

impl Envelope {
    pub fn matches_format(&self, label: &str) -> bool {
        self.format_digest == format_digest(label)
    }

    /// Reads and validates the header, leaving the stream at the root archive.
    pub fn read<R: Read + Seek>(stream: &mut R) -> Result<Self> {
        stream.seek(SeekFrom::Start(0)).map_err(SerializeError::Read)?;
        let header = read_bytes(stream, DIGEST_LEN)?;
        if header != header_digest().as_bytes() {
            return Err(SerializeError::IncompatibleFormat);
        }
        let mut flag = 0u8;
        Serializer::reader(stream, Endianness::native()).data(&mut flag)?;
        let endianness = Endianness::from_flag(flag);

        let mut s = Serializer::reader(stream, endianness);
        let mut format_digest = String::new();
        s.data(&mut format_digest)?;
        let mut version = 0i32;
        s.data(&mut version)?;
        Ok(Self { endianness, format_digest, version })
    }
}

/// Drives top-level passes and owns the envelope layout.
#[derive(Debug, Clone, Copy)]
pub struct BinarySerializer {
    endianness: Endianness,
}

impl Default for BinarySerializer {
    fn default() -> Self {
        Self { endianness: Endianness::native() }
    }
}

impl BinarySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes with a fixed byte order instead of the host order.
    pub fn with_endianness(endianness: Endianness) -> Self {
        Self { endianness }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn serialize<W, A>(&self, stream: &mut W, archive: &mut A, format: &str) -> Result<()>
    where
        W: Write + Seek,
        A: Archive,
    {
        stream.seek(SeekFrom::Start(0)).map_err(SerializeError::Write)?;
        write_bytes(stream, header_digest().as_bytes())?;
        write_bytes(stream, &[self.endianness.flag()])?;

        let mut s = Serializer::writer(stream, self.endianness);
        s.data(&mut format_digest(format))?;
        let mut version = A::VERSION;
        s.data(&mut version)?;
        s.archive(archive)?;
        stream.flush().map_err(SerializeError::Write)
    }

    /// Fills `archive` from `stream`. An empty `format` accepts any payload
    /// type. On error the archive is left partially filled.
    pub fn deserialize<R, A>(&self, stream: &mut R, archive: &mut A, format: &str) -> Result<()>
    where
        R: Read + Seek,
        A: Archive,
    {
        let envelope = Envelope::read(stream)?;
        if !format.is_empty() && !envelope.matches_format(format) {
            return Err(SerializeError::IncompatibleDataType { expected: format.to_string() });
        }
        if envelope.version > A::VERSION {
            return Err(SerializeError::NewerVersion {
                type_name: type_name::<A>(),
                found: envelope.version,
                supported: A::VERSION,
            });
        }
        Serializer::reader(stream, envelope.endianness).archive(archive)
    }

    pub fn to_bytes<A: Archive>(&self, archive: &mut A, format: &str) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.serialize(&mut cursor, archive, format)?;
        Ok(cursor.into_inner())
    }

    pub fn from_bytes<A: Archive + Default>(&self, bytes: &[u8], format: &str) -> Result<A> {
        let mut archive = A::default();
        self.deserialize(&mut Cursor::new(bytes), &mut archive, format)?;
        Ok(archive)
    }
}
