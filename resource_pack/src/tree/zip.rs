use std::{
    borrow::Cow,
    collections::HashSet,
    io::{self, BufReader, Read, Write},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use crc::{Crc, CRC_32_ISO_HDLC};
use flate2::{bufread, read::DeflateDecoder, write::DeflateEncoder};
use tracing::{debug, trace};

use crate::{
    config::{Compression, Options},
    tree::{Entry, TreeWriter},
    Error, Result,
};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

const LOCAL_FILE_HEADER: u32 = 0x04034B50;
const DATA_DESCRIPTOR: u32 = 0x08074B50;
const CENTRAL_DIRECTORY_HEADER: u32 = 0x02014B50;
const ZIP64_END_OF_CENTRAL_DIRECTORY: u32 = 0x06064B50;
const END_OF_CENTRAL_DIRECTORY: u32 = 0x06054B50;

const ZIP64_EXTRA_FIELD: u16 = 0x0001;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

const FLAG_ENCRYPTED: u16 = 1 << 0;
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
const FLAG_UTF8: u16 = 1 << 11;

const VERSION: u16 = 20;

// 1980-01-01 00:00:00, keeps archives reproducible
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = (1 << 5) | 1;

/// Streams entries of a zip archive in the order they are stored, without
/// seeking to the central directory.
pub struct ZipReader<R: Read> {
    input: BufReader<R>,
    done: bool,
}

impl<R: Read> ZipReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: BufReader::new(input),
            done: false,
        }
    }

    fn read_entry(&mut self) -> Result<Option<Entry>> {
        loop {
            let signature = self.input.read_u32::<LittleEndian>().map_err(corrupt)?;
            match signature {
                LOCAL_FILE_HEADER => {}
                CENTRAL_DIRECTORY_HEADER
                | ZIP64_END_OF_CENTRAL_DIRECTORY
                | END_OF_CENTRAL_DIRECTORY => return Ok(None),
                _ => {
                    return Err(Error::CorruptArchive(format!(
                        "invalid signature {signature:08x}"
                    )))
                }
            }
            let header = LocalHeader::decode(&mut self.input).map_err(corrupt)?;
            if header.flags & FLAG_ENCRYPTED != 0 {
                return Err(Error::CorruptArchive(format!(
                    "encrypted entry {}",
                    header.name
                )));
            }
            let data_descriptor = header.flags & FLAG_DATA_DESCRIPTOR != 0;

            let mut content = vec![];
            let (crc, size) = match header.method {
                // the header sizes of stored entries are required even with a
                // data descriptor, there is no end marker to stream up to
                METHOD_STORED => {
                    content = read_exact(&mut self.input, header.compressed_size)?;
                    if data_descriptor {
                        let descriptor = DataDescriptor::decode(&mut self.input, header.zip64)
                            .map_err(corrupt)?;
                        if descriptor.compressed_size != content.len() as u64 {
                            return Err(Error::CorruptArchive(format!(
                                "stored entry {} without size",
                                header.name
                            )));
                        }
                        (descriptor.crc, descriptor.size)
                    } else {
                        (header.crc, header.size)
                    }
                }
                METHOD_DEFLATE if data_descriptor => {
                    bufread::DeflateDecoder::new(&mut self.input)
                        .read_to_end(&mut content)
                        .map_err(corrupt)?;
                    let descriptor =
                        DataDescriptor::decode(&mut self.input, header.zip64).map_err(corrupt)?;
                    (descriptor.crc, descriptor.size)
                }
                METHOD_DEFLATE => {
                    let compressed = read_exact(&mut self.input, header.compressed_size)?;
                    DeflateDecoder::new(compressed.as_slice())
                        .read_to_end(&mut content)
                        .map_err(corrupt)?;
                    (header.crc, header.size)
                }
                method => return Err(Error::UnsupportedCompression(method)),
            };
            if content.len() as u64 != size {
                return Err(Error::CorruptArchive(format!(
                    "size mismatch in {}",
                    header.name
                )));
            }
            if CRC32.checksum(&content) != crc {
                return Err(Error::CorruptArchive(format!(
                    "checksum mismatch in {}",
                    header.name
                )));
            }

            if header.name.ends_with('/') {
                trace!("Skipping directory {}", header.name);
                continue;
            }
            return Ok(Some(Entry {
                path: header.name,
                size,
                content: Bytes::from(content),
            }));
        }
    }
}

impl<R: Read> Iterator for ZipReader<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

// does not trust the declared length for the allocation
fn read_exact<R: Read>(input: &mut R, length: u64) -> Result<Vec<u8>> {
    let mut data = vec![];
    input
        .take(length)
        .read_to_end(&mut data)
        .map_err(corrupt)?;
    if data.len() as u64 != length {
        return Err(Error::CorruptArchive(
            "unexpected end of archive".to_owned(),
        ));
    }
    Ok(data)
}

fn corrupt(error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::UnexpectedEof => {
            Error::CorruptArchive("unexpected end of archive".to_owned())
        }
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
            Error::CorruptArchive(error.to_string())
        }
        _ => Error::Io(error),
    }
}

struct LocalHeader {
    flags: u16,
    method: u16,
    crc: u32,
    compressed_size: u64,
    size: u64,
    name: String,
    /// Sizes come from the zip64 extra field, the data descriptor is zip64
    /// too.
    zip64: bool,
}

impl LocalHeader {
    fn decode<R: Read>(input: &mut R) -> io::Result<Self> {
        let _version = input.read_u16::<LittleEndian>()?;
        let flags = input.read_u16::<LittleEndian>()?;
        let method = input.read_u16::<LittleEndian>()?;
        let _time = input.read_u16::<LittleEndian>()?;
        let _date = input.read_u16::<LittleEndian>()?;
        let crc = input.read_u32::<LittleEndian>()?;
        let mut compressed_size = input.read_u32::<LittleEndian>()? as u64;
        let mut size = input.read_u32::<LittleEndian>()? as u64;
        let name_length = input.read_u16::<LittleEndian>()?;
        let extra_length = input.read_u16::<LittleEndian>()?;
        let mut name = vec![0; name_length as usize];
        input.read_exact(&mut name)?;
        let mut extra = vec![0; extra_length as usize];
        input.read_exact(&mut extra)?;

        let mut zip64 = false;
        let mut extra = extra.as_slice();
        while extra.len() >= 4 {
            let id = extra.read_u16::<LittleEndian>()?;
            let length = extra.read_u16::<LittleEndian>()? as usize;
            if length > extra.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "extra field exceeds header",
                ));
            }
            let (mut data, rest) = extra.split_at(length);
            extra = rest;
            if id != ZIP64_EXTRA_FIELD {
                continue;
            }
            // local headers carry both sizes, original size first
            zip64 = true;
            if size == u32::MAX as u64 || data.len() >= 16 {
                size = data.read_u64::<LittleEndian>()?;
            }
            if compressed_size == u32::MAX as u64 || data.len() >= 8 {
                compressed_size = data.read_u64::<LittleEndian>()?;
            }
        }

        Ok(Self {
            flags,
            method,
            crc,
            compressed_size,
            size,
            name: String::from_utf8_lossy(&name).replace('\\', "/"),
            zip64,
        })
    }
}

struct DataDescriptor {
    crc: u32,
    compressed_size: u64,
    size: u64,
}

impl DataDescriptor {
    fn decode<R: Read>(input: &mut R, zip64: bool) -> io::Result<Self> {
        // the signature is optional
        let mut crc = input.read_u32::<LittleEndian>()?;
        if crc == DATA_DESCRIPTOR {
            crc = input.read_u32::<LittleEndian>()?;
        }
        let (compressed_size, size) = if zip64 {
            (
                input.read_u64::<LittleEndian>()?,
                input.read_u64::<LittleEndian>()?,
            )
        } else {
            (
                input.read_u32::<LittleEndian>()? as u64,
                input.read_u32::<LittleEndian>()? as u64,
            )
        };
        Ok(Self {
            crc,
            compressed_size,
            size,
        })
    }
}

/// Writes a reproducible zip archive, the central directory is written by
/// [`ZipWriter::finish_into_inner`] or [`TreeWriter::finish`].
pub struct ZipWriter<W: Write> {
    output: W,
    compression: Compression,
    compression_level: u32,

    offset: u64,
    entries: Vec<CentralEntry>,
    names: HashSet<String>,
}

struct CentralEntry {
    name: String,
    method: u16,
    crc: u32,
    compressed_size: u32,
    size: u32,
    offset: u32,
}

impl<W: Write> ZipWriter<W> {
    pub fn new(output: W, options: &Options) -> Self {
        Self {
            output,
            compression: options.compression,
            compression_level: options.compression_level.min(9),
            offset: 0,
            entries: vec![],
            names: HashSet::new(),
        }
    }

    pub fn finish_into_inner(mut self) -> Result<W> {
        let central_directory_offset = self.offset;
        let mut central_directory_size = 0u64;
        for entry in self.entries.iter() {
            self.output.write_u32::<LittleEndian>(CENTRAL_DIRECTORY_HEADER)?;
            self.output.write_u16::<LittleEndian>(VERSION)?; // made by
            self.output.write_u16::<LittleEndian>(VERSION)?; // needed
            self.output.write_u16::<LittleEndian>(FLAG_UTF8)?;
            self.output.write_u16::<LittleEndian>(entry.method)?;
            self.output.write_u16::<LittleEndian>(DOS_TIME)?;
            self.output.write_u16::<LittleEndian>(DOS_DATE)?;
            self.output.write_u32::<LittleEndian>(entry.crc)?;
            self.output.write_u32::<LittleEndian>(entry.compressed_size)?;
            self.output.write_u32::<LittleEndian>(entry.size)?;
            self.output.write_u16::<LittleEndian>(entry.name.len() as u16)?;
            self.output.write_u16::<LittleEndian>(0)?; // extra
            self.output.write_u16::<LittleEndian>(0)?; // comment
            self.output.write_u16::<LittleEndian>(0)?; // disk
            self.output.write_u16::<LittleEndian>(0)?; // internal attributes
            self.output.write_u32::<LittleEndian>(0)?; // external attributes
            self.output.write_u32::<LittleEndian>(entry.offset)?;
            self.output.write_all(entry.name.as_bytes())?;
            central_directory_size += 46 + entry.name.len() as u64;
        }
        if central_directory_offset > u32::MAX as u64 || central_directory_size > u32::MAX as u64
        {
            return Err(Error::ArchiveTooLarge);
        }

        self.output.write_u32::<LittleEndian>(END_OF_CENTRAL_DIRECTORY)?;
        self.output.write_u16::<LittleEndian>(0)?; // disk
        self.output.write_u16::<LittleEndian>(0)?; // central directory disk
        self.output.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        self.output.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        self.output.write_u32::<LittleEndian>(central_directory_size as u32)?;
        self.output.write_u32::<LittleEndian>(central_directory_offset as u32)?;
        self.output.write_u16::<LittleEndian>(0)?; // comment
        self.output.flush()?;

        debug!(
            "Finished archive with {} entries, {} bytes",
            self.entries.len(),
            central_directory_offset + central_directory_size + 22
        );
        Ok(self.output)
    }
}

impl<W: Write> TreeWriter for ZipWriter<W> {
    fn write(&mut self, path: &str, content: &[u8]) -> Result<()> {
        if self.names.contains(path) {
            return Err(Error::DuplicateEntry(path.to_owned()));
        }
        if self.entries.len() >= u16::MAX as usize || path.len() > u16::MAX as usize {
            return Err(Error::ArchiveTooLarge);
        }

        let crc = CRC32.checksum(content);
        let (method, data) = match self.compression {
            Compression::Stored => (METHOD_STORED, Cow::Borrowed(content)),
            Compression::Deflate => {
                let mut encoder = DeflateEncoder::new(
                    Vec::new(),
                    flate2::Compression::new(self.compression_level),
                );
                encoder.write_all(content)?;
                (METHOD_DEFLATE, Cow::Owned(encoder.finish()?))
            }
        };
        if content.len() as u64 >= u32::MAX as u64
            || data.len() as u64 >= u32::MAX as u64
            || self.offset > u32::MAX as u64
        {
            return Err(Error::ArchiveTooLarge);
        }

        self.output.write_u32::<LittleEndian>(LOCAL_FILE_HEADER)?;
        self.output.write_u16::<LittleEndian>(VERSION)?;
        self.output.write_u16::<LittleEndian>(FLAG_UTF8)?;
        self.output.write_u16::<LittleEndian>(method)?;
        self.output.write_u16::<LittleEndian>(DOS_TIME)?;
        self.output.write_u16::<LittleEndian>(DOS_DATE)?;
        self.output.write_u32::<LittleEndian>(crc)?;
        self.output.write_u32::<LittleEndian>(data.len() as u32)?;
        self.output.write_u32::<LittleEndian>(content.len() as u32)?;
        self.output.write_u16::<LittleEndian>(path.len() as u16)?;
        self.output.write_u16::<LittleEndian>(0)?; // extra
        self.output.write_all(path.as_bytes())?;
        self.output.write_all(&data)?;

        self.entries.push(CentralEntry {
            name: path.to_owned(),
            method,
            crc,
            compressed_size: data.len() as u32,
            size: content.len() as u32,
            offset: self.offset as u32,
        });
        self.names.insert(path.to_owned());
        self.offset += 30 + path.len() as u64 + data.len() as u64;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.finish_into_inner().map(drop)
    }
}
