//! On-disk artifacts of the LCC toolchain.
//!
//! Object modules (`.o`) and executables (`.e`) share one format: a one-byte
//! `o` signature, a sequence of typed header entries, a one-byte `C` marker
//! and the code section as packed little-endian 16-bit words running to the
//! end of the file. The [`listing`] module renders the `.lst`/`.bst`
//! artifacts built from the same data.

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use util::Endian;

pub mod listing;


/// First byte of every module file.
pub const MAGIC: u8 = b'o';
/// Separates the header entries from the code section.
pub const CODE_MARKER: u8 = b'C';

/// One typed header entry.
///
/// `Global` and the three external kinds carry a null-terminated label on
/// disk; `Start` and `Adjust` are bare addresses. External entries differ
/// only in the width of the instruction field the linker patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `S` — program entry point.
    Start(u16),
    /// `G` — exported label bound to an address.
    Global { addr: u16, label: String },
    /// `E` — external reference patched into an 11-bit `bl` field.
    Extern11 { addr: u16, label: String },
    /// `e` — external reference patched into a 9-bit `ld`/`st`/`lea` field.
    Extern9 { addr: u16, label: String },
    /// `V` — external reference patched into a full word.
    ExternWord { addr: u16, label: String },
    /// `A` — code word holding a module-relative absolute address.
    Adjust(u16),
}

impl Entry {
    pub fn tag(&self) -> u8 {
        match self {
            Entry::Start(_) => b'S',
            Entry::Global { .. } => b'G',
            Entry::Extern11 { .. } => b'E',
            Entry::Extern9 { .. } => b'e',
            Entry::ExternWord { .. } => b'V',
            Entry::Adjust(_) => b'A',
        }
    }

    pub fn addr(&self) -> u16 {
        match *self {
            Entry::Start(addr)
            | Entry::Adjust(addr)
            | Entry::Global { addr, .. }
            | Entry::Extern11 { addr, .. }
            | Entry::Extern9 { addr, .. }
            | Entry::ExternWord { addr, .. } => addr,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Entry::Global { label, .. }
            | Entry::Extern11 { label, .. }
            | Entry::Extern9 { label, .. }
            | Entry::ExternWord { label, .. } => Some(label),
            _ => None,
        }
    }

    /// True for the `E`/`e`/`V` kinds that only a linker can resolve.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Entry::Extern11 { .. } | Entry::Extern9 { .. } | Entry::ExternWord { .. }
        )
    }
}

/// An object module or executable held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjModule {
    entries: Vec<Entry>,
    code: Vec<u16>,
}

impl ObjModule {
    pub fn from(entries: Vec<Entry>, code: Vec<u16>) -> ObjModule {
        ObjModule { entries, code }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries[..]
    }

    pub fn code(&self) -> &[u16] {
        &self.code[..]
    }

    /// The `S` entry address, if the module has one.
    pub fn start(&self) -> Option<u16> {
        self.entries.iter().find_map(|e| match *e {
            Entry::Start(addr) => Some(addr),
            _ => None,
        })
    }

    /// True when the module still carries unresolved external references.
    pub fn has_externals(&self) -> bool {
        self.entries.iter().any(Entry::is_external)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The file does not begin with the `o` signature byte.
    BadMagic,
    /// A header entry tag outside `S`/`G`/`E`/`e`/`V`/`A`/`C`.
    UnknownEntry(u8),
    /// A header label that is not valid ASCII text.
    BadLabel,
    /// The code section ends on an odd byte.
    TruncatedCode,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::BadMagic => f.write_str("invalid file signature"),
            Error::UnknownEntry(tag) => {
                write!(f, "unknown header entry type 0x{:02x}", tag)
            }
            Error::BadLabel => f.write_str("malformed header label"),
            Error::TruncatedCode => f.write_str("code section is truncated"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

fn read_cstring<R: Read>(reader: &mut R) -> Result<String, Error> {
    let mut bytes = Vec::new();
    loop {
        let b = reader.read_u8()?;
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    String::from_utf8(bytes).map_err(|_| Error::BadLabel)
}

pub fn read<R: Read>(reader: &mut R) -> Result<ObjModule, Error> {
    if reader.read_u8()? != MAGIC {
        return Err(Error::BadMagic);
    }

    let mut entries = Vec::new();
    loop {
        let tag = reader.read_u8()?;
        if tag == CODE_MARKER {
            break;
        }
        let addr = reader.read_u16::<Endian>()?;
        let entry = match tag {
            b'S' => Entry::Start(addr),
            b'A' => Entry::Adjust(addr),
            b'G' => Entry::Global {
                addr,
                label: read_cstring(reader)?,
            },
            b'E' => Entry::Extern11 {
                addr,
                label: read_cstring(reader)?,
            },
            b'e' => Entry::Extern9 {
                addr,
                label: read_cstring(reader)?,
            },
            b'V' => Entry::ExternWord {
                addr,
                label: read_cstring(reader)?,
            },
            other => return Err(Error::UnknownEntry(other)),
        };
        entries.push(entry);
    }

    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    if raw.len() % 2 != 0 {
        return Err(Error::TruncatedCode);
    }
    let code = raw
        .chunks(2)
        .map(|pair| u16::from(pair[0]) | (u16::from(pair[1]) << 8))
        .collect();

    Ok(ObjModule::from(entries, code))
}

pub fn write<W: Write>(writer: &mut W, module: &ObjModule) -> std::io::Result<()> {
    writer.write_u8(MAGIC)?;
    for entry in &module.entries {
        writer.write_u8(entry.tag())?;
        writer.write_u16::<Endian>(entry.addr())?;
        if let Some(label) = entry.label() {
            writer.write_all(label.as_bytes())?;
            writer.write_u8(0)?;
        }
    }
    writer.write_u8(CODE_MARKER)?;
    for &word in &module.code {
        writer.write_u16::<Endian>(word)?;
    }
    Ok(())
}

pub trait ReadObjExt: Read + Sized {
    fn read_obj(&mut self) -> Result<ObjModule, Error> {
        read(self)
    }
}

impl<R: Read + Sized> ReadObjExt for R {}

pub trait WriteObjExt: Write + Sized {
    fn write_obj(&mut self, module: &ObjModule) -> std::io::Result<()> {
        write(self, module)
    }
}

impl<W: Write + Sized> WriteObjExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ObjModule, Error> {
    BufReader::new(File::open(path)?).read_obj()
}

pub fn write_file<P: AsRef<Path>>(path: P, module: &ObjModule) -> std::io::Result<()> {
    BufWriter::new(File::create(path)?).write_obj(module)
}
