//! Relocatable linker for LCC object modules.
//!
//! Modules are merged in the order given: each module's code lands at the
//! current end of the merged code array and every header entry address is
//! translated by that base. Cross-module references then resolve through
//! three fix-up tables, distinguished by the width of the instruction field
//! they patch: `E` (the 11-bit `bl` field), `e` (the 9-bit `ld`/`st`/`lea`
//! field) and `V` (a full word). `A` records mark words holding
//! module-relative absolute addresses, biased by their module's base.
//!
//! The output is itself re-linkable: exports survive as `G` entries and
//! every resolved full-word reference leaves an `A` entry behind.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use lexfile::{Entry, ObjModule};


const ADDRESS_SPACE: usize = 1 << 16;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error, PathBuf),
    Module(lexfile::Error, PathBuf),
    MultipleEntryPoints,
    MultipleDefinitions(String),
    UndefinedExternal(String),
    TooBig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "{}: {}", path.display(), err),
            Error::Module(err, path) => write!(f, "{}: {}", path.display(), err),
            Error::MultipleEntryPoints => f.write_str("Multiple entry points"),
            Error::MultipleDefinitions(label) => {
                write!(f, "Multiple definitions of {}", label)
            }
            Error::UndefinedExternal(label) => {
                write!(f, "undefined external reference: {}", label)
            }
            Error::TooBig => f.write_str("program too big"),
        }
    }
}

impl std::error::Error for Error {}

struct ExternRef {
    addr: u16,
    label: String,
}

struct AdjustRec {
    addr: u16,
    module_start: u16,
}

/// Accumulates modules, then resolves and emits the merged executable.
#[derive(Default)]
pub struct Linker {
    mca: Vec<u16>,
    start: Option<u16>,
    globals: HashMap<String, u16>,
    global_order: Vec<String>,
    refs11: Vec<ExternRef>,
    refs9: Vec<ExternRef>,
    refs_word: Vec<ExternRef>,
    adjusts: Vec<AdjustRec>,
}

impl Linker {
    pub fn new() -> Linker {
        Linker::default()
    }

    /// Merges one module at the current end of the code array.
    pub fn add_module(&mut self, module: &ObjModule) -> Result<(), Error> {
        if self.mca.len() + module.code().len() > ADDRESS_SPACE {
            return Err(Error::TooBig);
        }
        let base = self.mca.len() as u16;

        for entry in module.entries() {
            let addr = entry.addr().wrapping_add(base);
            match entry {
                Entry::Start(_) => {
                    if self.start.is_some() {
                        return Err(Error::MultipleEntryPoints);
                    }
                    self.start = Some(addr);
                }
                Entry::Global { label, .. } => {
                    if self.globals.contains_key(label) {
                        return Err(Error::MultipleDefinitions(label.clone()));
                    }
                    self.globals.insert(label.clone(), addr);
                    self.global_order.push(label.clone());
                }
                Entry::Extern11 { label, .. } => self.refs11.push(ExternRef {
                    addr,
                    label: label.clone(),
                }),
                Entry::Extern9 { label, .. } => self.refs9.push(ExternRef {
                    addr,
                    label: label.clone(),
                }),
                Entry::ExternWord { label, .. } => self.refs_word.push(ExternRef {
                    addr,
                    label: label.clone(),
                }),
                Entry::Adjust(_) => self.adjusts.push(AdjustRec {
                    addr,
                    module_start: base,
                }),
            }
        }

        self.mca.extend_from_slice(module.code());
        debug!(
            "merged module at base {:04x}, {} words",
            base,
            module.code().len()
        );
        Ok(())
    }

    fn resolve(&self, label: &str) -> Result<u16, Error> {
        self.globals
            .get(label)
            .copied()
            .ok_or_else(|| Error::UndefinedExternal(label.to_string()))
    }

    /// Patches a PC-relative field of `width` bits in place.
    fn patch_relative(mca: &mut [u16], addr: u16, target: u16, width: u32) {
        let mask = (1u16 << width) - 1;
        let word = mca[addr as usize];
        let disp = word & mask;
        let fixed = disp
            .wrapping_add(target)
            .wrapping_sub(addr)
            .wrapping_sub(1)
            & mask;
        mca[addr as usize] = (word & !mask) | fixed;
    }

    /// Resolves every external and adjustment, producing the executable.
    pub fn link(mut self) -> Result<ObjModule, Error> {
        for r in &self.refs11 {
            let target = self.resolve(&r.label)?;
            Linker::patch_relative(&mut self.mca, r.addr, target, 11);
            debug!("E {:04x} -> {} ({:04x})", r.addr, r.label, target);
        }
        for r in &self.refs9 {
            let target = self.resolve(&r.label)?;
            Linker::patch_relative(&mut self.mca, r.addr, target, 9);
            debug!("e {:04x} -> {} ({:04x})", r.addr, r.label, target);
        }
        for r in &self.refs_word {
            let target = self.resolve(&r.label)?;
            let word = self.mca[r.addr as usize];
            self.mca[r.addr as usize] = word.wrapping_add(target);
            debug!("V {:04x} -> {} ({:04x})", r.addr, r.label, target);
        }
        for a in &self.adjusts {
            let word = self.mca[a.addr as usize];
            self.mca[a.addr as usize] = word.wrapping_add(a.module_start);
        }

        let mut entries = Vec::new();
        if let Some(start) = self.start {
            entries.push(Entry::Start(start));
        }
        // exports survive so the result can be linked again
        for label in &self.global_order {
            entries.push(Entry::Global {
                addr: self.globals[label],
                label: label.clone(),
            });
        }
        // a resolved full-word reference needs biasing if relocated again
        for r in &self.refs_word {
            entries.push(Entry::Adjust(r.addr));
        }
        for a in &self.adjusts {
            entries.push(Entry::Adjust(a.addr));
        }

        Ok(ObjModule::from(entries, self.mca))
    }
}

/// Links modules in order into one executable.
pub fn link_modules(modules: &[ObjModule]) -> Result<ObjModule, Error> {
    let mut linker = Linker::new();
    for module in modules {
        linker.add_module(module)?;
    }
    linker.link()
}

/// Reads and links object files; no output is produced on any error.
pub fn link_files<P: AsRef<Path>>(paths: &[P]) -> Result<ObjModule, Error> {
    let mut linker = Linker::new();
    for path in paths {
        let path = path.as_ref();
        let module = lexfile::read_file(path).map_err(|err| match err {
            lexfile::Error::Io(io) => Error::Io(io, path.to_path_buf()),
            other => Error::Module(other, path.to_path_buf()),
        })?;
        linker.add_module(&module)?;
    }
    linker.link()
}
