//! Driver pipeline for the LCC toolchain.
//!
//! Routes an input file through the assembler, linker and interpreter by
//! its extension, writes the produced artifacts (`.e`/`.o` modules and
//! `.lst`/`.bst` listings) and carries the `name.nnn` collaborator used for
//! the listing banner. The interpreter pieces live in [lcpu], the assembler
//! in [lasm] and the linker in [llink]; this crate only glues them.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use lcpu::{Console, Machine};
use lexfile::listing::{current_date, Listing, ListingLine, Stats};
use lexfile::ObjModule;


pub mod name_file;

#[derive(Debug)]
pub enum Error {
    Asm(lasm::Error),
    Link(llink::Error),
    File(lexfile::Error, PathBuf),
    Load(lcpu::LoadError, PathBuf),
    Runtime(lcpu::RuntimeError),
    Io(io::Error, PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Asm(err) => write!(f, "{}", err),
            Error::Link(err) => write!(f, "{}", err),
            Error::File(err, path) => write!(f, "{}: {}", path.display(), err),
            Error::Load(err, path) => write!(f, "{}: {}", path.display(), err),
            Error::Runtime(err) => write!(f, "{}", err),
            Error::Io(err, path) => write!(f, "{}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Exit code 2 is reserved for environment failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io(..) => 2,
            _ => 1,
        }
    }
}

/// Everything the driver needs to know about one run.
pub struct RunOptions {
    pub load_point: u16,
    pub output: Option<PathBuf>,
    /// Canned input buffer for the input traps; `None` reads stdin.
    pub input: Option<String>,
    pub user: Option<String>,
    pub write_bst: bool,
    pub nostats: bool,
    pub no_listing: bool,
    pub dump_registers: bool,
    pub dump_memory: bool,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            load_point: 0,
            output: None,
            input: None,
            user: None,
            write_bst: false,
            nostats: false,
            no_listing: false,
            dump_registers: false,
            dump_memory: false,
        }
    }
}

/// Routes one input file by extension: executables run directly, object
/// inputs go to the linker, everything else goes through the assembler
/// first (and runs unless it assembled into an object module).
pub fn run_file(input: &Path, options: &RunOptions) -> Result<(), Error> {
    match input.extension().and_then(OsStr::to_str) {
        Some("e") => {
            let module =
                lexfile::read_file(input).map_err(|err| Error::File(err, input.to_path_buf()))?;
            execute(&module, None, input, options)
        }
        Some("o") => link_objects(&[input.to_path_buf()], options),
        _ => assemble_and_maybe_run(input, options),
    }
}

/// Links object modules into one executable (default `link.e`).
pub fn link_objects(inputs: &[PathBuf], options: &RunOptions) -> Result<(), Error> {
    let module = llink::link_files(inputs).map_err(Error::Link)?;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("link.e"));
    lexfile::write_file(&output, &module).map_err(|err| Error::Io(err, output.clone()))?;
    debug!("linked {} modules into {}", inputs.len(), output.display());
    Ok(())
}

fn assemble_and_maybe_run(input: &Path, options: &RunOptions) -> Result<(), Error> {
    let assembly = lasm::assemble_file(input, &lasm::Options::default()).map_err(Error::Asm)?;

    for warning in &assembly.warnings {
        report_warning(&warning.to_string());
    }

    if assembly.object_mode {
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| input.with_extension("o"));
        lexfile::write_file(&output, &assembly.module)
            .map_err(|err| Error::Io(err, output.clone()))?;

        // object modules always get both listing artifacts
        let mut listing = Listing::new(current_date());
        listing.user = options.user.clone();
        listing.header = Some(&assembly.module);
        listing.lines = assembly.listing.clone();
        for (binary, ext) in &[(false, "lst"), (true, "bst")] {
            let path = output.with_extension(ext);
            fs::write(&path, listing.render(*binary)).map_err(|err| Error::Io(err, path))?;
        }
        return Ok(());
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension("e"));
    lexfile::write_file(&output, &assembly.module)
        .map_err(|err| Error::Io(err, output.clone()))?;

    execute(&assembly.module, Some(assembly.listing), input, options)
}

/// Loads and runs a module, then writes the annotated listing.
///
/// Failed runs produce no listing artifacts.
pub fn execute(
    module: &ObjModule,
    source_lines: Option<Vec<ListingLine>>,
    input: &Path,
    options: &RunOptions,
) -> Result<(), Error> {
    let console = match &options.input {
        Some(buffer) => Console::new(
            Box::new(io::Cursor::new(buffer.clone().into_bytes())),
            Box::new(io::stdout()),
        ),
        None => Console::stdio(),
    };

    let mut machine = Machine::new(console);
    machine
        .load(module, options.load_point)
        .map_err(|err| Error::Load(err, input.to_path_buf()))?;
    machine.run().map_err(Error::Runtime)?;

    if options.dump_registers {
        dump_registers(&machine);
    }
    if options.dump_memory {
        dump_memory(&machine);
    }

    if !options.no_listing {
        let lines = match source_lines {
            Some(lines) => lines,
            None => image_lines(&machine),
        };

        let mut listing = Listing::new(current_date());
        listing.user = options.user.clone();
        listing.header = Some(module);
        listing.lines = lines;
        listing.output = Some(machine.console().captured().to_string());
        if !options.nostats {
            listing.stats = Some(Stats {
                input_file: input.display().to_string(),
                instructions_executed: machine.instructions_executed(),
                program_size: machine.program_size() as u32,
                max_stack: machine.max_stack_depth(),
                load_point: machine.load_point(),
            });
        }
        write_listing(&listing, input, options)?;
    }
    Ok(())
}

/// Sourceless listing rows for a loaded executable.
fn image_lines(machine: &Machine) -> Vec<ListingLine> {
    let base = machine.load_point();
    machine
        .initial_image()
        .iter()
        .enumerate()
        .map(|(i, &word)| ListingLine {
            loc: Some(base.wrapping_add(i as u16)),
            words: vec![word],
            source: None,
        })
        .collect()
}

fn write_listing(listing: &Listing, base: &Path, options: &RunOptions) -> Result<(), Error> {
    let lst_path = base.with_extension("lst");
    fs::write(&lst_path, listing.render(false)).map_err(|err| Error::Io(err, lst_path))?;
    if options.write_bst {
        let bst_path = base.with_extension("bst");
        fs::write(&bst_path, listing.render(true)).map_err(|err| Error::Io(err, bst_path))?;
    }
    Ok(())
}

fn dump_registers(machine: &Machine) {
    use lcpu::instructions::Register;
    let flags = machine.flags();
    println!("pc = {:04x}  NZCV = {}", machine.pc(), flags.digits());
    let all = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::Fp,
        Register::Sp,
        Register::Lr,
    ];
    for (i, &reg) in all.iter().enumerate() {
        print!("{} = {:04x}", reg, machine.register(reg));
        if i % 4 == 3 {
            println!();
        } else {
            print!("  ");
        }
    }
}

fn dump_memory(machine: &Machine) {
    let base = machine.load_point();
    for i in 0..machine.program_size() {
        let addr = base.wrapping_add(i as u16);
        println!("{:04x}: {:04x}", addr, machine.mem(addr));
    }
}

fn report_warning(message: &str) {
    use colored::Colorize;
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
