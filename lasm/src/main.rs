#[macro_use]
extern crate clap;

use clap::Arg;
use std::path::{Path, PathBuf};

use lexfile::listing::{current_date, Listing};

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to assemble (.a, .bin or .hex)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the output file to write to"),
        )
        .arg(
            Arg::with_name("keep_going")
                .short("k")
                .long("keep-going")
                .help("Collect all diagnostics instead of stopping at the first"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");
    let options = lasm::Options {
        stop_on_error: !matches.is_present("keep_going"),
    };

    if let Err(err) = run(input, output, &options) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[derive(Debug)]
enum Error {
    Asm(lasm::Error),
    Io(std::io::Error, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Asm(err) => write!(f, "{}", err),
            Error::Io(err, path) => write!(f, "Writing \"{}\" failed: {}", path.display(), err),
        }
    }
}

fn run(input: &str, output: Option<&str>, options: &lasm::Options) -> Result<(), Error> {
    let input_path = Path::new(input);
    let assembly = lasm::assemble_file(input_path, options).map_err(Error::Asm)?;

    for warning in &assembly.warnings {
        eprintln!("warning: {}", warning);
    }

    let extension = if assembly.object_mode { "o" } else { "e" };
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension(extension));

    lexfile::write_file(&output_path, &assembly.module)
        .map_err(|err| Error::Io(err, output_path.clone()))?;

    // object modules also get their listing artifacts
    if assembly.object_mode {
        let mut listing = Listing::new(current_date());
        listing.header = Some(&assembly.module);
        listing.lines = assembly.listing.clone();

        for (bst, ext) in &[(false, "lst"), (true, "bst")] {
            let path = output_path.with_extension(ext);
            std::fs::write(&path, listing.render(*bst)).map_err(|err| Error::Io(err, path))?;
        }
    }
    Ok(())
}
