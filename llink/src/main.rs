#[macro_use]
extern crate clap;

use clap::Arg;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUTS")
                .help("Object modules to link, in order")
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the executable to write (default link.e)"),
        )
        .get_matches();

    let inputs: Vec<&str> = matches.values_of("INPUTS").unwrap().collect();
    let output = PathBuf::from(matches.value_of("output").unwrap_or("link.e"));

    let module = match llink::link_files(&inputs) {
        Ok(module) => module,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = lexfile::write_file(&output, &module) {
        eprintln!("Writing \"{}\" failed: {}", output.display(), err);
        std::process::exit(1);
    }
}
