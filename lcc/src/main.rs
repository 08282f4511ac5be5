#[macro_use]
extern crate clap;

use clap::Arg;
use colored::Colorize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use lcc::{name_file, RunOptions};

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUTS")
                .help("Input file (.a/.e/.bin/.hex), or object modules (.o) to link")
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .help("Output path for the produced executable or object"),
        )
        .arg(
            Arg::with_name("load_point")
                .short("l")
                .long("load-point")
                .takes_value(true)
                .value_name("HEX")
                .help("Load point for execution, in hex (default 0)"),
        )
        .arg(
            Arg::with_name("bst")
                .short("x")
                .long("bst")
                .help("Also write the binary-digit .bst listing"),
        )
        .arg(
            Arg::with_name("trace")
                .short("t")
                .long("trace")
                .help("Trace each executed instruction to stderr"),
        )
        .arg(
            Arg::with_name("dump_registers")
                .short("r")
                .long("dump-registers")
                .help("Dump the registers after the run"),
        )
        .arg(
            Arg::with_name("dump_memory")
                .short("m")
                .long("dump-memory")
                .help("Dump the loaded memory after the run"),
        )
        .arg(
            Arg::with_name("nostats")
                .long("nostats")
                .help("Omit the statistics footer from the listing"),
        )
        .arg(
            Arg::with_name("no_listing")
                .long("no-listing")
                .help("Do not write .lst/.bst artifacts"),
        )
        .get_matches();

    let mut builder = env_logger::Builder::from_default_env();
    if matches.is_present("trace") {
        builder.filter(Some("lcpu"), log::LevelFilter::Trace);
    }
    builder.init();

    let inputs: Vec<PathBuf> = matches
        .values_of("INPUTS")
        .unwrap()
        .map(PathBuf::from)
        .collect();

    let load_point = match matches.value_of("load_point") {
        None => 0,
        Some(text) => match u16::from_str_radix(text.trim_start_matches("0x"), 16) {
            Ok(value) => value,
            Err(_) => {
                report_error(&format!("bad load point: {}", text));
                std::process::exit(1);
            }
        },
    };

    let user = match name_file::read_or_prompt(&inputs[0]) {
        Ok(user) => user,
        Err(_) => None,
    };

    let options = RunOptions {
        load_point,
        output: matches.value_of("output").map(PathBuf::from),
        input: None,
        user,
        write_bst: matches.is_present("bst"),
        nostats: matches.is_present("nostats"),
        no_listing: matches.is_present("no_listing"),
        dump_registers: matches.is_present("dump_registers"),
        dump_memory: matches.is_present("dump_memory"),
    };

    let result = if inputs.len() > 1 || has_extension(&inputs[0], "o") {
        // one or more object modules: link them into an executable
        lcc::link_objects(&inputs, &options)
    } else {
        lcc::run_file(&inputs[0], &options)
    };

    if let Err(err) = result {
        report_error(&err.to_string());
        std::process::exit(err.exit_code());
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(OsStr::to_str) == Some(ext)
}

fn report_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
