//! Raw-word inputs: `.bin` files carry one 16-digit binary word per line,
//! `.hex` files one 4-nibble hex word per line. Blank lines and `;`
//! comments are skipped; a trailing comment after the digits is tolerated.

use lcpu::Word;
use lexfile::listing::ListingLine;
use lexfile::ObjModule;

use crate::assembler::Assembly;
use crate::error::Error;

fn assemble_raw<F>(source: &str, file: &str, parse: F) -> Result<Assembly, Error>
where
    F: Fn(&str) -> Result<Word, String>,
{
    let mut code = Vec::new();
    let mut listing = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_num = index as u32 + 1;
        let mut text = raw.trim();
        if let Some(comment) = text.find(';') {
            text = text[..comment].trim_end();
        }
        if text.is_empty() {
            listing.push(ListingLine::source_only(raw));
            continue;
        }
        let word = parse(text)
            .map_err(|message| Error::single(file, line_num, raw, message))?;
        listing.push(ListingLine {
            loc: Some(code.len() as Word),
            words: vec![word],
            source: Some(raw.to_string()),
        });
        code.push(word);
    }

    if code.is_empty() {
        return Err(Error::single(file, 0, "", "empty file".to_string()));
    }

    Ok(Assembly {
        module: ObjModule::from(Vec::new(), code),
        object_mode: false,
        listing,
        warnings: Vec::new(),
    })
}

pub fn assemble_bin(source: &str, file: &str) -> Result<Assembly, Error> {
    assemble_raw(source, file, |text| {
        if text.len() != 16 || !text.bytes().all(|b| b == b'0' || b == b'1') {
            return Err("expected exactly 16 binary digits".to_string());
        }
        u16::from_str_radix(text, 2).map_err(|_| "bad binary word".to_string())
    })
}

pub fn assemble_hex(source: &str, file: &str) -> Result<Assembly, Error> {
    assemble_raw(source, file, |text| {
        if text.len() != 4 || !text.bytes().all(|b| (b as char).is_ascii_hexdigit()) {
            return Err("expected exactly 4 hex digits".to_string());
        }
        u16::from_str_radix(text, 16).map_err(|_| "bad hex word".to_string())
    })
}
