//! Renders the `.lst` and `.bst` listing artifacts.
//!
//! A listing collects up to four sections: the banner with the tool version,
//! date and user name, an echo of the module header, the location/code/source
//! table, and (for executed programs) the captured output plus the program
//! statistics footer. The `.bst` variant renders every code word as sixteen
//! binary digits grouped in fours instead of four hex digits.

use crate::ObjModule;

pub const VERSION_BANNER: &str = "LCC Assemble/Link/Interpret/Debug Ver 0.1";

/// The banner date, e.g. `Sat Aug 01 2026 10:44:22`.
pub fn current_date() -> String {
    chrono::Local::now().format("%a %b %d %Y %H:%M:%S").to_string()
}

const OUTPUT_RULER: &str = "====================================================== Output";
const STATS_RULER: &str = "========================================== Program statistics";

/// One source line of the table, carrying the words it emitted.
///
/// Lines that emit nothing (comments, bare labels, directives) have no
/// location; loaded executables have locations and words but no source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub loc: Option<u16>,
    pub words: Vec<u16>,
    pub source: Option<String>,
}

impl ListingLine {
    pub fn source_only(source: &str) -> ListingLine {
        ListingLine {
            loc: None,
            words: Vec::new(),
            source: Some(source.to_string()),
        }
    }
}

/// The statistics footer of an executed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub input_file: String,
    pub instructions_executed: u64,
    pub program_size: u32,
    pub max_stack: u32,
    pub load_point: u16,
}

pub struct Listing<'a> {
    pub date: String,
    pub user: Option<String>,
    pub header: Option<&'a ObjModule>,
    pub lines: Vec<ListingLine>,
    pub output: Option<String>,
    pub stats: Option<Stats>,
}

impl<'a> Listing<'a> {
    pub fn new(date: String) -> Listing<'a> {
        Listing {
            date,
            user: None,
            header: None,
            lines: Vec::new(),
            output: None,
            stats: None,
        }
    }

    /// Renders the listing text; `binary` selects the `.bst` word format.
    pub fn render(&self, binary: bool) -> String {
        let mut out = String::new();
        let code_width = if binary { 19 } else { 13 };

        out.push_str(&format!("{}  {}\n", VERSION_BANNER, self.date));
        if let Some(user) = &self.user {
            out.push_str(user);
            out.push('\n');
        }

        if let Some(module) = self.header {
            out.push('\n');
            out.push_str("Header\n");
            out.push_str("o\n");
            for entry in module.entries() {
                match entry.label() {
                    Some(label) => out.push_str(&format!(
                        "{} {:04x} {}\n",
                        entry.tag() as char,
                        entry.addr(),
                        label
                    )),
                    None => out.push_str(&format!(
                        "{} {:04x}\n",
                        entry.tag() as char,
                        entry.addr()
                    )),
                }
            }
            out.push_str("C\n");
        }

        let mut lines: &[ListingLine] = &self.lines[..];
        // The reference tool drops a single trailing blank line.
        if let Some(last) = lines.last() {
            let blank = last.words.is_empty()
                && last
                    .source
                    .as_ref()
                    .map(|s| s.trim().is_empty())
                    .unwrap_or(true);
            if blank {
                lines = &lines[..lines.len() - 1];
            }
        }

        if !lines.is_empty() {
            out.push('\n');
            out.push_str(&format!(
                "Loc   {:<width$}  Source Code\n",
                "Code",
                width = code_width
            ));
            for line in lines {
                render_line(&mut out, line, binary, code_width);
            }
        }

        if let Some(output) = &self.output {
            out.push('\n');
            out.push_str(OUTPUT_RULER);
            out.push('\n');
            out.push_str(output);
            if !output.is_empty() && !output.ends_with('\n') {
                out.push('\n');
            }
        }

        if let Some(stats) = &self.stats {
            out.push('\n');
            out.push_str(STATS_RULER);
            out.push('\n');
            out.push_str(&format!("Input file name        = {}\n", stats.input_file));
            out.push_str(&stat_line(
                "Instructions executed ",
                stats.instructions_executed,
            ));
            out.push_str(&stat_line("Program size          ", u64::from(stats.program_size)));
            out.push_str(&stat_line("Max stack size        ", u64::from(stats.max_stack)));
            out.push_str(&stat_line("Load point            ", u64::from(stats.load_point)));
        }

        out
    }
}

fn stat_line(name: &str, value: u64) -> String {
    format!("{} = {:x} (hex)    {} (dec)\n", name, value, value)
}

fn render_line(out: &mut String, line: &ListingLine, binary: bool, width: usize) {
    let source = line.source.as_deref();

    if line.words.is_empty() {
        match source {
            Some(text) if !text.trim().is_empty() => {
                out.push_str(&format!("{:pad$}{}\n", "", text, pad = 6 + width + 2));
            }
            Some(_) => out.push('\n'),
            None => {}
        }
        return;
    }

    let base = line.loc.unwrap_or(0);
    for (i, &word) in line.words.iter().enumerate() {
        let loc = base.wrapping_add(i as u16);
        let code = format_word(word, binary);
        match source {
            // source sits on the first row of its line
            Some(text) if i == 0 && !text.is_empty() => {
                out.push_str(&format!(
                    "{:04x}  {:<width$}  {}\n",
                    loc,
                    code,
                    text,
                    width = width
                ));
            }
            _ => out.push_str(&format!("{:04x}  {}\n", loc, code)),
        }
    }
}

/// `1234` in `.lst`, `0001 0010 0011 0100` in `.bst`.
pub fn format_word(word: u16, binary: bool) -> String {
    if binary {
        let digits = format!("{:016b}", word);
        let mut grouped = String::with_capacity(19);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        grouped
    } else {
        format!("{:04x}", word)
    }
}
