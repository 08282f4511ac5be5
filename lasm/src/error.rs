use std::fmt;
use std::io;
use std::path::PathBuf;

/// One source diagnostic, reported with its line context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub file: String,
    pub line: u32,
    pub text: String,
    pub message: String,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line == 0 {
            // file-level diagnostics have no line context
            write!(f, "{}: {}", self.file, self.message)
        } else {
            write!(
                f,
                "line {} of {}\n{}\n{}",
                self.line, self.file, self.text, self.message
            )
        }
    }
}

/// A non-fatal diagnostic (the assembler only warns, never stops, for
/// conditions the hardware silently tolerates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug)]
pub enum Error {
    Io(io::Error, PathBuf),
    /// One or more source diagnostics; the first aborted the run unless the
    /// keep-going policy was selected.
    Source(Vec<SourceError>),
    /// `.ap` sources belong to the extended assembler.
    ExtendedSource(PathBuf),
    UnsupportedFileType(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err, path) => write!(f, "{}: {}", path.display(), err),
            Error::Source(errors) => {
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            Error::ExtendedSource(path) => write!(
                f,
                "{}: .ap source requires the extended assembler",
                path.display()
            ),
            Error::UnsupportedFileType(path) => {
                write!(f, "{}: Unsupported file type", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn single(file: &str, line: u32, text: &str, message: String) -> Error {
        Error::Source(vec![SourceError {
            file: file.to_string(),
            line,
            text: text.to_string(),
            message,
        }])
    }
}
