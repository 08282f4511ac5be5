use std::io;
use std::io::prelude::*;

/// I/O endpoint of the trap handlers.
///
/// Owns a boxed reader and writer so the machine can run against stdin and
/// stdout, against canned buffers in tests, or against any other sink.
/// Everything written is also captured for the listing's output section.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    captured: String,
}

impl Console {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Console {
        Console {
            input,
            output,
            captured: String::new(),
        }
    }

    /// Interactive console on the process's standard streams.
    pub fn stdio() -> Console {
        Console::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Console fed from a canned input buffer, discarding writes.
    pub fn canned(input: &str) -> Console {
        Console::new(
            Box::new(io::Cursor::new(input.to_string().into_bytes())),
            Box::new(io::sink()),
        )
    }

    /// Everything the program has written so far.
    pub fn captured(&self) -> &str {
        &self.captured
    }

    pub fn into_captured(self) -> String {
        self.captured
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        self.captured.push_str(text);
        Ok(())
    }

    /// Reads one line, without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Reads a single byte. `None` at end of input.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = {
            let buf = self.input.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            buf[0]
        };
        self.input.consume(1);
        Ok(Some(byte))
    }
}

impl Default for Console {
    fn default() -> Console {
        Console::canned("")
    }
}
