use std::io::{self, Write};

use crate::frontend::decode::decode_number;
use crate::lang::header::Header;
use crate::lang::program::SourceLine;

/// Prints each program line with its classification (`--lines`).
pub struct LineDumper {
    pub color: bool,
    pub show_numbers: bool, // if true, data lines also show their base-4 value
}

impl Default for LineDumper {
    fn default() -> Self {
        Self {
            color: true,
            show_numbers: false,
        }
    }
}

impl LineDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.show_numbers = true;
        self
    }

    pub fn dump<W: Write>(&self, out: &mut W, lines: &[SourceLine]) -> io::Result<()> {
        for line in lines {
            self.write_one(out, line)?;
        }
        Ok(())
    }

    fn write_one<W: Write>(&self, out: &mut W, line: &SourceLine) -> io::Result<()> {
        let header = Header::classify(&line.text);
        let kind = header.map_or("data", Header::name);
        let colr = if self.color { Self::color(header) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };
        let text = line.text.trim();

        match (header, self.show_numbers) {
            (None, true) => match decode_number(text) {
                Ok(n) => writeln!(
                    out,
                    "[{:03}] {}{:<12} {} = {}{}",
                    line.number, colr, kind, text, n, reset
                ),
                Err(_) => writeln!(
                    out,
                    "[{:03}] {}{:<12} {}{}",
                    line.number, colr, kind, text, reset
                ),
            },
            _ => writeln!(
                out,
                "[{:03}] {}{:<12} {}{}",
                line.number, colr, kind, text, reset
            ),
        }
    }

    fn color(header: Option<Header>) -> &'static str {
        match header {
            None => Self::DIM,
            Some(Header::Print) => Self::GRN,
            Some(Header::Numbers | Header::Ascii) => Self::CYN,
            Some(Header::Loops) => Self::YEL,
            Some(Header::Comparison) => Self::MAG,
            Some(_) => Self::RESET,
        }
    }
}
