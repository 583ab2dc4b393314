use crate::{Result, Symbol, SymbolKind};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// Line-oriented symbols manifest scanner
///
/// Each line which starts with `function` or `data` keyword followed by
/// symbol name introduces a symbol. Any other lines are skipped.
pub struct SymbolLines<R> {
    lines: Lines<BufReader<R>>,
    line_no: usize,
}

impl<R: AsyncRead + Unpin> SymbolLines<R> {
    /// Start scanning manifest from reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_no: 0,
        }
    }

    /// Get next symbol from manifest
    pub async fn next_symbol(&mut self) -> Result<Option<Symbol>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;

            if let Some(symbol) = parse_line(&line, self.line_no) {
                return Ok(Some(symbol));
            }
        }

        Ok(None)
    }

    /// Get number of lines scanned so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

pub(crate) fn parse_line(line: &str, line_no: usize) -> Option<Symbol> {
    let mut tokens = line.split_whitespace();

    let kind = tokens.next().and_then(SymbolKind::from_keyword)?;

    if let Some(name) = tokens.next() {
        log::trace!("line {}: {} {}", line_no, kind, name);
        Some(Symbol::new(name, kind))
    } else {
        log::warn!("line {}: {} without symbol name", line_no, kind);
        None
    }
}
