use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line reader for the interactive prompt
pub struct Repl {
    lines: Lines<BufReader<Stdin>>,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next input line, or `None` at end of input
    pub async fn readline(&mut self) -> Result<Option<String>, String> {
        {
            let mut out = std::io::stdout().lock();
            write!(out, "> ").map_err(|e| e.to_string())?;
            out.flush().map_err(|e| e.to_string())?;
        }
        self.lines.next_line().await.map_err(|e| e.to_string())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
