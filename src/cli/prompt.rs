//! Terminal scope selection
//!
//! Lists the catalog and reads the operator's choice from a line-oriented
//! input. A token or a distinguished path is accepted; an empty line or `q`
//! cancels the run.

use crate::core::scope::{ScopeCatalog, ScopeSelector, Selection};
use crate::domain::{MailshiftError, Result};
use std::io::{self, BufRead, Write};

/// Prompting selector over any reader/writer pair
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on stdout and reads from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    /// Creates a selector over `input` and `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, catalog: &ScopeCatalog, rejected: Option<&str>) -> io::Result<()> {
        if let Some(candidate) = rejected {
            writeln!(
                self.output,
                "Search scope '{candidate}' was not found in the directory."
            )?;
        }
        writeln!(self.output, "Available organizational scopes:")?;
        for scope in catalog.iter() {
            writeln!(self.output, "  [{}] {}", scope.token(), scope)?;
        }
        write!(
            self.output,
            "Select a scope by number or distinguished name (empty or 'q' to cancel): "
        )?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> ScopeSelector for PromptSelector<R, W> {
    fn select(&mut self, catalog: &ScopeCatalog, rejected: Option<&str>) -> Result<Selection> {
        self.show(catalog, rejected)
            .map_err(|e| MailshiftError::Io(format!("cannot write prompt: {e}")))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| MailshiftError::Io(format!("cannot read scope selection: {e}")))?;

        let answer = line.trim();
        if read == 0 || answer.is_empty() || answer.eq_ignore_ascii_case("q") {
            return Ok(Selection::Cancelled);
        }
        Ok(Selection::Candidate(answer.to_string()))
    }
}
