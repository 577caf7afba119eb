//! Interactive prompt for values not supplied on the command line.
//!
//! Asks, in order, for the source directory, the quality percent and the
//! maximum width, printing the same banner and questions as the classic
//! console tool. Answers go through the same strict parsers as CLI flags.
//!
//! The prompter is generic over its reader and writer so tests can drive it
//! with in-memory buffers.

use crate::config::{self, ConfigError, DEFAULT_MAX_WIDTH, Settings};
use crate::imaging::Quality;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WELCOME: &str = "Welcome to Image compress and resize app";
pub const ASK_SOURCE: &str = "Enter source path for your images (for current path enter .)";
pub const ASK_QUALITY: &str = "Enter Quality Percent";
pub const ASK_MAX_WIDTH: &str = "Enter image max width";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No answer given to \"{0}\"")]
    Eof(&'static str),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Values collected from the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub source_dir: PathBuf,
    /// `None` when quality was not asked for.
    pub quality: Option<Quality>,
    /// `None` when max width was not asked for.
    pub max_width: Option<u32>,
}

impl Answers {
    /// Prompt answers win over every other source.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(quality) = self.quality {
            settings.output.quality = quality.value();
        }
        if let Some(max_width) = self.max_width {
            settings.output.max_width = max_width;
        }
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line. `None` at end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for the source directory. `.` resolves to `cwd`.
    pub fn source_dir(&mut self, cwd: &Path) -> Result<PathBuf, PromptError> {
        writeln!(self.output, "{ASK_SOURCE}")?;
        let answer = self.ask("")?.ok_or(PromptError::Eof(ASK_SOURCE))?;
        Ok(config::resolve_source_dir(&answer, cwd)?)
    }

    pub fn quality(&mut self) -> Result<Quality, PromptError> {
        let answer = self.ask(ASK_QUALITY)?.ok_or(PromptError::Eof(ASK_QUALITY))?;
        Ok(config::parse_quality(&answer)?)
    }

    /// Ask for the maximum width. An empty answer or end of input means
    /// [`DEFAULT_MAX_WIDTH`]; anything else must be a positive integer.
    pub fn max_width(&mut self) -> Result<u32, PromptError> {
        match self.ask(ASK_MAX_WIDTH)? {
            None => Ok(DEFAULT_MAX_WIDTH),
            Some(answer) if answer.is_empty() => Ok(DEFAULT_MAX_WIDTH),
            Some(answer) => Ok(config::parse_max_width(&answer)?),
        }
    }

    /// Run the full interactive session: banner, source directory, then
    /// quality and max width when requested.
    pub fn collect(
        &mut self,
        cwd: &Path,
        ask_quality: bool,
        ask_max_width: bool,
    ) -> Result<Answers, PromptError> {
        writeln!(self.output, "{WELCOME}")?;
        let source_dir = self.source_dir(cwd)?;
        let quality = if ask_quality {
            Some(self.quality()?)
        } else {
            None
        };
        let max_width = if ask_max_width {
            Some(self.max_width()?)
        } else {
            None
        };
        Ok(Answers {
            source_dir,
            quality,
            max_width,
        })
    }
}
