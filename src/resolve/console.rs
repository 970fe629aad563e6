//! Line-based operator prompts.
//!
//! [`Console`] reads answers one line at a time from any [`BufRead`] and
//! writes prompts to any [`Write`], so the whole interactive session can be
//! driven from a byte buffer in tests. Colors come from `yansi` and are
//! switched off globally by the binary when output is not a terminal.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use yansi::Paint;

use super::engine::Operator;
use crate::actions::delete::{DeleteError, DeleteResult};
use crate::error::{parse_threshold, InputError};
use crate::matching::PairCandidate;
use crate::store::Preferences;

const RULE: &str = "----------------------------------------";

/// Choice made at the start-of-session menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Start scanning (empty answer).
    Scan,
    /// Change the similarity threshold (`st`).
    ChangeThreshold,
    /// Change the music folder (`mf`).
    ChangeFolder,
}

impl MenuChoice {
    /// Accepted answers, for prompts and error messages.
    pub const CHOICES: &'static str = "Enter, 'st' or 'mf'";

    /// Parse a menu answer. Surrounding whitespace and case are ignored.
    ///
    /// # Errors
    ///
    /// [`InputError::InvalidChoice`] for anything else.
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let answer = input.trim();
        match answer.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Scan),
            "st" => Ok(Self::ChangeThreshold),
            "mf" => Ok(Self::ChangeFolder),
            _ => Err(InputError::InvalidChoice {
                input: answer.to_string(),
                expected: Self::CHOICES,
            }),
        }
    }
}

/// Interactive prompts over a reader and a writer.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, for inspecting output in tests.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line. `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced, so such an answer is rejected
    /// like any other unrecognized one.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt.bold())?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&line);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print a plain line.
    ///
    /// # Errors
    ///
    /// Fails if the writer does.
    pub fn line(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Report an unusable answer.
    ///
    /// # Errors
    ///
    /// Fails if the writer does.
    pub fn warn(&mut self, error: &InputError) -> io::Result<()> {
        writeln!(self.output, "{} {}", "Invalid input:".yellow().bold(), error)
    }

    /// Show the current preferences and ask what to do.
    /// Re-prompts until the answer is valid; `None` at end of input.
    ///
    /// # Errors
    ///
    /// Fails if reading or writing fails.
    pub fn menu(&mut self, prefs: &Preferences) -> io::Result<Option<MenuChoice>> {
        writeln!(
            self.output,
            "Current similarity threshold: {}",
            format!("{}%", prefs.similarity_threshold).cyan()
        )?;
        writeln!(
            self.output,
            "Current music folder to scan: {}",
            prefs.music_folder.display().cyan()
        )?;

        loop {
            let Some(answer) =
                self.ask("Enter: start scan / st: change similarity threshold / mf: change music folder: ")?
            else {
                return Ok(None);
            };
            match MenuChoice::parse(&answer) {
                Ok(choice) => return Ok(Some(choice)),
                Err(e) => self.warn(&e)?,
            }
        }
    }

    /// Ask for a new threshold until a valid one is given.
    /// `None` at end of input.
    ///
    /// # Errors
    ///
    /// Fails if reading or writing fails.
    pub fn prompt_threshold(&mut self) -> io::Result<Option<u8>> {
        loop {
            let Some(answer) = self.ask("Enter the new similarity threshold (0-100): ")? else {
                return Ok(None);
            };
            match parse_threshold(&answer) {
                Ok(threshold) => return Ok(Some(threshold)),
                Err(e) => self.warn(&e)?,
            }
        }
    }

    /// Ask for a new music folder. The answer is not validated here.
    /// `None` at end of input or for an empty answer.
    ///
    /// # Errors
    ///
    /// Fails if reading or writing fails.
    pub fn prompt_folder(&mut self) -> io::Result<Option<PathBuf>> {
        Ok(self
            .ask("Enter the new music folder path: ")?
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .map(PathBuf::from))
    }

    /// Ask a yes/no question until answered. End of input counts as no.
    ///
    /// # Errors
    ///
    /// Fails if reading or writing fails.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let prompt = format!("{} (y/n): ", question);
        loop {
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(false);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                other => self.warn(&InputError::InvalidChoice {
                    input: other.to_string(),
                    expected: "'y' or 'n'",
                })?,
            }
        }
    }

    /// List directories flagged for cleanup.
    ///
    /// # Errors
    ///
    /// Fails if the writer does.
    pub fn show_empty_dirs(&mut self, dirs: &[PathBuf]) -> io::Result<()> {
        writeln!(self.output, "\nThe following empty folders were found:")?;
        for dir in dirs {
            writeln!(self.output, "  {}", dir.display())?;
        }
        Ok(())
    }

    fn file_line(&mut self, label: &str, path: &Path, size: u64) -> io::Result<()> {
        writeln!(
            self.output,
            "{} {} {}",
            label.bold(),
            path.display(),
            format!("({})", ByteSize::b(size)).dim()
        )
    }
}

impl<R: BufRead, W: Write> Operator for Console<R, W> {
    fn present(
        &mut self,
        position: usize,
        total: usize,
        candidate: &PairCandidate,
    ) -> io::Result<()> {
        writeln!(self.output, "{}", RULE.dim())?;
        writeln!(self.output, "Pair {} of {}", position + 1, total)?;
        self.file_line("File 1:", &candidate.first.path, candidate.first.size)?;
        self.file_line("File 2:", &candidate.second.path, candidate.second.size)?;
        writeln!(
            self.output,
            "{} {}",
            "Similarity:".bold(),
            format!("{}%", candidate.score).cyan()
        )
    }

    fn read_decision(&mut self) -> io::Result<Option<String>> {
        self.ask("Choose action (1=delete file 1, 2=delete file 2, n/Enter=keep both, s=stop): ")
    }

    fn reject(&mut self, error: &InputError) -> io::Result<()> {
        self.warn(error)
    }

    fn deleted(&mut self, result: &DeleteResult) -> io::Result<()> {
        let label = if result.permanent {
            "Deleted:"
        } else {
            "Moved to trash:"
        };
        writeln!(
            self.output,
            "{} {} ({})",
            label.green(),
            result.path.display(),
            ByteSize::b(result.size)
        )
    }

    fn failed(&mut self, error: &DeleteError) -> io::Result<()> {
        writeln!(
            self.output,
            "{} {} (pair kept for the next scan)",
            "Could not delete:".red().bold(),
            error
        )
    }
}
