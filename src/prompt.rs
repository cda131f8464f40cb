//! Operator interaction.
//!
//! Interactive commands talk to the operator through a [`Prompter`] so the
//! same decision logic can be driven by a terminal or by a scripted list of
//! answers in tests.

use crate::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented operator interaction.
pub trait Prompter {
    /// Show `question` and wait for one line of input.
    ///
    /// Returns `None` at end of input. The returned line has its trailing
    /// newline removed.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Show informational text (followed by a newline).
    fn say(&mut self, text: &str) -> Result<()>;
}

/// Prompter over any reader/writer pair.
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<W: Write> StdioPrompter<io::StdinLock<'static>, W> {
    /// Prompter reading the process's stdin and writing to `output`.
    pub fn stdin(output: W) -> Self {
        Self {
            input: io::stdin().lock(),
            output,
        }
    }
}

/// Where interactive text goes: stdout for human output, stderr when stdout
/// carries JSON results.
pub fn interaction_writer(human: bool) -> Box<dyn Write> {
    if human {
        Box::new(io::stdout())
    } else {
        Box::new(io::stderr())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

/// Prompter fed from a fixed list of answers, recording everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Questions asked, in order
    pub questions: Vec<String>,
    /// Informational text shown, in order
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
            transcript: Vec::new(),
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}

/// True for an affirmative answer (`y`, `yes`, any case).
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
