//! Interactive numbered menu.
//!
//! Reads one command per line, runs it against the workflow and keeps going
//! until `0` or end of input. Workflow failures are printed and never end
//! the loop.

use colored::Colorize;
use qsearch_core::{SearchResult, Session, Workflow};
use std::io::{self, BufRead, Write};

pub const HELP: &str = "Commands:
0 - Exit
1 - Check basic information
2 - Change limit answer
3 - Change collection name
4 - Upload data to qdrant vector database
5 - Search qdrant vector database
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    ShowInfo,
    SetLimit,
    SetCollection,
    Upload,
    Ask,
    Help,
}

impl Command {
    /// Maps a menu line to a command. Anything unknown asks for help.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "0" => Command::Exit,
            "1" => Command::ShowInfo,
            "2" => Command::SetLimit,
            "3" => Command::SetCollection,
            "4" => Command::Upload,
            "5" => Command::Ask,
            _ => Command::Help,
        }
    }
}

pub struct Menu<R, W> {
    workflow: Workflow,
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(workflow: Workflow, session: Session, input: R, output: W) -> Self {
        Self {
            workflow,
            session,
            input,
            output,
        }
    }

    /// Runs the loop and returns the session as it was when the user left.
    pub async fn run(mut self) -> io::Result<Session> {
        writeln!(self.output, "{}", "Question search program".bold().green())?;
        writeln!(self.output, "{}", HELP)?;

        loop {
            let Some(line) = self.prompt("Enter command:")? else {
                break;
            };

            match Command::parse(&line) {
                Command::Exit => break,
                Command::ShowInfo => self.show_info()?,
                Command::SetLimit => self.set_limit()?,
                Command::SetCollection => self.set_collection()?,
                Command::Upload => self.upload().await?,
                Command::Ask => self.ask().await?,
                Command::Help => writeln!(self.output, "{}", HELP)?,
            }
        }

        Ok(self.session)
    }

    /// Prints `text` and reads one line. `None` means end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show_info(&mut self) -> io::Result<()> {
        writeln!(self.output, "Collection name: {}", self.session.collection_name().cyan())?;
        writeln!(self.output, "Limit answer: {}", self.session.answer_limit())
    }

    fn set_limit(&mut self) -> io::Result<()> {
        let Some(input) = self.prompt("Provide answer limit:")? else {
            return Ok(());
        };

        match self.session.with_answer_limit_input(&input) {
            Ok(session) => self.session = session,
            Err(e) => writeln!(self.output, "{} {}", "Error:".red().bold(), e)?,
        }
        Ok(())
    }

    fn set_collection(&mut self) -> io::Result<()> {
        let Some(input) = self.prompt("Provide collection name:")? else {
            return Ok(());
        };

        match self.session.with_collection_name_input(&input) {
            Ok(session) => self.session = session,
            Err(e) => writeln!(self.output, "{} {}", "Error:".red().bold(), e)?,
        }
        Ok(())
    }

    async fn upload(&mut self) -> io::Result<()> {
        match self.workflow.upload(&self.session).await {
            Ok(report) => writeln!(
                self.output,
                "{} Data upsert to qdrant vector database successfully. ({} records in '{}')",
                "✓".green().bold(),
                report.uploaded,
                report.collection
            ),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "Upload failed");
                writeln!(self.output, "{} {}", "Error:".red().bold(), e)
            }
        }
    }

    async fn ask(&mut self) -> io::Result<()> {
        let Some(question) = self.prompt("Write what do you want to know:")? else {
            return Ok(());
        };

        match self.workflow.ask(&self.session, &question).await {
            Ok(results) => self.print_answers(&results),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "Search failed");
                writeln!(self.output, "{} {}", "Error:".red().bold(), e)
            }
        }
    }

    fn print_answers(&mut self, results: &[SearchResult]) -> io::Result<()> {
        if results.is_empty() {
            return writeln!(self.output, "{}", "No answers found.".yellow());
        }

        for (index, answer) in results.iter().enumerate() {
            writeln!(
                self.output,
                "{}",
                format!("Answer {}:", index + 1).as_str().bold()
            )?;
            tracing::debug!(score = answer.score, "Answer score");
            for (key, value) in answer.record.iter() {
                writeln!(self.output, "{}: {}", key, value)?;
            }
            writeln!(self.output)?;
        }
        Ok(())
    }
}
