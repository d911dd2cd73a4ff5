//! Interactive editing session
//!
//! A line-oriented front end over [`SubmissionFlow`]: each input line is
//! one command, and the affected record is re-rendered after every edit.

use anyhow::{Context, Result};
use common::RecordField;
use market_data::{save_batch, MarketDataError, StoreChange, SubmissionFlow};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  show                       list every record with its errors
  add                        append a new record
  remove <i>                 remove record <i> (the last record is kept)
  set <i> <field> <value>    set a field, e.g. set 0 providerCode SAPTHR
  errors                     list validation errors only
  submit                     validate all records and submit the batch
  save <path>                write the records to a .json or .yaml file
  help                       show this help
  quit                       leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Show,
    Add,
    Remove(usize),
    Set {
        index: usize,
        field: RecordField,
        value: String,
    },
    Errors,
    Submit,
    Save(PathBuf),
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let command = match cmd.to_lowercase().as_str() {
            "show" | "ls" => SessionCommand::Show,
            "add" => SessionCommand::Add,
            "remove" | "rm" => SessionCommand::Remove(parse_index(rest)?),
            "set" => parse_set(rest)?,
            "errors" => SessionCommand::Errors,
            "submit" => SessionCommand::Submit,
            "save" => {
                if rest.is_empty() {
                    return Err("usage: save <path>".to_string());
                }
                SessionCommand::Save(PathBuf::from(rest))
            }
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("unknown command '{}', type 'help'", other)),
        };
        Ok(Some(command))
    }
}

fn parse_index(s: &str) -> std::result::Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("expected a record index, got '{}'", s))
}

fn parse_set(rest: &str) -> std::result::Result<SessionCommand, String> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(index), Some(field)) = (parts.next(), parts.next()) else {
        return Err("usage: set <i> <field> <value>".to_string());
    };
    let index = parse_index(index)?;
    let field = field.parse::<RecordField>().map_err(|e| e.to_string())?;

    let value = parts.next().unwrap_or("").trim();
    // `""` clears a field
    let value = if value == "\"\"" { "" } else { value };

    Ok(SessionCommand::Set {
        index,
        field,
        value: value.to_string(),
    })
}

/// Run the session until `quit` or end of input
pub async fn run_session<R, W>(flow: &mut SubmissionFlow, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "Type 'help' for commands.")?;
    render_all(flow, out)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
        };
        debug!(?command, "Session command");

        if command == SessionCommand::Quit {
            break;
        }
        execute(flow, command, out).await?;
    }

    Ok(())
}

async fn execute<W: Write>(flow: &mut SubmissionFlow, command: SessionCommand, out: &mut W) -> Result<()> {
    match command {
        SessionCommand::Show => render_all(flow, out)?,
        SessionCommand::Errors => render_errors(flow, out)?,
        SessionCommand::Help => writeln!(out, "{}", HELP)?,
        SessionCommand::Add => {
            if let StoreChange::Added { index } = flow.add_record() {
                writeln!(out, "added record {}", index)?;
                render_record(flow, index, out)?;
            }
        }
        SessionCommand::Remove(index) => match flow.remove_record(index) {
            Ok(StoreChange::Unchanged) => writeln!(out, "at least one record must remain")?,
            Ok(_) => writeln!(out, "removed record {} ({} left)", index, flow.records().len())?,
            Err(e) => writeln!(out, "error: {}", e)?,
        },
        SessionCommand::Set { index, field, value } => {
            match flow.update_field(index, field, &value) {
                Ok(_) => render_record(flow, index, out)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            }
        }
        SessionCommand::Submit => submit(flow, out).await?,
        SessionCommand::Save(path) => match save_batch(&path, flow.records()) {
            Ok(()) => writeln!(out, "saved {} record(s) to {:?}", flow.records().len(), path)?,
            Err(e) => writeln!(out, "error: {}", e)?,
        },
        SessionCommand::Quit => {}
    }
    Ok(())
}

async fn submit<W: Write>(flow: &mut SubmissionFlow, out: &mut W) -> Result<()> {
    match flow.submit().await {
        Ok(body) => {
            if let Some(notice) = flow.last_notice() {
                writeln!(out, "{}", notice.message)?;
            }
            if !body.is_null() {
                writeln!(out, "response: {}", body)?;
            }
        }
        Err(MarketDataError::Validation { invalid_records }) => {
            writeln!(out, "fix the errors in record(s) {:?} and submit again", invalid_records)?;
            render_errors(flow, out)?;
        }
        Err(e) => {
            if let Some(notice) = flow.last_notice() {
                writeln!(out, "{}", notice.message)?;
            }
            writeln!(out, "cause: {}", e)?;
        }
    }
    Ok(())
}

pub fn render_all<W: Write>(flow: &SubmissionFlow, out: &mut W) -> Result<()> {
    for index in 0..flow.records().len() {
        render_record(flow, index, out)?;
    }
    Ok(())
}

fn render_record<W: Write>(flow: &SubmissionFlow, index: usize, out: &mut W) -> Result<()> {
    let store = flow.store();
    let (Some(record), Some(errors)) = (store.record(index), store.errors_for(index)) else {
        return Ok(());
    };

    writeln!(out, "[{}]", index)?;
    for field in RecordField::ALL {
        let marker = if errors.contains(field) { "!" } else { " " };
        writeln!(out, " {} {:<27} {}", marker, field.name(), record.get(field))?;
    }
    for (field, message) in errors.iter() {
        writeln!(out, "   ! {}: {}", field, message)?;
    }
    Ok(())
}

fn render_errors<W: Write>(flow: &SubmissionFlow, out: &mut W) -> Result<()> {
    let store = flow.store();
    let invalid = store.invalid_indices();
    if invalid.is_empty() {
        writeln!(out, "no validation errors")?;
        return Ok(());
    }
    for index in invalid {
        if let Some(errors) = store.errors_for(index) {
            for (field, message) in errors.iter() {
                writeln!(out, "[{}] {}: {}", index, field, message)?;
            }
        }
    }
    Ok(())
}
