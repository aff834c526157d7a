use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::{
    AppError, AssumeYes, Confirmation, ConfirmationGate, LedgerSession, Outcome,
};
use crate::domain::{Field, ItemId, Mutation, compute_amount, format_grouped};
use crate::io::{
    ArtifactFormat, ExportNotice, Exporter, ShareTarget, finish_export, render_table, spawn_export,
};

const HELP: &str = "\
Commands:
  set <id> <field> <value>   Set item, bags, kgs or rs on a row
  add                        Append an empty row
  rm <id>                    Remove a row (asks first)
  reset                      Reload the default rows (asks first)
  show                       Print the table
  amount <kgs> <rs>          Preview an amount without changing the table
  heading <text>             Change the heading
  export [table|csv|json]    Export the table in the background
  help                       Show this list
  quit                       Leave";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Set {
        id: ItemId,
        field: Field,
        value: String,
    },
    Add,
    Remove(ItemId),
    Reset,
    Show,
    Amount {
        kgs: String,
        rs: String,
    },
    Heading(String),
    Export(Option<ArtifactFormat>),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse a line. Blank lines yield `Ok(None)`.
    ///
    /// For `set` everything after the field name is the value, spaces
    /// included, and it may be empty to clear the cell.
    pub fn parse(line: &str) -> Result<Option<Self>, AppError> {
        let (word, rest) = split_word(line.trim());
        let command = match word.to_lowercase().as_str() {
            "" => return Ok(None),
            "set" => {
                let (id, rest) = split_word(rest);
                let id = parse_id("set", id)?;
                let (field, value) = split_word(rest);
                if field.is_empty() {
                    return Err(AppError::MissingArgument {
                        command: "set",
                        argument: "field",
                    });
                }
                let field =
                    Field::from_str(field).ok_or_else(|| AppError::UnknownField(field.into()))?;
                ConsoleCommand::Set {
                    id,
                    field,
                    value: value.to_string(),
                }
            }
            "add" => ConsoleCommand::Add,
            "rm" | "remove" | "delete" => ConsoleCommand::Remove(parse_id("rm", rest)?),
            "reset" => ConsoleCommand::Reset,
            "show" | "ls" => ConsoleCommand::Show,
            "amount" => {
                let (kgs, rest) = split_word(rest);
                let (rs, _) = split_word(rest);
                ConsoleCommand::Amount {
                    kgs: kgs.to_string(),
                    rs: rs.to_string(),
                }
            }
            "heading" => ConsoleCommand::Heading(rest.to_string()),
            "export" => {
                let format = match rest {
                    "" => None,
                    name => Some(ArtifactFormat::parse(name)?),
                };
                ConsoleCommand::Export(format)
            }
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            other => return Err(AppError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn parse_id(command: &'static str, text: &str) -> Result<ItemId, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::MissingArgument {
            command,
            argument: "id",
        });
    }
    text.parse()
        .map_err(|_| AppError::InvalidRowId(text.to_string()))
}

/// Yes/no prompt on the console's own input and output.
struct Prompt<'a, R, W> {
    reader: &'a mut R,
    writer: &'a mut W,
}

impl<R: BufRead, W: Write> ConfirmationGate for Prompt<'_, R, W> {
    fn request_confirmation(&mut self, request: &Confirmation) -> bool {
        let asked = write!(
            self.writer,
            "{}: {} [y/N] ",
            request.title, request.message
        )
        .and_then(|()| self.writer.flush());
        if let Err(err) = asked {
            tracing::warn!(error = %err, "could not show confirmation prompt");
            return false;
        }

        let mut answer = String::new();
        match self.reader.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => {
                let answer = answer.trim();
                answer.eq_ignore_ascii_case("y")
                    || answer.eq_ignore_ascii_case("yes")
                    || answer.eq_ignore_ascii_case(request.confirm_label)
            }
        }
    }
}

/// Line-oriented editor over a sheet session.
///
/// Every applied change prints the whole table again. Exports run in the
/// background; their notices are printed before the next prompt.
pub struct Console<R, W> {
    reader: R,
    writer: W,
    session: LedgerSession,
    exporter: Exporter,
    share: Option<Arc<dyn ShareTarget>>,
    assume_yes: bool,
    pending: Vec<JoinHandle<ExportNotice>>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W, session: LedgerSession, exporter: Exporter) -> Self {
        Self {
            reader,
            writer,
            session,
            exporter,
            share: None,
            assume_yes: false,
            pending: Vec::new(),
        }
    }

    pub fn with_share(mut self, share: Option<Arc<dyn ShareTarget>>) -> Self {
        self.share = share;
        self
    }

    /// Skip confirmation prompts for destructive commands.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Read commands until `quit` or end of input, then wait for any
    /// exports still running. Returns the final session.
    pub async fn run(mut self) -> Result<LedgerSession> {
        self.print_table()?;

        loop {
            self.report_finished_exports().await?;

            write!(self.writer, "> ")?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                writeln!(self.writer)?;
                break;
            }

            match ConsoleCommand::parse(&line) {
                Ok(None) => continue,
                Ok(Some(ConsoleCommand::Quit)) => break,
                Ok(Some(command)) => self.execute(command)?,
                Err(err) => writeln!(self.writer, "{err}")?,
            }
        }

        for handle in std::mem::take(&mut self.pending) {
            let notice = finish_export(handle).await;
            writeln!(self.writer, "{notice}")?;
        }
        self.writer.flush()?;

        Ok(self.session)
    }

    fn execute(&mut self, command: ConsoleCommand) -> Result<()> {
        match command {
            ConsoleCommand::Set { id, field, value } => {
                if !self.session.ledger().contains(id) {
                    writeln!(self.writer, "No row with id {id}")?;
                    return Ok(());
                }
                self.dispatch(Mutation::SetField { id, field, value })?;
            }
            ConsoleCommand::Add => self.dispatch(Mutation::AddRow)?,
            ConsoleCommand::Remove(id) => self.dispatch(Mutation::RemoveRow(id))?,
            ConsoleCommand::Reset => self.dispatch(Mutation::Reset)?,
            ConsoleCommand::Show => self.print_table()?,
            ConsoleCommand::Amount { kgs, rs } => {
                writeln!(self.writer, "{}", format_grouped(compute_amount(&kgs, &rs)))?;
            }
            ConsoleCommand::Heading(heading) => {
                self.session.set_heading(heading);
                self.print_table()?;
            }
            ConsoleCommand::Export(format) => {
                let exporter = match format {
                    Some(format) => Exporter::new(self.exporter.out_dir(), format),
                    None => self.exporter.clone(),
                };
                let handle = spawn_export(exporter, self.share.clone(), self.session.snapshot());
                self.pending.push(handle);
                writeln!(self.writer, "Export started")?;
            }
            ConsoleCommand::Help => writeln!(self.writer, "{HELP}")?,
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }

    fn dispatch(&mut self, mutation: Mutation) -> Result<()> {
        let outcome = if self.assume_yes {
            self.session.dispatch(mutation, &mut AssumeYes)
        } else {
            let mut prompt = Prompt {
                reader: &mut self.reader,
                writer: &mut self.writer,
            };
            self.session.dispatch(mutation, &mut prompt)
        };

        match outcome {
            Outcome::Applied(snapshot) => render_table(&snapshot, &mut self.writer)?,
            Outcome::Cancelled => writeln!(self.writer, "Cancelled")?,
        }
        Ok(())
    }

    fn print_table(&mut self) -> Result<()> {
        render_table(&self.session.snapshot(), &mut self.writer)
    }

    async fn report_finished_exports(&mut self) -> Result<()> {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|handle| handle.is_finished());
        self.pending = running;

        for handle in finished {
            let notice = finish_export(handle).await;
            writeln!(self.writer, "{notice}")?;
        }
        Ok(())
    }
}
