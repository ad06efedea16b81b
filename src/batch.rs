use std::io;
use std::str::FromStr;

use crate::{Action, Amount, Command, Parameter};

/// Possible errors to occur while reading a command batch
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("The input ended before the {0} line")]
    MissingLine(&'static str),
    #[error("Line {line}: `{value}` is not a valid {what}")]
    InvalidNumber {
        line: u64,
        what: &'static str,
        value: String,
    },
    #[error("The input announced {expected} commands, but only holds {found}")]
    MissingCommands { expected: usize, found: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Everything needed to run one ATM session
///
/// The input is line based:
/// 1. the password
/// 2. the initial balance
/// 3. the number of commands that follow
/// 4. one `<action> <parameter>` command per line
///
/// Tokens are separated by spaces. Blank lines are skipped, and lines after
/// the announced number of commands are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    password: String,
    initial_balance: Amount,
    commands: Vec<Command>,
}

impl Batch {
    pub fn new(password: impl Into<String>, initial_balance: Amount, commands: Vec<Command>) -> Self {
        Self {
            password: password.into(),
            initial_balance,
            commands,
        }
    }

    /// Reads a batch from any input source
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, InputError> {
        let mut lines = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b' ')
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_records()
            .filter_map(|record| match record {
                Ok(record) => Line::new(&record).map(Ok),
                Err(e) => Some(Err(e)),
            });

        let password = next_line(&mut lines, "password")?.fields[0].to_owned();
        let initial_balance = next_line(&mut lines, "balance")?.value("balance")?;
        let count: usize = next_line(&mut lines, "command count")?.value("command count")?;

        // the count is untrusted, so it must not size any allocation
        let mut commands = Vec::new();
        for line in lines.take(count) {
            commands.push(line?.command()?);
        }
        if commands.len() < count {
            return Err(InputError::MissingCommands {
                expected: count,
                found: commands.len(),
            });
        }

        Ok(Self::new(password, initial_balance, commands))
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn initial_balance(&self) -> Amount {
        self.initial_balance
    }

    /// The commands in input order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

/// The raw shape of a command line
#[derive(Debug, serde::Deserialize)]
struct CommandRecord {
    action: String,
    #[serde(default)]
    parameter: Option<String>,
}

/// A non-blank input line, split into its tokens
struct Line {
    number: u64,
    fields: csv::StringRecord,
}

impl Line {
    fn new(record: &csv::StringRecord) -> Option<Self> {
        let fields = record
            .iter()
            .flat_map(str::split_whitespace)
            .collect::<csv::StringRecord>();
        if fields.is_empty() {
            return None;
        }

        Some(Self {
            number: record.position().map_or(0, csv::Position::line),
            fields,
        })
    }

    /// Parses the first token of the line
    fn value<T: FromStr>(&self, what: &'static str) -> Result<T, InputError> {
        parse(self.number, what, &self.fields[0])
    }

    fn command(&self) -> Result<Command, InputError> {
        let fields = self.fields.iter().take(2).collect::<csv::StringRecord>();
        let record: CommandRecord = fields.deserialize(None)?;

        let parameter = match (Action::from_name(&record.action), record.parameter) {
            (_, None) => Parameter::Missing,
            (Some(action), Some(value)) if action.takes_amount() => {
                Parameter::Amount(parse(self.number, "amount", &value)?)
            }
            (_, Some(value)) => Parameter::Text(value),
        };

        Ok(Command::new(record.action, parameter))
    }
}

fn next_line<I>(lines: &mut I, what: &'static str) -> Result<Line, InputError>
    where I: Iterator<Item = Result<Line, csv::Error>>
{
    Ok(lines.next().ok_or(InputError::MissingLine(what))??)
}

fn parse<T: FromStr>(line: u64, what: &'static str, value: &str) -> Result<T, InputError> {
    value.parse().map_err(|_| InputError::InvalidNumber {
        line,
        what,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_batch() {
        let input = "1234\n100\n4\nlogin 1234\ndeposit 50\nbalance\ntransfer 10\n";
        let batch = Batch::from_reader(input.as_bytes()).unwrap();

        assert_eq!(
            batch,
            Batch::new("1234", 100, vec![
                Command::new("login", "1234"),
                Command::new("deposit", Parameter::Amount(50)),
                Command::bare("balance"),
                Command::new("transfer", "10"),
            ]),
        );
    }

    #[test]
    fn tolerates_whitespace() {
        let input = "  pw  \n\n 5 \n 2\n   login    pw  extra\n\nwithdraw\t3\t\nlogout x\n";
        let batch = Batch::from_reader(input.as_bytes()).unwrap();

        assert_eq!(batch.password(), "pw");
        assert_eq!(batch.initial_balance(), 5);
        assert_eq!(
            batch.commands(),
            &[Command::new("login", "pw"), Command::new("withdraw", Parameter::Amount(3))],
        );
    }

    #[test]
    fn zero_commands() {
        let batch = Batch::from_reader("pw\n5\n0\n".as_bytes()).unwrap();
        assert!(batch.commands().is_empty());
    }

    #[test]
    fn rejects_missing_header() {
        let err = Batch::from_reader("pw\n".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingLine("balance")), "{:?}", err);

        let err = Batch::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::MissingLine("password")), "{:?}", err);
    }

    #[test]
    fn rejects_negative_balance() {
        let err = Batch::from_reader("pw\n-5\n0\n".as_bytes()).unwrap_err();
        assert!(
            matches!(err, InputError::InvalidNumber { line: 2, what: "balance", .. }),
            "{:?}",
            err,
        );
    }

    #[test]
    fn rejects_invalid_amount() {
        let err = Batch::from_reader("pw\n5\n2\nlogin pw\ndeposit lots\n".as_bytes()).unwrap_err();
        assert!(
            matches!(err, InputError::InvalidNumber { line: 5, what: "amount", .. }),
            "{:?}",
            err,
        );
    }

    #[test]
    fn rejects_short_batch() {
        let err = Batch::from_reader("pw\n5\n3\nlogin pw\n".as_bytes()).unwrap_err();
        assert!(
            matches!(err, InputError::MissingCommands { expected: 3, found: 1 }),
            "{:?}",
            err,
        );
    }
}
