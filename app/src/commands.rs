//! FILENAME: app/src/commands.rs
// PURPOSE: Parses one line of user input into a `Command`.
// CONTEXT: Tokens are whitespace separated; double quotes group a token that
// contains spaces. List arguments (filter values, pivot columns) are comma
// separated.

use persistence::ExportFormat;
use std::path::PathBuf;
use thiserror::Error;
use view_engine::FilterSpec;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the first `n` displayed rows (page size when omitted).
    Show(Option<usize>),
    Columns,
    Values(String),
    Filter(FilterSpec),
    Clear,
    Sort(String),
    Move { column: String, position: usize },
    Pivot { group_by: Vec<String>, aggregate_columns: Vec<String> },
    Unpivot,
    Chart { x: String, y: String, y2: Option<String> },
    Export { format: ExportFormat, path: PathBuf },
    Report,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error("unknown export format '{0}' (csv or xlsx)")]
    Format(String),
}

pub const HELP: &str = "\
commands:
  show [n]                               print the displayed rows
  columns                                list columns in display order
  values <col>                           distinct values of a column
  filter <col> include|exclude <v1,v2>   keep / drop rows by value
  filter <col> contains <text>           keep rows containing text
  clear                                  remove the filter
  sort <col>                             sort (again to reverse)
  move <col> <pos>                       move a column to position 1..n
  pivot <g1,g2> <a1,a2>                  group by columns, sum others
  unpivot                                back to the loaded data
  chart <x> <y1> [y2]                    print chart series
  export [csv|xlsx] <path>               save the displayed rows
  report                                 fetch results per symbol
  help                                   this text
  quit                                   leave";

/// Parses a line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };
    if name.starts_with('#') {
        return Ok(None);
    }

    let command = match name.to_lowercase().as_str() {
        "show" => match args {
            [] => Command::Show(None),
            [n] => Command::Show(Some(number(n)?)),
            _ => return Err(CommandError::Usage("show [n]")),
        },
        "columns" => Command::Columns,
        "values" => match args {
            [column] => Command::Values(column.clone()),
            _ => return Err(CommandError::Usage("values <col>")),
        },
        "filter" => parse_filter(args)?,
        "clear" => Command::Clear,
        "sort" => match args {
            [column] => Command::Sort(column.clone()),
            _ => return Err(CommandError::Usage("sort <col>")),
        },
        "move" => match args {
            [column, position] => Command::Move {
                column: column.clone(),
                position: number(position)?,
            },
            _ => return Err(CommandError::Usage("move <col> <pos>")),
        },
        "pivot" => match args {
            [group_by, aggregate] => Command::Pivot {
                group_by: list(group_by),
                aggregate_columns: list(aggregate),
            },
            _ => return Err(CommandError::Usage("pivot <g1,g2> <a1,a2>")),
        },
        "unpivot" => Command::Unpivot,
        "chart" => match args {
            [x, y] => Command::Chart {
                x: x.clone(),
                y: y.clone(),
                y2: None,
            },
            [x, y, y2] => Command::Chart {
                x: x.clone(),
                y: y.clone(),
                y2: Some(y2.clone()),
            },
            _ => return Err(CommandError::Usage("chart <x> <y1> [y2]")),
        },
        "export" => match args {
            [path] => {
                let path = PathBuf::from(path);
                let format = ExportFormat::from_path(&path)
                    .ok_or_else(|| CommandError::Format(path.display().to_string()))?;
                Command::Export { format, path }
            }
            [format, path] => {
                let format: ExportFormat = format
                    .parse()
                    .map_err(|_| CommandError::Format(format.clone()))?;
                let mut path = PathBuf::from(path);
                if path.extension().is_none() {
                    path.set_extension(format.extension());
                }
                Command::Export { format, path }
            }
            _ => return Err(CommandError::Usage("export [csv|xlsx] <path>")),
        },
        "report" => Command::Report,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_filter(args: &[String]) -> Result<Command, CommandError> {
    const USAGE: &str = "filter <col> include|exclude <v1,v2> | filter <col> contains <text>";
    let [column, mode, rest @ ..] = args else {
        return Err(CommandError::Usage(USAGE));
    };
    if rest.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }
    let joined = rest.join(" ");

    let spec = match mode.to_lowercase().as_str() {
        "include" => FilterSpec::include(column, list(&joined)),
        "exclude" => FilterSpec::exclude(column, list(&joined)),
        "contains" => FilterSpec::contains(column, &joined),
        _ => return Err(CommandError::Usage(USAGE)),
    };
    Ok(Command::Filter(spec))
}

/// Comma-separated list, trimmed, empty items dropped.
fn list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn number(raw: &str) -> Result<usize, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.trim().chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}
