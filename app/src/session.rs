//! FILENAME: app/src/session.rs
// PURPOSE: The interactive loop. Reads commands, drives the ViewEngine and
// prints results. A failed command prints an error and leaves the view as it
// was; only a broken output stream ends the session early.

use market_data::BatchReport;
use persistence::{export, PersistenceError};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use view_engine::{ViewEngine, ViewError};

use crate::commands::{parse_command, Command, CommandError, HELP};
use crate::table::render_table;
use crate::{log_debug, log_enter, log_error, log_exit, log_info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("export failed: {0}")]
    Export(#[from] PersistenceError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    engine: ViewEngine,
    report: BatchReport,
    out: W,
    page_size: usize,
}

impl<W: Write> Session<W> {
    pub fn new(engine: ViewEngine, report: BatchReport, out: W) -> Self {
        Session {
            engine,
            report,
            out,
            page_size: 20,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn engine(&self) -> &ViewEngine {
        &self.engine
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R, interactive: bool) -> io::Result<()> {
        log_enter!("SESSION", "run", "interactive={}", interactive);
        if interactive {
            writeln!(self.out, "{} rows loaded. Type 'help' for commands.", self.engine.displayed_len())?;
            self.prompt()?;
        }

        let mut executed = 0usize;
        for line in input.lines() {
            let line = line?;
            match self.run_line(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => executed += 1,
                Err(SessionError::Io(e)) => return Err(e),
                Err(e) => {
                    if let SessionError::Export(inner) = &e {
                        log_error!("CMD", "export failed: {}", inner);
                    }
                    writeln!(self.out, "error: {}", e)?
                }
            }
            if interactive {
                self.prompt()?;
            }
        }

        self.out.flush()?;
        log_exit!("SESSION", "run", "{} commands", executed);
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    pub fn run_line(&mut self, line: &str) -> Result<Flow, SessionError> {
        match parse_command(line)? {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        log_debug!("CMD", "{:?}", command);
        match command {
            Command::Show(n) => self.show(n.unwrap_or(self.page_size))?,
            Command::Columns => {
                for (i, column) in self.engine.column_order().iter().enumerate() {
                    let kind = self
                        .engine
                        .column_kind(column)
                        .map(|k| format!("{:?}", k).to_lowercase())
                        .unwrap_or_default();
                    writeln!(self.out, "{:>3}  {:<20} {}", i + 1, column, kind)?;
                }
            }
            Command::Values(column) => {
                let values = self.engine.unique_values(&column)?;
                for value in &values {
                    writeln!(self.out, "{}", value)?;
                }
                writeln!(self.out, "({} distinct)", values.len())?;
            }
            Command::Filter(spec) => {
                self.engine.apply_filter(spec)?;
                self.status()?;
            }
            Command::Clear => {
                self.engine.clear_filter();
                self.status()?;
            }
            Command::Sort(column) => {
                self.engine.sort(&column)?;
                if let Some(sort) = &self.engine.state().sort {
                    let direction = format!("{:?}", sort.direction).to_lowercase();
                    writeln!(self.out, "sorted by {} ({})", sort.column, direction)?;
                }
            }
            Command::Move { column, position } => {
                self.engine.move_column(&column, position)?;
                writeln!(self.out, "{}", self.engine.column_order().join(", "))?;
            }
            Command::Pivot {
                group_by,
                aggregate_columns,
            } => {
                self.engine.pivot(&group_by, &aggregate_columns)?;
                log_info!("CMD", "pivot {:?} by {:?}", aggregate_columns, group_by);
                self.status()?;
            }
            Command::Unpivot => {
                self.engine.unpivot();
                self.status()?;
            }
            Command::Chart { x, y, y2 } => self.chart(&x, &y, y2.as_deref())?,
            Command::Export { format, path } => {
                let records = self.engine.displayed_records();
                export(format, self.engine.column_order(), &records, &path)?;
                log_info!("CMD", "exported {} rows to {}", records.len(), path.display());
                writeln!(self.out, "wrote {} rows to {}", records.len(), path.display())?;
            }
            Command::Report => self.print_report()?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn status(&mut self) -> io::Result<()> {
        let mode = if self.engine.is_pivoted() { "pivoted" } else { "loaded" };
        let filter = if self.engine.state().filter.is_some() { ", filtered" } else { "" };
        writeln!(
            self.out,
            "{} of {} rows ({}{})",
            self.engine.displayed_len(),
            self.engine.base().len(),
            mode,
            filter
        )
    }

    fn show(&mut self, limit: usize) -> io::Result<()> {
        let shown = limit.min(self.engine.displayed_len());
        let rows: Vec<Vec<String>> = (0..shown)
            .filter_map(|i| self.engine.displayed_row(i))
            .map(|row| row.into_iter().map(|v| v.display_value()).collect())
            .collect();
        write!(self.out, "{}", render_table(self.engine.column_order(), &rows))?;
        writeln!(self.out, "({} of {} rows)", shown, self.engine.displayed_len())
    }

    fn chart(&mut self, x: &str, y: &str, y2: Option<&str>) -> Result<(), SessionError> {
        let series = self.engine.chart_series(x, y, y2)?;

        let mut columns = vec![series.x_column.clone(), series.y_column.clone()];
        if let Some(name) = &series.y2_column {
            columns.push(name.clone());
        }
        let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        let rows: Vec<Vec<String>> = series
            .points
            .iter()
            .map(|p| {
                let mut row = vec![p.x.clone(), number(p.y)];
                if series.y2_column.is_some() {
                    row.push(number(p.y2));
                }
                row
            })
            .collect();

        write!(self.out, "{}", render_table(&columns, &rows))?;
        match series.y_range() {
            Some((lo, hi)) => writeln!(self.out, "{} points, {} range {} .. {}", series.points.len(), y, lo, hi)?,
            None => writeln!(self.out, "{} points, no numeric {} values", series.points.len(), y)?,
        }
        Ok(())
    }

    fn print_report(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", self.report.summary())?;
        if !self.report.succeeded.is_empty() {
            writeln!(self.out, "loaded: {}", self.report.succeeded.join(", "))?;
        }
        for (symbol, error) in &self.report.failed {
            writeln!(self.out, "failed: {} ({})", symbol, error)?;
        }
        for warning in &self.report.warnings {
            writeln!(self.out, "warning: {}", warning)?;
        }
        Ok(())
    }
}
