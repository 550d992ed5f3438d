use crate::input::Lines;
use crate::progress::{self, Progress, Rows};
use crate::report::{self, Delimiter, Order, Rendered};
use crate::table::FrequencyTable;
use log::{debug, error, warn};
use std::io::{self, ErrorKind, Read, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// `None` disables progress output.
    pub progress: Option<Duration>,
    pub delim: Delimiter,
    /// Rank order for progress output. The final report is always by key.
    pub rank: bool,
    pub max_line: usize,
}

impl Settings {
    pub fn new(progress_secs: i64, delim: Delimiter, rank: bool, max_line: usize) -> Settings {
        Settings {
            progress: (progress_secs > 0).then(|| Duration::from_secs(progress_secs as u64)),
            delim,
            rank,
            max_line,
        }
    }
}

/// Everything one run owns: the counts and, if enabled, the progress screen.
pub struct Session {
    table: FrequencyTable,
    progress: Option<Progress>,
    delim: Delimiter,
    max_line: usize,
}

impl Session {
    pub fn new(settings: &Settings, rows: Rows) -> Session {
        let order = if settings.rank {
            Order::Rank
        } else {
            Order::Lexicographic
        };
        Session {
            table: FrequencyTable::with_capacity(1 << 16),
            progress: settings
                .progress
                .map(|interval| Progress::new(interval, order, rows)),
            delim: settings.delim,
            max_line: settings.max_line,
        }
    }

    #[cfg(test)]
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Counts every line of `input`, redrawing progress on `err` whenever it's due.
    pub fn consume<R: Read, E: Write>(&mut self, input: R, err: &mut E) -> io::Result<()> {
        let mut lines = Lines::new(input, self.max_line);
        while let Some(key) = lines.next_key() {
            self.table.record(key?);
            if let Some(progress) = self.progress.as_mut() {
                if progress.due(Instant::now()) {
                    progress.draw(err, &self.table, self.delim)?;
                }
            }
        }
        Ok(())
    }

    pub fn finish<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> io::Result<Rendered> {
        if self.progress.is_some() {
            progress::clear(err)?;
        }
        let rendered = report::render(out, &self.table, Order::Lexicographic, None, self.delim)?;
        out.flush()?;

        if self.table.is_empty() {
            debug!("no input lines");
        }
        if rendered.ambiguous > 0 {
            warn!(
                "{} keys contain the delimiter {:?}; their rows are ambiguous",
                rendered.ambiguous, self.delim.0
            );
        }
        debug!(
            "{} lines, {} distinct, {} progress redraws",
            self.table.total(),
            self.table.len(),
            self.progress.as_ref().map_or(0, |p| p.redraws())
        );
        Ok(rendered)
    }
}

pub fn run<R: Read, O: Write, E: Write>(
    settings: &Settings,
    rows: Rows,
    input: R,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    let mut session = Session::new(settings, rows);
    session.consume(input, err)?;
    session.finish(out, err)?;
    Ok(())
}

/// Process exit status for the outcome of a run.
pub fn exit_code(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        // reader went away, e.g. `sortuniq | head`
        Err(e) if e.kind() == ErrorKind::BrokenPipe => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}
