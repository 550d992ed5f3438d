use crate::report::{self, Delimiter, Order};
use crate::table::FrequencyTable;
use log::debug;
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Clear screen, cursor home.
pub const CLEAR: &[u8] = b"\x1b[2J\x1b[H";
pub const HEADER: &str = "sortuniq intermediate results";
pub const DEFAULT_ROWS: usize = 24;
// header, summary row, cursor line
const RESERVED_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rows {
    Terminal,
    #[cfg(test)]
    Fixed(usize),
}

impl Rows {
    pub fn get(self) -> usize {
        match self {
            Rows::Terminal => match term_size::dimensions_stderr() {
                Some((_, h)) => h,
                None => {
                    debug!("terminal size unavailable, assuming {} rows", DEFAULT_ROWS);
                    DEFAULT_ROWS
                }
            },
            #[cfg(test)]
            Rows::Fixed(rows) => rows,
        }
    }
}

/// Redraws the current counts in place on the error stream every `interval`.
#[derive(Debug)]
pub struct Progress {
    interval: Duration,
    last: Instant,
    order: Order,
    rows: Rows,
    redraws: u64,
}

impl Progress {
    pub fn new(interval: Duration, order: Order, rows: Rows) -> Progress {
        Progress {
            interval,
            last: Instant::now(),
            order,
            rows,
            redraws: 0,
        }
    }

    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.interval
    }

    pub fn budget(&self) -> usize {
        self.rows.get().saturating_sub(RESERVED_ROWS).max(1)
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn draw<W: Write>(
        &mut self,
        err: &mut W,
        table: &FrequencyTable,
        delim: Delimiter,
    ) -> io::Result<()> {
        let budget = self.budget();
        err.write_all(CLEAR)?;
        let header = format!(
            "{} ({} lines, {} distinct):",
            HEADER,
            table.total(),
            table.len()
        );
        writeln!(err, "{}", header.bold())?;
        let rendered = report::render(err, table, self.order, Some(budget), delim)?;
        err.flush()?;

        self.last = Instant::now();
        self.redraws += 1;
        debug!(
            "progress redraw #{}: {} rows, {} omitted",
            self.redraws, rendered.rows, rendered.omitted
        );
        Ok(())
    }
}

pub fn clear<W: Write>(err: &mut W) -> io::Result<()> {
    err.write_all(CLEAR)?;
    err.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_leaves_room_for_header_and_summary() {
        let p = Progress::new(Duration::from_secs(1), Order::Rank, Rows::Fixed(24));
        assert_eq!(p.budget(), 21);
        let tiny = Progress::new(Duration::from_secs(1), Order::Rank, Rows::Fixed(2));
        assert_eq!(tiny.budget(), 1);
    }

    #[test]
    fn due_after_interval() {
        let p = Progress::new(Duration::from_secs(5), Order::Lexicographic, Rows::Fixed(24));
        let start = p.last;
        assert!(!p.due(start));
        assert!(!p.due(start + Duration::from_secs(4)));
        assert!(p.due(start + Duration::from_secs(5)));
    }

    #[test]
    fn draw_layout() {
        let mut table = FrequencyTable::new();
        for key in ["b", "a", "b", "c", "d", "b", "c"] {
            table.record(key.as_bytes());
        }
        let mut p = Progress::new(Duration::ZERO, Order::Rank, Rows::Fixed(5));
        let mut err = Vec::new();
        p.draw(&mut err, &table, Delimiter::default()).unwrap();

        assert!(err.starts_with(CLEAR));
        let text = String::from_utf8(err[CLEAR.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.contains(HEADER));
        assert!(header.contains("7 lines, 4 distinct"));
        assert_eq!(lines.collect::<Vec<_>>(), vec!["b,3", "c,2", "... 2 more entries not shown"]);
        assert_eq!(p.redraws(), 1);
    }
}
