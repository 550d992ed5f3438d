use crate::table::{Entry, FrequencyTable};
use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Key bytes ascending.
    Lexicographic,
    /// Count descending, then key bytes ascending.
    Rank,
}

impl Order {
    pub fn compare(self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            Order::Lexicographic => a.key().cmp(b.key()),
            Order::Rank => b
                .count()
                .cmp(&a.count())
                .then_with(|| a.key().cmp(b.key())),
        }
    }

    // keys are unique, so both orders are total and an unstable sort is deterministic
    pub fn sort(self, view: &mut [&Entry]) {
        view.sort_unstable_by(|a, b| self.compare(a, b));
    }
}

pub fn view(table: &FrequencyTable, order: Order) -> Vec<&Entry> {
    let mut view: Vec<&Entry> = table.entries().collect();
    order.sort(&mut view);
    view
}

/// Field separator between key and count. Keys are never escaped, so a key that
/// contains the separator renders ambiguously.
///
/// Any single `char` is accepted, not just one byte: a multi-byte char such as `→`
/// is written as its UTF-8 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(pub char);

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter(',')
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDelimiter(String);

impl fmt::Display for InvalidDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delimiter must be a single character, got {:?}", self.0)
    }
}

impl std::error::Error for InvalidDelimiter {}

impl FromStr for Delimiter {
    type Err = InvalidDelimiter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\\t" | "tab" => return Ok(Delimiter('\t')),
            "\\0" => return Ok(Delimiter('\0')),
            _ => {}
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Delimiter(c)),
            _ => Err(InvalidDelimiter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rendered {
    pub rows: usize,
    pub omitted: usize,
    /// Rows whose key contains the delimiter.
    pub ambiguous: usize,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Writes `key<delim>count` rows in `order`. With a budget, at most `budget` rows
/// are written and one summary row stands in for the rest.
pub fn render<W: Write>(
    out: &mut W,
    table: &FrequencyTable,
    order: Order,
    budget: Option<usize>,
    delim: Delimiter,
) -> io::Result<Rendered> {
    let view = view(table, order);
    let shown = budget.map_or(view.len(), |b| b.min(view.len()));
    let mut buf = [0u8; 4];
    let sep = delim.0.encode_utf8(&mut buf).as_bytes();

    let mut ambiguous = 0;
    for entry in &view[..shown] {
        if contains(entry.key(), sep) {
            ambiguous += 1;
        }
        out.write_all(entry.key())?;
        out.write_all(sep)?;
        writeln!(out, "{}", entry.count())?;
    }

    let omitted = view.len() - shown;
    if omitted > 0 {
        writeln!(out, "... {} more entries not shown", omitted)?;
    }

    Ok(Rendered {
        rows: shown,
        omitted,
        ambiguous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(lines: &[&str]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for line in lines {
            table.record(line.as_bytes());
        }
        table
    }

    fn rendered(
        table: &FrequencyTable,
        order: Order,
        budget: Option<usize>,
        delim: Delimiter,
    ) -> String {
        let mut out = Vec::new();
        render(&mut out, table, order, budget, delim).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lexicographic_example() {
        let table = table_of(&["a", "b", "a", "c", "b", "a"]);
        assert_eq!(
            rendered(&table, Order::Lexicographic, None, Delimiter::default()),
            "a,3\nb,2\nc,1\n"
        );
    }

    #[test]
    fn empty_table_renders_nothing() {
        let table = FrequencyTable::new();
        let mut out = Vec::new();
        let r = render(&mut out, &table, Order::Rank, Some(10), Delimiter::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(r, Rendered::default());
    }

    #[test]
    fn byte_order_not_locale_order() {
        let table = table_of(&["b", "B", "a", "ä", "A", "10", "9"]);
        assert_eq!(
            rendered(&table, Order::Lexicographic, None, Delimiter::default()),
            "10,1\n9,1\nA,1\nB,1\na,1\nb,1\nä,1\n"
        );
    }

    #[test]
    fn rank_breaks_ties_by_key() {
        let table = table_of(&["pear", "fig", "apple", "fig", "pear", "kiwi", "fig"]);
        assert_eq!(
            rendered(&table, Order::Rank, None, Delimiter::default()),
            "fig,3\npear,2\napple,1\nkiwi,1\n"
        );
    }

    #[test]
    fn rank_order_property() {
        let mut table = FrequencyTable::new();
        for i in 0..500u32 {
            let key = format!("k{}", (i * 7919) % 37);
            for _ in 0..(i % 5) {
                table.record(key.as_bytes());
            }
        }
        let view = view(&table, Order::Rank);
        for pair in view.windows(2) {
            assert!(pair[0].count() >= pair[1].count());
            if pair[0].count() == pair[1].count() {
                assert!(pair[0].key() < pair[1].key());
            }
        }
    }

    #[test]
    fn truncation_adds_one_summary_row() {
        let table = table_of(&["e", "d", "c", "b", "a"]);
        let mut out = Vec::new();
        let delim = Delimiter::default();
        let r = render(&mut out, &table, Order::Lexicographic, Some(2), delim).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a,1\nb,1\n... 3 more entries not shown\n"
        );
        assert_eq!(r.rows, 2);
        assert_eq!(r.omitted, 3);
    }

    #[test]
    fn budget_that_fits_has_no_summary() {
        let table = table_of(&["a", "b"]);
        assert_eq!(
            rendered(&table, Order::Lexicographic, Some(2), Delimiter::default()),
            "a,1\nb,1\n"
        );
    }

    #[test]
    fn tab_delimiter() {
        let table = table_of(&["x", "x"]);
        let delim: Delimiter = "\\t".parse().unwrap();
        assert_eq!(rendered(&table, Order::Lexicographic, None, delim), "x\t2\n");
    }

    #[test]
    fn delimiter_inside_key_is_not_escaped() {
        let table = table_of(&["a,b", "c"]);
        let mut out = Vec::new();
        let r = render(&mut out, &table, Order::Lexicographic, None, Delimiter(',')).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b,1\nc,1\n");
        assert_eq!(r.ambiguous, 1);
    }

    #[test]
    fn parse_delimiters() {
        assert_eq!("|".parse::<Delimiter>(), Ok(Delimiter('|')));
        assert_eq!("tab".parse::<Delimiter>(), Ok(Delimiter('\t')));
        assert_eq!("\t".parse::<Delimiter>(), Ok(Delimiter('\t')));
        assert_eq!("→".parse::<Delimiter>(), Ok(Delimiter('→')));
        assert!("".parse::<Delimiter>().is_err());
        assert!(",,".parse::<Delimiter>().is_err());
    }

    #[test]
    fn multibyte_delimiter_is_written_as_utf8() {
        let table = table_of(&["k"]);
        assert_eq!(rendered(&table, Order::Lexicographic, None, Delimiter('→')), "k→1\n");
    }
}
