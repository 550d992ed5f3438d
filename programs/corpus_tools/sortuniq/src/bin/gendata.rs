use rand::Rng;
use std::collections::HashSet;
use std::io::{self, ErrorKind, Write};
use term_macros::*;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_word<R: Rng>(rng: &mut R, shortest: usize, longest: usize) -> String {
    let len = rng.gen_range(shortest..=longest);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// `distinct` different words, padded with numbered fillers when the length range
/// is too narrow to produce that many.
fn word_pool<R: Rng>(rng: &mut R, distinct: usize, shortest: usize, longest: usize) -> Vec<String> {
    let mut pool = HashSet::with_capacity(distinct);
    let mut attempts = 0;
    while pool.len() < distinct && attempts < distinct * 2 {
        pool.insert(random_word(rng, shortest, longest));
        attempts += 1;
    }
    let mut filler = 0;
    while pool.len() < distinct {
        pool.insert(format!("fallback_str_{}", filler));
        filler += 1;
    }
    pool.into_iter().collect()
}

/// Writes `count` words drawn from `pool`, one per line, and flushes.
fn emit<W: Write, R: Rng>(
    wtr: &mut W,
    rng: &mut R,
    pool: &[String],
    count: usize,
) -> io::Result<()> {
    for _ in 0..count {
        let word = &pool[rng.gen_range(0..pool.len())];
        wtr.write_all(word.as_bytes())?;
        wtr.write_all(b"\n")?;
    }
    wtr.flush()
}

// a closed reader (`gendata | head`) ends output quietly
fn quiet_pipe(r: io::Result<()>) -> io::Result<()> {
    match r {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        r => r,
    }
}

fn main() {
    tool! {
        args:
            - count: usize = 1000000;
                ? count == 0
                => "count must be positive"
            - distinct: usize = 10000;
                ? distinct == 0
                => "distinct must be positive"
            - shortest: usize = 5;
                ? shortest == 0
                => "shortest must be positive"
            - longest: usize = 15;
                ? shortest > longest
                => "shortest can't exceed longest"
        ;

        body: || {
            let distinct = distinct.min(count);

            let mut rng = rand::thread_rng();
            let pool = word_pool(&mut rng, distinct, shortest, longest);
            log::debug!("pool of {} words, writing {} lines", pool.len(), count);

            let stdout = io::stdout();
            let mut wtr = io::BufWriter::new(stdout.lock());
            if let Err(e) = quiet_pipe(emit(&mut wtr, &mut rng, &pool, count)) {
                fail(&e.to_string());
            }
        }
    };
}

#[test]
fn pool_has_requested_size() {
    let mut rng = rand::thread_rng();
    let pool = word_pool(&mut rng, 500, 3, 8);
    assert_eq!(pool.len(), 500);
    assert!(pool.iter().all(|w| (3..=8).contains(&w.len())));
    let unique: HashSet<_> = pool.iter().collect();
    assert_eq!(unique.len(), 500);
}

#[test]
fn narrow_lengths_fall_back_to_fillers() {
    let mut rng = rand::thread_rng();
    let pool = word_pool(&mut rng, 100, 1, 1);
    assert_eq!(pool.len(), 100);
    assert!(pool.iter().any(|w| w.starts_with("fallback_str_")));
}

#[cfg(test)]
struct Refusing(ErrorKind);

#[cfg(test)]
impl Write for Refusing {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(self.0))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn emit_writes_count_lines() {
    let mut rng = rand::thread_rng();
    let pool = vec!["ab".to_string(), "cd".to_string()];
    let mut out = Vec::new();
    emit(&mut out, &mut rng, &pool, 50).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 50);
    assert!(text.lines().all(|l| l == "ab" || l == "cd"));
}

#[test]
fn failed_final_flush_is_reported() {
    // everything fits in the buffer, so the error only shows up on flush
    let mut rng = rand::thread_rng();
    let pool = vec!["x".to_string()];
    let mut wtr = io::BufWriter::new(Refusing(ErrorKind::Other));
    let r = quiet_pipe(emit(&mut wtr, &mut rng, &pool, 3));
    assert_eq!(r.unwrap_err().kind(), ErrorKind::Other);
}

#[test]
fn broken_pipe_on_flush_is_quiet() {
    let mut rng = rand::thread_rng();
    let pool = vec!["x".to_string()];
    let mut wtr = io::BufWriter::new(Refusing(ErrorKind::BrokenPipe));
    assert!(quiet_pipe(emit(&mut wtr, &mut rng, &pool, 3)).is_ok());
}
