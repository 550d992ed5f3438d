use term_macros::*;
mod input;
mod progress;
mod report;
mod run;
mod table;
use log::debug;
use progress::Rows;
use report::Delimiter;
use std::io;

fn main() {
    tool! {
        args:
            - progress: i64 = 0;
            - delim: Delimiter = Delimiter::default();
            - rank;
            - max_line: usize = input::MAX_LINE;
        ;

        body: || {
            let settings = run::Settings::new(progress, delim, rank, max_line);
            debug!("{:?}", settings);

            let stdin = io::stdin();
            let stdout = io::stdout();
            let stderr = io::stderr();
            let mut out = io::BufWriter::new(stdout.lock());
            let mut err = stderr.lock();

            let result = run::run(&settings, Rows::Terminal, stdin.lock(), &mut out, &mut err);
            let code = run::exit_code(result);
            if code != 0 {
                std::process::exit(code);
            }
        }
    };
}
