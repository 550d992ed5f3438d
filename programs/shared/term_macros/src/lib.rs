//! Shared harness for the corpus tools. A tool declares its flags and a body:
//!
//! ```ignore
//! use term_macros::*;
//!
//! fn main() {
//!     tool! {
//!         args:
//!             - top_n: usize = 30000;
//!                 ? top_n == 0
//!                 => "top_n can't be zero"
//!             - sep: String = "\t".to_string();
//!             - lowercase;
//!         ;
//!
//!         body: || {
//!             println!("{} {} {}", top_n, sep, lowercase);
//!         }
//!     };
//! }
//! ```
//!
//! Every typed arg is read from `--name <value>` or `-n <value>` (first letter of the
//! name) and parsed with `FromStr`; a missing or unparseable value falls back to the
//! default. Bare args are boolean switches. Flags nobody declared are ignored.
//! A `? cond => "msg"` rule is checked once every arg is bound; the first one that
//! holds prints its message and exits with status 1.

use owo_colors::OwoColorize;
use std::ffi::OsString;
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct Args {
    raw: Vec<String>,
}

impl Args {
    pub fn from_env() -> Args {
        Args::from_os(std::env::args_os().skip(1))
    }

    /// Tokens that aren't valid UTF-8 are converted lossily instead of aborting.
    pub fn from_os<I: IntoIterator<Item = OsString>>(raw: I) -> Args {
        Args::from_vec(
            raw.into_iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        )
    }

    pub fn from_vec(raw: Vec<String>) -> Args {
        Args { raw }
    }

    // last occurrence wins
    fn position(&self, name: &str) -> Option<usize> {
        let long = format!("--{}", name);
        let short = name.chars().next().map(|c| format!("-{}", c));
        self.raw
            .iter()
            .rposition(|a| *a == long || Some(a) == short.as_ref())
    }

    pub fn flag(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The token following the flag, whatever it looks like.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.position(name)
            .and_then(|i| self.raw.get(i + 1))
            .map(|s| s.as_str())
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(|v| v.parse::<T>().ok())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub name: &'static str,
    pub kind: Option<&'static str>,
    pub default: Option<&'static str>,
}

impl Usage {
    pub fn option(name: &'static str, kind: &'static str, default: &'static str) -> Usage {
        Usage {
            name,
            kind: Some(kind),
            default: Some(default),
        }
    }

    pub fn switch(name: &'static str) -> Usage {
        Usage {
            name,
            kind: None,
            default: None,
        }
    }

    fn short(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

pub fn print_usage(tool: &str, usages: &[Usage]) {
    println!("{} {}", "usage:".bold(), tool);
    for usage in usages {
        let flag = format!("--{} / -{}", usage.name, usage.short());
        match (usage.kind, usage.default) {
            (Some(kind), Some(default)) => {
                println!("    {} <{}> (default: {})", flag.green(), kind, default)
            }
            _ => println!("    {}", flag.green()),
        }
    }
}

/// First message whose condition holds, in declaration order.
pub fn check(rules: &[(bool, &'static str)]) -> Result<(), &'static str> {
    match rules.iter().find(|(violated, _)| *violated) {
        Some((_, msg)) => Err(*msg),
        None => Ok(()),
    }
}

/// Prints the message and exits with status 1.
pub fn fail(msg: &str) -> ! {
    eprintln!("{} {}", "error:".red().bold(), msg);
    std::process::exit(1)
}

pub fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

#[doc(hidden)]
#[macro_export]
macro_rules! __arg {
    ($args:ident, $name:ident : $ty:ty = $default:expr) => {
        $args.parse::<$ty>(stringify!($name)).unwrap_or_else(|| $default)
    };
    ($args:ident, $name:ident) => {
        $args.flag(stringify!($name))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __usage {
    ($name:ident : $ty:ty = $default:expr) => {
        $crate::Usage::option(stringify!($name), stringify!($ty), stringify!($default))
    };
    ($name:ident) => {
        $crate::Usage::switch(stringify!($name))
    };
}

#[macro_export]
macro_rules! tool {
    (
        args:
            $(
                - $name:ident $( : $ty:ty = $default:expr )? ;
                $( ? $cond:expr => $msg:literal )?
            )*
        ;

        body: || $body:block
    ) => {
        $crate::__tool! {
            $crate::Args::from_env();
            args:
                $(
                    - $name $( : $ty = $default )? ;
                    $( ? $cond => $msg )?
                )*
            ;
            body: || $body
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tool {
    (
        $args:expr;
        args:
            $(
                - $name:ident $( : $ty:ty = $default:expr )? ;
                $( ? $cond:expr => $msg:literal )?
            )*
        ;

        body: || $body:block
    ) => {{
        $crate::init_logging();
        let __args: $crate::Args = $args;
        if __args.flag("help") {
            $crate::print_usage(
                env!("CARGO_PKG_NAME"),
                &[ $( $crate::__usage!($name $( : $ty = $default )?) ),* ],
            );
            return;
        }
        $(
            let $name = $crate::__arg!(__args, $name $( : $ty = $default )?);
        )*
        if let Err(msg) = $crate::check(&[ $( $( ($cond, $msg), )? )* ]) {
            $crate::fail(msg);
        }
        let body = || $body;
        body()
    }};
}
