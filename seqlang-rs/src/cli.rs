//! Command-line argument parsing.
//!
//! Usage:
//!   seqlang [-dq] [-c<code>] [--] [<file>]
//!
//! With neither `-c` nor a file, the program is read from stdin.

use std::path::PathBuf;

pub const USAGE: &str = "Usage: seqlang [-dq] [-c<code>] [--] [<file>]";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Dump the parsed program to stderr before running (`-d`).
    pub debug: bool,
    /// No banner or prompt in interactive mode (`-q`).
    pub quiet: bool,
    /// Where the program comes from.
    pub source: Source,
}

/// Program source.
#[derive(Debug, Default, PartialEq)]
pub enum Source {
    /// Read stdin (default).
    #[default]
    Stdin,
    /// `-c<code>`: run this text.
    Code(String),
    /// Positional argument: run this file.
    File(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut code: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'q' => args.quiet = true,

                // -c<code> or -c <code>
                'c' => {
                    let text = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-c requires a code argument".to_owned());
                    };
                    code = Some(text);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    args.source = match (code, positional.len()) {
        (Some(text), 0) => Source::Code(text),
        (Some(_), _) => return Err("-c and a source file are mutually exclusive".to_owned()),
        (None, 0) => Source::Stdin,
        (None, 1) if positional[0] == "-" => Source::Stdin,
        (None, 1) => Source::File(PathBuf::from(positional.remove(0))),
        (None, n) => return Err(format!("too many arguments ({n})")),
    };

    Ok(args)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
