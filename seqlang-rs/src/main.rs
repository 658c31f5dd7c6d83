use std::io::{self, BufRead, Read, Write};
use std::process::ExitCode;

use seqlang::cli::{self, CliArgs, Source};
use seqlang::script::{Interpreter, Output, StdOutput};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seqlang: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    let mut interp = Interpreter::new(StdOutput::new());

    let src = match &args.source {
        Source::Code(text) => text.clone(),
        Source::File(path) => match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("seqlang: {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        Source::Stdin => {
            let is_tty = unsafe { libc::isatty(libc::STDIN_FILENO) != 0 };
            if is_tty {
                repl(&mut interp, &args);
                return ExitCode::SUCCESS;
            }
            let mut s = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut s) {
                eprintln!("seqlang: stdin: {e}");
                return ExitCode::FAILURE;
            }
            s
        }
    };

    if submit(&mut interp, &src, args.debug) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Parse and run one submission; `false` if any phase failed.
fn submit(interp: &mut Interpreter<StdOutput>, src: &str, debug: bool) -> bool {
    let program = match interp.parse(src) {
        Ok(p) => p,
        Err(e) => {
            interp.output_mut().error(&e.to_string());
            return false;
        }
    };
    if debug {
        eprintln!("{program:#?}");
    }
    interp.run(&program).is_ok()
}

// ── Interactive mode ──────────────────────────────────────────────────────────

fn repl(interp: &mut Interpreter<StdOutput>, args: &CliArgs) {
    if !args.quiet {
        println!("seqlang {}", env!("CARGO_PKG_VERSION"));
    }
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if !args.quiet {
            print!("> ");
            let _ = io::stdout().flush();
        }
        let line = match lines.next() {
            Some(Ok(l)) => l,
            Some(Err(e)) => {
                eprintln!("seqlang: stdin: {e}");
                break;
            }
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        submit(interp, &line, args.debug);
    }
    if !args.quiet {
        println!();
    }
}
