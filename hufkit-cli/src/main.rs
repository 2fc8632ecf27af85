//! `huf`, a command-line front end for `hufkit`.
//!
//! `huf c <file>` compresses `<file>` into `<file>.huf`, `huf d <file>`
//! decompresses `<file>` into `<file>.fuh`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hufkit::Summary;

const USAGE: &str = "[-v|--verbose] <c|compress|d|decompress> <file>";

/// Exit code for malformed command lines.
const USAGE_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    fn parse(arg: &str) -> Option<Self> {
        match arg {
            "c" | "compress" => Some(Self::Compress),
            "d" | "decompress" => Some(Self::Decompress),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Compress => "huf",
            Self::Decompress => "fuh",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    mode: Mode,
    input: PathBuf,
    verbose: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut verbose = false;
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => positional.push(arg),
        }
    }

    let Ok([mode, input]) = <[String; 2]>::try_from(positional) else {
        return Err("expected a mode and a file".to_string());
    };

    let Some(mode) = Mode::parse(&mode) else {
        return Err(format!("unknown mode '{mode}', expected 'c' or 'd'"));
    };

    Ok(Args {
        mode,
        input: input.into(),
        verbose,
    })
}

fn output_path(input: &Path, mode: Mode) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(mode.extension());

    name.into()
}

fn run(args: &Args) -> Result<(PathBuf, Summary), String> {
    let verb = args.mode.verb();

    let source = File::open(&args.input)
        .map_err(|e| format!("no such file to {verb}: {} ({e})", args.input.display()))?;

    let output = output_path(&args.input, args.mode);
    let sink = File::create(&output)
        .map_err(|e| format!("failed to create {}: {e}", output.display()))?;

    let source = BufReader::new(source);
    let sink = BufWriter::new(sink);

    let summary = match args.mode {
        Mode::Compress => hufkit::compress_stream(source, sink),
        Mode::Decompress => hufkit::decompress_stream(source, sink),
    }
    .map_err(|e| format!("failed to {verb} {}: {e}", args.input.display()))?;

    Ok((output, summary))
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "huf".to_string());

    let args = match parse_args(args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Usage: {program} {USAGE}");

            return ExitCode::from(USAGE_ERROR);
        }
    };

    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }

    match run(&args) {
        Ok((output, summary)) => {
            log::info!(
                "wrote {}: {} -> {} bytes ({:.1}%)",
                output.display(),
                summary.input_bytes,
                summary.output_bytes,
                summary.ratio().unwrap_or(0.0) * 100.0
            );

            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");

            ExitCode::FAILURE
        }
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {target}): {args}"),
                log::Level::Warn => eprintln!("Warning (in {target}): {args}"),
                log::Level::Info => eprintln!("{args}"),
                log::Level::Debug => eprintln!("Debug (in {target}): {args}"),
                log::Level::Trace => eprintln!("Trace (in {target}): {args}"),
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parse_modes() {
        assert_eq!(
            args(&["c", "notes.txt"]).unwrap(),
            Args {
                mode: Mode::Compress,
                input: "notes.txt".into(),
                verbose: false,
            }
        );

        assert_eq!(
            args(&["-v", "decompress", "notes.txt.huf"]).unwrap(),
            Args {
                mode: Mode::Decompress,
                input: "notes.txt.huf".into(),
                verbose: true,
            }
        );
    }

    #[test]
    fn parse_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["c"]).is_err());
        assert!(args(&["c", "a", "b"]).is_err());
        assert!(args(&["x", "notes.txt"]).is_err());
    }

    #[test]
    fn output_names() {
        assert_eq!(
            output_path(Path::new("dir/notes.txt"), Mode::Compress),
            Path::new("dir/notes.txt.huf")
        );
        assert_eq!(
            output_path(Path::new("notes.txt.huf"), Mode::Decompress),
            Path::new("notes.txt.huf.fuh")
        );
    }

    #[test]
    fn missing_input() {
        let err = run(&Args {
            mode: Mode::Compress,
            input: "/nonexistent/hufkit-input".into(),
            verbose: false,
        })
        .unwrap_err();

        assert!(err.starts_with("no such file to compress"));
    }
}
