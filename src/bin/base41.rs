/*
 * Copyright (C) 2026 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base41.
 *
 * base41 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base41 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base41. If not, see <https://www.gnu.org/licenses/>.
 */

use std::ffi::OsStr;
use std::fmt::{Debug, Display};
use std::fs::File;
use std::io::{self, stderr, stdin, stdout, BufWriter, Read, Write};
use std::path::Path;
use std::process::exit;

use base41::{DecodeConfig, DecodeError, DecoderReader, EncoderWriter};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: base41 [options] [file]

Encodes or decodes base-41 data from [file] and writes the result to standard
output. If [file] is missing or \"-\", the data is read from standard input.

Options:
  -d --decode   Decode data instead of encoding
  -s --strict   When decoding, reject bytes outside the base-41 alphabet and
                input that ends partway through a block
  -h --help     Show this help message
  -v --version  Show program version

Set RUST_LOG (e.g., RUST_LOG=debug) to print diagnostics to standard error.
";

const BUF_LEN: usize = 0x2000;

#[macro_use]
mod error_exit {
    use super::{exit, Display};

    macro_rules! error_exit {
        ($($args:tt)*) => {
            crate::error_exit::__run(format_args!($($args)*));
        };
    }

    #[doc(hidden)]
    pub fn __run(args: impl Display) -> ! {
        tracing::debug!("exiting: {}", args);
        eprintln!("error: {}", args);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}", args);
        } else {
            exit(1);
        }
    }
}

fn expect<T, E: Debug>(result: Result<T, E>, msg: impl Display) -> T {
    result.unwrap_or_else(|e| {
        tracing::debug!(error = ?e, "{}", msg);
        eprintln!("error: {}", msg);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}: {:?}", msg, e);
        } else {
            exit(1);
        }
    })
}

struct ParsedArgs<'a> {
    pub decode: bool,
    pub strict: bool,
    pub path: Option<&'a Path>,
}

fn show_usage() -> ! {
    print!("{}", USAGE);
    exit(0);
}

fn show_version() -> ! {
    println!("{}", env!("CARGO_PKG_VERSION"));
    exit(0);
}

macro_rules! args_error {
    ($($args:tt)*) => {
        error_exit!(
            "{}\n{}",
            format_args!($($args)*),
            "See `base41 --help` for usage information.",
        );
    };
}

fn parse_args<'a, Args>(args: Args) -> ParsedArgs<'a>
where
    Args: IntoIterator<Item = &'a OsStr>,
{
    let mut decode = false;
    let mut strict = false;
    let mut file: Option<&'a OsStr> = None;
    let mut options_done = false;

    let mut process_arg = |arg: &'a OsStr, astr: &str| {
        match astr {
            _ if options_done => {}
            "-" => {}
            "--" => {
                options_done = true;
                return;
            }
            "--help" => show_usage(),
            "--version" => show_version(),
            "--decode" => {
                decode = true;
                return;
            }
            "--strict" => {
                strict = true;
                return;
            }
            s if s.starts_with("--") => {
                args_error!("unrecognized option: {}", s);
            }
            s if s.starts_with('-') => {
                s.chars().skip(1).for_each(|c| match c {
                    'h' => show_usage(),
                    'v' => show_version(),
                    'd' => {
                        decode = true;
                    }
                    's' => {
                        strict = true;
                    }
                    c => {
                        args_error!("unrecognized option: -{}", c);
                    }
                });
                return;
            }
            _ => {}
        }
        if file.replace(arg).is_some() {
            args_error!("unexpected argument: {}", astr);
        }
    };

    args.into_iter()
        .map(|a| (a, a.to_string_lossy()))
        .for_each(|(arg, astr)| process_arg(arg, &astr));

    ParsedArgs {
        decode,
        strict,
        path: file.filter(|f| *f != OsStr::new("-")).map(Path::new),
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(stderr)
        .with_target(false)
        .init();
}

/// Reads into `buf`, retrying if interrupted. Returns 0 at end of data.
fn read_some(stream: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            r => return r,
        }
    }
}

fn encode(stream: &mut impl Read) {
    let mut encoder = EncoderWriter::new(BufWriter::new(stdout()));
    let mut buf = vec![0; BUF_LEN];
    loop {
        let n = expect(read_some(stream, &mut buf), "could not read input");
        if n == 0 {
            break;
        }
        expect(
            encoder.write_all(&buf[..n]),
            "could not write to standard output",
        );
    }
    expect(encoder.finish(), "could not write to standard output");
}

fn decode(stream: &mut impl Read, config: DecodeConfig) {
    let mut decoder = DecoderReader::with_config(stream, config);
    let mut writer = BufWriter::new(stdout());
    let mut buf = vec![0; BUF_LEN];
    loop {
        let n = match read_some(&mut decoder, &mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                let invalid = e
                    .get_ref()
                    .and_then(|e| e.downcast_ref::<DecodeError>())
                    .copied();
                expect(writer.flush(), "could not write to standard output");
                match invalid {
                    Some(e) => {
                        error_exit!("input is not valid base-41 data: {}", e);
                    }
                    None => expect(Err(e), "could not read input"),
                }
            }
        };
        expect(
            writer.write_all(&buf[..n]),
            "could not write to standard output",
        );
    }
    expect(writer.flush(), "could not write to standard output");
}

fn main() {
    setup_logging();
    let args: Vec<_> = std::env::args_os().skip(1).collect();
    let ParsedArgs {
        decode: should_decode,
        strict,
        path,
    } = parse_args(args.iter().map(|s| s.as_os_str()));

    let config = if strict {
        DecodeConfig::strict()
    } else {
        DecodeConfig::new()
    };

    path.map(|path| {
        File::open(path).unwrap_or_else(|e| {
            error_exit!("could not open file '{}': {}", path.display(), e);
        })
    })
    .map_or_else(
        || {
            if should_decode {
                decode(&mut stdin(), config);
            } else {
                encode(&mut stdin());
            }
        },
        |mut file| {
            if should_decode {
                decode(&mut file, config);
            } else {
                encode(&mut file);
            }
        },
    );
}
