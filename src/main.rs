//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use txzip::compression::compress::compress_file;
use txzip::compression::decompress::{decompress_file, test_file};
use txzip::tools::cli::{opts_init, Mode};
use txzip::CodecError;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), CodecError> {
    // Available log levels are Error, Warn, Info, Debug, Trace
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Logger unavailable: {}", e);
    }

    let options = opts_init();

    //----- Figure how what we need to do and go do it
    let mut failure = None;
    for file in &options.files {
        let result = match options.op_mode {
            Mode::Zip => compress_file(&options, file).map(|report| info!("{}", report)),
            Mode::Unzip => decompress_file(&options, file).map(|report| info!("{}", report)),
            Mode::Test => test_file(file).map(|_| info!("{}: ok", file.display())),
        };
        if let Err(e) = result {
            error!("{}: {}", file.display(), e);
            failure.get_or_insert(e);
        }
    }

    info!("Done.");
    failure.map_or(Ok(()), Err)
}
