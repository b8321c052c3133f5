use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::{CommandFactory, ErrorKind, Parser};
use log::{info, LevelFilter};

use crate::compression::algorithm::Codec;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Map the -v count from the command line. Anything above 5 is Trace.
    pub fn from_level(v: u8) -> Self {
        match v {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct Opts {
    /// Codec family to force when compressing. None picks by file size.
    pub algorithm: Option<Codec>,
    /// Files to read for input
    pub files: Vec<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Output path, used in place of the derived name. Only valid with a single input file.
    pub output: Option<PathBuf>,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl Opts {
    pub fn new() -> Self {
        Self {
            algorithm: None,
            files: vec![],
            force_overwrite: false,
            op_mode: Mode::Zip,
            output: None,
            verbose: Verbosity::Info,
        }
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Args> for Opts {
    fn from(args: Args) -> Self {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress && !args.compress {
            Mode::Unzip
        } else {
            Mode::Zip
        };
        Self {
            algorithm: args.algorithm,
            files: args.files,
            force_overwrite: args.force,
            op_mode,
            output: args.output,
            verbose: Verbosity::from_level(args.v),
        }
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A small lossless file compressor",
    long_about = "
    Compresses files with run-length encoding, LZ77 or Huffman coding. Unless told otherwise the
    codec is picked by file size: run-length encoding for files of 100 bytes or less, LZ77 with a
    window that grows with the file for everything else.

    The compressed file is named after the input with .rle, .lz77 or .huffman appended, and
    decompression picks the codec from that extension."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true, value_parser)]
    files: Vec<PathBuf>,

    /// Perform compression on the input files (the default)
    #[clap(short = 'z', long = "compress", action)]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress", action, conflicts_with = "compress")]
    decompress: bool,

    /// Test compressed file integrity without writing output
    #[clap(short = 't', long = "test", action, conflicts_with_all = &["compress", "decompress"])]
    test: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force", action)]
    force: bool,

    /// Codec to compress with instead of choosing by size
    #[clap(short = 'a', long = "algorithm", value_enum)]
    algorithm: Option<Codec>,

    /// Write the output here instead of the derived name
    #[clap(short = 'o', long = "output", value_parser)]
    output: Option<PathBuf>,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
    v: u8,
}

impl Args {
    /// Parse from any argument list. Checks that clap's attributes cannot express are made here.
    pub fn try_parse_args<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = Self::try_parse_from(itr)?;
        if args.output.is_some() && args.files.len() > 1 {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--output can only be used with a single input file",
            ));
        }
        Ok(args)
    }
}

/// Read the command line into Opts and set the log level from it. Exits with a usage message
/// if the command line is invalid.
pub fn opts_init() -> Opts {
    let args = Args::try_parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    let opts = Opts::from(args);

    log::set_max_level(opts.verbose.level_filter());

    // Below we report initialization status to the user
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if let Some(codec) = opts.algorithm {
        info!("Compressing with {:?} regardless of file size", codec);
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}
