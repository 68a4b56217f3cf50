use std::io::Write;
use std::path;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{event, Level};

use hexview::model::addr;
use hexview::model::config;
use hexview::model::dump;
use hexview::model::selection;
use hexview::model::space;
use hexview::model::versioned::Versioned;
use hexview::settings;

#[derive(Parser, Debug)]
#[command(name = "hexdump")]
#[command(version)]
#[command(about = "Print a range of a file as hex and ascii rows")]
struct Args {
    /// File to dump, or "-" for standard input
    file: path::PathBuf,

    /// First byte to dump (accepts 0x prefix)
    #[arg(short, long, default_value = "0", value_parser = parse_number)]
    offset: u64,

    /// Number of bytes to dump; defaults to the rest of the file
    #[arg(short = 'n', long, value_parser = parse_number)]
    length: Option<u64>,

    /// Bytes per word (1, 2, 4 or 8)
    #[arg(short, long)]
    word_width: Option<i64>,

    /// Words per row
    #[arg(short, long)]
    row_width: Option<i64>,

    /// Address shown for the first byte of the file
    #[arg(short = 'a', long, value_parser = parse_number)]
    address_base: Option<u64>,

    #[arg(long)]
    no_address: bool,

    #[arg(long)]
    no_hex: bool,

    #[arg(long)]
    no_ascii: bool,

    /// Use 32-bit addresses
    #[arg(long)]
    address32: bool,

    #[arg(long)]
    hide_leading_zeros: bool,

    /// Don't split addresses with a colon
    #[arg(long)]
    no_separator: bool,

    /// Settings file to use instead of the one in the XDG config directory
    #[arg(short, long)]
    config: Option<path::PathBuf>,

    /// More logging on stderr; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum DumpError {
    #[error(transparent)]
    Settings(#[from] settings::SettingsError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("{}: {}", .0.display(), .1)]
    Open(path::PathBuf, std::io::Error),
    #[error("offset {0:#x} is past the end of the data ({1:#x} bytes)")]
    OutOfRange(u64, addr::Offset),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn parse_number(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid number {:?}: {}", s, e))
}

fn setup_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("hexdump: could not install log subscriber: {}", e);
    }
}

fn configure(args: &Args) -> Result<config::ViewConfiguration, DumpError> {
    let settings = match &args.config {
        Some(path) => settings::Settings::load_from(path)?,
        None => settings::Settings::load()?,
    };
    let mut config = settings.view;

    if let Some(width) = args.word_width {
        config.change(config::Change::word_width(config::word_width_from(width)?))?;
    }
    if let Some(width) = args.row_width {
        config.change(config::Change::row_width(config::row_width_from(width)?))?;
    }
    if let Some(base) = args.address_base {
        config.change(config::Change::address_offset(base))?;
    }
    if args.address32 {
        config.change(config::Change::address_size(addr::AddressSize::Address32))?;
    }

    let flags = [
        (args.no_address, config::Change::show_address(false)),
        (args.no_hex, config::Change::show_hex(false)),
        (args.no_ascii, config::Change::show_ascii(false)),
        (args.hide_leading_zeros, config::Change::hide_leading_address_zeros(true)),
        (args.no_separator, config::Change::show_address_separator(false)),
    ];
    for (set, change) in flags {
        if set {
            config.change(change)?;
        }
    }

    Ok(config)
}

fn open(file: &path::Path) -> Result<Box<dyn space::ByteStream>, DumpError> {
    if file == path::Path::new("-") {
        let stream = space::buffer::MemoryByteStream::from_reader(std::io::stdin().lock())?;
        return Ok(Box::new(stream));
    }

    let stream = space::file::FileByteStream::try_open(file.to_path_buf())
        .map_err(|e| DumpError::Open(file.to_path_buf(), e))?;

    /* /proc files and the like report a size of zero */
    if space::ByteStream::size(&stream) == 0 {
        return Ok(Box::new(space::buffer::MemoryByteStream::materialize(&stream)));
    }

    Ok(Box::new(stream))
}

fn run(args: &Args) -> Result<(), DumpError> {
    let config = configure(args)?;
    let stream = open(&args.file)?;

    let size = space::size_of(Some(&*stream));
    let offset = addr::Offset::try_from(args.offset).unwrap_or(addr::Offset::MAX);
    if offset > size || (offset == size && size > 0) {
        return Err(DumpError::OutOfRange(args.offset, size));
    }

    let available = (size - offset) as u64;
    let length = args.length.map_or(available, |l| std::cmp::min(l, available));
    event!(Level::INFO, offset, length, size, "dumping");

    let mut range = selection::Selection::default();
    range.select_span(offset, length as i64);

    let serializer = dump::RowSerializer::new(&config, &*stream);
    let mut out = std::io::stdout().lock();
    for record in serializer.rows(&range, 0) {
        writeln!(out, "{}", record.to_line())?;
    }
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            event!(Level::ERROR, "{}", e);
            eprintln!("hexdump: {}", e);
            ExitCode::FAILURE
        },
    }
}
