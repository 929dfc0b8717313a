use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use matstream::{ByteStream, HistoryLimit, SeekableZlibStream, StreamConfig, DEFAULT_BLOCK_SIZE};

#[derive(Parser, Debug)]
#[command(name = "matstream-cat")]
#[command(about = "Decompress a zlib payload embedded in a file and write it to stdout")]
struct Args {
    /// File holding the compressed payload
    input: PathBuf,

    /// Byte offset of the payload within the file
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Compressed payload length in bytes (default: rest of the file)
    #[arg(long)]
    length: Option<u64>,

    /// Decompressed offset to start writing from
    #[arg(long, default_value_t = 0)]
    skip: u64,

    /// Number of decompressed bytes to write (default: all remaining)
    #[arg(long)]
    count: Option<usize>,

    /// Compressed bytes pulled per decode step
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Cap on retained decompressed history in bytes
    #[arg(long)]
    history: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut file =
        File::open(&args.input).with_context(|| format!("open {}", args.input.display()))?;
    let file_len = file.metadata().context("stat input")?.len();
    if args.offset > file_len {
        anyhow::bail!("offset {} is past the end of a {} byte file", args.offset, file_len);
    }
    let length = args.length.unwrap_or(file_len - args.offset);
    file.seek(SeekFrom::Start(args.offset)).context("seek to payload")?;

    let history = match args.history {
        Some(max) => HistoryLimit::Bytes { max },
        None => HistoryLimit::Unbounded,
    };
    let config = StreamConfig::default()
        .with_block_size(args.block_size)
        .with_history(history);
    let mut stream = SeekableZlibStream::with_config(file, length, config)?;

    stream
        .seek_to(SeekFrom::Start(args.skip))
        .context("seek in payload")?;
    let data = match args.count {
        Some(count) => stream.read_up_to(count)?,
        None => stream.read_remaining()?,
    };
    info!(
        "wrote {} bytes from offset {} ({} compressed bytes consumed)",
        data.len(),
        stream.position() - data.len() as u64,
        stream.compressed_consumed()
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;
    Ok(())
}
