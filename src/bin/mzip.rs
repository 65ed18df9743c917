use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use mzip::{compress_file, decompress_file, is_container, CompressConfig, CompressStats, Error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mzip")]
#[command(about = "Compress a file with static Huffman coding into an MZIP container")]
#[command(version)]
struct Args {
    /// Input file (prompted for interactively when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (default: the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decompress an MZIP container instead of compressing
    #[arg(short, long, conflicts_with = "check")]
    decompress: bool,

    /// Check if input is an MZIP container and exit (0=container, 1=not, 2=error)
    #[arg(long, requires = "input")]
    check: bool,

    /// Number of threads for frequency counting (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Decode the container after writing it and compare with the source
    #[arg(long)]
    verify: bool,

    /// Show verbose statistics and debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Exit codes for --check mode
const EXIT_IS_CONTAINER: u8 = 0;
const EXIT_NOT_CONTAINER: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "mzip=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    if args.check {
        return run_check_mode(args);
    }

    let input = match &args.input {
        Some(path) => path.clone(),
        None => prompt_for_source(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    if args.decompress {
        return run_decompress(&input, args);
    }

    let config = CompressConfig {
        num_threads: args.threads,
        verify: args.verify,
        ..Default::default()
    };

    let start = Instant::now();
    let (output, stats) = compress_file(&input, args.output.as_deref(), &config)?;
    let elapsed = start.elapsed();

    if args.verbose {
        report(&output, &stats, elapsed);
    }

    Ok(0)
}

fn run_decompress(input: &Path, args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (output, bytes) = decompress_file(input, args.output.as_deref())?;
    let elapsed = start.elapsed();

    if args.verbose {
        eprintln!("Decompression complete:");
        eprintln!("  Output:           {}", output.display());
        eprintln!("  Bytes written:    {}", bytes);
        eprintln!("  Time:             {:.2?}", elapsed);
    }

    Ok(0)
}

fn run_check_mode(args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    let path = args.input.as_ref().ok_or("--check requires --input")?;
    let mut file = BufReader::new(File::open(path)?);

    let valid = is_container(&mut file)?;
    eprintln!("MZIP: {}", if valid { "yes" } else { "no" });

    if valid {
        Ok(EXIT_IS_CONTAINER)
    } else {
        Ok(EXIT_NOT_CONTAINER)
    }
}

fn report(output: &Path, stats: &CompressStats, elapsed: std::time::Duration) {
    eprintln!("Compression complete:");
    eprintln!("  Output:           {}", output.display());
    eprintln!("  Input bytes:      {}", stats.input_bytes);
    eprintln!("  Output bytes:     {}", stats.output_bytes);
    eprintln!("  Distinct symbols: {}", stats.distinct_symbols);
    eprintln!("  Encoded bits:     {}", stats.encoded_bits);
    eprintln!("  Padding bits:     {}", stats.padding_bits);
    eprintln!("  Ratio:            {:.3}", stats.ratio());
    eprintln!("  Time:             {:.2?}", elapsed);
    eprintln!(
        "  Throughput:       {:.1} MB/s",
        stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}

/// Ask for a base name and an extension until they name a readable file.
///
/// The library only reports `SourceUnreadable`; re-prompting lives here.
fn prompt_for_source<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    loop {
        let name = prompt(input, output, "Please enter the name of the file, without its extension")?;
        let extension = prompt(input, output, "Please enter the file's extension (e.g. .txt)")?;
        let path = PathBuf::from(format!("{}{}", name, extension));

        match mzip::open_source(&path) {
            Ok(_) => return Ok(path),
            Err(Error::SourceUnreadable(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "source not readable");
                writeln!(output, "The file name you entered was not valid")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    writeln!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("no more input while prompting for a file".into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
