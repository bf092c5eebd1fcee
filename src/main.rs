//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
use std::fs::File;
use std::io::{self, Cursor, Seek, SeekFrom, Write};

use clap::Parser;
use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use markov_huffman::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use markov_huffman::compression::{compress::compress, decompress::decompress, Summary};
use markov_huffman::huffman_coding::coder::{Coder, CodingProvider};
use markov_huffman::tools::cli::{Args, Mode, Opts, Output};
use markov_huffman::Result;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let args = Args::parse();

    // Log to stderr, stdout may be carrying compressed data
    if let Err(e) = TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Unable to start logging: {}", e);
    }

    //----- Figure how what we need to do and go do it
    let result = Opts::try_from(args).and_then(|opts| run(&opts));
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("Done.");
}

/// Build or load the coding table, then compress or extract the input with it.
fn run(opts: &Opts) -> Result<()> {
    let mut input = File::open(&opts.input)?;

    let coder = match &opts.encoding {
        Some(path) => {
            let mut br = BitReader::new(File::open(path)?);
            Coder::read_table(opts.coder, &mut br)?
        }
        None => {
            let coder = Coder::from_input(opts.coder, &mut input)?;
            // The statistics pass consumed the input, start over for the coding pass
            input.seek(SeekFrom::Start(0))?;
            coder
        }
    };

    if opts.graph {
        // Keep stdout clean when it carries the output
        let graph = format!("{}\n{}", coder.table_listing(), coder.tree_graph());
        match opts.output {
            Output::File(_) => println!("{}", graph),
            Output::Stdout => eprintln!("{}", graph),
        }
    }

    if let Some(path) = &opts.dump_encoding {
        let mut bw = BitWriter::new(File::create(path)?);
        coder.write_table(&mut bw)?;
        bw.flush()?;
        info!("Saved {} encoding table to {}.", coder.coder_type(), path.display());
    }

    let summary = match (opts.mode, &opts.output) {
        (Mode::Compress, Output::File(path)) => compress(&coder, &mut input, File::create(path)?)?,
        (Mode::Compress, Output::Stdout) => {
            // The header is patched by seeking, which a terminal or pipe can't do
            let mut staged = Cursor::new(Vec::new());
            let summary = compress(&coder, &mut input, &mut staged)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(staged.get_ref())?;
            stdout.flush()?;
            summary
        }
        (Mode::Extract, Output::File(path)) => decompress(&coder, input, File::create(path)?)?,
        (Mode::Extract, Output::Stdout) => decompress(&coder, input, io::stdout().lock())?,
    };
    report(opts.mode, summary);
    Ok(())
}

fn report(mode: Mode, summary: Summary) {
    let (plain, packed) = match mode {
        Mode::Compress => (summary.bytes_in, summary.bytes_out),
        Mode::Extract => (summary.bytes_out, summary.bytes_in),
    };
    if plain > 0 {
        info!(
            "{}: {} bytes <-> {} bytes, {:.3} bits/byte.",
            mode,
            plain,
            packed,
            packed as f64 * 8.0 / plain as f64
        );
    }
}
