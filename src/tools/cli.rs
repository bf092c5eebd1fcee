use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::huffman_coding::coder::CoderType;
use crate::{Error, Result};

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Huffman and Markov-Huffman byte compressor",
    long_about = None)]
pub struct Args {
    /// File to compress (or extract with -x)
    #[clap()]
    input: PathBuf,

    /// Output file. Without it output goes to the terminal
    #[clap(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Use a simple Huffman code instead of Markov-Huffman
    #[clap(short = 's', long = "simple")]
    simple: bool,

    /// Read the coding table from this encoding file instead of building it from the input
    #[clap(short = 'e', long = "encoding")]
    encoding: Option<PathBuf>,

    /// Write the coding table to this encoding file
    #[clap(short = 'd', long = "dump-encoding")]
    dump_encoding: Option<PathBuf>,

    /// Print the coding tables and their trees in Graphviz format
    #[clap(short = 'g', long = "graph")]
    graph: bool,

    /// Extract (decompress) the input file. Requires -e
    #[clap(short = 'x', long = "extract")]
    extract: bool,

    /// Sets verbosity. -v shows progress, -vvv is chatty
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[clap(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Log level requested on the command line.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Compress or Extract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Extract,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

/// Define all user settable options to control program behavior
#[derive(Debug)]
pub struct Opts {
    /// File to read for input
    pub input: PathBuf,
    /// Location where output is sent
    pub output: Output,
    /// Plain Huffman or Markov-Huffman
    pub coder: CoderType,
    /// Encoding file to load the table from
    pub encoding: Option<PathBuf>,
    /// Encoding file to save the table to
    pub dump_encoding: Option<PathBuf>,
    /// Print tables and trees
    pub graph: bool,
    /// Compress/Extract
    pub mode: Mode,
}

impl TryFrom<Args> for Opts {
    type Error = Error;

    /// Check the option combination and build the run options.
    fn try_from(args: Args) -> Result<Self> {
        if args.encoding.is_some() && args.dump_encoding.is_some() {
            return Err(Error::Usage(
                "an encoding file can not be both loaded (-e) and dumped (-d)".to_string(),
            ));
        }
        if args.extract && args.encoding.is_none() {
            return Err(Error::Usage(
                "extracting (-x) requires the encoding file (-e) used to compress".to_string(),
            ));
        }
        Ok(Self {
            input: args.input,
            output: args.output.map_or(Output::Stdout, Output::File),
            coder: if args.simple {
                CoderType::Huffman
            } else {
                CoderType::MarkovHuffman
            },
            encoding: args.encoding,
            dump_encoding: args.dump_encoding,
            graph: args.graph,
            mode: if args.extract {
                Mode::Extract
            } else {
                Mode::Compress
            },
        })
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use clap::Parser;
    use log::LevelFilter;

    use super::{Args, Mode, Opts, Output};
    use crate::huffman_coding::coder::CoderType;
    use crate::Error;

    fn opts(line: &[&str]) -> crate::Result<Opts> {
        let args = Args::try_parse_from(line).unwrap();
        Opts::try_from(args)
    }

    #[test]
    fn defaults_test() {
        let opts = opts(&["mh", "in.txt"]).unwrap();
        assert_eq!(opts.input, PathBuf::from("in.txt"));
        assert_eq!(opts.output, Output::Stdout);
        assert_eq!(opts.coder, CoderType::MarkovHuffman);
        assert_eq!(opts.mode, Mode::Compress);
        assert!(opts.encoding.is_none());
        assert!(!opts.graph);
    }

    #[test]
    fn compress_test() {
        let opts = opts(&["mh", "in.txt", "-s", "-o", "out.mh", "-d", "t.enc", "-g"]).unwrap();
        assert_eq!(opts.coder, CoderType::Huffman);
        assert_eq!(opts.output, Output::File(PathBuf::from("out.mh")));
        assert_eq!(opts.dump_encoding, Some(PathBuf::from("t.enc")));
        assert!(opts.graph);
    }

    #[test]
    fn extract_test() {
        let opts = opts(&["mh", "in.mh", "--extract", "--encoding", "t.enc"]).unwrap();
        assert_eq!(opts.mode, Mode::Extract);
        assert_eq!(opts.encoding, Some(PathBuf::from("t.enc")));
    }

    #[test]
    fn usage_test() {
        assert!(matches!(
            opts(&["mh", "in.txt", "-e", "a.enc", "-d", "b.enc"]),
            Err(Error::Usage(_))
        ));
        assert!(matches!(opts(&["mh", "in.mh", "-x"]), Err(Error::Usage(_))));
        assert!(Args::try_parse_from(["mh"]).is_err());
        assert!(Args::try_parse_from(["mh", "in.txt", "-v", "-q"]).is_err());
    }

    #[test]
    fn verbosity_test() {
        fn level(line: &[&str]) -> LevelFilter {
            Args::try_parse_from(line).unwrap().log_level()
        }
        assert_eq!(level(&["mh", "f"]), LevelFilter::Warn);
        assert_eq!(level(&["mh", "f", "-v"]), LevelFilter::Info);
        assert_eq!(level(&["mh", "f", "-vv"]), LevelFilter::Debug);
        assert_eq!(level(&["mh", "f", "-vvvv"]), LevelFilter::Trace);
        assert_eq!(level(&["mh", "f", "-q"]), LevelFilter::Error);
    }
}
