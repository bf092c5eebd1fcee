use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, info, trace};

use super::header::Header;
use super::Summary;
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::huffman_coding::coder::CodingProvider;
use crate::tools::freq_count::INITIAL_CONTEXT;
use crate::{Error, Result};

/// Decompress source into sink. The coder must be the table the file was compressed with.
pub fn decompress<P, R, W>(coder: &P, mut source: R, sink: W) -> Result<Summary>
where
    P: CodingProvider,
    R: Read + Seek,
    W: Write,
{
    // The data length comes from the file length, so measure it before handing the source over
    let start = source.stream_position()?;
    let end = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(start))?;
    let file_len = end - start;

    let mut br = BitReader::new(source);
    let header = Header::from_byte(br.pop_byte()?)?;
    if header.coder != coder.coder_type() {
        return Err(Error::CoderMismatch {
            expected: coder.coder_type(),
            found: header.coder,
        });
    }
    let length = header.data_bits(file_len)?;
    debug!("Found a valid header, {} bits of data.", length);

    let mut bw = BitWriter::new(sink);
    let mut prev = INITIAL_CONTEXT;
    let mut bytes_out = 0_u64;
    // Bits of data consumed so far
    let mut bi = 0_u64;
    // The working byte holds the next 8 bits of data. The top wi bits are already loaded.
    let mut w = 0_u8;
    let mut wi = 0_usize;

    while bi < length {
        w = br.pop_rest(w, wi)?;
        let node = coder
            .decoding_lookup(prev, w)?
            .ok_or(Error::InvalidCodeword { bit_offset: bi })?;

        let symbol = match node.symbol() {
            Some(symbol) => {
                // Short codeword: keep the bits we did not use for the next lookup
                let depth = node.depth();
                w = w.checked_shl(depth as u32).unwrap_or(0);
                wi = 8 - depth;
                bi += depth as u64;
                symbol
            }
            None => {
                // Long codeword: the whole byte was used, continue down the tree a bit at a time
                bi += 8;
                let mut node = node;
                let symbol = loop {
                    let bit = br.pop_bit()?;
                    bi += 1;
                    node = node
                        .child(bit)
                        .ok_or(Error::InvalidCodeword { bit_offset: bi })?;
                    if let Some(symbol) = node.symbol() {
                        break symbol;
                    }
                };
                trace!("Long codeword of {} bits for 0x{:02x}.", node.depth(), symbol);
                w = 0;
                wi = 0;
                symbol
            }
        };
        bw.push_byte(symbol)?;
        bytes_out += 1;
        prev = symbol;
    }

    // Stopping anywhere but exactly on the last data bit means the input was damaged
    if bi != length {
        return Err(Error::LengthMismatch {
            expected: length,
            decoded: bi,
        });
    }
    bw.flush()?;

    let summary = Summary {
        bytes_in: file_len,
        bytes_out,
    };
    info!(
        "Decompressed {} bytes into {} bytes.",
        summary.bytes_in, summary.bytes_out
    );
    Ok(summary)
}
