use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, info};

use super::header::{Header, PLACEHOLDER};
use super::Summary;
use crate::bitstream::bitwriter::BitWriter;
use crate::huffman_coding::coder::CodingProvider;
use crate::tools::freq_count::{for_each_chunk, INITIAL_CONTEXT};
use crate::Result;

/*
    The header can only be written once we know how many bits of the last data byte are used.
    A placeholder goes out first; once all the data has been flushed we seek back to where the
    output started and patch it. This is why the sink must support seeking.
*/

/// Compress everything in source into sink using the coder's table(s).
pub fn compress<P, R, W>(coder: &P, source: &mut R, mut sink: W) -> Result<Summary>
where
    P: CodingProvider,
    R: Read,
    W: Write + Seek,
{
    let start = sink.stream_position()?;
    let mut bw = BitWriter::new(sink);
    bw.push_byte(PLACEHOLDER)?;

    // Each byte is coded in the context of the one before it
    let mut prev = INITIAL_CONTEXT;
    let bytes_in = for_each_chunk(source, |chunk| {
        for &symbol in chunk {
            bw.push_codeword(coder.encoding(prev, symbol)?)?;
            prev = symbol;
        }
        Ok(())
    })?;

    // Record the partial byte before flush() rounds it up
    let header = Header::new(coder.coder_type(), bw.bit_index());
    bw.flush()?;

    let sink = bw.get_mut();
    let end = sink.stream_position()?;
    sink.seek(SeekFrom::Start(start))?;
    sink.write_all(&[header.to_byte()])?;
    sink.seek(SeekFrom::Start(end))?;
    sink.flush()?;
    debug!("Wrote header byte 0x{:02x}.", header.to_byte());

    let summary = Summary {
        bytes_in,
        bytes_out: end - start,
    };
    info!(
        "Compressed {} bytes into {} bytes ({} padding bits).",
        summary.bytes_in, summary.bytes_out, header.remainder
    );
    Ok(summary)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::compress;
    use crate::compression::header::Header;
    use crate::huffman_coding::coder::{Coder, CoderType, CodingProvider};
    use crate::huffman_coding::huffman::HuffmanTable;
    use crate::Error;

    fn compress_with(coder_type: CoderType, data: &[u8]) -> Vec<u8> {
        let coder = Coder::from_input(coder_type, &mut &data[..]).unwrap();
        let mut out = Cursor::new(Vec::new());
        compress(&coder, &mut &data[..], &mut out).unwrap();
        out.into_inner()
    }

    #[test]
    fn aaab_test() {
        let out = compress_with(CoderType::Huffman, b"aaab");
        assert_eq!(out.len(), 2);
        let header = Header::from_byte(out[0]).unwrap();
        assert_eq!(header.coder, CoderType::Huffman);
        assert_eq!(header.remainder, 4);
        // 'b' (count 1) sits on the left, 'a' on the right
        assert_eq!(out[1], 0b1110_0000);
    }

    #[test]
    fn empty_input_test() {
        for coder_type in [CoderType::Huffman, CoderType::MarkovHuffman] {
            let out = compress_with(coder_type, b"");
            assert_eq!(out.len(), 1);
            let header = Header::from_byte(out[0]).unwrap();
            assert_eq!(header, Header::new(coder_type, 0));
        }
    }

    #[test]
    fn markov_header_test() {
        let out = compress_with(CoderType::MarkovHuffman, b"aaab");
        // ' '->'a', 'a'->'a' twice and 'a'->'b' are one bit each
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], b'4');
    }

    #[test]
    fn remainder_test() {
        let data: Vec<u8> = (0..1000_u32).map(|i| (i * i % 7) as u8 + b'a').collect();
        for coder_type in [CoderType::Huffman, CoderType::MarkovHuffman] {
            let coder = Coder::from_input(coder_type, &mut data.as_slice()).unwrap();
            let mut prev = b' ';
            let mut bits = 0_u64;
            for &symbol in &data {
                bits += coder.encoding(prev, symbol).unwrap().len() as u64;
                prev = symbol;
            }

            let out = compress_with(coder_type, &data);
            let header = Header::from_byte(out[0]).unwrap();
            assert_eq!(header.coder, coder_type);
            assert_eq!(header.remainder as u64, (8 - bits % 8) % 8);
            assert_eq!((out.len() as u64 - 1) * 8 - header.remainder as u64, bits);
        }
    }

    #[test]
    fn missing_symbol_test() {
        let coder = Coder::Huffman(HuffmanTable::from_counts(&{
            let mut counts = vec![0_u64; 256];
            counts[b'a' as usize] = 1;
            counts
        }));
        let mut out = Cursor::new(Vec::new());
        assert!(matches!(
            compress(&coder, &mut &b"ab"[..], &mut out),
            Err(Error::MissingCodeword { prev: b'a', symbol: b'b' })
        ));
    }

    #[test]
    fn offset_sink_test() {
        // Output appended after existing data gets its header patched in place
        let mut out = Cursor::new(b"xyz".to_vec());
        out.set_position(3);
        let coder = Coder::from_input(CoderType::Huffman, &mut &b"aaab"[..]).unwrap();
        let summary = compress(&coder, &mut &b"aaab"[..], &mut out).unwrap();
        assert_eq!(summary.bytes_in, 4);
        assert_eq!(summary.bytes_out, 2);
        let out = out.into_inner();
        assert_eq!(&out[..3], b"xyz");
        assert_eq!(Header::from_byte(out[3]).unwrap().remainder, 4);
    }
}
