use std::io::{ErrorKind, Read};

use crate::bitstream::BUFFER_SIZE;
use crate::Result;

/// Byte assumed to precede the first byte of input.
pub const INITIAL_CONTEXT: u8 = b' ';

/// Returns a frequency count of every byte value in the source.
pub fn count_symbols<R: Read>(source: &mut R) -> Result<Vec<u64>> {
    let mut freqs = vec![0_u64; 256];
    for_each_chunk(source, |chunk| {
        chunk.iter().for_each(|&el| freqs[el as usize] += 1);
        Ok(())
    })?;
    Ok(freqs)
}

/// Returns counts of every (previous byte, byte) pair in the source, indexed [prev][byte].
pub fn count_transitions<R: Read>(source: &mut R) -> Result<Vec<[u64; 256]>> {
    let mut freqs = vec![[0_u64; 256]; 256];
    let mut prev = INITIAL_CONTEXT;
    for_each_chunk(source, |chunk| {
        for &el in chunk {
            freqs[prev as usize][el as usize] += 1;
            prev = el;
        }
        Ok(())
    })?;
    Ok(freqs)
}

/// Stream the source through a staging buffer until it is exhausted, handing each chunk to f.
/// Returns the number of bytes read.
pub fn for_each_chunk<R, F>(source: &mut R, mut f: F) -> Result<u64>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut buf = vec![0_u8; BUFFER_SIZE];
    let mut total = 0_u64;
    loop {
        match source.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => {
                f(&buf[..n])?;
                total += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{count_symbols, count_transitions};

    #[test]
    fn symbols_test() {
        let mut data = "Making a silly test.".as_bytes();
        let freqs = count_symbols(&mut data).unwrap();
        assert_eq!(freqs[b'a' as usize], 2);
        assert_eq!(freqs[b'l' as usize], 2);
        assert_eq!(freqs[b' ' as usize], 3);
        assert_eq!(freqs[b'z' as usize], 0);
        assert_eq!(freqs.iter().sum::<u64>(), 20);
    }

    #[test]
    fn transitions_test() {
        let mut data = "aaab".as_bytes();
        let freqs = count_transitions(&mut data).unwrap();
        assert_eq!(freqs[b' ' as usize][b'a' as usize], 1);
        assert_eq!(freqs[b'a' as usize][b'a' as usize], 2);
        assert_eq!(freqs[b'a' as usize][b'b' as usize], 1);
        assert_eq!(freqs.iter().flat_map(|row| row.iter()).sum::<u64>(), 4);
    }

    #[test]
    fn large_input_test() {
        // Spans several staging buffers, so the context must carry across chunks
        let data: Vec<u8> = (0..100_000_u32).map(|i| (i % 2) as u8).collect();
        let freqs = count_transitions(&mut data.as_slice()).unwrap();
        assert_eq!(freqs[b' ' as usize][0], 1);
        assert_eq!(freqs[0][1], 50_000);
        assert_eq!(freqs[1][0], 49_999);
    }

    #[test]
    fn empty_test() {
        let mut data: &[u8] = &[];
        assert!(count_symbols(&mut data).unwrap().iter().all(|&c| c == 0));
    }
}
