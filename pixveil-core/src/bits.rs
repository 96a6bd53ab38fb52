//! Bit packing for terminated payloads.
//!
//! A payload on the wire is `message bytes || terminator`, serialized MSB
//! first. Decoders feed recovered bits into a [`TerminatorScanner`], which
//! checks for the terminator after every completed byte.

/// Serialize bytes to bits, most significant bit first.
pub fn to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Message bytes followed by the terminator.
pub fn terminated(message: &[u8], terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + terminator.len());
    out.extend_from_slice(message);
    out.extend_from_slice(terminator);
    out
}

/// Reassemble bytes from a bit stream and return everything before the
/// first terminator occurrence.
///
/// Returns `None` when the stream ends, or `max_bytes` bytes accumulate,
/// without a terminator match.
pub fn from_bits<I>(bits: I, terminator: &[u8], max_bytes: Option<usize>) -> Option<Vec<u8>>
where
    I: IntoIterator<Item = bool>,
{
    let mut scanner = TerminatorScanner::new(terminator, max_bytes);
    for bit in bits {
        match scanner.push(bit) {
            ScanState::Pending => {}
            ScanState::Found => return Some(scanner.into_message()),
            ScanState::Exhausted => return None,
        }
    }
    None
}

/// Result of feeding one bit into a [`TerminatorScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Keep feeding bits.
    Pending,
    /// The terminator was just completed.
    Found,
    /// The byte limit was reached without a terminator.
    Exhausted,
}

/// Incremental terminator matcher.
#[derive(Debug, Clone)]
pub struct TerminatorScanner<'t> {
    terminator: &'t [u8],
    max_bytes: Option<usize>,
    buffer: Vec<u8>,
    current: u8,
    bit_count: u8,
}

impl<'t> TerminatorScanner<'t> {
    pub fn new(terminator: &'t [u8], max_bytes: Option<usize>) -> Self {
        Self {
            terminator,
            max_bytes,
            buffer: Vec::new(),
            current: 0,
            bit_count: 0,
        }
    }

    /// Feed one bit.
    pub fn push(&mut self, bit: bool) -> ScanState {
        self.current = (self.current << 1) | bit as u8;
        self.bit_count += 1;
        if self.bit_count < 8 {
            return ScanState::Pending;
        }

        self.buffer.push(self.current);
        self.current = 0;
        self.bit_count = 0;

        if !self.terminator.is_empty() && self.buffer.ends_with(self.terminator) {
            return ScanState::Found;
        }
        match self.max_bytes {
            Some(limit) if self.buffer.len() >= limit => ScanState::Exhausted,
            _ => ScanState::Pending,
        }
    }

    /// Number of complete bytes accumulated so far.
    pub fn bytes_read(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes before the terminator. Only meaningful after [`ScanState::Found`].
    pub fn into_message(mut self) -> Vec<u8> {
        let keep = self.buffer.len().saturating_sub(self.terminator.len());
        self.buffer.truncate(keep);
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bits_msb_first() {
        assert_eq!(
            to_bits(&[0b1000_0001]),
            vec![true, false, false, false, false, false, false, true]
        );
        assert_eq!(to_bits(b"AB").len(), 16);
    }

    #[test]
    fn test_from_bits_finds_terminator() {
        let payload = terminated("héllo".as_bytes(), b"$!#");
        let bits = to_bits(&payload);
        let message = from_bits(bits, b"$!#", None).unwrap();
        assert_eq!(String::from_utf8(message).unwrap(), "héllo");
    }

    #[test]
    fn test_from_bits_ignores_trailing_garbage() {
        let mut bits = to_bits(&terminated(b"hi", b"$!@#END"));
        bits.extend(std::iter::repeat(true).take(64));
        assert_eq!(from_bits(bits, b"$!@#END", None).unwrap(), b"hi");
    }

    #[test]
    fn test_from_bits_stops_at_first_terminator() {
        let bits = to_bits(b"a$!#b$!#");
        assert_eq!(from_bits(bits, b"$!#", None).unwrap(), b"a");
    }

    #[test]
    fn test_from_bits_without_terminator() {
        let bits = to_bits(b"no marker here");
        assert_eq!(from_bits(bits, b"$!#", None), None);
    }

    #[test]
    fn test_from_bits_respects_limit() {
        let payload = terminated(&[b'x'; 100], b"$!#");
        let bits = to_bits(&payload);
        assert_eq!(from_bits(bits.clone(), b"$!#", Some(50)), None);
        assert_eq!(from_bits(bits, b"$!#", Some(103)).unwrap().len(), 100);
    }

    #[test]
    fn test_empty_message() {
        let bits = to_bits(b"$!#");
        assert_eq!(from_bits(bits, b"$!#", None).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_partial_byte_is_ignored() {
        let mut bits = to_bits(b"ok$!#");
        bits.truncate(bits.len() - 1);
        assert_eq!(from_bits(bits, b"$!#", None), None);
    }
}
