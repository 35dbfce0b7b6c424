//! OSC message encoder
//!
//! Builds a single Open Sound Control 1.0 message from an address pattern
//! and a typed argument list, independent of transport.
//!
//! # Wire Format
//!
//! ```text
//! ┌─────────────────────┬──────────────────────┬─────────────────────┐
//! │ Address pattern     │ "," + type tags      │ Arguments           │
//! │ OSC-string          │ OSC-string           │ 4-byte aligned each │
//! └─────────────────────┴──────────────────────┴─────────────────────┘
//! ```
//!
//! An OSC-string is the raw bytes followed by a NUL terminator, zero-padded
//! to the next 4-byte boundary (1-4 zero bytes total). Integers and floats
//! are 4 bytes big-endian; a float is the IEEE-754 bit pattern of the value,
//! not a numeric conversion. String arguments carry their own NUL and
//! padding, so the argument section stays 4-byte aligned throughout.
//!
//! Type tags: `i` = int32, `f` = float32, `s` = string.

use crate::error::{Error, Result};

/// Single OSC message under construction
///
/// Arguments accumulate in declared order. The serialized form is rebuilt
/// lazily: every mutation marks the packet dirty, and [`OscPacket::bytes`] /
/// [`OscPacket::size`] reserialize only when the cached buffer is stale.
/// Senders rebuild the whole message per event rather than mutating a
/// previous one, so `clear` + `set_address` must come before any arguments.
#[derive(Debug, Default)]
pub struct OscPacket {
    address: String,
    type_tags: String,
    args: Vec<u8>,
    buffer: Vec<u8>,
    dirty: bool,
}

impl OscPacket {
    /// Create an empty packet
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Default::default()
        }
    }

    /// Reset address, type tags, and argument bytes
    pub fn clear(&mut self) {
        self.address.clear();
        self.type_tags.clear();
        self.args.clear();
        self.dirty = true;
    }

    /// Set the address pattern
    ///
    /// Fails with [`Error::InvalidAddress`] if the address is empty, does
    /// not start with `/`, or contains a comma.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        if address.is_empty() || !address.starts_with('/') || address.contains(',') {
            return Err(Error::InvalidAddress(address.to_string()));
        }
        self.address.clear();
        self.address.push_str(address);
        self.dirty = true;
        Ok(())
    }

    /// Append a 32-bit integer argument (big-endian two's complement)
    pub fn add_int(&mut self, v: i32) {
        self.args.extend_from_slice(&v.to_be_bytes());
        self.type_tags.push('i');
        self.dirty = true;
    }

    /// Append a 32-bit float argument (IEEE-754 bit pattern, big-endian)
    pub fn add_float(&mut self, v: f32) {
        self.args.extend_from_slice(&v.to_be_bytes());
        self.type_tags.push('f');
        self.dirty = true;
    }

    /// Append a string argument (NUL-terminated, zero-padded to 4 bytes)
    pub fn add_string(&mut self, s: &str) {
        self.args.extend_from_slice(s.as_bytes());
        self.args.push(0);
        pad_to_4(&mut self.args);
        self.type_tags.push('s');
        self.dirty = true;
    }

    /// Serialized message bytes, rebuilt if stale
    pub fn bytes(&mut self) -> &[u8] {
        if self.dirty {
            self.rebuild();
        }
        &self.buffer
    }

    /// Serialized message length in bytes
    pub fn size(&mut self) -> usize {
        self.bytes().len()
    }

    /// Serialize address, type tags, and arguments into the cached buffer
    fn rebuild(&mut self) {
        self.buffer.clear();

        // Address pattern as OSC-string
        self.buffer.extend_from_slice(self.address.as_bytes());
        self.buffer.push(0);
        pad_to_4(&mut self.buffer);

        // Type tag string: a comma followed by one tag per argument
        self.buffer.push(b',');
        self.buffer.extend_from_slice(self.type_tags.as_bytes());
        self.buffer.push(0);
        pad_to_4(&mut self.buffer);

        // Arguments are already internally aligned; the final pad is a
        // no-op unless a future argument type breaks that invariant.
        self.buffer.extend_from_slice(&self.args);
        pad_to_4(&mut self.buffer);

        self.dirty = false;
    }
}

/// Zero-pad to the next 4-byte boundary (no-op when already aligned)
#[inline]
fn pad_to_4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal reference decoder used to verify round-trips. Returns the
    // address and the decoded (tag, value-as-string) argument list.
    fn decode(bytes: &[u8]) -> (String, Vec<(char, String)>) {
        fn osc_string(bytes: &[u8], pos: &mut usize) -> String {
            let start = *pos;
            let end = bytes[start..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| start + i)
                .expect("unterminated OSC string");
            let s = std::str::from_utf8(&bytes[start..end]).unwrap().to_string();
            // Skip the NUL and padding
            *pos = end + 1;
            while *pos % 4 != 0 {
                assert_eq!(bytes[*pos], 0, "non-zero padding byte");
                *pos += 1;
            }
            s
        }

        let mut pos = 0;
        let address = osc_string(bytes, &mut pos);
        let tags = osc_string(bytes, &mut pos);
        assert!(tags.starts_with(','), "type tag string must start with ','");

        let mut args = Vec::new();
        for tag in tags[1..].chars() {
            match tag {
                'i' => {
                    let v = i32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap());
                    args.push(('i', v.to_string()));
                    pos += 4;
                }
                'f' => {
                    let v = f32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap());
                    args.push(('f', v.to_string()));
                    pos += 4;
                }
                's' => {
                    let s = osc_string(bytes, &mut pos);
                    args.push(('s', s));
                }
                other => panic!("unexpected type tag {:?}", other),
            }
        }
        assert_eq!(pos, bytes.len(), "trailing bytes after arguments");
        (address, args)
    }

    #[test]
    fn test_address_validation() {
        let mut pkt = OscPacket::new();
        assert!(pkt.set_address("/gesture_event").is_ok());
        assert!(pkt.set_address("/a/b/c").is_ok());

        assert!(matches!(
            pkt.set_address(""),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            pkt.set_address("gesture_event"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            pkt.set_address("/gesture,event"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_serialized_length_is_multiple_of_4() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        assert_eq!(pkt.size() % 4, 0);

        // Strings of every padding class
        for s in ["", "a", "ab", "abc", "abcd", "hello world"] {
            let mut pkt = OscPacket::new();
            pkt.set_address("/t").unwrap();
            pkt.add_string(s);
            assert_eq!(pkt.size() % 4, 0, "string {:?} not 4-byte aligned", s);
        }

        // Mixed argument list on an unaligned address
        let mut pkt = OscPacket::new();
        pkt.set_address("/longer/address").unwrap();
        pkt.add_int(1);
        pkt.add_string("xy");
        pkt.add_float(0.25);
        assert_eq!(pkt.size() % 4, 0);
    }

    #[test]
    fn test_string_argument_padding() {
        // "open" + NUL = 5 bytes, padded to 8
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        pkt.add_string("open");
        // /t\0\0 (4) + ,s\0\0 (4) + open\0\0\0\0 (8)
        assert_eq!(pkt.size(), 16);
        assert_eq!(&pkt.bytes()[8..16], b"open\0\0\0\0");

        // "abc" + NUL = 4 bytes, already aligned
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        pkt.add_string("abc");
        assert_eq!(&pkt.bytes()[8..12], b"abc\0");
    }

    #[test]
    fn test_gesture_event_reference_bytes() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/gesture_event").unwrap();
        pkt.add_int(1000);
        pkt.add_int(0);
        pkt.add_int(1);
        pkt.add_int(1);
        pkt.add_string("open");
        pkt.add_float(0.5);
        pkt.add_float(0.5);
        pkt.add_float(1.2);
        pkt.add_float(0.0);

        let mut expected = Vec::new();
        expected.extend_from_slice(b"/gesture_event\0\0"); // 14 + NUL + pad = 16
        expected.extend_from_slice(b",iiiisffff\0\0"); // 10 + NUL + pad = 12
        expected.extend_from_slice(&1000i32.to_be_bytes());
        expected.extend_from_slice(&0i32.to_be_bytes());
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.extend_from_slice(b"open\0\0\0\0");
        expected.extend_from_slice(&0.5f32.to_be_bytes());
        expected.extend_from_slice(&0.5f32.to_be_bytes());
        expected.extend_from_slice(&1.2f32.to_be_bytes());
        expected.extend_from_slice(&0.0f32.to_be_bytes());

        assert_eq!(pkt.bytes(), expected.as_slice());
        assert_eq!(pkt.size(), 68);
    }

    #[test]
    fn test_round_trip_with_reference_decoder() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/gesture_event").unwrap();
        pkt.add_int(1000);
        pkt.add_int(0);
        pkt.add_int(1);
        pkt.add_int(1);
        pkt.add_string("open");
        pkt.add_float(0.5);
        pkt.add_float(0.5);
        pkt.add_float(1.2);
        pkt.add_float(0.0);

        let (address, args) = decode(pkt.bytes());
        assert_eq!(address, "/gesture_event");
        assert_eq!(
            args,
            vec![
                ('i', "1000".to_string()),
                ('i', "0".to_string()),
                ('i', "1".to_string()),
                ('i', "1".to_string()),
                ('s', "open".to_string()),
                ('f', "0.5".to_string()),
                ('f', "0.5".to_string()),
                ('f', "1.2".to_string()),
                ('f', "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_int_is_big_endian_twos_complement() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        pkt.add_int(-2);
        assert_eq!(&pkt.bytes()[8..12], &[0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_float_is_bit_pattern_not_conversion() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        pkt.add_float(1.2);
        // IEEE-754 single for 1.2 = 0x3F99999A
        assert_eq!(&pkt.bytes()[8..12], &[0x3F, 0x99, 0x99, 0x9A]);
    }

    #[test]
    fn test_lazy_rebuild_and_clear() {
        let mut pkt = OscPacket::new();
        pkt.set_address("/t").unwrap();
        pkt.add_int(1);
        let first_len = pkt.size();
        // Cached read returns the same bytes without another rebuild
        assert_eq!(pkt.size(), first_len);

        // A mutation invalidates the cache
        pkt.add_int(2);
        assert_eq!(pkt.size(), first_len + 4);

        pkt.clear();
        pkt.set_address("/u").unwrap();
        assert_eq!(pkt.size(), 8); // /u\0\0 + ,\0\0\0
        assert_eq!(pkt.bytes(), b"/u\0\0,\0\0\0");
    }
}
