use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// An owning byte string, typically the UTF-8 octets of a piece of text.
///
/// Bytes are treated as unsigned 8-bit integers and compared accordingly.
/// Strings are compared byte by byte, and of two strings where one is a
/// strict prefix of the other, the *longer* comes first in the ordering
/// (`"ballpark" < "ball"`). This is exactly the order in which keys must be
/// fed to [`Automaton::insert_sorted`](super::Automaton::insert_sorted), so
/// sorting a `Vec<ByteString>` produces a valid insertion sequence.
///
/// The type dereferences to `[u8]`; slicing serves as the substring
/// operation and may cut through UTF-8 character boundaries, so a slice of a
/// valid UTF-8 string is not guaranteed to be valid UTF-8 itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteString {
    bytes: Vec<u8>,
}

impl ByteString {
    /// Creates an empty byte string.
    pub fn new() -> Self {
        ByteString { bytes: Vec::new() }
    }

    /// Returns the length in bytes. For UTF-8 text this may differ from the
    /// number of characters, as a character occupies one to four bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the string contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the byte at position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not less than [`len`](Self::len). Reading outside the
    /// string is a programming error, not a recoverable condition.
    pub fn byte_at(&self, i: usize) -> u8 {
        self.bytes[i]
    }

    /// Returns the bytes as `&str` if they form valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the string and returns the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        ByteString {
            bytes: s.as_bytes().to_vec(),
        }
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        ByteString {
            bytes: s.into_bytes(),
        }
    }
}

impl From<&String> for ByteString {
    fn from(s: &String) -> Self {
        ByteString {
            bytes: s.as_bytes().to_vec(),
        }
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        ByteString {
            bytes: bytes.to_vec(),
        }
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString { bytes }
    }
}

impl From<&ByteString> for ByteString {
    fn from(s: &ByteString) -> Self {
        s.clone()
    }
}

/// Renders the bytes as text, substituting the replacement character for any
/// sequence that is not valid UTF-8.
impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

impl Ord for ByteString {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.bytes.iter();
        let mut rhs = other.bytes.iter();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                // A strict prefix sorts after the string it is a prefix of.
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
                (Some(a), Some(b)) => match a.cmp(b) {
                    Ordering::Equal => {}
                    ord => return ord,
                },
            }
        }
    }
}

impl PartialOrd for ByteString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_utf8() {
        let text = "böfc mufc";
        let bstr = ByteString::from(text);
        assert_eq!(bstr.as_str(), Some(text));
        assert_eq!(bstr.to_string(), text);
    }

    #[test]
    fn length_counts_bytes_not_characters() {
        // 'ö' takes two bytes in UTF-8.
        let bstr = ByteString::from("böfc mufc");
        assert_eq!(bstr.len(), 10);
        assert_eq!(std::str::from_utf8(&bstr[0..5]).unwrap(), "böfc");
        assert_eq!(std::str::from_utf8(&bstr[6..10]).unwrap(), "mufc");
    }

    #[test]
    fn byte_at_returns_raw_octets() {
        let bstr = ByteString::from("böfc mufc");
        assert_eq!(bstr.byte_at(0), 0x62);
        assert_eq!(bstr.byte_at(1), 0xc3);
        assert_eq!(bstr.byte_at(2), 0xb6);
        assert_eq!(bstr.byte_at(3), 0x66);
        assert_eq!(bstr.byte_at(4), 0x63);
        assert_eq!(bstr.byte_at(5), 0x20);
        assert_eq!(bstr.byte_at(9), 0x63);
    }

    #[test]
    #[should_panic]
    fn byte_at_panics_out_of_bounds() {
        let bstr = ByteString::from("böfc mufc");
        bstr.byte_at(10);
    }

    fn cmp(a: &str, b: &str) -> Ordering {
        ByteString::from(a).cmp(&ByteString::from(b))
    }

    #[test]
    fn ordering_is_unsigned_lexicographic() {
        assert_eq!(cmp("", ""), Ordering::Equal);
        assert_eq!(cmp("alma", "alma"), Ordering::Equal);
        assert_eq!(cmp("alma", "szilva"), Ordering::Less);
        assert_eq!(cmp("szilva", "alma"), Ordering::Greater);
        // Multi-byte characters compare by their raw bytes, so 'ö' (0xc3 0xb6)
        // sorts after any ASCII byte.
        assert_eq!(cmp("almoe", "almö"), Ordering::Less);
        assert_eq!(cmp("almö", "almoe"), Ordering::Greater);
    }

    #[test]
    fn a_strict_prefix_sorts_after_the_longer_string() {
        assert_eq!(cmp("alma", "almaszilva"), Ordering::Greater);
        assert_eq!(cmp("almaszilva", "alma"), Ordering::Less);
        assert_eq!(cmp("", "a"), Ordering::Greater);
        assert_eq!(cmp("a", ""), Ordering::Less);
    }

    #[test]
    fn sorting_produces_the_insertion_order() {
        let mut keys: Vec<ByteString> = ["ball", "ballpark", "bat", "batch"]
            .into_iter()
            .map(ByteString::from)
            .collect();
        keys.sort();
        let sorted: Vec<_> = keys.iter().filter_map(|k| k.as_str()).collect();
        assert_eq!(sorted, ["ballpark", "ball", "batch", "bat"]);
    }
}
