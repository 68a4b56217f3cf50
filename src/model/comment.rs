//! Per-row annotation text.

use crate::model::addr;

/// Looks up the annotation shown next to a row. Implementations must be
/// pure lookups; an empty string means "no comment".
pub trait CommentProvider {
    fn comment(&self, address: addr::Address, size: usize) -> String;
}

impl<F: Fn(addr::Address, usize) -> String> CommentProvider for F {
    fn comment(&self, address: addr::Address, size: usize) -> String {
        self(address, size)
    }
}

/// Comments from a fixed table of `(start, end, text)` address ranges. A row
/// gets the text of every range it overlaps, joined with "; ".
#[derive(Debug, Clone, Default)]
pub struct RangeComments {
    ranges: Vec<(addr::Address, addr::Address, String)>,
}

impl RangeComments {
    pub fn new() -> RangeComments {
        RangeComments::default()
    }

    pub fn insert(&mut self, start: addr::Address, end: addr::Address, text: impl Into<String>) {
        self.ranges.push((start, end, text.into()));
    }
}

impl CommentProvider for RangeComments {
    fn comment(&self, address: addr::Address, size: usize) -> String {
        let row_end = address.saturating_add(size as u64);
        itertools::join(
            self.ranges.iter()
                .filter(|(start, end, _)| *start < row_end && *end > address)
                .map(|(_, _, text)| text.as_str()),
            "; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_provider() {
        let provider = |address: addr::Address, size: usize| format!("{:x}+{}", address, size);
        assert_eq!(provider.comment(0x40, 16), "40+16");
    }

    #[test]
    fn range_comments() {
        let mut comments = RangeComments::new();
        comments.insert(0x00, 0x04, "magic");
        comments.insert(0x04, 0x08, "version");
        comments.insert(0x20, 0x40, "payload");

        assert_eq!(comments.comment(0x00, 16), "magic; version");
        assert_eq!(comments.comment(0x10, 16), "");
        assert_eq!(comments.comment(0x30, 16), "payload");
        assert_eq!(comments.comment(0x40, 16), "");
    }
}
