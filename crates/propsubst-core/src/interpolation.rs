//! Placeholder scanning
//!
//! Splits a raw value into literal text and `${key}` placeholders:
//! - `${key}` - reference to another key
//! - `${}` - reference to the empty key
//! - `${unclosed` - no closing brace, kept as literal text
//!
//! The key is everything between `${` and the next `}`. Braces do not nest.

/// One piece of a scanned raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output unchanged
    Literal(&'a str),
    /// A `${key}` token
    Placeholder {
        /// The referenced key
        key: &'a str,
        /// The full token, including `${` and `}`
        token: &'a str,
    },
}

/// Scanner over a single raw value
pub struct PlaceholderScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PlaceholderScanner<'a> {
    /// Create a new scanner for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Check if we're at end of input
    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Find the byte offset of the next placeholder start at or after `pos`
    fn next_start(&self) -> Option<usize> {
        self.input[self.pos..].find("${").map(|i| self.pos + i)
    }

    /// Parse the placeholder starting at `start`, if it is closed.
    /// Returns the segment and the offset just past its closing brace.
    fn placeholder_at(&self, start: usize) -> Option<(Segment<'a>, usize)> {
        let key_start = start + 2;
        let close = self.input[key_start..].find('}')? + key_start;
        let segment = Segment::Placeholder {
            key: &self.input[key_start..close],
            token: &self.input[start..=close],
        };
        Some((segment, close + 1))
    }
}

impl<'a> Iterator for PlaceholderScanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_eof() {
            return None;
        }

        let Some(start) = self.next_start() else {
            let rest = &self.input[self.pos..];
            self.pos = self.input.len();
            return Some(Segment::Literal(rest));
        };

        if start > self.pos {
            let leading = &self.input[self.pos..start];
            self.pos = start;
            return Some(Segment::Literal(leading));
        }

        match self.placeholder_at(start) {
            Some((segment, end)) => {
                self.pos = end;
                Some(segment)
            }
            // No closing brace anywhere after this point, so no later `${`
            // can close either.
            None => {
                let rest = &self.input[self.pos..];
                self.pos = self.input.len();
                Some(Segment::Literal(rest))
            }
        }
    }
}

/// Check if a string contains at least one complete `${...}` placeholder
pub fn contains_placeholder(input: &str) -> bool {
    PlaceholderScanner::new(input).any(|s| matches!(s, Segment::Placeholder { .. }))
}

/// Keys referenced by the placeholders of a raw value, in order of appearance
pub fn placeholder_keys(input: &str) -> Vec<&str> {
    PlaceholderScanner::new(input)
        .filter_map(|s| match s {
            Segment::Placeholder { key, .. } => Some(key),
            Segment::Literal(_) => None,
        })
        .collect()
}
