//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only (RFC 7233). Multi-range and other units fall
//! back to the full representation, which is always a valid answer.

/// Outcome of interpreting a `Range` header against a representation length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// Serve the whole body (no header, unsupported or malformed header)
    Full,
    /// Serve `start..=end`, both inclusive and within bounds
    Partial { start: u64, end: u64 },
    /// Respond 416 with `Content-Range: bytes */len`
    Unsatisfiable,
}

impl ByteRange {
    /// Interpret `header` for a body of `len` bytes
    ///
    /// # Examples
    /// - `bytes=0-99` first hundred bytes
    /// - `bytes=100-` from offset 100 to the end
    /// - `bytes=-500` last 500 bytes
    pub fn parse(header: Option<&str>, len: u64) -> Self {
        let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
            return Self::Full;
        };
        if spec.contains(',') {
            return Self::Full;
        }
        let Some((first, last)) = spec.split_once('-') else {
            return Self::Full;
        };
        let (first, last) = (first.trim(), last.trim());

        if first.is_empty() {
            return Self::suffix(last, len);
        }

        let Ok(start) = first.parse::<u64>() else {
            return Self::Full;
        };
        let end = if last.is_empty() {
            None
        } else {
            match last.parse::<u64>() {
                Ok(e) => Some(e),
                Err(_) => return Self::Full,
            }
        };

        if let Some(e) = end {
            if e < start {
                return Self::Full;
            }
        }
        if start >= len {
            return Self::Unsatisfiable;
        }

        let end = end.map_or(len - 1, |e| e.min(len - 1));
        Self::Partial { start, end }
    }

    /// `bytes=-N`: the last N bytes, or the whole body when N exceeds it
    fn suffix(count: &str, len: u64) -> Self {
        let Ok(count) = count.parse::<u64>() else {
            return Self::Full;
        };
        if count == 0 || len == 0 {
            return Self::Unsatisfiable;
        }
        Self::Partial {
            start: len.saturating_sub(count),
            end: len - 1,
        }
    }
}
