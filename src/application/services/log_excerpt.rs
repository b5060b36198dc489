//! Extraction of displayable lines from a multiplexed log stream

/// Size of the frame header prefixed to each multiplexed line
pub const FRAME_HEADER_LEN: usize = 8;

/// Lines pulled from a log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExcerpt {
    /// Kept lines, each terminated by `\n`
    pub text: String,
    /// Lines scanned, kept or dropped
    pub line_count: usize,
}

impl LogExcerpt {
    /// Scan up to `limit` lines of `raw`, stripping the frame header from each.
    ///
    /// Lines no longer than the header carry no payload and are dropped, but
    /// still count towards `limit`.
    pub fn extract(raw: &[u8], limit: usize) -> Self {
        let mut text = String::new();
        let mut line_count = 0;

        for line in raw.split_inclusive(|b| *b == b'\n').take(limit) {
            let line = trim_line_ending(line);
            if line.len() > FRAME_HEADER_LEN {
                text.push_str(&String::from_utf8_lossy(&line[FRAME_HEADER_LEN..]));
                text.push('\n');
            }
            line_count += 1;
        }

        Self { text, line_count }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &str) -> Vec<u8> {
        let mut out = vec![1, 0, 0, 0];
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(payload.as_bytes());
        out
    }

    fn stream(lines: &[&str]) -> Vec<u8> {
        lines.iter().flat_map(|l| frame(&format!("{l}\n"))).collect()
    }

    #[test]
    fn strips_headers_and_counts_lines() {
        let raw = stream(&["one", "two", "three", "four", "five"]);
        let excerpt = LogExcerpt::extract(&raw, 5);
        assert_eq!(excerpt.text, "one\ntwo\nthree\nfour\nfive\n");
        assert_eq!(excerpt.line_count, 5);
    }

    #[test]
    fn stops_at_limit() {
        let raw = stream(&["a1", "a2", "a3", "a4"]);
        let excerpt = LogExcerpt::extract(&raw, 2);
        assert_eq!(excerpt.text, "a1\na2\n");
        assert_eq!(excerpt.line_count, 2);
    }

    #[test]
    fn short_frames_are_dropped_but_counted() {
        let mut raw = b"tiny\n".to_vec();
        raw.extend(stream(&["kept"]));
        let excerpt = LogExcerpt::extract(&raw, 10);
        assert_eq!(excerpt.text, "kept\n");
        assert_eq!(excerpt.line_count, 2);
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let excerpt = LogExcerpt::extract(b"", 10);
        assert!(excerpt.is_empty());
        assert_eq!(excerpt.line_count, 0);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let raw = frame("windows\r\n");
        assert_eq!(LogExcerpt::extract(&raw, 10).text, "windows\n");
    }
}
