//! Line-oriented helpers shared by the OBJ and MTL parsers.

use std::io::BufRead;

use crate::error::{AssetError, AssetResult};

/// Feed every line of `reader` to `handle`, without its line terminator.
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn for_each_line<R: BufRead>(
    mut reader: R,
    mut handle: impl FnMut(&str),
) -> AssetResult<()> {
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        line_no += 1;
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| AssetError::Read {
                line: line_no,
                source,
            })?;
        if read == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        handle(line.trim_end_matches(['\n', '\r']));
    }
}

/// Parse floats into `out` in order. Parsing stops at the first bad or
/// missing token; the remaining slots keep their previous value.
pub(crate) fn read_floats<'a>(tokens: impl Iterator<Item = &'a str>, out: &mut [f32]) {
    for (slot, token) in out.iter_mut().zip(tokens) {
        match token.parse::<f32>() {
            Ok(value) => *slot = value,
            Err(_) => break,
        }
    }
}

/// Second whitespace-separated token of a directive line (`usemtl red` -> `red`).
pub(crate) fn directive_arg(line: &str) -> &str {
    line.split_whitespace().nth(1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_floats_stops_at_first_bad_token() {
        let mut out = [0.0; 3];
        read_floats("1.5 abc 3".split_whitespace(), &mut out);
        assert_eq!(out, [1.5, 0.0, 0.0]);
    }

    #[test]
    fn lines_are_stripped_of_crlf() {
        let mut lines = Vec::new();
        for_each_line("a\r\nb\nc".as_bytes(), |l| lines.push(l.to_string())).unwrap();
        assert_eq!(lines, ["a", "b", "c"]);
    }

    #[test]
    fn directive_arg_defaults_to_empty() {
        assert_eq!(directive_arg("g"), "");
        assert_eq!(directive_arg("usemtl  red  extra"), "red");
    }
}
