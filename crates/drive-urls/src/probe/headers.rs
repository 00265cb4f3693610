//! Parse raw HTTP response header lines collected from curl.

/// Parse collected header lines into `(name, value)` pairs.
///
/// When redirects were followed curl reports one header block per response;
/// each status line starts a new block and only the last block is kept.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }
    }

    headers
}
