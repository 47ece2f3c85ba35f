//! Minimal `multipart/form-data` parsing for the insert endpoint.
//!
//! Only extracts the single file part the insert form sends; it does not
//! aim to be a general-purpose multipart reader.

/// Extracts `(filename, contents)` of the first file part found in `body`.
pub fn extract_file(body: &[u8], boundary: &str) -> Option<(String, Vec<u8>)> {
    let delimiter = format!("--{boundary}").into_bytes();

    for part in split_on(body, &delimiter) {
        if part.is_empty() || part == b"--\r\n" || part == b"--" {
            continue;
        }
        let header_end = find(part, b"\r\n\r\n")?;
        let header = std::str::from_utf8(&part[..header_end]).ok()?;
        let filename = header
            .split(';')
            .find_map(|field| field.trim().strip_prefix("filename=\""))
            .map(|rest| rest.trim_end_matches('"').to_string());

        if let Some(filename) = filename {
            let mut content = &part[header_end + 4..];
            if content.ends_with(b"\r\n") {
                content = &content[..content.len() - 2];
            }
            return Some((filename, content.to_vec()));
        }
    }

    None
}

fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = find(rest, needle) {
        parts.push(&rest[..pos]);
        rest = &rest[pos + needle.len()..];
    }
    parts.push(rest);
    parts
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
