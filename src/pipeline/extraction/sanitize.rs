/// Remove zero-width and byte-order-mark characters left behind by the
/// clipboard capture (mostly U+200C zero-width non-joiners).
pub fn remove_zero_width(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}'..='\u{200F}' // Zero-width chars
                | '\u{2060}'            // Word joiner
                | '\u{FEFF}'            // BOM
            )
        })
        .collect()
}

/// Split text into lines on `\n`, `\r\n` or a lone `\r`.
/// A trailing line terminator does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized.lines().map(str::to_string).collect()
}

/// Scrub capture artifacts and split into lines, ready for segmentation.
pub fn prepare_lines(raw: &str) -> Vec<String> {
    split_lines(&remove_zero_width(raw))
}
