//! Presentation helpers: byte-size strings and file-name parts.

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable size with binary (1024) steps and at most two decimals,
/// trailing zeros trimmed: `1536` -> `1.5 KB`, `0` -> `0 B`.
pub fn human_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Name without its final extension: `archive.tar.gz` -> `archive.tar`.
///
/// A trailing dot or a dot inside a directory part is not an extension.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// Final extension of a name, if it has one.
pub fn file_extension(name: &str) -> Option<&str> {
    let stem = file_stem(name);
    if stem.len() == name.len() {
        None
    } else {
        Some(&name[stem.len() + 1..])
    }
}
