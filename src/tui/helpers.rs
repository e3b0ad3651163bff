/// Formats a byte count with a binary unit, e.g. `1.5 KB`
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if size < 1024 {
        return format!("{} B", size);
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = *next;
    }
    format!("{:.1} {}", value, unit)
}

/// Fraction of files decided, in `0.0..=1.0`
pub fn calculate_progress(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (processed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Last component of a path, for the sidebar
pub fn short_dir_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
