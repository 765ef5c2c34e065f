//! Human readable formatting of sampled values

/// Size units, largest first. The last entry catches everything below 1 KB.
const SIZE_UNITS: [(u64, &str); 4] = [
    (1024 * 1024 * 1024, "GB"),
    (1024 * 1024, "MB"),
    (1024, "KB"),
    (0, "bytes"),
];

/// Format a byte count, e.g. `1.5 GB` or `512.0 bytes`
pub fn format_size(bytes: u64) -> String {
    for (threshold, unit) in SIZE_UNITS {
        if bytes >= threshold {
            let value = bytes as f64 / threshold.max(1) as f64;
            return format!("{:.1} {}", value, unit);
        }
    }
    format!("{} bytes", bytes)
}

/// Format per-core usage as `Core 1: 12.5%, Core 2: 0.0%`
pub fn format_cores(per_core: &[f32]) -> String {
    per_core
        .iter()
        .enumerate()
        .map(|(i, usage)| format!("Core {}: {:.1}%", i + 1, usage))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Arithmetic mean of per-core usage; zero when there are no cores
pub fn average(per_core: &[f32]) -> f32 {
    if per_core.is_empty() {
        return 0.0;
    }
    per_core.iter().sum::<f32>() / per_core.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0.0 bytes");
        assert_eq!(format_size(512), "512.0 bytes");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(200 * 1024 * 1024), "200.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
    }

    #[test]
    fn test_format_size_just_below_threshold() {
        // One byte short of a megabyte is still reported in KB
        assert_eq!(format_size(1024 * 1024 - 1), "1024.0 KB");
    }

    #[test]
    fn test_format_cores() {
        assert_eq!(format_cores(&[]), "");
        assert_eq!(format_cores(&[12.5]), "Core 1: 12.5%");
        assert_eq!(
            format_cores(&[100.0, 37.26, 0.0]),
            "Core 1: 100.0%, Core 2: 37.3%, Core 3: 0.0%"
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[50.0]), 50.0);
        assert_eq!(average(&[100.0, 50.0, 0.0, 10.0]), 40.0);
    }
}
