//! Output formatting for the usage report.
//!
//! The report is printed as JSON (the default, for monitoring agents), YAML,
//! or a short human-readable summary.

use clap::ValueEnum;
use gsa_rs::StoreUsage;
use std::io::Write;

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single-line JSON object.
    #[default]
    Json,
    /// YAML document.
    Yaml,
    /// Human-readable summary with SI sizes.
    Human,
}

/// Format a byte count with decimal SI units.
///
/// One decimal place is shown below ten units, none from ten upwards.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(246), "246 B");
/// assert_eq!(format_size(2468), "2.5 kB");
/// assert_eq!(format_size(12_345), "12 kB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exp = 0;
    let mut scale = 1u64;
    while exp < UNITS.len() - 1 && bytes / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }

    let value = (bytes as f64 / scale as f64 * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNITS[exp])
    } else {
        format!("{:.0} {}", value, UNITS[exp])
    }
}

/// Render the human-readable summary.
pub fn human_summary(usage: &StoreUsage) -> String {
    format!(
        "Containers: {}\nLayers: {} (of which Active: {})\n{}\n",
        format_size(usage.containers),
        format_size(usage.layers),
        format_size(usage.active),
        format_size(usage.total),
    )
}

/// Write the report to `out` in the given format.
pub fn write_usage<W: Write>(
    out: &mut W,
    usage: &StoreUsage,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(usage)?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(usage)?;
            write!(out, "{}", yaml)?;
        }
        OutputFormat::Human => {
            write!(out, "{}", human_summary(usage))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(usage: &StoreUsage, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_usage(&mut buf, usage, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(9), "9 B");
        assert_eq!(format_size(246), "246 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1000), "1.0 kB");
        assert_eq!(format_size(1234), "1.2 kB");
        assert_eq!(format_size(2468), "2.5 kB");
        assert_eq!(format_size(2714), "2.7 kB");
        assert_eq!(format_size(12_345), "12 kB");
        assert_eq!(format_size(1_500_000), "1.5 MB");
        assert_eq!(format_size(82_854_982), "83 MB");
        assert_eq!(format_size(2_500_000_000), "2.5 GB");
        assert_eq!(format_size(u64::MAX), "18 EB");
    }

    #[test]
    fn test_human_summary() {
        let usage = StoreUsage::new(246, 2468, 1234);
        assert_eq!(
            human_summary(&usage),
            "Containers: 246 B\nLayers: 2.5 kB (of which Active: 1.2 kB)\n2.7 kB\n"
        );
    }

    #[test]
    fn test_write_json() {
        let out = render(&StoreUsage::new(246, 2468, 1234), OutputFormat::Json);
        assert!(out.contains("\"total_bytes_containers\":246"));
        assert!(out.contains("\"total_bytes_store\":2714"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_write_yaml() {
        let out = render(&StoreUsage::new(1, 2, 2), OutputFormat::Yaml);
        let parsed: StoreUsage = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed, StoreUsage::new(1, 2, 2));
        assert!(out.contains("total_bytes_active_layers: 2"));
    }
}
