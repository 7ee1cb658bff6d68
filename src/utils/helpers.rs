// utils/helpers.rs
use chrono::{DateTime, Utc};

/// Formater une date pour l'affichage
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formatter une taille en octets lisible
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / base.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes_f64 / base.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}
