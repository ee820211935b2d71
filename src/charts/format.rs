//! Tick and label formatting

/// `value` with comma thousands separators and a fixed number of decimals.
pub fn grouped(value: f64, decimals: usize) -> String {
    let digits = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Thousands label: `80.0` -> `"80.0k"`, `1234.5` -> `"1,234.5k"`.
pub fn thousands(value: f64) -> String {
    format!("{}k", grouped(value, 1))
}

/// Whole-percentage label for a fraction: `0.45` -> `"45%"`.
pub fn percent(fraction: f64) -> String {
    format!("{}%", grouped(fraction * 100.0, 0))
}

/// Pie wedge label: `33.333` -> `"33.3%"`.
pub fn pie_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Shortest plain rendering of a tick value.
pub fn plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let s = format!("{:.6}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Log-axis tick label: powers of ten as `10³`, anything else plain.
pub fn log_tick(value: f64) -> String {
    if value > 0.0 {
        let exponent = value.log10().round();
        if (value.log10() - exponent).abs() < 1e-9 {
            return decade(exponent as i32);
        }
    }
    plain(value)
}

/// Decade label for log axes: `3` -> `"10³"`, `-2` -> `"10⁻²"`.
pub fn decade(exponent: i32) -> String {
    let sup: String = exponent
        .to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect();
    format!("10{}", sup)
}

/// First character of a column name, used for amino-acid tick labels.
pub fn initial(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_labels() {
        assert_eq!(thousands(100.0), "100.0k");
        assert_eq!(thousands(80.0), "80.0k");
        assert_eq!(thousands(0.5), "0.5k");
        assert_eq!(thousands(1234.5), "1,234.5k");
        assert_eq!(thousands(0.0), "0.0k");
    }

    #[test]
    fn test_grouped_large_and_negative() {
        assert_eq!(grouped(1234567.0, 0), "1,234,567");
        assert_eq!(grouped(-2500.25, 2), "-2,500.25");
        assert_eq!(grouped(999.96, 1), "1,000.0");
    }

    #[test]
    fn test_percent_labels() {
        assert_eq!(percent(0.45), "45%");
        assert_eq!(percent(0.0), "0%");
        assert_eq!(percent(0.126), "13%");
        assert_eq!(pie_percent(100.0 / 3.0), "33.3%");
    }

    #[test]
    fn test_plain_trims_noise() {
        assert_eq!(plain(0.30000000000000004), "0.3");
        assert_eq!(plain(250.0), "250");
        assert_eq!(plain(-0.05), "-0.05");
    }

    #[test]
    fn test_decade_superscripts() {
        assert_eq!(decade(3), "10³");
        assert_eq!(decade(-2), "10⁻²");
        assert_eq!(decade(0), "10⁰");
    }

    #[test]
    fn test_log_tick() {
        assert_eq!(log_tick(1000.0), "10³");
        assert_eq!(log_tick(0.01), "10⁻²");
        assert_eq!(log_tick(2000.0), "2000");
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("A_pct"), "A");
        assert_eq!(initial(""), "");
    }
}
