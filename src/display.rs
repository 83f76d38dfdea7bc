/// Formats a dollar amount with thousands separators and no cents.
///
/// - `40000.0` -> `"$40,000"`
/// - `0.0` -> `"$0"`
/// - negative values keep their sign: `"-$1,200"`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs() as u64))
}

/// Formats a measurement, dropping the fraction when it is a whole number
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats column-aligned tabular output with headers and rows.
///
/// Each column is padded to the maximum width of its values (including the header),
/// with columns separated by two spaces. The last column has no trailing padding.
pub fn format_columns(headers: &[&str], rows: &[Vec<String>]) -> String {
    let col_count = headers.len();
    let mut widths = vec![0usize; col_count];

    for (i, header) in headers.iter().enumerate() {
        widths[i] = header.chars().count();
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < col_count {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = format_row(headers, &widths);
    for row in rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(cells: &[impl AsRef<str>], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let parts: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let cell = cell.as_ref();
            if i == last {
                cell.to_string()
            } else {
                format!("{:<width$}", cell, width = widths[i])
            }
        })
        .collect();
    format!("{}\n", parts.join("  "))
}
