//! USD amounts in en-US notation: `$1,234.56`, `-$5.00`.

const SYMBOL: &str = "$";

pub fn format_money(amount: f64) -> String {
    if amount.is_nan() {
        return format!("{SYMBOL}NaN");
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    if amount.is_infinite() {
        return format!("{sign}{SYMBOL}∞");
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    // -0.001 rounds to zero cents and must not print as "-$0.00".
    let sign = if cents == 0 { "" } else { sign };

    format!(
        "{sign}{SYMBOL}{}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
