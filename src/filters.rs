//! Money formatting for the transaction table and amount round-trips.
//!
//! Amounts are held as integer cents. Bank exports and the table both use the
//! French convention: comma as decimal separator, period between thousands,
//! euro sign as suffix.

/// Format cents as the decimal-comma text the bank export uses, e.g. `-12,50`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{},{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents for display, e.g. `-1.234,56 €`.
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let whole = format_with_thousands(abs_cents / 100, '.');
    format!("{}{},{:02}\u{a0}\u{20ac}", sign, whole, abs_cents % 100)
}

/// CSS class for coloring an amount cell.
pub fn amount_class(cents: i64) -> &'static str {
    if cents > 0 {
        "amount-positive"
    } else if cents < 0 {
        "amount-negative"
    } else {
        "amount-zero"
    }
}

fn format_with_thousands(n: u64, sep: char) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }

    result
}
