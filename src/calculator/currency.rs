/// Formats an amount with Indian digit grouping: the last three digits,
/// then groups of two (`1234567 -> "12,34,567"`).
///
/// Amounts are rounded to whole rupees.
pub fn format_indian(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, last_three) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_rupees(amount: f64) -> String {
    format!("₹{}", format_indian(amount))
}
