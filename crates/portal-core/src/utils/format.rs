use chrono::NaiveDate;

/// Format a plan fee for display, dropping a zero fraction: `3200` or `3200.50`
pub fn format_fee(fee: f64) -> String {
    if fee.fract() == 0.0 {
        format!("{:.0}", fee)
    } else {
        format!("{:.2}", fee)
    }
}

/// Format a plan-selection month as `June 2025`
pub fn format_month(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}

/// Format meal types like `BREAKFAST`, `LUNCH` as `Breakfast, Lunch`
pub fn format_meal_types(meal_types: &[String]) -> String {
    if meal_types.is_empty() {
        return "-".to_string();
    }
    meal_types
        .iter()
        .map(|m| {
            let lower = m.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(", ")
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fee() {
        assert_eq!(format_fee(3200.0), "3200");
        assert_eq!(format_fee(3200.5), "3200.50");
    }

    #[test]
    fn test_format_month() {
        let month = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_month(month), "June 2025");
    }

    #[test]
    fn test_format_meal_types() {
        let meals = vec!["BREAKFAST".to_string(), "dinner".to_string()];
        assert_eq!(format_meal_types(&meals), "Breakfast, Dinner");
        assert_eq!(format_meal_types(&[]), "-");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Annapurna Caterers", 12), "Annapurna...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
