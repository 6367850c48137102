//! Human-readable descriptions of five-field cron expressions.
//!
//! Pure formatting, no validation: callers validate through
//! [`crate::schedule::validate_expression`] first if they care.

/// Render a cron expression as human text, e.g. `"every 15 minutes, at 2 AM"`.
pub fn describe_expression(expr: &str) -> String {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if parts.len() < 5 {
        return "Invalid cron expression".to_string();
    }

    let (minute, hour, day, month, weekday) = (parts[0], parts[1], parts[2], parts[3], parts[4]);
    let mut pieces: Vec<String> = Vec::new();

    // Minute
    if minute == "*" {
        pieces.push("every minute".to_string());
    } else if let Some(interval) = minute.split('/').nth(1) {
        pieces.push(format!("every {} minutes", interval));
    } else if minute.contains(',') {
        pieces.push(format!("at minutes {}", minute));
    } else {
        pieces.push(format!("at minute {}", minute));
    }

    // Hour
    if hour != "*" {
        if let Some(interval) = hour.split('/').nth(1) {
            pieces.push(format!("every {} hours", interval));
        } else if hour.contains(',') {
            pieces.push(format!("at hours {}", hour));
        } else if let Ok(h) = hour.parse::<u32>() {
            let text = match h {
                0 => "at midnight".to_string(),
                12 => "at noon".to_string(),
                h if h < 12 => format!("at {} AM", h),
                h => format!("at {} PM", h - 12),
            };
            pieces.push(text);
        } else {
            pieces.push(format!("at hour {}", hour));
        }
    }

    // Day of month
    if day != "*" {
        if let Some(interval) = day.split('/').nth(1) {
            pieces.push(format!("every {} days", interval));
        } else {
            pieces.push(format!("on day {}", day));
        }
    }

    // Month
    if month != "*" {
        pieces.push(match month_name(month) {
            Some(name) => format!("in {}", name),
            None => format!("in month {}", month),
        });
    }

    // Day of week
    if weekday != "*" {
        pieces.push(match weekday_name(weekday) {
            Some(name) => format!("on {}", name),
            None => format!("on weekday {}", weekday),
        });
    }

    if pieces.is_empty() {
        return "Every minute".to_string();
    }
    pieces.join(", ")
}

fn month_name(month: &str) -> Option<&'static str> {
    Some(match month {
        "1" => "January",
        "2" => "February",
        "3" => "March",
        "4" => "April",
        "5" => "May",
        "6" => "June",
        "7" => "July",
        "8" => "August",
        "9" => "September",
        "10" => "October",
        "11" => "November",
        "12" => "December",
        _ => return None,
    })
}

fn weekday_name(weekday: &str) -> Option<&'static str> {
    Some(match weekday {
        "0" | "7" => "Sunday",
        "1" => "Monday",
        "2" => "Tuesday",
        "3" => "Wednesday",
        "4" => "Thursday",
        "5" => "Friday",
        "6" => "Saturday",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_common_schedules() {
        assert_eq!(describe_expression("0 2 * * *"), "at minute 0, at 2 AM");
        assert_eq!(
            describe_expression("*/15 * * * *"),
            "every 15 minutes"
        );
        assert_eq!(
            describe_expression("0 3 * * 0"),
            "at minute 0, at 3 AM, on Sunday"
        );
        assert_eq!(
            describe_expression("0 0 1 1 *"),
            "at minute 0, at midnight, on day 1, in January"
        );
    }

    #[test]
    fn invalid_field_count_is_flagged() {
        assert_eq!(describe_expression("0 2 *"), "Invalid cron expression");
    }
}
