//! Derived views over an in-memory expense list.
//!
//! Every function here is pure: the full list and any reference date come
//! in as arguments and the same inputs always produce the same outputs.
//! Clients re-run these after each wholesale refresh instead of patching
//! earlier results.

use chrono::{Datelike, Days, NaiveDate};

use crate::Expense;

/// Sentinel month key for absent or malformed dates.
pub const UNKNOWN_MONTH: &str = "unknown";

/// Wildcard value accepted by the month and category filters.
pub const ALL: &str = "all";

/// Extracts the `YYYY-MM` bucket key from a date string.
///
/// Anything that does not start with a zero-padded year-month pair is
/// bucketed under [`UNKNOWN_MONTH`] rather than leaking a half-parsed key.
#[must_use]
pub fn month_key(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
        return UNKNOWN_MONTH.to_string();
    };

    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if year.len() == 4 && month.len() == 2 && digits(year) && digits(month) {
        if let Ok(1..=12) = month.parse::<u32>() {
            return format!("{year}-{month}");
        }
    }
    UNKNOWN_MONTH.to_string()
}

/// Month key for the month containing `today`.
#[must_use]
pub fn current_month_key(today: NaiveDate) -> String {
    format!("{:04}-{:02}", today.year(), today.month())
}

/// Month keys present in the list, newest first, sentinel excluded.
///
/// Descending order is deliberate: the newest month is the default filter
/// selection in the client.
#[must_use]
pub fn distinct_months(expenses: &[Expense]) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for expense in expenses {
        let key = month_key(&expense.date);
        if key != UNKNOWN_MONTH && !months.contains(&key) {
            months.push(key);
        }
    }
    months.sort_unstable_by(|a, b| b.cmp(a));
    months
}

/// Records matching both filters; [`ALL`] is a wildcard for either.
///
/// Matching is exact string equality on the month key and the category.
#[must_use]
pub fn filtered_expenses<'a>(
    expenses: &'a [Expense],
    month: &str,
    category: &str,
) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|e| month == ALL || month_key(&e.date) == month)
        .filter(|e| category == ALL || e.category == category)
        .collect()
}

/// Totals for a single calendar month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlySummary {
    /// The month key the totals cover.
    pub month: String,
    /// Sum of all amounts in the month.
    pub total: i64,
    /// Category and its summed amount, in first-seen order among the
    /// matching records.
    pub by_category: Vec<(String, i64)>,
}

/// Sums one month of expenses with a per-category breakdown.
///
/// A `None` or [`ALL`] target falls back to the month containing `today`.
#[must_use]
pub fn monthly_summary(
    expenses: &[Expense],
    month: Option<&str>,
    today: NaiveDate,
) -> MonthlySummary {
    let target = match month {
        Some(m) if m != ALL => m.to_string(),
        _ => current_month_key(today),
    };

    let mut total = 0;
    let mut by_category: Vec<(String, i64)> = Vec::new();
    for expense in expenses {
        if month_key(&expense.date) != target {
            continue;
        }
        total += expense.amount;
        add_to_category(&mut by_category, &expense.category, expense.amount);
    }

    MonthlySummary {
        month: target,
        total,
        by_category,
    }
}

/// Aggregates for the Monday-start week containing a reference date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyBuckets {
    /// Monday of the reference week.
    pub week_start: NaiveDate,
    /// Category and its summed amount within `[week_start, reference]`,
    /// in first-seen order.
    pub by_category: Vec<(String, i64)>,
    /// Daily totals for the seven calendar days from `week_start`. Days
    /// after the reference date stay zero.
    pub daily: [i64; 7],
    /// `month/day` labels for the seven days, no zero padding.
    pub labels: [String; 7],
}

/// Buckets the reference week's expenses per category and per day.
///
/// The window runs from Monday of the week containing `reference` through
/// `reference` itself, both ends inclusive, compared at day granularity.
/// Dates that fail to parse fall outside every window.
#[must_use]
pub fn weekly_buckets(expenses: &[Expense], reference: NaiveDate) -> WeeklyBuckets {
    let week_start =
        reference - Days::new(u64::from(reference.weekday().num_days_from_monday()));

    let mut by_category: Vec<(String, i64)> = Vec::new();
    let mut daily = [0i64; 7];
    for expense in expenses {
        let Ok(date) = NaiveDate::parse_from_str(&expense.date, "%Y-%m-%d") else {
            continue;
        };
        if date < week_start || date > reference {
            continue;
        }
        add_to_category(&mut by_category, &expense.category, expense.amount);
        let slot = (date - week_start).num_days() as usize;
        daily[slot] += expense.amount;
    }

    let labels: [String; 7] = std::array::from_fn(|i| {
        let day = week_start + Days::new(i as u64);
        format!("{}/{}", day.month(), day.day())
    });

    WeeklyBuckets {
        week_start,
        by_category,
        daily,
        labels,
    }
}

fn add_to_category(totals: &mut Vec<(String, i64)>, category: &str, amount: i64) {
    match totals.iter_mut().find(|(name, _)| name == category) {
        Some((_, sum)) => *sum += amount,
        None => totals.push((category.to_string(), amount)),
    }
}

/// Human label for a month key: `2024-03` becomes `2024 年 03 月`.
///
/// Keys without a dash (including the unknown sentinel) pass through
/// unchanged.
#[must_use]
pub fn format_month_label(month_key: &str) -> String {
    match month_key.split_once('-') {
        Some((year, month)) => format!("{year} 年 {month} 月"),
        None => month_key.to_string(),
    }
}

/// Currency text: thousands-grouped digits behind the `NT$` prefix.
#[must_use]
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("NT$ {sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn expense(amount: i64, category: &str, date: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: format!("{category} {date}"),
            amount,
            date: date.to_string(),
            category: category.to_string(),
            created_at: 0,
        }
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn month_key_extracts_year_month() {
        assert_eq!(month_key("2024-03-15"), "2024-03");
        assert_eq!(month_key("2024-12-01"), "2024-12");
    }

    #[test]
    fn month_key_buckets_bad_input_under_sentinel() {
        assert_eq!(month_key(""), UNKNOWN_MONTH);
        assert_eq!(month_key("garbage"), UNKNOWN_MONTH);
        assert_eq!(month_key("2024"), UNKNOWN_MONTH);
        assert_eq!(month_key("2024-13-01"), UNKNOWN_MONTH);
        assert_eq!(month_key("2024-3-15"), UNKNOWN_MONTH);
        assert_eq!(month_key("24-03-15"), UNKNOWN_MONTH);
    }

    #[test]
    fn distinct_months_sorts_descending_and_drops_sentinel() {
        let expenses = vec![
            expense(10, "food", "2024-03-01"),
            expense(20, "food", "2024-05-02"),
            expense(30, "other", "not-a-date"),
            expense(40, "other", "2024-03-20"),
            expense(50, "other", ""),
        ];
        assert_eq!(distinct_months(&expenses), vec!["2024-05", "2024-03"]);
    }

    #[test]
    fn filtered_expenses_all_all_is_identity() {
        let expenses = vec![
            expense(10, "food", "2024-03-01"),
            expense(20, "shopping", "2024-04-02"),
            expense(30, "other", "bad-date"),
        ];
        let filtered = filtered_expenses(&expenses, ALL, ALL);
        assert_eq!(filtered.len(), expenses.len());
        for (got, want) in filtered.iter().zip(&expenses) {
            assert_eq!(*got, want);
        }
    }

    #[test]
    fn filtered_expenses_matches_both_filters_exactly() {
        let expenses = vec![
            expense(10, "food", "2024-03-01"),
            expense(20, "food", "2024-04-02"),
            expense(30, "shopping", "2024-03-05"),
        ];
        let filtered = filtered_expenses(&expenses, "2024-03", "food");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, 10);

        let by_month = filtered_expenses(&expenses, "2024-03", ALL);
        assert_eq!(by_month.len(), 2);
    }

    #[test]
    fn monthly_summary_totals_one_month() {
        let expenses = vec![
            expense(100, "food", "2024-03-01"),
            expense(50, "food", "2024-03-02"),
            expense(30, "other", "2024-04-01"),
        ];
        let summary = monthly_summary(&expenses, Some("2024-03"), day("2024-06-15"));
        assert_eq!(summary.month, "2024-03");
        assert_eq!(summary.total, 150);
        assert_eq!(summary.by_category, vec![("food".to_string(), 150)]);
    }

    #[test]
    fn monthly_summary_defaults_to_current_month() {
        let expenses = vec![
            expense(100, "food", "2024-06-01"),
            expense(30, "other", "2024-04-01"),
        ];
        let today = day("2024-06-15");
        let summary = monthly_summary(&expenses, None, today);
        assert_eq!(summary.month, "2024-06");
        assert_eq!(summary.total, 100);

        let wildcard = monthly_summary(&expenses, Some(ALL), today);
        assert_eq!(wildcard, summary);
    }

    #[test]
    fn monthly_summary_keeps_first_seen_category_order() {
        let expenses = vec![
            expense(10, "shopping", "2024-03-01"),
            expense(20, "food", "2024-03-02"),
            expense(30, "shopping", "2024-03-03"),
        ];
        let summary = monthly_summary(&expenses, Some("2024-03"), day("2024-03-31"));
        assert_eq!(
            summary.by_category,
            vec![("shopping".to_string(), 40), ("food".to_string(), 20)]
        );
    }

    #[test]
    fn weekly_buckets_starts_on_monday() {
        // 2024-05-15 is a Wednesday; the window is Mon 13th .. Wed 15th.
        let expenses = vec![
            expense(10, "food", "2024-05-13"),
            expense(20, "food", "2024-05-15"),
            expense(40, "shopping", "2024-05-12"), // Sunday before, out
            expense(80, "other", "2024-05-16"),    // after reference, out
        ];
        let buckets = weekly_buckets(&expenses, day("2024-05-15"));
        assert_eq!(buckets.week_start, day("2024-05-13"));
        assert_eq!(buckets.daily, [10, 0, 20, 0, 0, 0, 0]);
        assert_eq!(buckets.by_category, vec![("food".to_string(), 30)]);
    }

    #[test]
    fn weekly_buckets_sunday_reference_covers_full_week() {
        // 2024-05-19 is a Sunday; the window starts six days earlier.
        let expenses = vec![
            expense(10, "food", "2024-05-13"),
            expense(20, "food", "2024-05-19"),
        ];
        let buckets = weekly_buckets(&expenses, day("2024-05-19"));
        assert_eq!(buckets.week_start, day("2024-05-13"));
        assert_eq!(buckets.daily, [10, 0, 0, 0, 0, 0, 20]);
    }

    #[test]
    fn weekly_buckets_labels_are_month_slash_day() {
        let buckets = weekly_buckets(&[], day("2024-05-15"));
        assert_eq!(
            buckets.labels,
            ["5/13", "5/14", "5/15", "5/16", "5/17", "5/18", "5/19"]
        );
    }

    #[test]
    fn weekly_buckets_is_idempotent_and_conserves_totals() {
        let expenses = vec![
            expense(10, "food", "2024-05-13"),
            expense(25, "shopping", "2024-05-14"),
            expense(5, "food", "2024-05-15"),
            expense(99, "other", "bad-date"),
        ];
        let reference = day("2024-05-15");
        let first = weekly_buckets(&expenses, reference);
        let second = weekly_buckets(&expenses, reference);
        assert_eq!(first, second);

        let daily_total: i64 = first.daily.iter().sum();
        let category_total: i64 = first.by_category.iter().map(|(_, amt)| amt).sum();
        assert_eq!(daily_total, 40);
        assert_eq!(category_total, daily_total);
    }

    #[test]
    fn format_month_label_reads_as_year_month() {
        assert_eq!(format_month_label("2024-03"), "2024 年 03 月");
        assert_eq!(format_month_label(UNKNOWN_MONTH), UNKNOWN_MONTH);
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "NT$ 0");
        assert_eq!(format_amount(80), "NT$ 80");
        assert_eq!(format_amount(1234), "NT$ 1,234");
        assert_eq!(format_amount(1_234_567), "NT$ 1,234,567");
        assert_eq!(format_amount(-1234), "NT$ -1,234");
    }

    #[test]
    fn current_month_key_pads_month() {
        assert_eq!(current_month_key(day("2024-03-05")), "2024-03");
        assert_eq!(current_month_key(day("2024-11-30")), "2024-11");
    }
}
