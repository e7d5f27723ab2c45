use crate::models::NO_DATE;

const VISIT_DATE_LABEL: &str = "Visit Date:";

/// Most recent and earliest (intake) visit dates of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDates {
    pub recent: String,
    pub intake: String,
}

impl Default for VisitDates {
    fn default() -> Self {
        Self {
            recent: NO_DATE.to_string(),
            intake: NO_DATE.to_string(),
        }
    }
}

/// Collect the date token (third word) of every `Visit Date:` line.
///
/// Operates on the raw lines so the carried-over encounter headers are not
/// counted twice. Records are newest-first: the first date is the recent
/// visit, the last one the intake visit. Fewer than two dates leaves both
/// at the sentinel.
pub fn visit_dates<S: AsRef<str>>(lines: &[S]) -> VisitDates {
    let dates: Vec<&str> = lines
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|line| line.starts_with(VISIT_DATE_LABEL))
        .filter_map(|line| line.split_whitespace().nth(2))
        .collect();

    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if dates.len() >= 2 => VisitDates {
            recent: first.to_string(),
            intake: last.to_string(),
        },
        _ => VisitDates::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_is_recent_last_is_intake() {
        let lines = [
            "Visit Date: 2023-05-01 10:30",
            "Today's Weight: 250 lbs",
            "Visit Date: 2022-11-15 09:00",
            "Visit Date: 2021-01-12 14:45",
        ];
        let dates = visit_dates(&lines);
        assert_eq!(dates.recent, "2023-05-01");
        assert_eq!(dates.intake, "2021-01-12");
    }

    #[test]
    fn single_date_falls_back_to_sentinel() {
        let dates = visit_dates(&["Visit Date: 2023-05-01"]);
        assert_eq!(dates, VisitDates::default());
        assert_eq!(dates.recent, "0000-00-00");
    }

    #[test]
    fn no_dates() {
        let lines: [&str; 0] = [];
        assert_eq!(visit_dates(&lines), VisitDates::default());
    }

    #[test]
    fn label_without_token_is_ignored() {
        let lines = ["Visit Date:", "Visit Date: 2023-05-01", "Visit Date: 2020-02-02"];
        let dates = visit_dates(&lines);
        assert_eq!(dates.recent, "2023-05-01");
        assert_eq!(dates.intake, "2020-02-02");
    }

    #[test]
    fn label_must_start_the_line() {
        let lines = ["Last Visit Date: 2019-01-01", "Visit Date: 2023-05-01"];
        assert_eq!(visit_dates(&lines), VisitDates::default());
    }
}
