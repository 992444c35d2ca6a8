//! Display rendering of session classifications.
//!
//! Turns raw timing fields into the strings shown next to each driver
//! (`1:32:15.804`, `+4.112s`, `+1 LAP`, `DNF`) and fixes the order in
//! which a session's results are listed.

use std::cmp::Ordering;

use super::{FormattedResult, ResultLine};
use crate::data::SessionResult;

pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const UNKNOWN_CIRCUIT: &str = "Unknown Circuit";

/// Team name to display, falling back to [`UNKNOWN_TEAM`] when missing or blank
pub fn team_display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_TEAM.to_string(),
    }
}

pub fn circuit_display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_CIRCUIT.to_string(),
    }
}

/// Durations are counted in whole 100ns ticks before truncating to milliseconds
const TICKS_PER_SECOND: f64 = 10_000_000.0;
const TICKS_PER_MILLI: i64 = 10_000;

/// Renders a duration in seconds as `H:MM:SS.mmm`, truncating to the millisecond
pub fn format_race_time(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let total_millis = (seconds * TICKS_PER_SECOND).round() as i64 / TICKS_PER_MILLI;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis / 60_000) % 60;
    let secs = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;

    Some(format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, millis))
}

/// Winner's race time, empty when not recorded
pub fn winner_time(duration: Option<f64>) -> String {
    duration.and_then(format_race_time).unwrap_or_default()
}

pub fn format_laps_behind(laps: i32) -> String {
    if laps == 1 {
        "+1 LAP".to_string()
    } else {
        format!("+{} LAPS", laps)
    }
}

/// `+{gap}s` for a numeric gap; anything unparsable is shown as stored
pub fn format_gap(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    match raw.trim().parse::<f64>() {
        Ok(gap) if gap.is_finite() => format!("+{}s", gap),
        _ => raw.to_string(),
    }
}

/// Laps completed by the classified winner, 0 when nobody finished first
pub fn winner_laps<'a>(results: impl IntoIterator<Item = &'a SessionResult>) -> i32 {
    results
        .into_iter()
        .find(|r| r.position == Some(1))
        .map(|r| r.number_of_laps)
        .unwrap_or_default()
}

pub fn time_or_status(result: &SessionResult, winner_laps: i32) -> String {
    if let Some(status) = result.status_label() {
        return status.to_string();
    }

    if result.position == Some(1) {
        return winner_time(result.duration);
    }

    if winner_laps > 0 && result.number_of_laps < winner_laps {
        return format_laps_behind(winner_laps - result.number_of_laps);
    }

    format_gap(result.gap_to_leader.as_deref())
}

/// Classification order: finishers by position, then retirements by laps
/// completed (most first). Remaining ties fall back to position, then driver id.
pub fn compare_results(a: &SessionResult, b: &SessionResult) -> Ordering {
    let retired_laps = |r: &SessionResult| if r.is_retired() { r.number_of_laps } else { 0 };

    a.is_retired()
        .cmp(&b.is_retired())
        .then_with(|| retired_laps(b).cmp(&retired_laps(a)))
        .then_with(|| compare_positions(a.position, b.position))
        .then_with(|| a.driver_id.cmp(&b.driver_id))
}

fn compare_positions(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_lines(lines: &mut [ResultLine]) {
    lines.sort_by(|a, b| compare_results(&a.result, &b.result));
}

/// Renders already ordered lines into display rows
pub fn render_results(lines: Vec<ResultLine>) -> Vec<FormattedResult> {
    let winner_laps = winner_laps(lines.iter().map(|l| &l.result));

    lines
        .into_iter()
        .map(|line| FormattedResult {
            position: line.result.position,
            driver_id: line.result.driver_id,
            driver_number: line.driver_number,
            time_or_status: time_or_status(&line.result, winner_laps),
            laps: line.result.number_of_laps,
            driver_name: line.driver_name,
            driver_code: line.driver_code,
            team_name: line.team_name,
            points: line.points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(driver_id: i32, position: Option<i32>, laps: i32) -> SessionResult {
        SessionResult {
            session_id: 1,
            driver_id,
            position,
            number_of_laps: laps,
            gap_to_leader: None,
            duration: None,
            dnf: false,
            dns: false,
            dsq: false,
        }
    }

    fn retired(driver_id: i32, laps: i32) -> SessionResult {
        SessionResult {
            dnf: true,
            ..result(driver_id, None, laps)
        }
    }

    fn line(result: SessionResult) -> ResultLine {
        ResultLine {
            driver_number: result.driver_id,
            driver_name: format!("Driver {}", result.driver_id),
            driver_code: format!("D{:02}", result.driver_id),
            team_name: UNKNOWN_TEAM.to_string(),
            points: 0,
            result,
        }
    }

    #[rstest]
    #[case(90.0, "0:01:30.000")]
    #[case(5_535.804, "1:32:15.804")]
    #[case(3_600.0, "1:00:00.000")]
    #[case(0.0, "0:00:00.000")]
    #[case(59.9996, "0:00:59.999")]
    #[case(5_504.742, "1:31:44.742")]
    #[case(7_199.9999, "1:59:59.999")]
    fn formats_race_time(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_race_time(seconds).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-1.0)]
    fn rejects_unrenderable_durations(#[case] seconds: f64) {
        assert_eq!(format_race_time(seconds), None);
    }

    #[rstest]
    #[case(Some("12.535"), "+12.535s")]
    #[case(Some("5"), "+5s")]
    #[case(Some(" 0.8 "), "+0.8s")]
    #[case(Some("+1 LAP"), "+1 LAP")]
    #[case(Some("n/a"), "n/a")]
    #[case(None, "")]
    fn formats_gap(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_gap(raw), expected);
    }

    #[rstest]
    #[case(1, "+1 LAP")]
    #[case(2, "+2 LAPS")]
    #[case(12, "+12 LAPS")]
    fn formats_laps_behind(#[case] laps: i32, #[case] expected: &str) {
        assert_eq!(format_laps_behind(laps), expected);
    }

    #[rstest]
    #[case(Some("McLaren"), "McLaren")]
    #[case(Some("  "), UNKNOWN_TEAM)]
    #[case(None, UNKNOWN_TEAM)]
    fn team_names_fall_back(#[case] name: Option<&str>, #[case] expected: &str) {
        assert_eq!(team_display_name(name), expected);
    }

    #[test]
    fn circuit_names_fall_back() {
        assert_eq!(circuit_display_name(Some("Suzuka")), "Suzuka");
        assert_eq!(circuit_display_name(Some(" ")), UNKNOWN_CIRCUIT);
        assert_eq!(circuit_display_name(None), UNKNOWN_CIRCUIT);
    }

    #[test]
    fn status_flags_take_precedence() {
        let mut winner_dsq = result(1, Some(1), 50);
        winner_dsq.dsq = true;
        winner_dsq.duration = Some(5400.0);
        assert_eq!(time_or_status(&winner_dsq, 50), "DSQ");

        let mut dns = result(2, None, 0);
        dns.dns = true;
        assert_eq!(time_or_status(&dns, 50), "DNS");

        assert_eq!(time_or_status(&retired(3, 30), 50), "DNF");
    }

    #[test]
    fn winner_shows_race_time_and_others_show_gap_or_laps() {
        let mut winner = result(1, Some(1), 50);
        winner.duration = Some(5_535.804);
        let mut second = result(2, Some(2), 50);
        second.gap_to_leader = Some("4.112".to_string());
        let lapped = result(3, Some(3), 48);

        assert_eq!(time_or_status(&winner, 50), "1:32:15.804");
        assert_eq!(time_or_status(&second, 50), "+4.112s");
        assert_eq!(time_or_status(&lapped, 50), "+2 LAPS");
    }

    #[test]
    fn winner_without_duration_is_blank() {
        assert_eq!(time_or_status(&result(1, Some(1), 50), 50), "");
    }

    #[test]
    fn retirements_follow_finishers_by_laps_completed() {
        let mut lines = vec![
            line(retired(7, 12)),
            line(result(2, Some(2), 50)),
            line(retired(5, 30)),
            line(result(1, Some(1), 50)),
            line(result(3, Some(3), 49)),
        ];

        sort_lines(&mut lines);

        let order: Vec<i32> = lines.iter().map(|l| l.result.driver_id).collect();
        assert_eq!(order, vec![1, 2, 3, 5, 7]);
    }

    #[test]
    fn unpositioned_finishers_sort_after_positioned_ones() {
        let mut lines = vec![line(result(9, None, 50)), line(result(4, Some(4), 50))];
        sort_lines(&mut lines);
        assert_eq!(lines[0].result.driver_id, 4);
    }

    #[test]
    fn render_uses_winner_laps_for_lapped_drivers() {
        let mut winner = result(1, Some(1), 50);
        winner.duration = Some(90.0 * 50.0);

        let rendered = render_results(vec![
            line(winner),
            line(result(2, Some(2), 49)),
            line(retired(3, 30)),
        ]);

        assert_eq!(rendered[0].time_or_status, "1:15:00.000");
        assert_eq!(rendered[1].time_or_status, "+1 LAP");
        assert_eq!(rendered[2].time_or_status, "DNF");
        assert_eq!(rendered[2].laps, 30);
    }

    #[test]
    fn rendering_is_deterministic() {
        let build = || {
            let mut second = result(2, Some(2), 50);
            second.gap_to_leader = Some("1.5".to_string());
            vec![line(result(1, Some(1), 50)), line(second)]
        };

        assert_eq!(render_results(build()), render_results(build()));
    }
}
