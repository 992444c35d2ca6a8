use chrono::{NaiveDate, NaiveDateTime};

use f1stats::data::{SessionResult, SessionType, Snapshot};

// ============================================================================
// Shared race data
// ============================================================================

pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(15, 0, 0))
        .expect("valid fixture date")
}

/// Result row with every optional column spelled out
pub fn race_result(
    session_id: i32,
    driver_id: i32,
    position: Option<i32>,
    laps: i32,
    gap: Option<&str>,
    duration: Option<f64>,
) -> SessionResult {
    SessionResult {
        session_id,
        driver_id,
        position,
        number_of_laps: laps,
        gap_to_leader: gap.map(str::to_string),
        duration,
        dnf: false,
        dns: false,
        dsq: false,
    }
}

/// Two seasons of data covering the awkward cases: sprint weekends, a dead
/// heat for P1, DNF/DNS/DSQ rows, lapped cars, unparsable gaps, a result
/// without a driver record, a driver without a contract, a team with a
/// blank name, a team with no drivers and a fastest-lap tie.
pub fn championship_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::builder()
        .season(1, 2023)
        .season(2, 2024)
        .team(1, "McLaren")
        .team(2, "Ferrari")
        .team(3, "  ")
        .team(4, "Haas")
        .driver(1, 4, "NOR", "Lando Norris")
        .driver(2, 81, "PIA", "Oscar Piastri")
        .driver(3, 16, "LEC", "Charles Leclerc")
        .driver(4, 55, "SAI", "Carlos Sainz")
        .driver(5, 87, "BEA", "Oliver Bearman")
        .driver(6, 27, "HUL", "Nico Hulkenberg")
        // 2023
        .contract(1, 1, 1)
        .contract(3, 2, 1)
        .contract(4, 2, 1)
        // 2024; driver 9 has no driver record, the second SAI contract is ignored
        .contract(1, 1, 2)
        .contract(2, 1, 2)
        .contract(3, 2, 2)
        .contract(4, 2, 2)
        .contract(5, 3, 2)
        .contract(9, 3, 2)
        .contract(4, 1, 2)
        .event(20, 1, "Abu Dhabi Grand Prix", date(2023, 11, 26))
        .event(10, 2, "Bahrain Grand Prix", date(2024, 3, 2))
        .event(11, 2, "Chinese Grand Prix", date(2024, 4, 21))
        .event(12, 2, "Monaco Grand Prix", date(2024, 5, 26))
        .session(200, 20, SessionType::Race)
        .session(100, 10, SessionType::Qualifying)
        .session(101, 10, SessionType::Race)
        .session(110, 11, SessionType::Sprint)
        .session(111, 11, SessionType::Race)
        .session(121, 12, SessionType::Race)
        // Abu Dhabi 2023
        .result(race_result(200, 4, Some(1), 58, None, Some(5256.1234)))
        .finish(200, 3, 2, 58)
        .finish(200, 1, 3, 58)
        .grid(200, 4, 1)
        .grid(200, 3, 2)
        .grid(200, 1, 3)
        .lap(200, 1, 44, 86.4)
        .lap(200, 4, 45, 86.9)
        // Bahrain qualifying awards nothing
        .finish(100, 1, 1, 18)
        .finish(100, 3, 2, 18)
        // Bahrain race
        .result(race_result(101, 3, Some(1), 57, None, Some(5504.742)))
        .result(race_result(101, 1, Some(2), 57, Some("22.457"), None))
        .result(race_result(101, 2, Some(3), 57, Some("25.11"), None))
        .result(race_result(101, 4, Some(4), 56, None, None))
        .result(race_result(101, 9, Some(5), 57, Some("1:02.3"), None))
        .retirement(101, 5, 30)
        .result(SessionResult {
            dns: true,
            ..race_result(101, 6, None, 0, None, None)
        })
        .grid(101, 3, 1)
        .grid(101, 1, 2)
        .grid(101, 2, 3)
        .lap(101, 3, 1, f64::NAN)
        .lap(101, 1, 40, 92.5)
        .lap(101, 2, 38, 92.5)
        .lap(101, 3, 41, 93.1)
        // Chinese sprint
        .finish(110, 2, 1, 19)
        .finish(110, 1, 2, 19)
        .finish(110, 3, 3, 19)
        .finish(110, 4, 9, 18)
        .grid(110, 2, 1)
        .lap(110, 1, 3, 97.0)
        // Chinese race, dead heat for the win
        .result(race_result(111, 1, Some(1), 56, None, Some(5800.0)))
        .result(race_result(111, 2, Some(1), 56, None, Some(5800.0)))
        .finish(111, 3, 3, 56)
        .result(SessionResult {
            dsq: true,
            ..race_result(111, 4, None, 56, None, None)
        })
        .retirement(111, 5, 12)
        .grid(111, 1, 1)
        .grid(111, 4, 2)
        .lap(111, 4, 50, 95.2)
        .lap(111, 1, 50, 95.9)
        // Monaco
        .result(race_result(121, 3, Some(1), 78, None, Some(7200.0)))
        .result(race_result(121, 1, Some(2), 78, Some("7.152"), None))
        .result(race_result(121, 2, Some(11), 77, None, None))
        .result(race_result(121, 9, Some(10), 78, Some("60"), None))
        .grid(121, 3, 1)
        .grid(121, 1, 2)
        .lap(121, 2, 60, 74.1)
        .lap(121, 3, 61, 74.9)
        .build();

    if let Some(monaco) = snapshot.events.iter_mut().find(|e| e.event_id == 12) {
        monaco.circuit_name = Some("Monte Carlo".to_string());
    }
    snapshot
}
