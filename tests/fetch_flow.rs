//! End-to-end flow: transport reply -> client -> fetch state -> panel view

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use contribtrack::github::{AuthToken, ContributionClient, HttpResponse, Login, Transport};
use contribtrack::tui::widgets::heatmap::{LevelColorMap, DAYS_PER_WEEK};
use contribtrack::tui::widgets::panel::{self, PanelBody, UNAVAILABLE_HEADER};
use contribtrack::types::{ContributionLevel, FetchError, FetchState};

/// Transport that always returns the same reply
struct StaticTransport(Result<HttpResponse, FetchError>);

impl Transport for StaticTransport {
    fn post_json(
        &self,
        _url: &str,
        _token: &AuthToken,
        _body: &str,
    ) -> Result<HttpResponse, FetchError> {
        self.0.clone()
    }
}

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

fn ok(body: String) -> StaticTransport {
    StaticTransport(Ok(HttpResponse { status: 200, body }))
}

fn login() -> Login {
    Login::parse("mrshyspy").unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("ghp_integration").unwrap()
}

/// Resolve a fresh state the way the panel does
fn resolve<T: Transport>(client: &ContributionClient<T>) -> FetchState {
    let mut state = FetchState::Loading;
    state.resolve(client.fetch_calendar(&login(), &token()));
    state
}

/// A GitHub-shaped body: `weeks` weeks, the last one `tail` days long
fn year_body(total: u64, weeks: usize, tail: usize) -> String {
    let levels = [
        "NONE",
        "FIRST_QUARTILE",
        "SECOND_QUARTILE",
        "THIRD_QUARTILE",
        "FOURTH_QUARTILE",
    ];
    let start = NaiveDate::from_ymd_opt(2023, 6, 18).unwrap();
    let weeks: Vec<String> = (0..weeks)
        .map(|w| {
            let first = start + Duration::weeks(w as i64);
            let len = if w == weeks - 1 { tail } else { DAYS_PER_WEEK };
            let days: Vec<String> = (0..len)
                .map(|d| {
                    format!(
                        r#"{{"date":"{}","contributionCount":{},"contributionLevel":"{}"}}"#,
                        first + Duration::days(d as i64),
                        d,
                        levels[(w + d) % 5]
                    )
                })
                .collect();
            format!(
                r#"{{"firstDay":"{}","contributionDays":[{}]}}"#,
                first,
                days.join(",")
            )
        })
        .collect();
    format!(
        r#"{{"data":{{"user":{{"contributionsCollection":{{"contributionCalendar":{{"totalContributions":{},"weeks":[{}]}}}}}}}}}}"#,
        total,
        weeks.join(",")
    )
}

#[test]
fn fixture_calendar_renders_week_major_grid() {
    let client = ContributionClient::new(ok(fixture("github-calendar.json")));
    let state = resolve(&client);

    let calendar = match &state {
        FetchState::Loaded(calendar) => calendar.clone(),
        other => panic!("expected loaded state, got {:?}", other),
    };
    assert_eq!(calendar.total, 57);

    let view = panel::render(&state, &LevelColorMap::LIGHT);
    assert_eq!(view.header, "57 contributions in the last year");

    let grid = view.grid().unwrap();
    assert_eq!(grid.columns.len(), calendar.weeks.len());
    for (column, week) in grid.columns.iter().zip(&calendar.weeks) {
        assert_eq!(column.cells.len(), week.days.len());
        for (cell, day) in column.cells.iter().zip(&week.days) {
            assert_eq!(cell.date, day.date);
            assert_eq!(cell.color, LevelColorMap::LIGHT.color(day.level));
        }
    }

    let busiest = grid.cell(1, 1).unwrap();
    assert_eq!(busiest.level, ContributionLevel::FourthQuartile);
    assert_eq!(busiest.tooltip(), "2024-06-03: 21 contributions");
}

#[test]
fn year_with_short_final_week() {
    let client = ContributionClient::new(ok(year_body(842, 52, 3)));
    let view = panel::render(&resolve(&client), &LevelColorMap::DARK);

    assert_eq!(view.header, "842 contributions in the last year");
    let grid = view.grid().unwrap();
    assert_eq!(grid.columns.len(), 52);

    let last = grid.columns.last().unwrap();
    assert_eq!(last.cells.len(), 3);
    assert_eq!(last.empty_slots(), 4);
    for row in 3..DAYS_PER_WEEK {
        assert!(last.cell(row).is_none());
    }
    assert!(grid.columns[..51].iter().all(|c| c.cells.len() == 7));
}

#[test]
fn repeated_fetches_are_structurally_equal() {
    let client = ContributionClient::new(ok(year_body(842, 52, 3)));
    let first = client.fetch_calendar(&login(), &token()).unwrap();
    let second = client.fetch_calendar(&login(), &token()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_level_never_loads() {
    let body = fixture("github-calendar.json").replace("\"THIRD_QUARTILE\"", "\"HUGE\"");
    let client = ContributionClient::new(ok(body));

    assert!(matches!(
        resolve(&client),
        FetchState::Failed(FetchError::MalformedResponse(_))
    ));
}

#[test]
fn unauthorized_and_unreachable_look_the_same() {
    let auth = ContributionClient::new(StaticTransport(Ok(HttpResponse {
        status: 401,
        body: r#"{"message":"Bad credentials"}"#.into(),
    })));
    let network = ContributionClient::new(StaticTransport(Err(FetchError::Network(
        "connection refused".into(),
    ))));

    let auth_state = resolve(&auth);
    let network_state = resolve(&network);
    assert!(matches!(
        auth_state,
        FetchState::Failed(FetchError::Auth { status: 401 })
    ));
    assert!(matches!(
        network_state,
        FetchState::Failed(FetchError::Network(_))
    ));

    let auth_view = panel::render(&auth_state, &LevelColorMap::LIGHT);
    let network_view = panel::render(&network_state, &LevelColorMap::LIGHT);
    assert_eq!(auth_view, network_view);
    assert_eq!(auth_view.header, UNAVAILABLE_HEADER);
    assert_eq!(auth_view.body, PanelBody::Unavailable);
}
