//! Contribution calendar client and response normalization

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{AuthToken, Login, Transport};
use crate::types::{
    ContributionCalendar, ContributionDay, ContributionLevel, ContributionWeek, FetchError,
};

/// Public GitHub GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const DAYS_PER_WEEK: usize = 7;

/// GraphQL request body
#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct ResponseData {
    user: Option<RawUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    contributions_collection: RawCollection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCollection {
    contribution_calendar: RawCalendar,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalendar {
    total_contributions: u64,
    weeks: Vec<RawWeek>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeek {
    first_day: NaiveDate,
    contribution_days: Vec<RawDay>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    date: NaiveDate,
    contribution_count: u64,
    contribution_level: ContributionLevel,
}

/// Build the fixed query document for a login
pub fn build_query(login: &Login) -> String {
    format!(
        r#"query {{
  user(login: "{}") {{
    contributionsCollection {{
      contributionCalendar {{
        totalContributions
        weeks {{
          firstDay
          contributionDays {{
            date
            contributionCount
            contributionLevel
          }}
        }}
      }}
    }}
  }}
}}"#,
        login.as_str()
    )
}

/// Parse and validate a GraphQL response body.
///
/// Either the whole calendar validates or the call fails; a partially
/// populated calendar is never returned.
pub fn parse_response(body: &str) -> Result<ContributionCalendar, FetchError> {
    let response: GraphqlResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let user = match response.data.and_then(|d| d.user) {
        Some(user) => user,
        None => {
            let reason = response
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "missing data.user".to_string());
            return Err(FetchError::MalformedResponse(reason));
        }
    };

    let raw = user.contributions_collection.contribution_calendar;
    let weeks = raw
        .weeks
        .into_iter()
        .map(normalize_week)
        .collect::<Result<Vec<_>, _>>()?;

    for pair in weeks.windows(2) {
        if pair[1].start_date <= pair[0].start_date {
            return Err(FetchError::MalformedResponse(format!(
                "weeks out of order: {} follows {}",
                pair[1].start_date, pair[0].start_date
            )));
        }
    }

    Ok(ContributionCalendar {
        weeks,
        total: raw.total_contributions,
    })
}

fn normalize_week(raw: RawWeek) -> Result<ContributionWeek, FetchError> {
    if raw.contribution_days.is_empty() || raw.contribution_days.len() > DAYS_PER_WEEK {
        return Err(FetchError::MalformedResponse(format!(
            "week {} has {} days",
            raw.first_day,
            raw.contribution_days.len()
        )));
    }

    let days: Vec<ContributionDay> = raw
        .contribution_days
        .into_iter()
        .map(|d| ContributionDay {
            date: d.date,
            count: d.contribution_count,
            level: d.contribution_level,
        })
        .collect();

    if days[0].date != raw.first_day {
        return Err(FetchError::MalformedResponse(format!(
            "week {} starts on {}",
            raw.first_day, days[0].date
        )));
    }
    let week_end = raw.first_day + Duration::days(DAYS_PER_WEEK as i64);
    if let Some(day) = days.iter().find(|d| d.date >= week_end) {
        return Err(FetchError::MalformedResponse(format!(
            "day {} falls outside week {}",
            day.date, raw.first_day
        )));
    }
    for pair in days.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(FetchError::MalformedResponse(format!(
                "days out of order in week {}",
                raw.first_day
            )));
        }
    }

    Ok(ContributionWeek {
        start_date: raw.first_day,
        days,
    })
}

/// Fetches one year of contribution data. Holds no per-call state, so
/// every call performs exactly one request.
pub struct ContributionClient<T: Transport> {
    transport: T,
    endpoint: String,
}

impl<T: Transport> ContributionClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_endpoint(transport, DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (e.g. GitHub Enterprise)
    pub fn with_endpoint(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fetch_calendar(
        &self,
        login: &Login,
        token: &AuthToken,
    ) -> Result<ContributionCalendar, FetchError> {
        let query = build_query(login);
        let body = serde_json::to_string(&GraphqlRequest { query: &query })
            .map_err(|e| FetchError::Network(format!("cannot encode request: {}", e)))?;

        tracing::debug!(login = %login, endpoint = %self.endpoint, "fetching contribution calendar");

        let response = self.transport.post_json(&self.endpoint, token, &body)?;

        match response.status {
            401 | 403 => {
                return Err(FetchError::Auth {
                    status: response.status,
                })
            }
            _ if !response.is_success() => {
                return Err(FetchError::Network(format!(
                    "server returned HTTP {}",
                    response.status
                )))
            }
            _ => {}
        }

        let calendar = parse_response(&response.body)?;
        tracing::debug!(
            login = %login,
            weeks = calendar.weeks.len(),
            total = calendar.total,
            "contribution calendar loaded"
        );
        Ok(calendar)
    }
}
