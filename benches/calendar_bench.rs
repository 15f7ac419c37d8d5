//! Criterion benchmarks for response parsing and grid layout

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use contribtrack::github::parse_response;
use contribtrack::tui::widgets::heatmap::{CalendarGrid, LevelColorMap};

/// A full year of GitHub-shaped calendar JSON (53 weeks, last one partial)
fn year_body() -> String {
    let levels = [
        "NONE",
        "FIRST_QUARTILE",
        "SECOND_QUARTILE",
        "THIRD_QUARTILE",
        "FOURTH_QUARTILE",
    ];
    let start = NaiveDate::from_ymd_opt(2023, 6, 18).unwrap();
    let weeks: Vec<String> = (0..53)
        .map(|w| {
            let first = start + Duration::weeks(w);
            let len = if w == 52 { 3 } else { 7 };
            let days: Vec<String> = (0..len)
                .map(|d| {
                    format!(
                        r#"{{"date":"{}","contributionCount":{},"contributionLevel":"{}"}}"#,
                        first + Duration::days(d),
                        (w * d) % 17,
                        levels[((w + d) % 5) as usize]
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
        r#"{{"data":{{"user":{{"contributionsCollection":{{"contributionCalendar":{{"totalContributions":1234,"weeks":[{}]}}}}}}}}}}"#,
        weeks.join(",")
    )
}

fn bench_parse(c: &mut Criterion) {
    let body = year_body();
    let mut group = c.benchmark_group("parse_response");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("year", |b| {
        b.iter(|| parse_response(black_box(&body)).unwrap())
    });
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let calendar = parse_response(&year_body()).unwrap();
    c.bench_function("calendar_grid_build", |b| {
        b.iter(|| CalendarGrid::build(black_box(&calendar), &LevelColorMap::DARK))
    });
}

criterion_group!(benches, bench_parse, bench_grid);
criterion_main!(benches);
