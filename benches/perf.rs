use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};

use lff_scrape::fixtures::{FixtureContext, date_passed_means_completed, parse_fixtures};
use lff_scrape::standings::parse_standings;

const STANDINGS_HTML: &str = include_str!("../tests/fixtures/standings.html");
const FIXTURES_HTML: &str = include_str!("../tests/fixtures/fixtures.html");

fn bench_parse_standings(c: &mut Criterion) {
    c.bench_function("parse_standings", |b| {
        b.iter(|| {
            parse_standings(
                black_box(STANDINGS_HTML),
                black_box("a-lyga"),
                black_box("2025-07-01T12:00:00+00:00"),
            )
        })
    });
}

fn bench_parse_fixtures(c: &mut Criterion) {
    let ctx = FixtureContext {
        club: "Banga",
        origin: "https://www.lietuvosfutbolas.lt",
        today: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
        status_rule: date_passed_means_completed,
    };
    c.bench_function("parse_fixtures", |b| {
        b.iter(|| parse_fixtures(black_box(FIXTURES_HTML), black_box("a-lyga"), &ctx))
    });
}

criterion_group!(benches, bench_parse_standings, bench_parse_fixtures);
criterion_main!(benches);
