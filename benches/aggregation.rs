use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shmu_now::{aggregate, aggregate_all, MinuteRecord, SourcePayload, TimeRange};
use chrono::{TimeZone, Utc};

fn network_payload(stations: u32) -> SourcePayload {
    let data = (0..stations)
        .flat_map(|station| {
            (0..5).map(move |minute| MinuteRecord {
                station_id: (11800 + station).to_string(),
                timestamp: format!("2025-09-16T17:{:02}:00", 30 + minute),
                t: Some(10.0 + f64::from(minute) * 0.1),
                tlak: Some(1001.0),
                vlh_rel: Some(70.0),
                zra_uhrn: Some(0.1),
                zglo: Some(350.0),
                vie_pr_rych: Some(2.0 + f64::from(minute)),
                vie_pr_smer: Some(45.0 * f64::from(minute)),
                vie_max_rych: Some(6.0),
                stav_poc: Some(1.0),
                ..Default::default()
            })
        })
        .collect();
    SourcePayload {
        data,
        ..Default::default()
    }
}

fn bench_aggregation(c: &mut Criterion) {
    let payload = network_payload(100);
    let range = TimeRange {
        start: Utc.with_ymd_and_hms(2025, 9, 16, 16, 30, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 9, 16, 16, 35, 0).unwrap(),
    };
    c.bench_function("aggregate_one_station", |b| {
        b.iter(|| aggregate(black_box(&payload), black_box("11850"), Some(range)))
    });
    c.bench_function("aggregate_all_100_stations", |b| {
        b.iter(|| aggregate_all(black_box(&payload), Some(range)))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
