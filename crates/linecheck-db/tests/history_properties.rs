//! Cross-checks the history queries against a brute-force scan of the
//! rows that were inserted.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use linecheck_core::filter::contains_ignore_ascii_case;
use linecheck_core::{
    DateRange, DetailRecord, HistoryFilter, NewDetailRecord, NewSummaryRecord, PageRequest,
    SummaryRecord, PLACEHOLDER,
};
use linecheck_db::{Database, DbConfig};

const LINES: [&str; 3] = ["Linea 1", "Linea 2", "Tetrapack"];
const TYPES: [&str; 3] = ["LLENADO", "CAPSULADO", "ETIQUETADO"];
const CODES: [&str; 4] = ["4-03-0000-0019", "4-03-0000-0020", "4-03-0001-0015", "5-10-0000-0001"];
const LOTS: [&str; 5] = ["115", "116", "L_20", "lote-115b", "200"];

struct Fixture {
    db: Database,
    summaries: Vec<SummaryRecord>,
    details: Vec<DetailRecord>,
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

async fn fixture() -> Fixture {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let base = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();

    let mut summaries = Vec::new();
    for i in 0..60usize {
        let record = NewSummaryRecord {
            code: CODES[i % CODES.len()].to_string(),
            inspector: "Juan Pérez".to_string(),
            lot: LOTS[(i / 2) % LOTS.len()].to_string(),
            product_name: "JUGO NARANJA 1L".to_string(),
            container: "BOTELLA PET".to_string(),
            destination: "NACIONAL".to_string(),
            production_line: LINES[i % LINES.len()].to_string(),
            defect_type: TYPES[(i / 3) % TYPES.len()].to_string(),
            defect_total: (i % 7) as i64,
            observation: PLACEHOLDER.to_string(),
        };
        // Spread over 2024-01-08 .. 2024-01-20, landing on both sides of midnight
        let at = base + Duration::minutes(i as i64 * 311);
        summaries.push(db.summaries().insert_at(&record, at).await.unwrap());
    }

    let mut batch = Vec::new();
    for (i, summary) in summaries.iter().enumerate() {
        for h in 0..(i % 4) {
            batch.push(NewDetailRecord {
                summary_id: summary.id,
                date: day(8 + ((i + h) % 12) as u32),
                hour: format!("{:02}:00", 6 + h),
                description: "Nivel de llenado bajo".to_string(),
                defect_count: (h + 1) as i64,
            });
        }
    }
    let details = db.details().insert_batch(&batch).await.unwrap();

    Fixture {
        db,
        summaries,
        details,
    }
}

fn summary_matches(s: &SummaryRecord, filter: &HistoryFilter) -> bool {
    filter.production_line.as_ref().map_or(true, |l| &s.production_line == l)
        && filter.defect_type.as_ref().map_or(true, |t| &s.defect_type == t)
        && filter.lot.as_ref().map_or(true, |l| contains_ignore_ascii_case(&s.lot, l))
        && filter.code.as_ref().map_or(true, |c| contains_ignore_ascii_case(&s.code, c))
}

fn filters() -> Vec<HistoryFilter> {
    let week = DateRange::new(Some(day(10)), Some(day(15))).unwrap();
    let from = DateRange::new(Some(day(17)), None).unwrap();
    let until = DateRange::new(None, Some(day(9))).unwrap();

    vec![
        HistoryFilter::new(),
        HistoryFilter::new().line("Linea 1"),
        HistoryFilter::new().line("Linea 1").defect_type("LLENADO"),
        HistoryFilter::new().defect_type("CAPSULADO").dates(week),
        HistoryFilter::new().dates(from),
        HistoryFilter::new().dates(until),
        HistoryFilter::new().lot("115"),
        HistoryFilter::new().lot("L_2"),
        HistoryFilter::new().code("4-03"),
        HistoryFilter::new().code("0019").line("Tetrapack").dates(week),
        HistoryFilter::new().line("No existe"),
    ]
}

#[tokio::test]
async fn detail_history_matches_brute_force() {
    let fx = fixture().await;
    let page = PageRequest::first(500).unwrap();

    for filter in filters() {
        let mut expected: Vec<i64> = fx
            .details
            .iter()
            .filter(|d| {
                let parent = fx.summaries.iter().find(|s| s.id == d.summary_id).unwrap();
                summary_matches(parent, &filter) && filter.dates.contains(d.date)
            })
            .map(|d| d.id)
            .collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let result = fx.db.history().detail_history(&filter, page).await.unwrap();
        let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();

        assert_eq!(result.total, expected.len() as u64, "{filter:?}");
        assert_eq!(ids, expected, "{filter:?}");
    }
}

#[tokio::test]
async fn summary_history_matches_brute_force() {
    let fx = fixture().await;
    let page = PageRequest::first(500).unwrap();

    for filter in filters() {
        let mut expected: Vec<i64> = fx
            .summaries
            .iter()
            .filter(|s| summary_matches(s, &filter) && filter.dates.contains_instant(s.created_at))
            .map(|s| s.id)
            .collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let result = fx.db.history().summary_history(&filter, page).await.unwrap();
        let ids: Vec<i64> = result.records.iter().map(|r| r.id).collect();

        assert_eq!(result.total, expected.len() as u64, "{filter:?}");
        assert_eq!(ids, expected, "{filter:?}");
    }
}

#[tokio::test]
async fn page_windows_are_disjoint_and_exhaustive() {
    let fx = fixture().await;
    let filter = HistoryFilter::new().line("Linea 1");

    let everything = fx
        .db
        .history()
        .detail_history(&filter, PageRequest::first(500).unwrap())
        .await
        .unwrap();

    for limit in [1u32, 3, 7, 10, 64] {
        let mut seen = Vec::new();
        let mut request = PageRequest::first(limit).unwrap();
        loop {
            let page = fx.db.history().detail_history(&filter, request).await.unwrap();
            assert_eq!(page.total, everything.total);
            assert!(page.records.len() <= limit as usize);
            seen.extend(page.records.iter().map(|r| r.id));
            if !page.has_next() {
                break;
            }
            request = request.next();
        }

        let expected: Vec<i64> = everything.records.iter().map(|r| r.id).collect();
        assert_eq!(seen, expected, "limit={limit}");
        assert_eq!(
            PageRequest::first(limit).unwrap().total_pages(everything.total),
            everything.total.div_ceil(u64::from(limit))
        );
    }
}

#[tokio::test]
async fn deleting_a_summary_removes_only_its_details() {
    let fx = fixture().await;
    let target = fx
        .summaries
        .iter()
        .find(|s| fx.details.iter().filter(|d| d.summary_id == s.id).count() == 3)
        .unwrap();
    let before = fx.db.details().count().await.unwrap();

    fx.db.summaries().delete(target.id).await.unwrap();

    assert_eq!(fx.db.details().count().await.unwrap(), before - 3);
    let all = fx
        .db
        .history()
        .detail_history(&HistoryFilter::new(), PageRequest::first(500).unwrap())
        .await
        .unwrap();
    let remaining: Vec<i64> = fx
        .details
        .iter()
        .filter(|d| d.summary_id != target.id)
        .map(|d| d.id)
        .rev()
        .collect();
    assert_eq!(all.records.iter().map(|r| r.id).collect::<Vec<_>>(), remaining);
}
