//! Integration tests for the scheduling flow.
//!
//! These exercise the service against an on-disk store: conflict-checked
//! saves, recurrence sync surviving a reopen, archival on delete and the
//! export/import round trip.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;
use timeblock_core::{
    EventDb, EventDraft, RecurrenceSpec, RecurrenceUnit, SaveOutcome, SchedulingService,
};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 7, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn draft(title: &str, start_min: i64, end_min: i64) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        start_time: at(start_min).to_rfc3339(),
        end_time: at(end_min).to_rfc3339(),
        ..Default::default()
    }
}

fn saved(outcome: SaveOutcome) -> timeblock_core::Event {
    match outcome {
        SaveOutcome::Saved(event) => event,
        SaveOutcome::Conflict(c) => panic!("unexpected conflict with {:?}", c.conflicts),
    }
}

#[test]
fn conflict_checked_save_against_disk_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timeblock.db");
    let svc = SchedulingService::new(EventDb::open_at(&path).unwrap());

    let a = saved(svc.save_event(&draft("A", 540, 600)).unwrap());

    // Overlapping candidate is rejected with the blocker and a slot that
    // starts right after it.
    let outcome = svc.save_event(&draft("B", 570, 630)).unwrap();
    let conflict = match outcome {
        SaveOutcome::Conflict(c) => c,
        SaveOutcome::Saved(_) => panic!("expected conflict"),
    };
    assert_eq!(conflict.conflicts[0].id, a.id);
    let top = conflict.suggestions[0];
    assert_eq!(top.start, at(600));

    // Re-submitting at the suggested slot succeeds.
    let retry = EventDraft {
        title: "B".to_string(),
        start_time: top.start.to_rfc3339(),
        end_time: (top.start + Duration::minutes(60)).to_rfc3339(),
        ..Default::default()
    };
    saved(svc.save_event(&retry).unwrap());

    // Both events survive a fresh handle on the same file.
    drop(svc);
    let reopened = EventDb::open_at(&path).unwrap();
    assert_eq!(reopened.all_events().unwrap().len(), 2);
}

#[test]
fn recurrence_record_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timeblock.db");

    let event = {
        let svc = SchedulingService::new(EventDb::open_at(&path).unwrap());
        let mut d = draft("Gym", 1080, 1140);
        d.recurring = Some(RecurrenceSpec {
            unit: RecurrenceUnit::Weeks,
            interval: 1,
            day_of_week: Some(1),
        });
        saved(svc.save_event(&d).unwrap())
    };

    let reopened = EventDb::open_at(&path).unwrap();
    let pattern = reopened.pattern_for_event(&event.id).unwrap().unwrap();
    assert_eq!(pattern.event_id, event.id);
    assert_eq!(pattern.pattern.interval, 1);
    let stored = reopened.get_event(&event.id).unwrap().unwrap();
    assert_eq!(stored.recurring, event.recurring);
}

#[test]
fn deleting_an_elapsed_event_archives_it() {
    let dir = TempDir::new().unwrap();
    let svc = SchedulingService::new(EventDb::open_at(dir.path().join("timeblock.db")).unwrap());

    // Well in the past relative to the service's wall clock.
    let old = saved(
        svc.save_event(&EventDraft {
            title: "Retro".to_string(),
            start_time: "2020-05-04T09:00:00+00:00".to_string(),
            end_time: "2020-05-04T10:00:00+00:00".to_string(),
            ..Default::default()
        })
        .unwrap(),
    );

    let outcome = svc.delete_event(&old.id).unwrap();
    assert!(outcome.archived);
    assert!(outcome.archival_error.is_none());

    let past = svc.store().past_events().unwrap();
    assert_eq!(past.len(), 1);
    assert_eq!(past[0].event.id, old.id);
    assert!(svc.store().get_event(&old.id).unwrap().is_none());
}

#[test]
fn export_import_round_trip_between_stores() {
    let dir = TempDir::new().unwrap();
    let svc = SchedulingService::new(EventDb::open_at(dir.path().join("a.db")).unwrap());

    saved(svc.save_event(&draft("Standup", 540, 555)).unwrap());
    let mut gym = draft("Gym", 1080, 1140);
    gym.recurring = Some(RecurrenceSpec {
        unit: RecurrenceUnit::Days,
        interval: 2,
        day_of_week: None,
    });
    saved(svc.save_event(&gym).unwrap());

    let bundle = svc.export().unwrap();

    let target = SchedulingService::new(EventDb::open_at(dir.path().join("b.db")).unwrap());
    target.import(&bundle).unwrap();

    let source_events = svc.store().all_events().unwrap();
    let target_events = target.store().all_events().unwrap();
    assert_eq!(
        serde_json::to_value(&source_events).unwrap(),
        serde_json::to_value(&target_events).unwrap()
    );
    assert_eq!(
        svc.store().all_patterns().unwrap().len(),
        target.store().all_patterns().unwrap().len()
    );
}
