use chrono::{Duration, SecondsFormat, Utc};
use monitor_app::{AppConfig, AppError, AppState, ReportOptions};
use monitor_core::{Anomaly, QueueStatus, RequestStatus, StatusCode};
use rusqlite::{Connection, params};
use tempfile::tempdir;

fn seed(conn: &Connection) {
    conn.execute_batch(
        r#"
        INSERT INTO mediatypes (id, name, drives) VALUES (1, 'T10K-B', 10), (2, 'LTO4', 4);
        INSERT INTO allocations (media_id, user, share) VALUES
          (1, 'userA', 0.6), (1, 'userB', 0.5), (2, 'userA', 0.5);
        INSERT INTO information (name, value) VALUES ('version', '1.5.6');
        "#,
    )
    .expect("seed config");
    for (id, owner, status) in [
        (1, "userA", QueueStatus::Activated),
        (2, "userA", QueueStatus::Activated),
        (3, "userC", QueueStatus::Activated),
        (4, "userB", QueueStatus::Created),
    ] {
        conn.execute(
            "INSERT INTO queues (id, name, media_id, status, owner) VALUES (?1, ?2, 1, ?3, ?4)",
            params![id, format!("IT000{}", id), status.code(), owner],
        )
        .expect("insert queue");
    }
    for (user, status) in [
        ("userA", RequestStatus::Created.code()),
        ("userA", RequestStatus::Created.code()),
        ("userA", RequestStatus::Created.code()),
        ("userA", RequestStatus::Failed.code()),
        ("userB", RequestStatus::Created.code()),
        ("userB", RequestStatus::Created.code()),
    ] {
        conn.execute(
            "INSERT INTO requests (file, user, status) VALUES ('/hpss/f', ?1, ?2)",
            params![user, status],
        )
        .expect("insert request");
    }
}

fn insert_heartbeat(conn: &Connection, age_secs: i64) {
    let last = (Utc::now() - Duration::seconds(age_secs)).to_rfc3339_opts(SecondsFormat::Secs, true);
    conn.execute(
        "INSERT INTO heart_beat (pid, start_time, last_time) VALUES (77, '2025-03-01T08:00:00Z', ?1)",
        params![last],
    )
    .expect("insert heartbeat");
}

#[test]
fn dashboard_report_smoke() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("scheduler.sqlite");
    let app_state = AppState::new(AppConfig::new(db_path.clone()));
    app_state.setup_db().expect("setup db");
    let conn = Connection::open(&db_path).expect("open writer");
    seed(&conn);
    insert_heartbeat(&conn, 400);

    let report = app_state
        .services
        .dashboard
        .report(&ReportOptions::default())
        .expect("report");

    let user_a = &report.requests.by_owner["userA"];
    assert_eq!(user_a.count(RequestStatus::Created), 3);
    assert_eq!(user_a.count(RequestStatus::Failed), 1);
    assert_eq!(user_a.total, 4);
    assert_eq!(report.requests.global.total, 6);
    assert_eq!(report.queues.global.total, 4);

    let r1 = &report.fair_share.resources[&1];
    assert!(r1.is_overbooked);
    assert!(r1.free_percent.is_none());
    assert!((report.fair_share.max_booking_ratio - 0.1).abs() < 1e-9);
    let r2 = &report.fair_share.resources[&2];
    assert!(!r2.is_overbooked);
    assert_eq!(r2.free_percent, Some(50.0));

    let orphan = report
        .allocations
        .iter()
        .find(|record| record.user_id == "userC")
        .expect("orphan");
    assert!(orphan.is_orphan);
    assert_eq!(orphan.used_drives, 1);
    assert_eq!(orphan.resource_name, "T10K-B");
    let user_a_drives = report
        .allocations
        .iter()
        .find(|record| record.user_id == "userA" && record.resource_id == 1)
        .expect("userA on T10K");
    assert_eq!(user_a_drives.allocated_drives, 6);
    assert_eq!(user_a_drives.used_drives, 2);

    let heartbeat = report.heartbeat.as_ref().expect("heartbeat");
    assert!(heartbeat.is_stale);
    assert_eq!(report.information[0].value, "1.5.6");
    assert!(report.anomalies.is_empty());
    assert_eq!(report.tape_queues.activated, 3);
    assert_eq!(report.tape_queues.created, 1);
}

#[test]
fn threshold_override_changes_staleness() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("scheduler.sqlite");
    let app_state = AppState::new(AppConfig::new(db_path.clone()));
    app_state.setup_db().expect("setup db");
    let conn = Connection::open(&db_path).expect("open writer");
    insert_heartbeat(&conn, 400);

    let relaxed = ReportOptions {
        stale_threshold_secs: Some(3_600),
    };
    let heartbeat = app_state
        .services
        .dashboard
        .heartbeat(&relaxed)
        .expect("heartbeat")
        .expect("row");
    assert!(!heartbeat.is_stale);
}

#[test]
fn unknown_status_codes_surface_as_anomalies() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("scheduler.sqlite");
    let app_state = AppState::new(AppConfig::new(db_path.clone()));
    app_state.setup_db().expect("setup db");
    let conn = Connection::open(&db_path).expect("open writer");
    conn.execute(
        "INSERT INTO requests (file, user, status) VALUES ('/hpss/x', 'userA', 130)",
        [],
    )
    .expect("insert request");

    let report = app_state
        .services
        .dashboard
        .report(&ReportOptions::default())
        .expect("report");

    assert_eq!(report.requests.by_owner["userA"].unknown, 1);
    assert!(matches!(
        report.anomalies.as_slice(),
        [Anomaly::UnknownStatusCode { code: 130, .. }]
    ));
}

#[test]
fn missing_database_is_not_found() {
    let dir = tempdir().expect("temp dir");
    let app_state = AppState::new(AppConfig::new(dir.path().join("absent.sqlite")));

    let err = app_state
        .services
        .dashboard
        .report(&ReportOptions::default())
        .expect_err("missing db");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn bad_shares_are_flagged_without_failing_the_report() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("scheduler.sqlite");
    let app_state = AppState::new(AppConfig::new(db_path.clone()));
    app_state.setup_db().expect("setup db");
    let conn = Connection::open(&db_path).expect("open writer");
    conn.execute_batch(
        r#"
        INSERT INTO mediatypes (id, name, drives) VALUES (1, 'T10K-B', 10);
        INSERT INTO allocations (media_id, user, share) VALUES
          (1, 'userA', 1.7), (1, 'userB', 0.3), (1, 'userC', 0.2);
        UPDATE allocations SET override_share = 'half' WHERE user = 'userC';
        INSERT INTO requests (file, user, status) VALUES ('/hpss/f', 'userB', 100);
        "#,
    )
    .expect("seed");
    insert_heartbeat(&conn, 10);

    let report = app_state
        .services
        .dashboard
        .report(&ReportOptions::default())
        .expect("report");

    assert_eq!(report.allocations.len(), 3);
    let user_a = &report.allocations[0];
    assert_eq!(user_a.effective_share, 0.0);
    assert_eq!(user_a.allocated_drives, 0);
    assert_eq!(report.allocations[1].allocated_drives, 3);
    assert_eq!(report.allocations[2].effective_share, 0.2);
    assert_eq!(report.requests.global.total, 1);
    assert!(report.heartbeat.is_some());
    assert!(matches!(
        report.anomalies.as_slice(),
        [
            Anomaly::UnreadableOverride { .. },
            Anomaly::InvalidShare { .. },
        ]
    ));
}
