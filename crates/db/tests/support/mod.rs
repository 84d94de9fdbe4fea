#![allow(dead_code)]

use std::path::PathBuf;

use monitor_db::Db;
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
    pub conn: Connection,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("scheduler.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    let conn = Connection::open(&path).expect("open writer");
    TestDb {
        _dir: dir,
        db,
        path,
        conn,
    }
}

pub fn insert_media(conn: &Connection, id: i64, name: &str, drives: i64) {
    conn.execute(
        "INSERT INTO mediatypes (id, name, drives) VALUES (?1, ?2, ?3)",
        params![id, name, drives],
    )
    .expect("insert media");
}

pub fn insert_allocation(conn: &Connection, media_id: i64, user: &str, share: f64) {
    conn.execute(
        "INSERT INTO allocations (media_id, user, share) VALUES (?1, ?2, ?3)",
        params![media_id, user, share],
    )
    .expect("insert allocation");
}

pub fn insert_queue(conn: &Connection, id: i64, tape: &str, media_id: i64, status: i64, owner: &str) {
    conn.execute(
        r#"
        INSERT INTO queues (id, name, media_id, status, owner, byte_size, nb_reqs,
                            nb_reqs_done, nb_reqs_failed, creation_time)
        VALUES (?1, ?2, ?3, ?4, ?5, 10485760, 6, 2, 1, '2025-03-01 08:00:00')
        "#,
        params![id, tape, media_id, status, owner],
    )
    .expect("insert queue");
}

pub fn insert_request(conn: &Connection, file: &str, user: &str, status: i64) {
    conn.execute(
        "INSERT INTO requests (file, user, status) VALUES (?1, ?2, ?3)",
        params![file, user, status],
    )
    .expect("insert request");
}

pub fn insert_heartbeat(conn: &Connection, pid: i64, start_time: &str, last_time: &str) {
    conn.execute(
        "INSERT INTO heart_beat (pid, start_time, last_time, message) VALUES (?1, ?2, ?3, 'ok')",
        params![pid, start_time, last_time],
    )
    .expect("insert heartbeat");
}
