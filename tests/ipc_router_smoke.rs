use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_collegerecd");
    let mut child = Command::new(exe)
        .env_remove("COLLEGEREC_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn collegerecd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn read_response(reader: &mut BufReader<ChildStdout>) -> serde_json::Value {
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let value = read_response(reader);
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

fn error_code(value: &serde_json::Value) -> Option<&str> {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("collegerec-router-smoke");
    let bundle_out = workspace.join("smoke-backup.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["ok"], true);
    assert!(health["result"]["workspacePath"].is_null());

    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let registered = request(
        &mut stdin,
        &mut reader,
        "3",
        "auth.register",
        json!({
            "email": "t@college.edu",
            "password": "pw",
            "role": "teacher",
            "name": "Tess",
            "teacherId": "T-01"
        }),
    );
    let teacher_id = registered["result"]["user"]["id"]
        .as_str()
        .expect("teacher id")
        .to_string();

    let _ = request(&mut stdin, &mut reader, "4", "users.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "5",
        "users.get",
        json!({ "userId": teacher_id }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "6",
        "users.getByEmail",
        json!({ "email": "t@college.edu" }),
    );
    let _ = request(&mut stdin, &mut reader, "7", "session.get", json!({}));
    let course = request(
        &mut stdin,
        &mut reader,
        "8",
        "courses.create",
        json!({
            "courseCode": "CS101",
            "courseName": "Intro",
            "teacherId": teacher_id,
            "teacherName": "Tess",
            "students": []
        }),
    );
    let course_id = course["result"]["courseId"]
        .as_str()
        .expect("courseId")
        .to_string();
    let _ = request(
        &mut stdin,
        &mut reader,
        "9",
        "courses.list",
        json!({ "teacherId": teacher_id }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "10",
        "courses.get",
        json!({ "courseId": course_id }),
    );
    let _ = request(&mut stdin, &mut reader, "11", "marks.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "12",
        "marks.get",
        json!({ "marksId": "none" }),
    );
    let _ = request(&mut stdin, &mut reader, "13", "attendance.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "14",
        "attendance.get",
        json!({ "attendanceId": "none" }),
    );
    let _ = request(&mut stdin, &mut reader, "15", "queries.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "16",
        "queries.get",
        json!({ "queryId": "none" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "17",
        "progress.course",
        json!({ "courseId": course_id }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "18",
        "progress.student",
        json!({ "studentId": "nobody" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "19",
        "backup.export",
        json!({ "outPath": bundle_out.to_string_lossy() }),
    );
    let _ = request(&mut stdin, &mut reader, "20", "auth.logout", json!({}));

    let unknown = {
        writeln!(
            stdin,
            "{}",
            json!({ "id": "21", "method": "nope.nothing", "params": {} })
        )
        .expect("write unknown");
        stdin.flush().expect("flush unknown");
        read_response(&mut reader)
    };
    assert_eq!(error_code(&unknown), Some("not_implemented"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn bad_json_line_gets_an_error_without_id() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    writeln!(stdin, "{{not json").expect("write garbage");
    stdin.flush().expect("flush garbage");
    let value = read_response(&mut reader);
    assert_eq!(value["ok"], false);
    assert_eq!(error_code(&value), Some("bad_json"));
    assert!(value.get("id").is_none());

    // The daemon keeps serving after a bad line.
    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["ok"], true);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn without_workspace_reads_are_empty_and_writes_fail() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let users = request(&mut stdin, &mut reader, "1", "users.list", json!({}));
    assert_eq!(users["result"]["users"], json!([]));
    let session = request(&mut stdin, &mut reader, "2", "session.get", json!({}));
    assert!(session["result"]["user"].is_null());

    let created = request(
        &mut stdin,
        &mut reader,
        "3",
        "marks.create",
        json!({
            "studentId": "s",
            "studentName": "S",
            "courseId": "c",
            "courseName": "C",
            "marks": 1,
            "maxMarks": 2,
            "examType": "Quiz",
            "teacherId": "t"
        }),
    );
    assert_eq!(error_code(&created), Some("no_workspace"));

    let bad = request(
        &mut stdin,
        &mut reader,
        "4",
        "workspace.select",
        json!({}),
    );
    assert_eq!(error_code(&bad), Some("bad_params"));

    drop(stdin);
    let _ = child.wait();
}
