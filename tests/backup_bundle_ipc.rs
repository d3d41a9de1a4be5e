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

fn request_ok(
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

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_default()
}

#[test]
fn export_then_import_into_fresh_workspace() {
    let src = temp_dir("collegerec-backup-src");
    let dst = temp_dir("collegerec-backup-dst");
    let bundle = src.join("out").join("college.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": src.to_string_lossy() }),
    );
    let user = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.register",
        json!({ "email": "t@x.com", "password": "pw", "role": "teacher", "name": "Tess" }),
    )["user"]
        .clone();
    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "courses.create",
        json!({
            "courseCode": "CH1",
            "courseName": "Chemistry",
            "teacherId": user["id"],
            "teacherName": "Tess"
        }),
    );
    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "backup.export",
        json!({ "outPath": bundle.to_string_lossy() }),
    );
    assert_eq!(exported["bundleFormat"], "collegerec-workspace-v1");
    // manifest + users + courses + session pointer
    assert_eq!(exported["entryCount"], 4);
    let courses_src = request_ok(&mut stdin, &mut reader, "5", "courses.list", json!({}));

    request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "workspace.select",
        json!({ "path": dst.to_string_lossy() }),
    );
    let empty = request_ok(&mut stdin, &mut reader, "7", "courses.list", json!({}));
    assert_eq!(empty["courses"], json!([]));

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "backup.import",
        json!({ "inPath": bundle.to_string_lossy() }),
    );
    assert_eq!(imported["keysRestored"], 3);

    let courses_dst = request_ok(&mut stdin, &mut reader, "9", "courses.list", json!({}));
    assert_eq!(courses_src, courses_dst);
    let session = request_ok(&mut stdin, &mut reader, "10", "session.get", json!({}));
    assert_eq!(session["user"]["id"], user["id"]);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(src);
    let _ = std::fs::remove_dir_all(dst);
}
