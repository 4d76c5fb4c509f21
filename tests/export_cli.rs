//! Integration tests for non-interactive export (-o/--export flag)

use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ledgergrid_cli_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn run(dir: &PathBuf, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ledgergrid"))
        // Keep logs out of the user's data dir.
        .arg("--log-file")
        .arg(dir.join("test.log"))
        .args(args)
        .output()
        .expect("Failed to execute ledgergrid");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_export_demo_sheet() {
    let dir = scratch_dir("export_demo");
    let csv = dir.join("demo.csv");
    let (stdout, _, code) = run(&dir, &["--export", csv.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Exported to"));

    let content = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Item,Description,Unit,Qty,Rate,Amount,Bill");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("P1,Site survey,Days,2,"));
    assert!(lines[1].ends_with(",20.00,true"));
    assert_eq!(lines[3], "Subtotal,,,,,35.00,");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_export_sheet_file() {
    let dir = scratch_dir("export_sheet");
    let sheet = dir.join("sheet.toml");
    std::fs::write(
        &sheet,
        r#"
[[columns]]
id = "qty"
header = "Qty"
type = "number"

[[columns]]
id = "rate"
header = "Rate"
type = "rate"

[[columns]]
id = "amount"
header = "Amount"
type = "amount"

[[rows]]
qty = 3
rate = 1.5

[[rows]]
is_subtotal = true
"#,
    )
    .unwrap();
    let csv = dir.join("out.csv");
    let (_, _, code) = run(
        &dir,
        &[sheet.to_str().unwrap(), "-o", csv.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    assert_eq!(
        std::fs::read_to_string(&csv).unwrap(),
        "Qty,Rate,Amount\n3,1.5,4.50\nSubtotal,,4.50\n"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_sheet_fails() {
    let dir = scratch_dir("missing_sheet");
    let (_, stderr, code) = run(&dir, &["/nonexistent/sheet.toml", "-o", "/dev/null"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("loading /nonexistent/sheet.toml"), "{stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}
