use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_label-ocr"))
        .args(args)
        .env_remove("LABEL_OCR_SERVE")
        .output()
        .expect("Failed to run label-ocr")
}

#[test]
fn test_no_arguments_prints_usage_and_fails() {
    let output = run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: label-ocr <IMAGE>"));
}

#[test]
fn test_missing_image_fails_without_json() {
    let output = run(&["/nonexistent/label.jpg"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout must stay empty");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: Image file /nonexistent/label.jpg does not exist"),
        "unexpected stderr: {}",
        stderr
    );
}

#[test]
fn test_help_lists_configuration_flags() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--serve",
        "--tesseract-language",
        "--page-seg-mode",
        "--enhance-contrast",
        "--save-processed",
    ] {
        assert!(help.contains(flag), "missing {} in --help", flag);
    }
}
