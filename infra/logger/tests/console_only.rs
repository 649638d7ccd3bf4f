use eco_logger::{ConsoleFormat, LevelFilter, Logger, LoggerError};

#[test]
fn console_logger_has_no_file_writer_and_cannot_be_installed_twice() {
    let logger = Logger::builder()
        .name("ecopoint-console")
        .console(Some(ConsoleFormat::Compact))
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");

    assert!(!logger.writes_files(), "console-only logger should not spawn a file writer");

    let err = Logger::builder()
        .name("ecopoint-console-again")
        .init()
        .expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "expected subscriber error, got {err}");
}
