use anyhow::Result;
use fanlog::{FileSinkOptions, LoggerBuilder, LoggerOptions, SinkKind};
use fanlog_test_utils::MemoryTarget;

// The registry is process wide so every step runs in one test.
#[test]
fn global_logger_tracks_last_build() -> Result<()> {
    assert!(fanlog::global().is_none());

    assert!(matches!(
        fanlog::build(None),
        Err(fanlog::Error::MissingOptions)
    ));
    assert!(fanlog::global().is_none());

    let simple = fanlog::build_simple();
    let global = fanlog::global().expect("global logger");
    assert_eq!(simple.sinks(), global.sinks());
    assert_eq!(&[SinkKind::Console], global.sinks());

    let built = LoggerBuilder::new(LoggerOptions {
        file: Some(FileSinkOptions::new("memory.log")),
        console: None,
    })
    .console_target(MemoryTarget::new().make_writer())
    .file_target(MemoryTarget::new())
    .build()?;
    let global = fanlog::global().expect("global logger");
    assert_eq!(built.sinks(), global.sinks());
    assert!(global.has_console());
    assert!(global.has_file());

    assert!(fanlog::build(None).is_err());
    assert!(fanlog::global().expect("global logger").has_file());
    Ok(())
}
