mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use mediascribe::output::TIMESTAMP_FORMAT;
use mediascribe::report::TracingReporter;
use mediascribe::{Device, DeviceSelection, Error, ModelSize, Reporter, RunConfig, Runner};

use common::{Accelerator, FakeLoader, FixedDuration, RecordingReporter, write_wav};

fn config_for(input: &Path, output_dir: &Path) -> RunConfig {
    let mut config = RunConfig::new(input);
    config.model = ModelSize::Tiny;
    config.language = Some("en".to_owned());
    config.output_dir = output_dir.to_path_buf();
    config
}

fn file_names(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn transcribes_media_to_txt_and_srt() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("sample.wav");
    write_wav(&input, 1.0, 16_000, 1)?;
    let output_dir = dir.path().join("transcripts");

    let reporter = Arc::new(RecordingReporter::default());
    let runner = Runner::new(
        FakeLoader::default(),
        FixedDuration(Some(5.0)),
        Accelerator(false),
        Arc::clone(&reporter) as Arc<dyn Reporter>,
    );

    let paths = runner.run(&config_for(&input, &output_dir))?;

    // `<basename>.<YYYYMMDD-HHMMSS>.{txt,srt}` under the output directory.
    assert_eq!(paths.txt.parent(), Some(output_dir.as_path()));
    let txt_name = paths.txt.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let timestamp = txt_name
        .strip_prefix("sample.")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .expect("txt name has the expected shape");
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)?;
    assert_eq!(paths.srt, paths.txt.with_extension("srt"));

    assert_eq!(fs::read_to_string(&paths.txt)?, "Treat. Yo. Self.\n");
    assert_eq!(
        fs::read_to_string(&paths.srt)?,
        "1\n00:00:00,000 --> 00:00:02,500\nTreat.\n\n2\n00:00:02,500 --> 00:00:04,750\nYo. Self.\n\n"
    );
    assert_eq!(file_names(&output_dir)?.len(), 2);

    let events = reporter.events();
    assert_eq!(
        events,
        vec![
            "info: Loading model tiny on cpu (half_precision=false) …".to_owned(),
            "started: 5".to_owned(),
            "percent: 50".to_owned(),
            "percent: 100".to_owned(),
            "finished".to_owned(),
            format!("ok: Wrote transcript: {}", paths.txt.display()),
            format!("ok: Wrote subtitles: {}", paths.srt.display()),
        ]
    );
    Ok(())
}

#[test]
fn missing_input_fails_without_creating_outputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output_dir = dir.path().join("transcripts");
    let loader = FakeLoader::default();
    let runner = Runner::new(
        loader,
        FixedDuration(Some(5.0)),
        Accelerator(false),
        Arc::new(TracingReporter),
    );

    let err = runner
        .run(&config_for(&dir.path().join("nope.mp4"), &output_dir))
        .unwrap_err();

    assert!(matches!(err, Error::InputNotFound { ref path } if path.ends_with("nope.mp4")));
    assert!(output_dir.is_dir());
    assert!(file_names(&output_dir)?.is_empty());
    assert!(runner.loader().loads().is_empty());
    Ok(())
}

#[test]
fn unknown_duration_still_produces_both_outputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("clip.wav");
    write_wav(&input, 0.5, 16_000, 1)?;

    let reporter = Arc::new(RecordingReporter::default());
    let runner = Runner::new(
        FakeLoader::default(),
        FixedDuration(None),
        Accelerator(false),
        Arc::clone(&reporter) as Arc<dyn Reporter>,
    );

    let paths = runner.run(&config_for(&input, dir.path()))?;
    assert!(paths.txt.is_file());
    assert!(paths.srt.is_file());

    let events = reporter.events();
    assert!(events.contains(&"warn: Unable to get audio duration: ffprobe not found on PATH".to_owned()));
    assert!(events.contains(&"started: 0".to_owned()));
    Ok(())
}

#[test]
fn output_dir_creation_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("sample.wav");
    write_wav(&input, 0.25, 16_000, 1)?;
    let output_dir = dir.path().join("nested/transcripts");

    let runner = Runner::new(
        FakeLoader::default(),
        FixedDuration(Some(0.25)),
        Accelerator(false),
        Arc::new(TracingReporter),
    );
    let config = config_for(&input, &output_dir);

    runner.run(&config)?;
    runner.run(&config)?;
    assert!(output_dir.is_dir());
    Ok(())
}

#[test]
fn force_cpu_overrides_available_accelerator() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("sample.wav");
    write_wav(&input, 0.25, 16_000, 1)?;

    let runner = Runner::new(
        FakeLoader::default(),
        FixedDuration(Some(0.25)),
        Accelerator(true),
        Arc::new(TracingReporter),
    );

    let mut config = config_for(&input, dir.path());
    config.force_cpu = true;
    runner.run(&config)?;

    config.force_cpu = false;
    runner.run(&config)?;

    assert_eq!(
        runner.loader().loads(),
        vec![
            DeviceSelection::cpu(),
            DeviceSelection {
                device: Device::Gpu,
                half_precision: true,
            },
        ]
    );
    Ok(())
}

#[test]
fn transcription_failure_leaves_no_outputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("sample.wav");
    write_wav(&input, 0.25, 16_000, 1)?;
    let output_dir = dir.path().join("transcripts");

    let reporter = Arc::new(RecordingReporter::default());
    let runner = Runner::new(
        FakeLoader::failing(),
        FixedDuration(Some(0.25)),
        Accelerator(false),
        Arc::clone(&reporter) as Arc<dyn Reporter>,
    );

    let err = runner.run(&config_for(&input, &output_dir)).unwrap_err();
    assert!(err.to_string().contains("out of memory"));
    assert!(!err.is_user_error());
    assert!(file_names(&output_dir)?.is_empty());
    assert_eq!(reporter.events().last().map(String::as_str), Some("finished"));
    Ok(())
}

#[test]
fn undecodable_input_is_a_runtime_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("broken.mp4");
    fs::write(&input, b"not really a video")?;

    let runner = Runner::new(
        FakeLoader::default(),
        FixedDuration(None),
        Accelerator(false),
        Arc::new(TracingReporter),
    );

    let err = runner.run(&config_for(&input, dir.path())).unwrap_err();
    assert!(err.to_string().contains("failed to probe media"));
    Ok(())
}
