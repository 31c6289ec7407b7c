//! Integration tests for file-mode batch processing

use deid::anonymization::{adapter::Deidentifier, config::EngineConfig, RuleBasedEngine};
use deid::cli::commands::file::FileArgs;
use deid::cli::{EXIT_OK, EXIT_PARTIAL};
use deid::config::{DeidConfig, OnError, OutputFormat};
use deid::core::batch::BatchProcessor;
use deid::domain::DeidError;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::watch;

const PETER_OUT: &str =
    "[PATIENT] was not very well during the evening. His mother put him to bed on [DATUM-1].";
const JANSEN_OUT: &str = "De heer [PATIENT] ([LEEFTIJD-1] jaar) is ontslagen van de kliniek. \
     Bel [TELEFOONNUMMER-1] bij vragen.";
const JONG_OUT: &str = "Mevrouw [PATIENT] voelt zich weer jong. Contact: [EMAIL-1]";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("input_from_file.tsv")
}

fn deidentifier() -> Deidentifier {
    let engine = RuleBasedEngine::new(EngineConfig::default()).unwrap();
    Deidentifier::new(Arc::new(engine))
}

fn fixture_reader() -> BufReader<File> {
    BufReader::new(File::open(fixture_path()).unwrap())
}

#[test]
fn test_fixture_text_output_skips_bad_line() {
    let processor = BatchProcessor::new(deidentifier());
    let mut output = Vec::new();

    let summary = processor.process(fixture_reader(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec![PETER_OUT, JANSEN_OUT, JONG_OUT]);

    assert_eq!(summary.total_lines, 5);
    assert_eq!(summary.blank_lines, 1);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.annotations, 7);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].line, 4);
    assert!(summary.failures[0].message.contains("found 6"));
    assert!(!summary.is_successful());
}

#[test]
fn test_fixture_abort_stops_at_bad_line() {
    let processor = BatchProcessor::new(deidentifier()).with_on_error(OnError::Abort);
    let mut output = Vec::new();

    let err = processor.process(fixture_reader(), &mut output).unwrap_err();

    match err {
        DeidError::Batch { line, message } => {
            assert_eq!(line, 4);
            assert!(message.contains("Malformed record"));
        }
        other => panic!("expected batch error, got {other:?}"),
    }

    // Lines before the failure are already written
    let output = String::from_utf8(output).unwrap();
    assert_eq!(output.lines().count(), 2);
}

#[test]
fn test_fixture_appended_format_keeps_columns() {
    let processor = BatchProcessor::new(deidentifier()).with_output_format(OutputFormat::Appended);
    let mut output = Vec::new();

    processor.process(fixture_reader(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    let first: Vec<&str> = output.lines().next().unwrap().split('\t').collect();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0], "HASH_A");
    assert!(first[8].starts_with("Peter was not very well"));
    assert_eq!(first[9], PETER_OUT);
}

#[test]
fn test_fixture_jsonl_format() {
    let processor = BatchProcessor::new(deidentifier()).with_output_format(OutputFormat::Jsonl);
    let mut output = Vec::new();

    processor.process(fixture_reader(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    let objects: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(objects.len(), 3);
    assert_eq!(objects[2]["hash_id"], "HASH_D");
    assert_eq!(objects[2]["note_id"], "NOTE_ID_1237");
    assert_eq!(objects[2]["text"], JONG_OUT);
}

#[test]
fn test_run_level_disabled_groups() {
    let processor = BatchProcessor::new(deidentifier().with_disabled(["dates", "names"]));
    let mut output = Vec::new();

    processor.process(fixture_reader(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(
        output.lines().next().unwrap(),
        "Peter was not very well during the evening. His mother put him to bed on 20-03-2021."
    );
}

#[tokio::test]
async fn test_file_command_writes_output_file() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("out.txt");
    let (_tx, rx) = watch::channel(false);

    let args = FileArgs {
        file_name: fixture_path(),
        output: Some(output_path.clone()),
        on_error: None,
        format: None,
        disabled: Vec::new(),
    };

    let code = args.execute(DeidConfig::default(), rx).await.unwrap();

    // The malformed line makes this a partial run
    assert_eq!(code, EXIT_PARTIAL);
    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(written.lines().collect::<Vec<_>>(), vec![PETER_OUT, JANSEN_OUT, JONG_OUT]);
}

#[tokio::test]
async fn test_file_command_clean_input_exits_ok() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("clean.tsv");
    let output_path = dir.path().join("out.jsonl");
    fs::write(
        &input_path,
        "H1\tN1\tBrief\tJan\tJ.\tJansen\tJANSEN,J.\t\tJan Jansen kwam op 20 maart 2021.\n",
    )
    .unwrap();
    let (_tx, rx) = watch::channel(false);

    let args = FileArgs {
        file_name: input_path,
        output: Some(output_path.clone()),
        on_error: Some(OnError::Abort),
        format: Some(OutputFormat::Jsonl),
        disabled: Vec::new(),
    };

    let code = args.execute(DeidConfig::default(), rx).await.unwrap();

    assert_eq!(code, EXIT_OK);
    let written = fs::read_to_string(&output_path).unwrap();
    let object: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
    assert_eq!(object["text"], "[PATIENT] kwam op [DATUM-1].");
}

#[tokio::test]
async fn test_file_command_missing_input_is_an_error() {
    let (_tx, rx) = watch::channel(false);
    let args = FileArgs {
        file_name: PathBuf::from("/nonexistent/notes.tsv"),
        output: None,
        on_error: None,
        format: None,
        disabled: Vec::new(),
    };

    assert!(args.execute(DeidConfig::default(), rx).await.is_err());
}
