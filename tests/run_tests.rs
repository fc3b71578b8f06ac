//! End-to-end tests of the demonstration flow with a stub generator.
//!
//! The stub records every call in thread-local storage, reset by `fixture`.

use clap::Parser;
use llama_instruct::llama::{ChatPrediction, Dialog, Role};
use llama_instruct::{run, Args, BuildParams, ChatGenerator, ConfigError, SamplingParams};
use std::cell::RefCell;
use std::path::Path;
use thiserror::Error;

#[derive(Default)]
struct Calls {
    builds: Vec<BuildParams>,
    completions: Vec<(Vec<Dialog>, SamplingParams)>,
}

thread_local! {
    static CALLS: RefCell<Calls> = RefCell::new(Calls::default());
}

#[derive(Error, Debug)]
#[error("stub failure: {0}")]
struct StubError(String);

/// Echoes the last message of every dialog back, tagged with its position.
struct EchoGenerator;

impl ChatGenerator for EchoGenerator {
    type Error = StubError;

    fn build(params: &BuildParams) -> Result<Self, StubError> {
        CALLS.with(|c| c.borrow_mut().builds.push(params.clone()));
        Ok(Self)
    }

    fn chat_completion(
        &mut self,
        dialogs: &[Dialog],
        params: &SamplingParams,
    ) -> Result<Vec<ChatPrediction>, StubError> {
        CALLS.with(|c| {
            c.borrow_mut()
                .completions
                .push((dialogs.to_vec(), *params))
        });
        Ok(dialogs
            .iter()
            .enumerate()
            .map(|(i, d)| ChatPrediction::assistant(format!("reply {i}: {}", d.last().unwrap().content)))
            .collect())
    }
}

/// Fails inside the completion call.
struct FailingGenerator;

impl ChatGenerator for FailingGenerator {
    type Error = StubError;

    fn build(_params: &BuildParams) -> Result<Self, StubError> {
        Ok(Self)
    }

    fn chat_completion(
        &mut self,
        _dialogs: &[Dialog],
        _params: &SamplingParams,
    ) -> Result<Vec<ChatPrediction>, StubError> {
        Err(StubError("out of memory".into()))
    }
}

fn args(ckpt_dir: &Path, tokenizer: &Path, extra: &[&str]) -> Args {
    let mut argv = vec![
        "llama-instruct".to_string(),
        "--ckpt-dir".to_string(),
        ckpt_dir.display().to_string(),
        "--tokenizer-path".to_string(),
        tokenizer.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).unwrap()
}

fn fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    CALLS.with(|c| *c.borrow_mut() = Calls::default());
    let dir = tempfile::tempdir().unwrap();
    let tokenizer = dir.path().join("tokenizer.json");
    std::fs::write(&tokenizer, b"{}").unwrap();
    (dir, tokenizer)
}

#[test]
fn test_missing_checkpoint_dir_fails_before_build() {
    let (dir, tokenizer) = fixture();
    let missing = dir.path().join("no-such-dir");

    let mut out = Vec::new();
    let err = run::<EchoGenerator, _>(&args(&missing, &tokenizer, &[]), &mut out).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingCheckpointDir(p)) if *p == missing
    ));
    assert!(err.to_string().contains("no-such-dir"));
    assert!(out.is_empty());
    CALLS.with(|c| assert!(c.borrow().builds.is_empty()));
}

#[test]
fn test_missing_tokenizer_fails_before_build() {
    let (dir, _) = fixture();
    let missing = dir.path().join("tokenizer.model");

    let mut out = Vec::new();
    let err = run::<EchoGenerator, _>(&args(dir.path(), &missing, &[]), &mut out).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingTokenizerFile(p)) if *p == missing
    ));
    assert!(out.is_empty());
    CALLS.with(|c| assert!(c.borrow().builds.is_empty()));
}

#[test]
fn test_transcript_lists_every_instruction_in_order() {
    let (dir, tokenizer) = fixture();

    let mut out = Vec::new();
    run::<EchoGenerator, _>(&args(dir.path(), &tokenizer, &[]), &mut out).unwrap();
    let transcript = String::from_utf8(out).unwrap();

    let blocks: Vec<&str> = transcript
        .split("\n==================================\n\n")
        .filter(|b| !b.is_empty())
        .collect();
    assert_eq!(blocks.len(), 3);

    assert!(blocks[0].starts_with("User: In Bash, how do I list all text files"));
    assert!(blocks[0].contains("\n> Assistant: reply 0: In Bash"));
    assert!(blocks[1].starts_with("User: What is the difference between inorder and preorder"));
    assert!(blocks[1].contains("\n> Assistant: reply 1: What is the difference"));
    assert!(blocks[2].starts_with("System: Provide answers in JavaScript\n\nUser: Write a function"));
    assert!(blocks[2].contains("\n> Assistant: reply 2: Write a function"));

    CALLS.with(|c| {
        let calls = c.borrow();
        assert_eq!(calls.builds.len(), 1);
        assert_eq!(calls.completions.len(), 1);
        let (dialogs, _) = &calls.completions[0];
        assert_eq!(dialogs.len(), 3);
        assert_eq!(dialogs[2][0].role, Role::System);
        assert_eq!(dialogs[2][1].role, Role::User);
    });
}

#[test]
fn test_parameters_are_forwarded_unchanged() {
    let (dir, tokenizer) = fixture();
    let extra = [
        "--temperature",
        "0.6",
        "--top-p",
        "0.9",
        "--max-gen-len",
        "128",
        "--max-seq-len",
        "2048",
        "--max-batch-size",
        "4",
    ];

    let mut out = Vec::new();
    run::<EchoGenerator, _>(&args(dir.path(), &tokenizer, &extra), &mut out).unwrap();

    CALLS.with(|c| {
        let calls = c.borrow();
        let build = &calls.builds[0];
        assert_eq!(build.ckpt_dir, dir.path());
        assert_eq!(build.tokenizer_path, tokenizer);
        assert_eq!(build.max_seq_len, 2048);
        assert_eq!(build.max_batch_size, 4);

        let (_, sampling) = &calls.completions[0];
        assert_eq!(
            *sampling,
            SamplingParams {
                temperature: 0.6,
                top_p: 0.9,
                max_gen_len: Some(128),
            }
        );
    });
}

#[test]
fn test_defaults_reach_the_generator() {
    let (dir, tokenizer) = fixture();

    let mut out = Vec::new();
    run::<EchoGenerator, _>(&args(dir.path(), &tokenizer, &[]), &mut out).unwrap();

    CALLS.with(|c| {
        let calls = c.borrow();
        assert_eq!(calls.builds[0].max_seq_len, 512);
        assert_eq!(calls.builds[0].max_batch_size, 8);
        let (_, sampling) = &calls.completions[0];
        assert_eq!(sampling.temperature, 0.2);
        assert_eq!(sampling.top_p, 0.95);
        assert_eq!(sampling.max_gen_len, None);
    });
}

#[test]
fn test_generator_errors_propagate() {
    let (dir, tokenizer) = fixture();

    let mut out = Vec::new();
    let err = run::<FailingGenerator, _>(&args(dir.path(), &tokenizer, &[]), &mut out).unwrap_err();

    let stub = err.downcast_ref::<StubError>().unwrap();
    assert_eq!(stub.0, "out of memory");
    assert!(out.is_empty());
}
