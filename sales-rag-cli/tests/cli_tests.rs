//! Flag parsing and transcript rendering.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use sales_rag::openai::OPENAI_API_BASE;
use sales_rag::{GREETING, Role, SalesRagConfig, Turn};
use sales_rag_cli::args::Args;
use sales_rag_cli::console::{banner, format_turn};
use sales_rag_cli::startup::require_api_key;

#[test]
fn no_flags_yield_default_config() {
    let args = Args::try_parse_from(["sales-rag"]).unwrap();
    assert_eq!(args.base_url, OPENAI_API_BASE);
    assert_eq!(args.to_config().unwrap(), SalesRagConfig::default());
}

#[test]
fn flags_override_defaults() {
    let args = Args::try_parse_from([
        "sales-rag",
        "--dataset",
        "data/sales.csv",
        "--index-dir",
        "/tmp/idx",
        "--top-k",
        "8",
        "--similarity-threshold",
        "-0.25",
        "--chat-model",
        "gpt-4o-mini",
        "--temperature",
        "0.5",
    ])
    .unwrap();

    let config = args.to_config().unwrap();
    assert_eq!(config.dataset_path, PathBuf::from("data/sales.csv"));
    assert_eq!(config.index_dir, PathBuf::from("/tmp/idx"));
    assert_eq!(config.top_k, 8);
    assert_eq!(config.similarity_threshold, -0.25);
    assert_eq!(config.chat_model, "gpt-4o-mini");
    assert_eq!(config.temperature, 0.5);
    assert_eq!(config.embedding_model, "text-embedding-3-small");
}

#[test]
fn invalid_values_fail_validation() {
    let args = Args::try_parse_from(["sales-rag", "--top-k", "0"]).unwrap();
    let err = args.to_config().unwrap_err();
    assert!(err.to_string().contains("top_k"), "unexpected error: {err}");

    let args = Args::try_parse_from(["sales-rag", "--embed-batch-size", "0"]).unwrap();
    assert!(args.to_config().is_err());
}

#[test]
fn non_numeric_flags_are_rejected_by_the_parser() {
    assert!(Args::try_parse_from(["sales-rag", "--top-k", "many"]).is_err());
}

#[test]
fn api_key_is_required() {
    assert!(require_api_key(None).is_err());
    assert!(require_api_key(Some(String::new())).is_err());
    assert!(require_api_key(Some("sk-abc".into())).is_ok());
}

#[test]
fn turns_render_with_speaker_labels() {
    colored::control::set_override(false);

    let greeting = Turn { role: Role::Assistant, text: GREETING.to_string() };
    assert_eq!(format_turn(&greeting, false), format!("Assistant: {GREETING}"));

    let question = Turn { role: Role::User, text: "Which store sold most?".into() };
    assert_eq!(format_turn(&question, false), "You: Which store sold most?");

    let failure = Turn { role: Role::Assistant, text: "An error occurred: boom".into() };
    assert_eq!(format_turn(&failure, true), "Assistant: An error occurred: boom");

    let text = banner();
    assert!(text.contains("45 stores"));
    assert!(text.contains("Example questions"));

    // Highlighting follows the outcome, not the wording of the answer.
    colored::control::set_override(true);
    let answer = Turn { role: Role::Assistant, text: "An error occurred: none, sales rose".into() };
    let plain = format_turn(&answer, false);
    let highlighted = format_turn(&answer, true);
    let red = answer.text.red().to_string();
    colored::control::set_override(false);

    assert!(!plain.contains(&red));
    assert!(highlighted.contains(&red));
}

#[test]
fn banner_examples_use_indexed_date_format() {
    let text = banner();
    assert!(text.contains("2012-02-10"));
    assert!(!text.contains("05-02-2010"));
}
