//! Question answering and transcript recording.

mod common;

use std::sync::Arc;

use common::{MockChatModel, MockEmbeddingProvider, config, write_dataset};
use sales_rag::{
    ChatSession, GREETING, IndexManager, NO_RELEVANT_DATA, RagError, Role, SalesAssistant,
    SalesRagConfig, build_prompt,
};

async fn assistant(
    config: SalesRagConfig,
    embedder: Arc<MockEmbeddingProvider>,
    chat: Arc<MockChatModel>,
) -> SalesAssistant {
    let index = IndexManager::new(config.clone(), embedder.clone()).obtain_index().await.unwrap();
    SalesAssistant::builder()
        .config(config)
        .embedding_provider(embedder)
        .index(index)
        .chat_model(chat)
        .build()
        .unwrap()
}

#[tokio::test]
async fn answer_is_returned_unmodified_and_recorded() {
    let temp = tempfile::tempdir().unwrap();
    let config = SalesRagConfig { top_k: 2, ..config(temp.path(), write_dataset(temp.path(), 6)) };
    let chat = Arc::new(MockChatModel::answering("Store 3 sold $1002.25 that week."));
    let assistant = assistant(config, Arc::new(MockEmbeddingProvider::new()), chat.clone()).await;

    let mut session = ChatSession::new();
    let answer = assistant.answer(&mut session, "  What did store 3 sell?  ").await.unwrap();
    assert_eq!(answer, "Store 3 sold $1002.25 that week.");

    let turns = session.turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].text, GREETING);
    assert_eq!((turns[1].role, turns[1].text.as_str()), (Role::User, "What did store 3 sell?"));
    assert_eq!((turns[2].role, turns[2].text.as_str()), (Role::Assistant, answer.as_str()));

    let prompts = chat.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].ends_with("Question: What did store 3 sell?\nHelpful Answer:"));
    assert_eq!(prompts[0].matches(", weekly sales were $").count(), 2);
}

#[tokio::test]
async fn retrieve_is_bounded_by_top_k_and_sorted() {
    let temp = tempfile::tempdir().unwrap();
    let config = SalesRagConfig { top_k: 3, ..config(temp.path(), write_dataset(temp.path(), 10)) };
    let assistant = assistant(
        config,
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(MockChatModel::answering("ok")),
    )
    .await;

    let results = assistant.retrieve("holiday weeks").await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn exact_sentence_is_the_top_hit() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path(), write_dataset(temp.path(), 8));
    let embedder = Arc::new(MockEmbeddingProvider::new());
    let index = IndexManager::new(config.clone(), embedder.clone()).obtain_index().await.unwrap();
    let assistant = SalesAssistant::builder()
        .config(config.clone())
        .embedding_provider(embedder)
        .index(index)
        .chat_model(Arc::new(MockChatModel::answering("ok")))
        .build()
        .unwrap();

    let documents = sales_rag::loader::prepare_documents(&config.dataset_path).unwrap();
    let results = assistant.retrieve(&documents[4].text).await.unwrap();
    assert_eq!(results[0].record.id, "row-4");
    assert!((results[0].score - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn nothing_above_threshold_skips_the_model() {
    let temp = tempfile::tempdir().unwrap();
    let config = SalesRagConfig {
        similarity_threshold: 1.0,
        ..config(temp.path(), write_dataset(temp.path(), 4))
    };
    let chat = Arc::new(MockChatModel::answering("should not be used"));
    let assistant = assistant(config, Arc::new(MockEmbeddingProvider::new()), chat.clone()).await;

    let mut session = ChatSession::empty();
    let answer = assistant.answer(&mut session, "weather on mars").await.unwrap();
    assert_eq!(answer, NO_RELEVANT_DATA);
    assert!(chat.prompts().is_empty());
    assert_eq!(session.last().unwrap().text, NO_RELEVANT_DATA);
}

#[tokio::test]
async fn model_failure_is_recorded_in_the_transcript() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path(), write_dataset(temp.path(), 3));
    let chat = Arc::new(MockChatModel::failing("rate limited"));
    let assistant = assistant(config, Arc::new(MockEmbeddingProvider::new()), chat).await;

    let mut session = ChatSession::new();
    let err = assistant.answer(&mut session, "Best week?").await.unwrap_err();
    assert!(matches!(err, RagError::Model { .. }));

    let last = session.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text, "An error occurred: Model error (Mock): rate limited");
    assert_eq!(session.len(), 3);

    // The session keeps working after a failed turn.
    let err = assistant.answer(&mut session, "Worst week?").await.unwrap_err();
    assert!(matches!(err, RagError::Model { .. }));
    assert_eq!(session.len(), 5);
}

#[tokio::test]
async fn embedding_failure_at_query_time_is_recorded_in_the_transcript() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path(), write_dataset(temp.path(), 3));
    let index = IndexManager::new(config.clone(), Arc::new(MockEmbeddingProvider::new()))
        .obtain_index()
        .await
        .unwrap();

    let chat = Arc::new(MockChatModel::answering("unused"));
    let assistant = SalesAssistant::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbeddingProvider::failing()))
        .index(index)
        .chat_model(chat.clone())
        .build()
        .unwrap();

    let mut session = ChatSession::new();
    let err = assistant.answer(&mut session, "Best week?").await.unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));

    let last = session.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text, "An error occurred: Embedding error (Mock): service unavailable");
    assert_eq!(session.len(), 3);
    assert!(chat.prompts().is_empty());
}

#[tokio::test]
async fn blank_question_is_rejected_without_recording() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path(), write_dataset(temp.path(), 2));
    let chat = Arc::new(MockChatModel::answering("ok"));
    let assistant = assistant(config, Arc::new(MockEmbeddingProvider::new()), chat.clone()).await;

    let mut session = ChatSession::new();
    assert!(matches!(assistant.answer(&mut session, "   ").await, Err(RagError::EmptyQuestion)));
    assert_eq!(session.len(), 1);
    assert!(chat.prompts().is_empty());
}

#[tokio::test]
async fn builder_rejects_mismatched_embedding_model() {
    let temp = tempfile::tempdir().unwrap();
    let config = config(temp.path(), write_dataset(temp.path(), 2));
    let index = IndexManager::new(config.clone(), Arc::new(MockEmbeddingProvider::new()))
        .obtain_index()
        .await
        .unwrap();

    let result = SalesAssistant::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbeddingProvider::new().with_model("other")))
        .index(index)
        .chat_model(Arc::new(MockChatModel::answering("ok")))
        .build();
    assert!(matches!(result, Err(RagError::Config(_))));

    assert!(matches!(SalesAssistant::builder().build(), Err(RagError::Config(_))));
}

#[test]
fn prompt_lists_context_before_question() {
    let prompt = build_prompt("Which store?", &[]);
    assert!(prompt.starts_with("Use the following pieces of context"));
    assert!(prompt.ends_with("Question: Which store?\nHelpful Answer:"));
}
