use std::fs;
use std::sync::Arc;

use ai_llm_service::ModelGateway;
use ai_llm_service::testing::{FAKE_EMBEDDING_DIM, FakeRuntime, RuntimeCall};
use contextor::Contextor;
use rag_store::Indexer;
use rag_store::memory::MemoryStore;
use tempfile::TempDir;

#[tokio::test]
async fn indexed_document_reaches_the_generation_prompt() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "The sky is blue.").unwrap();

    let runtime = Arc::new(FakeRuntime::new().with_reply("Blue."));
    let gateway = Arc::new(ModelGateway::new(runtime.clone(), "mxbai-embed-large"));
    let store = Arc::new(MemoryStore::new(FAKE_EMBEDDING_DIM));

    let report = Indexer::new(gateway.clone(), store.clone())
        .index_all(tmp.path())
        .await
        .unwrap();
    assert_eq!(report.files, vec!["a.txt"]);

    let answer = Contextor::new(gateway, store)
        .answer("What color is the sky?", "llama3")
        .await
        .unwrap();
    assert_eq!(answer, "Blue.");

    let prompts = runtime.generate_prompts();
    assert_eq!(prompts.len(), 2, "availability probe + answer: {prompts:?}");
    assert_eq!(prompts[0], "Test");
    assert!(prompts[1].contains("Using this data: The sky is blue. . Respond"));
    assert!(prompts[1].ends_with("*PROMPT*: What color is the sky?"));

    let embed_models: Vec<String> = runtime
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RuntimeCall::Embed { model, .. } => Some(model),
            _ => None,
        })
        .collect();
    assert!(embed_models.iter().all(|m| m == "mxbai-embed-large"));
}

#[tokio::test]
async fn nearest_of_several_documents_is_used() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("sky.txt"), "The sky is blue.").unwrap();
    fs::write(tmp.path().join("zz.md"), "zzzz zzzz zzzz zzzz").unwrap();

    let runtime = Arc::new(FakeRuntime::new());
    let gateway = Arc::new(ModelGateway::new(runtime.clone(), "mxbai-embed-large"));
    let store = Arc::new(MemoryStore::new(FAKE_EMBEDDING_DIM));

    Indexer::new(gateway.clone(), store.clone())
        .index_all(tmp.path())
        .await
        .unwrap();
    Contextor::new(gateway, store)
        .answer("The sky is blue?", "llama3")
        .await
        .unwrap();

    let prompts = runtime.generate_prompts();
    let last = prompts.last().unwrap();
    assert!(last.contains("The sky is blue."));
    assert!(!last.contains("zzzz"));
}
