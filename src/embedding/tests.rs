use std::sync::Arc;
use std::time::Duration;

use super::client::{EmbedResponse, order_embeddings};
use super::*;
use crate::constants::{DimConfig, DimValidationError};

const TEST_DIM: usize = 8;

fn encoder() -> QueryEncoder<MockEmbeddingClient> {
    QueryEncoder::new(MockEmbeddingClient::new(TEST_DIM), DimConfig::new(TEST_DIM), 64)
        .expect("encoder should build")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_encode_memoizes_identical_text() {
    let encoder = encoder();

    let first = encoder.encode("heart doctor").await.unwrap();
    let second = encoder.encode("heart doctor").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(encoder.client().call_count(), 1);
    assert_eq!(first.len(), TEST_DIM);
}

#[tokio::test]
async fn test_encode_distinguishes_case_and_whitespace() {
    let encoder = encoder();

    encoder.encode("Heart doctor").await.unwrap();
    encoder.encode("heart doctor").await.unwrap();
    encoder.encode("heart doctor ").await.unwrap();

    assert_eq!(encoder.client().call_count(), 3);
    assert_eq!(encoder.cache_len(), 3);
}

#[tokio::test]
async fn test_encode_rejects_blank_query() {
    let encoder = encoder();
    let err = encoder.encode("   ").await.unwrap_err();

    assert!(matches!(err, EmbeddingError::EmptyInput));
    assert_eq!(encoder.client().call_count(), 0);
}

#[tokio::test]
async fn test_encode_propagates_service_failure() {
    let encoder = encoder();
    encoder.client().fail_with("quota exceeded");

    let err = encoder.encode("kidney doctor").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::RequestFailed { .. }));
    assert!(encoder.cached("kidney doctor").is_none());

    encoder.client().recover();
    assert!(encoder.encode("kidney doctor").await.is_ok());
}

#[tokio::test]
async fn test_encode_checks_dimension() {
    let encoder = encoder();
    encoder.client().set_vector("short", vec![1.0, 2.0]);

    let err = encoder.encode("short").await.unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::Dimension(DimValidationError::DimensionMismatch {
            expected: 8,
            actual: 2
        })
    ));
}

#[test]
fn test_encoder_rejects_mismatched_client() {
    let result = QueryEncoder::new(MockEmbeddingClient::new(4), DimConfig::new(TEST_DIM), 8);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_prefetch_batches_and_skips_duplicates() {
    let encoder = encoder();
    encoder.encode("acne").await.unwrap();

    let texts = strings(&["acne", "allergy", "allergy", "", "asthma", "autism", "back pain"]);
    let embedded = encoder.prefetch(&texts, 2).await.unwrap();

    assert_eq!(embedded, 4);
    let batches = encoder.client().batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[1], strings(&["allergy", "asthma"]));
    assert_eq!(batches[2], strings(&["autism", "back pain"]));

    let calls_before = encoder.client().call_count();
    encoder.encode("asthma").await.unwrap();
    assert_eq!(encoder.client().call_count(), calls_before);
}

#[tokio::test]
async fn test_prefetch_nothing_pending() {
    let encoder = encoder();
    assert_eq!(encoder.prefetch(&[], 64).await.unwrap(), 0);
    assert_eq!(encoder.client().call_count(), 0);
}

#[test]
fn test_mock_vectors_are_deterministic_unit_vectors() {
    let mock = MockEmbeddingClient::new(16);
    let a = mock.deterministic_vector("skin doctor");
    let b = mock.deterministic_vector("skin doctor");
    let c = mock.deterministic_vector("kidney doctor");

    assert_eq!(a, b);
    assert_ne!(a, c);
    let norm = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_order_embeddings_uses_index() {
    let json = r#"{"object":"list","data":[
        {"object":"embedding","index":1,"embedding":[0.0,1.0]},
        {"object":"embedding","index":0,"embedding":[1.0,0.0]}
    ],"model":"voyage-3.5","usage":{"total_tokens":4}}"#;
    let response: EmbedResponse = serde_json::from_str(json).unwrap();

    let vectors = order_embeddings(response, 2, 2).unwrap();
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[test]
fn test_order_embeddings_rejects_bad_shapes() {
    let count: EmbedResponse =
        serde_json::from_str(r#"{"data":[{"index":0,"embedding":[1.0,0.0]}]}"#).unwrap();
    assert!(order_embeddings(count, 2, 2).is_err());

    let width: EmbedResponse =
        serde_json::from_str(r#"{"data":[{"index":0,"embedding":[1.0]}]}"#).unwrap();
    assert!(order_embeddings(width, 1, 2).is_err());

    let dup: EmbedResponse = serde_json::from_str(
        r#"{"data":[{"index":0,"embedding":[1.0]},{"index":0,"embedding":[2.0]}]}"#,
    )
    .unwrap();
    assert!(order_embeddings(dup, 2, 1).is_err());
}

#[test]
fn test_voyage_embedder_config() {
    let config = VoyageConfig {
        api_key: "pa-test".to_string(),
        base_url: "https://api.voyageai.com/v1/".to_string(),
        model: "voyage-3.5".to_string(),
        output_dimension: 1024,
        timeout: Duration::from_secs(30),
    };
    let embedder = VoyageEmbedder::new(config.clone()).unwrap();
    assert_eq!(embedder.url(), "https://api.voyageai.com/v1/embeddings");
    assert_eq!(embedder.dimension(), 1024);
    assert_eq!(embedder.model(), "voyage-3.5");

    let missing_key = VoyageConfig {
        api_key: String::new(),
        ..config
    };
    assert!(matches!(
        VoyageEmbedder::new(missing_key),
        Err(EmbeddingError::InvalidConfig { .. })
    ));
}

#[test]
fn test_input_type_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&InputType::Query).unwrap(), "\"query\"");
    assert_eq!(
        serde_json::to_string(&InputType::Document).unwrap(),
        "\"document\""
    );
}
