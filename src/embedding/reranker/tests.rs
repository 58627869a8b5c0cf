use std::time::Duration;

use super::*;

fn request(documents: &[&str], top_k: usize) -> RerankRequest {
    RerankRequest {
        query: "skin doctor".to_string(),
        documents: documents.iter().map(|d| d.to_string()).collect(),
        model: "rerank-2".to_string(),
        top_k,
    }
}

#[test]
fn test_config_validate() {
    let config = RerankerConfig::new("pa-key", "https://api.voyageai.com/v1");
    assert!(config.validate().is_ok());

    assert!(RerankerConfig::new("  ", "https://x").validate().is_err());
    assert!(RerankerConfig::new("k", "").validate().is_err());
    assert!(
        RerankerConfig::new("k", "https://x")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
}

#[test]
fn test_voyage_reranker_rejects_invalid_config() {
    let err = VoyageReranker::new(RerankerConfig::new("", "https://x")).unwrap_err();
    assert!(matches!(err, RerankerError::InvalidConfig { .. }));
}

#[test]
fn test_response_parses() {
    let json = r#"{"object":"list","data":[{"index":1,"relevance_score":0.91},{"index":0,"relevance_score":0.12}],"model":"rerank-2","usage":{"total_tokens":10}}"#;
    let response: RerankResponse = serde_json::from_str(json).unwrap();
    let hits = check_hits(response.data, 2, 2).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].index, 1);
    assert!((hits[0].relevance_score - 0.91).abs() < 1e-6);
}

#[test]
fn test_check_hits_out_of_range() {
    let hits = vec![RerankHit {
        index: 3,
        relevance_score: 0.5,
    }];
    let err = check_hits(hits, 3, 1).unwrap_err();
    assert!(matches!(err, RerankerError::IndexOutOfRange { index: 3, len: 3 }));
}

fn hit(index: usize, relevance_score: f32) -> RerankHit {
    RerankHit {
        index,
        relevance_score,
    }
}

#[test]
fn test_check_hits_rejects_duplicates() {
    let err = check_hits(vec![hit(0, 0.9), hit(0, 0.8), hit(1, 0.7)], 5, 2).unwrap_err();
    assert!(matches!(err, RerankerError::DuplicateIndex { index: 0 }));
}

#[test]
fn test_check_hits_requires_top_k_hits() {
    let err = check_hits(vec![hit(3, 0.9)], 5, 3).unwrap_err();
    assert!(matches!(
        err,
        RerankerError::TooFewHits {
            expected: 3,
            actual: 1
        }
    ));

    // top_k larger than the document list only needs every document back
    assert!(check_hits(vec![hit(1, 0.4), hit(0, 0.2)], 2, 10).is_ok());
}

#[test]
fn test_check_hits_rejects_non_finite_scores() {
    let err = check_hits(vec![hit(0, f32::NAN), hit(1, 0.3)], 2, 2).unwrap_err();
    assert!(matches!(err, RerankerError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_mock_scripted_reply_is_verbatim() {
    let mock = MockRerankClient::new().with_reply(vec![hit(2, 0.1), hit(0, 0.9)]);
    let hits = mock.rerank(&request(&["a", "b", "c"], 1)).await.unwrap();

    assert_eq!(hits, vec![hit(2, 0.1), hit(0, 0.9)]);
}

#[tokio::test]
async fn test_mock_scores_by_overlap() {
    let mock = MockRerankClient::new();
    let hits = mock
        .rerank(&request(&["Cardiology", "Dermatology skin"], 2))
        .await
        .unwrap();

    assert_eq!(hits[0].index, 1);
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.requests()[0].model, "rerank-2");
}

#[tokio::test]
async fn test_mock_fixed_scores_and_top_k() {
    let mock = MockRerankClient::new().with_scores(vec![0.1, 0.9, 0.5]);
    let hits = mock.rerank(&request(&["a", "b", "c"], 2)).await.unwrap();

    let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
    assert_eq!(order, vec![1, 2]);
}

#[tokio::test]
async fn test_mock_failure() {
    let mock = MockRerankClient::failing("service down");
    let err = mock.rerank(&request(&["a"], 1)).await.unwrap_err();

    assert!(err.to_string().contains("service down"));
    assert_eq!(mock.call_count(), 1);
}
