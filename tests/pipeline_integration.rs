//! End-to-end pipeline runs against in-memory index and service mocks.

mod common;

use common::{MockPipeline, TEST_DIM, pipeline, seeded_index};
use taxon::pipeline::{PipelineConfig, PipelineError, SearchPipeline, Stage};
use taxon::retrieval::RetrievalFilter;
use taxon::vectordb::VectorQuery;
use taxon::{MockEmbeddingClient, MockRerankClient, MockVectorIndex, RerankOutcome};

fn codes(pipeline_outcome: &taxon::QueryOutcome) -> Vec<&str> {
    pipeline_outcome
        .results()
        .iter()
        .filter_map(|r| r.record().code.as_deref())
        .collect()
}

#[tokio::test]
async fn test_rerank_reorders_gated_candidates() {
    let pipeline = pipeline(
        PipelineConfig::default(),
        MockRerankClient::new().with_scores(vec![0.2, 0.9]),
    );

    let outcome = pipeline.run("pediatric heart doctor").await.unwrap();

    assert_eq!(outcome.gated, 2);
    assert!(matches!(outcome.rerank, RerankOutcome::Reranked(_)));
    assert_eq!(codes(&outcome), vec!["207RC0000X", "2080P0202X"]);

    let top = &outcome.results()[0];
    assert_eq!(top.rerank_score, Some(0.9));
    assert!((top.candidate.score.unwrap() - 0.9).abs() < 1e-3);

    let requests = pipeline.reranker().unwrap().client().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].documents.len(), 2);
    assert_eq!(requests[0].model, "rerank-2");
    assert!(requests[0].documents[0].starts_with("Pediatrics | Pediatric Cardiology"));
}

#[tokio::test]
async fn test_rerank_failure_keeps_ann_order() {
    let config = PipelineConfig {
        threshold: Some(0.5),
        final_k: 2,
        ..Default::default()
    };
    let pipeline = pipeline(config, MockRerankClient::failing("503 upstream"));

    let outcome = pipeline.run("pediatric heart doctor").await.unwrap();

    assert!(outcome.rerank.is_degraded());
    assert_eq!(codes(&outcome), vec!["2080P0202X", "207RC0000X"]);
    assert!(outcome.results().iter().all(|r| r.rerank_score.is_none()));
}

#[tokio::test]
async fn test_legacy_fields_resolve() {
    let config = PipelineConfig {
        rerank_enabled: false,
        ..Default::default()
    };
    let pipeline = pipeline(config, MockRerankClient::new());

    let outcome = pipeline.run("tooth pain").await.unwrap();
    let rows = outcome.rows();

    assert_eq!(rows[0].code.as_deref(), Some("261QD0000X"));
    assert_eq!(rows[0].display_name.as_deref(), Some("Dental Clinic/Center"));
    assert_eq!(rows[0].section.as_deref(), Some("Non-Individual"));
    assert_eq!(rows[0].rank, Some(1));
    assert!(rows[0].rerank_score.is_none());
}

#[tokio::test]
async fn test_section_filter_over_fetches() {
    let config = PipelineConfig {
        retrieval_k: 10,
        threshold: None,
        rerank_enabled: false,
        filter: RetrievalFilter::section("Individual"),
        ..Default::default()
    };
    let pipeline = pipeline(config, MockRerankClient::new());

    let outcome = pipeline.run("tooth pain").await.unwrap();

    assert!(!codes(&outcome).contains(&"261QD0000X"));
    assert_eq!(outcome.retrieved, 4);

    let requests = pipeline.index().requests();
    assert_eq!(requests[0].limit, 100);
    assert!(requests[0].num_candidates >= requests[0].limit);
}

#[tokio::test]
async fn test_all_gated_out_yields_placeholder_row() {
    let pipeline = pipeline(PipelineConfig::default(), MockRerankClient::new());

    let outcome = pipeline.run("nowhere").await.unwrap();

    assert_eq!(outcome.gated, 0);
    assert!(outcome.results().is_empty());
    assert_eq!(pipeline.reranker().unwrap().client().call_count(), 0);

    let rows = outcome.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_placeholder());
    assert_eq!(rows[0].query, "nowhere");
}

#[tokio::test]
async fn test_server_side_embedding_sends_text() {
    let index = seeded_index();
    index.register_text("skin doctor", common::SKIN.to_vec());

    let config = PipelineConfig {
        use_server_side_embedding: true,
        rerank_enabled: false,
        ..Default::default()
    };
    let pipeline: MockPipeline = SearchPipeline::new(config, index);

    let outcome = pipeline.run("skin doctor").await.unwrap();

    assert_eq!(codes(&outcome)[0], "207N00000X");
    let requests = pipeline.index().requests();
    assert_eq!(
        requests[0].query,
        VectorQuery::Text {
            text: "skin doctor".to_string(),
            model: "voyage-3.5".to_string(),
        }
    );
}

#[tokio::test]
async fn test_embedding_failure_is_fatal() {
    let embedder = MockEmbeddingClient::new(TEST_DIM);
    embedder.fail_with("401 unauthorized");
    let pipeline: MockPipeline = SearchPipeline::new(PipelineConfig::default(), MockVectorIndex::new(TEST_DIM))
        .with_encoder(common::encoder(embedder))
        .with_reranker(MockRerankClient::new());

    let err = pipeline.run("skin doctor").await.unwrap_err();

    assert_eq!(err.stage(), Stage::Embedding);
    assert_eq!(err.query(), Some("skin doctor"));
    assert!(pipeline.index().requests().is_empty());
}

#[tokio::test]
async fn test_missing_reranker_is_not_ready() {
    let pipeline: MockPipeline = SearchPipeline::new(PipelineConfig::default(), seeded_index())
        .with_encoder(common::encoder(common::seeded_embedder()));

    let err = pipeline.run("skin doctor").await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::NotConfigured {
            stage: Stage::Rerank
        }
    ));
}
