//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use taxon::constants::DimConfig;
use taxon::pipeline::{PipelineConfig, SearchPipeline};
use taxon::{MockEmbeddingClient, MockRerankClient, MockVectorIndex, QueryEncoder};

pub const TEST_DIM: usize = 4;

pub type MockPipeline = SearchPipeline<MockEmbeddingClient, MockVectorIndex, MockRerankClient>;

pub const SKIN: [f32; 4] = [1.0, 0.0, 0.0, 0.0];
pub const WOMENS_HEALTH: [f32; 4] = [0.0, 1.0, 0.0, 0.0];
pub const PEDIATRIC_HEART: [f32; 4] = [0.0, 0.0, 1.0, 0.0];
pub const TEETH: [f32; 4] = [0.6, 0.0, 0.0, 0.8];
pub const NOWHERE: [f32; 4] = [-1.0, 0.0, 0.0, 0.0];

fn canonical(code: &str, display: &str, classification: &str, specialization: &str) -> HashMap<String, String> {
    HashMap::from([
        ("code".to_string(), code.to_string()),
        ("displayName".to_string(), display.to_string()),
        ("classification".to_string(), classification.to_string()),
        ("specialization".to_string(), specialization.to_string()),
        ("section".to_string(), "Individual".to_string()),
    ])
}

/// A handful of taxonomy documents. The dental clinic uses legacy Title Case
/// keys only.
pub fn seeded_index() -> MockVectorIndex {
    let index = MockVectorIndex::new(TEST_DIM);
    index.insert(
        SKIN.to_vec(),
        canonical("207N00000X", "Dermatology Physician", "Dermatology", ""),
    );
    index.insert(
        WOMENS_HEALTH.to_vec(),
        canonical(
            "207V00000X",
            "Obstetrics & Gynecology Physician",
            "Obstetrics & Gynecology",
            "",
        ),
    );
    index.insert(
        PEDIATRIC_HEART.to_vec(),
        canonical(
            "2080P0202X",
            "Pediatric Cardiology Physician",
            "Pediatrics",
            "Pediatric Cardiology",
        ),
    );
    index.insert(
        vec![0.0, 0.0, 0.9, 0.435_889_9],
        canonical(
            "207RC0000X",
            "Cardiovascular Disease Physician",
            "Internal Medicine",
            "Cardiovascular Disease",
        ),
    );
    index.insert(
        TEETH.to_vec(),
        HashMap::from([
            ("Code".to_string(), "261QD0000X".to_string()),
            ("Display Name".to_string(), "Dental Clinic/Center".to_string()),
            ("Classification".to_string(), "Clinic/Center".to_string()),
            ("Specialization".to_string(), "Dental".to_string()),
            ("Section".to_string(), "Non-Individual".to_string()),
        ]),
    );
    index
}

/// Embedder with fixed vectors for the fixture queries.
pub fn seeded_embedder() -> MockEmbeddingClient {
    let embedder = MockEmbeddingClient::new(TEST_DIM);
    embedder.set_vector("skin doctor", SKIN.to_vec());
    embedder.set_vector("women's health doctor", WOMENS_HEALTH.to_vec());
    embedder.set_vector("pediatric heart doctor", PEDIATRIC_HEART.to_vec());
    embedder.set_vector("tooth pain", TEETH.to_vec());
    embedder.set_vector("nowhere", NOWHERE.to_vec());
    embedder
}

pub fn encoder(embedder: MockEmbeddingClient) -> QueryEncoder<MockEmbeddingClient> {
    QueryEncoder::new(embedder, DimConfig::new(TEST_DIM), 64).unwrap()
}

pub fn pipeline(config: PipelineConfig, reranker: MockRerankClient) -> MockPipeline {
    SearchPipeline::new(config, seeded_index())
        .with_encoder(encoder(seeded_embedder()))
        .with_reranker(reranker)
}
