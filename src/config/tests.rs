use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_taxon_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for name in [
            "TAXON_QDRANT_URL",
            "TAXON_COLLECTION",
            "TAXON_VECTOR_NAME",
            "TAXON_VOYAGE_API_KEY",
            "VOYAGE_API_KEY",
            "TAXON_VOYAGE_URL",
            "TAXON_EMBED_MODEL",
            "TAXON_EMBED_DIM",
            "TAXON_RERANK_MODEL",
            "TAXON_RETRIEVAL_K",
            "TAXON_FINAL_K",
            "TAXON_THRESHOLD",
            "TAXON_RERANK",
            "TAXON_SERVER_EMBEDDING",
            "TAXON_SECTION",
            "TAXON_CODE_PREFIX",
            "TAXON_REQUEST_TIMEOUT_SECS",
            "TAXON_QUERY_CACHE_CAPACITY",
        ] {
            env::remove_var(name);
        }
    }
}

fn valid_config() -> Config {
    Config {
        voyage_api_key: Some("pa-test".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "taxonomy251");
    assert_eq!(config.embed_model, "voyage-3.5");
    assert_eq!(config.embedding_dim, 1024);
    assert_eq!(config.rerank_model, "rerank-2");
    assert_eq!(config.retrieval_k, 100);
    assert_eq!(config.final_k, 10);
    assert_eq!(config.threshold, Some(0.70));
    assert!(config.rerank_enabled);
    assert!(!config.server_side_embedding);
    assert!(config.section.is_none());
    assert!(config.voyage_api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_taxon_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.retrieval_k, 100);
    assert_eq!(config.final_k, 10);
    assert_eq!(config.threshold, Some(0.70));
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_taxon_env();

    with_env_vars(
        &[
            ("TAXON_QDRANT_URL", "http://qdrant:6334"),
            ("TAXON_COLLECTION", "nucc"),
            ("TAXON_EMBED_DIM", "2048"),
            ("TAXON_EMBED_MODEL", "voyage-3-large"),
            ("TAXON_RETRIEVAL_K", "50"),
            ("TAXON_FINAL_K", "5"),
            ("TAXON_THRESHOLD", "0.65"),
            ("TAXON_RERANK", "off"),
            ("TAXON_SECTION", "Individual"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.qdrant_url, "http://qdrant:6334");
            assert_eq!(config.collection, "nucc");
            assert_eq!(config.embedding_dim, 2048);
            assert_eq!(config.embed_model, "voyage-3-large");
            assert_eq!(config.retrieval_k, 50);
            assert_eq!(config.final_k, 5);
            assert_eq!(config.threshold, Some(0.65));
            assert!(!config.rerank_enabled);
            assert_eq!(config.section.as_deref(), Some("Individual"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_threshold_none() {
    clear_taxon_env();

    with_env_vars(&[("TAXON_THRESHOLD", "none")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.threshold.is_none());
    });
}

#[test]
#[serial]
fn test_from_env_api_key_fallback() {
    clear_taxon_env();

    with_env_vars(&[("VOYAGE_API_KEY", "pa-fallback")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.voyage_api_key.as_deref(), Some("pa-fallback"));
    });

    with_env_vars(
        &[
            ("VOYAGE_API_KEY", "pa-fallback"),
            ("TAXON_VOYAGE_API_KEY", "pa-primary"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.voyage_api_key.as_deref(), Some("pa-primary"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_values_use_defaults() {
    clear_taxon_env();

    with_env_vars(&[("TAXON_COLLECTION", "   "), ("TAXON_SECTION", "")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.collection, "taxonomy251");
        assert!(config.section.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_retrieval_k() {
    clear_taxon_env();

    with_env_vars(&[("TAXON_RETRIEVAL_K", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInteger { .. }));
        assert!(err.to_string().contains("TAXON_RETRIEVAL_K"));
    });
}

#[test]
#[serial]
fn test_invalid_threshold_string() {
    clear_taxon_env();

    with_env_vars(&[("TAXON_THRESHOLD", "high")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFloat { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bool() {
    clear_taxon_env();

    with_env_vars(&[("TAXON_RERANK", "maybe")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    });
}

#[test]
fn test_validate_ok() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_validate_final_k_exceeds_retrieval_k() {
    let config = Config {
        retrieval_k: 5,
        final_k: 10,
        ..valid_config()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::FinalKExceedsRetrievalK {
            final_k: 10,
            retrieval_k: 5
        }
    ));
}

#[test]
fn test_validate_zero_sizes() {
    let config = Config {
        retrieval_k: 0,
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue {
            name: "retrieval_k"
        })
    ));

    let config = Config {
        final_k: 0,
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue { name: "final_k" })
    ));
}

#[test]
fn test_validate_nan_threshold() {
    let config = Config {
        threshold: Some(f32::NAN),
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { .. })
    ));
}

#[test]
fn test_validate_unsupported_dimension() {
    let config = Config {
        embedding_dim: 1536,
        ..valid_config()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidDimension(_))
    ));
}

#[test]
fn test_validate_requires_api_key() {
    let config = Config::default();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingEnvVar { .. })
    ));

    let server_only = Config {
        server_side_embedding: true,
        rerank_enabled: false,
        ..Default::default()
    };
    assert!(!server_only.needs_voyage());
    assert!(server_only.validate().is_ok());
}

#[test]
fn test_pipeline_config_carries_knobs() {
    let config = Config {
        retrieval_k: 40,
        final_k: 4,
        threshold: None,
        rerank_enabled: false,
        section: Some("Individual".to_string()),
        code_prefix: Some("207".to_string()),
        ..valid_config()
    };

    let pipeline = config.pipeline_config();
    assert_eq!(pipeline.retrieval_k, 40);
    assert_eq!(pipeline.final_k, 4);
    assert!(pipeline.threshold.is_none());
    assert!(!pipeline.rerank_enabled);
    assert_eq!(pipeline.rerank_model, "rerank-2");
    assert_eq!(pipeline.filter.section.as_deref(), Some("Individual"));
    assert_eq!(pipeline.filter.code_prefix.as_deref(), Some("207"));
}

#[test]
fn test_request_timeout() {
    let config = Config {
        request_timeout_secs: 7,
        ..Default::default()
    };
    assert_eq!(config.request_timeout(), std::time::Duration::from_secs(7));
}
