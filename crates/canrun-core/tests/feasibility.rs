//! Integration tests for the public `canrun-core` API.
//!
//! ```bash
//! cargo test -p canrun-core --test feasibility
//! ```

use canrun_core::{
    EstimatorConfig, FeasibilityEstimator, ModelVariant, PlatformClass, QuantKey, Verdict,
    VariantCatalog,
};

fn llama_family() -> Vec<ModelVariant> {
    vec![
        ModelVariant::new("llama-3.2-1b-q4", 1.2, 0.8, QuantKey::Q4KM, 131_072),
        ModelVariant::new("llama-3.2-3b-q4", 3.2, 2.0, QuantKey::Q4KM, 131_072),
        ModelVariant::new("llama-3.1-8b-q4", 8.0, 4.9, QuantKey::Q4KM, 131_072),
        ModelVariant::new("llama-3.1-70b-q4", 70.6, 42.5, QuantKey::Q4KM, 131_072),
    ]
}

// ============================================================================
// Estimation and classification
// ============================================================================

#[test]
fn seven_b_q4_on_sixteen_gb_mac() {
    let estimator = FeasibilityEstimator::default();
    let variant = ModelVariant::new("mistral-7b-instruct-q4", 7.0, 4.7, QuantKey::Q4KM, 8192);

    let assessment = estimator.assess(&variant, Some(16.0), PlatformClass::MacosLike);

    let e = assessment.estimate;
    assert_eq!(e.context, 8192);
    assert!((e.weights_gb - 4.935).abs() < 1e-9);
    assert!((e.kv_cache_gb - 1.0).abs() < 1e-9);
    assert!((e.runtime_overhead_gb - 1.48).abs() < 1e-9);
    assert_eq!(e.total_gb, e.weights_gb + e.kv_cache_gb + e.runtime_overhead_gb);

    let memory = assessment.memory.expect("ram supplied");
    assert!((memory.reserved_gb - 4.4).abs() < 1e-9);
    assert!((memory.usable_ram_gb - 11.6).abs() < 1e-9);
    assert_eq!(assessment.verdict, Verdict::Comfortable);
}

#[test]
fn verdict_never_worsens_with_more_ram() {
    let estimator = FeasibilityEstimator::default();
    for variant in llama_family() {
        for platform in PlatformClass::ALL {
            let mut last_rank = 0;
            for ram in (2u32..=256).step_by(2) {
                let verdict = estimator.assess(&variant, Some(f64::from(ram)), platform).verdict;
                let rank = verdict.rank().expect("known verdict");
                assert!(
                    rank >= last_rank,
                    "{} on {platform} got worse at {ram} GB",
                    variant.id
                );
                last_rank = rank;
            }
        }
    }
}

#[test]
fn total_grows_with_context() {
    let estimator = FeasibilityEstimator::default();
    let variant = ModelVariant::new("qwen-14b", 14.8, 9.0, QuantKey::Q4KM, 32768);
    let totals: Vec<f64> = [512, 2048, 8192, 32768]
        .into_iter()
        .map(|ctx| estimator.estimate(&variant, Some(ctx)).total_gb)
        .collect();
    assert!(totals.windows(2).all(|w| w[0] < w[1]), "{totals:?}");
}

#[test]
fn zero_parameter_model_is_finite() {
    let estimator = FeasibilityEstimator::default();
    let variant = ModelVariant::new("stub", 0.0, 0.0, QuantKey::F16, 512);
    let assessment = estimator.assess(&variant, Some(16.0), PlatformClass::LinuxLike);

    assert_eq!(assessment.estimate.weights_gb, 0.0);
    assert!((assessment.estimate.total_gb - 1.215).abs() < 1e-9);
    assert_eq!(assessment.verdict, Verdict::Comfortable);
}

#[test]
fn missing_ram_propagates_unknown() {
    let estimator = FeasibilityEstimator::default();
    let variants = llama_family();

    for v in &variants {
        let a = estimator.assess(v, None, PlatformClass::WindowsLike);
        assert_eq!(a.verdict, Verdict::Unknown);
        assert!(a.headroom_gb.is_none());
        assert!(a.estimate.total_gb > 0.0);
        assert!(estimator.max_context(v, None, PlatformClass::WindowsLike).is_none());
    }

    let rows = estimator.build_matrix(&[7.0], &QuantKey::ALL, None, None, PlatformClass::Unknown);
    assert!(rows[0].cells.iter().all(|c| c.verdict == Verdict::Unknown));
    assert!(estimator.select_best(&variants, None, PlatformClass::Unknown).is_none());
}

// ============================================================================
// Matrix
// ============================================================================

#[test]
fn matrix_covers_every_size_and_quant() {
    let estimator = FeasibilityEstimator::default();
    let sizes = [0.5, 1.5, 3.0, 7.0, 8.0, 13.0, 14.0, 32.0, 34.0, 70.0, 72.0, 405.0];
    let rows = estimator.build_matrix(
        &sizes,
        &QuantKey::ALL,
        Some(32.0),
        None,
        PlatformClass::MacosLike,
    );

    assert_eq!(rows.len(), sizes.len());
    for row in &rows {
        assert_eq!(row.cells.len(), QuantKey::ALL.len());
        for key in QuantKey::ALL {
            assert!(row.cell(key).is_some(), "{}B missing {key}", row.params_b);
        }
        // higher precision never fits better
        for pair in row.cells.windows(2) {
            assert!(pair[0].total_gb < pair[1].total_gb);
            assert!(pair[1].verdict.rank() <= pair[0].verdict.rank());
        }
    }
}

#[test]
fn matrix_serializes_with_canonical_names() {
    let estimator = FeasibilityEstimator::default();
    let rows = estimator.build_matrix(
        &[8.0],
        &[QuantKey::Q4KM],
        Some(16.0),
        None,
        PlatformClass::LinuxLike,
    );
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["cells"][0]["quant"], "Q4_K_M");
    assert_eq!(json[0]["cells"][0]["verdict"], "comfortable");
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn select_best_scales_with_ram() {
    let estimator = FeasibilityEstimator::default();
    let variants = llama_family();

    let pick = |ram: f64| {
        estimator
            .select_best(&variants, Some(ram), PlatformClass::LinuxLike)
            .map(|v| v.id.clone())
    };

    assert_eq!(pick(4.0).as_deref(), Some("llama-3.2-1b-q4"));
    assert_eq!(pick(16.0).as_deref(), Some("llama-3.1-8b-q4"));
    assert_eq!(pick(96.0).as_deref(), Some("llama-3.1-70b-q4"));
}

#[test]
fn select_best_is_order_independent() {
    let estimator = FeasibilityEstimator::default();
    let mut variants = llama_family();
    variants.push(ModelVariant::new("llama-3.1-8b-q4-alt", 8.0, 4.6, QuantKey::Q4KM, 8192));

    let expected = estimator
        .select_best(&variants, Some(24.0), PlatformClass::MacosLike)
        .map(|v| v.id.clone());

    for rotation in 0..variants.len() {
        let mut rotated = variants.clone();
        rotated.rotate_left(rotation);
        let got = estimator
            .select_best(&rotated, Some(24.0), PlatformClass::MacosLike)
            .map(|v| v.id.clone());
        assert_eq!(got, expected, "rotation {rotation}");
    }
    assert_eq!(expected.as_deref(), Some("llama-3.1-8b-q4"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_file_changes_verdicts() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("canrun.toml");
    std::fs::write(
        &path,
        r#"
[verdict]
comfortable_gb = 8.0
tight_gb = 4.0
maybe_gb = 0.0
"#,
    )
    .unwrap();

    let config = EstimatorConfig::load(&path).unwrap();
    let estimator = FeasibilityEstimator::new(config);
    let variant = ModelVariant::new("mistral-7b-instruct-q4", 7.0, 4.7, QuantKey::Q4KM, 8192);

    // headroom ≈ 4.2 GB: comfortable by default, tight under the stricter file
    let a = estimator.assess(&variant, Some(16.0), PlatformClass::MacosLike);
    assert_eq!(a.verdict, Verdict::Tight);
    assert_eq!(
        FeasibilityEstimator::default()
            .assess(&variant, Some(16.0), PlatformClass::MacosLike)
            .verdict,
        Verdict::Comfortable
    );
}

#[test]
fn catalog_round_trip_through_selection() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{
  "variants": [
    { "id": "gemma-2b", "params_b": 2.6, "size_gb": 1.7, "quant": "Q4_K_M", "context": 8192 },
    { "id": "gemma-9b", "params_b": 9.2, "size_gb": 5.8, "quant": "Q4_K_M", "context": 8192 },
    { "id": "gemma-27b", "params_b": 27.2, "size_gb": 16.6, "quant": "Q4_K_M", "context": 8192 }
  ]
}"#,
    )
    .unwrap();

    let catalog = VariantCatalog::load(&path).unwrap();
    let best = FeasibilityEstimator::default()
        .select_best(&catalog.variants, Some(24.0), PlatformClass::WindowsLike)
        .unwrap();
    assert_eq!(best.id, "gemma-9b");
}
