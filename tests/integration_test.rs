// Integration tests for Drapex
use chrono::{Duration, TimeZone, Utc};
use drapex::prelude::*;
use drapex::{CompatibilityWeights, ListingStatus, ListingUpdate, ScoringPolicy};
use drapex_core::AttributeField;
use drapex_similarity::InteractionKind;
use std::collections::BTreeSet;
use std::sync::Arc;

fn engine(dim: usize) -> Engine {
    Engine::new(EngineConfig {
        embedding_dim: dim,
        ..EngineConfig::default()
    })
    .unwrap()
}

fn garment(id: &str, category: &str, embedding: Vec<f32>) -> Garment {
    Garment::new(id, category, Condition::Good).with_embedding(Vector::new(embedding))
}

fn wardrobe() -> Vec<Garment> {
    vec![
        Garment::new("shirt", "shirt", Condition::Good)
            .with_colors(["white"])
            .with_materials(["cotton"])
            .with_style_tags(["classic"])
            .with_occasions(["work"]),
        Garment::new("blouse", "blouse", Condition::Excellent)
            .with_colors(["navy"])
            .with_materials(["silk"])
            .with_style_tags(["classic"])
            .with_occasions(["work", "evening"]),
        Garment::new("chinos", "trousers", Condition::Good)
            .with_colors(["beige"])
            .with_materials(["cotton"])
            .with_style_tags(["classic"])
            .with_occasions(["work"]),
        Garment::new("jeans", "jeans", Condition::Fair)
            .with_colors(["blue"])
            .with_materials(["denim"])
            .with_style_tags(["casual"])
            .with_occasions(["weekend"]),
        Garment::new("loafers", "shoes", Condition::Good)
            .with_colors(["brown"])
            .with_materials(["leather"])
            .with_occasions(["work", "weekend"]),
    ]
}

#[test]
fn test_visual_search_orders_by_similarity() {
    let engine = engine(3);
    engine
        .add_garments(vec![
            garment("a", "coat", vec![1.0, 0.0, 0.0]),
            garment("b", "coat", vec![0.7, 0.7, 0.0]),
            garment("c", "coat", vec![0.0, 1.0, 0.0]),
        ])
        .unwrap();

    let response = engine
        .visual_search(&Vector::new(vec![1.0, 0.1, 0.0]), 10, None, None)
        .unwrap();
    let ids: Vec<String> = response.result.iter().map(|m| m.garment_id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    let similarities: Vec<f32> = response.result.iter().filter_map(|m| m.similarity).collect();
    assert!(similarities.windows(2).all(|w| w[0] >= w[1]));
    assert!(similarities.iter().all(|s| (-1.0..=1.0).contains(s)));
    assert_eq!(response.stats.candidates_count, 3);
}

#[test]
fn test_visual_search_ties_prefer_most_recent_insert() {
    let engine = engine(2);
    engine.add_garment(garment("old", "dress", vec![1.0, 0.0])).unwrap();
    engine.add_garment(garment("new", "dress", vec![2.0, 0.0])).unwrap();

    let response = engine
        .visual_search(&Vector::new(vec![1.0, 0.0]), 2, None, None)
        .unwrap();
    assert_eq!(response.result[0].garment_id, GarmentId::from("new"));
    assert_eq!(response.result[1].garment_id, GarmentId::from("old"));
}

#[test]
fn test_visual_search_errors() {
    let engine = engine(3);
    let query = Vector::new(vec![1.0, 0.0, 0.0]);
    assert!(matches!(
        engine.visual_search(&query, 5, None, None),
        Err(Error::EmptyCorpus)
    ));

    engine.add_garment(garment("a", "coat", vec![1.0, 0.0, 0.0])).unwrap();
    assert!(matches!(
        engine.visual_search(&query, 0, None, None),
        Err(Error::InvalidTopK(0))
    ));
    assert!(matches!(
        engine.visual_search(&Vector::new(vec![1.0, 0.0]), 5, None, None),
        Err(Error::DimensionMismatch { expected: 3, actual: 2 })
    ));
    assert!(matches!(
        engine.visual_search(&Vector::new(vec![0.0, 0.0, 0.0]), 5, None, None),
        Err(Error::DegenerateVector)
    ));
    assert!(matches!(
        engine.add_garment(garment("bad", "coat", vec![1.0])),
        Err(Error::DimensionMismatch { .. })
    ));

    let only_dresses = AttributeFilter::new(FilterCondition::Equals {
        field: AttributeField::Category,
        value: "dress".to_string(),
    });
    assert!(matches!(
        engine.visual_search(&query, 5, Some(&only_dresses), None),
        Err(Error::EmptyCorpus)
    ));
}

#[test]
fn test_similar_garments_exclude_the_source() {
    let engine = engine(2);
    engine
        .add_garments(vec![
            garment("a", "coat", vec![1.0, 0.0]).with_colors(["camel"]),
            garment("b", "coat", vec![0.9, 0.1]).with_colors(["camel", "black"]),
            garment("c", "dress", vec![0.0, 1.0]),
        ])
        .unwrap();

    let response = engine.visual_search_like(&GarmentId::from("a"), 5, None).unwrap();
    assert!(response.result.iter().all(|m| m.garment_id != GarmentId::from("a")));
    assert_eq!(response.result[0].garment_id, GarmentId::from("b"));
    assert!(response.result[0]
        .reasons
        .contains(&"Shared colors: camel".to_string()));
    assert!(response.result[0]
        .reasons
        .contains(&"Same category: coat".to_string()));
}

#[test]
fn test_listing_updates_are_visible() {
    let engine = engine(2);
    engine
        .add_garment(garment("a", "coat", vec![1.0, 0.0]).with_price(90.0))
        .unwrap();

    let updated = engine
        .update_listing(
            &GarmentId::from("a"),
            ListingUpdate {
                price: Some(70.0),
                status: Some(ListingStatus::Sold),
            },
        )
        .unwrap();
    assert_eq!(updated.price, Some(70.0));
    assert_eq!(updated.status, ListingStatus::Sold);
    assert_eq!(engine.get_garment(&GarmentId::from("a")).unwrap().price, Some(70.0));

    assert!(matches!(
        engine.update_listing(&GarmentId::from("missing"), ListingUpdate::default()),
        Err(Error::GarmentNotFound(_))
    ));
}

#[test]
fn test_concurrent_inserts_and_queries() {
    let engine = Arc::new(engine(4));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("g-{}-{}", t, i);
                    let v = vec![1.0 + i as f32, t as f32, 0.5, 0.25];
                    engine.add_garment(garment(&id, "top", v)).unwrap();
                    let hits = engine
                        .visual_search(&Vector::new(vec![1.0, 0.0, 0.0, 0.0]), 5, None, None)
                        .unwrap();
                    assert!(!hits.result.is_empty());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(engine.garment_count(), 400);
}

#[test]
fn test_profile_then_recommendations() {
    let engine = engine(2);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

    let owned = vec![
        Garment::new("w1", "dress", Condition::Good)
            .with_style_tags(["bohemian"])
            .with_colors(["rust"])
            .with_size("M"),
        Garment::new("w2", "skirt", Condition::Good)
            .with_style_tags(["bohemian"])
            .with_colors(["rust", "cream"])
            .with_size("M"),
    ];
    let interactions = vec![UserInteraction {
        kind: InteractionKind::Purchase,
        occurred_at: now,
        garment: Garment::new("p1", "blouse", Condition::Excellent)
            .with_style_tags(["bohemian", "romantic"])
            .with_colors(["cream"])
            .with_size("M"),
    }];
    let profile = engine.analyze_style_profile(&owned, &interactions);
    assert_eq!(profile.dominant_aesthetic.as_deref(), Some("bohemian"));
    assert!(profile.preferred_colors.contains_key("rust"));

    engine
        .add_garments(vec![
            garment("match", "dress", vec![1.0, 0.0])
                .with_style_tags(["bohemian"])
                .with_colors(["rust"])
                .with_size("M"),
            garment("miss", "blazer", vec![0.0, 1.0])
                .with_style_tags(["preppy"])
                .with_colors(["green"])
                .with_size("XXL"),
        ])
        .unwrap();

    let response = engine.recommend(&profile, 10, None).unwrap();
    assert_eq!(response.result[0].garment_id, GarmentId::from("match"));
    let scores: Vec<f32> = response
        .result
        .iter()
        .filter_map(|m| m.compatibility.map(|c| c.overall))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    assert!(response.result[1]
        .reasons
        .iter()
        .all(|r| !r.starts_with("Matches your style")));

    let direct = engine
        .compute_compatibility(&profile, &GarmentId::from("match"))
        .unwrap();
    assert_eq!(Some(direct), response.result[0].compatibility);
}

#[test]
fn test_empty_inputs_give_the_neutral_profile() {
    let engine = engine(2);
    let profile = engine.analyze_style_profile(&[], &[]);
    assert_eq!(profile, StyleProfile::default());
    assert!(profile.dominant_aesthetic.is_none());
    assert_eq!(profile.sustainability_affinity, 0.0);
    assert_eq!(profile.vintage_affinity, 0.0);
    assert_eq!(profile.luxury_affinity, 0.0);
}

#[test]
fn test_invalid_weight_tables_are_rejected() {
    let config = EngineConfig {
        scoring: ScoringPolicy {
            compatibility: CompatibilityWeights {
                style: 0.5,
                size: 0.5,
                color: 0.2,
                brand: 0.0,
                sustainability: 0.0,
            },
            ..ScoringPolicy::default()
        },
        ..EngineConfig::default()
    };
    assert!(matches!(Engine::new(config), Err(Error::InvalidWeights(_))));
}

#[test]
fn test_pair_compatibility_is_symmetric() {
    let engine = engine(2);
    engine.add_garments(wardrobe()).unwrap();
    let a = GarmentId::from("shirt");
    let b = GarmentId::from("chinos");

    let ab = engine.check_garment_compatibility(&a, &b).unwrap();
    let ba = engine.check_garment_compatibility(&b, &a).unwrap();
    assert!((ab.overall - ba.overall).abs() < 1e-3);
    assert!((0.0..=100.0).contains(&ab.overall));

    assert!(matches!(
        engine.check_garment_compatibility(&a, &a),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        engine.check_garment_compatibility(&a, &GarmentId::from("nope")),
        Err(Error::GarmentNotFound(_))
    ));
}

#[test]
fn test_outfit_check_averages_pairs() {
    let engine = engine(2);
    engine.add_garments(wardrobe()).unwrap();
    let ids: Vec<GarmentId> = ["shirt", "chinos", "loafers"]
        .iter()
        .map(|id| GarmentId::from(*id))
        .collect();

    let outfit = engine.check_outfit(&ids).unwrap();
    let pairs = [
        engine.check_garment_compatibility(&ids[0], &ids[1]).unwrap(),
        engine.check_garment_compatibility(&ids[0], &ids[2]).unwrap(),
        engine.check_garment_compatibility(&ids[1], &ids[2]).unwrap(),
    ];
    let mean = pairs.iter().map(|p| p.overall).sum::<f32>() / 3.0;
    assert!((outfit.overall - mean).abs() < 1e-3);

    assert!(matches!(
        engine.check_outfit(&ids[..1]),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_outfit_generation_properties() {
    let engine = engine(2);
    let wardrobe = wardrobe();

    let outfits = engine.generate_outfit_combinations(&wardrobe, &OutfitRequest::default());
    assert!(!outfits.is_empty());

    let mut seen = BTreeSet::new();
    for outfit in &outfits {
        assert!(outfit.garment_ids.len() >= 2);
        assert!(outfit.garment_ids.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.insert(outfit.garment_ids.clone()), "duplicate outfit");
        assert!((0.0..=100.0).contains(&outfit.score()));
    }
    assert!(outfits.windows(2).all(|w| w[0].score() >= w[1].score()));

    let work = engine.generate_outfit_combinations(&wardrobe, &OutfitRequest::for_occasion("work"));
    assert!(!work.is_empty());
    assert!(work
        .iter()
        .all(|o| !o.garment_ids.contains(&GarmentId::from("jeans"))));
    assert!(work.iter().all(|o| o.occasion.as_deref() == Some("work")));

    assert!(engine
        .generate_outfit_combinations(&wardrobe[..1], &OutfitRequest::default())
        .is_empty());
    assert!(engine
        .generate_outfit_combinations(&wardrobe, &OutfitRequest::for_occasion("gala"))
        .is_empty());
}

#[test]
fn test_pricing_with_comparables() {
    let engine = engine(2);
    let as_of = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    for (price, days) in [(180.0, 5), (165.0, 12), (200.0, 20)] {
        engine
            .record_sale(
                SaleRecord::new("coat", Condition::Good, price, as_of - Duration::days(days))
                    .with_brand("Cos"),
            )
            .unwrap();
    }

    let coat = Garment::new("c", "coat", Condition::Good).with_brand("Cos");
    let guidance = engine.get_pricing_guidance(&coat, as_of);
    assert_eq!(guidance.comparables.len(), 3);
    assert_eq!(guidance.base_price, 180.0);
    assert!(guidance.confidence > 0.0 && guidance.confidence <= 1.0);
    assert!(guidance.min_price <= guidance.recommended_price);
    assert!(guidance.recommended_price <= guidance.max_price);
    assert!(guidance.min_price <= guidance.suggested_price);
    assert!(guidance.suggested_price <= guidance.max_price);
    assert!(guidance.fallback.is_none());

    let reconciled = guidance.base_price * (1.0 + guidance.total_adjustment_pct() / 100.0);
    assert!((reconciled - guidance.suggested_price).abs() < 0.05);
}

#[test]
fn test_pricing_without_comparables_falls_back() {
    let engine = engine(2);
    let as_of = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    engine
        .record_sale(SaleRecord::new("boots", Condition::Good, 90.0, as_of - Duration::days(3)))
        .unwrap();
    // sold after the valuation date
    engine
        .record_sale(SaleRecord::new("dress", Condition::Good, 300.0, as_of + Duration::days(3)))
        .unwrap();

    let dress = Garment::new("d", "dress", Condition::Good);
    let guidance = engine.get_pricing_guidance(&dress, as_of);
    assert_eq!(guidance.confidence, 0.0);
    assert!(guidance.comparables.is_empty());
    assert!(guidance.fallback.is_some());
    assert!(guidance.low_confidence);
    assert!(guidance.suggested_price > 0.0);
    assert!(guidance.min_price <= guidance.recommended_price);
    assert!(guidance.recommended_price <= guidance.max_price);

    assert!(matches!(
        engine.record_sale(SaleRecord::new("dress", Condition::Good, -5.0, as_of)),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        engine.pricing_guidance_for(&GarmentId::from("d"), as_of),
        Err(Error::GarmentNotFound(_))
    ));
}
