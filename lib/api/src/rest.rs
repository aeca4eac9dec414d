use crate::engine::{Engine, ListingUpdate};
use actix_cors::Cors;
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use chrono::{DateTime, Utc};
use drapex_core::{AttributeFilter, Error, FilterCondition, Garment, GarmentId, GarmentFilter, Vector};
use drapex_pricing::SaleRecord;
use drapex_similarity::{OutfitRequest, QueryAttributes, StyleProfile, UserInteraction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

const DEFAULT_LIMIT: usize = 10;

#[derive(Deserialize)]
struct UpsertGarmentsRequest {
    garments: Vec<Garment>,
}

#[derive(Deserialize)]
struct VisualSearchRequest {
    vector: Vec<f32>,
    limit: Option<usize>,
    filter: Option<FilterCondition>,
    query: Option<QueryAttributes>,
}

#[derive(Deserialize)]
struct SimilarRequest {
    limit: Option<usize>,
    filter: Option<FilterCondition>,
}

#[derive(Deserialize)]
struct CompatibilityRequest {
    profile: StyleProfile,
    garment_id: GarmentId,
}

#[derive(Deserialize)]
struct RecommendRequest {
    profile: StyleProfile,
    limit: Option<usize>,
    filter: Option<FilterCondition>,
}

#[derive(Deserialize)]
struct AnalyzeProfileRequest {
    #[serde(default)]
    wardrobe: Vec<Garment>,
    #[serde(default)]
    interactions: Vec<UserInteraction>,
}

#[derive(Deserialize)]
struct OutfitCheckRequest {
    garment_ids: Vec<GarmentId>,
}

#[derive(Deserialize)]
struct GenerateOutfitsRequest {
    /// Inline wardrobe garments
    #[serde(default)]
    wardrobe: Vec<Garment>,
    /// Stored garments to add to the wardrobe
    #[serde(default)]
    garment_ids: Vec<GarmentId>,
    #[serde(flatten)]
    options: OutfitRequest,
}

#[derive(Deserialize)]
struct PricingRequest {
    garment: Option<Garment>,
    garment_id: Option<GarmentId>,
    as_of: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    garments: usize,
    indexed: usize,
    sales: usize,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<Engine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every endpoint; expects `web::Data<Arc<Engine>>` in app data
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/healthz", web::get().to(health))
        .route("/garments", web::put().to(upsert_garments))
        .route("/garments/{id}", web::get().to(get_garment))
        .route("/garments/{id}", web::delete().to(delete_garment))
        .route("/garments/{id}/listing", web::patch().to(update_listing))
        .route("/search/visual", web::post().to(visual_search))
        .route("/search/similar/{id}", web::post().to(similar_garments))
        .route("/compatibility", web::post().to(compute_compatibility))
        .route("/recommendations", web::post().to(recommend))
        .route("/profiles/analyze", web::post().to(analyze_profile))
        .route("/outfits/compatibility", web::post().to(check_outfit))
        .route("/outfits/generate", web::post().to(generate_outfits))
        .route("/sales", web::post().to(record_sale))
        .route("/pricing/guidance", web::post().to(pricing_guidance));
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = serde_json::json!({
        "error": "invalid_input",
        "message": err.to_string()
    });
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

fn error_response(e: &Error) -> HttpResponse {
    warn!(error = %e, kind = e.kind(), "request rejected");
    let body = serde_json::json!({
        "error": e.kind(),
        "message": e.to_string()
    });
    match e {
        Error::GarmentNotFound(_) | Error::EmptyCorpus => HttpResponse::NotFound().json(body),
        Error::Io(_) | Error::Serialization(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Path ids: integers and UUIDs parse to their typed form, anything else is a string id
fn parse_id(raw: &str) -> GarmentId {
    if let Ok(n) = raw.parse::<u64>() {
        GarmentId::Integer(n)
    } else if let Ok(u) = uuid::Uuid::parse_str(raw) {
        GarmentId::Uuid(u)
    } else {
        GarmentId::String(raw.to_string())
    }
}

fn to_filter(condition: Option<FilterCondition>) -> Option<AttributeFilter> {
    condition.map(AttributeFilter::new)
}

async fn health(engine: web::Data<Arc<Engine>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        garments: engine.garment_count(),
        indexed: engine.index().indexed_count(),
        sales: engine.sales_count(),
    }))
}

async fn upsert_garments(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<UpsertGarmentsRequest>,
) -> ActixResult<HttpResponse> {
    match engine.add_garments(req.into_inner().garments) {
        Ok(count) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": count
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_garment(
    engine: web::Data<Arc<Engine>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match engine.get_garment(&parse_id(&path.into_inner())) {
        Ok(garment) => Ok(HttpResponse::Ok().json(garment.as_ref())),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn delete_garment(
    engine: web::Data<Arc<Engine>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match engine.remove_garment(&parse_id(&path.into_inner())) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": true
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update_listing(
    engine: web::Data<Arc<Engine>>,
    path: web::Path<String>,
    req: web::Json<ListingUpdate>,
) -> ActixResult<HttpResponse> {
    match engine.update_listing(&parse_id(&path.into_inner()), req.into_inner()) {
        Ok(garment) => Ok(HttpResponse::Ok().json(garment.as_ref())),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn visual_search(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<VisualSearchRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let filter = to_filter(req.filter);
    let result = engine.visual_search(
        &Vector::new(req.vector),
        req.limit.unwrap_or(DEFAULT_LIMIT),
        filter.as_ref().map(|f| f as &dyn GarmentFilter),
        req.query.as_ref(),
    );
    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn similar_garments(
    engine: web::Data<Arc<Engine>>,
    path: web::Path<String>,
    req: web::Json<SimilarRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let filter = to_filter(req.filter);
    let result = engine.visual_search_like(
        &parse_id(&path.into_inner()),
        req.limit.unwrap_or(DEFAULT_LIMIT),
        filter.as_ref().map(|f| f as &dyn GarmentFilter),
    );
    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn compute_compatibility(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<CompatibilityRequest>,
) -> ActixResult<HttpResponse> {
    match engine.compute_compatibility(&req.profile, &req.garment_id) {
        Ok(score) => Ok(HttpResponse::Ok().json(score)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let filter = to_filter(req.filter);
    let result = engine.recommend(
        &req.profile,
        req.limit.unwrap_or(DEFAULT_LIMIT),
        filter.as_ref().map(|f| f as &dyn GarmentFilter),
    );
    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn analyze_profile(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<AnalyzeProfileRequest>,
) -> ActixResult<HttpResponse> {
    let profile = engine.analyze_style_profile(&req.wardrobe, &req.interactions);
    Ok(HttpResponse::Ok().json(profile))
}

async fn check_outfit(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<OutfitCheckRequest>,
) -> ActixResult<HttpResponse> {
    let result = match req.garment_ids.as_slice() {
        [a, b] => engine.check_garment_compatibility(a, b),
        ids => engine.check_outfit(ids),
    };
    match result {
        Ok(compatibility) => Ok(HttpResponse::Ok().json(compatibility)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn generate_outfits(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<GenerateOutfitsRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let mut wardrobe = req.wardrobe;
    match engine.resolve(&req.garment_ids) {
        Ok(stored) => wardrobe.extend(stored.iter().map(|g| g.as_ref().clone())),
        Err(e) => return Ok(error_response(&e)),
    }
    let outfits = engine.generate_outfit_combinations(&wardrobe, &req.options);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": outfits
    })))
}

async fn record_sale(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<SaleRecord>,
) -> ActixResult<HttpResponse> {
    match engine.record_sale(req.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": true
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn pricing_guidance(
    engine: web::Data<Arc<Engine>>,
    req: web::Json<PricingRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let as_of = req.as_of.unwrap_or_else(Utc::now);
    let result = match (req.garment, req.garment_id) {
        (Some(garment), _) => Ok(engine.get_pricing_guidance(&garment, as_of)),
        (None, Some(id)) => engine.pricing_guidance_for(&id, as_of),
        (None, None) => Err(Error::InvalidInput(
            "either garment or garment_id is required".to_string(),
        )),
    };
    match result {
        Ok(guidance) => Ok(HttpResponse::Ok().json(guidance)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    fn engine() -> Arc<Engine> {
        Arc::new(
            Engine::new(EngineConfig {
                embedding_dim: 3,
                ..EngineConfig::default()
            })
            .unwrap(),
        )
    }

    macro_rules! app {
        ($engine:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($engine.clone()))
                    .configure(routes),
            )
            .await
        };
    }

    fn catalog() -> Value {
        json!({"garments": [
            {"id": "coat-1", "category": "coat", "condition": "good", "colors": ["navy"],
             "embedding": [1.0, 0.0, 0.0]},
            {"id": "coat-2", "category": "coat", "condition": "excellent", "colors": ["navy"],
             "embedding": [0.8, 0.2, 0.0]},
            {"id": 7, "category": "dress", "condition": "fair", "embedding": [0.0, 1.0, 0.0]}
        ]})
    }

    #[actix_web::test]
    async fn test_upsert_and_visual_search() {
        let engine = engine();
        let app = app!(engine);

        let req = test::TestRequest::put().uri("/garments").set_json(catalog()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], 3);

        let req = test::TestRequest::post()
            .uri("/search/visual")
            .set_json(json!({
                "vector": [1.0, 0.0, 0.0],
                "limit": 5,
                "filter": {"op": "equals", "field": "category", "value": "Coat"},
                "query": {"category": "coat", "colors": ["navy"]}
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let result = body["result"].as_array().unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0]["garment_id"], "coat-1");
        assert_eq!(body["stats"]["candidates_count"], 2);
        assert_eq!(result[0]["reasons"][0], "Shared colors: navy");
    }

    #[actix_web::test]
    async fn test_error_mapping() {
        let engine = engine();
        let app = app!(engine);

        let req = test::TestRequest::post()
            .uri("/search/visual")
            .set_json(json!({"vector": [1.0, 0.0]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "dimension_mismatch");

        let req = test::TestRequest::post()
            .uri("/search/visual")
            .set_json(json!({"vector": [1.0, 0.0, 0.0]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "empty_corpus");

        let req = test::TestRequest::get().uri("/garments/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/sales")
            .insert_header(("content-type", "application/json"))
            .set_payload("{broken")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_input");
    }

    #[actix_web::test]
    async fn test_integer_ids_and_listing_update() {
        let engine = engine();
        let app = app!(engine);
        let req = test::TestRequest::put().uri("/garments").set_json(catalog()).to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::patch()
            .uri("/garments/7/listing")
            .set_json(json!({"price": 35.0, "status": "reserved"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["price"], 35.0);
        assert_eq!(body["status"], "reserved");

        let req = test::TestRequest::delete().uri("/garments/7").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(engine.garment_count(), 2);
    }

    #[actix_web::test]
    async fn test_pricing_fallback_and_outfits() {
        let engine = engine();
        let app = app!(engine);

        let req = test::TestRequest::post()
            .uri("/pricing/guidance")
            .set_json(json!({"garment": {"id": "x", "category": "dress", "condition": "good"}}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["confidence"], 0.0);
        assert_eq!(body["fallback"], "insufficient_comparables");
        assert_eq!(body["suggested_price"], 84.0);

        let req = test::TestRequest::post()
            .uri("/outfits/generate")
            .set_json(json!({"wardrobe": [
                {"id": "s", "category": "shirt", "condition": "good"}
            ]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"], json!([]));
    }

    #[actix_web::test]
    async fn test_empty_profile_analysis() {
        let engine = engine();
        let app = app!(engine);
        let req = test::TestRequest::post()
            .uri("/profiles/analyze")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dominant_aesthetic"], Value::Null);
        assert_eq!(body["sustainability_affinity"], 0.0);
        assert_eq!(body["vintage_affinity"], 0.0);
        assert_eq!(body["luxury_affinity"], 0.0);
    }
}
