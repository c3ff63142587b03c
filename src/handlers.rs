use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::database::Database;
use crate::error::ApiError;
use crate::models::{
    interest_seed_entries, BusinessDetail, BusinessDetailResponse, BusinessFilter,
    BusinessListResponse, BusinessView, DealBreakerListResponse, InterestListResponse,
    DEFAULT_LISTING_LIMIT,
};

// ============================================================================
// HEALTH CHECK
// ============================================================================

#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "localbiz-discovery-service",
        "timestamp": chrono::Utc::now()
    }))
}

// ============================================================================
// BUSINESSES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BusinessListQuery {
    pub category: Option<String>,
    pub badge: Option<String>,
    pub verified: Option<String>,
    pub limit: Option<i64>,
}

impl BusinessListQuery {
    /// Only the literal "true" enables the verified filter; "false" and
    /// every other value leave the listing unfiltered.
    fn into_filter(self) -> BusinessFilter {
        BusinessFilter {
            category: self.category,
            badge: self.badge,
            verified: match self.verified.as_deref() {
                Some("true") => Some(true),
                _ => None,
            },
            limit: self.limit.unwrap_or(DEFAULT_LISTING_LIMIT),
        }
    }
}

#[get("/businesses")]
pub async fn list_businesses(
    db: web::Data<Database>,
    query: web::Query<BusinessListQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner().into_filter();
    let records = db
        .list_businesses(&filter)
        .await
        .map_err(|err| ApiError::storage("businesses", err))?;

    let businesses: Vec<BusinessView> =
        records.into_iter().map(BusinessView::from_record).collect();

    Ok(HttpResponse::Ok().json(BusinessListResponse::new(businesses)))
}

// The `.*` segment keeps an empty identifier routable so it can be rejected
// as a client error instead of falling through to a 404.
#[get("/businesses/{id:.*}")]
pub async fn get_business(
    db: web::Data<Database>,
    identifier: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let identifier = identifier.into_inner();
    if identifier.trim().is_empty() {
        return Err(ApiError::MissingIdentifier);
    }

    let record = db
        .get_business(&identifier)
        .await
        .map_err(|err| ApiError::storage("business", err))?
        .ok_or(ApiError::NotFound("Business"))?;

    Ok(HttpResponse::Ok().json(BusinessDetailResponse {
        data: BusinessDetail::from_record(record),
    }))
}

// ============================================================================
// LOOKUP LISTS
// ============================================================================

#[get("/deal-breakers")]
pub async fn list_deal_breakers(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    let entries = db
        .list_deal_breakers()
        .await
        .map_err(|err| ApiError::lookup_storage("deal breakers", err))?;

    Ok(HttpResponse::Ok().json(DealBreakerListResponse::new(entries)))
}

#[get("/interests")]
pub async fn list_interests(db: web::Data<Database>) -> impl Responder {
    let interests = match db.list_interests().await {
        Ok(entries) if !entries.is_empty() => entries,
        Ok(_) => {
            log::warn!("Interests table is empty, serving the static seed list");
            interest_seed_entries()
        }
        Err(err) => {
            log::error!("Failed to fetch interests, serving the static seed list: {err:?}");
            interest_seed_entries()
        }
    };

    HttpResponse::Ok().json(InterestListResponse::new(interests))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    /// A pool that never connects; endpoints that touch it fail at query
    /// time, which is exactly what the fallback tests need.
    fn unreachable_db() -> Database {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/unreachable")
            .expect("lazy pool");
        Database::new(pool, false)
    }

    fn query(
        category: Option<&str>,
        badge: Option<&str>,
        verified: Option<&str>,
        limit: Option<i64>,
    ) -> BusinessListQuery {
        BusinessListQuery {
            category: category.map(str::to_string),
            badge: badge.map(str::to_string),
            verified: verified.map(str::to_string),
            limit,
        }
    }

    #[::core::prelude::v1::test]
    fn verified_filter_enabled_only_by_literal_true() {
        assert_eq!(
            query(None, None, Some("true"), None).into_filter().verified,
            Some(true)
        );
        assert_eq!(
            query(None, None, Some("false"), None).into_filter().verified,
            None
        );
        assert_eq!(
            query(None, None, Some("1"), None).into_filter().verified,
            None
        );
        assert_eq!(query(None, None, None, None).into_filter().verified, None);
    }

    #[::core::prelude::v1::test]
    fn limit_defaults_to_twenty_and_is_not_clamped() {
        assert_eq!(query(None, None, None, None).into_filter().limit, 20);
        assert_eq!(
            query(None, None, None, Some(5000)).into_filter().limit,
            5000
        );
    }

    #[::core::prelude::v1::test]
    fn equality_filters_pass_through() {
        let filter = query(Some("Coffee"), Some("Popular"), None, None).into_filter();
        assert_eq!(filter.category.as_deref(), Some("Coffee"));
        assert_eq!(filter.badge.as_deref(), Some("Popular"));
    }

    #[actix_web::test]
    async fn empty_business_id_is_a_client_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(unreachable_db()))
                .service(get_business),
        )
        .await;

        let req = test::TestRequest::get().uri("/businesses/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body.get("error").is_some());
    }

    #[actix_web::test]
    async fn interests_fall_back_to_seed_list_when_storage_is_down() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(unreachable_db()))
                .service(list_interests),
        )
        .await;

        let req = test::TestRequest::get().uri("/interests").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["count"], serde_json::json!(8));
        let names: Vec<&str> = body["interests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().service(health_check)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn business_storage_failure_is_a_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(unreachable_db()))
                .service(list_businesses),
        )
        .await;

        let req = test::TestRequest::get().uri("/businesses").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], serde_json::json!("Failed to fetch businesses"));
    }

    #[actix_web::test]
    async fn deal_breaker_storage_failure_is_a_client_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(unreachable_db()))
                .service(list_deal_breakers),
        )
        .await;

        let req = test::TestRequest::get().uri("/deal-breakers").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    // Full round-trips against a real database:
    //   DATABASE_URL=postgres://... cargo test -- --ignored

    #[actix_web::test]
    #[ignore = "requires database"]
    async fn unknown_identifier_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let db = Database::connect(&url, false).await.expect("connect failed");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(get_business),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/businesses/no-such-business-slug")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], serde_json::json!("Business not found"));
    }
}
