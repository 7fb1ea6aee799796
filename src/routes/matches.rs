use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{calculate_match_score, Instructor, Learner, Matcher};
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse,
    InvalidateCacheResponse, Profile, RankRequest, ScoreRequest,
};
use crate::services::{AppwriteClient, AppwriteError, CacheKey, CacheManager};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub profiles_collection: String,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl AppState {
    /// Requested limit, falling back to the default and capped at the maximum
    fn effective_limit(&self, requested: Option<u16>) -> usize {
        requested
            .map(usize::from)
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }

    /// Full population, served from cache when possible
    async fn population(&self) -> Result<Vec<Profile>, AppwriteError> {
        let key = CacheKey::population(&self.profiles_collection);

        match self.cache.get::<Vec<Profile>>(&key).await {
            Ok(profiles) => return Ok(profiles),
            Err(crate::services::CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed, falling back to store: {}", e),
        }

        let profiles = self.store.list_profiles().await?;

        if let Err(e) = self.cache.set(&key, &profiles).await {
            tracing::warn!("Failed to cache population: {}", e);
        }

        Ok(profiles)
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/rank", web::post().to(rank_inline))
        .route("/matches/score", web::post().to(score_pair))
        .route("/matches/cache/invalidate", web::post().to(invalidate_cache));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn store_error_response(e: &AppwriteError, what: &str) -> HttpResponse {
    use actix_web::http::StatusCode;

    match e {
        AppwriteError::NotFound(_) => error_response(StatusCode::NOT_FOUND, what, e.to_string()),
        _ => error_response(StatusCode::BAD_GATEWAY, what, e.to_string()),
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let user_id = &req.user_id;
    let limit = state.effective_limit(req.limit);

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    let me = match state.store.get_profile(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return store_error_response(&e, "Failed to fetch user profile");
        }
    };

    let population = match state.population().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::error!("Failed to load population for {}: {}", user_id, e);
            return store_error_response(&e, "Failed to load candidates");
        }
    };

    let result = state.matcher.rank_with_limit(&me, &population, limit);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        result.matches.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    })
}

/// Rank an inline population
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "self": { "id": "string", "role": "learner", ... },
///   "population": [{ "id": "string", "role": "instructor", ... }],
///   "limit": 20
/// }
/// ```
async fn rank_inline(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let limit = state.effective_limit(req.limit);
    let result = state.matcher.rank_with_limit(&req.me, &req.population, limit);

    tracing::debug!(
        "Ranked {} inline candidates for {}",
        result.total_candidates,
        req.me.id
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    })
}

/// Score one instructor/learner pair
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "instructor": { "id": "string", "role": "instructor", ... },
///   "learner": { "id": "string", "role": "learner", ... }
/// }
/// ```
async fn score_pair(req: web::Json<ScoreRequest>) -> impl Responder {
    let pair = Instructor::try_from(&req.instructor)
        .and_then(|instructor| Learner::try_from(&req.learner).map(|learner| (instructor, learner)));

    match pair {
        Ok((instructor, learner)) => {
            HttpResponse::Ok().json(calculate_match_score(&instructor, &learner))
        }
        Err(e) => {
            tracing::info!("Rejected score request: {}", e);
            error_response(
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "Contract violation",
                e.to_string(),
            )
        }
    }
}

/// Drop the cached population so the next ranking reads the store
///
/// POST /api/v1/matches/cache/invalidate
async fn invalidate_cache(state: web::Data<AppState>) -> impl Responder {
    let key = CacheKey::population(&state.profiles_collection);

    match state.cache.delete(&key).await {
        Ok(()) => HttpResponse::Ok().json(InvalidateCacheResponse { success: true }),
        Err(e) => {
            tracing::warn!("Failed to invalidate cache: {}", e);
            error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to invalidate cache",
                e.to_string(),
            )
        }
    }
}
