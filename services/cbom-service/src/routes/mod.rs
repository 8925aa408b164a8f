use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/cbom/extract", post(extract_cbom))
        .route("/cbom/layout", get(cbom_layout))
        .route("/dictionary/load", post(load_dictionary))
        .route("/performance/analyze", post(analyze_performance))
        .route("/performance/predict", post(predict_demand))
        .route("/performance/center", post(performance_center))
}
