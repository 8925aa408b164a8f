use axum::{extract::State, response::Json};
use chrono::NaiveDate;
use matchwise_models::{
    Granularity, IdentifierKind, PartRoomMap, PerformanceData, Prediction, PredictionMethod,
    RoomPartMap, SalesRecord,
};
use matchwise_utils::{
    validate_model, AnalysisConfig, MatchwiseError, PerformanceAnalyzer, PerformanceCenter,
    Predictor, SummaryStats,
};
use serde::{Deserialize, Serialize};

use super::{api_error, ApiResult};
use crate::AppState;

/// Sales history plus the identifiers to analyze. Omitted parameters fall
/// back to the `analysis` configuration; `today` defaults to the local date.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub records: Vec<SalesRecord>,
    pub identifiers: Vec<String>,
    pub kind: IdentifierKind,
    pub lookback_years: Option<u32>,
    pub granularity: Option<Granularity>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub analysis: AnalyzeRequest,
    pub method: Option<PredictionMethod>,
    pub buffer_percentage: Option<f64>,
    pub periods: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PredictionSet {
    pub identifier: String,
    pub performance: PerformanceData,
    pub predictions: Vec<Prediction>,
}

/// Sales history together with the CBOM views it is judged against
#[derive(Debug, Deserialize)]
pub struct CenterRequest {
    pub records: Vec<SalesRecord>,
    #[serde(default)]
    pub rooms: Vec<RoomPartMap>,
    #[serde(default)]
    pub parts: Vec<PartRoomMap>,
    #[serde(default)]
    pub identifiers: Vec<String>,
    pub kind: Option<IdentifierKind>,
    pub lookback_years: Option<u32>,
    pub granularity: Option<Granularity>,
    pub method: Option<PredictionMethod>,
    pub buffer_percentage: Option<f64>,
    pub today: Option<NaiveDate>,
}

/// The CBOM side of one identifier
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CbomLinks {
    Room(RoomPartMap),
    Part(PartRoomMap),
}

#[derive(Debug, Serialize)]
pub struct CenterEntry {
    pub identifier: String,
    pub links: Option<CbomLinks>,
    pub performance: PerformanceData,
    /// `None` when the identifier has no sales in the lookback window
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct CenterReport {
    pub summary: SummaryStats,
    pub entries: Vec<CenterEntry>,
}

/// POST /api/v1/performance/analyze
pub async fn analyze_performance(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Vec<PerformanceData>> {
    let results = analyze(&request, &state.config.analysis).map_err(api_error)?;
    Ok(Json(results))
}

/// POST /api/v1/performance/predict
pub async fn predict_demand(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Vec<PredictionSet>> {
    let defaults = &state.config.analysis;
    let today = today(request.analysis.today);
    let method = request.method.unwrap_or(defaults.method);
    let buffer = request.buffer_percentage.unwrap_or(defaults.buffer_percentage);
    let periods = request.periods.unwrap_or(defaults.horizon);

    let history = analyze(&request.analysis, defaults).map_err(api_error)?;

    let mut sets = Vec::with_capacity(history.len());
    for performance in history {
        let predictions = Predictor::new(&performance)
            .predict_many(periods, method, buffer, today)
            .map_err(api_error)?;
        state.metrics.predictions.inc_by(predictions.len() as u64);
        sets.push(PredictionSet {
            identifier: performance.identifier.clone(),
            performance,
            predictions,
        });
    }

    Ok(Json(sets))
}

/// Summary counts plus mappings, history and next-period demand for each
/// requested identifier
///
/// POST /api/v1/performance/center
pub async fn performance_center(
    State(state): State<AppState>,
    Json(request): Json<CenterRequest>,
) -> ApiResult<CenterReport> {
    let report = center_report(request, &state.config.analysis).map_err(api_error)?;
    let predicted = report.entries.iter().filter(|e| e.prediction.is_some()).count();
    state.metrics.predictions.inc_by(predicted as u64);
    Ok(Json(report))
}

fn center_report(request: CenterRequest, defaults: &AnalysisConfig) -> Result<CenterReport, MatchwiseError> {
    let kind = match (request.kind, request.identifiers.is_empty()) {
        (Some(kind), _) => kind,
        (None, true) => IdentifierKind::Room,
        (None, false) => {
            return Err(MatchwiseError::invalid_input("kind is required when identifiers are given"))
        }
    };
    for record in &request.records {
        validate_model(record)?;
    }
    for map in &request.rooms {
        validate_model(map)?;
    }
    for map in &request.parts {
        validate_model(map)?;
    }

    let settings = AnalysisConfig {
        lookback_years: request.lookback_years.unwrap_or(defaults.lookback_years),
        granularity: request.granularity.unwrap_or(defaults.granularity),
        method: request.method.unwrap_or(defaults.method),
        buffer_percentage: request.buffer_percentage.unwrap_or(defaults.buffer_percentage),
        horizon: defaults.horizon,
    };
    let today = today(request.today);
    let center = PerformanceCenter::new(request.records, request.rooms, request.parts);

    let mut entries = Vec::with_capacity(request.identifiers.len());
    for identifier in request.identifiers {
        let (links, performance, prediction) = match kind {
            IdentifierKind::Room => (
                center.room_components(&identifier).cloned().map(CbomLinks::Room),
                center.analyze_room(&identifier, &settings, today),
                center.predict_room_demand(&identifier, &settings, today),
            ),
            IdentifierKind::Part => (
                center.part_rooms(&identifier).cloned().map(CbomLinks::Part),
                center.analyze_part(&identifier, &settings, today),
                center.predict_part_demand(&identifier, &settings, today),
            ),
        };
        let prediction = match prediction {
            Ok(prediction) => Some(prediction),
            Err(MatchwiseError::Analysis { .. }) => None,
            Err(e) => return Err(e),
        };
        entries.push(CenterEntry {
            identifier,
            links,
            performance,
            prediction,
        });
    }

    Ok(CenterReport {
        summary: center.summary_stats(),
        entries,
    })
}

fn analyze(request: &AnalyzeRequest, defaults: &AnalysisConfig) -> Result<Vec<PerformanceData>, MatchwiseError> {
    if request.identifiers.is_empty() {
        return Err(MatchwiseError::invalid_input("At least one identifier is required"));
    }
    for record in &request.records {
        validate_model(record)?;
    }

    Ok(PerformanceAnalyzer::new(&request.records).analyze_many(
        &request.identifiers,
        request.kind,
        request.lookback_years.unwrap_or(defaults.lookback_years),
        request.granularity.unwrap_or(defaults.granularity),
        today(request.today),
    ))
}

fn today(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| chrono::Local::now().date_naive())
}
