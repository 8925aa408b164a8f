//! Performance center: sales history joined with the CBOM views.
//!
//! Answers "what is installed where" from the extracted mappings and "how
//! much was sold, how much will be needed" from the sales records, for any
//! room or 12NC.

use chrono::NaiveDate;
use matchwise_models::{
    IdentifierKind, PartRoomMap, PerformanceData, Prediction, RoomPartMap, SalesRecord,
};
use serde::Serialize;
use std::collections::BTreeMap;

use super::performance::PerformanceAnalyzer;
use super::predictor::Predictor;
use crate::cbom::{normalize_str, CbomExtraction};
use crate::config::AnalysisConfig;
use crate::error::MatchwiseResult;

/// Earliest and latest sale date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Headline counts over everything the center holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_sales_records: usize,
    pub total_rooms_in_cbom: usize,
    pub total_parts_in_cbom: usize,
    /// `None` without sales records
    pub date_range: Option<DateRange>,
}

pub struct PerformanceCenter {
    records: Vec<SalesRecord>,
    rooms: BTreeMap<String, RoomPartMap>,
    parts: BTreeMap<String, PartRoomMap>,
}

impl PerformanceCenter {
    /// Mappings repeating an identifier keep the last occurrence.
    pub fn new(records: Vec<SalesRecord>, room_maps: Vec<RoomPartMap>, part_maps: Vec<PartRoomMap>) -> Self {
        Self {
            records,
            rooms: room_maps.into_iter().map(|m| (m.room.clone(), m)).collect(),
            parts: part_maps.into_iter().map(|m| (m.part.clone(), m)).collect(),
        }
    }

    pub fn from_extraction(records: Vec<SalesRecord>, extraction: CbomExtraction) -> Self {
        Self::new(records, extraction.room_maps, extraction.part_maps)
    }

    /// 12NCs installed in a room. The room may be given as written in the
    /// sheet (`Room-001`) or normalized (`Room001`).
    pub fn room_components(&self, room: &str) -> Option<&RoomPartMap> {
        self.rooms
            .get(room)
            .or_else(|| self.rooms.get(&normalize_str(room)))
    }

    /// Rooms a 12NC is installed in, looked up like [`Self::room_components`]
    pub fn part_rooms(&self, part: &str) -> Option<&PartRoomMap> {
        self.parts
            .get(part)
            .or_else(|| self.parts.get(&normalize_str(part)))
    }

    /// Sales history of a room. A room known to the CBOM is analyzed
    /// under its normalized key, however it was spelled.
    pub fn analyze_room(&self, room: &str, settings: &AnalysisConfig, today: NaiveDate) -> PerformanceData {
        let room = self.room_components(room).map_or(room, |m| m.room.as_str());
        self.analyze(room, IdentifierKind::Room, settings, today)
    }

    pub fn analyze_part(&self, part: &str, settings: &AnalysisConfig, today: NaiveDate) -> PerformanceData {
        let part = self.part_rooms(part).map_or(part, |m| m.part.as_str());
        self.analyze(part, IdentifierKind::Part, settings, today)
    }

    pub fn analyze_rooms<S: AsRef<str>>(
        &self,
        rooms: &[S],
        settings: &AnalysisConfig,
        today: NaiveDate,
    ) -> Vec<PerformanceData> {
        rooms
            .iter()
            .map(|room| self.analyze_room(room.as_ref(), settings, today))
            .collect()
    }

    pub fn analyze_parts<S: AsRef<str>>(
        &self,
        parts: &[S],
        settings: &AnalysisConfig,
        today: NaiveDate,
    ) -> Vec<PerformanceData> {
        parts
            .iter()
            .map(|part| self.analyze_part(part.as_ref(), settings, today))
            .collect()
    }

    /// Next-period demand for a room, using `settings` for the lookback,
    /// granularity, method and buffer. `Analysis` error without history.
    pub fn predict_room_demand(
        &self,
        room: &str,
        settings: &AnalysisConfig,
        today: NaiveDate,
    ) -> MatchwiseResult<Prediction> {
        let history = self.analyze_room(room, settings, today);
        Predictor::new(&history).predict(settings.method, settings.buffer_percentage, today)
    }

    pub fn predict_part_demand(
        &self,
        part: &str,
        settings: &AnalysisConfig,
        today: NaiveDate,
    ) -> MatchwiseResult<Prediction> {
        let history = self.analyze_part(part, settings, today);
        Predictor::new(&history).predict(settings.method, settings.buffer_percentage, today)
    }

    pub fn summary_stats(&self) -> SummaryStats {
        let earliest = self.records.iter().map(|r| r.date).min();
        let latest = self.records.iter().map(|r| r.date).max();

        SummaryStats {
            total_sales_records: self.records.len(),
            total_rooms_in_cbom: self.rooms.len(),
            total_parts_in_cbom: self.parts.len(),
            date_range: earliest
                .zip(latest)
                .map(|(earliest, latest)| DateRange { earliest, latest }),
        }
    }

    fn analyze(
        &self,
        identifier: &str,
        kind: IdentifierKind,
        settings: &AnalysisConfig,
        today: NaiveDate,
    ) -> PerformanceData {
        PerformanceAnalyzer::new(&self.records).analyze(
            identifier,
            kind,
            settings.lookback_years,
            settings.granularity,
            today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchwise_models::{Granularity, PredictionMethod};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn map(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn center() -> PerformanceCenter {
        let records = vec![
            SalesRecord::new("123456789012", "Room001", 10, day(2024, 1, 15)),
            SalesRecord::new("123456789012", "Room001", 20, day(2024, 2, 15)),
            SalesRecord::new("987654321098", "ROOM002", 4, day(2023, 11, 2)),
            SalesRecord::new("123456789012", "ROOM002", 6, day(2024, 2, 20)),
        ];
        let rooms = vec![
            RoomPartMap::new("Room001", map(&[("123456789012", 2)])),
            RoomPartMap::new("ROOM002", map(&[("123456789012", 1), ("987654321098", 3)])),
        ];
        let parts = vec![
            PartRoomMap::new("123456789012", map(&[("Room001", 2), ("ROOM002", 1)])),
            PartRoomMap::new("987654321098", map(&[("ROOM002", 3)])),
        ];
        PerformanceCenter::new(records, rooms, parts)
    }

    fn monthly(method: PredictionMethod, buffer_percentage: f64) -> AnalysisConfig {
        AnalysisConfig {
            lookback_years: 1,
            granularity: Granularity::Monthly,
            method,
            buffer_percentage,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_lookups_accept_sheet_spelling() {
        let center = center();
        assert_eq!(center.room_components("Room001").unwrap().part_count(), 1);
        assert_eq!(center.room_components("Room-001").unwrap().room, "Room001");
        assert_eq!(center.part_rooms("1234-567-89012").unwrap().room_count(), 2);
        assert!(center.room_components("Room999").is_none());
        assert!(center.part_rooms("000000000000").is_none());
    }

    #[test]
    fn test_analyze_room_and_part() {
        let center = center();
        let settings = monthly(PredictionMethod::Average, 0.0);

        let room = center.analyze_room("Room001", &settings, day(2024, 3, 31));
        assert_eq!(room.kind, IdentifierKind::Room);
        assert_eq!(room.total, 30);
        assert_eq!(room.periods.len(), 2);

        let part = center.analyze_part("123456789012", &settings, day(2024, 3, 31));
        assert_eq!(part.total, 36);

        let rooms = center.analyze_rooms(&["ROOM002", "Room001"], &settings, day(2024, 3, 31));
        assert_eq!(rooms[0].total, 10);
        assert_eq!(rooms[1].total, 30);

        let parts = center.analyze_parts(&["987654321098"], &settings, day(2024, 3, 31));
        assert_eq!(parts[0].periods.len(), 1);
    }

    #[test]
    fn test_sheet_spelling_analyzes_the_cbom_key() {
        let center = center();
        let settings = monthly(PredictionMethod::Average, 0.0);

        let room = center.analyze_room("Room-001", &settings, day(2024, 3, 31));
        assert_eq!(room.identifier, "Room001");
        assert_eq!(room.total, 30);

        let part = center.analyze_part("1234 567 89012", &settings, day(2024, 3, 31));
        assert_eq!(part.identifier, "123456789012");
        assert_eq!(part.total, 36);

        // unknown to the CBOM: analyzed as given
        let room = center.analyze_room("Room 009", &settings, day(2024, 3, 31));
        assert_eq!(room.identifier, "Room 009");
        assert!(room.periods.is_empty());
    }

    #[test]
    fn test_predict_demand_uses_settings() {
        let center = center();

        let prediction = center
            .predict_room_demand("Room001", &monthly(PredictionMethod::Last, 50.0), day(2024, 2, 29))
            .unwrap();
        assert_eq!(prediction.period_label, "2024-03");
        assert_eq!(prediction.baseline, 20.0);
        assert_eq!(prediction.predicted_quantity, 30.0);

        let prediction = center
            .predict_part_demand("123456789012", &monthly(PredictionMethod::Average, 0.0), day(2024, 2, 29))
            .unwrap();
        assert_eq!(prediction.baseline, 18.0);
    }

    #[test]
    fn test_built_from_a_cbom_extraction() {
        use crate::cbom::{CbomPipeline, Grid};
        use crate::config::AppConfig;

        let mut grid = Grid::default();
        grid.set(4, 6, "Room-001".into());
        grid.set(8, 2, "1234-567-89012".into());
        grid.set(8, 6, 2.0.into());
        let extraction = CbomPipeline::new(&AppConfig::default())
            .unwrap()
            .run(&grid)
            .unwrap();

        let records = vec![SalesRecord::new("123456789012", "Room001", 3, day(2024, 1, 5))];
        let center = PerformanceCenter::from_extraction(records, extraction);

        assert_eq!(center.part_rooms("123456789012").unwrap().quantity_in("Room001"), Some(2));
        let stats = center.summary_stats();
        assert_eq!((stats.total_rooms_in_cbom, stats.total_parts_in_cbom), (1, 1));
        assert_eq!(stats.date_range.unwrap().earliest, day(2024, 1, 5));
    }

    #[test]
    fn test_predict_without_history_is_analysis_error() {
        let center = center();
        let err = center
            .predict_room_demand("Room999", &AnalysisConfig::default(), day(2024, 2, 29))
            .unwrap_err();
        assert_eq!(err.error_code(), "ANALYSIS_ERROR");
    }

    #[test]
    fn test_summary_stats() {
        let stats = center().summary_stats();
        assert_eq!(stats.total_sales_records, 4);
        assert_eq!(stats.total_rooms_in_cbom, 2);
        assert_eq!(stats.total_parts_in_cbom, 2);
        assert_eq!(
            stats.date_range,
            Some(DateRange {
                earliest: day(2023, 11, 2),
                latest: day(2024, 2, 20),
            })
        );

        let empty = PerformanceCenter::new(Vec::new(), Vec::new(), Vec::new()).summary_stats();
        assert_eq!(empty.total_sales_records, 0);
        assert_eq!(empty.date_range, None);
    }
}
