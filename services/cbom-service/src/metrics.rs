use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Counters exposed on `/metrics`
pub struct ServiceMetrics {
    pub registry: Registry,
    pub extractions: IntCounterVec,
    pub rooms_mapped: IntCounter,
    pub parts_mapped: IntCounter,
    pub predictions: IntCounter,
    pub dictionary_loads: IntCounterVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let extractions = IntCounterVec::new(
            Opts::new("cbom_extractions_total", "CBOM extraction requests"),
            &["format", "outcome"],
        )?;
        let rooms_mapped = IntCounter::new("cbom_rooms_mapped_total", "Rooms mapped from CBOM sheets")?;
        let parts_mapped = IntCounter::new("cbom_parts_mapped_total", "12NCs mapped from CBOM sheets")?;
        let predictions = IntCounter::new("demand_predictions_total", "Demand predictions produced")?;
        let dictionary_loads = IntCounterVec::new(
            Opts::new("dictionary_loads_total", "12NC dictionary uploads"),
            &["outcome"],
        )?;

        registry.register(Box::new(extractions.clone()))?;
        registry.register(Box::new(rooms_mapped.clone()))?;
        registry.register(Box::new(parts_mapped.clone()))?;
        registry.register(Box::new(predictions.clone()))?;
        registry.register(Box::new(dictionary_loads.clone()))?;

        Ok(Self {
            registry,
            extractions,
            rooms_mapped,
            parts_mapped,
            predictions,
            dictionary_loads,
        })
    }
}
