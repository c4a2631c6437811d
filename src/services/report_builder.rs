//! Folds per-track judgments into the final report

use crate::domain::report::{ObjectResult, Report};
use crate::domain::zones::ZoneRegistry;
use crate::services::aggregator::TrackHistory;
use crate::services::classifier::{is_stationary, zones_visited};
use tracing::info;

/// Running totals for a report under construction
pub struct ReportBuilder<'a> {
    zones: &'a ZoneRegistry,
    objects: Vec<ObjectResult>,
    total_in_zones: u64,
    total_stationary: u64,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(zones: &'a ZoneRegistry) -> Self {
        Self { zones, objects: Vec::new(), total_in_zones: 0, total_stationary: 0 }
    }

    /// Classify one track and append its result
    ///
    /// Histories without observations are skipped.
    pub fn add(&mut self, history: &TrackHistory) {
        if history.observations() == 0 {
            return;
        }

        let detected_zones = zones_visited(history, self.zones);
        let stationary = is_stationary(history);

        info!(
            track_id = %history.track_id(),
            observations = %history.observations(),
            stationary = %stationary,
            zones = ?detected_zones.iter().map(|z| z.as_str()).collect::<Vec<_>>(),
            "object_classified"
        );

        if !detected_zones.is_empty() {
            self.total_in_zones += 1;
            if stationary {
                self.total_stationary += 1;
            }
        }

        self.objects.push(ObjectResult {
            id: history.track_id(),
            detected_zones,
            is_stationary: stationary,
        });
    }

    pub fn finish(self) -> Report {
        let has_only_stationary = self.total_stationary == self.total_in_zones;
        let has_detected_in_zones = self.total_in_zones > 0;

        if has_only_stationary {
            info!(total_in_zones = %self.total_in_zones, "only_stationary");
        }
        if has_detected_in_zones {
            info!(total_in_zones = %self.total_in_zones, "detected_in_zones");
        }

        Report {
            objects: self.objects,
            total_stationary: self.total_stationary,
            has_only_stationary,
            has_detected_in_zones,
            total_in_zones: self.total_in_zones,
        }
    }
}

/// Build a report from histories given in first-sighting order
pub fn build_report<'h, I>(histories: I, zones: &ZoneRegistry) -> Report
where
    I: IntoIterator<Item = &'h TrackHistory>,
{
    let mut builder = ReportBuilder::new(zones);
    for history in histories {
        builder.add(history);
    }
    builder.finish()
}
