// src/models/tables.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mesas sem localização caem neste grupo no resumo
pub const DEFAULT_LOCATION: &str = "main_floor";

/// Linha agregada por localização, como sai do banco.
#[derive(Debug, Clone, FromRow)]
pub struct LocationOccupancyRow {
    pub location: String,
    pub total: i64,
    pub occupied: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationOccupancy {
    #[schema(example = "terrace")]
    pub location: String,
    pub total_tables: i64,
    pub occupied_tables: i64,
    pub available_tables: i64,
    #[schema(example = 50.0)]
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableStatusSummary {
    pub total_tables: i64,
    pub occupied_tables: i64,
    pub available_tables: i64,
    #[schema(example = 37.5)]
    pub occupancy_rate: f64,
    pub by_location: Vec<LocationOccupancy>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Mesas cujo flag de ocupação estava divergente e foi corrigido
    pub corrected_table_ids: Vec<Uuid>,
}

pub fn occupancy_rate(occupied: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    occupied as f64 / total as f64 * 100.0
}

impl TableStatusSummary {
    pub fn from_rows(rows: Vec<LocationOccupancyRow>) -> Self {
        let by_location: Vec<LocationOccupancy> = rows
            .into_iter()
            .map(|row| LocationOccupancy {
                available_tables: row.total - row.occupied,
                occupancy_rate: occupancy_rate(row.occupied, row.total),
                location: row.location,
                total_tables: row.total,
                occupied_tables: row.occupied,
            })
            .collect();

        let total_tables: i64 = by_location.iter().map(|l| l.total_tables).sum();
        let occupied_tables: i64 = by_location.iter().map(|l| l.occupied_tables).sum();

        Self {
            total_tables,
            occupied_tables,
            available_tables: total_tables - occupied_tables,
            occupancy_rate: occupancy_rate(occupied_tables, total_tables),
            by_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_locations() {
        let summary = TableStatusSummary::from_rows(vec![
            LocationOccupancyRow { location: "main_floor".into(), total: 6, occupied: 3 },
            LocationOccupancyRow { location: "terrace".into(), total: 2, occupied: 0 },
        ]);
        assert_eq!(summary.total_tables, 8);
        assert_eq!(summary.occupied_tables, 3);
        assert_eq!(summary.available_tables, 5);
        assert_eq!(summary.occupancy_rate, 37.5);
        assert_eq!(summary.by_location[0].occupancy_rate, 50.0);
        assert_eq!(summary.by_location[1].available_tables, 2);
    }

    #[test]
    fn no_tables_means_zero_rate() {
        let summary = TableStatusSummary::from_rows(vec![]);
        assert_eq!(summary.total_tables, 0);
        assert_eq!(summary.occupancy_rate, 0.0);
    }
}
