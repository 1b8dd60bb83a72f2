use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::application::config::fees::FeeConfig;
use crate::models::prelude::*;
use crate::models::{course, year};

/// Itemized result of a fee calculation.
#[derive(Debug, Clone, Serialize)]
pub struct FeeBreakdown {
    pub tuition: f64,
    pub miscellaneous: f64,
    pub program_fee: f64,
    pub total_amount: f64,
    pub courses: Vec<course::Model>,
}

/// Computes the amount owed for a (program, year level, semester).
///
/// Never fails: a missing curriculum or a course-lookup error degrades to
/// the miscellaneous-only minimum so enrollment creation is never blocked
/// by fee data problems.
#[derive(Clone)]
pub struct FeeCalculator {
    config: FeeConfig,
}

impl FeeCalculator {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    pub async fn calculate<C: ConnectionTrait>(
        &self,
        conn: &C,
        program_id: i64,
        year_level: i32,
        semester: i32,
    ) -> FeeBreakdown {
        // Resolve the curriculum year scoping course lookups
        let year_row = match Year::find()
            .filter(year::Column::ProgramId.eq(program_id))
            .filter(year::Column::YearLevel.eq(year_level))
            .one(conn)
            .await
        {
            Ok(Some(row)) => row,
            Ok(None) => {
                tracing::warn!(
                    program_id,
                    year_level,
                    "no curriculum year defined, billing miscellaneous fee only"
                );
                return self.fallback();
            }
            Err(e) => {
                tracing::warn!(program_id, year_level, error = %e, "year lookup failed, billing miscellaneous fee only");
                return self.fallback();
            }
        };

        let courses = match Course::find()
            .filter(course::Column::YearId.eq(year_row.id))
            .filter(course::Column::Semester.eq(semester))
            .filter(course::Column::Status.eq(course::STATUS_ACTIVE))
            .all(conn)
            .await
        {
            Ok(courses) => courses,
            Err(e) => {
                tracing::warn!(program_id, year_level, semester, error = %e, "course lookup failed, billing miscellaneous fee only");
                return self.fallback();
            }
        };

        let total_units: i32 = courses.iter().map(|c| c.units).sum();
        let tuition = f64::from(total_units) * self.config.price_per_unit;
        let program_fee = self.config.program_fee(program_id);
        let total_amount = tuition + self.config.miscellaneous_fee + program_fee;

        tracing::info!(
            program_id,
            year_level,
            semester,
            total_units,
            tuition,
            miscellaneous = self.config.miscellaneous_fee,
            program_fee,
            total_amount,
            "calculated enrollment fees"
        );

        FeeBreakdown {
            tuition,
            miscellaneous: self.config.miscellaneous_fee,
            program_fee,
            total_amount,
            courses,
        }
    }

    fn fallback(&self) -> FeeBreakdown {
        FeeBreakdown {
            tuition: 0.0,
            miscellaneous: self.config.miscellaneous_fee,
            program_fee: 0.0,
            total_amount: self.config.miscellaneous_fee,
            courses: Vec::new(),
        }
    }
}
