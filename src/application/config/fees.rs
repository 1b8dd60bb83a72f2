use std::collections::HashMap;
use std::env;

/// Fee schedule used by the fee calculator.
///
/// All values are explicit configuration so deployments (and tests) can vary
/// them; nothing here is a hidden module constant. `program_fees` carries
/// optional per-program surcharges keyed by program id, parsed from
/// `REGISTRAR_PROGRAM_FEES` as comma-separated `id:amount` pairs
/// (e.g. `1:1500,3:2000`).
#[derive(Debug, Clone)]
pub struct FeeConfig {
    /// Tuition charged per course unit.
    pub price_per_unit: f64,
    /// Flat fee (registration, library, lab) charged on every enrollment,
    /// including enrollments with no curriculum defined.
    pub miscellaneous_fee: f64,
    pub program_fees: HashMap<i64, f64>,
}

impl FeeConfig {
    pub fn from_env() -> Self {
        let price_per_unit = env::var("REGISTRAR_PRICE_PER_UNIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000.0);

        let miscellaneous_fee = env::var("REGISTRAR_MISCELLANEOUS_FEE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2500.0);

        let program_fees = env::var("REGISTRAR_PROGRAM_FEES")
            .map(|raw| Self::parse_program_fees(&raw))
            .unwrap_or_default();

        Self {
            price_per_unit,
            miscellaneous_fee,
            program_fees,
        }
    }

    fn parse_program_fees(raw: &str) -> HashMap<i64, f64> {
        raw.split(',')
            .filter_map(|pair| {
                let (id, amount) = pair.split_once(':')?;
                let id = id.trim().parse().ok()?;
                let amount = amount.trim().parse().ok()?;
                Some((id, amount))
            })
            .collect()
    }

    /// Surcharge for a program, zero when none is configured.
    pub fn program_fee(&self, program_id: i64) -> f64 {
        self.program_fees.get(&program_id).copied().unwrap_or(0.0)
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            price_per_unit: 1000.0,
            miscellaneous_fee: 2500.0,
            program_fees: HashMap::new(),
        }
    }
}
