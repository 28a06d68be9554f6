use crate::domain::{LightRecord, LightSpec};

#[derive(thiserror::Error, Debug)]
pub enum DeriveError {
    #[error("wattage for '{brand}' is zero, cannot compute efficacy")]
    ZeroWattage { brand: String },
}

/// Pure derivation of efficiency and cost metrics.
///
/// - efficacy = lumens / wattage (lm/W)
/// - annual kWh = wattage * hours/day * 365 / 1000
/// - annual cost = annual kWh * rate per kWh
///
/// No side effects; calling it again on the same spec yields the same record.
pub fn derive(spec: LightSpec) -> Result<LightRecord, DeriveError> {
    if spec.wattage == 0.0 {
        return Err(DeriveError::ZeroWattage {
            brand: spec.brand.clone(),
        });
    }

    let efficacy = spec.lumens / spec.wattage;
    let annual_kwh = spec.wattage * spec.hours_per_day * 365.0 / 1000.0;
    let annual_cost = annual_kwh * spec.rate_per_kwh;

    Ok(LightRecord {
        spec,
        efficacy,
        annual_kwh,
        annual_cost,
    })
}
