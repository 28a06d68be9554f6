/// Raw, user-supplied attributes of one light.
///
/// Numeric fields are accepted as entered: lumens and wattage are expected to
/// be positive and hours per day to lie in [0, 24], but neither is enforced
/// here. Only a zero wattage is rejected, at derivation time.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSpec {
    pub brand: String,
    pub lumens: f64,
    pub wattage: f64,
    pub hours_per_day: f64,
    pub rate_per_kwh: f64,
}

/// A light spec together with its derived metrics.
///
/// Produced only by `transform::derive`, so the derived fields are always
/// computed together, exactly once, before a record is reported or persisted.
#[derive(Debug, Clone)]
pub struct LightRecord {
    pub spec: LightSpec,
    /// Luminous efficacy in lumens per watt.
    pub efficacy: f64,
    /// Estimated yearly consumption in kWh, assuming 365 usage days.
    pub annual_kwh: f64,
    /// Yearly running cost at the run's electricity rate.
    pub annual_cost: f64,
}
