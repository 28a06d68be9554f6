use crate::domain::LightRecord;

/// The record with the highest efficacy; ties resolve to the earliest index.
pub fn best(records: &[LightRecord]) -> Option<&LightRecord> {
    records
        .iter()
        .reduce(|best, r| if r.efficacy > best.efficacy { r } else { best })
}

/// Render the comparison table plus the most-efficient-light summary.
///
/// One row per record, left-justified fixed-width columns, derived figures at
/// two decimal places. Callers are expected to pass at least one record; an
/// empty slice renders the column headings with no rows and no summary.
pub fn render(records: &[LightRecord]) -> String {
    let mut out = String::new();

    out.push_str("Light Comparison Results:\n");
    out.push_str(&format!(
        "{:<15}{:<18}{:<15}{:<17}\n",
        "Brand", "Efficacy (lm/W)", "Annual kWh", "Annual Cost (€)"
    ));
    out.push_str(&"-".repeat(65));
    out.push('\n');

    for r in records {
        out.push_str(&format!(
            "{:<15}{:<18.2}{:<15.2}{:<17.2}\n",
            r.spec.brand, r.efficacy, r.annual_kwh, r.annual_cost
        ));
    }

    if let Some(b) = best(records) {
        out.push_str(&format!(
            "\nMost efficient light: {} with {:.2} lm/W\n",
            b.spec.brand, b.efficacy
        ));
    }

    out
}
