//! Plain-text genome report with unicode bars.
//!
//! ```text
//! --- Persona Genome Inspection: pioneer_v2 ---
//! Version: 1.0.0
//! --------------------------------------------------
//!
//! ID: explanation_depth (cognitive)
//! Desc: Preference for abstract theory vs concrete examples
//!   Default Value      [███████░░░░░░░░░░░░░] 0.35
//!   Range: [0.20 - 0.50]
//! ```

use std::fmt::Write;

use super::locus::Distribution;
use super::store::GenomeStore;

const BAR_LENGTH: usize = 20;

/// One labelled bar; `value` is clamped into [0, 1] for drawing only.
pub fn bar(label: &str, value: f64) -> String {
    let filled = ((value.clamp(0.0, 1.0) * BAR_LENGTH as f64) as usize).min(BAR_LENGTH);
    format!(
        "{:20} [{}{}] {:.2}",
        label,
        "█".repeat(filled),
        "░".repeat(BAR_LENGTH - filled),
        value
    )
}

/// Render every locus in presentation order.
pub fn render(store: &GenomeStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Persona Genome Inspection: {} ---", store.persona_id());
    let _ = writeln!(out, "Version: {}", store.version());
    let _ = writeln!(out, "{}", "-".repeat(50));

    for locus in store.list_loci() {
        let _ = writeln!(out);
        let _ = writeln!(out, "ID: {} ({})", locus.id, locus.category);
        if !locus.description.is_empty() {
            let _ = writeln!(out, "Desc: {}", locus.description);
        }
        match &locus.distribution {
            Distribution::Range(r) => {
                let _ = writeln!(out, "  {}", bar("Default Value", r.default));
                let _ = writeln!(out, "  Range: [{:.2} - {:.2}]", r.min, r.max);
            }
            Distribution::Categorical(weights) => {
                for (label, w) in weights.iter() {
                    let _ = writeln!(out, "  {}", bar(label, w));
                }
            }
        }
        let _ = writeln!(out, "  {}", bar("Weight", locus.weight));
        let _ = writeln!(out, "  {}", bar("Variability", locus.variability));
    }

    out
}
