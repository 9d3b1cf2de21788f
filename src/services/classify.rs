// src/services/classify.rs

//! Region decomposition for bulletin blocks.
//!
//! The bulletin names a region in an emphasized span followed by a
//! comma-separated district list in plain text:
//!
//! `<strong>Kabupaten Sintang</strong>: Sintang, Dedai. <strong>...`
//!
//! Each emphasized span opens a region; text runs up to the next span are
//! its districts.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::models::{AreaRecord, SeverityTier};
use crate::services::gazetteer;

fn strong_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("strong").expect("static selector"))
}

/// Collect plain-text runs among an element's following siblings, stopping
/// at the first sibling element matching `boundary`. Element siblings that
/// are not boundaries are skipped, not descended into.
fn sibling_text_runs<F>(start: ElementRef<'_>, boundary: F) -> Vec<String>
where
    F: Fn(&scraper::node::Element) -> bool,
{
    let mut runs = Vec::new();
    for sibling in start.next_siblings() {
        match sibling.value() {
            Node::Element(element) if boundary(element) => break,
            Node::Text(text) => runs.push(text.trim().to_string()),
            _ => {}
        }
    }
    runs
}

/// Decompose a markup block into area records with the given tier.
///
/// Regions with an empty name or no districts are silently dropped.
/// Emission order is document order.
pub fn decompose(block_html: &str, tier: SeverityTier) -> Vec<AreaRecord> {
    let fragment = Html::parse_fragment(block_html);
    let mut records = Vec::new();

    for span in fragment.select(strong_selector()) {
        let raw_name: String = span.text().collect();
        let region = raw_name.trim().trim_end_matches(':').trim().to_string();

        // The colon separating region from districts may sit outside the
        // span, so the first piece sheds it; the last sheds the sentence
        // period.
        let runs = sibling_text_runs(span, |element| element.name() == "strong");
        let districts: Vec<String> = runs
            .join(" ")
            .split(',')
            .map(|piece| {
                piece
                    .trim()
                    .trim_start_matches(':')
                    .trim_end_matches('.')
                    .trim()
            })
            .filter(|piece| piece.chars().count() > 1)
            .map(String::from)
            .collect();

        if region.is_empty() || districts.is_empty() {
            continue;
        }

        records.push(AreaRecord {
            coordinate: gazetteer::coords_for(&region),
            forecast: tier.forecast().to_string(),
            impacts: tier.impacts().iter().map(|s| s.to_string()).collect(),
            region,
            tier,
            districts,
        });
    }

    records
}
