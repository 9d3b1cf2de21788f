// src/services/parse.rs

//! Bulletin parser.
//!
//! Extracts a [`WarningSnapshot`] from the raw bulletin markup. The page is
//! inconsistent (sometimes no warning text exists at all), so every missing
//! structural element degrades to a default instead of raising an error.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use scraper::{Html, Selector};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, Result};
use crate::models::{messages, SeverityTier, WarningSnapshot};
use crate::services::classify;

/// Structural selector for the bulletin's prose paragraph.
const PROSE_SELECTOR: &str = "p.prose";
/// Fallback when the paragraph sits inside a prose container instead.
const PROSE_FALLBACK_SELECTOR: &str = ".prose p";

/// Issue time marker, e.g. "pada pkl 16:15 WIB".
const ISSUE_TIME_PATTERN: &str = r"pada pkl\s*([0-9:]+)\s*WIB";
/// Validity end marker, e.g. "berlangsung hingga pkl 19:15 WIB".
const VALID_UNTIL_PATTERN: &str = r"berlangsung hingga pkl\s*([0-9:]+)\s*WIB";

/// Keywords marking explicit termination language. A policy knob, not a
/// guaranteed classifier; see the tests before extending.
const TERMINATION_KEYWORDS: &[&str] = &["berakhir", "kondusif"];

/// Ordered block segmentation rules: (start anchor, end anchor, tier).
///
/// Anchors are regex fragments applied to the prose node's inner HTML so
/// emphasis boundaries survive. Rule order is also the snapshot-level area
/// order (critical block first). New bulletin phrasings go here, not into
/// the extraction code.
const BLOCK_RULES: &[(&str, &str, SeverityTier)] = &[
    (
        r"berpotensi terjadi hujan.*?di",
        r"Dan dapat meluas ke wilayah",
        SeverityTier::Critical,
    ),
    (
        r"Dan dapat meluas ke wilayah",
        r"Kondisi ini diperkirakan",
        SeverityTier::Advisory,
    ),
];

/// Maximum summary length in grapheme clusters.
const SUMMARY_MAX_GRAPHEMES: usize = 300;

struct BlockRule {
    pattern: Regex,
    tier: SeverityTier,
}

/// Parser for the BMKG early-warning bulletin page.
pub struct BulletinParser {
    prose: Selector,
    prose_fallback: Selector,
    issue_time: Regex,
    valid_until: Regex,
    blocks: Vec<BlockRule>,
    zone_label: String,
}

impl BulletinParser {
    /// Compile the structural selectors and pattern rules.
    pub fn new(zone_label: &str) -> Result<Self> {
        let blocks = BLOCK_RULES
            .iter()
            .map(|(start, end, tier)| {
                let pattern = Regex::new(&format!(r"(?is){start}\s*(.*?)\s*(?:{end}|$)"))
                    .map_err(|e| AppError::config(format!("block rule regex: {e}")))?;
                Ok(BlockRule {
                    pattern,
                    tier: *tier,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            prose: parse_selector(PROSE_SELECTOR)?,
            prose_fallback: parse_selector(PROSE_FALLBACK_SELECTOR)?,
            issue_time: Regex::new(&format!("(?i){ISSUE_TIME_PATTERN}"))
                .map_err(|e| AppError::config(format!("issue time regex: {e}")))?,
            valid_until: Regex::new(&format!("(?i){VALID_UNTIL_PATTERN}"))
                .map_err(|e| AppError::config(format!("valid until regex: {e}")))?,
            blocks,
            zone_label: zone_label.to_string(),
        })
    }

    /// Parse the bulletin markup into a snapshot.
    ///
    /// `now` supplies the wall-clock defaults for an absent issue time and
    /// the snapshot date, rendered in the monitored zone.
    pub fn parse(&self, html: &str, now: DateTime<FixedOffset>) -> WarningSnapshot {
        let document = Html::parse_document(html);
        let node = document
            .select(&self.prose)
            .next()
            .or_else(|| document.select(&self.prose_fallback).next());

        let Some(node) = node else {
            return WarningSnapshot::no_warning(now, &self.zone_label);
        };

        let full_html = node.inner_html();
        let full_text: String = node.text().collect();

        let issue_time = self
            .issue_time
            .captures(&full_text)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| now.format("%H:%M").to_string());

        let valid_until = self
            .valid_until
            .captures(&full_text)
            .map(|caps| format!("{} {}", &caps[1], self.zone_label))
            .unwrap_or_else(|| "-".to_string());

        let mut areas = Vec::new();
        for rule in &self.blocks {
            if let Some(caps) = rule.pattern.captures(&full_html) {
                areas.extend(classify::decompose(&caps[1], rule.tier));
            }
        }

        let summary = if areas.is_empty() && contains_termination(&full_text) {
            messages::ENDED.to_string()
        } else {
            truncate_summary(&full_text)
        };

        WarningSnapshot {
            date: now.format("%d/%m/%Y").to_string(),
            time: format!("{} {}", issue_time, self.zone_label),
            valid_until,
            summary,
            areas,
        }
    }
}

/// True when the bulletin text carries explicit termination language.
pub fn contains_termination(text: &str) -> bool {
    let lower = text.to_lowercase();
    TERMINATION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Display truncation to the leading graphemes plus an ellipsis marker.
fn truncate_summary(text: &str) -> String {
    let head: String = text.graphemes(true).take(SUMMARY_MAX_GRAPHEMES).collect();
    format!("{head}...")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
