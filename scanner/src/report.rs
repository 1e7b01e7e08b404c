// Scan Report
// Text and JSON rendering of ranked recommendations

use chrono::{DateTime, Utc};
use serde::Serialize;
use signal_generation::Recommendation;
use std::fmt::Write;
use uuid::Uuid;

const QUESTION_WIDTH: usize = 60;
const BAR_CELLS: usize = 10;

const DISCLAIMER: &str = "Not financial advice. Signals are heuristics built on public data \
and congressional disclosures that may lag trades by up to 45 days. Size positions to what you can afford to lose.";

/// JSON envelope for `--json` output
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub scan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub recommendations: &'a [Recommendation],
}

impl<'a> ScanReport<'a> {
    pub fn new(recommendations: &'a [Recommendation], generated_at: DateTime<Utc>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            generated_at,
            count: recommendations.len(),
            recommendations,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Shorten to `width` characters, ending in "..." when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

pub fn confidence_bar(confidence: f64) -> String {
    let filled = (confidence.clamp(0.0, 1.0) * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Ranked one-screen summary
pub fn format_summary(recommendations: &[Recommendation], bankroll: Option<f64>) -> String {
    let mut out = String::new();

    if recommendations.is_empty() {
        out.push_str("No markets met the confidence threshold.\n\n");
        out.push_str(DISCLAIMER);
        out.push('\n');
        return out;
    }

    let _ = writeln!(
        out,
        "Informed-money scan: {} recommendation{}\n",
        recommendations.len(),
        if recommendations.len() == 1 { "" } else { "s" }
    );

    for (i, rec) in recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} @ {:.2}  {}",
            i + 1,
            rec.position,
            rec.current_price,
            truncate(&rec.question, QUESTION_WIDTH)
        );
        let _ = writeln!(
            out,
            "    Confidence {} {:>5.1}%  Edge {:+.1}pp  Size {:.2}%{}",
            confidence_bar(rec.confidence),
            rec.confidence * 100.0,
            rec.expected_edge * 100.0,
            rec.suggested_fraction * 100.0,
            stake_note(rec, bankroll)
        );
        for line in &rec.rationale {
            let _ = writeln!(out, "      - {}", line);
        }
        let _ = writeln!(out, "    {}\n", rec.trade_url);
    }

    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

/// Detailed block for a single recommendation
pub fn format_recommendation(rec: &Recommendation, bankroll: Option<f64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rec.question);
    let _ = writeln!(out, "  Market:        {}", rec.market_id);
    let _ = writeln!(out, "  Position:      {} @ {:.3}", rec.position, rec.current_price);
    let _ = writeln!(
        out,
        "  Confidence:    {} {:.1}% (combined score {:+.3})",
        confidence_bar(rec.confidence),
        rec.confidence * 100.0,
        rec.combined_score
    );
    let _ = writeln!(out, "  Expected edge: {:+.2}pp", rec.expected_edge * 100.0);
    let _ = writeln!(
        out,
        "  Kelly:         {:.2}% full, {:.2}% suggested{}",
        rec.kelly_fraction * 100.0,
        rec.suggested_fraction * 100.0,
        stake_note(rec, bankroll)
    );
    if let Some(primary) = rec.primary_signal {
        let _ = writeln!(out, "  Primary:       {}", primary.label());
    }
    if let Some(resolves_at) = rec.resolves_at {
        let _ = writeln!(out, "  Resolves:      {}", resolves_at.format("%Y-%m-%d %H:%M UTC"));
    }
    let _ = writeln!(out, "  Rationale:");
    for line in &rec.rationale {
        let _ = writeln!(out, "    - {}", line);
    }
    let _ = writeln!(out, "  Trade:         {}", rec.trade_url);
    out
}

fn stake_note(rec: &Recommendation, bankroll: Option<f64>) -> String {
    match bankroll {
        Some(bankroll) if bankroll > 0.0 => format!(" (${:.2})", rec.stake(bankroll)),
        _ => String::new(),
    }
}
