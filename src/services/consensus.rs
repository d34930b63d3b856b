use crate::models::{AggregateResult, EvaluationResult, Tone};
use tracing::debug;

/// Label used when no direction wins
pub const AVOID_LABEL: &str = "avoid investment";

/// Combine short, medium and long horizon results into one master tone
///
/// A tone wins only with a strict plurality. Without one (all three tones
/// differ) the long-horizon tone is taken and the label is
/// [`AVOID_LABEL`]. A buy/sell winner that agrees with the long horizon gets
/// the intensified label.
pub fn aggregate(
    short: &EvaluationResult,
    medium: &EvaluationResult,
    long: &EvaluationResult,
) -> AggregateResult {
    aggregate_tones(short.tone, medium.tone, long.tone)
}

/// Majority vote over three tones, long horizon last
pub fn aggregate_tones(short: Tone, medium: Tone, long: Tone) -> AggregateResult {
    let votes = [short, medium, long];
    let count = |tone: Tone| votes.iter().filter(|t| **t == tone).count();

    let buy = count(Tone::Buy);
    let sell = count(Tone::Sell);
    let neutral = count(Tone::Neutral);

    let majority = if buy > sell && buy > neutral {
        Some(Tone::Buy)
    } else if sell > buy && sell > neutral {
        Some(Tone::Sell)
    } else if neutral > buy && neutral > sell {
        Some(Tone::Neutral)
    } else {
        None
    };

    let result = match majority {
        Some(tone) => AggregateResult {
            tone,
            label: label_for(tone, tone == long).to_string(),
        },
        None => AggregateResult {
            tone: long,
            label: AVOID_LABEL.to_string(),
        },
    };

    debug!(
        "Votes buy={} sell={} neutral={} -> {} ({})",
        buy, sell, neutral, result.tone, result.label
    );

    result
}

fn label_for(tone: Tone, agrees_with_long: bool) -> &'static str {
    match (tone, agrees_with_long) {
        (Tone::Buy, true) => "strong buy",
        (Tone::Buy, false) => "buy",
        (Tone::Sell, true) => "strong sell",
        (Tone::Sell, false) => "sell",
        (Tone::Neutral, _) => AVOID_LABEL,
    }
}
