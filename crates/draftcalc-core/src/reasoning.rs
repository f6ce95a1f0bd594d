// Human-readable explanation for a scored pick.

use crate::scorer::ScoredPlayer;

/// Tiers at or below this are called out as high upside.
const HIGH_UPSIDE_TIER: i32 = 2;
/// Scarcity multipliers above this are mentioned.
const NOTABLE_SCARCITY: f64 = 1.5;

/// Short sentences explaining why `pick` scored well, joined with "; ".
/// Empty when nothing stands out.
pub fn explain(pick: &ScoredPlayer, current_round: u32) -> String {
    let player = &pick.player;
    let breakdown = &pick.breakdown;
    let mut reasons = Vec::new();

    if breakdown.need > 0.0 {
        reasons.push(format!(
            "Fills {} need ({:.1} priority)",
            player.position, breakdown.need
        ));
    }
    if player.adp < current_round as f64 {
        reasons.push(format!(
            "Great value (ADP: {}, Current: {})",
            player.adp, current_round
        ));
    }
    if player.tier <= HIGH_UPSIDE_TIER {
        reasons.push(format!("Tier {} player - high upside", player.tier));
    }
    if breakdown.scarcity > NOTABLE_SCARCITY {
        reasons.push(format!(
            "{} scarcity ({:.1}x multiplier)",
            player.position, breakdown.scarcity
        ));
    }

    reasons.join("; ")
}
