// Player catalog: the full player pool and each player's availability.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DraftError, Result};
use crate::player::{Player, Position};

/// Available-player counts, overall and per position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    pub total: usize,
    pub by_position: BTreeMap<Position, usize>,
}

/// Owns every [`Player`] record and is the only writer of availability.
#[derive(Debug, Clone, Default)]
pub struct PlayerCatalog {
    players: Vec<Player>,
    index: HashMap<String, usize>,
}

impl PlayerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a player list, see [`PlayerCatalog::load`].
    pub fn from_players(players: Vec<Player>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load(players)?;
        Ok(catalog)
    }

    /// Replace the catalog contents.
    ///
    /// The whole list is validated before anything is replaced; on error the
    /// previous contents are untouched. Every loaded player starts available.
    pub fn load(&mut self, players: Vec<Player>) -> Result<()> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            validate_player(player)?;
            if index.insert(player.id.clone(), i).is_some() {
                return Err(DraftError::validation(
                    "player.id",
                    format!("duplicate player id '{}'", player.id),
                ));
            }
        }

        let mut players = players;
        for player in &mut players {
            player.set_available(true);
        }

        info!("Player catalog loaded with {} players", players.len());
        self.players = players;
        self.index = index;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player by identifier regardless of availability.
    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.index.get(player_id).map(|&i| &self.players[i])
    }

    /// Players that have not been drafted, in load order.
    pub fn available(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_available()).collect()
    }

    /// Available players at one position.
    pub fn by_position(&self, position: Position) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_available() && p.position == position)
            .collect()
    }

    /// Available players whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Player> {
        let needle = query.trim().to_lowercase();
        self.players
            .iter()
            .filter(|p| p.is_available() && p.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn availability(&self) -> Availability {
        let mut by_position: BTreeMap<Position, usize> =
            Position::ALL.iter().map(|&pos| (pos, 0)).collect();
        let mut total = 0;
        for player in self.players.iter().filter(|p| p.is_available()) {
            total += 1;
            *by_position.entry(player.position).or_insert(0) += 1;
        }
        Availability { total, by_position }
    }

    /// Flip a player to drafted. Fails if the player is unknown or already
    /// drafted; a second call for the same player is always an error.
    pub fn mark_drafted(&mut self, player_id: &str) -> Result<&Player> {
        let idx = *self
            .index
            .get(player_id)
            .ok_or_else(|| DraftError::player_not_found(player_id))?;
        let player = &mut self.players[idx];
        if !player.is_available() {
            return Err(DraftError::AlreadyDrafted {
                player_id: player_id.to_string(),
            });
        }
        player.set_available(false);
        debug!("Marked {} ({}) as drafted", player.name, player.id);
        Ok(player)
    }

    /// Make every player available again.
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.set_available(true);
        }
    }
}

fn validate_player(player: &Player) -> Result<()> {
    if player.id.trim().is_empty() {
        return Err(DraftError::validation("player.id", "must not be empty"));
    }
    let field = |name: &str| format!("player[{}].{name}", player.id);

    if player.rank < 1 {
        return Err(DraftError::validation(
            field("rank"),
            format!("must be a positive integer, got {}", player.rank),
        ));
    }
    if !player.projected_points.is_finite() || player.projected_points < 0.0 {
        return Err(DraftError::validation(
            field("projected_points"),
            format!("must be a non-negative number, got {}", player.projected_points),
        ));
    }
    if !player.adp.is_finite() || player.adp < 0.0 {
        return Err(DraftError::validation(
            field("adp"),
            format!("must be a non-negative number, got {}", player.adp),
        ));
    }
    if player.tier < 1 {
        return Err(DraftError::validation(
            field("tier"),
            format!("must be a positive integer, got {}", player.tier),
        ));
    }
    if !(0..=18).contains(&player.bye_week) {
        return Err(DraftError::validation(
            field("bye_week"),
            format!("must be between 0 and 18, got {}", player.bye_week),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Player> {
        vec![
            Player::new("1", "Patrick Mahomes", Position::QB, "KC").with_rank(1),
            Player::new("4", "Christian McCaffrey", Position::RB, "SF").with_rank(4),
            Player::new("5", "Austin Ekeler", Position::RB, "LAC").with_rank(5),
            Player::new("7", "Justin Jefferson", Position::WR, "MIN").with_rank(7),
        ]
    }

    fn catalog() -> PlayerCatalog {
        PlayerCatalog::from_players(sample()).unwrap()
    }

    #[test]
    fn load_makes_everyone_available() {
        let c = catalog();
        assert_eq!(c.len(), 4);
        assert_eq!(c.available().len(), 4);
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let mut players = sample();
        players.push(Player::new("4", "Someone Else", Position::TE, "KC"));
        let err = PlayerCatalog::from_players(players).unwrap_err();
        match err {
            DraftError::Validation { field, message } => {
                assert_eq!(field, "player.id");
                assert!(message.contains("'4'"));
            }
            other => panic!("expected Validation, got: {other}"),
        }
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let cases = [
            (Player::new("x", "X", Position::QB, "KC").with_rank(0), "rank"),
            (Player::new("x", "X", Position::QB, "KC").with_points(-1.0), "projected_points"),
            (Player::new("x", "X", Position::QB, "KC").with_adp(-0.5), "adp"),
            (Player::new("x", "X", Position::QB, "KC").with_tier(-2), "tier"),
            (Player::new("x", "X", Position::QB, "KC").with_bye_week(-1), "bye_week"),
            (Player::new("x", "X", Position::QB, "KC").with_bye_week(19), "bye_week"),
        ];
        for (player, expected_field) in cases {
            let err = PlayerCatalog::from_players(vec![player]).unwrap_err();
            match err {
                DraftError::Validation { field, .. } => {
                    assert!(field.ends_with(expected_field), "{field} vs {expected_field}")
                }
                other => panic!("expected Validation, got: {other}"),
            }
        }
    }

    #[test]
    fn failed_load_keeps_previous_contents() {
        let mut c = catalog();
        let bad = vec![Player::new("", "Nameless", Position::K, "DAL")];
        assert!(c.load(bad).is_err());
        assert_eq!(c.len(), 4);
        assert!(c.get("1").is_some());
    }

    #[test]
    fn by_position_only_returns_available() {
        let mut c = catalog();
        assert_eq!(c.by_position(Position::RB).len(), 2);
        c.mark_drafted("4").unwrap();
        let rbs = c.by_position(Position::RB);
        assert_eq!(rbs.len(), 1);
        assert_eq!(rbs[0].id, "5");
        assert!(c.by_position(Position::DST).is_empty());
    }

    #[test]
    fn mark_drafted_twice_fails() {
        let mut c = catalog();
        c.mark_drafted("1").unwrap();
        assert!(!c.get("1").unwrap().is_available());
        assert_eq!(
            c.mark_drafted("1").unwrap_err(),
            DraftError::AlreadyDrafted { player_id: "1".into() }
        );
    }

    #[test]
    fn mark_drafted_unknown_player() {
        let mut c = catalog();
        assert_eq!(c.mark_drafted("999").unwrap_err().kind(), "not_found");
        assert_eq!(c.available().len(), 4);
    }

    #[test]
    fn reset_restores_availability() {
        let mut c = catalog();
        c.mark_drafted("1").unwrap();
        c.mark_drafted("7").unwrap();
        assert_eq!(c.available().len(), 2);
        c.reset();
        assert_eq!(c.available().len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_and_skips_drafted() {
        let mut c = catalog();
        assert_eq!(c.search("mc").len(), 1);
        assert_eq!(c.search("E").len(), 4);
        c.mark_drafted("4").unwrap();
        assert!(c.search("mccaffrey").is_empty());
    }

    #[test]
    fn availability_counts_every_position() {
        let mut c = catalog();
        c.mark_drafted("5").unwrap();
        let a = c.availability();
        assert_eq!(a.total, 3);
        assert_eq!(a.by_position[&Position::RB], 1);
        assert_eq!(a.by_position[&Position::K], 0);
        assert_eq!(a.by_position.len(), 6);
    }
}
