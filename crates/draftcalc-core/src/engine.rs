// Draft engine: one owned value holding the catalog, the league settings and
// the draft, exposing every operation a front end needs.
//
// Front ends own an engine instance and pass it by reference (or share it
// behind a lock). There is no global state.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Availability, PlayerCatalog};
use crate::draft::{Draft, DraftPick, DraftState, Team};
use crate::error::{DraftError, Result};
use crate::league::{LeagueConfiguration, LeagueType, LeagueUpdate, TeamPickInfo};
use crate::player::{Player, Position};
use crate::roster::{self, RosterCompliance, TeamStats};
use crate::scorer::{self, Recommendation};
use crate::scoring::StatLine;

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// Everything a client needs to render the draft in one read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub state: DraftState,
    pub teams: Vec<Team>,
    pub available_players: Vec<Player>,
    pub availability: Availability,
    pub is_user_pick: bool,
    /// `None` once the draft is complete.
    pub team_on_clock: Option<u32>,
    pub user_team: u32,
}

/// The committed pick and the state it left behind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickOutcome {
    pub pick: DraftPick,
    pub state: DraftState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTypeInfo {
    pub league_type: LeagueType,
    pub label: &'static str,
    pub receptions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub team_id: u32,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRoster {
    pub team: TeamSummary,
    pub roster: Vec<Player>,
    pub picks: Vec<DraftPick>,
    pub stats: TeamStats,
    pub compliance: RosterCompliance,
}

// ---------------------------------------------------------------------------
// DraftEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DraftEngine {
    catalog: PlayerCatalog,
    league: LeagueConfiguration,
    draft: Draft,
}

impl Default for DraftEngine {
    fn default() -> Self {
        Self::new(PlayerCatalog::new(), LeagueConfiguration::default())
    }
}

impl DraftEngine {
    pub fn new(catalog: PlayerCatalog, league: LeagueConfiguration) -> Self {
        let draft = Draft::new(&league);
        DraftEngine {
            catalog,
            league,
            draft,
        }
    }

    /// Build an engine over `players` with the given settings.
    pub fn with_players(players: Vec<Player>, league: LeagueConfiguration) -> Result<Self> {
        Ok(Self::new(PlayerCatalog::from_players(players)?, league))
    }

    // -- Catalog -----------------------------------------------------------

    /// Replace the player pool. The draft restarts from pick 1.
    pub fn load_catalog(&mut self, players: Vec<Player>) -> Result<()> {
        self.catalog.load(players)?;
        if self.catalog.is_empty() {
            warn!("Catalog is empty; suggestions will have no candidates");
        }
        self.draft = Draft::new(&self.league);
        info!("Draft restarted for new catalog");
        Ok(())
    }

    pub fn catalog(&self) -> &PlayerCatalog {
        &self.catalog
    }

    /// Available players whose name contains `query`.
    pub fn search_players(&self, query: &str) -> Vec<Player> {
        self.catalog.search(query).into_iter().cloned().collect()
    }

    pub fn players_by_position(&self, position: Position) -> Vec<Player> {
        self.catalog.by_position(position).into_iter().cloned().collect()
    }

    /// Look up one player, drafted or not.
    pub fn player(&self, player_id: &str) -> Result<&Player> {
        self.catalog
            .get(player_id)
            .ok_or_else(|| DraftError::player_not_found(player_id))
    }

    // -- Settings ----------------------------------------------------------

    pub fn settings(&self) -> &LeagueConfiguration {
        &self.league
    }

    /// Replace the league settings wholesale. The configuration is validated
    /// first; on success the draft and catalog availability are reset.
    pub fn configure(&mut self, league: LeagueConfiguration) -> Result<()> {
        league.validate()?;
        self.league = league;
        self.rebuild_draft();
        Ok(())
    }

    /// Apply a partial settings change.
    ///
    /// Changing the team count or the snake flag alters the pick order, so
    /// the draft restarts. A new draft position only changes which team is
    /// the user's. Everything else applies without touching the draft.
    pub fn update_settings(&mut self, update: &LeagueUpdate) -> Result<&LeagueConfiguration> {
        let next = self.league.merged(update)?;
        let order_changed = next.number_of_teams() != self.league.number_of_teams()
            || next.snake_draft() != self.league.snake_draft();

        self.league = next;
        if order_changed {
            self.rebuild_draft();
        } else {
            self.draft.set_draft_position(self.league.draft_position());
        }
        info!(
            "Settings updated ({} teams, pick {}, snake={}, {})",
            self.league.number_of_teams(),
            self.league.draft_position(),
            self.league.snake_draft(),
            self.league.league_type()
        );
        Ok(&self.league)
    }

    /// Switch to a league-type preset. Roster requirements and reception
    /// scoring change; the draft carries on.
    pub fn apply_preset(&mut self, league_type: LeagueType) -> &LeagueConfiguration {
        self.league = self.league.with_preset(league_type);
        info!("Applied {} preset", league_type);
        &self.league
    }

    /// Every preset with its display label and reception value.
    pub fn league_types(&self) -> Vec<LeagueTypeInfo> {
        LeagueType::ALL
            .iter()
            .map(|&league_type| LeagueTypeInfo {
                league_type,
                label: league_type.label(),
                receptions: league_type.preset().receptions,
            })
            .collect()
    }

    fn rebuild_draft(&mut self) {
        self.draft = Draft::new(&self.league);
        self.catalog.reset();
        info!(
            "Draft rebuilt: {} teams x {} rounds",
            self.league.number_of_teams(),
            self.league.total_rounds()
        );
    }

    /// Fantasy points for a stat line under the current scoring settings.
    pub fn calculate_points(&self, stats: &StatLine) -> f64 {
        self.league.scoring().calculate_points(stats)
    }

    /// Team ids in pick order for `round`.
    pub fn draft_order(&self, round: u32) -> Result<Vec<u32>> {
        self.check_round(round)?;
        Ok(self.league.draft_order(round))
    }

    pub fn team_pick_info(&self, team_id: u32, round: u32) -> Result<TeamPickInfo> {
        self.check_round(round)?;
        self.league
            .team_pick_info(team_id, round)
            .ok_or_else(|| DraftError::team_not_found(team_id))
    }

    fn check_round(&self, round: u32) -> Result<()> {
        if round == 0 || round > self.league.total_rounds() {
            return Err(DraftError::validation(
                "round",
                format!(
                    "must be between 1 and {}, got {round}",
                    self.league.total_rounds()
                ),
            ));
        }
        Ok(())
    }

    // -- Draft -------------------------------------------------------------

    pub fn state(&self) -> DraftSnapshot {
        DraftSnapshot {
            state: *self.draft.state(),
            teams: self.draft.teams().to_vec(),
            available_players: self.catalog.available().into_iter().cloned().collect(),
            availability: self.catalog.availability(),
            is_user_pick: self.draft.is_user_pick(),
            team_on_clock: self.draft.team_on_clock(),
            user_team: self.league.draft_position(),
        }
    }

    /// Round and pick counters without building a full snapshot.
    pub fn draft_state(&self) -> &DraftState {
        self.draft.state()
    }

    /// Commit a pick for `team_id`.
    ///
    /// `round` and `pick_number` confirm which turn the caller believes is
    /// on the clock. Checks run in order: draft complete, unknown team, turn
    /// mismatch, then player availability. A rejected call changes nothing.
    pub fn make_pick(
        &mut self,
        player_id: &str,
        team_id: u32,
        round: u32,
        pick_number: u32,
    ) -> Result<PickOutcome> {
        let state = *self.draft.state();
        let Some(on_clock) = self.draft.team_on_clock() else {
            return Err(DraftError::InvalidState(
                "the draft is complete; reset to start over".into(),
            ));
        };
        self.draft.team(team_id)?;

        if (round, pick_number, team_id) != (state.current_round, state.current_pick, on_clock) {
            return Err(DraftError::Conflict {
                expected: format!(
                    "round {}, pick {}, team {}",
                    state.current_round, state.current_pick, on_clock
                ),
                actual: format!("round {round}, pick {pick_number}, team {team_id}"),
            });
        }

        let pick = self.draft.make_pick(&mut self.catalog, player_id)?;
        Ok(PickOutcome {
            pick,
            state: *self.draft.state(),
        })
    }

    /// Rank the available players for `team_id` in `current_round`.
    pub fn suggest(&self, team_id: u32, current_round: u32) -> Result<Recommendation> {
        if current_round == 0 {
            return Err(DraftError::validation(
                "current_round",
                "must be at least 1",
            ));
        }
        let team = self.draft.team(team_id)?;
        let available = self.catalog.available();
        let recommendation = scorer::recommend(&available, &team.roster, &self.league, current_round);
        if let Some(best) = recommendation.optimal_pick() {
            debug!(
                "Suggestion for team {} in round {}: {} ({:.2})",
                team_id, current_round, best.player.name, best.score
            );
        }
        Ok(recommendation)
    }

    /// Every slot grouped by round, filled or not.
    pub fn board(&self) -> Vec<Vec<DraftPick>> {
        self.draft.board()
    }

    pub fn team_roster(&self, team_id: u32) -> Result<TeamRoster> {
        let team = self.draft.team(team_id)?;
        Ok(TeamRoster {
            team: TeamSummary {
                team_id: team.team_id,
                team_name: team.team_name.clone(),
            },
            roster: team.roster.clone(),
            picks: team.picks.clone(),
            stats: roster::team_stats(&team.roster),
            compliance: roster::compliance(&team.roster, self.league.roster_requirements()),
        })
    }

    /// Filled picks in pick order.
    pub fn history(&self) -> Vec<DraftPick> {
        self.draft.history()
    }

    /// Clear all picks and make every player available again.
    pub fn reset(&mut self) {
        self.draft.reset(&mut self.catalog);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
