// Draft state machine: pick progression, turn ownership, pick commit and
// the draft board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::PlayerCatalog;
use crate::error::{DraftError, Result};
use crate::league::{self, LeagueConfiguration, TOTAL_ROUNDS};
use crate::player::Player;

/// One slot on the draft board. Empty until the pick is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub round: u32,
    /// Overall pick number, 1-based and unique across the draft.
    pub pick_number: u32,
    /// Team that owns this slot.
    pub team_id: u32,
    pub player: Option<Player>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl DraftPick {
    pub fn is_filled(&self) -> bool {
        self.player.is_some()
    }
}

/// A team and everything it has drafted so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: u32,
    pub team_name: String,
    /// Players in the order they were drafted.
    pub roster: Vec<Player>,
    /// Filled picks owned by this team, in pick order.
    pub picks: Vec<DraftPick>,
}

impl Team {
    fn new(team_id: u32) -> Self {
        Team {
            team_id,
            team_name: format!("Team {team_id}"),
            roster: Vec::new(),
            picks: Vec::new(),
        }
    }
}

/// Progress counters for the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub current_round: u32,
    /// The pick on the clock; `total_picks + 1` once the draft is complete.
    pub current_pick: u32,
    pub total_picks: u32,
    pub is_complete: bool,
}

impl DraftState {
    fn fresh(total_picks: u32) -> Self {
        DraftState {
            current_round: 1,
            current_pick: 1,
            total_picks,
            is_complete: false,
        }
    }
}

/// Round (1-based) that an overall pick number falls in.
pub fn round_for_pick(pick_number: u32, number_of_teams: u32) -> u32 {
    (pick_number - 1) / number_of_teams + 1
}

/// Team holding an overall pick number.
pub fn team_for_pick(pick_number: u32, number_of_teams: u32, snake_draft: bool) -> u32 {
    let round = round_for_pick(pick_number, number_of_teams);
    let position_in_round = ((pick_number - 1) % number_of_teams) as usize;
    league::draft_order(round, number_of_teams, snake_draft)[position_in_round]
}

/// The pick-order state machine.
///
/// Owns the [`DraftState`], every board slot and every team roster. The
/// player catalog is passed in on each commit so availability and draft
/// progress change together.
#[derive(Debug, Clone)]
pub struct Draft {
    number_of_teams: u32,
    snake_draft: bool,
    draft_position: u32,
    state: DraftState,
    /// Index `i` holds pick number `i + 1`.
    slots: Vec<DraftPick>,
    teams: Vec<Team>,
}

impl Draft {
    pub fn new(league: &LeagueConfiguration) -> Self {
        let number_of_teams = league.number_of_teams();
        let snake_draft = league.snake_draft();
        let total_picks = league.total_picks();
        let mut draft = Draft {
            number_of_teams,
            snake_draft,
            draft_position: league.draft_position(),
            state: DraftState::fresh(total_picks),
            slots: Vec::with_capacity(total_picks as usize),
            teams: Vec::with_capacity(number_of_teams as usize),
        };
        draft.build_board();
        draft
    }

    fn build_board(&mut self) {
        self.slots = (1..=self.state.total_picks)
            .map(|pick_number| DraftPick {
                round: round_for_pick(pick_number, self.number_of_teams),
                pick_number,
                team_id: team_for_pick(pick_number, self.number_of_teams, self.snake_draft),
                player: None,
                timestamp: None,
            })
            .collect();
        self.teams = (1..=self.number_of_teams).map(Team::new).collect();
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Change which team is the user's. Pick order is unaffected.
    pub fn set_draft_position(&mut self, draft_position: u32) {
        self.draft_position = draft_position;
    }

    /// Team on the clock, or `None` once the draft is complete.
    pub fn team_on_clock(&self) -> Option<u32> {
        if self.state.is_complete {
            return None;
        }
        Some(team_for_pick(
            self.state.current_pick,
            self.number_of_teams,
            self.snake_draft,
        ))
    }

    /// Whether the current pick belongs to the user's team.
    pub fn is_user_pick(&self) -> bool {
        self.team_on_clock() == Some(self.draft_position)
    }

    pub fn team(&self, team_id: u32) -> Result<&Team> {
        self.teams
            .iter()
            .find(|t| t.team_id == team_id)
            .ok_or_else(|| DraftError::team_not_found(team_id))
    }

    /// Commit the current pick.
    ///
    /// Every check (draft still running, player known and available) happens
    /// before anything is written, so a failed call leaves the draft and the
    /// catalog exactly as they were.
    pub fn make_pick(&mut self, catalog: &mut PlayerCatalog, player_id: &str) -> Result<DraftPick> {
        if self.state.is_complete {
            return Err(DraftError::InvalidState(
                "the draft is complete; reset to start over".into(),
            ));
        }

        let pick_number = self.state.current_pick;
        let slot_idx = (pick_number - 1) as usize;
        let team_id = self.slots[slot_idx].team_id;

        let player = catalog.mark_drafted(player_id)?.clone();

        let slot = &mut self.slots[slot_idx];
        slot.player = Some(player.clone());
        slot.timestamp = Some(Utc::now());
        let filled = slot.clone();

        let team = &mut self.teams[(team_id - 1) as usize];
        team.roster.push(player);
        team.picks.push(filled.clone());

        info!(
            "Pick #{} (round {}): {} -> {}",
            filled.pick_number,
            filled.round,
            filled.player.as_ref().map(|p| p.name.as_str()).unwrap_or(""),
            team.team_name
        );

        self.advance();
        Ok(filled)
    }

    fn advance(&mut self) {
        self.state.current_pick += 1;
        if self.state.current_pick > self.state.total_picks {
            self.state.is_complete = true;
            self.state.current_round = TOTAL_ROUNDS;
            info!("Draft complete after {} picks", self.state.total_picks);
        } else {
            self.state.current_round = round_for_pick(self.state.current_pick, self.number_of_teams);
        }
    }

    /// Every slot grouped by round, in pick order, including empty slots.
    pub fn board(&self) -> Vec<Vec<DraftPick>> {
        self.slots
            .chunks(self.number_of_teams as usize)
            .map(|round| round.to_vec())
            .collect()
    }

    /// Filled picks in pick order.
    pub fn history(&self) -> Vec<DraftPick> {
        self.slots.iter().filter(|s| s.is_filled()).cloned().collect()
    }

    /// Clear every pick and roster and make every player available again.
    pub fn reset(&mut self, catalog: &mut PlayerCatalog) {
        self.state = DraftState::fresh(self.state.total_picks);
        self.build_board();
        catalog.reset();
        info!("Draft reset");
    }
}
