//! Routes for the relay session.
//!
//! Command endpoints answer with the ids of the events they produced and the
//! session snapshot taken right after; query endpoints answer with views.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use remix_core::command::new_correlation_id;
use remix_core::error::DomainError;
use remix_session::application::command_handlers::SessionCommandResult;
use remix_session::application::query_handlers::{
    FinalSubmissionView, SessionStateView, SubmissionView,
};
use remix_session::domain::challenge::{Challenge, RoundBrief};
use remix_session::domain::commands::{
    AddTeam, AdvanceRound, ConfigureTiming, EndRound, PauseRound, RemoveTeam, ReplaceRoster,
    ResumeRound, RewindRound, SelectChallenge, SessionCommand, StartRound, SubmitWork,
};
use remix_session::domain::roster::{NewTeam, Team, TeamId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /timing.
#[derive(Debug, Deserialize)]
pub struct ConfigureTimingRequest {
    /// New round length in seconds.
    #[serde(default)]
    pub time_per_round: Option<u32>,
    /// New number of rounds.
    #[serde(default)]
    pub total_rounds: Option<u32>,
}

/// Request body for POST /submissions.
#[derive(Debug, Deserialize)]
pub struct SubmitWorkRequest {
    /// Round the work belongs to.
    pub round_index: u32,
    /// Submitting team.
    pub team_id: TeamId,
    /// The work itself.
    pub content: String,
}

/// Request body for PUT /teams.
#[derive(Debug, Deserialize)]
pub struct ReplaceRosterRequest {
    /// The new roster, in rotation order.
    pub teams: Vec<NewTeam>,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The session the command was applied to.
    pub session_id: Uuid,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
    /// Session snapshot after the command.
    pub state: SessionStateView,
}

async fn run_command(
    state: &AppState,
    command: SessionCommand,
) -> Result<Json<CommandResponse>, ApiError> {
    let SessionCommandResult {
        aggregate_id,
        events,
        state: snapshot,
    } = state.session.execute(command).await?;
    Ok(Json(CommandResponse {
        session_id: aggregate_id,
        event_ids: events.iter().map(|e| e.metadata.event_id).collect(),
        state: snapshot,
    }))
}

/// GET /
#[instrument(skip(state))]
async fn get_state(State(state): State<AppState>) -> Result<Json<SessionStateView>, ApiError> {
    Ok(Json(state.session.state().await?))
}

/// POST /start
#[instrument(skip(state))]
async fn start_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = StartRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling start_round command");
    run_command(&state, command.into()).await
}

/// POST /pause
#[instrument(skip(state))]
async fn pause_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = PauseRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling pause_round command");
    run_command(&state, command.into()).await
}

/// POST /resume
#[instrument(skip(state))]
async fn resume_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = ResumeRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling resume_round command");
    run_command(&state, command.into()).await
}

/// POST /end
#[instrument(skip(state))]
async fn end_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = EndRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling end_round command");
    run_command(&state, command.into()).await
}

/// POST /advance
#[instrument(skip(state))]
async fn advance_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = AdvanceRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling advance_round command");
    run_command(&state, command.into()).await
}

/// POST /rewind
#[instrument(skip(state))]
async fn rewind_round(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let command = RewindRound {
        correlation_id: new_correlation_id(),
    };
    info!(correlation_id = %command.correlation_id, "handling rewind_round command");
    run_command(&state, command.into()).await
}

/// PUT /timing
#[instrument(skip(state, request))]
async fn configure_timing(
    State(state): State<AppState>,
    Json(request): Json<ConfigureTimingRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = ConfigureTiming {
        correlation_id: new_correlation_id(),
        time_per_round: request.time_per_round,
        total_rounds: request.total_rounds,
    };
    info!(correlation_id = %command.correlation_id, "handling configure_timing command");
    run_command(&state, command.into()).await
}

/// POST /submissions
#[instrument(
    skip(state, request),
    fields(round_index = request.round_index, team_id = %request.team_id)
)]
async fn submit_work(
    State(state): State<AppState>,
    Json(request): Json<SubmitWorkRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = SubmitWork {
        correlation_id: new_correlation_id(),
        round_index: request.round_index,
        team_id: request.team_id,
        content: request.content,
    };
    info!(correlation_id = %command.correlation_id, "handling submit_work command");
    run_command(&state, command.into()).await
}

/// GET /submissions/{round}/{team_id}
#[instrument(skip(state))]
async fn get_submission(
    State(state): State<AppState>,
    Path((round, team_id)): Path<(u32, String)>,
) -> Result<Json<SubmissionView>, ApiError> {
    let team_id = TeamId::from(team_id);
    state
        .session
        .submission(round, team_id.clone())
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError(DomainError::NotFound(format!(
                "no submission from team {team_id} for round {round}"
            )))
        })
}

/// GET /inherited/{round}/{team_id}
///
/// `null` when there is nothing to inherit.
#[instrument(skip(state))]
async fn get_inherited_submission(
    State(state): State<AppState>,
    Path((round, team_id)): Path<(u32, String)>,
) -> Result<Json<Option<SubmissionView>>, ApiError> {
    Ok(Json(
        state.session.inherited_submission(round, team_id).await?,
    ))
}

/// GET /brief/{round}
#[instrument(skip(state))]
async fn get_round_brief(
    State(state): State<AppState>,
    Path(round): Path<u32>,
) -> Result<Json<RoundBrief>, ApiError> {
    Ok(Json(state.session.round_brief(round).await?))
}

/// GET /final-submissions
#[instrument(skip(state))]
async fn get_final_submissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<FinalSubmissionView>>, ApiError> {
    Ok(Json(state.session.final_submissions().await?))
}

/// GET /teams
#[instrument(skip(state))]
async fn get_roster(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.session.roster().await?))
}

/// POST /teams
#[instrument(skip(state, team), fields(team_id = %team.id))]
async fn add_team(
    State(state): State<AppState>,
    Json(team): Json<NewTeam>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = AddTeam {
        correlation_id: new_correlation_id(),
        team,
    };
    info!(correlation_id = %command.correlation_id, "handling add_team command");
    run_command(&state, command.into()).await
}

/// PUT /teams
#[instrument(skip(state, request), fields(teams = request.teams.len()))]
async fn replace_roster(
    State(state): State<AppState>,
    Json(request): Json<ReplaceRosterRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = ReplaceRoster {
        correlation_id: new_correlation_id(),
        teams: request.teams,
    };
    info!(correlation_id = %command.correlation_id, "handling replace_roster command");
    run_command(&state, command.into()).await
}

/// DELETE /teams/{team_id}
#[instrument(skip(state))]
async fn remove_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = RemoveTeam {
        correlation_id: new_correlation_id(),
        team_id: TeamId::from(team_id),
    };
    info!(correlation_id = %command.correlation_id, "handling remove_team command");
    run_command(&state, command.into()).await
}

/// GET /challenge
#[instrument(skip(state))]
async fn get_challenge(
    State(state): State<AppState>,
) -> Result<Json<Option<Challenge>>, ApiError> {
    Ok(Json(state.session.challenge().await?))
}

/// PUT /challenge
#[instrument(skip(state, challenge), fields(title = %challenge.title))]
async fn select_challenge(
    State(state): State<AppState>,
    Json(challenge): Json<Challenge>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = SelectChallenge {
        correlation_id: new_correlation_id(),
        challenge,
    };
    info!(correlation_id = %command.correlation_id, "handling select_challenge command");
    run_command(&state, command.into()).await
}

/// Returns the router for the session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_state))
        .route("/start", post(start_round))
        .route("/pause", post(pause_round))
        .route("/resume", post(resume_round))
        .route("/end", post(end_round))
        .route("/advance", post(advance_round))
        .route("/rewind", post(rewind_round))
        .route("/timing", put(configure_timing))
        .route("/submissions", post(submit_work))
        .route("/submissions/{round}/{team_id}", get(get_submission))
        .route("/inherited/{round}/{team_id}", get(get_inherited_submission))
        .route("/brief/{round}", get(get_round_brief))
        .route("/final-submissions", get(get_final_submissions))
        .route("/teams", get(get_roster).post(add_team).put(replace_roster))
        .route("/teams/{team_id}", delete(remove_team))
        .route("/challenge", get(get_challenge).put(select_challenge))
}
