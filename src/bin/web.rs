//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tournament_manager_web::{
    draw_groups, generate_all_fixtures, generate_bracket, group_table, is_eligible,
    record_knockout_result, record_result, GroupId, MatchId, OddQualifierPolicy, Position,
    SquadMemberId, StandingsRow, TeamId, Tournament, TournamentError, TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

fn default_teams_per_group() -> usize {
    4
}

fn default_qualifiers_per_group() -> usize {
    2
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default = "default_teams_per_group")]
    teams_per_group: usize,
    #[serde(default = "default_qualifiers_per_group")]
    qualifiers_per_group: usize,
    #[serde(default)]
    odd_qualifier_policy: OddQualifierPolicy,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct EntryFeeBody {
    amount: f64,
    deadline: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct AddSquadMemberBody {
    name: String,
    number: u8,
    position: Position,
}

#[derive(Deserialize)]
struct ResultBody {
    score1: u32,
    score2: u32,
}

#[derive(Deserialize)]
struct StandingsQuery {
    group: Option<GroupId>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct TournamentTeamPlayerPath {
    id: TournamentId,
    team_id: TeamId,
    player_id: SquadMemberId,
}

/// Per-team verdict of the entry-fee gate, as shown on the eligibility page.
#[derive(Serialize)]
struct EligibilityStatus {
    team_id: TeamId,
    team: String,
    amount: Option<f64>,
    paid: bool,
    deadline: Option<NaiveDate>,
    eligible: bool,
}

/// One ranked group table in the standings response.
#[derive(Serialize)]
struct GroupTable {
    group: GroupId,
    group_name: String,
    table: Vec<StandingsRow>,
}

fn error_json(e: &TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-manager-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let mut tournament = Tournament::new(
        body.name.trim(),
        body.teams_per_group,
        body.qualifiers_per_group,
    );
    tournament.odd_qualifier_policy = body.odd_qualifier_policy;
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    match g.get(&id) {
        Some(entry) => HttpResponse::Ok().json(&entry.tournament),
        None => not_found(),
    }
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Register one team.
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.add_team(body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Bulk team registration: CSV body, team name in the first column.
#[post("/api/tournaments/{id}/teams/import")]
async fn api_import_teams(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut added = 0usize;
    let mut skipped: Vec<String> = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": format!("CSV parse error: {}", e) }))
            }
        };
        let name = record.get(0).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        match t.add_team(name.as_str()) {
            Ok(_) => added += 1,
            Err(_) => skipped.push(name),
        }
    }
    HttpResponse::Ok().json(serde_json::json!({ "added": added, "skipped": skipped }))
}

/// Rename a team.
#[put("/api/tournaments/{id}/teams/{team_id}")]
async fn api_rename_team(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.rename_team(path.team_id, body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Remove a team (refused once matches reference it).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.remove_team(path.team_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Set or update a team's entry fee (amount + optional deadline).
#[put("/api/tournaments/{id}/teams/{team_id}/fee")]
async fn api_set_entry_fee(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<EntryFeeBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.set_entry_fee(path.team_id, body.amount, body.deadline) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Mark a team's entry fee as paid.
#[post("/api/tournaments/{id}/teams/{team_id}/fee/pay")]
async fn api_pay_entry_fee(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.mark_fee_paid(path.team_id, Utc::now()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Per-team eligibility verdicts (live, evaluated against today's date).
#[get("/api/tournaments/{id}/eligibility")]
async fn api_eligibility(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &entry.tournament;
    let today = Utc::now().date_naive();
    let statuses: Vec<EligibilityStatus> = t
        .teams
        .iter()
        .map(|team| {
            let fee = t.entry_fees.get(&team.id);
            EligibilityStatus {
                team_id: team.id,
                team: team.name.clone(),
                amount: fee.map(|f| f.amount),
                paid: fee.map(|f| f.paid).unwrap_or(false),
                deadline: fee.and_then(|f| f.deadline),
                eligible: is_eligible(fee, today),
            }
        })
        .collect();
    HttpResponse::Ok().json(statuses)
}

/// Add a squad member to a team's roster.
#[post("/api/tournaments/{id}/teams/{team_id}/players")]
async fn api_add_squad_member(
    state: AppState,
    path: Path<TournamentTeamPath>,
    body: Json<AddSquadMemberBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.add_squad_member(path.team_id, body.name.trim(), body.number, body.position) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Remove a squad member from a team's roster.
#[delete("/api/tournaments/{id}/teams/{team_id}/players/{player_id}")]
async fn api_remove_squad_member(state: AppState, path: Path<TournamentTeamPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.remove_squad_member(path.team_id, path.player_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Run the group draw over all registered teams.
#[post("/api/tournaments/{id}/draw")]
async fn api_draw(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match draw_groups(t, &mut rand::thread_rng(), Utc::now().date_naive()) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Generate the whole group-stage calendar.
#[post("/api/tournaments/{id}/fixtures")]
async fn api_generate_fixtures(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    let created = generate_all_fixtures(t, Utc::now());
    log::info!("tournament {}: generated {} fixtures", t.id, created);
    HttpResponse::Ok().json(t)
}

/// Ranked group tables; ?group= narrows to one group.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &entry.tournament;
    let tables: Vec<GroupTable> = t
        .groups
        .iter()
        .filter(|group| query.group.map(|wanted| group.id == wanted).unwrap_or(true))
        .map(|group| GroupTable {
            group: group.id,
            group_name: group.name.clone(),
            table: group_table(t, group.id).into_iter().cloned().collect(),
        })
        .collect();
    HttpResponse::Ok().json(tables)
}

/// Record a group match result (write-once).
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match record_result(t, path.match_id, body.score1, body.score2) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Seed the knockout bracket from the current group tables.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match generate_bracket(t, &mut rand::thread_rng(), Utc::now()) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => error_json(&e),
    }
}

/// Bracket state ordered by round then slot.
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    HttpResponse::Ok().json(entry.tournament.bracket())
}

/// Record a knockout result; the winner advances a round.
#[put("/api/tournaments/{id}/bracket/{match_id}/result")]
async fn api_record_knockout_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match record_knockout_result(t, path.match_id, body.score1, body.score2, Utc::now()) {
        Ok(winner) => {
            log::info!("tournament {}: match {} won by {}", t.id, path.match_id, winner);
            HttpResponse::Ok().json(t)
        }
        Err(e) => error_json(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_team)
            .service(api_import_teams)
            .service(api_rename_team)
            .service(api_remove_team)
            .service(api_set_entry_fee)
            .service(api_pay_entry_fee)
            .service(api_eligibility)
            .service(api_add_squad_member)
            .service(api_remove_squad_member)
            .service(api_draw)
            .service(api_generate_fixtures)
            .service(api_standings)
            .service(api_record_result)
            .service(api_generate_bracket)
            .service(api_get_bracket)
            .service(api_record_knockout_result)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
