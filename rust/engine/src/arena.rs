use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{ArenaError, GameError, RulesError};
use crate::game::{Game, GameOutcome, Phase};
use crate::player::Player;
use crate::rules::{Rules, MAX_PLAYERS};

/// How the roster is grouped into matchups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArenaMode {
    /// Every subset of at least two players (and at most a full table).
    Subsets,
    /// Every unordered pair, head to head.
    #[default]
    Pairs,
    /// The whole roster at one table.
    All,
}

impl std::str::FromStr for ArenaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "subsets" => Ok(ArenaMode::Subsets),
            "p" | "pairs" => Ok(ArenaMode::Pairs),
            "a" | "all" => Ok(ArenaMode::All),
            other => Err(format!("unknown arena mode '{}' (expected s, p or a)", other)),
        }
    }
}

impl std::fmt::Display for ArenaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ArenaMode::Subsets => "subsets",
            ArenaMode::Pairs => "pairs",
            ArenaMode::All => "all",
        })
    }
}

/// Aggregate results for one strategy.
///
/// Score statistics cover completed games only; aborted games show up in
/// `forfeits` (when the strategy was at fault) and in the matchup's `aborts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Games in which this strategy opened the first round.
    pub first_seat: u32,
    pub forfeits: u32,
    pub score_sum: u64,
    pub score_min: Option<u16>,
    pub score_max: Option<u16>,
    pub score_sum_sq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placing {
    Win,
    Draw,
    Loss,
}

impl PlayerStats {
    fn new(player: String) -> Self {
        Self {
            player,
            ..Self::default()
        }
    }

    fn record(&mut self, score: u16, placing: Placing, opened: bool) {
        self.games += 1;
        match placing {
            Placing::Win => self.wins += 1,
            Placing::Draw => self.draws += 1,
            Placing::Loss => self.losses += 1,
        }
        if opened {
            self.first_seat += 1;
        }
        self.score_sum += score as u64;
        self.score_sum_sq += (score as u64) * (score as u64);
        self.score_min = Some(self.score_min.map_or(score, |m| m.min(score)));
        self.score_max = Some(self.score_max.map_or(score, |m| m.max(score)));
    }

    pub fn mean_score(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.score_sum as f64 / self.games as f64
    }

    /// Population standard deviation of final scores.
    pub fn score_stddev(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let n = self.games as f64;
        let mean = self.mean_score();
        (self.score_sum_sq as f64 / n - mean * mean).max(0.0).sqrt()
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupReport {
    /// Roster indices, ascending.
    pub players: Vec<usize>,
    /// Completed games.
    pub games: u32,
    pub aborts: u32,
    /// One entry per member of `players`, same order.
    pub stats: Vec<PlayerStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaReport {
    pub mode: ArenaMode,
    pub matchups: Vec<MatchupReport>,
    /// One entry per roster slot.
    pub totals: Vec<PlayerStats>,
}

impl ArenaReport {
    pub fn total_games(&self) -> u32 {
        self.matchups.iter().map(|m| m.games).sum()
    }

    pub fn total_aborts(&self) -> u32 {
        self.matchups.iter().map(|m| m.aborts).sum()
    }
}

struct GameRecord {
    matchup: usize,
    /// Roster index seated at each seat.
    seats: Vec<usize>,
    result: Result<GameOutcome, GameError>,
}

/// Tournament harness: plays every matchup `count` times on a bounded
/// thread pool and aggregates the results.
///
/// Each game gets fresh copies of its strategies and a seed derived from
/// the arena seed, the matchup and the game index, so a report depends only
/// on the configuration, never on the thread count or scheduling.
///
/// # Examples
///
/// ```no_run
/// use tessera_engine::arena::{Arena, ArenaMode};
/// use tessera_engine::player::Player;
/// use tessera_engine::rules::Rules;
///
/// fn tournament(roster: Vec<Box<dyn Player>>) {
///     let report = Arena::new(Rules::DEFAULT, roster)
///         .mode(ArenaMode::Pairs)
///         .count(100)
///         .thread_limit(4)
///         .seed(42)
///         .run()
///         .expect("arena configuration");
///     for stats in &report.totals {
///         println!("{}: {:.1}%", stats.player, 100.0 * stats.win_rate());
///     }
/// }
/// ```
pub struct Arena {
    rules: Rules,
    players: Vec<Box<dyn Player>>,
    mode: ArenaMode,
    count: usize,
    thread_limit: usize,
    seed: u64,
    rotate_seats: bool,
}

impl Arena {
    pub const DEFAULT_COUNT: usize = 1000;
    pub const DEFAULT_THREADS: usize = 8;

    pub fn new(rules: Rules, players: Vec<Box<dyn Player>>) -> Self {
        Self {
            rules,
            players,
            mode: ArenaMode::default(),
            count: Self::DEFAULT_COUNT,
            thread_limit: Self::DEFAULT_THREADS,
            seed: 0,
            rotate_seats: true,
        }
    }

    pub fn mode(mut self, mode: ArenaMode) -> Self {
        self.mode = mode;
        self
    }

    /// Games per matchup.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Upper bound on simultaneously running games (at least one).
    pub fn thread_limit(mut self, threads: usize) -> Self {
        self.thread_limit = threads.max(1);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rotate the seat order between games of a matchup.
    pub fn rotate_seats(mut self, rotate: bool) -> Self {
        self.rotate_seats = rotate;
        self
    }

    pub fn player_types(&self) -> Vec<String> {
        self.players.iter().map(|p| p.player_type()).collect()
    }

    /// Matchups as ascending roster indices, in a stable order.
    pub fn matchups(&self) -> Vec<Vec<usize>> {
        let n = self.players.len();
        match self.mode {
            ArenaMode::All => {
                if n >= 2 {
                    vec![(0..n).collect()]
                } else {
                    Vec::new()
                }
            }
            ArenaMode::Pairs => (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| vec![i, j]))
                .collect(),
            ArenaMode::Subsets => (2..=n.min(MAX_PLAYERS))
                .flat_map(|k| combinations(n, k))
                .collect(),
        }
    }

    /// Seat order for game `game` of `group`.
    pub fn seating(&self, group: &[usize], game: usize) -> Vec<usize> {
        let mut seats = group.to_vec();
        if self.rotate_seats && !seats.is_empty() {
            let k = seats.len();
            seats.rotate_left(game % k);
        }
        seats
    }

    /// Plays every game and returns the merged report.
    pub fn run(&self) -> Result<ArenaReport, ArenaError> {
        if self.players.len() < 2 {
            return Err(ArenaError::NotEnoughPlayers {
                min: 2,
                actual: self.players.len(),
            });
        }
        let groups = self.matchups();
        let mut tables = Vec::with_capacity(groups.len());
        for group in &groups {
            tables.push(self.table_rules(group)?);
        }

        let jobs: Vec<(usize, usize)> = (0..groups.len())
            .flat_map(|m| (0..self.count).map(move |g| (m, g)))
            .collect();
        info!(
            mode = %self.mode,
            matchups = groups.len(),
            games = jobs.len(),
            threads = self.thread_limit,
            "arena started"
        );
        let started = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.thread_limit)
            .build()
            .map_err(|e| ArenaError::ThreadPool(e.to_string()))?;
        let records: Vec<GameRecord> = pool.install(|| {
            jobs.par_iter()
                .map(|&(m, g)| self.play_game(m, &groups[m], &tables[m], g))
                .collect()
        });

        let report = self.merge(&groups, records);
        info!(
            games = report.total_games(),
            aborts = report.total_aborts(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "arena finished"
        );
        Ok(report)
    }

    fn table_rules(&self, group: &[usize]) -> Result<Arc<Rules>, ArenaError> {
        let players = group.len();
        let count = u8::try_from(players).map_err(|_| ArenaError::InvalidRules {
            players,
            source: RulesError::PlayerCount {
                value: players,
                max: MAX_PLAYERS,
            },
        })?;
        let rules = self.rules.with_player_count(count);
        rules
            .validate()
            .map_err(|source| ArenaError::InvalidRules { players, source })?;
        for &idx in group {
            if !self.players[idx].check_rules(&rules) {
                return Err(ArenaError::RulesRejected {
                    player: self.players[idx].player_type(),
                    players,
                });
            }
        }
        Ok(Arc::new(rules))
    }

    fn play_game(&self, matchup: usize, group: &[usize], rules: &Arc<Rules>, game: usize) -> GameRecord {
        let seed = game_seed(self.seed, matchup, game);
        let seats = self.seating(group, game);
        let players: Vec<Box<dyn Player>> = seats
            .iter()
            .enumerate()
            .map(|(seat, &idx)| {
                let mut player = self.players[idx].copy();
                player.reseed(mix(seed, seat as u64 + 1));
                player
            })
            .collect();

        let result = match Game::with_players(Arc::clone(rules), seed, players) {
            Ok(mut table) => {
                match panic::catch_unwind(AssertUnwindSafe(|| table.roll_game())) {
                    Ok(result) => result,
                    Err(_) if table.phase() == Phase::RoundInProgress => {
                        Err(GameError::PlayerPanicked {
                            seat: table.state().current_player(),
                        })
                    }
                    Err(_) => Err(GameError::Panicked),
                }
            }
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(matchup, game, seed, error = %err, "game aborted");
        }
        GameRecord {
            matchup,
            seats,
            result,
        }
    }

    fn merge(&self, groups: &[Vec<usize>], records: Vec<GameRecord>) -> ArenaReport {
        let types = self.player_types();
        let mut matchups: Vec<MatchupReport> = groups
            .iter()
            .map(|group| MatchupReport {
                players: group.clone(),
                games: 0,
                aborts: 0,
                stats: group.iter().map(|&i| PlayerStats::new(types[i].clone())).collect(),
            })
            .collect();
        let mut totals: Vec<PlayerStats> = types.into_iter().map(PlayerStats::new).collect();

        for record in records {
            let report = &mut matchups[record.matchup];
            match record.result {
                Ok(outcome) => {
                    report.games += 1;
                    let sole = outcome.winners.len() == 1;
                    for (seat, &idx) in record.seats.iter().enumerate() {
                        let placing = match (outcome.winners.contains(&seat), sole) {
                            (true, true) => Placing::Win,
                            (true, false) => Placing::Draw,
                            (false, _) => Placing::Loss,
                        };
                        let score = outcome.scores[seat];
                        let opened = seat == outcome.first_player;
                        if let Some(pos) = report.players.iter().position(|&p| p == idx) {
                            report.stats[pos].record(score, placing, opened);
                        }
                        totals[idx].record(score, placing, opened);
                    }
                }
                Err(err) => {
                    report.aborts += 1;
                    let culprit = match err {
                        GameError::PlayerForfeit { seat, .. } | GameError::PlayerPanicked { seat } => {
                            record.seats.get(seat).copied()
                        }
                        _ => None,
                    };
                    if let Some(idx) = culprit {
                        if let Some(pos) = report.players.iter().position(|&p| p == idx) {
                            report.stats[pos].forfeits += 1;
                        }
                        totals[idx].forfeits += 1;
                    }
                }
            }
        }

        ArenaReport {
            mode: self.mode,
            matchups,
            totals,
        }
    }
}

/// `k`-element subsets of `0..n`, lexicographic.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let mut i = k;
        while i > 0 && idx[i - 1] == n - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            return out;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

fn mix(seed: u64, salt: u64) -> u64 {
    let mut z = seed.wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Independent stream per (matchup, game).
fn game_seed(seed: u64, matchup: usize, game: usize) -> u64 {
    mix(mix(seed, matchup as u64 + 1), game as u64 + 1)
}
