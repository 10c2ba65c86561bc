use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::action::{Action, Pick, Place};
use crate::errors::{GameError, IllegalReason};
use crate::panel::RoundScore;
use crate::player::{Observer, Player};
use crate::rules::Rules;
use crate::state::State;
use crate::tiles::{Tile, Tiles};

/// Rounds after which a game is abandoned.
///
/// A full bag always ends a game well before this; hitting it means a
/// strategy is stalling or the rules are degenerate.
pub const MAX_ROUNDS: u32 = 100;

const DEFAULT_SEED: u64 = 0xA1A2_A3A4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    RoundInProgress,
    /// Every source is empty; the wall tiling is pending.
    RoundEnding,
    GameOver,
}

/// Final result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub scores: Vec<u16>,
    /// All seats sharing the top score.
    pub winners: Vec<usize>,
    pub rounds: u32,
    /// Seat that opened the first round.
    pub first_player: usize,
}

/// Drives one game: owns the state, the seated players and the bag RNG.
///
/// Rules queries (`legal`, `all_legal`, `apply`, ...) are associated
/// functions over an explicit [`State`] so search strategies can use them on
/// cloned states without a `Game`.
///
/// # Examples
///
/// ```
/// use tessera_engine::game::{Game, Phase};
/// use tessera_engine::rules::Rules;
///
/// let mut game = Game::with_seed(Rules::MINI, 7).unwrap();
/// game.start_round().unwrap();
/// assert_eq!(game.phase(), Phase::RoundInProgress);
///
/// // drive the round by hand
/// while game.phase() == Phase::RoundInProgress {
///     let action = Game::all_legal(game.state())[0];
///     game.play(action).unwrap();
/// }
/// assert!(game.state().is_round_finished());
/// ```
pub struct Game {
    rules: Arc<Rules>,
    state: State,
    players: Vec<Box<dyn Player>>,
    observers: Vec<Box<dyn Observer>>,
    phase: Phase,
    seed: u64,
    rng: ChaCha20Rng,
    final_scored: bool,
    /// Seat that opened round 1, fixed by `start`.
    opening_seat: usize,
}

impl Game {
    pub fn new(rules: impl Into<Arc<Rules>>) -> Result<Self, GameError> {
        Self::with_seed(rules, DEFAULT_SEED)
    }

    pub fn with_seed(rules: impl Into<Arc<Rules>>, seed: u64) -> Result<Self, GameError> {
        let rules = rules.into();
        rules.validate()?;
        Ok(Self {
            state: State::new(Arc::clone(&rules)),
            rules,
            players: Vec::new(),
            observers: Vec::new(),
            phase: Phase::NotStarted,
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
            final_scored: false,
            opening_seat: 0,
        })
    }

    /// A game with every seat filled, in seat order.
    pub fn with_players(
        rules: impl Into<Arc<Rules>>,
        seed: u64,
        players: Vec<Box<dyn Player>>,
    ) -> Result<Self, GameError> {
        let mut game = Self::with_seed(rules, seed)?;
        game.add_players(players)?;
        Ok(game)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player_types(&self) -> Vec<String> {
        self.players.iter().map(|p| p.player_type()).collect()
    }

    /// Seats the next player after it accepts the rules.
    pub fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), GameError> {
        let expected = self.rules.player_count as usize;
        if self.players.len() >= expected {
            return Err(GameError::TooManyPlayers { expected });
        }
        if !player.check_rules(&self.rules) {
            return Err(GameError::RulesRejected {
                seat: self.players.len(),
            });
        }
        self.players.push(player);
        Ok(())
    }

    pub fn add_players(
        &mut self,
        players: impl IntoIterator<Item = Box<dyn Player>>,
    ) -> Result<(), GameError> {
        for player in players {
            self.add_player(player)?;
        }
        Ok(())
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn players_missing(&self) -> usize {
        (self.rules.player_count as usize).saturating_sub(self.players.len())
    }

    pub fn has_enough_players(&self) -> bool {
        self.players_missing() == 0
    }

    /// Fresh table with the same players; the bag replays from the seed.
    pub fn reset(&mut self) {
        self.state = State::new(Arc::clone(&self.rules));
        self.rng = ChaCha20Rng::seed_from_u64(self.seed);
        self.phase = Phase::NotStarted;
        self.final_scored = false;
        self.opening_seat = 0;
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::NotStarted)?;
        if !self.has_enough_players() {
            return Err(GameError::NotEnoughPlayers {
                expected: self.rules.player_count as usize,
                actual: self.players.len(),
            });
        }
        self.opening_seat = self.state.first_player;
        let n = self.state.player_count();
        let order: Vec<usize> = (0..n).map(|i| (self.state.first_player + i) % n).collect();
        notify(&mut self.observers, &mut self.players, |o| o.start_game(&order));
        self.start_round()
    }

    /// Refills the factories and arms the first-player token.
    pub fn start_round(&mut self) -> Result<(), GameError> {
        if !matches!(self.phase, Phase::NotStarted | Phase::RoundEnding) {
            return Err(GameError::WrongPhase {
                expected: Phase::RoundEnding,
                actual: self.phase,
            });
        }
        if self.state.round >= MAX_ROUNDS {
            return Err(GameError::RoundLimit { rounds: MAX_ROUNDS });
        }
        self.state.round += 1;
        Self::setup_factories(&mut self.state, &mut self.rng);
        self.state.token_in_center = true;
        self.state.current_player = self.state.first_player;
        self.phase = if self.state.is_round_finished() {
            Phase::RoundEnding
        } else {
            Phase::RoundInProgress
        };
        debug!(
            round = self.state.round,
            first_player = self.state.first_player,
            bag = self.state.bag.total(),
            "round started"
        );
        notify(&mut self.observers, &mut self.players, |o| o.new_round(&self.state));
        Ok(())
    }

    /// Tiles the walls, applies floor penalties and either opens the next
    /// round or finishes the game.
    pub fn end_round(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::RoundEnding)?;
        if let Some(seat) = self.state.panels.iter().position(|p| p.has_first_token()) {
            self.state.first_player = seat;
        }
        Self::score_panels(&mut self.state);
        for panel in &mut self.state.panels {
            panel.clear_first_token();
        }
        self.state.token_in_center = false;
        debug!(
            round = self.state.round,
            first_player = self.state.first_player,
            scores = ?self.state.scores(),
            "round ended"
        );
        if self.state.is_game_finished() {
            self.phase = Phase::GameOver;
            self.score_final();
            Ok(())
        } else {
            self.start_round()
        }
    }

    /// Adds the end-of-game bonuses and notifies observers. Runs once per game.
    pub fn score_final(&mut self) {
        if self.final_scored {
            return;
        }
        self.final_scored = true;
        for panel in &mut self.state.panels {
            panel.score_bonus();
        }
        let winners = self.state.winning_players();
        debug!(rounds = self.state.round, scores = ?self.state.scores(), ?winners, "game over");
        notify(&mut self.observers, &mut self.players, |o| {
            o.end_game(&self.state, &winners)
        });
    }

    /// Applies `action` for the current player and advances the phase.
    pub fn play(&mut self, action: Action) -> Result<(), GameError> {
        self.expect_phase(Phase::RoundInProgress)?;
        let seat = self.state.current_player;
        Self::apply(action, &mut self.state)?;
        trace!(round = self.state.round, seat, %action, "action applied");
        notify(&mut self.observers, &mut self.players, |o| o.action_played(action));
        if self.state.is_round_finished() {
            self.phase = Phase::RoundEnding;
        }
        Ok(())
    }

    /// Asks the current player for an action and plays it.
    ///
    /// An illegal choice is reported to the player and forfeits the game.
    pub fn next_player(&mut self) -> Result<Action, GameError> {
        self.expect_phase(Phase::RoundInProgress)?;
        let seat = self.state.current_player;
        let actual = self.players.len();
        let player = self
            .players
            .get_mut(seat)
            .ok_or(GameError::NotEnoughPlayers {
                expected: self.rules.player_count as usize,
                actual,
            })?;
        let action = player.play(&self.state);
        if let Err(reason) = Self::check(action, &self.state) {
            player.error(&format!("illegal action {}: {}", action, reason));
            warn!(seat, %action, %reason, player = %player.player_type(), "player forfeits");
            return Err(GameError::PlayerForfeit {
                seat,
                action,
                reason,
            });
        }
        self.play(action)?;
        Ok(action)
    }

    /// Plays until the current round is over, then closes it.
    pub fn roll_round(&mut self) -> Result<(), GameError> {
        while self.phase == Phase::RoundInProgress {
            self.next_player()?;
        }
        if self.phase == Phase::RoundEnding {
            self.end_round()?;
        }
        Ok(())
    }

    /// Plays a whole game from wherever it stands.
    pub fn roll_game(&mut self) -> Result<GameOutcome, GameError> {
        if self.phase == Phase::NotStarted {
            self.start()?;
        }
        while self.phase != Phase::GameOver {
            self.roll_round()?;
        }
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome {
            scores: self.state.scores(),
            winners: self.state.winning_players(),
            rounds: self.state.round,
            first_player: self.opening_seat,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Draws up to `count` tiles uniformly without replacement, pouring the
    /// discard back into the bag whenever it runs dry.
    pub fn pull_random_tiles<R: Rng>(state: &mut State, rng: &mut R, count: u16) -> Tiles {
        let tile_types = state.rules.tile_types;
        let mut drawn = Tiles::ZERO;
        for _ in 0..count {
            if state.bag.is_empty() {
                state.bag += std::mem::take(&mut state.discard);
                if state.bag.is_empty() {
                    break;
                }
            }
            let mut pick = rng.random_range(0..state.bag.total());
            for color in Tile::all(tile_types) {
                let available = state.bag[color] as u32;
                if pick < available {
                    state.bag -= color;
                    drawn += color;
                    break;
                }
                pick -= available;
            }
        }
        drawn
    }

    pub fn setup_factories<R: Rng>(state: &mut State, rng: &mut R) {
        let per_factory = state.rules.factory_tiles;
        for i in 0..state.factories.len() {
            let tiles = Self::pull_random_tiles(state, rng, per_factory);
            state.factories[i].fill(tiles);
        }
    }

    pub fn legal(action: Action, state: &State) -> bool {
        Self::check(action, state).is_ok()
    }

    /// Like [`Game::legal`], naming the first clause that fails.
    pub fn check(action: Action, state: &State) -> Result<(), IllegalReason> {
        if action.color.is_none() || action.color.index() >= state.rules.tile_types as usize {
            return Err(IllegalReason::NoneColor);
        }
        let source = state
            .source(action.pick)
            .ok_or(IllegalReason::UnknownSource)?;
        if source.is_empty() {
            return Err(IllegalReason::SourceEmpty);
        }
        if source[action.color] == 0 {
            return Err(IllegalReason::ColorAbsent);
        }
        let line = match action.place {
            Place::Floor => return Ok(()),
            Place::Line(line) => line as usize,
        };
        let panel = state.panel(state.current_player);
        if line >= panel.pyramid().size() {
            return Err(IllegalReason::UnknownLine);
        }
        let staged = panel.pyramid().line(line);
        if staged.amount > 0 && staged.color != action.color {
            return Err(IllegalReason::LineColorMismatch);
        }
        if panel.pyramid().room(line) == 0 {
            return Err(IllegalReason::LineFull);
        }
        if panel.wall().has_color(line, action.color) {
            return Err(IllegalReason::AlreadyOnWall);
        }
        Ok(())
    }

    /// Every legal action for the current player: factories then center,
    /// colours ascending, pattern lines then the floor.
    pub fn all_legal(state: &State) -> Vec<Action> {
        let lines = state.rules.tile_types;
        let picks = (0..state.factories.len() as u8)
            .map(Pick::Factory)
            .chain(std::iter::once(Pick::Center));
        let mut actions = Vec::new();
        for pick in picks {
            let Some(source) = state.source(pick) else {
                continue;
            };
            for color in source.colors() {
                let places = (0..lines).map(Place::Line).chain(std::iter::once(Place::Floor));
                for place in places {
                    let action = Action::new(pick, color, place);
                    if Self::legal(action, state) {
                        actions.push(action);
                    }
                }
            }
        }
        actions
    }

    /// Applies a legal action and passes the turn. Nothing is mutated when
    /// the action is illegal.
    pub fn apply(action: Action, state: &mut State) -> Result<(), GameError> {
        Self::check(action, state).map_err(|reason| GameError::IllegalAction { action, reason })?;
        let seat = state.current_player;
        let (taken, spill) = match action.pick {
            Pick::Factory(i) => state.factories[i as usize].draft(action.color),
            Pick::Center => (state.center.take(action.color), Tiles::ZERO),
        };
        state.center += spill;
        if action.is_center() && state.token_in_center {
            Self::use_first_token(state);
        }
        let panel = &mut state.panels[seat];
        let floored = match action.place {
            Place::Line(line) => panel.stage(line as usize, action.color, taken),
            Place::Floor => {
                panel.add_to_floor(taken);
                taken
            }
        };
        state.discard[action.color] += floored;
        state.current_player = (seat + 1) % state.player_count();
        Ok(())
    }

    /// Hands the center's first-player token to the current player.
    pub fn use_first_token(state: &mut State) {
        state.token_in_center = false;
        let seat = state.current_player;
        state.panels[seat].take_first_token();
    }

    /// Round-end tiling and floor penalties for every panel; freed tiles go
    /// to the discard.
    pub fn score_panels(state: &mut State) -> Vec<RoundScore> {
        let mut results = Vec::with_capacity(state.panels.len());
        for panel in &mut state.panels {
            let result = panel.score_round();
            state.discard += result.freed;
            results.push(result);
        }
        results
    }
}

fn notify(
    observers: &mut [Box<dyn Observer>],
    players: &mut [Box<dyn Player>],
    mut event: impl FnMut(&mut dyn Observer),
) {
    for observer in observers.iter_mut() {
        event(observer.as_mut());
    }
    for player in players.iter_mut() {
        if let Some(observer) = player.observer() {
            event(observer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(rules: Rules, seed: u64) -> Game {
        let mut game = Game::with_seed(rules, seed).unwrap();
        game.start_round().unwrap();
        game
    }

    #[test]
    fn factories_are_filled_from_the_bag() {
        let game = started(Rules::DEFAULT, 1);
        let state = game.state();
        assert!(state.factories().iter().all(|f| f.total() == 4));
        assert_eq!(state.bag().total(), 100 - 36);
        assert!(state.token_in_center());
        assert!(state.conservation_holds());
    }

    #[test]
    fn same_seed_same_draw() {
        let a = started(Rules::DEFAULT, 99);
        let b = started(Rules::DEFAULT, 99);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn illegal_apply_leaves_state_untouched() {
        let game = started(Rules::MINI, 3);
        let mut state = game.state().clone();
        let before = state.clone();
        let action = Action::new(Pick::Center, Tile::new(0), Place::Floor);
        let err = Game::apply(action, &mut state).unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalAction {
                action,
                reason: IllegalReason::SourceEmpty
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn factory_draft_spills_into_center() {
        let game = started(Rules::DEFAULT, 5);
        let mut state = game.state().clone();
        let factory = *state.factories()[0].tiles();
        let color = factory.colors().next().unwrap();
        let action = Action::new(Pick::Factory(0), color, Place::Floor);
        Game::apply(action, &mut state).unwrap();
        let mut expected = factory;
        expected.take(color);
        assert_eq!(*state.center(), expected);
        assert!(state.factories()[0].is_empty());
        assert_eq!(state.current_player(), 1);
        assert_eq!(state.panel(0).floor(), factory[color]);
        assert!(state.conservation_holds());
    }

    #[test]
    fn first_center_draft_takes_the_token() {
        let (game, factory) = (0..50)
            .map(|seed| started(Rules::MINI, seed))
            .find_map(|g| {
                let mixed = g.state().factories().iter().position(|f| f.colors().count() >= 2);
                mixed.map(|i| (g, i))
            })
            .expect("some deal has a mixed factory");
        let mut state = game.state().clone();
        let color = state.factories()[factory].colors().next().unwrap();
        Game::apply(
            Action::new(Pick::Factory(factory as u8), color, Place::Floor),
            &mut state,
        )
        .unwrap();
        assert!(state.token_in_center());
        let action = Game::all_legal(&state)
            .into_iter()
            .find(|a| a.is_center())
            .expect("the spill left tiles in the center");
        Game::apply(action, &mut state).unwrap();
        assert!(!state.token_in_center());
        assert!(state.panel(1).has_first_token());
        assert!(state.panel(1).floor() >= 1);
    }

    #[test]
    fn token_holder_opens_the_next_round() {
        let mut checked = 0;
        for seed in 0..20 {
            let mut game = started(Rules::DEFAULT, seed);
            while game.phase() == Phase::RoundInProgress {
                let action = Game::all_legal(game.state())[0];
                game.play(action).unwrap();
            }
            let Some(holder) = game.state().panels().iter().position(|p| p.has_first_token())
            else {
                continue;
            };
            game.end_round().unwrap();
            assert_eq!(game.state().first_player(), holder, "seed {}", seed);
            if game.phase() == Phase::RoundInProgress {
                assert_eq!(game.state().current_player(), holder, "seed {}", seed);
            }
            checked += 1;
        }
        assert!(checked > 0);
    }

    struct FloorOnly;

    impl Player for FloorOnly {
        fn play(&mut self, state: &State) -> Action {
            Game::all_legal(state)
                .into_iter()
                .find(|a| a.is_floor())
                .unwrap()
        }
        fn player_type(&self) -> String {
            "floor".into()
        }
        fn copy(&self) -> Box<dyn Player> {
            Box::new(FloorOnly)
        }
    }

    #[test]
    fn endless_game_hits_round_limit() {
        let players: Vec<Box<dyn Player>> = vec![Box::new(FloorOnly), Box::new(FloorOnly)];
        let mut game = Game::with_players(Rules::MINI, 4, players).unwrap();
        assert_eq!(
            game.roll_game(),
            Err(GameError::RoundLimit { rounds: MAX_ROUNDS })
        );
        assert_eq!(game.state().round(), MAX_ROUNDS);
        assert!(game.state().conservation_holds());
    }

    #[test]
    fn empty_deal_goes_straight_to_round_end() {
        let mut game = Game::with_seed(Rules::MINI, 6).unwrap();
        game.state.bag = Tiles::ZERO;
        game.state.discard = Tiles::ZERO;
        game.start_round().unwrap();
        assert_eq!(game.phase(), Phase::RoundEnding);
        assert!(game.state().is_round_finished());
        assert_eq!(game.state().round(), 1);

        game.end_round().unwrap();
        assert_eq!(game.phase(), Phase::RoundEnding);
        assert_eq!(game.state().round(), 2);
    }

    #[test]
    fn outcome_names_the_opening_seat() {
        let players: Vec<Box<dyn Player>> = vec![Box::new(FloorOnly), Box::new(FloorOnly)];
        let mut game = Game::with_players(Rules::MINI, 4, players).unwrap();
        game.state.first_player = 1;
        game.start().unwrap();
        assert_eq!(game.state().current_player(), 1);
        assert_eq!(game.outcome().first_player, 1);
        game.reset();
        assert_eq!(game.outcome().first_player, 0);
    }

    #[test]
    fn all_legal_order_is_stable() {
        let game = started(Rules::DEFAULT, 21);
        let actions = Game::all_legal(game.state());
        let mut sorted = actions.clone();
        sorted.sort();
        assert_eq!(actions, sorted);
        assert!(actions.iter().all(|&a| Game::legal(a, game.state())));
    }

    #[test]
    fn full_round_closes_and_opens_next() {
        let mut game = started(Rules::MINI, 8);
        while game.phase() == Phase::RoundInProgress {
            let action = *Game::all_legal(game.state()).last().unwrap();
            game.play(action).unwrap();
            assert!(game.state().conservation_holds());
        }
        assert_eq!(game.phase(), Phase::RoundEnding);
        game.end_round().unwrap();
        assert!(game.state().conservation_holds());
        assert!(matches!(
            game.phase(),
            Phase::RoundInProgress | Phase::RoundEnding
        ));
        assert_eq!(game.state().round(), 2);
    }

    #[test]
    fn start_requires_players() {
        let mut game = Game::new(Rules::MINI).unwrap();
        assert_eq!(
            game.start(),
            Err(GameError::NotEnoughPlayers {
                expected: 2,
                actual: 0
            })
        );
        assert_eq!(game.players_missing(), 2);
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let err = Game::new(Rules::DEFAULT.with_tile_types(9)).err();
        assert!(matches!(err, Some(GameError::InvalidRules(_))));
    }

    #[test]
    fn end_round_out_of_phase_is_an_error() {
        let mut game = started(Rules::MINI, 2);
        assert_eq!(
            game.end_round(),
            Err(GameError::WrongPhase {
                expected: Phase::RoundEnding,
                actual: Phase::RoundInProgress
            })
        );
    }
}
