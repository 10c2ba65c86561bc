use tessera_ai::{create_player, PlayerSpecError, PLAYER_IDS};
use tessera_engine::arena::{Arena, ArenaMode};
use tessera_engine::game::{Game, Phase};
use tessera_engine::player::Player;
use tessera_engine::rules::Rules;

fn play_out(ids: &[&str], rules: Rules, seed: u64) {
    let players: Vec<Box<dyn Player>> = ids
        .iter()
        .map(|id| create_player(id).expect("known id"))
        .collect();
    let mut game = Game::with_players(rules, seed, players).unwrap();
    game.start().unwrap();
    while game.phase() != Phase::GameOver {
        while game.phase() == Phase::RoundInProgress {
            let action = game.next_player().expect("strategy plays legally");
            assert!(game.state().conservation_holds(), "{}", action);
        }
        game.end_round().unwrap();
    }
}

#[test]
fn every_strategy_finishes_a_game() {
    play_out(&["fl", "rn"], Rules::MINI, 1);
    play_out(&["r", "fl"], Rules::MINI, 2);
    play_out(&["mc:2", "r"], Rules::MINI, 3);
    play_out(&["mm:1", "rn"], Rules::MINI, 4);
}

#[test]
fn ids_parse() {
    for id in PLAYER_IDS {
        assert!(create_player(id).is_ok(), "{}", id);
    }
    assert_eq!(create_player("fl").unwrap().player_type(), "fl");
    assert_eq!(create_player("rn").unwrap().player_type(), "rn");
    assert_eq!(create_player("mm:3").unwrap().player_type(), "mm:3");
    assert_eq!(create_player("mc").unwrap().player_type(), "mc:16");
    assert_eq!(create_player("mm").unwrap().player_type(), "mm:2");
    assert_eq!(
        create_player("mc:zero").err(),
        Some(PlayerSpecError::Parameter {
            id: "mc".into(),
            value: "zero".into()
        })
    );
    assert!(matches!(create_player("mc:0"), Err(PlayerSpecError::Parameter { .. })));
    assert!(matches!(create_player("fl:2"), Err(PlayerSpecError::Unknown(_))));
}

#[test]
fn copies_are_independent_and_reproducible() {
    let original = create_player("r").unwrap();
    let mut a = original.copy();
    let mut b = original.copy();
    a.reseed(5);
    b.reseed(5);
    let mut game = Game::with_seed(Rules::DEFAULT, 8).unwrap();
    game.start_round().unwrap();
    for _ in 0..5 {
        assert_eq!(a.play(game.state()), b.play(game.state()));
    }
}

#[test]
fn built_in_strategies_run_in_the_arena() {
    let roster = vec![create_player("r").unwrap(), create_player("rn").unwrap()];
    let report = Arena::new(Rules::DEFAULT, roster)
        .mode(ArenaMode::Pairs)
        .count(40)
        .thread_limit(4)
        .seed(1)
        .run()
        .unwrap();
    assert_eq!(report.total_aborts(), 0);
    assert_eq!(report.total_games(), 40);
    assert_eq!(report.totals[0].player, "r");
    assert_eq!(report.totals[1].player, "rn");
}
