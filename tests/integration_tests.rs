//! Integration tests for the TrueSkill rating engine
//!
//! These tests run complete matches through the public calculator API:
//! - Two player and two team matches, decisive and drawn
//! - Uneven team sizes and lopsided priors
//! - Input validation and caller data integrity

mod fixtures;

use fixtures::{assert_quality, assert_rating, calculator, team, team_of};
use trueskill_engine::error::RatingError;
use trueskill_engine::{GameInfo, Rating, RatingCalculator, Team};

fn default_rating() -> Rating {
    GameInfo::default().default_rating()
}

#[test]
fn test_two_player_win() {
    let calculator = calculator(GameInfo::default());
    // Ranks are given per team; the second team listed finished first
    let teams = vec![
        team_of(&["player2"], default_rating()),
        team_of(&["player1"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[2, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 29.39583201999924, 7.171475587326186);
    assert_rating(&result.ratings, "player2", 20.60416798000076, 7.171475587326186);
    assert_quality(result.match_quality, 0.447);
    assert!(result.diagnostics.converged);
}

#[test]
fn test_two_player_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&["player2"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 25.0, 6.4575196623173081);
    assert_rating(&result.ratings, "player2", 25.0, 6.4575196623173081);
    assert_quality(result.match_quality, 0.447);
}

#[test]
fn test_two_player_chess_not_drawn() {
    let game = GameInfo {
        initial_mean: 1200.0,
        initial_stddev: 400.0,
        beta: 200.0,
        dynamics_factor: 4.0,
        draw_probability: 0.03,
    };
    let calculator = calculator(game);
    let teams = vec![
        team(&[("player1", 1301.0007, 42.9232)]),
        team(&[("player2", 1188.7560, 42.5570)]),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 1304.7820836053318, 42.843513887848105);
    assert_rating(&result.ratings, "player2", 1185.0383099003536, 42.485604606268779);
}

#[test]
fn test_one_on_one_massive_upset_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team(&[("player2", 50.0, 12.5)]),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 31.662, 7.137);
    assert_rating(&result.ratings, "player2", 35.010, 7.910);
    assert_quality(result.match_quality, 0.110);
}

#[test]
fn test_two_on_two_simple() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player3", "player4"], default_rating()),
        team_of(&["player1", "player2"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[2, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 28.108, 7.774);
    assert_rating(&result.ratings, "player2", 28.108, 7.774);
    assert_rating(&result.ratings, "player3", 21.892, 7.774);
    assert_rating(&result.ratings, "player4", 21.892, 7.774);
    assert_quality(result.match_quality, 0.447);
}

#[test]
fn test_two_on_two_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1", "player2"], default_rating()),
        team_of(&["player3", "player4"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    for id in ["player1", "player2", "player3", "player4"] {
        assert_rating(&result.ratings, id, 25.0, 7.455);
    }
    assert_quality(result.match_quality, 0.447);
}

#[test]
fn test_two_on_two_unbalanced_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team(&[("player1", 15.0, 8.0), ("player2", 20.0, 6.0)]),
        team(&[("player3", 25.0, 4.0), ("player4", 30.0, 3.0)]),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 21.570, 6.556);
    assert_rating(&result.ratings, "player2", 23.696, 5.418);
    assert_rating(&result.ratings, "player3", 23.357, 3.833);
    assert_rating(&result.ratings, "player4", 29.075, 2.931);
    assert_quality(result.match_quality, 0.214);
}

#[test]
fn test_two_on_two_upset() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team(&[("player1", 20.0, 8.0), ("player2", 25.0, 6.0)]),
        team(&[("player3", 35.0, 7.0), ("player4", 40.0, 5.0)]),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 29.698, 7.008);
    assert_rating(&result.ratings, "player2", 30.455, 5.594);
    assert_rating(&result.ratings, "player3", 27.575, 6.346);
    assert_rating(&result.ratings, "player4", 36.211, 4.768);
    assert_quality(result.match_quality, 0.084);
}

#[test]
fn test_four_on_four_simple() {
    let calculator = calculator(GameInfo::default());
    let winners = ["player1", "player2", "player3", "player4"];
    let losers = ["player5", "player6", "player7", "player8"];
    let teams = vec![
        team_of(&winners, default_rating()),
        team_of(&losers, default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    for id in winners {
        assert_rating(&result.ratings, id, 27.198, 8.059);
    }
    for id in losers {
        assert_rating(&result.ratings, id, 22.802, 8.059);
    }
    assert_quality(result.match_quality, 0.447);
}

#[test]
fn test_one_on_two_simple() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&["player2", "player3"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 33.730, 7.317);
    assert_rating(&result.ratings, "player2", 16.270, 7.317);
    assert_rating(&result.ratings, "player3", 16.270, 7.317);
    assert_quality(result.match_quality, 0.135);
}

#[test]
fn test_one_on_two_somewhat_balanced() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team(&[("player1", 40.0, 6.0)]),
        team(&[("player2", 20.0, 7.0), ("player3", 25.0, 8.0)]),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 42.744, 5.602);
    assert_rating(&result.ratings, "player2", 16.266, 6.359);
    assert_rating(&result.ratings, "player3", 20.123, 7.028);
    assert_quality(result.match_quality, 0.478);
}

#[test]
fn test_one_on_three_simple() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&["player2", "player3", "player4"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 36.337, 7.527);
    for id in ["player2", "player3", "player4"] {
        assert_rating(&result.ratings, id, 13.663, 7.527);
    }
    assert_quality(result.match_quality, 0.012);
}

#[test]
fn test_one_on_two_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&["player2", "player3"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 31.660, 7.138);
    assert_rating(&result.ratings, "player2", 18.340, 7.138);
    assert_rating(&result.ratings, "player3", 18.340, 7.138);
    assert_quality(result.match_quality, 0.135);
}

#[test]
fn test_one_on_three_draw() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&["player2", "player3", "player4"], default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 1]).unwrap();

    assert_rating(&result.ratings, "player1", 34.990, 7.455);
    for id in ["player2", "player3", "player4"] {
        assert_rating(&result.ratings, id, 15.010, 7.455);
    }
    assert_quality(result.match_quality, 0.012);
}

#[test]
fn test_one_on_seven_simple() {
    let calculator = calculator(GameInfo::default());
    let others = [
        "player2", "player3", "player4", "player5", "player6", "player7", "player8",
    ];
    let teams = vec![
        team_of(&["player1"], default_rating()),
        team_of(&others, default_rating()),
    ];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_rating(&result.ratings, "player1", 40.582, 7.917);
    for id in others {
        assert_rating(&result.ratings, id, 9.418, 7.917);
    }
    assert_quality(result.match_quality, 0.000);
}

fn three_on_two_teams() -> Vec<Team> {
    vec![
        team(&[
            ("player1", 28.0, 7.0),
            ("player2", 27.0, 6.0),
            ("player3", 26.0, 5.0),
        ]),
        team(&[("player4", 30.0, 4.0), ("player5", 31.0, 3.0)]),
    ]
}

#[test]
fn test_three_on_two() {
    let calculator = calculator(GameInfo::default());

    let result = calculator
        .calculate_new_ratings(&three_on_two_teams(), &[1, 2])
        .unwrap();

    assert_rating(&result.ratings, "player1", 28.658, 6.770);
    assert_rating(&result.ratings, "player2", 27.484, 5.856);
    assert_rating(&result.ratings, "player3", 26.336, 4.917);
    assert_rating(&result.ratings, "player4", 29.785, 3.958);
    assert_rating(&result.ratings, "player5", 30.879, 2.983);
    assert_quality(result.match_quality, 0.254);
}

#[test]
fn test_three_on_two_reversed() {
    let calculator = calculator(GameInfo::default());

    let result = calculator
        .calculate_new_ratings(&three_on_two_teams(), &[2, 1])
        .unwrap();

    assert_rating(&result.ratings, "player1", 21.840, 6.314);
    assert_rating(&result.ratings, "player2", 22.474, 5.575);
    assert_rating(&result.ratings, "player3", 22.857, 4.757);
    assert_rating(&result.ratings, "player4", 32.012, 3.877);
    assert_rating(&result.ratings, "player5", 32.132, 2.949);
    assert_quality(result.match_quality, 0.254);
}

#[test]
fn test_match_quality_matches_rating_result() {
    let calculator = calculator(GameInfo::default());
    let teams = three_on_two_teams();

    let quality = calculator.calculate_match_quality(&teams).unwrap();
    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    assert_eq!(quality, result.match_quality);
}

#[test]
fn test_winner_gains_and_everyone_gets_more_certain() {
    let calculator = calculator(GameInfo::default());
    let prior = default_rating();
    let teams = vec![team_of(&["a"], prior), team_of(&["b"], prior)];

    let result = calculator.calculate_new_ratings(&teams, &[1, 2]).unwrap();

    let winner = result.ratings["a"];
    let loser = result.ratings["b"];
    assert!(winner.mean > loser.mean);
    assert!(winner.stddev <= prior.stddev);
    assert!(loser.stddev <= prior.stddev);
}

#[test]
fn test_lopsided_collapsed_priors_give_finite_posteriors() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![team(&[("weak", 0.0, 0.5)]), team(&[("strong", 1000.0, 0.5)])];

    // Upset win for the weak player, then a draw
    for ranks in [[1, 2], [1, 1]] {
        let result = calculator.calculate_new_ratings(&teams, &ranks).unwrap();

        assert_eq!(result.ratings.len(), 2);
        for rating in result.ratings.values() {
            assert!(rating.mean.is_finite());
            assert!(rating.stddev.is_finite());
            assert!(rating.stddev > 0.0);
        }
        assert!(result.ratings["weak"].mean < result.ratings["strong"].mean);
        assert!(result.match_quality.is_finite());
        assert!(result.diagnostics.converged);
    }
}

#[test]
fn test_caller_data_is_not_reordered() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![
        team_of(&["c"], default_rating()),
        team_of(&["a"], default_rating()),
        team_of(&["b"], default_rating()),
    ];
    let ranks = vec![3, 1, 2];
    let teams_before = teams.clone();
    let ranks_before = ranks.clone();

    let result = calculator.calculate_new_ratings(&teams, &ranks).unwrap();

    assert_eq!(teams, teams_before);
    assert_eq!(ranks, ranks_before);
    let ids: Vec<&str> = result.ratings.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_invalid_requests_fail_without_mutation() {
    let calculator = calculator(GameInfo::default());
    let teams = vec![team_of(&["solo"], default_rating())];
    let teams_before = teams.clone();

    let err = calculator.calculate_new_ratings(&teams, &[1]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::InvalidArgument { .. })
    ));
    assert_eq!(teams, teams_before);

    let err = calculator
        .calculate_new_ratings(&[team_of(&["a"], default_rating()), Team::new()], &[1, 2])
        .unwrap_err();
    assert!(err.to_string().contains("outside of range"));
}
