use std::time::Duration;

use number_duel::games::rand_num::{AgentTurn, ControllerEvent, LogEntry};
use number_duel::{GameConfig, GameError, Outcome, Party, Phase, SessionController, Status};

fn outcomes(log: &[LogEntry]) -> Vec<(Party, i64, Outcome)> {
    log.iter().map(|e| (e.party, e.guessed_value, e.outcome)).collect()
}

#[tokio::test]
async fn human_wins_on_first_guess() {
    let mut c = SessionController::new(GameConfig::default());
    c.start_with_target(50).unwrap();

    assert_eq!(c.submit_guess("50").unwrap(), Outcome::Win);
    assert_eq!(c.status(), Some(Status::WonByHuman));
    assert_eq!(c.attempts_used(), 1);
    assert_eq!(c.phase(), Phase::Terminal);
    assert_eq!(c.session().and_then(|s| s.revealed_target()), Some(50));
}

#[tokio::test(start_paused = true)]
async fn agent_narrows_on_its_own_feedback_and_wins() {
    let mut c = SessionController::new(GameConfig::default());
    c.start_with_target(75).unwrap();

    assert_eq!(c.submit_guess("50").unwrap(), Outcome::TooLow);
    let turn = c.wait_for_agent().await.unwrap();
    // same midpoint the player already tried: the agent ignores the player's guesses
    assert_eq!(turn, Some(AgentTurn { guess: 50, outcome: Outcome::TooLow }));
    assert_eq!(c.agent().bounds(), (1, 100));

    assert_eq!(c.submit_guess("60").unwrap(), Outcome::TooLow);
    let turn = c.wait_for_agent().await.unwrap();
    assert_eq!(turn, Some(AgentTurn { guess: 75, outcome: Outcome::Win }));
    assert_eq!(c.agent().bounds(), (51, 100));

    assert_eq!(c.status(), Some(Status::WonByAgent));
    assert_eq!(c.phase(), Phase::Terminal);
    assert_eq!(c.attempts_used(), 4);
    assert_eq!(
        outcomes(c.log()),
        vec![
            (Party::Human, 50, Outcome::TooLow),
            (Party::Agent, 50, Outcome::TooLow),
            (Party::Human, 60, Outcome::TooLow),
            (Party::Agent, 75, Outcome::Win),
        ]
    );

    // terminal is final
    let err = c.submit_guess("75").unwrap_err();
    assert!(matches!(err, GameError::InvalidState(_)));
    assert_eq!(c.log().len(), 4);
    assert_eq!(c.wait_for_agent().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_budget_never_reaches_agent() {
    let config = GameConfig::new(1, 100, 1).unwrap();
    let mut c = SessionController::new(config);
    c.start_with_target(40).unwrap();

    assert_eq!(c.submit_guess("10").unwrap(), Outcome::Loss);
    assert_eq!(c.status(), Some(Status::LostByAttrition));
    assert_eq!(c.attempts_used(), c.max_attempts());
    assert_eq!(c.phase(), Phase::Terminal);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(c.try_next_event(), None);
    assert!(c.agent().history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shared_budget_runs_out_on_either_side() {
    let config = GameConfig::new(1, 100, 3).unwrap();
    let mut c = SessionController::new(config);
    c.start_with_target(99).unwrap();

    c.submit_guess("1").unwrap();
    c.wait_for_agent().await.unwrap();
    assert_eq!(c.submit_guess("2").unwrap(), Outcome::Loss);
    assert_eq!(c.status(), Some(Status::LostByAttrition));
    assert_eq!(c.log().last().map(|e| e.outcome), Some(Outcome::Loss));
}

#[tokio::test(start_paused = true)]
async fn invalid_guesses_consume_nothing() {
    let mut c = SessionController::new(GameConfig::default());
    c.start_with_target(30).unwrap();

    for raw in ["", "twelve", "0", "101", "1e3"] {
        let err = c.submit_guess(raw).unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(c.attempts_used(), 0);
        assert_eq!(c.active_party(), Some(Party::Human));
        assert_eq!(c.phase(), Phase::AwaitingHumanGuess);
    }
}

#[tokio::test(start_paused = true)]
async fn attempts_grow_by_one_per_accepted_guess() {
    let mut c = SessionController::new(GameConfig::default());
    c.start_with_target(100).unwrap();

    let mut last = c.attempts_used();
    let mut guess = 1;
    while c.phase() != Phase::Terminal {
        c.submit_guess(&guess.to_string()).unwrap();
        assert_eq!(c.attempts_used(), last + 1);
        last = c.attempts_used();
        guess += 1;

        if c.wait_for_agent().await.unwrap().is_some() {
            assert_eq!(c.attempts_used(), last + 1);
            last = c.attempts_used();
        }
    }
    assert!(last <= c.max_attempts());
    assert!(c.status().is_some_and(|s| s.is_terminal()));
}

#[tokio::test(start_paused = true)]
async fn stale_timer_does_not_touch_new_game() {
    let mut c = SessionController::new(GameConfig::default());
    let old = c.start_with_target(75).unwrap();
    c.submit_guess("50").unwrap();
    assert_eq!(c.phase(), Phase::AgentThinking);

    // new game before the 2s delay is over
    tokio::time::sleep(Duration::from_secs(1)).await;
    let new = c.start_with_target(75).unwrap();
    assert_ne!(old, new);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(c.try_next_event(), None);

    // even a timer event that slipped through is dropped
    let turn = c.handle_event(ControllerEvent::AgentTimerFired { session: old, turn: 1 }).unwrap();
    assert_eq!(turn, None);
    assert!(c.log().is_empty());
    assert_eq!(c.attempts_used(), 0);
    assert_eq!(c.phase(), Phase::AwaitingHumanGuess);
    assert!(c.agent().history().is_empty());
}

#[tokio::test]
async fn target_stays_hidden_while_running() {
    let config = GameConfig::new(5, 9, 4).unwrap();
    let mut c = SessionController::new(config);
    for _ in 0..50 {
        c.start_new_game();
        c.submit_guess("5").unwrap();
        if c.status() == Some(Status::WonByHuman) {
            continue;
        }
        // the target is hidden while the game runs
        assert!(c.session().unwrap().revealed_target().is_none());
    }
}
