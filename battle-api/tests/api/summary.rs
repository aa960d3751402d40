use crate::helpers::TestApp;
use battle_api::domain::LeaderboardSummary;
use chrono::NaiveDate;

fn ymd(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[tokio::test]
async fn summary_reports_the_leaderboard_cards() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.get_summary().await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let summary: LeaderboardSummary = response.json().await.expect("Failed to parse as JSON");

    let current = summary.current_leader.expect("No current leader");
    assert_eq!(current.participant, "Exact");
    assert_eq!(current.score, 0.);
    assert_eq!(current.date, ymd(27));

    let streak = summary.longest_streak.expect("No streak");
    assert_eq!(streak.holder, "Exact");
    assert_eq!(streak.weeks, 2);
    assert_eq!((streak.first_week, streak.last_week), (ymd(20), ymd(27)));

    let minimum = summary.global_minimum.expect("No global minimum");
    assert_eq!((minimum.holder.as_str(), minimum.value), ("Exact", 0.));
    assert_eq!(minimum.date, ymd(6));

    assert_eq!(summary.best_average.expect("No best average").holder, "Exact");
}

#[tokio::test]
async fn summary_credits_ties_and_keeps_unscored_participants() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let summary: LeaderboardSummary = app.get_summary().await.json().await.unwrap();

    // Assert
    let names: Vec<_> = summary.participants.iter().map(|p| p.participant.as_str()).collect();
    assert_eq!(names, vec!["Exact", "Swapped", "Ghost"]);

    let firsts: Vec<_> = summary.participants.iter().map(|p| p.weeks_at_first).collect();
    assert_eq!(firsts, vec![3, 2, 0]);

    let ghost = &summary.participants[2];
    assert_eq!(ghost.weeks_scored, 0);
    assert!(ghost.mean.is_none());
    assert!(ghost.best_rank.is_none());

    // Week three was interpolated to a tie between the first two
    let tied_week = &summary.weeks[2];
    assert_eq!(tied_week.leader.as_deref(), Some("Exact"));
    let ranks: Vec<_> = tied_week.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![Some(1), Some(1), None]);
}
