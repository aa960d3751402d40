use crate::helpers::TestApp;
use battle_api::domain::WeekStanding;

#[tokio::test]
async fn week_returns_the_standings_of_that_week() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_week("date=2025-01-13".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let week: WeekStanding = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(week.date.to_string(), "2025-01-13");
    assert_eq!(week.leader.as_deref(), Some("Swapped"));
    let ranks: Vec<_> = week.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![Some(2), Some(1), None]);
}

#[tokio::test]
async fn week_returns_a_400_for_bad_dates() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("date=", "empty date"),
        ("date=yesterday", "non-date"),
        ("date=2025-02-03", "week outside the table"),
        ("day=2025-01-13", "missing date"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_week(body.into()).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn week_outside_the_table_names_the_date() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_week("date=2025-02-03".into()).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response.text().await.unwrap(),
        "No rankings were published for 2025-02-03"
    );
}
