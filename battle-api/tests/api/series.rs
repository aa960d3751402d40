use crate::helpers::TestApp;
use battle_api::domain::SeriesPoint;

#[tokio::test]
async fn series_returns_a_200_for_a_known_participant() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_series("participant=Exact".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let points: Vec<SeriesPoint> = response.json().await.expect("Failed to parse as JSON");
    assert_eq!(points.len(), 4);
    assert_eq!(points[0].value, Some(0.));
    assert!(points[2].raw.is_none());
    let filled = points[2].value.expect("Week three should be interpolated");
    assert!((filled - 2f64.sqrt() / 20.).abs() < 1e-12);
}

#[tokio::test]
async fn series_of_a_never_ranked_pick_is_undefined() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_series("participant=Ghost".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let points: Vec<SeriesPoint> = response.json().await.unwrap();
    assert_eq!(points.len(), 4);
    assert!(points.iter().all(|p| p.raw.is_none() && p.value.is_none()));
}

#[tokio::test]
async fn series_returns_a_400_for_bad_participants() {
    // Arrange
    let app = TestApp::spawn().await;
    let test_cases = vec![
        ("participant=Roger", "unknown participant"),
        ("participant=", "empty participant"),
        ("participant=%3Cscript%3E", "forbidden characters"),
        ("name=Exact", "missing participant"),
    ];

    for (body, description) in test_cases {
        // Act
        let response = app.post_series(body.into()).await;

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
async fn unknown_participants_are_told_who_is_playing() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_series("participant=Roger".into()).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Roger is not in this battle"));
    assert!(body.contains("Exact, Swapped, Ghost"));
}
