use std::time::Duration;

use mockito::{Matcher, Server};
use unseen_moves::explorer::{
    ExplorerClient, ExplorerConfig, GameSource, fetch_candidate_games, fetch_game_record,
};
use unseen_moves::EpisodeError;

const TOP_GAMES: &str = r#"{
  "white": 2210, "draws": 3011, "black": 1502,
  "moves": [],
  "topGames": [
    {"uci": "e2e4", "id": "Ab12Cd34", "winner": "white",
     "white": {"name": "Tal, Mikhail", "rating": 2620},
     "black": {"name": "Smyslov, Vassily", "rating": 2600},
     "year": 1959, "month": "1959-09"},
    {"uci": "d2d4", "id": "Zz98Yy76", "winner": null,
     "white": {"name": "Petrosian, Tigran V", "rating": 2640},
     "black": {"name": "Keres, Paul", "rating": 2650},
     "year": 1959, "month": "1959-10"}
  ]
}"#;

const PGN: &str = r#"[Event "Candidates Tournament"]
[Site "Bled YUG"]
[Date "1959.09.07"]
[White "Tal, Mikhail"]
[Black "Smyslov, Vassily"]
[Result "1-0"]

1. e4 c6 2. d3 d5 3. Nd2 e5 4. Ngf3 Nd7 5. d4 dxe4 1-0
"#;

fn client(server: &Server) -> ExplorerClient {
    ExplorerClient::new(ExplorerConfig {
        base_url: format!("{}/", server.url()),
        timeout: Duration::from_secs(5),
        ..ExplorerConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn candidates_are_requested_for_a_three_year_window() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/masters")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("since".into(), "1958".into()),
            Matcher::UrlEncoded("until".into(), "1960".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOP_GAMES)
        .create_async()
        .await;

    let games = fetch_candidate_games(&client(&server), 1959).await.unwrap();

    mock.assert_async().await;
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].id, "Ab12Cd34");
    assert_eq!(games[1].white.name, "Petrosian, Tigran V");
    assert_eq!(games[1].winner, None);
}

#[tokio::test]
async fn empty_top_games_is_data_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/masters")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"white":0,"draws":0,"black":0,"moves":[],"topGames":[]}"#)
        .create_async()
        .await;

    let err = fetch_candidate_games(&client(&server), 1953).await.unwrap_err();
    assert!(matches!(err, EpisodeError::DataUnavailable(_)), "{err}");
}

#[tokio::test]
async fn server_errors_are_network_failures() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/masters")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server).candidate_games(1999, 2001).await.unwrap_err();
    assert!(matches!(err, EpisodeError::Network(_)), "{err}");
}

#[tokio::test]
async fn unreadable_json_is_a_fetch_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/masters")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(&server).candidate_games(1999, 2001).await.unwrap_err();
    assert!(matches!(err, EpisodeError::FetchFailure(_)), "{err}");
}

#[tokio::test]
async fn pgn_export_is_parsed_into_a_record() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/masters/pgn/Ab12Cd34")
        .with_status(200)
        .with_header("content-type", "application/x-chess-pgn")
        .with_body(PGN)
        .create_async()
        .await;

    let record = fetch_game_record(&client(&server), "Ab12Cd34").await.unwrap();

    mock.assert_async().await;
    assert_eq!(record.id(), "Ab12Cd34");
    assert_eq!(record.header("Site"), Some("Bled YUG"));
    assert_eq!(record.moves().len(), 10);
}

#[tokio::test]
async fn missing_game_is_a_network_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/masters/pgn/nope")
        .with_status(404)
        .create_async()
        .await;

    let err = fetch_game_record(&client(&server), "nope").await.unwrap_err();
    assert!(matches!(err, EpisodeError::Network(_)), "{err}");
}
