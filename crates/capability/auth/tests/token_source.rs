use adh_auth::{ClientCredentials, StaticToken, TokenSource, discovery_url};

#[tokio::test]
async fn static_token_returns_value() {
    let source = StaticToken::new("token-1");
    assert_eq!(source.token().await.expect("token"), "token-1");
}

#[tokio::test]
async fn token_sources_are_object_safe() {
    let source: Box<dyn TokenSource> = Box::new(StaticToken::new("token-2"));
    assert_eq!(source.token().await.expect("token"), "token-2");
}

#[test]
fn client_credentials_builds_without_network() {
    let _source = ClientCredentials::new(
        reqwest::Client::new(),
        "https://datahub.example.com/",
        "client-1",
        "secret",
    );
    assert!(discovery_url("https://datahub.example.com").ends_with("openid-configuration"));
}
