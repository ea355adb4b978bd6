use actix_web::{get, web, Responder};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/status")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let snapshot = state.status.get_status().await?;
    Ok(web::Json(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::Config,
        provider::{fake::serve, HTTP},
    };
    use actix_web::{http::StatusCode, test, App};
    use std::time::Duration;

    fn unreachable_state() -> AppState<State> {
        let mut config = Config::for_tests();
        config.price_url = String::from("http://127.0.0.1:1/markets");
        config.info_url = String::from("http://127.0.0.1:1/info");
        config.mempool_url = String::from("http://127.0.0.1:1/mempool");

        let http = HTTP::new(&config).unwrap();
        AppState::new(State::new(config, http))
    }

    #[actix_web::test]
    async fn upstream_failure_returns_fixed_error_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(unreachable_state()))
                .service(web::scope("/api").service(index)),
        )
        .await;

        let request = test::TestRequest::get().uri("/api/status").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "upstream_failed" }));
    }

    #[actix_web::test]
    async fn mempool_outage_still_returns_snapshot() {
        let prices = serve(
            200,
            r#"[{"id":"zcash","current_price":45.1,"market_cap":740000000,"circulating_supply":20.0}]"#,
            Duration::ZERO,
        )
        .await;
        let info = serve(
            200,
            r#"{"blocks":2750000,"valuePools":[{"id":"sprout","chainValue":1},{"id":"sapling","chainValue":2},{"id":"orchard","chainValue":3},{"id":"lockbox","chainValue":4}]}"#,
            Duration::ZERO,
        )
        .await;

        let mut config = Config::for_tests();
        config.price_url = format!("{}/markets", prices);
        config.info_url = format!("{}/info", info);
        config.mempool_url = String::from("http://127.0.0.1:1/mempool");
        let http = HTTP::new(&config).unwrap();
        let state = AppState::new(State::new(config, http));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(index)),
        )
        .await;

        let request = test::TestRequest::get().uri("/api/status").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["mempoolSize"], serde_json::json!(0));
        assert_eq!(body["priceUsd"], serde_json::json!(45.1));
        assert_eq!(body["marketCapUsd"], serde_json::json!(740000000.0));
        assert_eq!(body["height"], serde_json::json!(2750000));
        assert_eq!(body["valuePools"]["transparent"], serde_json::json!(10.0));
        assert_eq!(body["valuePools"]["totalChain"], serde_json::json!(20.0));
        assert!(body.get("mempool_size").is_none());
        assert!(body.get("price_usd").is_none());
        assert!(body["valuePools"].get("total_chain").is_none());
    }
}
