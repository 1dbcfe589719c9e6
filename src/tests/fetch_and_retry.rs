// This test simulates:
//  - token endpoint (metadata-style GET) -> scripted token values
//  - storage endpoint (GET) -> scripted statuses, recording Authorization
// Then it runs fetch_file and asserts the exact request/refresh counts:
// one forced refresh and one repeat GET on the first 401, nothing more.

#[cfg(test)]
mod test {

    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use http::StatusCode;
    use serde_json::json;
    use tokio::task::JoinHandle;

    use crate::config::loader::Credentials;
    use crate::error::{ExchangeError, FetchError};
    use crate::fetcher::gcs::GcsFetcher;
    use crate::tests::common::{fetch_config, spawn_axum, test_key, test_key_with_private_key};

    async fn token_server(
        values: Vec<&'static str>,
    ) -> (JoinHandle<()>, SocketAddr, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/instance/service-accounts/default/token",
            get(move || {
                let counter = counter.clone();
                let values = values.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    let value = values[n.min(values.len() - 1)];
                    Json(json!({
                        "access_token": value,
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }))
                }
            }),
        );
        let (handle, addr) = spawn_axum(router).await;
        (handle, addr, calls)
    }

    #[allow(clippy::type_complexity)]
    async fn storage_server(
        statuses: Vec<u16>,
        body: &'static str,
    ) -> (
        JoinHandle<()>,
        SocketAddr,
        Arc<AtomicUsize>,
        Arc<Mutex<Vec<String>>>,
    ) {
        let hits = Arc::new(AtomicUsize::new(0));
        let auths: Arc<Mutex<Vec<String>>> = Arc::default();
        let hit_counter = hits.clone();
        let seen_auths = auths.clone();
        let router = Router::new().route(
            "/storage/v1/b/my-bucket/o/data.bin",
            get(move |headers: HeaderMap| {
                let hit_counter = hit_counter.clone();
                let seen_auths = seen_auths.clone();
                let statuses = statuses.clone();
                async move {
                    let n = hit_counter.fetch_add(1, Ordering::SeqCst);
                    seen_auths.lock().unwrap().push(
                        headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_owned(),
                    );
                    let status = statuses[n.min(statuses.len() - 1)];
                    (StatusCode::from_u16(status).unwrap(), body.to_owned())
                }
            }),
        );
        let (handle, addr) = spawn_axum(router).await;
        (handle, addr, hits, auths)
    }

    fn fetcher_for(token_addr: SocketAddr, storage_addr: SocketAddr) -> GcsFetcher {
        let credentials = Credentials::WorkloadIdentity {
            account: "default".to_string(),
            base_url: format!("http://{}/instance/service-accounts/", token_addr),
        };
        let api_base = format!("http://{}/storage/v1", storage_addr);
        GcsFetcher::with_api_base(&fetch_config("my-bucket"), credentials, &api_base)
            .expect("fetcher")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fetch_reuses_cached_token_across_calls() {
        let (token_h, token_addr, token_calls) = token_server(vec!["token-1"]).await;
        let (storage_h, storage_addr, hits, auths) = storage_server(vec![200], "hello world").await;

        let fetcher = fetcher_for(token_addr, storage_addr);
        assert_eq!(fetcher.fetch_file("data.bin").await.unwrap(), b"hello world");
        assert_eq!(fetcher.fetch_file("data.bin").await.unwrap(), b"hello world");

        // one exchange fills the cache; each fetch issues exactly one GET
        assert_eq!(token_calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(
            *auths.lock().unwrap(),
            ["Bearer token-1", "Bearer token-1"]
        );

        token_h.abort();
        storage_h.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unauthorized_then_success_retries_once_with_fresh_token() {
        let (token_h, token_addr, token_calls) = token_server(vec!["token-1", "token-2"]).await;
        let (storage_h, storage_addr, hits, auths) =
            storage_server(vec![401, 200], "after refresh").await;

        let fetcher = fetcher_for(token_addr, storage_addr);
        let bytes = fetcher.fetch_file("data.bin").await.expect("fetch");
        assert_eq!(bytes, b"after refresh");

        assert_eq!(token_calls.load(Ordering::SeqCst), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(
            *auths.lock().unwrap(),
            ["Bearer token-1", "Bearer token-2"]
        );

        // the cache now holds the refreshed token
        let cached = fetcher.cached_token().await.expect("token cached");
        assert_eq!(cached.value, "token-2");

        token_h.abort();
        storage_h.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn second_unauthorized_is_terminal() {
        let (token_h, token_addr, token_calls) = token_server(vec!["token-1", "token-2"]).await;
        let (storage_h, storage_addr, hits, _auths) =
            storage_server(vec![401], "unauthorized").await;

        let fetcher = fetcher_for(token_addr, storage_addr);
        let err = fetcher.fetch_file("data.bin").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Unauthorized { ref object } if object == "data.bin"
        ));

        // no third attempt is made
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(token_calls.load(Ordering::SeqCst), 2);

        token_h.abort();
        storage_h.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn other_statuses_are_not_retried() {
        let (token_h, token_addr, token_calls) = token_server(vec!["token-1"]).await;
        let (storage_h, storage_addr, hits, _auths) = storage_server(vec![500], "boom").await;

        let fetcher = fetcher_for(token_addr, storage_addr);
        let err = fetcher.fetch_file("data.bin").await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(token_calls.load(Ordering::SeqCst), 1);

        token_h.abort();
        storage_h.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn empty_cache_triggers_one_exchange_post_before_the_get() {
        let token_calls = Arc::new(AtomicUsize::new(0));
        let counter = token_calls.clone();
        let token_router = Router::new().route(
            "/token",
            post(move |Form(_): Form<HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "access_token": "sa-token",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }))
                }
            }),
        );
        let (token_h, token_addr) = spawn_axum(token_router).await;
        let (storage_h, storage_addr, hits, auths) = storage_server(vec![200], "object body").await;

        let key = test_key(&format!("http://{}/token", token_addr));
        let fetcher = GcsFetcher::with_api_base(
            &fetch_config("my-bucket"),
            Credentials::ServiceAccount(key),
            &format!("http://{}/storage/v1", storage_addr),
        )
        .expect("fetcher");

        assert_eq!(fetcher.fetch_file("data.bin").await.unwrap(), b"object body");
        assert_eq!(token_calls.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(*auths.lock().unwrap(), ["Bearer sa-token"]);

        token_h.abort();
        storage_h.abort();
    }

    #[tokio::test]
    async fn signing_failure_surfaces_and_cache_stays_empty() {
        let key = test_key_with_private_key("http://127.0.0.1:1/token", "not a pem key");
        let fetcher = GcsFetcher::with_api_base(
            &fetch_config("my-bucket"),
            Credentials::ServiceAccount(key),
            "http://127.0.0.1:1/storage/v1",
        )
        .expect("fetcher");

        let err = fetcher.fetch_file("data.bin").await.unwrap_err();
        assert!(matches!(err, FetchError::Auth(ExchangeError::Signing(_))));
        assert!(fetcher.cached_token().await.is_none());
    }

    #[tokio::test]
    async fn object_url_follows_storage_download_shape() {
        let fetcher = GcsFetcher::new(
            &fetch_config("my-bucket"),
            Credentials::WorkloadIdentity {
                account: "default".to_string(),
                base_url: "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/".to_string(),
            },
        )
        .expect("fetcher");

        // object names arrive URL-encoded and are used verbatim
        assert_eq!(
            fetcher.object_url("reports%2F2024.csv"),
            "https://storage.googleapis.com/storage/v1/b/my-bucket/o/reports%2F2024.csv?alt=media"
        );
    }
}
