use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use hyperwarp_utils::poll::FixedIntervalPoller;

use crate::call::RuntimeCall;
use crate::config::RollupConfig;
use crate::error::{ApiError, ErrorEnvelope, RollupError, RollupResult};
use crate::signer::RollupSigner;
use crate::tx::{Transaction, TxDetails, UnsignedTransaction};

const SUBMIT_TX_PATH: &str = "sequencer/txs";
const EVENTS_PATH: &str = "ledger/events";
const GENESIS_SLOT_PATH: &str = "ledger/slots/0";

/// Sequencer answer to a submitted transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub id: String,
    /// Sequencer status, such as `submitted`
    pub status: String,
    /// Remaining fields of the answer
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An event emitted by a rollup module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Global event number, increasing
    pub number: u64,
    /// `Module/EventName`
    pub key: String,
    /// Event payload
    #[serde(default)]
    pub value: serde_json::Value,
    /// Transaction that emitted the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Client for the rollup REST API
#[derive(Debug, Clone)]
pub struct RollupClient {
    http: reqwest::Client,
    config: RollupConfig,
}

impl RollupClient {
    /// Create a new instance of [RollupClient]
    pub fn new(config: RollupConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Endpoint and fee settings in use
    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Build, sign and submit a call
    #[tracing::instrument(skip_all, fields(call = call.name()))]
    pub async fn call(&self, call: RuntimeCall, signer: &RollupSigner) -> RollupResult<TxReceipt> {
        let tx = UnsignedTransaction::new(call, TxDetails::from(&self.config)).sign(signer)?;
        tracing::debug!("Submitting tx signed by {}", signer.address());

        self.submit(&tx).await
    }

    /// Submit an already signed transaction to the sequencer
    pub async fn submit(&self, tx: &Transaction) -> RollupResult<TxReceipt> {
        let receipt: TxReceipt = self.post(SUBMIT_TX_PATH, &tx.to_submit_body()?).await?;
        tracing::info!("Tx {} {}", receipt.id, receipt.status);

        Ok(receipt)
    }

    /// All events in the ledger
    pub async fn list_events(&self) -> RollupResult<Vec<LedgerEvent>> {
        self.get(EVENTS_PATH).await
    }

    /// Number of the most recent event, `None` when nothing was emitted yet
    pub async fn latest_event_number(&self) -> RollupResult<Option<u64>> {
        Ok(self.list_events().await?.iter().map(|e| e.number).max())
    }

    /// Poll the ledger until an event with `key` numbered after `after` shows up
    #[tracing::instrument(skip(self, poller))]
    pub async fn wait_for_event(
        &self,
        key: &str,
        after: Option<u64>,
        poller: &FixedIntervalPoller,
    ) -> RollupResult<LedgerEvent> {
        let event = poller
            .poll_until(|| async move {
                let events = self.list_events().await?;
                Ok::<_, anyhow::Error>(find_event(events, key, after))
            })
            .await?;

        tracing::info!("Observed {} #{}", event.key, event.number);
        Ok(event)
    }

    /// Poll until the rollup serves its genesis slot
    #[tracing::instrument(skip_all)]
    pub async fn wait_until_ready(&self, poller: &FixedIntervalPoller) -> RollupResult<()> {
        poller
            .poll_until(|| async move {
                match self.get::<serde_json::Value>(GENESIS_SLOT_PATH).await {
                    Ok(_) => Ok::<_, anyhow::Error>(Some(())),
                    Err(err) => {
                        tracing::debug!("Rollup not ready: {}", err);
                        Ok(None)
                    }
                }
            })
            .await?;

        tracing::info!("Rollup at {} is ready", self.config.url);
        Ok(())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> RollupResult<R> {
        let res = self.http.get(self.config.endpoint(path)?).send().await?;

        Self::parse_response(res).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> RollupResult<R> {
        let res = self
            .http
            .post(self.config.endpoint(path)?)
            .json(body)
            .send()
            .await?;

        Self::parse_response(res).await
    }

    async fn parse_response<R: DeserializeOwned>(res: reqwest::Response) -> RollupResult<R> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            let error = match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
                Ok(envelope) => envelope.error,
                Err(_) => ApiError {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&bytes).into_owned(),
                    details: serde_json::Value::Null,
                },
            };
            return Err(RollupError::Api(error));
        }

        let envelope: DataEnvelope<R> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

fn find_event(events: Vec<LedgerEvent>, key: &str, after: Option<u64>) -> Option<LedgerEvent> {
    events
        .into_iter()
        .filter(|event| after.map_or(true, |after| event.number > after))
        .find(|event| event.key == key)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::call::{RelayerConfig, RuntimeCall};
    use crate::signer::tests::DEV_SEED_HEX;
    use crate::tx::SubmitTxBody;

    const REGISTERED: &str = "SolanaRegistration/UserRegistered";

    async fn serve(app: Router) -> RollupClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        RollupClient::new(RollupConfig {
            url: format!("http://{}", addr).parse().unwrap(),
            ..Default::default()
        })
    }

    fn poller() -> FixedIntervalPoller {
        FixedIntervalPoller::new(Duration::from_millis(10), Duration::from_secs(2), 3)
    }

    fn igp_call() -> RuntimeCall {
        RelayerConfig {
            beneficiary: "7bWFTGcxY59KfAc5p7SaBaPieQkcSBXs7xCyRoL7vPtf".to_string(),
            default_gas: 2000,
            domain_default_gas: vec![],
            domain_oracle_data: vec![],
        }
        .into()
    }

    async fn accept_tx(Json(body): Json<SubmitTxBody>) -> (StatusCode, Json<Value>) {
        let decoded = base64::decode(&body.body).unwrap();
        let tx: Transaction = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(tx.unsigned.details.chain_id, 4321);

        (
            StatusCode::OK,
            Json(json!({ "data": { "id": "0x01", "status": "submitted", "events": [] } })),
        )
    }

    #[tokio::test]
    async fn test_call_submits_signed_tx() {
        let client = serve(Router::new().route("/sequencer/txs", post(accept_tx))).await;
        let signer = RollupSigner::from_hex(DEV_SEED_HEX).unwrap();

        let receipt = client.call(igp_call(), &signer).await.unwrap();
        assert_eq!(receipt.id, "0x01");
        assert_eq!(receipt.status, "submitted");
        assert!(receipt.extra.contains_key("events"));
    }

    #[tokio::test]
    async fn test_call_surfaces_api_error() {
        let app = Router::new().route(
            "/sequencer/txs",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": {
                            "status": 400,
                            "message": "Transaction execution unsuccessful",
                            "details": { "message": "Route was already registered by sender" }
                        }
                    })),
                )
            }),
        );
        let client = serve(app).await;
        let signer = RollupSigner::from_hex(DEV_SEED_HEX).unwrap();

        let err = client.call(igp_call(), &signer).await.unwrap_err();
        assert!(err.api_error().unwrap().is_already_registered());
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let app = Router::new().route(
            "/ledger/events",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = serve(app).await;

        let err = client.list_events().await.unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.status, 502);
        assert_eq!(api.message, "upstream down");
    }

    async fn events(State(calls): State<Arc<AtomicUsize>>) -> Json<Value> {
        let calls = calls.fetch_add(1, Ordering::SeqCst);
        let mut events = vec![json!({ "number": 3, "key": REGISTERED, "value": { "old": true } })];
        if calls >= 2 {
            events.push(json!({ "number": 4, "key": "Bank/TokenTransferred", "value": {} }));
            events.push(json!({ "number": 5, "key": REGISTERED, "value": { "user": "new" } }));
        }
        Json(json!({ "data": events }))
    }

    #[tokio::test]
    async fn test_wait_for_event_skips_stale_events() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/ledger/events", get(events))
            .with_state(calls.clone());
        let client = serve(app).await;

        assert_eq!(client.latest_event_number().await.unwrap(), Some(3));

        let event = client
            .wait_for_event(REGISTERED, Some(3), &poller())
            .await
            .unwrap();
        assert_eq!(event.number, 5);
        assert_eq!(event.value, json!({ "user": "new" }));
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_wait_for_event_times_out() {
        let app = Router::new().route(
            "/ledger/events",
            get(|| async { Json(json!({ "data": [] })) }),
        );
        let client = serve(app).await;

        let poller = FixedIntervalPoller::new(Duration::from_millis(10), Duration::from_millis(50), 3);
        let err = client
            .wait_for_event(REGISTERED, None, &poller)
            .await
            .unwrap_err();
        assert!(matches!(err, RollupError::Poll(_)));
    }

    #[tokio::test]
    async fn test_wait_until_ready() {
        let app = Router::new().route(
            "/ledger/slots/0",
            get(|| async { Json(json!({ "data": { "number": 0 } })) }),
        );
        let client = serve(app).await;

        client.wait_until_ready(&poller()).await.unwrap();
    }

    #[test]
    fn test_find_event_without_baseline() {
        let events = vec![
            LedgerEvent {
                number: 1,
                key: "Other".to_string(),
                value: Value::Null,
                tx_hash: None,
            },
            LedgerEvent {
                number: 2,
                key: REGISTERED.to_string(),
                value: Value::Null,
                tx_hash: None,
            },
        ];

        assert_eq!(find_event(events.clone(), REGISTERED, None).unwrap().number, 2);
        assert!(find_event(events, REGISTERED, Some(2)).is_none());
    }
}
