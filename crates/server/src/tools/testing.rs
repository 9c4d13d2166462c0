//! Fakes shared by tool tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use banksuggest_client::{Error, RawResponse, SuggestClient, SuggestConfig, SuggestRequest, Transport};

pub const SBERBANK: &str = r#"{"suggestions":[{"value":"ПАО Сбербанк","unrestricted_value":"ПАО Сбербанк","data":{"bic":"044525225","inn":"7707083893","correspondent_account":"30101810400000000225","state":{"status":"ACTIVE"}}}]}"#;

/// Transport that always answers with the same status and body.
pub struct CannedTransport {
    pub status: u16,
    pub body: &'static str,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn send(&self, _request: &SuggestRequest) -> Result<RawResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawResponse::new(self.status, self.body))
    }
}

pub fn canned_client(status: u16, body: &'static str) -> (SuggestClient, Arc<CannedTransport>) {
    let transport = Arc::new(CannedTransport { status, body, calls: AtomicUsize::new(0) });
    let client = SuggestClient::with_transport(&SuggestConfig::default(), transport.clone());
    (client, transport)
}
