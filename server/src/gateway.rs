//! Payment gateway client and signature verification.
//!
//! The gateway opens remote payment intents ("orders") that customers pay
//! out of band; settlement later proves the payment by recomputing an
//! HMAC-SHA256 signature over `"{order_id}|{payment_id}"` with the shared
//! secret and comparing it against the gateway-issued signature in constant
//! time.

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// A payment intent opened at the gateway.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    /// Gateway-minted order id (opaque join key)
    pub id: String,
    /// Amount in paise
    pub amount: u64,
    /// ISO currency code
    pub currency: String,
}

/// Abstraction over the remote payment processor.
///
/// Only intent creation crosses the network; verification is local HMAC
/// arithmetic and lives in [`SignatureVerifier`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a payment intent for `amount_paise` in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when the gateway call fails or times out.
    async fn create_order(
        &self,
        amount_paise: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder>;
}

// ============================================================================
// Signature verification
// ============================================================================

/// Recomputes and verifies gateway payment signatures.
///
/// Deterministic given its inputs and the configured secret: the same
/// (order, payment, signature) triple always produces the same verdict.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    /// Creates a verifier for the gateway shared secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies a client-supplied hex signature against the recomputed
    /// HMAC-SHA256 of `"{order_id}|{payment_id}"`.
    ///
    /// The comparison is constant-time (`Mac::verify_slice`). Malformed hex
    /// fails verification rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] on any mismatch.
    pub fn verify(&self, order_id: &str, payment_id: &str, supplied: &str) -> Result<()> {
        let Ok(supplied_bytes) = hex::decode(supplied) else {
            return Err(Error::InvalidSignature);
        };
        let mut mac = Self::mac(&self.secret);
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        mac.verify_slice(&supplied_bytes)
            .map_err(|_| Error::InvalidSignature)
    }

    /// Produces the hex signature for a payload; used by tests and the mock
    /// gateway to mint valid signatures.
    #[must_use]
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let mut mac = Self::mac(&self.secret);
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    // HMAC accepts keys of any length; new_from_slice is infallible for
    // HMAC constructions.
    #[allow(clippy::expect_used)]
    fn mac(secret: &str) -> HmacSha256 {
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length")
    }
}

// ============================================================================
// HTTP gateway client
// ============================================================================

/// Razorpay-style HTTP gateway client.
///
/// Calls are bounded by the configured timeout; a timeout surfaces as
/// [`Error::Upstream`] and leaves the local record uncommitted so the intent
/// can be retried.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Debug, Deserialize)]
struct RemoteOrder {
    id: String,
    amount: u64,
    currency: String,
}

impl HttpPaymentGateway {
    /// Builds a client from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::Upstream(format!("failed to build gateway client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(
        &self,
        amount_paise: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        let body = serde_json::json!({
            "amount": amount_paise,
            "currency": currency,
            "receipt": receipt,
            "payment_capture": 1,
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Upstream("payment gateway timed out".to_string())
                } else {
                    Error::Upstream(format!("payment gateway request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "payment gateway returned {status}: {detail}"
            )));
        }

        let remote: RemoteOrder = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("malformed gateway response: {e}")))?;

        tracing::info!(
            gateway_order_id = %remote.id,
            amount = remote.amount,
            currency = %remote.currency,
            "Gateway order created"
        );

        Ok(GatewayOrder {
            id: remote.id,
            amount: remote.amount,
            currency: remote.currency,
        })
    }
}

// ============================================================================
// Mock gateway
// ============================================================================

/// In-process gateway for tests and local development.
///
/// Mints sequential order ids and never fails; pair with
/// [`SignatureVerifier::sign`] to produce matching signatures in tests.
#[derive(Default)]
pub struct MockPaymentGateway {
    counter: AtomicU64,
}

impl MockPaymentGateway {
    /// Creates a new mock gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared() -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(
        &self,
        amount_paise: u64,
        currency: &str,
        _receipt: &str,
    ) -> Result<GatewayOrder> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(GatewayOrder {
            id: format!("order_mock{n:08}"),
            amount: amount_paise,
            currency: currency.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let verifier = SignatureVerifier::new("test_secret");
        let sig = verifier.sign("order_123", "pay_456");
        assert!(verifier.verify("order_123", "pay_456", &sig).is_ok());
    }

    #[test]
    fn verification_is_deterministic() {
        let verifier = SignatureVerifier::new("test_secret");
        let first = verifier.sign("order_123", "pay_456");
        let second = verifier.sign("order_123", "pay_456");
        assert_eq!(first, second);
    }

    #[test]
    fn single_character_change_rejects() {
        let verifier = SignatureVerifier::new("test_secret");
        let sig = verifier.sign("order_123", "pay_456");
        let mut tampered = sig.clone();
        // Flip the last hex digit.
        let last = tampered.pop().unwrap();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(matches!(
            verifier.verify("order_123", "pay_456", &tampered),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_payload_rejects() {
        let verifier = SignatureVerifier::new("test_secret");
        let sig = verifier.sign("order_123", "pay_456");
        assert!(verifier.verify("order_123", "pay_999", &sig).is_err());
        assert!(verifier.verify("order_999", "pay_456", &sig).is_err());
    }

    #[test]
    fn non_hex_signature_rejects() {
        let verifier = SignatureVerifier::new("test_secret");
        assert!(matches!(
            verifier.verify("order_123", "pay_456", "not-hex!"),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn different_secret_rejects() {
        let signer = SignatureVerifier::new("secret_a");
        let verifier = SignatureVerifier::new("secret_b");
        let sig = signer.sign("order_123", "pay_456");
        assert!(verifier.verify("order_123", "pay_456", &sig).is_err());
    }

    #[tokio::test]
    async fn mock_gateway_mints_unique_ids() {
        let gateway = MockPaymentGateway::new();
        let a = gateway.create_order(349_900, "INR", "bk_1").await.unwrap();
        let b = gateway.create_order(349_900, "INR", "bk_2").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.amount, 349_900);
        assert_eq!(a.currency, "INR");
    }
}
