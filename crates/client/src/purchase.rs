//! The purchase dialog state machine.
//!
//! One [`PurchaseFlow`] lives for the whole page. Opening the dialog
//! mints a fresh idempotency key; submitting validates locally, makes at
//! most one request per session, and on success yields the hosted
//! payment URL exactly once.

use std::sync::Mutex;

use frota_core::{Email, IdempotencyKey};

use crate::error::FlowError;
use crate::http::PaymentApi;

#[derive(Debug)]
struct DialogSession {
    key: IdempotencyKey,
    processing: bool,
}

#[derive(Debug, Default)]
struct FlowState {
    session: Option<DialogSession>,
    redirected: bool,
}

pub struct PurchaseFlow<A> {
    api: A,
    state: Mutex<FlowState>,
}

impl<A: PaymentApi> PurchaseFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(FlowState::default()),
        }
    }

    /// Open (or reopen) the purchase dialog. Every open is a new session
    /// with its own idempotency key, so retries within one session replay
    /// while a fresh dialog mints a fresh intent.
    pub fn open_dialog(&self) -> IdempotencyKey {
        let key = IdempotencyKey::new();
        let mut state = self.lock();
        state.session = Some(DialogSession {
            key,
            processing: false,
        });
        key
    }

    /// Close the dialog, discarding the session and any in-flight guard.
    pub fn close_dialog(&self) {
        self.lock().session = None;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.lock().session.is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.lock()
            .session
            .as_ref()
            .is_some_and(|s| s.processing)
    }

    /// Control has already left for the payment page.
    pub fn is_redirected(&self) -> bool {
        self.lock().redirected
    }

    /// Submit the dialog. On success returns the hosted payment URL the
    /// caller must navigate to; the session is consumed, so a second
    /// navigation cannot happen.
    ///
    /// Local validation failures and the in-flight guard return before
    /// any request is made.
    pub async fn submit(&self, email: &str) -> Result<String, FlowError> {
        let email = Email::parse(email).map_err(|e| FlowError::Validation(e.to_string()))?;

        let key = {
            let mut state = self.lock();
            let Some(session) = state.session.as_mut() else {
                return Err(FlowError::Validation(
                    "the purchase dialog is not open".to_string(),
                ));
            };
            if session.processing {
                return Err(FlowError::AlreadyProcessing);
            }
            session.processing = true;
            session.key
        };

        // No lock across the await: the guard above is what serializes
        // submissions for this session.
        let result = self.api.create_payment(email.as_str(), &key).await;

        let mut state = self.lock();
        match result {
            Ok(response) => match response.payment_url {
                Some(url) => {
                    tracing::info!(order_id = ?response.order_id, "redirecting to payment page");
                    state.session = None;
                    state.redirected = true;
                    Ok(url)
                }
                None => {
                    self.clear_processing(&mut state);
                    Err(FlowError::Payment(
                        "payment response carried no payment URL".to_string(),
                    ))
                }
            },
            Err(e) => {
                self.clear_processing(&mut state);
                Err(e)
            }
        }
    }

    fn clear_processing(&self, state: &mut FlowState) {
        if let Some(session) = state.session.as_mut() {
            session.processing = false;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlowState> {
        // Lock poisoning cannot matter here: the state is a pair of
        // plain fields with no invariant spanning the critical section.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::http::PaymentResponse;

    /// Fake backend: counts calls and serves a scripted answer.
    struct FakeApi {
        calls: AtomicUsize,
        keys: Mutex<Vec<IdempotencyKey>>,
        response: Box<dyn Fn() -> Result<PaymentResponse, FlowError> + Send + Sync>,
        hold: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn returning(
            response: impl Fn() -> Result<PaymentResponse, FlowError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                keys: Mutex::new(Vec::new()),
                response: Box::new(response),
                hold: None,
            }
        }

        fn ok(url: &str) -> Self {
            let url = url.to_string();
            Self::returning(move || {
                Ok(PaymentResponse {
                    payment_url: Some(url.clone()),
                    order_id: Some("frot_1700000000_7".to_string()),
                })
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentApi for FakeApi {
        async fn create_payment(
            &self,
            _email: &str,
            key: &IdempotencyKey,
        ) -> Result<PaymentResponse, FlowError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys.lock().unwrap().push(*key);
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            (self.response)()
        }
    }

    #[tokio::test]
    async fn empty_email_is_rejected_before_any_request() {
        let flow = PurchaseFlow::new(FakeApi::ok("https://pay.example"));
        flow.open_dialog();

        let err = flow.submit("   ").await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(flow.api.calls(), 0);
        assert!(!flow.is_processing());
    }

    #[tokio::test]
    async fn submit_without_an_open_dialog_is_rejected() {
        let flow = PurchaseFlow::new(FakeApi::ok("https://pay.example"));

        let err = flow.submit("player@example.com").await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(flow.api.calls(), 0);
    }

    #[tokio::test]
    async fn successful_submit_yields_the_payment_url_once() {
        let flow = PurchaseFlow::new(FakeApi::ok("https://pay.example/p?o=1"));
        flow.open_dialog();

        let url = flow.submit("player@example.com").await.unwrap();
        assert_eq!(url, "https://pay.example/p?o=1");
        assert!(flow.is_redirected());
        assert!(!flow.is_dialog_open());

        // The session was consumed; a second submit cannot navigate again.
        let err = flow.submit("player@example.com").await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert_eq!(flow.api.calls(), 1);
    }

    #[tokio::test]
    async fn failed_submit_reopens_the_session_for_retry() {
        let flow = PurchaseFlow::new(FakeApi::returning(|| Err(FlowError::Timeout)));
        flow.open_dialog();

        assert_eq!(flow.submit("player@example.com").await.unwrap_err(), FlowError::Timeout);
        assert!(flow.is_dialog_open());
        assert!(!flow.is_processing());

        // Retrying in the same session reuses the same idempotency key.
        let _ = flow.submit("player@example.com").await;
        let keys = flow.api.keys.lock().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], keys[1]);
    }

    #[tokio::test]
    async fn reopening_the_dialog_mints_a_fresh_key() {
        let flow = PurchaseFlow::new(FakeApi::ok("https://pay.example"));
        let first = flow.open_dialog();
        let second = flow.open_dialog();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn a_submission_in_flight_blocks_a_second_one() {
        let hold = Arc::new(Notify::new());
        let mut api = FakeApi::ok("https://pay.example");
        api.hold = Some(hold.clone());

        let flow = Arc::new(PurchaseFlow::new(api));
        flow.open_dialog();

        let racing = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.submit("player@example.com").await })
        };
        // Let the first submission reach the (held) transport call.
        tokio::task::yield_now().await;
        while !flow.is_processing() {
            tokio::task::yield_now().await;
        }

        let err = flow.submit("player@example.com").await.unwrap_err();
        assert_eq!(err, FlowError::AlreadyProcessing);

        hold.notify_one();
        let url = racing.await.unwrap().unwrap();
        assert_eq!(url, "https://pay.example");
        assert_eq!(flow.api.calls(), 1);
    }

    #[tokio::test]
    async fn missing_payment_url_is_a_payment_error() {
        let flow = PurchaseFlow::new(FakeApi::returning(|| {
            Ok(PaymentResponse {
                payment_url: None,
                order_id: None,
            })
        }));
        flow.open_dialog();

        let err = flow.submit("player@example.com").await.unwrap_err();
        assert!(matches!(err, FlowError::Payment(_)));
        assert!(flow.is_dialog_open());
    }
}
