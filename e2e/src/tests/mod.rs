//! Test registry - all test cases are registered here

pub mod helpers;

use crate::runner::TestCase;

/// Build and return all test cases
///
/// Each test:
/// 1. Queues a mock inference service response (what /predict or /chat would return)
/// 2. Sends a request to the REAL relay
/// 3. Validates the response and what the service received
pub fn all_tests() -> Vec<TestCase> {
    macro_rules! test {
        ($name:expr, $desc:expr, $func:path) => {
            TestCase {
                name: $name,
                description: $desc,
                run: Box::new(|ctx| Box::pin($func(ctx))),
            }
        };
    }

    vec![
        // ── Relay ─────────────────────────────────────────────────────────────
        test!(
            "relay/analyze",
            "/api/symptoms/analyze forwards to /predict and relays the prediction",
            relay::test_analyze_relays_prediction
        ),
        test!(
            "relay/chat",
            "/api/symptoms/chat forwards to /chat and relays the reply",
            relay::test_chat_relays_reply
        ),
        test!(
            "relay/body_not_modified",
            "Inbound JSON reaches the inference service byte for byte",
            relay::test_body_not_modified
        ),
        test!(
            "relay/success_status_normalized",
            "Downstream 202 is answered with 200",
            relay::test_success_status_normalized
        ),
        test!(
            "relay/concurrent",
            "100 interleaved requests get independent answers",
            relay::test_concurrent_requests_independent
        ),

        // ── Failure ───────────────────────────────────────────────────────────
        test!(
            "failure/predict_error_status",
            "Downstream 503 on /predict becomes the generic AI service 500",
            failure::test_predict_error_status
        ),
        test!(
            "failure/chat_error_status",
            "Downstream 400 on /chat becomes the generic Chatbot service 500",
            failure::test_chat_error_status
        ),
        test!(
            "failure/isolated",
            "A failed request does not affect the next one and is not retried",
            failure::test_failure_is_isolated
        ),
    ]
}
