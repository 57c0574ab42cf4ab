/// Shared test fixtures and utilities for test modules
#[allow(dead_code)]
pub mod fixtures {
    use hipchat_notifier::configuration::{
        API_URL, AUTH_TOKEN, FROM, MESSAGE_BG_COLOR, MESSAGE_TEXT, NotifierConfig, REQUEST_TIMEOUT,
        ROOM_ID,
    };
    use hipchat_notifier::expression::AttributeExpression;
    use hipchat_notifier::notifications::HttpNotificationSender;
    use hipchat_notifier::notifier::Notifier;
    use hipchat_notifier::session::FlowUnit;
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    pub const TEST_TOKEN: &str = "hc-test-token-4f2a9";

    /// Creates the minimal set of properties the notifier accepts
    pub fn minimal_valid_properties() -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert(ROOM_ID.to_string(), "${team} alerts".to_string());
        properties.insert(AUTH_TOKEN.to_string(), TEST_TOKEN.to_string());
        properties.insert(MESSAGE_TEXT.to_string(), "${filename} failed validation".to_string());
        properties.insert(MESSAGE_BG_COLOR.to_string(), "red".to_string());
        properties
    }

    /// Creates a complete set of properties including optional fields
    pub fn complete_valid_properties() -> BTreeMap<String, String> {
        let mut properties = minimal_valid_properties();
        properties.insert(FROM.to_string(), "${source}".to_string());
        properties.insert(
            API_URL.to_string(),
            "https://hipchat.internal/v2/room/{room_id}/notification?auth_token={auth_token}"
                .to_string(),
        );
        properties.insert(REQUEST_TIMEOUT.to_string(), "3".to_string());
        properties
    }

    /// URL template pointing at a local mock server
    pub fn url_template(base: &str) -> String {
        format!("{base}/v2/room/{{room_id}}/notification?auth_token={{auth_token}}")
    }

    /// Config that talks to `base` instead of api.hipchat.com
    pub fn config_for(base: &str) -> NotifierConfig {
        let mut properties = complete_valid_properties();
        properties.insert(API_URL.to_string(), url_template(base));
        NotifierConfig::from_properties(&properties).unwrap()
    }

    /// Notifier with the real HTTP sender pointed at `base`
    pub fn http_notifier(config: NotifierConfig) -> Notifier {
        let sender = HttpNotificationSender::new(config.request_timeout).unwrap();
        Notifier::new(config, Box::new(sender), Box::new(AttributeExpression))
    }

    /// A unit carrying every attribute the complete properties reference
    pub fn test_unit() -> FlowUnit {
        FlowUnit::new(BTreeMap::new(), "id,amount\n1,12.50\n")
            .with_attribute("team", "ops")
            .with_attribute("filename", "payments.csv")
            .with_attribute("source", "nightly-import")
    }

    /// In-memory log sink for asserting on formatted output
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
