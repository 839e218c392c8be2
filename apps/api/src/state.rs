use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::RecruitingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single storage seam. `PgStore` in production.
    pub store: Arc<dyn RecruitingStore>,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
}

#[cfg(test)]
pub mod test_support {
    use std::sync::Arc;

    use aws_config::{BehaviorVersion, Region};

    use super::AppState;
    use crate::config::Config;
    use crate::llm_client::LlmClient;
    use crate::matching::scorer::MatchSettings;
    use crate::store::memory::MemoryStore;

    pub fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/zirak_test".to_string(),
            s3_bucket: "zirak-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            matching: MatchSettings::default(),
        }
    }

    /// State over an in-memory store. S3 and LLM clients are built offline and
    /// never reached by the handlers under test.
    pub fn test_state(store: Arc<MemoryStore>) -> AppState {
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        AppState {
            store,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            llm: LlmClient::new("test".to_string()).unwrap(),
            config: test_config(),
        }
    }
}
