use std::sync::Arc;

use transport::testing::{RecordingNavigator, RecordingNotifier, Scripted, ScriptedBackend};
use transport::{ApiClient, SessionHandle};

pub struct Harness {
    pub client: Arc<ApiClient>,
    pub backend: Arc<ScriptedBackend>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionHandle,
}

impl Harness {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self::with_backend(ScriptedBackend::new(replies))
    }

    pub fn with_backend(backend: ScriptedBackend) -> Self {
        let backend = Arc::new(backend);
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let session = SessionHandle::in_memory();
        let client = Arc::new(ApiClient::new(
            backend.clone(),
            session.clone(),
            notifier.clone(),
            navigator.clone(),
        ));
        Self {
            client,
            backend,
            notifier,
            navigator,
            session,
        }
    }
}
