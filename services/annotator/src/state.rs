use std::sync::Arc;
use tokio::sync::Mutex;

use annotation::Session;

pub type SharedState = Arc<AppState>;

/// One annotator, one session. The mutex serializes every interaction,
/// including the remote fetch.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
