use crate::proxy::ProxyClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub client: ProxyClient,
}

impl AppState {
    pub fn new(client: ProxyClient) -> Self {
        Self { client }
    }
}
