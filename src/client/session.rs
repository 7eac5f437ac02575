use tracing::error;

use super::form::ConfigForm;
use super::transport::ConfigTransport;
use super::view::{render, View, ViewState};

/// Drives the build form: validates, calls the service once, and records the
/// outcome in a [`ViewState`].
///
/// Nothing stops a second submit while one is in flight on another session;
/// each call runs to completion on its own.
pub struct ConfigSession<T> {
    transport: T,
    state: ViewState,
}

impl<T: ConfigTransport> ConfigSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    pub async fn submit(&mut self, form: &ConfigForm) -> &ViewState {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.state.reject(&err);
                return &self.state;
            }
        };

        self.state.begin();
        match self.transport.generate(&request).await {
            Ok(config) => self.state.succeed(config),
            Err(err) => {
                error!(error = %err, "config request failed");
                self.state.fail(err.user_message());
            }
        }
        &self.state
    }
}
