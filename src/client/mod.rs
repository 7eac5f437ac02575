//! Client side of the build form: collects the user's choices, talks to the
//! config service, and keeps the page state in one [`ViewState`].

mod form;
mod session;
mod transport;
mod view;

pub use form::{ConfigForm, Feature, ValidationError};
pub use session::ConfigSession;
pub use transport::{decode_response, ConfigTransport, HttpTransport, TransportError};
pub use view::{render, ComponentPick, DisplayMode, PcConfig, View, ViewState};
