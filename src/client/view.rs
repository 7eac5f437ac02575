use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

use super::form::ValidationError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentPick {
    pub name: String,
    pub price: Number,
}

/// A configuration as returned in the `data` field of a success response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcConfig {
    /// Slot name and pick, in the order the service sent them.
    #[serde(deserialize_with = "ordered_components")]
    pub components: Vec<(String, ComponentPick)>,
    pub total_price: Number,
    pub recommendations: Vec<String>,
}

fn ordered_components<'de, D>(deserializer: D) -> Result<Vec<(String, ComponentPick)>, D::Error>
where
    D: Deserializer<'de>,
{
    Map::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(slot, pick)| {
            serde_json::from_value(pick)
                .map(|pick| (slot, pick))
                .map_err(D::Error::custom)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayMode {
    Welcome,
    Loading,
    Results(PcConfig),
}

/// Everything the build page shows, in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: DisplayMode,
    /// Blocking message for the user, if any.
    pub notice: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Welcome,
            notice: None,
        }
    }
}

impl ViewState {
    /// Request sent: hide old results and show the loading indicator.
    pub fn begin(&mut self) {
        self.mode = DisplayMode::Loading;
        self.notice = None;
    }

    pub fn succeed(&mut self, config: PcConfig) {
        self.mode = DisplayMode::Results(config);
        self.notice = None;
    }

    /// Back to the welcome panel; nothing partial stays on screen.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.mode = DisplayMode::Welcome;
        self.notice = Some(message.into());
    }

    /// Form rejected before any request; the display mode is untouched.
    pub fn reject(&mut self, error: &ValidationError) {
        self.notice = Some(error.to_string());
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.mode, DisplayMode::Loading)
    }
}

/// What ends up on screen for a given [`ViewState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub welcome_visible: bool,
    pub loading_visible: bool,
    pub results_visible: bool,
    pub components: Vec<String>,
    pub total_price: Option<String>,
    pub recommendations: Vec<String>,
    pub alert: Option<String>,
}

/// Whole amounts print without a fraction: `150.0` shows as `150`.
fn price(amount: &Number) -> String {
    match amount.as_f64() {
        Some(value) if amount.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{value:.0}")
        }
        _ => amount.to_string(),
    }
}

pub fn render(state: &ViewState) -> View {
    let mut view = View {
        alert: state.notice.clone(),
        ..View::default()
    };

    match &state.mode {
        DisplayMode::Welcome => view.welcome_visible = true,
        DisplayMode::Loading => view.loading_visible = true,
        DisplayMode::Results(config) => {
            view.results_visible = true;
            view.components = config
                .components
                .iter()
                .map(|(slot, pick)| {
                    format!(
                        "{}: {} - ${}",
                        slot.to_uppercase(),
                        pick.name,
                        price(&pick.price)
                    )
                })
                .collect();
            view.total_price = Some(format!("${}", price(&config.total_price)));
            view.recommendations = config.recommendations.clone();
        }
    }
    view
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alert) = &self.alert {
            writeln!(f, "! {alert}")?;
        }
        if self.loading_visible {
            writeln!(f, "Generating configuration...")?;
        }
        if self.results_visible {
            writeln!(f, "Components:")?;
            for line in &self.components {
                writeln!(f, "  {line}")?;
            }
            if let Some(total) = &self.total_price {
                writeln!(f, "Total: {total}")?;
            }
            writeln!(f, "Recommendations:")?;
            for rec in &self.recommendations {
                writeln!(f, "  - {rec}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PcConfig {
        serde_json::from_value(json!({
            "components": {
                "gpu": {"name": "RTX 4060", "price": 299},
                "cpu": {"name": "Ryzen 5 7600", "price": 189.99},
                "case": {"name": "NR200", "price": 90}
            },
            "totalPrice": 578.99,
            "recommendations": ["Add more RAM", "Pick a B650 board", "Reuse your SSD"]
        }))
        .unwrap()
    }

    #[test]
    fn renders_one_line_per_component_in_order() {
        let mut state = ViewState::default();
        state.succeed(sample());
        let view = render(&state);

        assert!(view.results_visible);
        assert!(!view.loading_visible && !view.welcome_visible);
        assert_eq!(
            view.components,
            [
                "GPU: RTX 4060 - $299",
                "CPU: Ryzen 5 7600 - $189.99",
                "CASE: NR200 - $90",
            ]
        );
        assert_eq!(view.total_price.as_deref(), Some("$578.99"));
        assert_eq!(
            view.recommendations,
            ["Add more RAM", "Pick a B650 board", "Reuse your SSD"]
        );
    }

    #[test]
    fn begin_hides_previous_results() {
        let mut state = ViewState::default();
        state.succeed(sample());
        state.begin();
        let view = render(&state);

        assert!(view.loading_visible);
        assert!(!view.results_visible);
        assert!(view.components.is_empty());
        assert!(view.total_price.is_none());
    }

    #[test]
    fn failure_returns_to_welcome_with_alert() {
        let mut state = ViewState::default();
        state.begin();
        state.fail("Failed to generate configuration: boom");
        let view = render(&state);

        assert!(view.welcome_visible);
        assert!(!view.loading_visible);
        assert!(!view.results_visible);
        assert_eq!(
            view.alert.as_deref(),
            Some("Failed to generate configuration: boom")
        );
    }

    #[test]
    fn rejection_keeps_the_current_mode() {
        let mut state = ViewState::default();
        state.reject(&ValidationError);
        assert_eq!(state.mode, DisplayMode::Welcome);
        assert!(!state.is_loading());
        assert!(render(&state).alert.is_some());
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let result = serde_json::from_value::<PcConfig>(json!({
            "components": {"cpu": {"name": "X", "price": "cheap"}},
            "totalPrice": 1,
            "recommendations": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn whole_float_prices_print_without_a_fraction() {
        let mut state = ViewState::default();
        state.succeed(
            serde_json::from_value(json!({
                "components": {"cpu": {"name": "X", "price": 150.0}},
                "totalPrice": 150.00,
                "recommendations": []
            }))
            .unwrap(),
        );
        let view = render(&state);
        assert_eq!(view.components, ["CPU: X - $150"]);
        assert_eq!(view.total_price.as_deref(), Some("$150"));
    }

    #[test]
    fn fractional_and_negative_prices_keep_their_digits() {
        assert_eq!(price(&Number::from_f64(149.5).unwrap()), "149.5");
        assert_eq!(price(&Number::from(-20)), "-20");
        assert_eq!(price(&Number::from_f64(-0.25).unwrap()), "-0.25");
    }
}
