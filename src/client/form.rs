use strum::{Display, EnumString, VariantNames};
use thiserror::Error;

use crate::api::ConfigRequest;

/// Optional extras a user can tick on the build form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Feature {
    Rgb,
    Silent,
    Compact,
    Upgradeable,
}

impl Feature {
    /// Wording sent to the model.
    pub fn label(self) -> &'static str {
        match self {
            Self::Rgb => "RGB & Aesthetics",
            Self::Silent => "Silent PC",
            Self::Compact => "Compact Form Factor",
            Self::Upgradeable => "Easy Upgradeability",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Please select a budget and a primary usage.")]
pub struct ValidationError;

/// Raw values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub budget: String,
    pub usage: String,
    pub brand: String,
    pub features: Vec<Feature>,
}

impl ConfigForm {
    pub fn to_request(&self) -> Result<ConfigRequest, ValidationError> {
        if self.budget.trim().is_empty() || self.usage.trim().is_empty() {
            return Err(ValidationError);
        }

        Ok(ConfigRequest {
            budget: self.budget.clone(),
            usage: self.usage.clone(),
            brand: self.brand.clone(),
            features: self
                .features
                .iter()
                .map(|feature| feature.label().to_string())
                .collect(),
        })
    }
}
