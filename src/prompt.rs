use crate::api::ConfigRequest;

/// Component slots every generated configuration is asked to fill.
pub const SLOTS: [&str; 7] = [
    "cpu",
    "gpu",
    "ram",
    "storage",
    "motherboard",
    "psu",
    "case",
];

const NO_BRAND: &str = "No preference";
const NO_FEATURES: &str = "None";

const OUTPUT_SCHEMA: &str = r#"{
    "components": {
        "cpu": {"name": "processor name", "price": price},
        "gpu": {"name": "graphics card name", "price": price},
        "ram": {"name": "RAM specification", "price": price},
        "storage": {"name": "storage", "price": price},
        "motherboard": {"name": "motherboard", "price": price},
        "psu": {"name": "power supply", "price": price},
        "case": {"name": "case", "price": price}
    },
    "totalPrice": total_price,
    "recommendations": ["recommendation 1", "recommendation 2", "recommendation 3"]
}"#;

/// Builds the instruction sent to the model for one request.
///
/// User values are embedded verbatim. The reply is requested inside a
/// ```` ```json ```` fence so [`crate::extract::extract_config`] can find it
/// without guessing at brace spans.
pub fn build_prompt(request: &ConfigRequest) -> String {
    let brand = if request.brand.trim().is_empty() {
        NO_BRAND
    } else {
        request.brand.as_str()
    };
    let features = if request.features.is_empty() {
        NO_FEATURES.to_string()
    } else {
        request.features.join(", ")
    };

    format!(
        "Generate a PC configuration for:\n\
         - Budget: {budget}\n\
         - Primary usage: {usage}\n\
         - Brand preference: {brand}\n\
         - Special features: {features}\n\
         \n\
         Reply ONLY with valid JSON inside a ```json fenced block, in this format:\n\
         {OUTPUT_SCHEMA}\n\
         \n\
         Prices are numbers. Use real prices and components currently on the market.\n",
        budget = request.budget,
        usage = request.usage,
    )
}
