//! Bedroom environment scoring
//!
//! Compares a night's average temperature and humidity with ideal values and
//! picks a canned piece of advice for each.

use crate::config::IdealConditions;
use crate::types::{EnvironmentDelta, InterventionLevel};

/// One advice rule: applies when `lower <= delta < upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdviceRule {
    pub lower: f64,
    pub upper: f64,
    pub message: &'static str,
}

/// Ordered rules plus the advice given when none match
#[derive(Debug, Clone, Copy)]
pub struct AdviceTable {
    pub rules: &'static [AdviceRule],
    pub default: &'static str,
}

impl AdviceTable {
    /// First matching rule wins
    pub fn lookup(&self, delta: f64) -> &'static str {
        self.rules
            .iter()
            .find(|rule| rule.lower <= delta && delta < rule.upper)
            .map(|rule| rule.message)
            .unwrap_or(self.default)
    }
}

pub const TEMPERATURE_ADVICE: AdviceTable = AdviceTable {
    rules: &[
        AdviceRule {
            lower: 3.0,
            upper: 100.0,
            message: "Try opening the bedroom window a bit more to cool things down. A breeze might help!",
        },
        AdviceRule {
            lower: 1.0,
            upper: 3.0,
            message: "Opening the bedroom door can improve airflow and make it a bit more comfortable.",
        },
        AdviceRule {
            lower: -100.0,
            upper: -3.0,
            message: "It's chilly! Adding an extra blanket or wearing layers should keep you cozy.",
        },
        AdviceRule {
            lower: -3.0,
            upper: -1.0,
            message: "It feels a bit cool. Another layer might be just what you need.",
        },
    ],
    default: "Your room temperature is spot on! No changes needed.",
};

pub const HUMIDITY_ADVICE: AdviceTable = AdviceTable {
    rules: &[
        AdviceRule {
            lower: 10.0,
            upper: 100.0,
            message: "How about adding some plants to your room? They can help balance the humidity and make the space feel fresher.",
        },
        AdviceRule {
            lower: 5.0,
            upper: 10.0,
            message: "Cracking the bedroom window open could help reduce the humidity a touch.",
        },
        AdviceRule {
            lower: -100.0,
            upper: -10.0,
            message: "The air seems dry. Drinking a glass of water before bed might keep you hydrated overnight.",
        },
        AdviceRule {
            lower: -10.0,
            upper: -5.0,
            message: "Opening the bedroom door a bit can help reduce dryness and improve airflow.",
        },
    ],
    default: "Your room humidity is perfect! No adjustments needed.",
};

/// Temperature deviation (°C) thresholds: (significant, moderate)
const TEMPERATURE_THRESHOLDS: (f64, f64) = (3.0, 1.0);
/// Humidity deviation (%) thresholds: (significant, moderate)
const HUMIDITY_THRESHOLDS: (f64, f64) = (10.0, 5.0);

fn intervention_level(delta: f64, (significant, moderate): (f64, f64)) -> InterventionLevel {
    let magnitude = delta.abs();
    if magnitude > significant {
        InterventionLevel::Significant
    } else if magnitude > moderate {
        InterventionLevel::Moderate
    } else {
        InterventionLevel::None
    }
}

/// Score averaged bedroom conditions against `ideal`
pub fn environment_delta(
    avg_temperature: f64,
    avg_humidity: f64,
    ideal: &IdealConditions,
) -> EnvironmentDelta {
    let temperature_difference = avg_temperature - ideal.temperature;
    let humidity_difference = avg_humidity - ideal.humidity;

    EnvironmentDelta {
        temperature_difference,
        humidity_difference,
        temperature_level: intervention_level(temperature_difference, TEMPERATURE_THRESHOLDS),
        humidity_level: intervention_level(humidity_difference, HUMIDITY_THRESHOLDS),
        temperature_advice: TEMPERATURE_ADVICE.lookup(temperature_difference).to_string(),
        humidity_advice: HUMIDITY_ADVICE.lookup(humidity_difference).to_string(),
    }
}
