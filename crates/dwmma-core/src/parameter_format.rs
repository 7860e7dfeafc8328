//! Display formatting and parsing of parameter values.

/// How a plain parameter value is shown to, and typed in by, the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formatter {
    /// Generic float with configurable precision (e.g., "1.23").
    Float {
        /// Number of decimal places.
        precision: usize,
    },

    /// Distance in metres.
    ///
    /// Display: "2.50 m"
    Meters {
        /// Number of decimal places.
        precision: usize,
    },

    /// Boolean formatter.
    ///
    /// Display: "On", "Off"
    Boolean,
}

impl Formatter {
    /// Format a plain value to a display string.
    pub fn format(&self, value: f64) -> String {
        match self {
            Formatter::Float { precision } => format!("{:.prec$}", value, prec = *precision),
            Formatter::Meters { precision } => {
                format!("{:.prec$} m", value, prec = *precision)
            }
            Formatter::Boolean => {
                if value > 0.5 {
                    "On".to_string()
                } else {
                    "Off".to_string()
                }
            }
        }
    }

    /// Parse a display string to a plain value.
    ///
    /// Returns `None` if the string cannot be parsed. Units are optional.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let s = s.trim();

        match self {
            Formatter::Float { .. } => s.parse().ok(),
            Formatter::Meters { .. } => {
                let trimmed = s
                    .strip_suffix(" m")
                    .or_else(|| s.strip_suffix('m'))
                    .unwrap_or(s)
                    .trim();
                trimmed.parse().ok()
            }
            Formatter::Boolean => match s.to_lowercase().as_str() {
                "on" | "true" | "yes" | "1" | "enabled" => Some(1.0),
                "off" | "false" | "no" | "0" | "disabled" => Some(0.0),
                _ => None,
            },
        }
    }

    /// Unit label for this formatter.
    pub fn units(&self) -> &'static str {
        match self {
            Formatter::Meters { .. } => "m",
            Formatter::Float { .. } | Formatter::Boolean => "",
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Float { precision: 2 }
    }
}
