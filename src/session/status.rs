//! Classifier health reporting for the display layer.
//!
//! T043: Define StatusSink trait for injected display sinks

/// Display color for a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Healthy, live road data
    Green,
    /// Degraded, running on the fallback grid
    Orange,
    /// The remote service failed mid-session
    Red,
}

impl StatusColor {
    /// CSS hex value for this color.
    pub fn css(&self) -> &'static str {
        match self {
            StatusColor::Green => "#4caf50",
            StatusColor::Orange => "#ff9800",
            StatusColor::Red => "#f44336",
        }
    }
}

/// Push-style sink for classifier health updates.
///
/// The session pushes a label and color whenever the classifier's mode
/// changes; it never reads anything back from the display layer.
pub trait StatusSink: Send {
    /// Reflect classifier health into the UI.
    fn update_api_status(&mut self, label: &str, color: StatusColor);
}

/// Status sink that routes updates to the log, for headless runs.
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn update_api_status(&mut self, label: &str, color: StatusColor) {
        tracing::info!(color = color.css(), "road data status: {label}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(StatusColor::Green.css(), "#4caf50");
        assert_eq!(StatusColor::Orange.css(), "#ff9800");
        assert_eq!(StatusColor::Red.css(), "#f44336");
    }
}
