//! Score display formatting for the heads-up UI.

/// Format a point total for display.
pub fn format_points(points: u64) -> String {
    format!("{} pts", group_thousands(points))
}

/// Format the scoring multiplier for display.
pub fn format_multiplier(multiplier: f64) -> String {
    format!("x{:.1}", multiplier)
}

/// Format on-road distance for display.
pub fn format_road_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
