use crate::models::RouteStep;

/// Human-readable distance: whole meters below 1 km, tenths of a kilometer above
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} meters", meters.round() as i64)
    } else {
        format!("{:.1} kilometers", meters / 1000.0)
    }
}

/// Build the text read aloud for a route
///
/// Returns `None` when there are no steps, since a straight-line fallback
/// has nothing to narrate.
pub fn directions_script(
    destination: &str,
    total_distance: Option<f64>,
    steps: &[RouteStep],
) -> Option<String> {
    if steps.is_empty() {
        return None;
    }

    let mut parts = vec![format!("Directions to {}.", destination)];

    if let Some(total) = total_distance.filter(|d| *d > 0.0) {
        parts.push(format!("Total distance: {}.", format_distance(total)));
    }

    parts.extend(steps.iter().enumerate().map(|(index, step)| {
        format!(
            "Step {}: {}. Distance: {}.",
            index + 1,
            step.instruction.trim_end_matches('.'),
            format_distance(step.distance)
        )
    }));

    Some(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(distance: f64, instruction: &str) -> RouteStep {
        RouteStep {
            distance,
            instruction: instruction.to_string(),
            maneuver: "turn".to_string(),
        }
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0 meters");
        assert_eq!(format_distance(42.4), "42 meters");
        assert_eq!(format_distance(999.4), "999 meters");
        assert_eq!(format_distance(1000.0), "1.0 kilometers");
        assert_eq!(format_distance(2345.0), "2.3 kilometers");
    }

    #[test]
    fn test_directions_script() {
        let steps = vec![
            step(120.0, "Head north on Church Street"),
            step(35.6, "Turn left onto Gould Street."),
        ];

        let script = directions_script("KHE-123", Some(155.6), &steps).unwrap();
        assert_eq!(
            script,
            "Directions to KHE-123. Total distance: 156 meters. \
             Step 1: Head north on Church Street. Distance: 120 meters. \
             Step 2: Turn left onto Gould Street. Distance: 36 meters."
        );
    }

    #[test]
    fn test_no_script_without_steps() {
        assert!(directions_script("KHE-123", Some(100.0), &[]).is_none());
    }

    #[test]
    fn test_zero_total_is_omitted() {
        let script = directions_script("ENG-101", Some(0.0), &[step(0.0, "Arrive")]).unwrap();
        assert_eq!(script, "Directions to ENG-101. Step 1: Arrive. Distance: 0 meters.");
    }
}
