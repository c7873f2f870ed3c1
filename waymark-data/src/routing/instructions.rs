//! Human-readable phrasing of OSRM manoeuvres.

use super::osrm::Maneuver;

/// Phrase the instruction for a step along `name`.
pub(crate) fn instruction_text(maneuver: &Maneuver, name: &str) -> String {
    let onto = if name.is_empty() {
        String::new()
    } else {
        format!(" onto {name}")
    };
    let modifier = maneuver.modifier.as_deref().unwrap_or_default();

    match maneuver.kind.as_str() {
        "depart" => match (modifier.is_empty(), name.is_empty()) {
            (true, true) => "Depart".to_owned(),
            (true, false) => format!("Head along {name}"),
            (false, true) => format!("Head {modifier}"),
            (false, false) => format!("Head {modifier} on {name}"),
        },
        "arrive" => {
            if modifier.is_empty() || modifier == "straight" {
                "Arrive at your destination".to_owned()
            } else {
                format!("Arrive at your destination, on the {modifier}")
            }
        }
        "roundabout" | "rotary" => match maneuver.exit {
            Some(exit) => format!("Take exit {exit} at the roundabout{onto}"),
            None => format!("Enter the roundabout{onto}"),
        },
        "continue" | "new name" => {
            if modifier.is_empty() || modifier == "straight" {
                format!("Continue straight{onto}")
            } else {
                format!("Continue {modifier}{onto}")
            }
        }
        "fork" => format!("Keep {} at the fork{onto}", or_ahead(modifier)),
        "end of road" => format!("Turn {} at the end of the road{onto}", or_ahead(modifier)),
        "merge" => format!("Merge{}{onto}", prefixed(modifier)),
        "on ramp" => format!("Take the ramp{}{onto}", on_the(modifier)),
        "off ramp" => format!("Take the exit{}{onto}", on_the(modifier)),
        _ if modifier == "uturn" => format!("Make a U-turn{onto}"),
        _ if !modifier.is_empty() => format!("Turn {modifier}{onto}"),
        other => format!("{}{onto}", capitalise(other)),
    }
}

const fn or_ahead(modifier: &str) -> &str {
    if modifier.is_empty() { "ahead" } else { modifier }
}

fn prefixed(modifier: &str) -> String {
    if modifier.is_empty() {
        String::new()
    } else {
        format!(" {modifier}")
    }
}

fn on_the(modifier: &str) -> String {
    if modifier.is_empty() {
        String::new()
    } else {
        format!(" on the {modifier}")
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn maneuver(kind: &str, modifier: Option<&str>, exit: Option<u32>) -> Maneuver {
        Maneuver {
            kind: kind.to_owned(),
            modifier: modifier.map(str::to_owned),
            exit,
        }
    }

    #[rstest]
    #[case(maneuver("depart", Some("north"), None), "Strand", "Head north on Strand")]
    #[case(maneuver("depart", None, None), "", "Depart")]
    #[case(maneuver("turn", Some("left"), None), "Oxford Street", "Turn left onto Oxford Street")]
    #[case(maneuver("turn", Some("slight right"), None), "", "Turn slight right")]
    #[case(maneuver("turn", Some("uturn"), None), "Mall", "Make a U-turn onto Mall")]
    #[case(maneuver("roundabout", Some("right"), Some(2)), "The Mall", "Take exit 2 at the roundabout onto The Mall")]
    #[case(maneuver("rotary", None, None), "", "Enter the roundabout")]
    #[case(maneuver("new name", Some("straight"), None), "Fleet Street", "Continue straight onto Fleet Street")]
    #[case(maneuver("fork", Some("left"), None), "", "Keep left at the fork")]
    #[case(maneuver("end of road", None, None), "", "Turn ahead at the end of the road")]
    #[case(maneuver("arrive", Some("right"), None), "", "Arrive at your destination, on the right")]
    #[case(maneuver("arrive", None, None), "Strand", "Arrive at your destination")]
    #[case(maneuver("notification", None, None), "Strand", "Notification onto Strand")]
    fn phrases_manoeuvres(#[case] maneuver: Maneuver, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(instruction_text(&maneuver, name), expected);
    }
}
