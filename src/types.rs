#[derive(Debug, PartialEq, Clone, Copy, serde::Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Planar distance in degree space. No projection correction is applied.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        (other.latitude - self.latitude).hypot(other.longitude - self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Hash, PartialOrd, Ord)]
pub struct Callsign(String);

impl Callsign {
    pub const MAX_LENGTH: usize = 8;

    pub fn new(value: &str) -> Result<Self, CallsignError> {
        if value.is_empty() {
            return Err(CallsignError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(CallsignError::TooLong(value.to_string()));
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CallsignError::InvalidCharacters(value.to_string()));
        }
        Ok(Callsign(value.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Callsign {
    type Err = CallsignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Callsign::new(s)
    }
}

impl std::fmt::Display for Callsign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq)]
pub enum CallsignError {
    Empty,
    TooLong(String),
    InvalidCharacters(String),
}
impl std::fmt::Display for CallsignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallsignError::Empty => write!(f, "Callsign is empty"),
            CallsignError::TooLong(value) => write!(
                f,
                "Callsign '{value}' exceeds {} characters",
                Callsign::MAX_LENGTH
            ),
            CallsignError::InvalidCharacters(value) => {
                write!(f, "Callsign '{value}' must be ASCII letters and digits")
            }
        }
    }
}
impl std::error::Error for CallsignError {}

/// What a flight is doing this tick.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Action {
    /// Advancing toward the destination.
    #[default]
    Fly,
    Hold,
    /// Parked. Never advances again unless told to fly.
    Land,
    /// Advancing along an operator-assigned heading.
    Heading,
}

impl Action {
    #[must_use]
    pub fn advances(self) -> bool {
        matches!(self, Action::Fly | Action::Heading)
    }
}

impl std::str::FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fly" | "takeoff" => Ok(Action::Fly),
            "hold" => Ok(Action::Hold),
            "land" => Ok(Action::Land),
            "heading" | "bearing" => Ok(Action::Heading),
            _ => Err(ActionError::Unknown(s.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Fly => "fly",
            Action::Hold => "hold",
            Action::Land => "land",
            Action::Heading => "heading",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, PartialEq)]
pub enum ActionError {
    Unknown(String),
}
impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::Unknown(value) => write!(f, "Unknown action '{value}'"),
        }
    }
}
impl std::error::Error for ActionError {}

#[cfg(test)]
mod tests {
    use super::{Action, Callsign, CallsignError, Coordinate};

    #[test]
    fn when_callsign_is_lowercase_then_it_is_stored_uppercase() {
        let callsign = Callsign::new("ual123").expect("valid callsign");
        assert_eq!(callsign.as_str(), "UAL123");
        assert_eq!(callsign, Callsign::new("UAL123").unwrap());
    }

    #[test]
    fn when_callsign_is_invalid_then_error_is_returned() {
        assert_eq!(Callsign::new(""), Err(CallsignError::Empty));
        assert!(matches!(
            Callsign::new("ABCDEFGHI"),
            Err(CallsignError::TooLong(_))
        ));
        assert!(matches!(
            Callsign::new("UA-12"),
            Err(CallsignError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn when_parsing_actions_then_aliases_and_case_are_accepted() {
        assert_eq!("FLY".parse::<Action>(), Ok(Action::Fly));
        assert_eq!("takeoff".parse::<Action>(), Ok(Action::Fly));
        assert_eq!("Hold".parse::<Action>(), Ok(Action::Hold));
        assert_eq!("land".parse::<Action>(), Ok(Action::Land));
        assert_eq!("bearing".parse::<Action>(), Ok(Action::Heading));
        assert!("cruise".parse::<Action>().is_err());
    }

    #[test]
    fn when_measuring_distance_then_planar_degrees_are_used() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }
}
