use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

// NumericInput keeps a numeric field the way it arrived, clients may send
// `"years": 2015` or `"years": "2015"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumericInput {
    pub fn coerce(&self, field: &str) -> LibraryResult<i64> {
        match self {
            NumericInput::Integer(n) => Ok(*n),
            NumericInput::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(*f as i64)
                } else {
                    Err(LibraryError::validation(
                        format!("{} must be an integer but was {}", field, f).as_str(), None))
                }
            }
            NumericInput::Text(s) => {
                s.trim().parse::<i64>().map_err(|_| LibraryError::validation(
                    format!("{} must be an integer but was {:?}", field, s).as_str(), None))
            }
        }
    }
}

impl From<i64> for NumericInput {
    fn from(n: i64) -> Self {
        NumericInput::Integer(n)
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

// serializer writes integers and reads back anything NumericInput accepts, so
// hand-edited data files with quoted numbers still load.
pub mod serializer {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::number::NumericInput;

    pub fn serialize<S: Serializer>(n: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        n.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let input = NumericInput::deserialize(deserializer)?;
        input.coerce("number").map_err(D::Error::custom)
    }
}
