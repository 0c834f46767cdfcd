use serde::{Deserialize, Serialize};

/// Element type of a tensor, e.g. `float32` or `uint8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int(u8),
    UInt(u8),
    Float(u8),
}

impl DataType {
    #[inline(always)]
    pub fn int32() -> Self {
        DataType::Int(32)
    }

    #[inline(always)]
    pub fn int64() -> Self {
        DataType::Int(64)
    }

    #[inline(always)]
    pub fn float32() -> Self {
        DataType::Float(32)
    }

    #[inline(always)]
    pub fn float64() -> Self {
        DataType::Float(64)
    }

    pub fn bits(&self) -> u8 {
        match self {
            DataType::Bool => 1,
            DataType::Int(b) | DataType::UInt(b) | DataType::Float(b) => *b,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int(b) => write!(f, "int{}", b),
            DataType::UInt(b) => write!(f, "uint{}", b),
            DataType::Float(b) => write!(f, "float{}", b),
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_bits = |prefix: &str| -> Result<u8, String> {
            s[prefix.len()..]
                .parse::<u8>()
                .map_err(|_| format!("invalid data type `{}`", s))
        };
        if s == "bool" {
            Ok(DataType::Bool)
        } else if s.starts_with("uint") {
            Ok(DataType::UInt(parse_bits("uint")?))
        } else if s.starts_with("int") {
            Ok(DataType::Int(parse_bits("int")?))
        } else if s.starts_with("float") {
            Ok(DataType::Float(parse_bits("float")?))
        } else {
            Err(format!("invalid data type `{}`", s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DataType;

    #[test]
    fn display_round_trips_through_parse() {
        for dt in [
            DataType::Bool,
            DataType::Int(8),
            DataType::UInt(16),
            DataType::float32(),
            DataType::float64(),
        ] {
            assert_eq!(dt.to_string().parse::<DataType>(), Ok(dt));
        }
    }
}
