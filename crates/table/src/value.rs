use serde::Serialize;

/// Digit strings longer than this exceed f64 precision and stay text.
const MAX_EXACT_DIGITS: usize = 15;

/// A single scalar cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Number(f64),
}

impl Value {
    /// Parse a raw field the way a loader sees it: empty → null,
    /// numeric-looking → number, everything else → text.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Value::Null;
        }

        // Long digit runs (phone numbers, SIM IDs) would silently round
        // through f64; keep them as text so the exact digits survive.
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if unsigned.len() > MAX_EXACT_DIGITS && unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Value::Text(trimmed.to_string());
        }

        if let Ok(num) = trimmed.parse::<f64>() {
            if num.is_finite() {
                return Value::Number(num);
            }
        }

        Value::Text(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual rendering: numbers with zero fractional part render as
    /// integers (42.0 → "42"), never in scientific notation; null renders
    /// as the empty string.
    pub fn render_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_classifies() {
        assert_eq!(Value::from_input(""), Value::Null);
        assert_eq!(Value::from_input("   "), Value::Null);
        assert_eq!(Value::from_input("42"), Value::Number(42.0));
        assert_eq!(Value::from_input("42.5"), Value::Number(42.5));
        assert_eq!(Value::from_input("-7"), Value::Number(-7.0));
        assert_eq!(Value::from_input("hello"), Value::Text("hello".into()));
        assert_eq!(Value::from_input("AB-12"), Value::Text("AB-12".into()));
    }

    #[test]
    fn from_input_keeps_long_ids_exact() {
        let sim = "895202201234567890";
        assert_eq!(Value::from_input(sim), Value::Text(sim.into()));
        // 15 digits still fit an f64 exactly
        assert_eq!(
            Value::from_input("123456789012345"),
            Value::Number(123456789012345.0)
        );
    }

    #[test]
    fn render_whole_floats_as_integers() {
        assert_eq!(Value::Number(42.0).render_text(), "42");
        assert_eq!(Value::Number(42.5).render_text(), "42.5");
        assert_eq!(Value::Number(-7.0).render_text(), "-7");
    }

    #[test]
    fn render_null_is_empty() {
        assert_eq!(Value::Null.render_text(), "");
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Number(3.0)).unwrap(), "3.0");
        assert_eq!(
            serde_json::to_string(&Value::Text("a".into())).unwrap(),
            "\"a\""
        );
    }
}
