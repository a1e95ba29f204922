/// Typed view over the raw string value of a session property.
pub trait PropertyValue: Sized {
    /// Try to parse a raw property value.
    fn try_parse(s: &str) -> Option<Self>;

    /// Format the value the way it would be provided by a client.
    fn format(&self) -> String;
}

impl PropertyValue for bool {
    fn try_parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("true") {
            Some(true)
        } else if s.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for i64 {
    fn try_parse(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for f64 {
    fn try_parse(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for String {
    fn try_parse(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }
}
