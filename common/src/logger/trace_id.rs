use std::fmt;

use uuid::Uuid;

/// Correlation ID that follows a process run or a single operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_ids_are_unique_and_hyphenated() {
        let a = TraceId::default();
        let b = TraceId::default();

        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 36);
        assert_eq!(a.to_string(), a.as_uuid().to_string());
    }
}
