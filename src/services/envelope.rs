//! Result envelope returned by every service

use serde::{Serialize, Serializer};

/// Outcome of a service call.
///
/// Exactly one side is populated: a payload on success, or a list of error
/// codes on failure. Validation failures and internal faults are kept apart
/// so the HTTP layer can answer them with different status codes.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// Successful call with its payload
    Data(T),
    /// Caller-correctable validation failure, as ordered error codes
    Invalid(Vec<String>),
    /// Unexpected fault caught at the service boundary
    Failed(String),
}

impl<T> Envelope<T> {
    pub fn invalid(code: impl Into<String>) -> Self {
        Envelope::Invalid(vec![code.into()])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Data(_))
    }

    /// Error codes, or `None` on success
    pub fn errors(&self) -> Option<Vec<&str>> {
        match self {
            Envelope::Data(_) => None,
            Envelope::Invalid(codes) => Some(codes.iter().map(String::as_str).collect()),
            Envelope::Failed(message) => Some(vec![message.as_str()]),
        }
    }

    /// Payload, or `None` on failure
    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Envelope::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Data(data) => Envelope::Data(f(data)),
            Envelope::Invalid(codes) => Envelope::Invalid(codes),
            Envelope::Failed(message) => Envelope::Failed(message),
        }
    }
}

#[derive(Serialize)]
struct Wire<'a, T> {
    errors: Option<Vec<&'a str>>,
    data: Option<&'a T>,
}

/// Serializes as `{"errors": [...] | null, "data": ... | null}`
impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Wire {
            errors: self.errors(),
            data: self.data(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_has_no_errors() {
        let envelope = Envelope::Data(vec![1, 2]);
        assert!(envelope.is_success());
        assert!(envelope.errors().is_none());
        assert_eq!(envelope.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn failure_carries_message_as_single_error() {
        let envelope: Envelope<()> = Envelope::Failed("boom".to_string());
        assert_eq!(envelope.errors(), Some(vec!["boom"]));
        assert!(envelope.data().is_none());
    }

    #[test]
    fn serializes_to_errors_and_data_fields() {
        let ok = serde_json::to_value(Envelope::Data("x")).unwrap();
        assert_eq!(ok, json!({ "errors": null, "data": "x" }));

        let bad: Envelope<String> = Envelope::invalid("blank_user_handle");
        let bad = serde_json::to_value(bad).unwrap();
        assert_eq!(bad, json!({ "errors": ["blank_user_handle"], "data": null }));
    }
}
