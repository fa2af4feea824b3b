//! One task invocation and its answer.
//!
//! A [`Request`] is built from each inbound `TaskData` message and lent to the
//! matching handler. The handler returns a [`Response`], which the dispatch
//! loop turns into exactly one `SubmitResult` call.

use mesg_service_core::{
    Error, Result,
    proto::TaskData,
    types::{ERROR_OUTPUT_KEY, SUCCESS_OUTPUT_KEY},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// An inbound task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    execution_id: String,
    key: String,
    data: String,
}

impl Request {
    /// Correlation token assigned by the daemon. Echoed back on submission.
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// Name of the task being invoked.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw JSON input as received.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Deserializes the task input into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the input is not valid JSON for `T`.
    /// Handlers are expected to answer with [`Response::Error`] in that case.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).map_err(Error::Decode)
    }
}

impl From<TaskData> for Request {
    fn from(data: TaskData) -> Self {
        Self {
            execution_id: data.execution_id,
            key: data.task_key,
            data: data.input_data,
        }
    }
}

/// The single output of a task invocation.
///
/// Each variant maps to one output key known by the daemon.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Reported under [`SUCCESS_OUTPUT_KEY`].
    Success(Value),
    /// Reported under [`ERROR_OUTPUT_KEY`].
    Error(Value),
}

impl Response {
    /// An error output of the form `{"message": "..."}`.
    pub fn error_message(message: impl ToString) -> Self {
        Self::Error(serde_json::json!({ "message": message.to_string() }))
    }

    pub const fn key(&self) -> &'static str {
        match self {
            Self::Success(_) => SUCCESS_OUTPUT_KEY,
            Self::Error(_) => ERROR_OUTPUT_KEY,
        }
    }

    pub const fn payload(&self) -> &Value {
        match self {
            Self::Success(payload) | Self::Error(payload) => payload,
        }
    }

    /// Serializes the payload into the JSON text sent to the daemon.
    pub(crate) fn encode(&self) -> Result<String> {
        serde_json::to_string(self.payload()).map_err(Error::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Input {
        name: String,
        count: u32,
    }

    fn request(data: &str) -> Request {
        Request::from(TaskData {
            execution_id: "e1".into(),
            task_key: "log".into(),
            input_data: data.into(),
        })
    }

    #[test]
    fn request_keeps_correlation_fields() {
        let req = request("{}");
        assert_eq!(req.execution_id(), "e1");
        assert_eq!(req.key(), "log");
        assert_eq!(req.data(), "{}");
    }

    #[test]
    fn decodes_into_caller_shape() {
        let req = request(r#"{"name":"a","count":3}"#);
        let input: Input = req.decode().unwrap();
        assert_eq!(
            input,
            Input {
                name: "a".into(),
                count: 3
            }
        );
    }

    #[test]
    fn malformed_input_is_decode_error() {
        let err = request("not-json").decode::<Input>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let err = request(r#"{"name":1}"#).decode::<Input>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn response_keys() {
        assert_eq!(Response::Success(Value::Null).key(), "success");
        assert_eq!(Response::error_message("boom").key(), "error");
    }

    #[test]
    fn error_message_payload() {
        let resp = Response::error_message("boom");
        assert_eq!(resp.payload(), &json!({ "message": "boom" }));
        assert_eq!(resp.encode().unwrap(), r#"{"message":"boom"}"#);
    }
}
