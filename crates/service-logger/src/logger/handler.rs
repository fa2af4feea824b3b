use mesg_service::{LogSink, Request, Response, Task};
use serde::Deserialize;
use serde_json::{Value, json};

/// Key under which the handler is registered.
pub const LOG_TASK: &str = "log";

/// Payload of a `log` invocation. A missing or `null` service id is logged
/// as empty, missing data as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogRequest {
    #[serde(rename = "serviceID")]
    service_id: Option<String>,
    data: Value,
}

/// The `log` task, writing to `log`.
pub fn log_task(log: LogSink) -> Task {
    Task::from_fn(LOG_TASK, move |request: &Request| handle(&log, request))
}

pub(crate) fn handle(log: &LogSink, request: &Request) -> Response {
    let input: LogRequest = match request.decode() {
        Ok(input) => input,
        Err(e) => return Response::error_message(e),
    };

    let data = match serde_json::to_string(&input.data) {
        Ok(data) => data,
        Err(e) => return Response::error_message(e),
    };

    let service_id = input.service_id.unwrap_or_default();
    log.in_scope(|| tracing::info!("{service_id}: {data}"));
    Response::Success(json!({ "message": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesg_service::{proto::TaskData, servicetest::LogCapture};

    fn request(input: &str) -> Request {
        Request::from(TaskData {
            execution_id: "e1".into(),
            task_key: LOG_TASK.into(),
            input_data: input.into(),
        })
    }

    #[test]
    fn logs_compact_payload_and_answers_ok() {
        let logs = LogCapture::default();
        let response = handle(
            &logs.sink(),
            &request(r#"{"serviceID":"svc1","data":{ "x": 1 }}"#),
        );

        assert_eq!(response, Response::Success(json!({ "message": "ok" })));
        assert!(logs.contents().contains(r#"svc1: {"x":1}"#));
    }

    #[test]
    fn malformed_payload_answers_error_without_logging() {
        let logs = LogCapture::default();
        let response = handle(&logs.sink(), &request("not-json"));

        let Response::Error(payload) = response else {
            panic!("expected error response, got {response:?}");
        };
        let message = payload["message"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(logs.contents().is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let logs = LogCapture::default();
        let response = handle(&logs.sink(), &request("{}"));

        assert_eq!(response.key(), "success");
        assert!(logs.contents().contains(": null"));
    }

    #[test]
    fn null_service_id_is_logged_as_empty() {
        let logs = LogCapture::default();
        let response = handle(
            &logs.sink(),
            &request(r#"{"serviceID":null,"data":{"x":1}}"#),
        );

        assert_eq!(response, Response::Success(json!({ "message": "ok" })));
        let contents = logs.contents();
        assert!(contents.contains(r#": {"x":1}"#));
        assert!(!contents.contains("null"));
    }

    #[test]
    fn non_object_data_is_logged_verbatim() {
        let logs = LogCapture::default();
        handle(
            &logs.sink(),
            &request(r#"{"serviceID":"svc2","data":[1, "two"]}"#),
        );
        assert!(logs.contents().contains(r#"svc2: [1,"two"]"#));
    }

    #[test]
    fn task_is_registered_under_log() {
        assert_eq!(log_task(LogCapture::default().sink()).name(), "log");
    }
}
