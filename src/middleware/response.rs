use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::envelope::Envelope;
use crate::api::format::{render, Format, Rendered};
use crate::error::ApiError;
use crate::resource::Reply;

/// Outcome of a resource operation, before rendering
pub type ApiResult = Result<Reply, ApiError>;

/// Render a resource outcome in the negotiated format
pub fn respond(format: Format, outcome: ApiResult) -> Response {
    match outcome {
        Ok(reply) => reply_response(format, reply),
        Err(err) => error_response(format, &err),
    }
}

fn reply_response(format: Format, reply: Reply) -> Response {
    let mut response = match &reply.body {
        Some(envelope) => match render(format, envelope) {
            Ok(rendered) => body_response(reply.status, rendered),
            Err(e) => return error_response(format, &ApiError::from(e)),
        },
        // 204 and friends: no body, no content type
        None => reply.status.into_response(),
    };

    let headers = response.headers_mut();
    for (name, value) in reply.headers {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.append(name, value);
            }
            Err(_) => tracing::warn!("Dropping unrepresentable {} header value", name),
        }
    }

    response
}

/// `{ code, message }` envelope with the error's status
pub fn error_response(format: Format, err: &ApiError) -> Response {
    let status = err.status_code();
    match render(format, &Envelope::Message(err.to_message())) {
        Ok(rendered) => body_response(status, rendered),
        Err(e) => {
            tracing::error!("Failed to render error envelope: {}", e);
            (status, err.message().to_string()).into_response()
        }
    }
}

fn body_response(status: StatusCode, rendered: Rendered) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, rendered.content_type)],
        rendered.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_replies_have_no_content_type() {
        let reply = Reply::new(StatusCode::NO_CONTENT)
            .with_header(header::ALLOW, "GET, POST, OPTIONS");
        let response = respond(Format::Json, Ok(reply));

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(response.headers()[header::ALLOW], "GET, POST, OPTIONS");
    }

    #[test]
    fn errors_render_in_requested_format() {
        let response = respond(Format::Xml, Err(ApiError::forbidden()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");

        let response = respond(Format::Json, Err(ApiError::not_found()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn nonstandard_status_survives() {
        let status = StatusCode::from_u16(209).unwrap();
        let reply = Reply::new(status).with_body(Envelope::Message(crate::api::Message::new(209, "x")));
        let response = respond(Format::Json, Ok(reply));
        assert_eq!(response.status().as_u16(), 209);
    }
}
