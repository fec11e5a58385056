//! Error envelope shared by every failure path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub message: String,
    pub stack: Vec<String>,
}

fn stack_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s{4,}").expect("static regex"))
}

/// Splits a trace into frames at runs of four or more whitespace characters.
pub fn split_stack(trace: &str) -> Vec<String> {
    stack_separator()
        .split(trace)
        .filter(|frame| !frame.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn error_body(status: StatusCode, message: String, trace: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        status: status.as_u16(),
        message,
        stack: split_stack(trace),
    }
}

pub fn error_response(status: StatusCode, message: String, trace: &str) -> Response {
    (status, Json(error_body(status, message, trace))).into_response()
}
