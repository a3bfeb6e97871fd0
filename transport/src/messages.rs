use http::StatusCode;

pub const GENERIC_FALLBACK: &str = "An unexpected error occurred. Please try again.";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection.";
pub const DECODE_MESSAGE: &str = "Received an unexpected response from the server.";

/// PostgreSQL constraint codes the backend passes through in `code`.
pub fn constraint_message(code: &str) -> Option<&'static str> {
    match code {
        "23505" => Some("A record with these details already exists."),
        "23503" => Some("This record is referenced by other data and cannot be changed or deleted."),
        "23502" => Some("A required field is missing."),
        "23514" => Some("One of the values is outside the allowed range."),
        "22P02" => Some("One of the values has an invalid format."),
        "22001" => Some("One of the values is too long."),
        _ => None,
    }
}

pub fn status_message(status: StatusCode) -> Option<&'static str> {
    let message = match status.as_u16() {
        400 => "The request was invalid. Please check your input.",
        401 => "Your session has expired. Please log in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        405 => "This action is not allowed.",
        408 => TIMEOUT_MESSAGE,
        409 => "This action conflicts with the current state of the resource.",
        413 => "The uploaded file is too large.",
        415 => "This file type is not supported.",
        422 => "Some of the submitted data is invalid.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "The server encountered an error. Please try again later.",
        502 => "The server is temporarily unreachable. Please try again later.",
        503 => "The service is temporarily unavailable. Please try again later.",
        504 => "The server took too long to respond. Please try again later.",
        _ => return None,
    };
    Some(message)
}
