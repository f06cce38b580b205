use thiserror::Error;

/// Login failures, with user-facing messages as their `Display` form.
///
/// The backend serves a Vietnamese user base; the fixed messages match the
/// strings the dashboard shows verbatim.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Backend rejected the credentials (HTTP 401).
    #[error("Tên đăng nhập hoặc mật khẩu không đúng")]
    InvalidCredentials,

    /// Backend failed internally (HTTP 5xx).
    #[error("Lỗi máy chủ, vui lòng thử lại sau")]
    Server,

    /// Backend refused the login for another reason; `message` comes from
    /// the JSON error body when one could be parsed.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never reached the backend (connection refused, DNS,
    /// etc.). The underlying cause is carried for logs.
    #[error("Không thể kết nối đến máy chủ, vui lòng kiểm tra kết nối mạng")]
    Connection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_message_is_exact() {
        assert_eq!(
            LoginError::InvalidCredentials.to_string(),
            "Tên đăng nhập hoặc mật khẩu không đúng"
        );
    }

    #[test]
    fn rejected_displays_backend_message() {
        let error = LoginError::Rejected {
            status: 423,
            message: "Tài khoản đã bị khóa".to_string(),
        };
        assert_eq!(error.to_string(), "Tài khoản đã bị khóa");
    }

    #[test]
    fn connection_hides_cause_from_display() {
        let error = LoginError::Connection("connection refused".to_string());
        assert!(!error.to_string().contains("refused"));
    }
}
