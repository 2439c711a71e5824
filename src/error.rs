use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    NotAuthenticated,
    InvalidCredentials,
    EmailTaken,
    TaskNotFound,
    StatusNotFound,
    AmbiguousRef,
    DefaultStatusProtected,
    StatusNameConflict,
    ValidationError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::StatusNotFound => "STATUS_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::DefaultStatusProtected => "DEFAULT_STATUS_PROTECTED",
            Self::StatusNameConflict => "STATUS_NAME_CONFLICT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

/// A single field-level validation message, as shown next to a form input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct KanbanError {
    pub code: ErrorCode,
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl KanbanError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "kanban is not initialized. Run `kanban init` first.",
        )
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            ErrorCode::NotAuthenticated,
            "Not signed in. Use `kanban login` or `kanban signup`.",
        )
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid email or password")
    }

    pub fn email_taken(email: &str) -> Self {
        Self::new(
            ErrorCode::EmailTaken,
            format!("An account with email '{email}' already exists"),
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn status_not_found(name: &str) -> Self {
        Self::new(
            ErrorCode::StatusNotFound,
            format!("Status not found: {name}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn default_status_protected() -> Self {
        Self::new(
            ErrorCode::DefaultStatusProtected,
            "Cannot delete default statuses!",
        )
    }

    pub fn default_status_rename() -> Self {
        Self::new(
            ErrorCode::DefaultStatusProtected,
            "Cannot rename default statuses!",
        )
    }

    pub fn status_name_conflict() -> Self {
        Self::new(ErrorCode::StatusNameConflict, "This status already exists!")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Validation failure carrying one message per offending form field.
    pub fn invalid_form(fields: Vec<FieldError>) -> Self {
        let message = fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            code: ErrorCode::ValidationError,
            message,
            fields,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for KanbanError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<std::io::Error> for KanbanError {
    fn from(e: std::io::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for KanbanError {
    fn from(e: serde_json::Error) -> Self {
        Self::database(e.to_string())
    }
}
