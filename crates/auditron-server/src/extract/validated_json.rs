//! Validated JSON extractor.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::handler::{Error, ErrorKind};

/// JSON extractor with automatic validation using the `validator` crate.
///
/// Combines deserialization with validation, rejecting with a 400 response
/// that names the failing fields.
#[must_use]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ErrorKind::BadRequest
                    .with_message(rejection.body_text())
                    .with_resource("request")
                    .into_static()
            })?;

        data.validate()?;
        Ok(Self(data))
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let codes: Vec<_> = field_errors
                    .iter()
                    .map(|error| error.code.as_ref())
                    .collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect();

        tracing::warn!(
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(format!("Validation failed: {}", fields.join("; ")))
            .with_resource("request")
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        <Json<T> as aide::OperationInput>::operation_input(ctx, operation);
    }
}
