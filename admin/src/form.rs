//! Create-form controller.
//!
//! Binds a [`Draft`] to a [`CrudClient`]: field edits overwrite the draft,
//! `submit` validates locally and only then issues a single create request.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{CrudClient, RequestError, Resource};
use crate::schema::{FieldErrors, UnknownField};

/// Form state for one resource type.
pub trait Draft: Clone + Send + Sync {
    type Resource: Resource;

    /// Overwrites the named field from raw input.
    fn set_field(&mut self, name: &str, raw: &str) -> Result<(), UnknownField>;

    /// Runs the validation schema, producing the create payload.
    fn validate_input(&self) -> Result<<Self::Resource as Resource>::Input, FieldErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug)]
pub enum SubmitOutcome<R> {
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The record was created; navigate to `redirect_to`.
    Created { record: R, redirect_to: String },
    /// The remote service rejected the request; the draft is preserved.
    Failed(RequestError),
}

pub struct FormController<D: Draft, C> {
    client: C,
    initial: D,
    draft: D,
    phase: FormPhase,
    field_errors: FieldErrors,
    error: Option<RequestError>,
}

impl<D, C> FormController<D, C>
where
    D: Draft,
    C: CrudClient<D::Resource>,
{
    /// `initial` is also the state the draft resets to after a successful create.
    pub fn new(client: C, initial: D) -> Self {
        Self {
            client,
            draft: initial.clone(),
            initial,
            phase: FormPhase::Editing,
            field_errors: FieldErrors::default(),
            error: None,
        }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), UnknownField> {
        self.draft.set_field(name, raw)?;
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Arbitrary in-place edit of the draft.
    pub fn edit(&mut self, f: impl FnOnce(&mut D)) {
        f(&mut self.draft);
        self.phase = FormPhase::Editing;
    }

    pub async fn submit(&mut self) -> SubmitOutcome<D::Resource> {
        let entity = <D::Resource as Resource>::ENTITY;
        self.error = None;

        let input = match self.draft.validate_input() {
            Ok(input) => input,
            Err(errors) => {
                debug!(entity, fields = errors.len(), "Draft failed validation");
                self.phase = FormPhase::Editing;
                self.field_errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.field_errors = FieldErrors::default();

        self.phase = FormPhase::Submitting;
        match self.client.create(&input).await {
            Ok(record) => {
                info!(entity, "Record created");
                self.draft = self.initial.clone();
                self.phase = FormPhase::Success;
                SubmitOutcome::Created {
                    record,
                    redirect_to: <D::Resource as Resource>::list_route(),
                }
            }
            Err(e) => {
                warn!(entity, "Create failed: {}", e);
                self.phase = FormPhase::Failed;
                self.error = Some(e.clone());
                SubmitOutcome::Failed(e)
            }
        }
    }
}
