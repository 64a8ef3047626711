use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    auth::{AccessContext, Operation, Service},
    client::{CrudClient, HttpCrudClient, Resource},
    detail::{DetailView, ViewState},
    error::Result,
    form::{FormController, SubmitOutcome},
    models::{
        common::{ListOptions, SelectOption},
        company::{Company, CompanyQuery},
        order::{Order, OrderDraft, OrderFilter, OrderQuery},
    },
    schema::FieldErrors,
    AppState,
};

/// Relations expanded on the detail page.
const VIEW_RELATIONS: &[&str] = &["company"];

#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    /// Pre-fills the company select.
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderPage {
    pub draft: OrderDraft,
    pub companies: Vec<SelectOption>,
    pub field_errors: FieldErrors,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyLink {
    pub id: String,
    pub name: String,
    pub href: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderViewPage {
    pub state: &'static str,
    pub error: Option<String>,
    pub order: Option<Order>,
    pub company: Option<CompanyLink>,
    pub edit_href: Option<String>,
}

impl OrderViewPage {
    fn from_state(state: &ViewState<Order>, ctx: &AccessContext) -> Self {
        let error = match state {
            ViewState::Error(e) => Some(e.message().to_string()),
            _ => None,
        };
        let order = state.record().cloned();

        let company = order.as_ref().and_then(|o| o.company.as_ref()).map(|c| CompanyLink {
            id: c.id.clone(),
            name: c.name.clone(),
            href: ctx
                .has_access(Company::ENTITY, Operation::Read, Service::Project)
                .then(|| format!("/{}/view/{}", Company::PATH, c.id)),
        });

        let edit_href = order
            .as_ref()
            .filter(|_| ctx.has_access(Order::ENTITY, Operation::Update, Service::Project))
            .map(|o| format!("/{}/edit/{}", Order::PATH, o.id));

        Self {
            state: state.label(),
            error,
            order,
            company,
            edit_href,
        }
    }
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

/// Options for the company select. Degrades to empty rather than failing the page.
async fn company_options(client: &HttpCrudClient) -> Vec<SelectOption> {
    match CrudClient::<Company>::list(client, &CompanyQuery::default()).await {
        Ok(companies) => companies.iter().map(Company::select_option).collect(),
        Err(e) => {
            tracing::warn!("Could not load company options: {}", e);
            Vec::new()
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(filter): Query<OrderFilter>,
    Query(paging): Query<ListOptions>,
) -> Result<Json<Vec<Order>>> {
    let client = state.client_for(&ctx);
    let orders = CrudClient::<Order>::list(&client, &OrderQuery { filter, paging }).await?;
    Ok(Json(orders))
}

pub async fn create_form(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(params): Query<CreateParams>,
) -> Json<CreateOrderPage> {
    let client = state.client_for(&ctx);

    Json(CreateOrderPage {
        draft: OrderDraft::initial(params.company_id, today()),
        companies: company_options(&client).await,
        field_errors: FieldErrors::default(),
        error: None,
    })
}

pub async fn create(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(params): Query<CreateParams>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let client = state.client_for(&ctx);
    let mut form = FormController::new(
        client.clone(),
        OrderDraft::initial(params.company_id, today()),
    );
    for (name, raw) in &fields {
        form.set_field(name, raw)?;
    }

    let (status, field_errors, error) = match form.submit().await {
        SubmitOutcome::Created { record, redirect_to } => {
            tracing::info!(id = %record.id, company_id = %record.company_id, "Order created");
            return Ok(Redirect::to(&redirect_to).into_response());
        }
        SubmitOutcome::Invalid(field_errors) => (StatusCode::UNPROCESSABLE_ENTITY, field_errors, None),
        SubmitOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            FieldErrors::default(),
            Some(e.message().to_string()),
        ),
    };

    // re-rendered form keeps the company select usable for the retry
    let page = CreateOrderPage {
        draft: form.draft().clone(),
        companies: company_options(&client).await,
        field_errors,
        error,
    };
    Ok((status, Json(page)).into_response())
}

pub async fn view(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<String>,
) -> Json<OrderViewPage> {
    let mut view = DetailView::<Order, _>::new(state.client_for(&ctx), VIEW_RELATIONS);
    let page_state = view.show(Some(&id)).await;
    Json(OrderViewPage::from_state(page_state, &ctx))
}
