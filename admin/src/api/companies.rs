use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::{
    auth::AccessContext,
    client::CrudClient,
    detail::DetailView,
    error::Result,
    models::{
        common::ListOptions,
        company::{Company, CompanyQuery},
    },
    AppState,
};

#[derive(Debug, Serialize)]
pub struct CompanyViewPage {
    pub state: &'static str,
    pub error: Option<String>,
    pub company: Option<Company>,
}

pub async fn list(
    State(state): State<AppState>,
    ctx: AccessContext,
    Query(mut query): Query<CompanyQuery>,
    Query(paging): Query<ListOptions>,
) -> Result<Json<Vec<Company>>> {
    query.paging = paging;
    let client = state.client_for(&ctx);
    let companies = CrudClient::<Company>::list(&client, &query).await?;
    Ok(Json(companies))
}

pub async fn view(
    State(state): State<AppState>,
    ctx: AccessContext,
    Path(id): Path<String>,
) -> Json<CompanyViewPage> {
    let mut view = DetailView::<Company, _>::new(state.client_for(&ctx), &[]);
    let page_state = view.show(Some(&id)).await;
    Json(CompanyViewPage {
        state: page_state.label(),
        error: match page_state {
            crate::detail::ViewState::Error(e) => Some(e.message().to_string()),
            _ => None,
        },
        company: page_state.record().cloned(),
    })
}
