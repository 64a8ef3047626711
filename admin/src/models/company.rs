use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::client::Resource;
use crate::models::common::{push_opt, ListOptions, QueryParams, SelectOption};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Company {
    pub fn select_option(&self) -> SelectOption {
        SelectOption {
            value: self.id.clone(),
            label: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyQuery {
    pub name: Option<String>,
    #[serde(skip)]
    pub paging: ListOptions,
}

impl QueryParams for CompanyQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "name", &self.name);
        self.paging.push_pairs(&mut pairs);
        pairs
    }
}

impl Resource for Company {
    const ENTITY: &'static str = "company";
    const PATH: &'static str = "companies";
    type Input = CreateCompanyRequest;
    type Query = CompanyQuery;
}
