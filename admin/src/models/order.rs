use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};
use validator::Validate;

use crate::client::Resource;
use crate::form::Draft;
use crate::models::common::{push_opt, ListOptions, QueryParams};
use crate::models::company::Company;
use crate::schema::{self, FieldErrors, UnknownField};

/// Order record as persisted by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub product_category: String,
    pub size: i64,
    pub length: i64,
    pub weight: i64,
    pub purity: i64,
    pub screw_type: String,
    pub rhodium_details: String,
    #[serde(with = "time::serde::rfc3339")]
    pub delivery_date: OffsetDateTime,
    pub company_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Populated only when the `company` relation was expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl Resource for Order {
    const ENTITY: &'static str = "order";
    const PATH: &'static str = "orders";
    type Input = CreateOrderRequest;
    type Query = OrderQuery;
}

/// Validated create payload. Never carries an id or timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub product_category: String,
    pub size: i64,
    pub length: i64,
    pub weight: i64,
    pub purity: i64,
    pub screw_type: String,
    pub rhodium_details: String,
    #[serde(with = "time::serde::rfc3339")]
    pub delivery_date: OffsetDateTime,
    pub company_id: String,
}

/// In-progress create form state.
#[derive(Debug, Clone, Serialize, PartialEq, Validate)]
pub struct OrderDraft {
    #[validate(length(min = 1, message = "customer_name is a required field"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "product_category is a required field"))]
    pub product_category: String,
    pub size: f64,
    pub length: f64,
    pub weight: f64,
    pub purity: f64,
    #[validate(length(min = 1, message = "screw_type is a required field"))]
    pub screw_type: String,
    #[validate(length(min = 1, message = "rhodium_details is a required field"))]
    pub rhodium_details: String,
    #[validate(required(message = "delivery_date is a required field"))]
    pub delivery_date: Option<Date>,
    #[validate(
        required(message = "company_id is a required field"),
        length(min = 1, message = "company_id is a required field")
    )]
    pub company_id: Option<String>,
}

impl OrderDraft {
    /// Empty draft: blank text, zeroed numbers, delivery on `today`.
    pub fn initial(company_id: Option<String>, today: Date) -> Self {
        Self {
            customer_name: String::new(),
            product_category: String::new(),
            size: 0.0,
            length: 0.0,
            weight: 0.0,
            purity: 0.0,
            screw_type: String::new(),
            rhodium_details: String::new(),
            delivery_date: Some(today),
            company_id: company_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn numeric_fields(&self) -> [(OrderField, f64); 4] {
        [
            (OrderField::Size, self.size),
            (OrderField::Length, self.length),
            (OrderField::Weight, self.weight),
            (OrderField::Purity, self.purity),
        ]
    }

    /// Overwrites one field from raw form input.
    pub fn apply(&mut self, field: OrderField, raw: &str) {
        match field {
            OrderField::CustomerName => self.customer_name = raw.to_string(),
            OrderField::ProductCategory => self.product_category = raw.to_string(),
            OrderField::Size => self.size = parse_number(raw),
            OrderField::Length => self.length = parse_number(raw),
            OrderField::Weight => self.weight = parse_number(raw),
            OrderField::Purity => self.purity = parse_number(raw),
            OrderField::ScrewType => self.screw_type = raw.to_string(),
            OrderField::RhodiumDetails => self.rhodium_details = raw.to_string(),
            OrderField::DeliveryDate => self.delivery_date = parse_date(raw),
            OrderField::CompanyId => {
                let raw = raw.trim();
                self.company_id = (!raw.is_empty()).then(|| raw.to_string());
            }
        }
    }
}

impl Draft for OrderDraft {
    type Resource = Order;

    fn set_field(&mut self, name: &str, raw: &str) -> Result<(), UnknownField> {
        let field = name.parse::<OrderField>()?;
        self.apply(field, raw);
        Ok(())
    }

    fn validate_input(&self) -> Result<CreateOrderRequest, FieldErrors> {
        schema::validate_order(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    CustomerName,
    ProductCategory,
    Size,
    Length,
    Weight,
    Purity,
    ScrewType,
    RhodiumDetails,
    DeliveryDate,
    CompanyId,
}

impl OrderField {
    pub const ALL: [OrderField; 10] = [
        OrderField::CustomerName,
        OrderField::ProductCategory,
        OrderField::Size,
        OrderField::Length,
        OrderField::Weight,
        OrderField::Purity,
        OrderField::ScrewType,
        OrderField::RhodiumDetails,
        OrderField::DeliveryDate,
        OrderField::CompanyId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrderField::CustomerName => "customer_name",
            OrderField::ProductCategory => "product_category",
            OrderField::Size => "size",
            OrderField::Length => "length",
            OrderField::Weight => "weight",
            OrderField::Purity => "purity",
            OrderField::ScrewType => "screw_type",
            OrderField::RhodiumDetails => "rhodium_details",
            OrderField::DeliveryDate => "delivery_date",
            OrderField::CompanyId => "company_id",
        }
    }
}

impl FromStr for OrderField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Unparseable numeric input falls back to zero.
fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else clears the date.
fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|t| t.date()))
}

/// Listing filter. Every field is optional and only present values are sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub id: Option<String>,
    pub customer_name: Option<String>,
    pub product_category: Option<String>,
    pub screw_type: Option<String>,
    pub rhodium_details: Option<String>,
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub filter: OrderFilter,
    pub paging: ListOptions,
}

impl QueryParams for OrderQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let f = &self.filter;
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "id", &f.id);
        push_opt(&mut pairs, "customer_name", &f.customer_name);
        push_opt(&mut pairs, "product_category", &f.product_category);
        push_opt(&mut pairs, "screw_type", &f.screw_type);
        push_opt(&mut pairs, "rhodium_details", &f.rhodium_details);
        push_opt(&mut pairs, "company_id", &f.company_id);
        self.paging.push_pairs(&mut pairs);
        pairs
    }
}
