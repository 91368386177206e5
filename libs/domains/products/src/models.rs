use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

/// Page used when the caller sends none, zero or a negative value.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the caller sends none, zero or a negative value.
pub const DEFAULT_LIMIT: i64 = 5;

/// Product as exposed to callers.
///
/// `id` is assigned by storage and is opaque to every layer above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = "665f1f77bcf86cd799439011")]
    pub id: String,
    #[serde(rename = "name_product")]
    #[schema(example = "Blue widget")]
    pub name: String,
    #[schema(example = 12)]
    pub stock: i32,
}

impl Product {
    /// Merges `fields` into this product, leaving absent fields untouched.
    pub fn apply(&mut self, fields: &UpdateProductFields) {
        if let Some(name) = fields.effective_name() {
            self.name = name.to_string();
        }
        if let Some(stock) = fields.stock {
            self.stock = stock;
        }
    }
}

/// Body of `POST /product`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[serde(rename = "name_product", default)]
    #[validate(length(min = 1, message = "required field name_product"))]
    #[schema(example = "Blue widget")]
    pub name: String,

    /// Required; `0` counts as missing.
    #[serde(default)]
    #[validate(required(message = "required field stock"))]
    #[schema(example = 12)]
    pub stock: Option<i32>,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: String,
}

impl FieldViolation {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            reason: format!("required field {field}"),
        }
    }
}

impl CreateProductRequest {
    /// Wire names in the order violations are reported, paired with the
    /// struct field names the derive may key errors by.
    const FIELD_ORDER: [(&'static str, &'static str); 2] =
        [("name_product", "name"), ("stock", "stock")];

    /// Checks the request and turns it into an insertable [`NewProduct`].
    ///
    /// Only the first violation is reported.
    pub fn into_new_product(self) -> Result<NewProduct, FieldViolation> {
        if let Err(errors) = self.validate() {
            return Err(Self::first_violation(&errors));
        }

        match self.stock {
            Some(stock) if stock != 0 => Ok(NewProduct {
                name: self.name,
                stock,
            }),
            _ => Err(FieldViolation::required("stock")),
        }
    }

    fn first_violation(errors: &ValidationErrors) -> FieldViolation {
        let field_errors = errors.field_errors();

        for (wire, field) in Self::FIELD_ORDER {
            let found = field_errors
                .get(wire)
                .or_else(|| field_errors.get(field))
                .and_then(|errs| errs.first());

            if let Some(err) = found {
                return FieldViolation {
                    field: wire,
                    reason: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid field {wire}")),
                };
            }
        }

        FieldViolation {
            field: "body",
            reason: errors.to_string(),
        }
    }
}

/// Validated input for the storage insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub stock: i32,
}

/// Partial update; `None` leaves the stored value as is.
///
/// `stock: Some(0)` is a real value, unlike on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductFields {
    /// Ignored when empty.
    #[serde(rename = "name_product", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
}

impl UpdateProductFields {
    pub fn effective_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// True when applying these fields would change nothing.
    pub fn is_empty(&self) -> bool {
        self.effective_name().is_none() && self.stock.is_none()
    }
}

/// Page request for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetProductsQuery {
    pub page: i64,
    pub limit: i64,
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
}

impl GetProductsQuery {
    /// Replaces non-positive page/limit with the defaults and trims the filter.
    pub fn normalized(self) -> Self {
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            page: if self.page < 1 { DEFAULT_PAGE } else { self.page },
            limit: if self.limit < 1 { DEFAULT_LIMIT } else { self.limit },
            name,
        }
    }

    /// Documents to skip: `limit * (page - 1)`, saturating at `u64::MAX`.
    pub fn skip(&self) -> u64 {
        let page = self.page.max(1) as u64;
        let limit = self.limit.max(1) as u64;
        limit.saturating_mul(page - 1)
    }

    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// Raw query string of `GET /products`.
///
/// Values are kept as text so unparsable numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// 1-based page number, default 1
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Page size, default 5
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
}

impl From<ListProductsParams> for GetProductsQuery {
    fn from(params: ListProductsParams) -> Self {
        let number = |raw: Option<String>| {
            raw.and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        Self {
            page: number(params.page),
            limit: number(params.limit),
            name: params.name,
        }
    }
}

/// Window metadata returned alongside a page of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationInfo {
    /// Products matching the filter, independent of the window.
    pub total: u64,
    pub limit: u64,
    pub current_page: u64,
    /// `ceil(total / limit)`, 0 when nothing matches.
    pub last_page: u64,
}

impl PaginationInfo {
    /// Expects a normalized query.
    pub fn new(total: u64, query: &GetProductsQuery) -> Self {
        let limit = query.limit.max(1) as u64;
        Self {
            total,
            limit,
            current_page: query.page.max(1) as u64,
            last_page: total.div_ceil(limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, stock: Option<i32>) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            stock,
        }
    }

    #[test]
    fn test_valid_create_request() {
        let product = request("Pencil", Some(3)).into_new_product().unwrap();
        assert_eq!(
            product,
            NewProduct {
                name: "Pencil".into(),
                stock: 3
            }
        );
    }

    #[test]
    fn test_negative_stock_is_accepted_on_create() {
        assert!(request("Pencil", Some(-1)).into_new_product().is_ok());
    }

    #[test]
    fn test_empty_name_is_reported_first() {
        let violation = request("", None).into_new_product().unwrap_err();
        assert_eq!(violation.field, "name_product");
        assert_eq!(violation.reason, "required field name_product");
    }

    #[test]
    fn test_missing_stock() {
        let violation = request("Pencil", None).into_new_product().unwrap_err();
        assert_eq!(violation.field, "stock");
        assert_eq!(violation.reason, "required field stock");
    }

    #[test]
    fn test_zero_stock_counts_as_missing() {
        let violation = request("Pencil", Some(0)).into_new_product().unwrap_err();
        assert_eq!(violation.field, "stock");
    }

    #[test]
    fn test_create_request_wire_names() {
        let parsed: CreateProductRequest =
            serde_json::from_str(r#"{"name_product":"Lamp","stock":4}"#).unwrap();
        assert_eq!(parsed, request("Lamp", Some(4)));
    }

    #[test]
    fn test_update_fields_distinguish_zero_from_absent() {
        let zero: UpdateProductFields = serde_json::from_str(r#"{"stock":0}"#).unwrap();
        assert_eq!(zero.stock, Some(0));
        assert!(!zero.is_empty());

        let absent: UpdateProductFields = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.stock, None);
        assert!(absent.is_empty());
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut product = Product {
            id: "1".into(),
            name: "Lamp".into(),
            stock: 4,
        };

        product.apply(&UpdateProductFields {
            name: Some(String::new()),
            stock: Some(0),
        });
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.stock, 0);

        product.apply(&UpdateProductFields {
            name: Some("Desk lamp".into()),
            stock: None,
        });
        assert_eq!(product.name, "Desk lamp");
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_query_normalization() {
        let query = GetProductsQuery {
            page: 0,
            limit: -1,
            name: Some("   ".into()),
        }
        .normalized();

        assert_eq!(
            query,
            GetProductsQuery {
                page: 1,
                limit: 5,
                name: None
            }
        );
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn test_skip_arithmetic() {
        let query = GetProductsQuery {
            page: 3,
            limit: 10,
            name: None,
        };
        assert_eq!(query.skip(), 20);

        let huge = GetProductsQuery {
            page: i64::MAX,
            limit: i64::MAX,
            name: None,
        };
        assert_eq!(huge.skip(), u64::MAX);
    }

    #[test]
    fn test_list_params_parse_leniently() {
        let query: GetProductsQuery = ListProductsParams {
            name: Some(" widget ".into()),
            page: Some("abc".into()),
            limit: Some(" 7 ".into()),
        }
        .into();

        assert_eq!(query.page, 0);
        assert_eq!(query.limit, 7);
        assert_eq!(query.normalized().name.as_deref(), Some("widget"));
    }

    #[test]
    fn test_pagination_last_page() {
        let query = GetProductsQuery::default().normalized();
        assert_eq!(PaginationInfo::new(0, &query).last_page, 0);
        assert_eq!(PaginationInfo::new(5, &query).last_page, 1);
        assert_eq!(PaginationInfo::new(11, &query).last_page, 3);
    }
}
