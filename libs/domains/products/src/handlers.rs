//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestInvalidIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ApiResponse, LenientJson, Pagination,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProductRequest, ListProductsParams, PaginationInfo, Product, UpdateProductFields,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Acknowledgement returned by `DELETE /product/{id}`.
pub const DELETED_MESSAGE: &str = "Product deleted successfully";

/// OpenAPI documentation for the product endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, update_product, delete_product),
    components(
        schemas(Product, CreateProductRequest, UpdateProductFields, Pagination),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestInvalidIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

impl From<PaginationInfo> for Pagination {
    fn from(info: PaginationInfo) -> Self {
        Pagination {
            total: info.total,
            limit: info.limit,
            current_page: info.current_page,
            last_page: info.last_page,
        }
    }
}

/// Product routes, mounted at the root.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products))
        .route("/product", post(create_product))
        .route(
            "/product/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products, optionally filtered by name
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(params): Query<ListProductsParams>,
) -> ProductResult<ApiResponse<Vec<Product>>> {
    let page = service.get_products(params.into()).await?;
    Ok(ApiResponse::ok(page.items).with_pagination(page.pagination))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/product",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    LenientJson(request): LenientJson<CreateProductRequest>,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.create_product(request).await?;
    Ok(ApiResponse::created(product))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.get_product(&id).await?;
    Ok(ApiResponse::ok(product))
}

/// Merge the present fields into a product
#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    request_body = UpdateProductFields,
    responses(
        (status = 200, description = "Product after the update", body = ApiResponse<Product>),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    LenientJson(fields): LenientJson<UpdateProductFields>,
) -> ProductResult<ApiResponse<Product>> {
    let product = service.update_product(&id, fields).await?;
    Ok(ApiResponse::ok(product))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<String>),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<ApiResponse<String>> {
    service.delete_product(&id).await?;
    Ok(ApiResponse::ok(DELETED_MESSAGE.to_string()))
}
