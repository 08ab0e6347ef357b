use std::net::SocketAddr;
use std::sync::Arc;

use domain::memory::{MemoryCatalogStore, MemoryOrderStore};
use domain::storage::filesystem::FilesystemAssetStore;
use domain::{CatalogConfig, Role, User};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, OrderConfig, ServerConfig, StorageConfig,
};
use server::state::AppState;
use server::utils::jwt;

const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Smallest valid PNG signature plus padding; the server never decodes images.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n-pizza-image-";

pub mod routes {
    use uuid::Uuid;

    pub const CATALOG: &str = "/api/v1/catalog";
    pub const CATALOG_CLEAR: &str = "/api/v1/catalog/clear";
    pub const PRODUCTS: &str = "/api/v1/products";
    pub const ORDERS: &str = "/api/v1/orders";
    pub const ORDER_QUOTE: &str = "/api/v1/orders/quote";
    pub const CAPABILITIES: &str = "/api/v1/me/capabilities";

    pub fn catalog_search(q: &str) -> String {
        format!("/api/v1/catalog?q={q}")
    }

    pub fn catalog_entry(id: Uuid) -> String {
        format!("/api/v1/catalog/{id}")
    }

    pub fn catalog_open(id: Uuid) -> String {
        format!("/api/v1/catalog/{id}/open")
    }

    pub fn product(id: Uuid) -> String {
        format!("/api/v1/products/{id}")
    }
}

/// Text fields of a product form. `None` leaves the field out.
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub prices: [&'a str; 3],
    pub image: Option<&'a [u8]>,
}

impl<'a> ProductFields<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            description: "Tomato sauce and mozzarella",
            prices: ["30", "42", "55,90"],
            image: Some(PNG_BYTES),
        }
    }

    fn into_form(self) -> Form {
        let mut form = Form::new()
            .text("name", self.name.to_string())
            .text("description", self.description.to_string())
            .text("price_P", self.prices[0].to_string())
            .text("price_M", self.prices[1].to_string())
            .text("price_G", self.prices[2].to_string());
        if let Some(bytes) = self.image {
            let part = Part::bytes(bytes.to_vec())
                .file_name("pizza.png")
                .mime_str("image/png")
                .expect("Failed to set MIME type");
            form = form.part("image", part);
        }
        form
    }
}

/// A running test server over in-memory collections and a temporary asset
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub catalog: Arc<MemoryCatalogStore>,
    pub orders: Arc<MemoryOrderStore>,
    pub asset_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let asset_dir = tempfile::tempdir().expect("Failed to create asset dir");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
            storage: StorageConfig {
                asset_dir: asset_dir.path().to_path_buf(),
                ..Default::default()
            },
            catalog: CatalogConfig::default(),
            orders: OrderConfig::default(),
        };

        let assets = FilesystemAssetStore::new(
            app_config.storage.asset_dir.clone(),
            app_config.catalog.max_image_bytes,
            app_config.storage.public_base_url.clone(),
        )
        .await
        .expect("Failed to create asset store");

        let catalog = Arc::new(MemoryCatalogStore::new());
        let orders = Arc::new(MemoryOrderStore::new());
        let state = AppState::new(
            app_config,
            catalog.clone(),
            orders.clone(),
            Arc::new(assets),
        );

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            catalog,
            orders,
            asset_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn token(&self, user: &User) -> String {
        jwt::sign(JWT_SECRET, user, chrono::Duration::hours(1)).expect("Failed to sign token")
    }

    pub fn admin_token(&self) -> String {
        self.token(&User::new("admin-1", "Ana", Role::Admin))
    }

    pub fn waiter_token(&self) -> String {
        self.token(&User::new("waiter-1", "Bruno", Role::Waiter))
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_product(&self, fields: ProductFields<'_>, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(routes::PRODUCTS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(fields.into_form())
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn put_product(
        &self,
        id: Uuid,
        fields: ProductFields<'_>,
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .put(self.url(&routes::product(id)))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(fields.into_form())
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Create a catalog entry as admin and return its `id`.
    pub async fn create_product(&self, name: &str) -> Uuid {
        let res = self
            .post_product(ProductFields::named(name), &self.admin_token())
            .await;
        assert_eq!(res.status, 201, "create_product failed: {}", res.text);
        res.id()
    }

    /// Number of stored image files, ignoring in-progress uploads.
    pub fn stored_asset_count(&self) -> usize {
        std::fs::read_dir(self.asset_dir.path().join("pizzas"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> Uuid {
        self.body["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("response body should contain 'id'")
    }

    /// Field names listed in a `VALIDATION_ERROR` body.
    pub fn violation_fields(&self) -> Vec<String> {
        self.body["violations"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|v| v["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
