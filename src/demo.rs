//! Bundled demo application: a small shop wired from services, repositories and clients

/// Default configuration for `archscope demo`
pub const DEMO_CONFIG: &str = r##"
configuration:
  pkgs: ["archscope::demo"]
rules:
  - name_regexp: "^(\\w*)Service$"
    component:
      name: "{0} Service"
      technology: Rust
      tags: [SERVICE]
  - pkg_regexps: ["::storage$"]
    name_regexp: "^(\\w*)Repository$"
    component:
      name: "{0} Store"
      technology: PostgreSQL
      tags: [DB]
  - pkg_regexps: ["::billing$"]
    name_regexp: "^(\\w*)Client$"
    component:
      name: "{0} API"
      technology: HTTP
      tags: [EXTERNAL]
view:
  title: Demo Shop
  line_color: "#4a4a4a"
  styles:
    - id: ROOT
      background_color: "#1d3557"
      font_color: "#ffffff"
      border_color: "#1d3557"
    - id: SERVICE
      background_color: "#a8dadc"
    - id: DB
      background_color: "#f1faee"
      shape: database
    - id: EXTERNAL
      background_color: "#e63946"
      font_color: "#ffffff"
      shape: cloud
  root_component_tags: [ROOT]
"##;

pub mod shop {
    use super::billing::{PaymentGateway, StripeClient};
    use super::storage::{CatalogRepository, OrderRepository};
    use scrape::{HasInfo, Info, Scrape};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, Weak};

    #[derive(Scrape)]
    #[scrape(info)]
    pub struct Shop {
        pub orders: OrderService,
        pub catalog: Arc<CatalogService>,
        pub payments: Box<dyn PaymentGateway>,
        pub audit: Option<AuditService>,
        pub settings: Settings,
    }

    impl HasInfo for Shop {
        fn info(&self) -> Info {
            Info::component("Shop")
                .with_description("storefront entry point")
                .with_technology("Rust")
                .with_tag("ROOT")
        }
    }

    #[derive(Scrape)]
    pub struct OrderService {
        pub repository: Arc<Mutex<OrderRepository>>,
        pub catalog: Weak<CatalogService>,
    }

    #[derive(Scrape)]
    pub struct CatalogService {
        pub repository: CatalogRepository,
        pub cache: HashMap<String, Product>,
    }

    /// Disabled by default; still shows up through its declared type
    #[derive(Scrape, Default)]
    #[scrape(zeroed)]
    pub struct AuditService {
        pub sink: Vec<String>,
    }

    #[derive(Scrape)]
    pub struct Settings {
        pub retries: u32,
        pub currency: String,
    }

    #[derive(Scrape)]
    pub struct Product {
        pub sku: String,
        pub price_cents: u64,
    }

    pub fn build() -> Shop {
        let mut cache = HashMap::new();
        cache.insert(
            "tea".to_string(),
            Product {
                sku: "tea".to_string(),
                price_cents: 450,
            },
        );
        let catalog = Arc::new(CatalogService {
            repository: CatalogRepository {
                table: "products".to_string(),
            },
            cache,
        });

        Shop {
            orders: OrderService {
                repository: Arc::new(Mutex::new(OrderRepository {
                    table: "orders".to_string(),
                })),
                catalog: Arc::downgrade(&catalog),
            },
            catalog,
            payments: Box::new(StripeClient {
                endpoint: "https://api.stripe.example".to_string(),
            }),
            audit: None,
            settings: Settings {
                retries: 3,
                currency: "EUR".to_string(),
            },
        }
    }
}

pub mod storage {
    use scrape::Scrape;

    #[derive(Scrape)]
    pub struct OrderRepository {
        pub table: String,
    }

    #[derive(Scrape)]
    pub struct CatalogRepository {
        pub table: String,
    }
}

pub mod billing {
    use scrape::Scrape;

    pub trait PaymentGateway: Scrape {}

    scrape::interface!(PaymentGateway);

    #[derive(Scrape)]
    pub struct StripeClient {
        pub endpoint: String,
    }

    impl PaymentGateway for StripeClient {}
}
