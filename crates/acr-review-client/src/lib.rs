use std::{ops::Deref, sync::Arc};

use http::{HttpReviewGateway, HttpReviewGatewayOptions};
use traits::ReviewGateway;

pub mod errors;
pub mod http;
pub mod models;
pub mod traits;
mod validation;

pub use reqwest::StatusCode;
pub use validation::{validate_field, FieldError, ValidationErrors};

#[derive(Clone)]
pub struct ReviewClient {
    gateway: Arc<dyn ReviewGateway>,
}

impl ReviewClient {
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self { gateway }
    }

    pub fn http(options: HttpReviewGatewayOptions) -> anyhow::Result<Self> {
        let http = Arc::new(HttpReviewGateway::new(options)?);

        Ok(Self { gateway: http })
    }
}

impl Deref for ReviewClient {
    type Target = Arc<dyn ReviewGateway>;

    fn deref(&self) -> &Self::Target {
        &self.gateway
    }
}
