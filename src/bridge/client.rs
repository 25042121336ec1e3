/// HTTP access to the Meteobridge template endpoint
use log::{debug, error};
use url::Url;

use crate::bridge::template::TemplateCatalog;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::models::BridgeResponse;

const TEMPLATE_PATH: &str = "/cgi-bin/template.cgi";

/// Build `http://<address>/cgi-bin/template.cgi?template=<query>`
pub fn template_url(address: &str, catalog: &TemplateCatalog) -> Result<Url> {
    let mut url = Url::parse(&format!("http://{}{}", address, TEMPLATE_PATH)).map_err(|e| {
        BridgeError::Configuration(format!("invalid Meteobridge address '{}': {}", address, e))
    })?;
    url.set_query(Some(&format!("template={}", catalog.build_query())));
    Ok(url)
}

#[derive(Debug)]
pub struct BridgeClient {
    client: reqwest::Client,
    url: Url,
    username: String,
    password: String,
}

impl BridgeClient {
    /// Fails with a configuration error when address or password is missing
    pub fn new(config: &BridgeConfig, catalog: &TemplateCatalog) -> Result<Self> {
        let (address, password) = config.credentials()?;
        let url = template_url(address, catalog)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .no_proxy()
            .build()?;

        Ok(BridgeClient {
            client,
            url,
            username: config.username.clone(),
            password: password.to_string(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Run one template query
    ///
    /// Only a 200 answer is handed back; timeouts, connection failures and
    /// any other status end the cycle here.
    pub async fn fetch(&self) -> Result<BridgeResponse> {
        debug!("Querying Meteobridge: {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| {
                error!("Unable to connect to your Meteobridge device: {}", e);
                BridgeError::Transport(e)
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            error!("Unable to connect to your Meteobridge device: HTTP {}", status);
            return Err(BridgeError::HttpStatus(status));
        }

        let body = response.text().await?;
        debug!("Meteobridge data: {}, status: {}", body, status);

        Ok(BridgeResponse { status, body })
    }
}
