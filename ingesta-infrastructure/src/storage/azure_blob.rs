use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use sha2::Sha256;

use ingesta_domain::ports::RawStorageWriter;
use ingesta_domain::{StorageError, StorageKey, StorageSettings};

type HmacSha256 = Hmac<Sha256>;

const BLOB_API_VERSION: &str = "2021-08-06";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Writes RAW documents as block blobs through the Azure Blob REST API,
/// authorized with the storage account shared key.
pub struct AzureBlobWriter {
    client: Client,
    account_name: String,
    account_key: Vec<u8>,
    container: String,
    endpoint: String,
    timeout_seconds: u64,
}

impl AzureBlobWriter {
    pub fn new(settings: &StorageSettings) -> Result<Self> {
        let account_name = settings
            .account_name
            .clone()
            .ok_or_else(|| anyhow!("storage account name is not configured"))?;
        let encoded_key = settings
            .account_key
            .as_deref()
            .ok_or_else(|| anyhow!("storage account key is not configured"))?;
        let account_key = STANDARD
            .decode(encoded_key.trim())
            .map_err(|_| anyhow!("storage account key is not valid base64"))?;
        let endpoint = settings
            .endpoint
            .as_deref()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}.blob.core.windows.net", account_name));
        Url::parse(&endpoint).map_err(|err| anyhow!("invalid storage endpoint: {}", err))?;

        let timeout_seconds = settings.request_timeout_seconds.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            account_name,
            account_key,
            container: settings.container_name.clone(),
            endpoint,
            timeout_seconds,
        })
    }

    fn blob_url(&self, key: &StorageKey) -> Result<Url, StorageError> {
        let raw = format!("{}/{}/{}", self.endpoint, self.container, key);
        Url::parse(&raw).map_err(|err| StorageError::Io(format!("invalid blob url: {}", err)))
    }

    fn authorization(&self, string_to_sign: &str) -> Result<String, StorageError> {
        let signature = sign(&self.account_key, string_to_sign)?;
        Ok(format!("SharedKey {}:{}", self.account_name, signature))
    }
}

#[async_trait]
impl RawStorageWriter for AzureBlobWriter {
    async fn write(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        overwrite: bool,
    ) -> Result<(), StorageError> {
        let url = self.blob_url(key)?;
        let ms_date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let if_none_match = if overwrite { None } else { Some("*") };
        let resource = canonicalized_resource(&self.account_name, &url);
        let to_sign = string_to_sign(bytes.len(), if_none_match, &ms_date, &resource);
        let authorization = self.authorization(&to_sign)?;

        let mut request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &ms_date)
            .header("x-ms-version", BLOB_API_VERSION)
            .header(AUTHORIZATION, authorization);
        if let Some(value) = if_none_match {
            request = request.header("If-None-Match", value);
        }

        let response = request.body(bytes).send().await.map_err(|err| {
            if err.is_timeout() {
                StorageError::Timeout(self.timeout_seconds)
            } else {
                StorageError::Transport(err.without_url().to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if !overwrite && (status == StatusCode::CONFLICT || status == StatusCode::PRECONDITION_FAILED)
        {
            return Err(StorageError::Conflict(key.to_string()));
        }
        // Only the error code is kept: Azure echoes the string-to-sign in
        // authentication failure bodies.
        let code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(StorageError::Backend {
            status: status.as_u16(),
            message: code,
        })
    }

    fn describe(&self) -> String {
        format!("azure://{}/{}", self.account_name, self.container)
    }
}

/// `/<account><url path>`; the path already carries the container.
fn canonicalized_resource(account_name: &str, url: &Url) -> String {
    format!("/{}{}", account_name, url.path())
}

fn canonicalized_headers(ms_date: &str) -> String {
    format!(
        "x-ms-blob-type:BlockBlob\nx-ms-date:{}\nx-ms-version:{}\n",
        ms_date, BLOB_API_VERSION
    )
}

/// Shared Key string-to-sign for a Put Blob request. Standard headers that
/// are not sent stay as empty lines; a zero content length is left empty.
fn string_to_sign(
    content_length: usize,
    if_none_match: Option<&str>,
    ms_date: &str,
    canonicalized_resource: &str,
) -> String {
    let content_length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };
    format!(
        "PUT\n\n\n{}\n\n{}\n\n\n\n{}\n\n\n{}{}",
        content_length,
        JSON_CONTENT_TYPE,
        if_none_match.unwrap_or(""),
        canonicalized_headers(ms_date),
        canonicalized_resource
    )
}

fn sign(account_key: &[u8], string_to_sign: &str) -> Result<String, StorageError> {
    let mut mac = HmacSha256::new_from_slice(account_key)
        .map_err(|_| StorageError::Io("invalid storage account key length".to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
