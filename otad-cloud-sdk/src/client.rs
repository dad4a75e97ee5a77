// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::{api, Error, Result};
use reqwest::{header, StatusCode};
use slog_scope::{debug, error};
use std::path::Path;
use tokio::{fs, io};

pub struct Client<'a> {
    client: reqwest::Client,
    server: &'a str,
}

/// Streams a successful response body into `sink`.
async fn save_body_to<W>(mut resp: reqwest::Response, sink: &mut W) -> Result<()>
where
    W: io::AsyncWrite + Unpin,
{
    use io::AsyncWriteExt;

    ensure_success(&resp)?;
    let mut received = 0;
    while let Some(chunk) = resp.chunk().await? {
        sink.write_all(&chunk).await?;
        received += chunk.len();
    }
    sink.flush().await?;
    debug!("{} bytes received", received);

    Ok(())
}

fn ensure_success(resp: &reqwest::Response) -> Result<()> {
    match resp.status() {
        s if s.is_success() => Ok(()),
        s => Err(Error::InvalidStatusResponse(s)),
    }
}

impl<'a> Client<'a> {
    pub fn new(server: &'a str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static("otad/0.1 Linux"));
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        headers.insert(
            "api-content-type",
            header::HeaderValue::from_static("application/vnd.otad-v1+json"),
        );

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self { server, client })
    }

    /// Joins `path` to the server address, which must be a valid url.
    fn endpoint(&self, path: &str) -> Result<String> {
        url::Url::parse(self.server)?;
        Ok(format!("{}/{}", self.server.trim_end_matches('/'), path))
    }

    pub async fn probe(
        &self,
        num_retries: usize,
        firmware: api::FirmwareMetadata<'_>,
    ) -> Result<api::ProbeResponse> {
        let response = self
            .client
            .post(self.endpoint("upgrades")?)
            .header("api-retries", num_retries.to_string())
            .json(&firmware)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(api::ProbeResponse::NoUpdate),
            StatusCode::OK => {
                match response
                    .headers()
                    .get("add-extra-poll")
                    .and_then(|extra_poll| extra_poll.to_str().ok())
                    .and_then(|extra_poll| extra_poll.parse().ok())
                {
                    Some(extra_poll) => Ok(api::ProbeResponse::ExtraPoll(extra_poll)),
                    None => Ok(api::ProbeResponse::Update(api::UpdatePackage::parse(
                        &response.bytes().await?,
                    )?)),
                }
            }
            s => Err(Error::InvalidStatusResponse(s)),
        }
    }

    /// Downloads the object into `download_dir`, resuming from the
    /// length of any partial file already present there.
    pub async fn download_object(
        &self,
        product_uid: &str,
        package_uid: &str,
        download_dir: &Path,
        object: &str,
    ) -> Result<()> {
        let mut request = self.client.get(self.endpoint(&format!(
            "products/{}/packages/{}/objects/{}",
            product_uid, package_uid, object
        ))?);

        if !download_dir.exists() {
            fs::create_dir_all(download_dir).await.map_err(|e| {
                error!("fail to create {:?} directory, error: {}", download_dir, e);
                e
            })?;
        }

        let file = download_dir.join(object);
        if file.exists() {
            request = request.header(header::RANGE, format!("bytes={}-", file.metadata()?.len()));
        }

        let mut file = fs::OpenOptions::new().create(true).append(true).open(&file).await?;

        save_body_to(request.send().await?, &mut file).await
    }

    pub async fn report(
        &self,
        state: &str,
        firmware: api::FirmwareMetadata<'_>,
        package_uid: Option<&str>,
        error_message: Option<String>,
    ) -> Result<()> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "kebab-case")]
        struct Payload<'a> {
            #[serde(rename = "status")]
            state: &'a str,
            #[serde(flatten)]
            firmware: api::FirmwareMetadata<'a>,
            #[serde(skip_serializing_if = "Option::is_none")]
            package_uid: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error_message: Option<String>,
        }

        let payload = Payload { state, firmware, package_uid, error_message };

        let response = self.client.post(self.endpoint("report")?).json(&payload).send().await?;
        ensure_success(&response)
    }
}
