// Copyright (C) 2020 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use crate::firmware::Metadata;
use async_trait::async_trait;
use cloud::api::ProbeResponse;
use std::path::Path;

/// Server operations the state machine depends on.
#[async_trait(?Send)]
pub(crate) trait Api {
    async fn probe(&self, retries: usize, firmware: &Metadata) -> cloud::Result<ProbeResponse>;

    async fn download_object(
        &self,
        product_uid: &str,
        package_uid: &str,
        download_dir: &Path,
        object: &str,
    ) -> cloud::Result<()>;

    async fn report(
        &self,
        state: &str,
        firmware: &Metadata,
        package_uid: Option<&str>,
        error_message: Option<String>,
    ) -> cloud::Result<()>;
}

pub(crate) struct CloudApi {
    server_address: String,
}

impl CloudApi {
    pub(crate) fn new(server_address: &str) -> Self {
        CloudApi { server_address: server_address.to_owned() }
    }
}

#[async_trait(?Send)]
impl Api for CloudApi {
    async fn probe(&self, retries: usize, firmware: &Metadata) -> cloud::Result<ProbeResponse> {
        cloud::Client::new(&self.server_address)?
            .probe(retries, firmware.as_cloud_metadata())
            .await
    }

    async fn download_object(
        &self,
        product_uid: &str,
        package_uid: &str,
        download_dir: &Path,
        object: &str,
    ) -> cloud::Result<()> {
        cloud::Client::new(&self.server_address)?
            .download_object(product_uid, package_uid, download_dir, object)
            .await
    }

    async fn report(
        &self,
        state: &str,
        firmware: &Metadata,
        package_uid: Option<&str>,
        error_message: Option<String>,
    ) -> cloud::Result<()> {
        cloud::Client::new(&self.server_address)?
            .report(state, firmware.as_cloud_metadata(), package_uid, error_message)
            .await
    }
}
