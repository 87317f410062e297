// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Client for the SVO RESTful API.
//!
//! The API follows tastypie conventions: resources live under the base URL
//! (`dataset/`, `keyword/`, `data_location/` and one metadata resource per
//! dataset), list responses are wrapped in a `{ meta, objects }` envelope,
//! and records reference each other by `resource_uri`. Authentication is an
//! `Authorization: ApiKey username:api_key` header.

mod error;

pub use error::ApiError;

use std::path::Path;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::keywords::KeywordDefinition;

/// Page size used when walking a list resource.
const PAGE_LIMIT: usize = 100;

/// The `username:api_key` pair identifying the owner of the records.
#[derive(Debug, Clone)]
pub struct ApiAuth {
    pub username: String,
    pub api_key: String,
}

impl ApiAuth {
    /// Read the username and api key from an auth file containing a single
    /// `username:api_key` line.
    pub fn from_file(path: &Path) -> Result<ApiAuth, ApiError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ApiError::AuthFile {
            path: path.to_path_buf(),
            source,
        })?;
        let (username, api_key) =
            contents
                .trim()
                .split_once(':')
                .ok_or_else(|| ApiError::AuthFormat {
                    path: path.to_path_buf(),
                })?;
        Ok(ApiAuth {
            username: username.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn header_value(&self) -> String {
        format!("ApiKey {}:{}", self.username, self.api_key)
    }
}

/// The dataset info returned by the API. Only the fields the provider tools
/// need; the rest of the object is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub resource_uri: String,
    /// The dataset's own metadata resource.
    pub metadata: ResourceInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceInfo {
    pub resource_uri: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    meta: ListMeta,
    objects: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    next: Option<String>,
}

/// RESTful API interface for the SVO.
pub struct RestfulApi {
    client: Client,
    base_url: Url,
    auth: Option<ApiAuth>,
}

impl RestfulApi {
    /// Set up a client against `api_url`. Without auth, only reads are
    /// possible; that is enough for dry runs.
    pub fn new(api_url: &str, auth: Option<ApiAuth>) -> Result<RestfulApi, ApiError> {
        let mut base_url = Url::parse(api_url).map_err(|source| ApiError::BadUrl {
            url: api_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::NotABaseUrl {
                url: api_url.to_string(),
            });
        }
        // A trailing slash so joins append instead of replacing the last
        // path segment.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(RestfulApi {
            client: Client::new(),
            base_url,
            auth,
        })
    }

    /// Get the dataset info from the API.
    pub fn dataset(&self, dataset_name: &str) -> Result<Dataset, ApiError> {
        let url = self.endpoint(&["dataset", dataset_name]);
        let value = self.get(url.clone(), &[])?;
        serde_json::from_value(value).map_err(|source| ApiError::Structure {
            url: url.to_string(),
            source,
        })
    }

    /// The list of keyword definitions for the dataset.
    pub fn keywords(&self, dataset_name: &str) -> Result<Vec<KeywordDefinition>, ApiError> {
        let url = self.endpoint(&["keyword"]);
        let objects = self.get_all_objects(
            url.clone(),
            &[("dataset__name".to_string(), dataset_name.to_string())],
        )?;
        objects
            .into_iter()
            .map(|object| {
                serde_json::from_value(object).map_err(|source| ApiError::Structure {
                    url: url.to_string(),
                    source,
                })
            })
            .collect()
    }

    /// The metadata record with this oid, or `None` if no such exists.
    pub fn metadata(&self, dataset: &Dataset, oid: &str) -> Result<Option<Value>, ApiError> {
        let url = self.resource_url(&dataset.metadata.resource_uri)?;
        let mut page = self.get_objects_page(
            url,
            &[
                ("oid".to_string(), oid.to_string()),
                ("limit".to_string(), "1".to_string()),
            ],
        )?;
        Ok(if page.objects.is_empty() {
            None
        } else {
            Some(page.objects.swap_remove(0))
        })
    }

    /// The data_location record with this file URL, or `None` if no such
    /// exists.
    pub fn data_location(
        &self,
        dataset_name: &str,
        file_url: &str,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.endpoint(&["data_location"]);
        let mut page = self.get_objects_page(
            url,
            &[
                ("dataset__name".to_string(), dataset_name.to_string()),
                ("file_url".to_string(), file_url.to_string()),
                ("limit".to_string(), "1".to_string()),
            ],
        )?;
        Ok(if page.objects.is_empty() {
            None
        } else {
            Some(page.objects.swap_remove(0))
        })
    }

    /// Create a new metadata record for the dataset.
    pub fn create_metadata(
        &self,
        dataset: &Dataset,
        record: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let url = self.resource_url(&dataset.metadata.resource_uri)?;
        debug!("POST {url}");
        self.send(self.client.post(url).json(record))
    }

    /// Update an existing metadata record for the dataset.
    pub fn update_metadata(
        &self,
        dataset: &Dataset,
        oid: &str,
        record: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let mut url = self.resource_url(&dataset.metadata.resource_uri)?;
        {
            let mut path = url
                .path_segments_mut()
                .expect("can-be-a-base is checked at construction");
            path.pop_if_empty().push(oid).push("");
        }
        debug!("PATCH {url}");
        self.send(self.client.patch(url).json(record))
    }

    /// A resource endpoint under the base URL, with tastypie's trailing
    /// slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("can-be-a-base is checked at construction");
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
            path.push("");
        }
        url
    }

    /// Turn a `resource_uri` (an absolute path like
    /// `/service/api/svo/metadata/swap_level_1/`) into a full URL on the API
    /// host.
    fn resource_url(&self, resource_uri: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(resource_uri)
            .map_err(|source| ApiError::BadUrl {
                url: resource_uri.to_string(),
                source,
            })
    }

    fn get(&self, url: Url, query: &[(String, String)]) -> Result<Value, ApiError> {
        debug!("GET {url}");
        self.send(self.client.get(url).query(query))
    }

    fn get_objects_page(
        &self,
        url: Url,
        query: &[(String, String)],
    ) -> Result<ListResponse, ApiError> {
        let value = self.get(url.clone(), query)?;
        serde_json::from_value(value).map_err(|source| ApiError::Structure {
            url: url.to_string(),
            source,
        })
    }

    fn get_all_objects(
        &self,
        url: Url,
        query: &[(String, String)],
    ) -> Result<Vec<Value>, ApiError> {
        collect_pages(|limit, offset| {
            let mut query = query.to_vec();
            query.push(("limit".to_string(), limit.to_string()));
            query.push(("offset".to_string(), offset.to_string()));
            self.get_objects_page(url.clone(), &query)
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match &self.auth {
            Some(auth) => request.header(AUTHORIZATION, auth.header_value()),
            None => request,
        };
        let response = request.send()?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::Http { status, url, body });
        }
        if body.trim().is_empty() {
            // tastypie answers a create with an empty body and a Location
            // header unless always_return_data is set; the caller only needs
            // a JSON value.
            return Ok(json!({}));
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Json { url, source })
    }
}

/// Walk a list resource page by page, stepping the offset by the page limit
/// until `meta.next` runs out.
fn collect_pages<F>(mut fetch_page: F) -> Result<Vec<Value>, ApiError>
where
    F: FnMut(usize, usize) -> Result<ListResponse, ApiError>,
{
    let mut objects = vec![];
    let mut offset = 0;
    loop {
        let mut page = fetch_page(PAGE_LIMIT, offset)?;
        objects.append(&mut page.objects);
        if page.meta.next.is_none() {
            return Ok(objects);
        }
        offset += PAGE_LIMIT;
    }
}
