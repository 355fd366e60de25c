//! The three read-only endpoints the crime query workflow uses.
//!
//! See <https://data.police.uk/docs/>

use police_data_models::{
    CategoryMap, CrimeCategory, CrimeRecord, ForceMap, PoliceForce, ReferenceMonth,
};
use serde::de::DeserializeOwned;

use crate::{ApiError, HostClient};

/// Parameters of a `crimes-no-location` search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrimeQuery {
    /// Month the crimes were recorded in.
    pub month: ReferenceMonth,
    /// Category slug, e.g. `"burglary"`.
    pub category: String,
    /// Force id, e.g. `"leicestershire"`.
    pub force: String,
}

/// Fetches the crime categories valid for `month`.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, a non-2xx status, or a body
/// that is not an array of `{url, name}` objects.
pub async fn fetch_categories(
    client: &dyn HostClient,
    month: ReferenceMonth,
) -> Result<CategoryMap, ApiError> {
    let body = client
        .get_json("crime-categories", &[("date", month.to_string())])
        .await?;
    let categories = parse_categories(body)?;
    log::info!("Fetched {} crime categories for {month}", categories.len());
    Ok(categories)
}

/// Fetches every police force.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, a non-2xx status, or a body
/// that is not an array of `{id, name}` objects.
pub async fn fetch_forces(client: &dyn HostClient) -> Result<ForceMap, ApiError> {
    let body = client.get_json("forces", &[]).await?;
    let forces = parse_forces(body)?;
    log::info!("Fetched {} police forces", forces.len());
    Ok(forces)
}

/// Fetches crimes without a location for a category, month, and force.
///
/// An empty array is a successful result, not an error.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, a non-2xx status, or a
/// malformed body.
pub async fn search_crimes(
    client: &dyn HostClient,
    query: &CrimeQuery,
) -> Result<Vec<CrimeRecord>, ApiError> {
    let body = client
        .get_json(
            "crimes-no-location",
            &[
                ("category", query.category.clone()),
                ("date", query.month.to_string()),
                ("force", query.force.clone()),
            ],
        )
        .await?;
    let records: Vec<CrimeRecord> = parse_array(body, "crimes-no-location")?;
    log::info!(
        "Fetched {} {} records for {} in {}",
        records.len(),
        query.category,
        query.force,
        query.month
    );
    Ok(records)
}

/// Converts a `crime-categories` body into a slug-to-label map.
///
/// Later entries win when a slug repeats.
///
/// # Errors
///
/// Returns [`ApiError`] if the body is not an array of categories.
pub fn parse_categories(body: serde_json::Value) -> Result<CategoryMap, ApiError> {
    let categories: Vec<CrimeCategory> = parse_array(body, "crime-categories")?;
    Ok(categories.into_iter().map(|c| (c.slug, c.name)).collect())
}

/// Converts a `forces` body into an id-to-label map.
///
/// # Errors
///
/// Returns [`ApiError`] if the body is not an array of forces.
pub fn parse_forces(body: serde_json::Value) -> Result<ForceMap, ApiError> {
    let forces: Vec<PoliceForce> = parse_array(body, "forces")?;
    Ok(forces.into_iter().map(|f| (f.id, f.name)).collect())
}

fn parse_array<T: DeserializeOwned>(
    body: serde_json::Value,
    endpoint: &str,
) -> Result<Vec<T>, ApiError> {
    let serde_json::Value::Array(items) = body else {
        return Err(ApiError::Parse {
            message: format!("{endpoint} response is not an array"),
        });
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::PanelSize;

    /// Serves one canned body and records what was requested.
    struct CannedHost {
        body: serde_json::Value,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl CannedHost {
        fn new(body: serde_json::Value) -> Self {
            Self {
                body,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HostClient for CannedHost {
        async fn get_json(
            &self,
            path: &str,
            query: &[(&str, String)],
        ) -> Result<serde_json::Value, ApiError> {
            self.requests.lock().unwrap().push((
                path.to_string(),
                query
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
            ));
            Ok(self.body.clone())
        }

        fn resize(&self, _size: &PanelSize) {}
    }

    #[test]
    fn categories_keyed_by_slug() {
        let map = parse_categories(serde_json::json!([
            {"url": "all-crime", "name": "All crime"},
            {"url": "burglary", "name": "Burglary"}
        ]))
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["burglary"], "Burglary");
    }

    #[test]
    fn duplicate_category_slug_last_write_wins() {
        let map = parse_categories(serde_json::json!([
            {"url": "burglary", "name": "Burglary"},
            {"url": "drugs", "name": "Drugs"},
            {"url": "burglary", "name": "Burglary (revised)"}
        ]))
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["burglary"], "Burglary (revised)");
    }

    #[test]
    fn non_array_body_is_parse_error() {
        let err = parse_forces(serde_json::json!({"error": "nope"})).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn wrong_item_shape_is_json_error() {
        let err = parse_forces(serde_json::json!([{"name": "No id"}])).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_categories_sends_month() {
        let host = CannedHost::new(serde_json::json!([{"url": "burglary", "name": "Burglary"}]));
        let month = ReferenceMonth::new(2024, 1).unwrap();
        let map = fetch_categories(&host, month).await.unwrap();
        assert_eq!(map.len(), 1);

        let requests = host.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "crime-categories");
        assert_eq!(
            requests[0].1,
            vec![("date".to_string(), "2024-01".to_string())]
        );
    }

    #[tokio::test]
    async fn search_sends_all_three_parameters() {
        let host = CannedHost::new(serde_json::json!([]));
        let query = CrimeQuery {
            month: ReferenceMonth::new(2024, 3).unwrap(),
            category: "burglary".to_string(),
            force: "leicestershire".to_string(),
        };
        let records = search_crimes(&host, &query).await.unwrap();
        assert!(records.is_empty());

        let requests = host.requests.lock().unwrap();
        assert_eq!(requests[0].0, "crimes-no-location");
        assert_eq!(
            requests[0].1,
            vec![
                ("category".to_string(), "burglary".to_string()),
                ("date".to_string(), "2024-03".to_string()),
                ("force".to_string(), "leicestershire".to_string()),
            ]
        );
    }
}
