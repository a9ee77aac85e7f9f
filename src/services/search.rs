use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryQuery, SearchFilter, SearchResultSet, ServiceCategory};
use crate::services::alias;
use crate::services::catalog::CatalogProvider;

/// One aggregated search across the inventory. `categories: None` means
/// all of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub categories: Option<Vec<ServiceCategory>>,
    pub passengers: Option<i64>,
    /// Destination / primary location.
    pub location: Option<String>,
    pub from_location: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Free-text fallback when no location is given.
    pub query: Option<String>,
}

impl SearchRequest {
    pub fn from_filter(filter: &SearchFilter) -> Self {
        SearchRequest {
            categories: filter.service.map(|s| vec![s]),
            passengers: filter.passengers,
            location: filter.to.clone(),
            from_location: filter.from.clone(),
            date_from: filter.date_from,
            date_to: filter.date_to,
            query: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryFailure {
    pub category: ServiceCategory,
    pub error: String,
}

/// Every branch of the fan-out settles; successes land in `results`,
/// failures are carried separately instead of being swallowed. A failed
/// category shows up as an empty sequence in `results.by_category`.
#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub results: SearchResultSet,
    pub failures: Vec<CategoryFailure>,
}

pub async fn search_all(
    catalog: &dyn CatalogProvider,
    request: &SearchRequest,
    limit: i64,
) -> SearchOutcome {
    let categories: Vec<ServiceCategory> = request
        .categories
        .clone()
        .unwrap_or_else(|| ServiceCategory::ALL.to_vec());

    let query = CategoryQuery {
        passengers: request.passengers,
        location_terms: request
            .location
            .as_deref()
            .map(alias::expand)
            .unwrap_or_default(),
        from_terms: request
            .from_location
            .as_deref()
            .map(alias::expand)
            .unwrap_or_default(),
        date_from: request.date_from,
        date_to: request.date_to,
        text: request.query.clone(),
        limit,
    };

    // Fan out one query per category and settle them all; no branch can
    // cancel or abort a sibling.
    let branches = categories.iter().map(|&category| {
        let query = &query;
        async move { (category, catalog.search(category, query).await) }
    });
    let settled = join_all(branches).await;

    let mut outcome = SearchOutcome {
        results: SearchResultSet::default(),
        failures: vec![],
    };

    for (category, result) in settled {
        match result {
            Ok(records) => {
                outcome.results.total_count += records.len();
                outcome.results.by_category.insert(category, records);
            }
            Err(e) => {
                tracing::error!(category = category.as_str(), error = %e, "category search failed");
                outcome.results.by_category.insert(category, vec![]);
                outcome.failures.push(CategoryFailure {
                    category,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceRecord;
    use crate::services::catalog::CatalogProvider;
    use async_trait::async_trait;

    /// Catalog that returns a fixed number of records per category and
    /// fails outright for one of them.
    struct FlakyCatalog {
        failing: ServiceCategory,
    }

    fn record(category: ServiceCategory, id: &str) -> ServiceRecord {
        ServiceRecord {
            id: id.to_string(),
            title: format!("{} {id}", category.as_str()),
            subtitle: None,
            price: Some(1000.0),
            currency: "USD".to_string(),
            images: vec![],
            type_tag: category,
        }
    }

    #[async_trait]
    impl CatalogProvider for FlakyCatalog {
        async fn search(
            &self,
            category: ServiceCategory,
            _query: &CategoryQuery,
        ) -> anyhow::Result<Vec<ServiceRecord>> {
            if category == self.failing {
                anyhow::bail!("table unreachable");
            }
            Ok(vec![
                record(category, "a"),
                record(category, "b"),
            ])
        }
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let catalog = FlakyCatalog {
            failing: ServiceCategory::Yacht,
        };
        let outcome = search_all(&catalog, &SearchRequest::default(), 10).await;

        // 6 categories, one failing: total counts only the successes
        assert_eq!(outcome.results.total_count, 10);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].category, ServiceCategory::Yacht);

        // The failed category is present and empty, not missing
        let yachts = outcome
            .results
            .by_category
            .get(&ServiceCategory::Yacht)
            .unwrap();
        assert!(yachts.is_empty());
    }

    #[tokio::test]
    async fn test_category_subset_restricts_fanout() {
        let catalog = FlakyCatalog {
            failing: ServiceCategory::Yacht,
        };
        let request = SearchRequest {
            categories: Some(vec![ServiceCategory::Jet, ServiceCategory::EmptyLeg]),
            ..Default::default()
        };
        let outcome = search_all(&catalog, &request, 10).await;

        assert_eq!(outcome.results.total_count, 4);
        assert_eq!(outcome.results.by_category.len(), 2);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_request_from_filter_maps_route() {
        let filter = SearchFilter {
            service: Some(ServiceCategory::EmptyLeg),
            from: Some("Nice".to_string()),
            to: Some("Dubai".to_string()),
            passengers: Some(4),
            ..Default::default()
        };
        let request = SearchRequest::from_filter(&filter);
        assert_eq!(request.categories, Some(vec![ServiceCategory::EmptyLeg]));
        assert_eq!(request.location.as_deref(), Some("Dubai"));
        assert_eq!(request.from_location.as_deref(), Some("Nice"));
        assert_eq!(request.passengers, Some(4));
    }
}
