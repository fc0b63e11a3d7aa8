//! Macro-generated test suite for the `FoodApi` contract.
//!
//! The `food_api_tests!` macro generates a test module that validates any
//! `FoodApi` implementation: CRUD against the remote collection, local search,
//! 404 handling, cancellation and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod api_harness;
//!
//! use api_harness::*;
//!
//! async fn in_memory_api() -> InMemoryFoodApi {
//!     InMemoryFoodApi::new()
//! }
//!
//! food_api_tests!(in_memory_api());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_list_empty`: list on an empty collection returns an empty vec
//! - `test_create_round_trips_fields`: created record comes back from list
//! - `test_create_assigns_distinct_ids`: every create gets its own id
//! - `test_update_existing`: update is visible on the next list
//! - `test_update_nonexistent`: unknown id is a 404 transport error
//! - `test_delete_existing`: deleted id no longer listed
//! - `test_delete_twice`: second delete is a 404, the rest is untouched
//!
//! ## Search
//! - `test_search_matches_food_name`
//! - `test_search_matches_restaurant_name`
//! - `test_search_empty_query_returns_all`
//!
//! ## Edge Cases
//! - `test_cancelled_before_send`: a fired token short-circuits the call
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a `FoodApi` conformance test suite.
///
/// `$factory` must be a future resolving to a fresh, empty implementation.
/// It is re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! food_api_tests {
    ($factory:expr) => {
        mod food_api_contract_tests {
            use super::*;
            use foodwagen::core::{CancelToken, FoodApi, RestaurantStatus, search};
            use std::sync::Arc;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let api = $factory.await;
                let all = api.list(&CancelToken::new()).await.unwrap();
                assert!(all.is_empty(), "List on empty collection should be empty");
            }

            #[tokio::test]
            async fn test_create_round_trips_fields() {
                let api = $factory.await;
                let cancel = CancelToken::new();

                let created = api
                    .create(&test_payload("Beef Burger", "Burger Palace"), &cancel)
                    .await
                    .unwrap();
                assert!(!created.id.is_empty());
                assert_eq!(created.name, "Beef Burger");

                let all = api.list(&cancel).await.unwrap();
                assert_eq!(all.len(), 1);
                let food = &all[0];
                assert_eq!(food.id, created.id);
                assert_eq!(food.name, "Beef Burger");
                assert!((food.rating - 4.5).abs() < f64::EPSILON);
                assert_eq!(food.price, Some(8.99));
                assert_eq!(food.image, FOOD_IMAGE);
                assert_eq!(food.restaurant.name, "Burger Palace");
                assert_eq!(food.restaurant.logo, RESTAURANT_LOGO);
                assert_eq!(food.restaurant.status, RestaurantStatus::OpenNow);
                assert!(food.created_at.is_some());
            }

            #[tokio::test]
            async fn test_create_assigns_distinct_ids() {
                let api = $factory.await;
                let cancel = CancelToken::new();

                let a = api.create(&test_payload("A", "R"), &cancel).await.unwrap();
                let b = api.create(&test_payload("B", "R"), &cancel).await.unwrap();
                assert_ne!(a.id, b.id);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let api = $factory.await;
                let cancel = CancelToken::new();
                let created = api
                    .create(&test_payload("Beef Burger", "Burger Palace"), &cancel)
                    .await
                    .unwrap();

                let mut payload = test_payload("Cheese Burger", "Burger Palace");
                payload.status = RestaurantStatus::Closed;
                payload.price = "9.50".to_string();
                let updated = api.update(&created.id, &payload, &cancel).await.unwrap();
                assert_eq!(updated.id, created.id);
                assert_eq!(updated.name, "Cheese Burger");

                let all = api.list(&cancel).await.unwrap();
                assert_eq!(all[0].name, "Cheese Burger");
                assert_eq!(all[0].price, Some(9.5));
                assert_eq!(all[0].restaurant.status, RestaurantStatus::Closed);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let api = $factory.await;
                let err = api
                    .update("9999", &test_payload("Ghost", "Nowhere"), &CancelToken::new())
                    .await
                    .unwrap_err();
                assert!(err.is_transport());
                assert_eq!(err.status(), Some(404));
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let api = $factory.await;
                let cancel = CancelToken::new();
                let keep = api.create(&test_payload("Keep", "R"), &cancel).await.unwrap();
                let gone = api.create(&test_payload("Gone", "R"), &cancel).await.unwrap();

                api.delete(&gone.id, &cancel).await.unwrap();

                let ids: Vec<String> = api
                    .list(&cancel)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|f| f.id)
                    .collect();
                assert_eq!(ids, vec![keep.id]);
            }

            #[tokio::test]
            async fn test_delete_twice() {
                let api = $factory.await;
                let cancel = CancelToken::new();
                let food = api.create(&test_payload("Once", "R"), &cancel).await.unwrap();
                api.create(&test_payload("Other", "R"), &cancel).await.unwrap();

                api.delete(&food.id, &cancel).await.unwrap();
                let err = api.delete(&food.id, &cancel).await.unwrap_err();
                assert_eq!(err.status(), Some(404));

                let all = api.list(&cancel).await.unwrap();
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].name, "Other");
            }

            // ==================================================================
            // Search
            // ==================================================================

            async fn seeded() -> impl FoodApi {
                let api = $factory.await;
                let cancel = CancelToken::new();
                api.create(&test_payload("Pepperoni Pizza", "Pizza House"), &cancel)
                    .await
                    .unwrap();
                api.create(&test_payload("Caesar Salad", "Fresh & Green"), &cancel)
                    .await
                    .unwrap();
                api
            }

            #[tokio::test]
            async fn test_search_matches_food_name() {
                let api = seeded().await;
                let found = search(&api, "pizza", &CancelToken::new()).await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Pepperoni Pizza");
            }

            #[tokio::test]
            async fn test_search_matches_restaurant_name() {
                let api = seeded().await;
                let found = search(&api, "GREEN", &CancelToken::new()).await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Caesar Salad");
            }

            #[tokio::test]
            async fn test_search_empty_query_returns_all() {
                let api = seeded().await;
                let cancel = CancelToken::new();
                assert_eq!(search(&api, "", &cancel).await.unwrap().len(), 2);
                assert_eq!(search(&api, "   ", &cancel).await.unwrap().len(), 2);
                assert!(search(&api, "sushi", &cancel).await.unwrap().is_empty());
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_cancelled_before_send() {
                let api = $factory.await;
                let cancel = CancelToken::new();
                cancel.cancel();

                let err = api
                    .create(&test_payload("Never", "Sent"), &cancel)
                    .await
                    .unwrap_err();
                assert!(err.is_cancelled());

                let all = api.list(&CancelToken::new()).await.unwrap();
                assert!(all.is_empty(), "Cancelled create must not reach the store");
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let api = Arc::new($factory.await);
                let mut handles = Vec::new();

                for i in 0..10 {
                    let api = Arc::clone(&api);
                    handles.push(tokio::spawn(async move {
                        api.create(&test_payload(&format!("Meal {}", i), "R"), &CancelToken::new())
                            .await
                            .unwrap()
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap().id);
                }
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), 10, "Every create should get a unique id");

                let all = api.list(&CancelToken::new()).await.unwrap();
                assert_eq!(all.len(), 10);
            }
        }
    };
}
