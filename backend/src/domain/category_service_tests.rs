//! Tests for the category service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{ListCacheError, MockCategoryRepository, MockListCache};

fn electronics() -> CategoryName {
    CategoryName::new("Electronics").expect("valid name")
}

fn stored(id: i64) -> Category {
    Category {
        id: CategoryId::new(id),
        name: electronics(),
    }
}

#[fixture]
fn quiet_cache() -> MockListCache {
    let mut cache = MockListCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_put().returning(|_, _, _| Ok(()));
    cache.expect_invalidate().returning(|_| Ok(()));
    cache
}

fn service(repo: MockCategoryRepository, cache: MockListCache) -> CategoryService {
    CategoryService::new(Arc::new(repo), ReadThroughCache::new(Arc::new(cache)))
}

#[rstest]
#[tokio::test]
async fn create_persists_unique_name_and_invalidates_listings() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_name_exists()
        .withf(|name, excluding| name.to_string() == "Electronics" && excluding.is_none())
        .times(1)
        .return_once(|_, _| Ok(false));
    repo.expect_create()
        .times(1)
        .return_once(|_| Ok(stored(1)));

    let mut cache = MockListCache::new();
    cache.expect_invalidate().times(2).returning(|_| Ok(()));

    let created = service(repo, cache)
        .create(electronics())
        .await
        .expect("create succeeds");

    assert_eq!(created.id, CategoryId::new(1));
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_without_writing(quiet_cache: MockListCache) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_name_exists().return_once(|_, _| Ok(true));
    repo.expect_create().never();

    let error = service(repo, quiet_cache)
        .create(electronics())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Duplicate);
    let fields = error.field_errors().expect("field errors present");
    assert_eq!(fields.get("name"), Some("name must be unique"));
}

#[rstest]
#[tokio::test]
async fn create_maps_racing_unique_violation_to_duplicate(quiet_cache: MockListCache) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_name_exists().return_once(|_, _| Ok(false));
    repo.expect_create()
        .return_once(|_| Err(CategoryRepositoryError::duplicate_name("Electronics")));

    let error = service(repo, quiet_cache)
        .create(electronics())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Duplicate);
}

#[rstest]
#[tokio::test]
async fn list_is_served_from_cache_when_warm() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_list_all().never();

    let payload = serde_json::to_string(&vec![stored(4)]).expect("encode");
    let mut cache = MockListCache::new();
    cache
        .expect_get()
        .with(eq(ListCacheKey::Categories))
        .return_once(move |_| Ok(Some(payload)));

    let listed = service(repo, cache).list().await.expect("list succeeds");

    assert_eq!(listed, vec![stored(4)]);
}

#[rstest]
#[tokio::test]
async fn list_falls_back_to_storage_when_cache_fails() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_list_all()
        .times(1)
        .return_once(|| Ok(vec![stored(1)]));

    let mut cache = MockListCache::new();
    cache
        .expect_get()
        .return_once(|_| Err(ListCacheError::backend("refused")));
    cache
        .expect_put()
        .return_once(|_, _, _| Err(ListCacheError::backend("refused")));

    let listed = service(repo, cache).list().await.expect("list succeeds");

    assert_eq!(listed, vec![stored(1)]);
}

#[rstest]
#[tokio::test]
async fn get_missing_category_is_not_found(quiet_cache: MockListCache) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo, quiet_cache)
        .get(CategoryId::new(9))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Category not found");
}

#[rstest]
#[tokio::test]
async fn update_checks_uniqueness_excluding_self(quiet_cache: MockListCache) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(Some(stored(3))));
    repo.expect_name_exists()
        .withf(|_, excluding| *excluding == Some(CategoryId::new(3)))
        .times(1)
        .return_once(|_, _| Ok(false));
    repo.expect_update()
        .with(eq(CategoryId::new(3)), mockall::predicate::always())
        .return_once(|_, _| Ok(Some(stored(3))));

    let updated = service(repo, quiet_cache)
        .update(CategoryId::new(3), electronics())
        .await
        .expect("update succeeds");

    assert_eq!(updated.id, CategoryId::new(3));
}

#[rstest]
#[tokio::test]
async fn update_missing_category_is_not_found(quiet_cache: MockListCache) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_update().never();

    let error = service(repo, quiet_cache)
        .update(CategoryId::new(3), electronics())
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Ok(false), ErrorCode::NotFound)]
#[case(Err(CategoryRepositoryError::referenced()), ErrorCode::Conflict)]
#[case(Err(CategoryRepositoryError::connection("refused")), ErrorCode::ServiceUnavailable)]
#[case(Err(CategoryRepositoryError::query("syntax")), ErrorCode::InternalError)]
#[tokio::test]
async fn delete_maps_failures(
    quiet_cache: MockListCache,
    #[case] outcome: Result<bool, CategoryRepositoryError>,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_delete().return_once(move |_| outcome);

    let error = service(repo, quiet_cache)
        .delete(CategoryId::new(1))
        .await
        .expect_err("delete fails");

    assert_eq!(error.code(), expected);
}
