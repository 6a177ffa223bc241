#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `SQLite` behaviour of the membership repository: window filtering,
//! uniqueness and the single-valued fast path.

mod support;

use authority::domain::error::DomainError;
use authority::domain::repo::MembershipReader;
use authority::infra::storage::entity::{
    MembershipRoleStatus, MembershipStatus, membership, membership_role,
};
use authority::infra::storage::{Assignment, SeaMembershipRepository};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use time::{Duration, OffsetDateTime};

async fn membership_row(
    db: &sea_orm::DatabaseConnection,
    user_id: u32,
    tenant_id: u32,
) -> membership::Model {
    membership::Entity::find()
        .filter(membership::Column::UserId.eq(i64::from(user_id)))
        .filter(membership::Column::TenantId.eq(i64::from(tenant_id)))
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn lists_ids_of_all_three_relations() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());

    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();
    repo.assign_roles(10, 3, &[1, 2], &Assignment::default())
        .await
        .unwrap();
    repo.assign_positions(10, 3, &[7], &Assignment::default())
        .await
        .unwrap();
    repo.assign_org_units(10, 3, &[20, 21], &Assignment::default())
        .await
        .unwrap();

    let mut ids = repo.list_membership_all_ids(10, 3).await.unwrap();
    ids.role_ids.sort_unstable();
    ids.org_unit_ids.sort_unstable();
    assert_eq!(ids.role_ids, vec![1, 2]);
    assert_eq!(ids.position_ids, vec![7]);
    assert_eq!(ids.org_unit_ids, vec![20, 21]);
}

#[tokio::test]
async fn missing_membership_is_not_found() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db);

    let err = repo.list_membership_all_ids(10, 3).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::MembershipNotFound {
            user_id: 10,
            tenant_id: 3
        }
    ));
}

#[tokio::test]
async fn ended_membership_is_invisible() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();

    repo.set_end_at(10, 3, Some(OffsetDateTime::now_utc() - Duration::hours(1)))
        .await
        .unwrap();
    assert!(repo.list_membership_all_ids(10, 3).await.is_err());

    repo.set_end_at(10, 3, Some(OffsetDateTime::now_utc() + Duration::hours(1)))
        .await
        .unwrap();
    assert!(repo.list_membership_all_ids(10, 3).await.is_ok());

    repo.set_end_at(10, 3, None).await.unwrap();
    assert!(repo.list_membership_all_ids(10, 3).await.is_ok());
}

#[tokio::test]
async fn ended_role_assignments_are_skipped() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();
    repo.assign_roles(
        10,
        3,
        &[1],
        &Assignment {
            end_at: Some(OffsetDateTime::now_utc() - Duration::minutes(5)),
            ..Assignment::default()
        },
    )
    .await
    .unwrap();

    let ids = repo.list_membership_all_ids(10, 3).await.unwrap();
    assert!(ids.role_ids.is_empty());
}

#[tokio::test]
async fn future_start_is_not_filtered() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(
        10,
        3,
        &Assignment {
            start_at: Some(OffsetDateTime::now_utc() + Duration::days(30)),
            ..Assignment::default()
        },
    )
    .await
    .unwrap();

    assert!(repo.list_membership_all_ids(10, 3).await.is_ok());
}

#[tokio::test]
async fn one_membership_per_tenant_and_user() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    let first = repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();
    let again = repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();
    assert_eq!(first, again);

    let duplicate = membership::ActiveModel {
        tenant_id: Set(3),
        user_id: Set(10),
        is_primary: Set(false),
        status: Set(MembershipStatus::Active),
        ..Default::default()
    }
    .insert(&db)
    .await;
    assert!(duplicate.is_err(), "unique index must reject a second row");

    // The same user may belong to another tenant.
    let other = repo.assign_tenant(10, 4, &Assignment::default()).await.unwrap();
    assert_ne!(first, other);
}

#[tokio::test]
async fn fast_path_follows_assigned_sets() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();

    repo.assign_roles(10, 3, &[5], &Assignment::default())
        .await
        .unwrap();
    assert_eq!(membership_row(&db, 10, 3).await.role_id, Some(5));

    repo.assign_roles(10, 3, &[5, 6], &Assignment::default())
        .await
        .unwrap();
    assert_eq!(membership_row(&db, 10, 3).await.role_id, None);

    repo.assign_roles(
        10,
        3,
        &[5, 6],
        &Assignment {
            primary_id: Some(6),
            ..Assignment::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(membership_row(&db, 10, 3).await.role_id, Some(6));

    repo.assign_org_units(10, 3, &[8, 8], &Assignment::default())
        .await
        .unwrap();
    assert_eq!(membership_row(&db, 10, 3).await.org_unit_id, Some(8));

    repo.assign_roles(10, 3, &[], &Assignment::default())
        .await
        .unwrap();
    let row = membership_row(&db, 10, 3).await;
    assert_eq!(row.role_id, None);
    assert!(repo.list_membership_all_ids(10, 3).await.unwrap().role_ids.is_empty());
}

#[tokio::test]
async fn assignment_requires_membership() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db);
    let err = repo
        .assign_roles(10, 3, &[1], &Assignment::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MembershipNotFound { .. }));
}

#[tokio::test]
async fn status_updates_the_membership() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();

    repo.set_status(10, 3, MembershipStatus::Suspended)
        .await
        .unwrap();
    assert_eq!(
        membership_row(&db, 10, 3).await.status,
        MembershipStatus::Suspended
    );
    assert!(matches!(
        repo.set_status(11, 3, MembershipStatus::Active).await,
        Err(DomainError::MembershipNotFound { .. })
    ));
}

#[tokio::test]
async fn suspended_membership_still_resolves() {
    let db = support::inmem_db().await;
    let repo = SeaMembershipRepository::new(db.clone());
    repo.assign_tenant(10, 3, &Assignment::default()).await.unwrap();
    repo.assign_roles(10, 3, &[4], &Assignment::default())
        .await
        .unwrap();

    repo.set_status(10, 3, MembershipStatus::Suspended)
        .await
        .unwrap();
    let binding = membership_role::Entity::find().one(&db).await.unwrap().unwrap();
    let mut binding: membership_role::ActiveModel = binding.into();
    binding.status = Set(MembershipRoleStatus::Disabled);
    binding.update(&db).await.unwrap();

    let ids = repo.list_membership_all_ids(10, 3).await.unwrap();
    assert_eq!(ids.role_ids, vec![4]);
}
