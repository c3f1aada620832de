// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use onsite_core::{SiteId, WorkerId};

fn worker(id: &str, synthetic: bool) -> Worker {
    Worker {
        id: WorkerId(id.to_string()),
        name: id.to_string(),
        geofence_enforced: true,
        synthetic,
        default_site: Some(SiteId("yard-north".to_string())),
    }
}

#[tokio::test]
async fn resolves_registered_token() {
    let identity = FakeIdentity::new();
    identity.insert("tok-maria", worker("maria", false));

    let resolved = identity.resolve("tok-maria").await.unwrap();
    assert_eq!(resolved.id, WorkerId("maria".to_string()));
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let identity = FakeIdentity::new();
    let err = identity.resolve("tok-nobody").await.unwrap_err();
    assert_eq!(err, IdentityError::UnknownToken);
}

#[tokio::test]
async fn synthetic_workers_sorted_by_id() {
    let identity = FakeIdentity::new();
    identity.insert("tok-b", worker("bogdan", true));
    identity.insert("tok-a", worker("ana", true));
    identity.insert("tok-m", worker("maria", false));

    let synthetic = identity.synthetic_workers().await;
    let ids: Vec<&str> = synthetic.iter().map(|w| w.id.0.as_str()).collect();
    assert_eq!(ids, ["ana", "bogdan"]);
}
