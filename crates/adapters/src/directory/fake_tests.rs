// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use onsite_core::GeoPoint;

fn site(id: &str) -> Site {
    Site {
        id: SiteId(id.to_string()),
        name: id.to_string(),
        location: Some(GeoPoint {
            lat: 44.4268,
            lon: 26.1025,
        }),
        geofence_radius_m: 100.0,
        schedule: None,
    }
}

#[tokio::test]
async fn looks_up_registered_site() {
    let directory = FakeDirectory::new();
    directory.insert(site("yard-north"));

    let found = directory.site(&SiteId("yard-north".to_string())).await.unwrap();
    assert_eq!(found.geofence_radius_m, 100.0);
}

#[tokio::test]
async fn unknown_site_is_rejected() {
    let directory = FakeDirectory::new();
    let err = directory
        .site(&SiteId("yard-missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DirectoryError::UnknownSite(SiteId("yard-missing".to_string()))
    );
}
