mod common;

use anyhow::Result;
use reqwest::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn organization_bootstrap_then_exists_probe() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();

    // Bootstrap requires no token
    let res = client
        .post(format!("{}/api/organizations", server.base_url))
        .json(&serde_json::json!({ "name": "Acme" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["name"], "Acme");
    let id: Uuid = body["id"].as_str().unwrap().parse()?;

    // The exists probe is public as well
    let res = client
        .get(format!("{}/api/organizations/{}/exists", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.json::<bool>().await?);

    let res = client
        .get(format!("{}/api/organizations/{}/exists", server.base_url, Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.json::<bool>().await?);

    Ok(())
}

#[tokio::test]
async fn bootstrap_rejects_invalid_names() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();

    for bad in ["", "   ", "A"] {
        let res = client
            .post(format!("{}/api/organizations", server.base_url))
            .json(&serde_json::json!({ "name": bad }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "name {:?} should be rejected", bad);
    }

    Ok(())
}

#[tokio::test]
async fn listing_organizations_requires_a_token() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/organizations", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage token is rejected outright
    let res = client
        .get(format!("{}/api/organizations", server.base_url))
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A root token passes
    let res = client
        .get(format!("{}/api/organizations", server.base_url))
        .header("Authorization", format!("Bearer {}", common::root_token()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn tenant_token_cannot_list_all_organizations() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();

    let org = common::bootstrap_organization(&server.base_url, &format!("pub-{}", Uuid::new_v4()))
        .await?;
    let tenant = common::token(Some(org), common::ALL_ORG_AUTHORITIES);

    let res = client
        .get(format!("{}/api/organizations", server.base_url))
        .header("Authorization", format!("Bearer {}", tenant))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
