mod common;

use anyhow::Result;
use reqwest::StatusCode;
use uuid::Uuid;

fn unique(name: &str) -> String {
    format!("{}-{}", name, Uuid::new_v4().simple())
}

struct Fixture {
    org: Uuid,
    dept: Uuid,
    team: Uuid,
    token: String,
}

async fn fixture(server: &common::TestServer) -> Result<Fixture> {
    let client = reqwest::Client::new();
    let org = common::bootstrap_organization(&server.base_url, &unique("memb")).await?;
    let token = common::token(Some(org), common::ALL_ORG_AUTHORITIES);

    let res = client
        .post(format!("{}/api/departments", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "name": "Hosts" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED);
    let dept: Uuid = res.json::<serde_json::Value>().await?["id"].as_str().unwrap().parse()?;

    let res = client
        .post(format!("{}/api/teams", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "name": "Crew", "departmentId": dept }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED);
    let team: Uuid = res.json::<serde_json::Value>().await?["id"].as_str().unwrap().parse()?;

    Ok(Fixture { org, dept, team, token })
}

#[tokio::test]
async fn assigning_a_user_twice_violates_the_set_invariant() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();
    let f = fixture(server).await?;
    let user = Uuid::new_v4();

    let url = format!(
        "{}/api/organizations/{}/departments/{}/assign-user/{}",
        server.base_url, f.org, f.dept, user
    );

    let res = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().contains("already assigned"));

    Ok(())
}

#[tokio::test]
async fn removing_an_unassigned_user_is_an_error() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();
    let f = fixture(server).await?;
    let user = Uuid::new_v4();

    let assign_url = format!(
        "{}/api/organizations/{}/teams/{}/assign-user/{}",
        server.base_url, f.org, f.team, user
    );
    let remove_url = format!(
        "{}/api/organizations/{}/teams/{}/remove-user/{}",
        server.base_url, f.org, f.team, user
    );

    let res = client
        .post(&assign_url)
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(&remove_url)
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The set is empty again; a second removal reports the violation
    let res = client
        .delete(&remove_url)
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().contains("not assigned"));

    Ok(())
}

#[tokio::test]
async fn surveys_assign_to_departments_and_teams() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();
    let f = fixture(server).await?;
    let survey = Uuid::new_v4();

    let res = client
        .post(format!(
            "{}/api/organizations/{}/departments/{}/assign-survey/{}",
            server.base_url, f.org, f.dept, survey
        ))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!(
            "{}/api/organizations/{}/teams/{}/assign-survey/{}",
            server.base_url, f.org, f.team, survey
        ))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!(
            "{}/api/organizations/{}/teams/{}/remove-survey/{}",
            server.base_url, f.org, f.team, survey
        ))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn cross_tenant_membership_mutation_is_forbidden() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();
    let f = fixture(server).await?;

    let outsider_org = common::bootstrap_organization(&server.base_url, &unique("outsider")).await?;
    let outsider = common::token(Some(outsider_org), common::ALL_ORG_AUTHORITIES);

    let res = client
        .post(format!(
            "{}/api/organizations/{}/departments/{}/assign-user/{}",
            server.base_url, f.org, f.dept, Uuid::new_v4()
        ))
        .header("Authorization", format!("Bearer {}", outsider))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn assigning_into_a_missing_host_is_not_found() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    let client = reqwest::Client::new();
    let f = fixture(server).await?;

    let res = client
        .post(format!(
            "{}/api/organizations/{}/departments/{}/assign-user/{}",
            server.base_url, f.org, Uuid::new_v4(), Uuid::new_v4()
        ))
        .header("Authorization", format!("Bearer {}", f.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
