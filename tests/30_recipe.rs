mod common;

use anyhow::Result;
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn created_recipes_read_back_deep_equal() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let res = client
        .post(server.url("/recipe/create"))
        .json(&json!({
            "name": "Bread",
            "ingredients": [{ "id": 1, "amount": "200g" }],
            "steps": ["mix", "bake"]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await?["id"].as_i64().unwrap_or_default();

    let recipe: Value = client
        .get(server.url(&format!("/recipe/getByRecipeId/{}", id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(recipe["name"], "Bread");
    assert_eq!(recipe["ingredients"], json!([{ "id": 1, "amount": "200g" }]));
    assert_eq!(recipe["steps"], json!(["mix", "bake"]));
    assert_eq!(recipe["photo"], Value::Null);
    assert_eq!(recipe["userId"], 1);

    let links = server.db.recipe_ingredient_links().await;
    assert_eq!(links.len(), 1);
    assert_eq!((links[0].recipe_id, links[0].ingredient_id, links[0].amount.as_str()), (id, 1, "200g"));
    Ok(())
}

#[tokio::test]
async fn ingredient_ids_are_not_checked_against_the_ingredient_table() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let id = common::create_recipe(&server, &client, "Mystery stew", &[404, 404]).await?;

    let links = server.db.recipe_ingredient_links().await;
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.recipe_id == id && l.ingredient_id == 404));
    Ok(())
}

#[tokio::test]
async fn invalid_recipes_touch_nothing() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    for body in [
        json!({ "ingredients": [{ "id": 1, "amount": "1" }], "steps": ["a"] }),
        json!({ "name": "x", "ingredients": [], "steps": ["a"] }),
        json!({ "name": "x", "ingredients": [{ "id": 1, "amount": "1" }] }),
        json!({ "name": "x", "ingredients": [{ "id": "one", "amount": "1" }], "steps": ["a"] }),
    ] {
        let res = client.post(server.url("/recipe/create")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(res.json::<Value>().await?["code"], "VALIDATION_ERROR");
    }

    let list: Value = client.get(server.url("/recipe/list")).send().await?.json().await?;
    assert_eq!(list, json!([]));
    assert!(server.db.recipe_ingredient_links().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn reads_require_a_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.client()?;

    for path in ["/recipe", "/recipe/list", "/recipe/get/1"] {
        let res = client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn get_of_a_missing_recipe_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let res = client.get(server.url("/recipe/get/42")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_may_update_or_delete() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.login_as("alice").await?;
    let bob = server.login_as("bob").await?;
    let id = common::create_recipe(&server, &alice, "Pancakes", &[1]).await?;

    let res = bob
        .put(server.url(&format!("/recipe/update/{}", id)))
        .json(&json!({ "name": "Mine now", "ingredients": [{ "id": 1, "amount": "1" }], "steps": ["a"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>().await?["error"], "Access denied");

    let res = bob.delete(server.url(&format!("/recipe/delete/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let recipe: Value = alice.get(server.url(&format!("/recipe/{}", id))).send().await?.json().await?;
    assert_eq!(recipe["name"], "Pancakes");
    assert_eq!(server.db.recipe_ingredient_links().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn ownership_is_checked_before_validation() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    // A recipe that does not exist is not owned by anyone
    let res = client
        .put(server.url("/recipe/update/77"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.delete(server.url("/recipe/delete/77")).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_do_not_outrank_session_or_ownership() -> Result<()> {
    let server = common::spawn_server().await?;
    let anonymous = server.client()?;

    for path in ["/recipe/create", "/recipe/deleteMultiple"] {
        let res = anonymous
            .post(server.url(path))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let alice = server.login_as("alice").await?;
    let bob = server.login_as("bob").await?;
    let id = common::create_recipe(&server, &alice, "Pancakes", &[1]).await?;

    let res = bob
        .put(server.url(&format!("/recipe/update/{}", id)))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The owner still gets the decoding error
    let res = alice
        .put(server.url(&format!("/recipe/update/{}", id)))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn owner_update_keeps_links_and_owner() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;
    let id = common::create_recipe(&server, &client, "Pancakes", &[1, 2]).await?;

    let res = client
        .put(server.url(&format!("/recipe/update/{}", id)))
        .json(&json!({ "name": "Crepes", "ingredients": [{ "id": 3, "amount": "2 eggs" }], "steps": ["whisk"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let recipe: Value = res.json().await?;
    assert_eq!(recipe["name"], "Crepes");
    assert_eq!(recipe["ingredients"], json!([{ "id": 3, "amount": "2 eggs" }]));
    assert_eq!(recipe["userId"], 1);

    let links = server.db.recipe_ingredient_links().await;
    let ingredient_ids: Vec<i64> = links.iter().map(|l| l.ingredient_id).collect();
    assert_eq!(ingredient_ids, vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn delete_cascades_links() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;
    let keep = common::create_recipe(&server, &client, "Keep", &[1]).await?;
    let gone = common::create_recipe(&server, &client, "Gone", &[1, 2]).await?;

    let res = client.delete(server.url(&format!("/recipe/delete/{}", gone))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let links = server.db.recipe_ingredient_links().await;
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].recipe_id, keep);
    let res = client.get(server.url(&format!("/recipe/{}", gone))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_multiple_skips_what_the_caller_does_not_own() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.login_as("alice").await?;
    let bob = server.login_as("bob").await?;
    let alices = common::create_recipe(&server, &alice, "Alice's", &[1]).await?;
    let bobs_first = common::create_recipe(&server, &bob, "Bob's first", &[1]).await?;
    let bobs_second = common::create_recipe(&server, &bob, "Bob's second", &[1]).await?;

    let res = bob
        .post(server.url("/recipe/deleteMultiple"))
        .json(&json!([alices, bobs_first, "junk", bobs_second.to_string(), 999]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let list: Value = alice.get(server.url("/recipe/list")).send().await?.json().await?;
    let remaining: Vec<i64> = list
        .as_array()
        .map(|items| items.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(remaining, vec![alices]);
    Ok(())
}

#[tokio::test]
async fn delete_multiple_needs_a_list() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let res = client
        .post(server.url("/recipe/deleteMultiple"))
        .json(&json!({ "id": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Missing list of recipes to delete");
    Ok(())
}

#[tokio::test]
async fn multipart_create_stores_the_photo() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let form = multipart::Form::new()
        .text("name", "Cake")
        .text("ingredients", r#"[{"id": 1, "amount": "3 eggs"}]"#)
        .text("steps[]", "mix")
        .text("steps[]", "bake")
        .part(
            "photo",
            multipart::Part::bytes(b"not really a png".to_vec())
                .file_name("cake.png")
                .mime_str("image/png")?,
        );

    let res = client.post(server.url("/recipe/create")).multipart(form).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let id = res.json::<Value>().await?["id"].as_i64().unwrap_or_default();

    let recipe: Value = client.get(server.url(&format!("/recipe/{}", id))).send().await?.json().await?;
    assert_eq!(recipe["steps"], json!(["mix", "bake"]));
    let photo = recipe["photo"].as_str().unwrap_or_default().to_string();
    assert!(photo.starts_with("/uploads/"), "photo: {}", photo);
    assert!(photo.ends_with("_cake.png"));

    let res = client.get(server.url(&photo)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&res.bytes().await?[..], b"not really a png");
    Ok(())
}

#[tokio::test]
async fn unsupported_photos_halt_the_request() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let form = multipart::Form::new()
        .text("name", "Cake")
        .text("ingredients", r#"[{"id": 1, "amount": "3 eggs"}]"#)
        .text("steps", r#"["bake"]"#)
        .part(
            "photo",
            multipart::Part::bytes(b"GIF89a".to_vec())
                .file_name("cake.gif")
                .mime_str("image/gif")?,
        );

    let res = client.post(server.url("/recipe/create")).multipart(form).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Unsupported photo format");

    let list: Value = client.get(server.url("/recipe/list")).send().await?.json().await?;
    assert_eq!(list, json!([]));
    assert!(server.db.recipe_ingredient_links().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_replaces_the_photo_only_when_one_is_sent() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = server.login_as("alice").await?;

    let form = multipart::Form::new()
        .text("name", "Cake")
        .text("ingredients", r#"[{"id": 1, "amount": "3 eggs"}]"#)
        .text("steps", r#"["bake"]"#)
        .part(
            "photo",
            multipart::Part::bytes(vec![1, 2, 3]).file_name("cake.webp").mime_str("image/webp")?,
        );
    let res = client.post(server.url("/recipe/create")).multipart(form).send().await?;
    let id = res.json::<Value>().await?["id"].as_i64().unwrap_or_default();
    let original: Value = client.get(server.url(&format!("/recipe/{}", id))).send().await?.json().await?;

    let res = client
        .put(server.url(&format!("/recipe/update/{}", id)))
        .json(&json!({ "name": "Better cake", "ingredients": [{ "id": 1, "amount": "4 eggs" }], "steps": ["bake longer"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["name"], "Better cake");
    assert_eq!(updated["photo"], original["photo"]);
    Ok(())
}
