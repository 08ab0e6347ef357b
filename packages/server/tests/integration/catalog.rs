use crate::common::{TestApp, routes};

fn names(body: &serde_json::Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

mod search {
    use super::*;

    #[tokio::test]
    async fn blank_query_lists_whole_catalog_by_name() {
        let app = TestApp::spawn().await;
        for name in ["Portuguesa", "calabresa", "Atum"] {
            app.create_product(name).await;
        }

        let res = app
            .get_with_token(routes::CATALOG, &app.waiter_token())
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), ["Atum", "calabresa", "Portuguesa"]);
        assert_eq!(res.body["count"], 3);

        let res = app
            .get_with_token(&routes::catalog_search("%20%20"), &app.waiter_token())
            .await;
        assert_eq!(res.body["count"], 3);
    }

    #[tokio::test]
    async fn query_matches_name_prefix_case_insensitively() {
        let app = TestApp::spawn().await;
        for name in ["Calabresa", "Calzone", "Frango com Catupiry"] {
            app.create_product(name).await;
        }

        let res = app
            .get_with_token(&routes::catalog_search("%20CAL"), &app.waiter_token())
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), ["Calabresa", "Calzone"]);
        assert_eq!(res.body["query"], "cal");
    }

    #[tokio::test]
    async fn like_wildcards_match_literally() {
        let app = TestApp::spawn().await;
        app.create_product("Atum").await;

        let res = app
            .get_with_token(&routes::catalog_search("%25"), &app.waiter_token())
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 0);
    }

    #[tokio::test]
    async fn clear_returns_full_catalog() {
        let app = TestApp::spawn().await;
        app.create_product("Bacon").await;
        app.create_product("Atum").await;

        let res = app
            .post_with_token(
                routes::CATALOG_CLEAR,
                &serde_json::json!({}),
                &app.waiter_token(),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res.body), ["Atum", "Bacon"]);
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::CATALOG).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app.get_with_token(routes::CATALOG, "garbage").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod entries {
    use super::*;

    #[tokio::test]
    async fn entry_carries_prices_and_image_url() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Margherita").await;

        let res = app
            .get_with_token(&routes::catalog_entry(id), &app.waiter_token())
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["normalized_name"], "margherita");
        let prices = res.body["prices"].as_array().unwrap();
        assert_eq!(prices[0]["size"], "P");
        assert_eq!(prices[0]["cents"], 3000);
        assert_eq!(prices[2]["amount"], "55.90");

        let image_url = res.body["image_url"].as_str().unwrap();
        assert!(image_url.starts_with("/api/v1/assets/pizzas/"));
        let image = app
            .client
            .get(format!("http://{}{}", app.addr, image_url))
            .send()
            .await
            .unwrap();
        assert_eq!(image.status().as_u16(), 200);
        assert_eq!(image.headers()["content-type"], "image/png");
        assert_eq!(
            image.bytes().await.unwrap().as_ref(),
            crate::common::PNG_BYTES
        );
    }

    #[tokio::test]
    async fn unknown_entry_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(
                &routes::catalog_entry(uuid::Uuid::now_v7()),
                &app.waiter_token(),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn opening_an_entry_depends_on_role() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Atum").await;

        let res = app
            .get_with_token(&routes::catalog_open(id), &app.waiter_token())
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["kind"], "place_order");
        assert_eq!(res.body["id"], id.to_string());

        let res = app
            .get_with_token(&routes::catalog_open(id), &app.admin_token())
            .await;
        assert_eq!(res.body["kind"], "manage_product");
    }
}

mod capabilities {
    use super::*;

    #[tokio::test]
    async fn waiter_can_only_browse_and_order() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(routes::CAPABILITIES, &app.waiter_token())
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["role"], "waiter");
        assert_eq!(res.body["capabilities"], serde_json::json!(["browse_and_order"]));
        assert!(res.body["new_product"].is_null());
    }

    #[tokio::test]
    async fn admin_gets_new_product_action() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(routes::CAPABILITIES, &app.admin_token())
            .await;
        assert_eq!(res.status, 200);
        assert!(
            res.body["capabilities"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("manage_catalog"))
        );
        assert_eq!(res.body["new_product"]["kind"], "new_product");
    }
}
