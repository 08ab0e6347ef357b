use crate::common::{ProductFields, TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_a_product() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductFields::named("  Portuguesa "), &app.admin_token())
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Portuguesa");
        assert_eq!(res.body["normalized_name"], "portuguesa");
        assert_eq!(res.body["prices"][2]["cents"], 5590);
        assert!(
            res.body["image_asset_path"]
                .as_str()
                .unwrap()
                .starts_with("pizzas/")
        );
        assert_eq!(app.stored_asset_count(), 1);
        assert_eq!(app.catalog.len().await, 1);
    }

    #[tokio::test]
    async fn waiter_cannot_create_and_nothing_is_stored() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductFields::named("Atum"), &app.waiter_token())
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        assert_eq!(app.stored_asset_count(), 0);
        assert!(app.catalog.is_empty().await);
    }

    #[tokio::test]
    async fn every_invalid_field_is_reported() {
        let app = TestApp::spawn().await;
        let long_description = "x".repeat(61);

        let res = app
            .post_product(
                ProductFields {
                    name: "   ",
                    description: &long_description,
                    prices: ["abc", "42", ""],
                    image: None,
                },
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.violation_fields(),
            ["name", "description", "image", "price_P", "price_G"]
        );
        assert_eq!(app.stored_asset_count(), 0);
    }

    #[tokio::test]
    async fn empty_image_part_counts_as_no_image() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(
                ProductFields {
                    image: Some(&[]),
                    ..ProductFields::named("Atum")
                },
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.violation_fields(), ["image"]);
    }

    #[tokio::test]
    async fn unstorable_price_is_rejected_before_upload() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(
                ProductFields {
                    prices: ["30", "99999999999999999", "55"],
                    ..ProductFields::named("Atum")
                },
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.violation_fields(), ["price_M"]);
        assert_eq!(app.stored_asset_count(), 0);
    }

    #[tokio::test]
    async fn zero_price_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(
                ProductFields {
                    prices: ["0", "42", "55"],
                    ..ProductFields::named("Atum")
                },
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.violation_fields(), ["price_P"]);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn update_replaces_record_and_image() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Atum").await;
        let before = app
            .get_with_token(&routes::catalog_entry(id), &app.waiter_token())
            .await;

        let res = app
            .put_product(
                id,
                ProductFields {
                    prices: ["31", "43", "56"],
                    ..ProductFields::named("Atum Especial")
                },
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id.to_string());
        assert_eq!(res.body["prices"][0]["cents"], 3100);
        assert_ne!(
            res.body["image_asset_path"],
            before.body["image_asset_path"]
        );
        assert_eq!(app.stored_asset_count(), 1);

        let res = app
            .get_with_token(&routes::catalog_search("atum%20e"), &app.waiter_token())
            .await;
        assert_eq!(res.body["count"], 1);
    }

    #[tokio::test]
    async fn updating_missing_entry_leaves_no_image_behind() {
        let app = TestApp::spawn().await;

        let res = app
            .put_product(
                uuid::Uuid::now_v7(),
                ProductFields::named("Atum"),
                &app.admin_token(),
            )
            .await;
        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(app.stored_asset_count(), 0);
    }

    #[tokio::test]
    async fn waiter_cannot_update() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Atum").await;

        let res = app
            .put_product(id, ProductFields::named("Bacon"), &app.waiter_token())
            .await;
        assert_eq!(res.status, 403);

        let res = app
            .get_with_token(&routes::catalog_entry(id), &app.waiter_token())
            .await;
        assert_eq!(res.body["name"], "Atum");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_image_and_record() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Atum").await;

        let res = app
            .delete_with_token(&routes::product(id), &app.admin_token())
            .await;
        assert_eq!(res.status, 204, "{}", res.text);
        assert_eq!(app.stored_asset_count(), 0);

        let res = app
            .get_with_token(&routes::catalog_entry(id), &app.waiter_token())
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn waiter_cannot_delete() {
        let app = TestApp::spawn().await;
        let id = app.create_product("Atum").await;

        let res = app
            .delete_with_token(&routes::product(id), &app.waiter_token())
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(app.stored_asset_count(), 1);
        assert_eq!(app.catalog.len().await, 1);
    }

    #[tokio::test]
    async fn deleting_missing_entry_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_with_token(&routes::product(uuid::Uuid::now_v7()), &app.admin_token())
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
