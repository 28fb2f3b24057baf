use sea_orm::Database;

use engine::{Engine, EngineError, GiftPatch, NewGift, NewUser, User};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn register(engine: &Engine, email: &str, first_name: &str) -> User {
    engine
        .register_user(NewUser {
            email: email.to_string(),
            password: "password".to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            nickname: None,
            birth_date: None,
        })
        .await
        .unwrap()
}

fn item(name: &str) -> NewGift {
    NewGift {
        name: name.to_string(),
        description: None,
        link: None,
    }
}

#[tokio::test]
async fn added_items_show_up_on_the_owners_list() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;

    let gift = engine
        .add_gift(
            &alice.id,
            NewGift {
                name: "Espresso machine".to_string(),
                description: Some("Any dual boiler".to_string()),
                link: Some("https://shop.example/espresso".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(gift.user_id, alice.id);
    assert_eq!(gift.name, "Espresso machine");

    engine.add_gift(&alice.id, item("Wool socks")).await.unwrap();

    let list = engine.wishlist(&alice.id).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "Espresso machine");
    assert_eq!(list[1].name, "Wool socks");
}

#[tokio::test]
async fn empty_names_are_rejected() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;

    let result = engine.add_gift(&alice.id, item("   ")).await;

    assert_eq!(
        result,
        Err(EngineError::InvalidOperation(
            "gift name must not be empty".to_string()
        ))
    );
}

#[tokio::test]
async fn others_may_browse_but_not_touch() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;
    let bob = register(&engine, "bob@test.io", "Bob").await;

    let gift = engine.add_gift(&alice.id, item("Board game")).await.unwrap();

    // Browsing someone else's list is how a present gets picked.
    let list = engine.wishlist(&alice.id).await.unwrap();
    assert_eq!(list.len(), 1);

    for result in [
        engine.gift(&gift.id, &bob.id).await,
        engine
            .update_gift(&gift.id, &bob.id, GiftPatch::default())
            .await,
        engine.delete_gift(&gift.id, &bob.id).await.map(|()| gift.clone()),
    ] {
        assert_eq!(
            result,
            Err(EngineError::Forbidden(
                "only the owner may manage this wishlist item".to_string()
            ))
        );
    }
}

#[tokio::test]
async fn owner_updates_only_supplied_fields() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;

    let gift = engine
        .add_gift(
            &alice.id,
            NewGift {
                name: "Novel".to_string(),
                description: Some("Paperback".to_string()),
                link: None,
            },
        )
        .await
        .unwrap();

    let updated = engine
        .update_gift(
            &gift.id,
            &alice.id,
            GiftPatch {
                link: Some("https://shop.example/novel".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Novel");
    assert_eq!(updated.description, Some("Paperback".to_string()));
    assert_eq!(updated.link, Some("https://shop.example/novel".to_string()));
}

#[tokio::test]
async fn owner_deletes_their_item() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;

    let gift = engine.add_gift(&alice.id, item("Kite")).await.unwrap();
    engine.delete_gift(&gift.id, &alice.id).await.unwrap();

    assert!(engine.wishlist(&alice.id).await.unwrap().is_empty());
    let result = engine.gift(&gift.id, &alice.id).await;
    assert_eq!(
        result,
        Err(EngineError::KeyNotFound("gift not exists".to_string()))
    );
}

#[tokio::test]
async fn unknown_users_and_gifts_are_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@test.io", "Alice").await;

    let result = engine.wishlist("no-such-user").await;
    assert_eq!(
        result,
        Err(EngineError::KeyNotFound("user not exists".to_string()))
    );

    let result = engine.gift("no-such-gift", &alice.id).await;
    assert_eq!(
        result,
        Err(EngineError::KeyNotFound("gift not exists".to_string()))
    );
}
