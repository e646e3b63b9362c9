//! Message-store behavior against a live Postgres. The tests run only
//! when TEST_DATABASE_URL points at a database; otherwise they are
//! no-ops so the suite stays green on machines without one.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use hopehire_backend::models::message::CreateMessage;
use hopehire_backend::services::message_service::MessageService;

async fn connect() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

async fn seed_user(pool: &PgPool, role: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, 'unused', $3) RETURNING id",
    )
    .bind(format!("{} user", role))
    .bind(format!("{}@example.org", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("seed user")
}

fn note(
    (sender, sender_role): (Uuid, &str),
    (receiver, receiver_role): (Uuid, &str),
    content: &str,
) -> CreateMessage {
    CreateMessage {
        content: content.to_string(),
        sender_id: sender,
        sender_role: sender_role.to_string(),
        receiver_id: receiver,
        receiver_role: receiver_role.to_string(),
    }
}

#[tokio::test]
async fn thread_read_returns_the_pair_in_order() {
    let Some(pool) = connect().await else { return };
    let service = MessageService::new(pool.clone());

    let seeker = seed_user(&pool, "job_seeker").await;
    let volunteer = seed_user(&pool, "volunteer").await;
    let other = seed_user(&pool, "volunteer").await;

    let seeker_side = (seeker, "job_seeker");
    let volunteer_side = (volunteer, "volunteer");
    let other_side = (other, "volunteer");
    service.send(note(seeker_side, volunteer_side, "first")).await.unwrap();
    service.send(note(volunteer_side, seeker_side, "second")).await.unwrap();
    service.send(note(seeker_side, other_side, "elsewhere")).await.unwrap();

    let thread = service.list_thread(seeker, volunteer).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert!(thread.iter().all(|m| m.in_thread(seeker, volunteer)));
    assert!(thread
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at));
    // Both directions of the pair come back.
    assert!(thread.iter().any(|m| m.sender_id == seeker));
    assert!(thread.iter().any(|m| m.sender_id == volunteer));
}

#[tokio::test]
async fn acknowledging_flips_only_inbound_from_that_counterpart() {
    let Some(pool) = connect().await else { return };
    let service = MessageService::new(pool.clone());

    let me = seed_user(&pool, "job_seeker").await;
    let them = seed_user(&pool, "volunteer").await;
    let other = seed_user(&pool, "volunteer").await;

    let my_side = (me, "job_seeker");
    let their_side = (them, "volunteer");
    let other_side = (other, "volunteer");
    service.send(note(their_side, my_side, "inbound")).await.unwrap();
    service.send(note(my_side, their_side, "outbound")).await.unwrap();
    service.send(note(other_side, my_side, "other thread")).await.unwrap();

    let flipped = service.acknowledge_read(me, them).await.unwrap();
    assert_eq!(flipped, 1);

    let thread = service.list_thread(me, them).await.unwrap();
    assert!(thread.iter().all(|m| !m.awaiting_ack(me, them)));
    // My own outbound message keeps its flag for the counterpart.
    let outbound = thread.iter().find(|m| m.sender_id == me).unwrap();
    assert!(!outbound.is_read);

    // The other counterpart's thread is untouched.
    let elsewhere = service.list_thread(me, other).await.unwrap();
    assert!(elsewhere.iter().any(|m| m.awaiting_ack(me, other)));
    assert_eq!(service.unread_count(me).await.unwrap(), 1);

    // A second acknowledgement has nothing left to flip.
    assert_eq!(service.acknowledge_read(me, them).await.unwrap(), 0);
}
