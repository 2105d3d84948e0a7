use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    smart_scene_db::health_check(&pool).await.unwrap();

    for table in ["videos", "characters", "character_appearances"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The scene lookup index must exist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_video_start_index_exists(pool: PgPool) {
    let found: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM pg_indexes WHERE indexname = 'idx_character_appearances_video_start')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(found.0);
}
